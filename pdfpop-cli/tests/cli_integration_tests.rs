//! Integration tests for the pdfpop CLI
//!
//! Drives the compiled binary through the config-then-run workflow
//! against real files: form templates, mapping scaffolds and CSV data.

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::{tempdir, TempDir};

use lopdf::{dictionary, Document, Object, StringFormat};

/// Test helper to get the CLI binary path
fn get_cli_path() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // Remove test binary name
    if path.ends_with("deps") {
        path.pop(); // Remove "deps" directory
    }
    path.push("pdfpop");
    #[cfg(windows)]
    path.set_extension("exe");
    path
}

fn setup_temp_dir() -> TempDir {
    tempdir().expect("Failed to create temp directory")
}

/// Run the CLI with `dir` as working directory and return its output.
fn run_cli_command(dir: &Path, args: &[&str]) -> Result<std::process::Output> {
    let output = Command::new(get_cli_path())
        .current_dir(dir)
        .args(args)
        .output()?;
    Ok(output)
}

fn assert_pdf_exists_and_valid(path: &Path) {
    assert!(path.exists(), "PDF file should exist: {}", path.display());
    let content = fs::read(path).expect("Failed to read PDF file");
    assert!(
        content.starts_with(b"%PDF-"),
        "File should start with PDF header"
    );
}

/// Write a one-page form template with a text field and a checkbox.
fn write_template(dir: &Path) -> PathBuf {
    let mut doc = Document::with_version("1.5");
    let text_field = doc.add_object(dictionary! {
        "Subtype" => Object::Name(b"Widget".to_vec()),
        "T" => Object::String(b"Full Name".to_vec(), StringFormat::Literal),
        "FT" => Object::Name(b"Tx".to_vec()),
    });
    let checkbox = doc.add_object(dictionary! {
        "Subtype" => Object::Name(b"Widget".to_vec()),
        "T" => Object::String(b"Agreed".to_vec(), StringFormat::Literal),
        "FT" => Object::Name(b"Btn".to_vec()),
    });
    let annots = vec![Object::Reference(text_field), Object::Reference(checkbox)];
    let pages_id = doc.new_object_id();
    let page_id = doc.add_object(dictionary! {
        "Type" => Object::Name(b"Page".to_vec()),
        "Parent" => Object::Reference(pages_id),
        "MediaBox" => Object::Array(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(612),
            Object::Integer(792),
        ]),
        "Annots" => Object::Array(annots.clone()),
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => Object::Name(b"Pages".to_vec()),
            "Kids" => Object::Array(vec![Object::Reference(page_id)]),
            "Count" => Object::Integer(1),
        }),
    );
    let acroform_id = doc.add_object(dictionary! {
        "Fields" => Object::Array(annots),
    });
    let catalog_id = doc.add_object(dictionary! {
        "Type" => Object::Name(b"Catalog".to_vec()),
        "Pages" => Object::Reference(pages_id),
        "AcroForm" => Object::Reference(acroform_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let path = dir.join("template.pdf");
    doc.save(&path).expect("Failed to save template");
    path
}

#[test]
fn test_config_command_generates_scaffold() {
    let temp_dir = setup_temp_dir();
    let template = write_template(temp_dir.path());

    let output = run_cli_command(
        temp_dir.path(),
        &["config", template.to_str().unwrap()],
    )
    .expect("CLI command should succeed");

    assert!(output.status.success(), "Command should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("pdfpop-template.json"),
        "Should report scaffold path, got: {stdout}"
    );

    let scaffold = temp_dir.path().join("pdfpop-template.json");
    let contents = fs::read_to_string(&scaffold).expect("Scaffold should exist");
    assert!(contents.contains("\"Full Name [text]\": null"));
    assert!(contents.contains("\"Agreed [checkbox]\": null"));
    assert!(contents.contains("\"output_name\": \"pdfpop-template.pdf\""));
}

#[test]
fn test_config_command_refuses_to_overwrite() {
    let temp_dir = setup_temp_dir();
    let template = write_template(temp_dir.path());

    let first = run_cli_command(temp_dir.path(), &["config", template.to_str().unwrap()])
        .expect("CLI command should succeed");
    assert!(first.status.success());

    let second = run_cli_command(temp_dir.path(), &["config", template.to_str().unwrap()])
        .expect("CLI command should succeed");
    assert!(!second.status.success(), "Second run should fail");
    let stderr = String::from_utf8_lossy(&second.stderr);
    assert!(
        stderr.contains("already exists"),
        "Should explain the conflict, got: {stderr}"
    );
}

#[test]
fn test_config_command_missing_form() {
    let temp_dir = setup_temp_dir();
    let output = run_cli_command(temp_dir.path(), &["config", "no-such-form.pdf"])
        .expect("CLI command should succeed");
    assert!(!output.status.success());
}

#[test]
fn test_run_command_populates_form() {
    let temp_dir = setup_temp_dir();
    let template = write_template(temp_dir.path());

    let config_path = temp_dir.path().join("mapping.json");
    let config = format!(
        r#"{{
    "io": {{
        "form": "{form}",
        "output_dir": "{dir}",
        "output_name": "filled.pdf"
    }},
    "fields": {{
        "Full Name [text]": "data['first'] + ' ' + data['last']",
        "Agreed [checkbox]": "consent"
    }}
}}"#,
        form = template.display(),
        dir = temp_dir.path().display(),
    );
    fs::write(&config_path, config).expect("Failed to write mapping");

    let data_path = temp_dir.path().join("people.csv");
    fs::write(&data_path, "first,last,consent\nJane,Doe,yes\n").expect("Failed to write CSV");

    let output = run_cli_command(
        temp_dir.path(),
        &[
            "run",
            config_path.to_str().unwrap(),
            data_path.to_str().unwrap(),
        ],
    )
    .expect("CLI command should succeed");

    assert!(
        output.status.success(),
        "Command should succeed, stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("filled.pdf"), "Should report output path");
    assert_pdf_exists_and_valid(&temp_dir.path().join("filled.pdf"));
}

#[test]
fn test_run_command_empty_data_exits_cleanly() {
    let temp_dir = setup_temp_dir();
    let template = write_template(temp_dir.path());

    let config_path = temp_dir.path().join("mapping.json");
    let config = format!(
        r#"{{ "io": {{ "form": "{form}" }}, "fields": {{}} }}"#,
        form = template.display(),
    );
    fs::write(&config_path, config).expect("Failed to write mapping");
    let data_path = temp_dir.path().join("people.csv");
    fs::write(&data_path, "first,last\n").expect("Failed to write CSV");

    let output = run_cli_command(
        temp_dir.path(),
        &[
            "run",
            config_path.to_str().unwrap(),
            data_path.to_str().unwrap(),
        ],
    )
    .expect("CLI command should succeed");

    assert!(output.status.success(), "Empty data is not an error");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("No entries found"));
}

#[test]
fn test_run_command_missing_config() {
    let temp_dir = setup_temp_dir();
    let data_path = temp_dir.path().join("people.csv");
    fs::write(&data_path, "a\n1\n").expect("Failed to write CSV");

    let output = run_cli_command(
        temp_dir.path(),
        &["run", "absent.json", data_path.to_str().unwrap()],
    )
    .expect("CLI command should succeed");
    assert!(!output.status.success());
}

#[test]
fn test_help_lists_subcommands() {
    let temp_dir = setup_temp_dir();
    let output = run_cli_command(temp_dir.path(), &["--help"])
        .expect("CLI command should succeed");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("config"));
    assert!(stdout.contains("run"));
}
