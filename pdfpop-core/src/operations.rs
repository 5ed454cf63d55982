//! High-level operations behind the CLI commands
//!
//! `generate_config` turns a form template into a mapping scaffold;
//! `run` populates a template from a mapping plus a data source.

use std::path::{Path, PathBuf};

use serde_json::Value as JsonValue;
use tracing::{info, warn};

use crate::config::FormConfig;
use crate::data::read_records;
use crate::document::FormDocument;
use crate::error::{PdfPopError, Result};
use crate::forms::{discover_fields, populate};
use crate::resolver::{interpret_io_entry, resolve_fields};

/// Generate a mapping scaffold for a form template.
///
/// Every discovered field is listed with its inferred type suffix and
/// mapped to null; nothing is overwritten if the scaffold already exists.
/// Returns the scaffold path.
pub fn generate_config(form_path: &Path) -> Result<PathBuf> {
    if !form_path.exists() {
        return Err(PdfPopError::NotFound(form_path.to_path_buf()));
    }
    let mut config = FormConfig::new(FormConfig::default_path(form_path));
    if config.exists() {
        return Err(PdfPopError::AlreadyExists(config.path().to_path_buf()));
    }

    let doc = FormDocument::load(form_path)?;
    config.data.io.form = Some(form_path.canonicalize()?.display().to_string());
    config.data.io.output_dir = Some(std::env::current_dir()?.display().to_string());
    config.data.io.output_name = Some(FormConfig::default_output_name(form_path));
    for widget in discover_fields(&doc)? {
        config
            .data
            .fields
            .insert(format!("{} [{}]", widget.name, widget.field_type), JsonValue::Null);
    }
    config.save()?;
    info!("generated form configuration file {:?}", config.path());
    Ok(config.path().to_path_buf())
}

/// Populate a form per a mapping and a data source.
///
/// Only the first record of the data source is used; additional rows
/// produce a notice. Returns the output path, or `None` when the data
/// source holds no records at all.
pub fn run(config_path: &Path, data_path: &Path) -> Result<Option<PathBuf>> {
    let config = FormConfig::load(config_path)?;
    let records = read_records(data_path)?;
    let Some(record) = records.first() else {
        warn!("no entries found in data file; nothing to do");
        return Ok(None);
    };
    if records.len() > 1 {
        warn!(
            "data file has {} rows; only the first is used",
            records.len()
        );
    }

    let io = &config.data.io;
    let form_entry = io
        .form
        .as_deref()
        .ok_or_else(|| PdfPopError::InvalidConfig("io.form is not set".to_string()))?;
    let form_path = PathBuf::from(interpret_io_entry(form_entry, record));
    let output_dir = io
        .output_dir
        .as_deref()
        .map(|raw| interpret_io_entry(raw, record))
        .unwrap_or_else(|| ".".to_string());
    let output_name = io
        .output_name
        .as_deref()
        .map(|raw| interpret_io_entry(raw, record))
        .unwrap_or_else(|| FormConfig::default_output_name(&form_path));
    let output_path = Path::new(&output_dir).join(output_name);

    info!("populating form {:?}", form_path.display());
    let resolved = resolve_fields(&config.stripped_fields(), record)?;

    let mut doc = FormDocument::load(&form_path)?;
    populate(&mut doc, &resolved.values)?;
    // Invoked even when zero fields were updated, so unrelated document
    // content still round-trips with the regeneration flag set.
    doc.set_need_appearances()?;
    doc.save(&output_path)?;
    info!("populated form saved to {:?}", output_path.display());
    Ok(Some(output_path))
}
