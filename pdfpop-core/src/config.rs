//! Field-mapping configuration
//!
//! The declarative JSON document driving a run: an `io` section naming
//! the source form and the output location, and a `fields` section
//! mapping each form field to null, a literal, a column name or an
//! expression. Field names in a generated scaffold carry a bracketed
//! type suffix ("Name [text]") purely as documentation; it is stripped
//! before matching against the document's real field names.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::{PdfPopError, Result};

/// The io section: where the form comes from and where output goes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IoSection {
    pub form: Option<String>,
    pub output_dir: Option<String>,
    pub output_name: Option<String>,
}

/// Full configuration document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigData {
    pub io: IoSection,
    pub fields: IndexMap<String, JsonValue>,
}

/// A form configuration bound to its on-disk path.
#[derive(Debug)]
pub struct FormConfig {
    path: PathBuf,
    pub data: ConfigData,
}

impl FormConfig {
    /// Create an empty configuration for `path`; nothing is written until
    /// [`FormConfig::save`].
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: ConfigData::default(),
        }
    }

    /// Load an existing configuration.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(PdfPopError::NotFound(path.to_path_buf()));
        }
        let contents = fs::read_to_string(path)?;
        let data: ConfigData = serde_json::from_str(&contents)?;
        Ok(Self {
            path: path.to_path_buf(),
            data,
        })
    }

    /// Write the configuration to its path, four-space indented.
    pub fn save(&self) -> Result<()> {
        let file = fs::File::create(&self.path)?;
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(file, formatter);
        self.data.serialize(&mut serializer)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// The fields section with documentation suffixes stripped off the
    /// keys, ready for matching against discovered field names.
    pub fn stripped_fields(&self) -> IndexMap<String, JsonValue> {
        self.data
            .fields
            .iter()
            .map(|(name, spec)| (strip_type_suffix(name).to_string(), spec.clone()))
            .collect()
    }

    /// Default configuration path for a form: `pdfpop-<stem>.json` in the
    /// current working directory.
    pub fn default_path(form_path: &Path) -> PathBuf {
        let stem = form_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("form");
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(format!("pdfpop-{stem}.json"))
    }

    /// Default populated-output name for a form: `pdfpop-<stem>.pdf`.
    pub fn default_output_name(form_path: &Path) -> String {
        let stem = form_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("form");
        format!("pdfpop-{stem}.pdf")
    }
}

/// Strip a bracketed type annotation suffix: `"Name [text]"` → `"Name"`.
pub fn strip_type_suffix(name: &str) -> &str {
    name.split(" [").next().unwrap_or(name)
}
