use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PdfPopError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("File already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("Unsupported field type {type_code:?} for field {field:?}")]
    UnsupportedFieldType { field: String, type_code: String },

    #[error("No option with display value {value:?} on field {field:?}")]
    LookupFailure { field: String, value: String },

    #[error("Failed to evaluate expression {expr:?} for field {field:?}: {source}")]
    Expression {
        field: String,
        expr: String,
        #[source]
        source: crate::expr::ExprError,
    },

    #[error("Unsupported data file type: {0:?}")]
    UnsupportedDataFormat(String),

    #[error("Invalid form configuration: {0}")]
    InvalidConfig(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, PdfPopError>;
