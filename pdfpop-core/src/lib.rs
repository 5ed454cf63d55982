//! # pdfpop
//!
//! Populate interactive PDF form fields from rows of tabular data,
//! driven by a declarative field-mapping configuration.
//!
//! The engine walks a form's widget annotations, classifies each control
//! (text, checkbox, radio, combo, list), resolves a value for it from
//! one record of a spreadsheet or CSV file — by literal, column copy or
//! a small sandboxed expression — and writes type-correct updates back
//! into the annotation dictionaries, flagging the form for appearance
//! regeneration so viewers re-render the fields.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! # fn main() -> pdfpop::Result<()> {
//! // Generate a mapping scaffold for a template...
//! let config = pdfpop::generate_config(Path::new("w9.pdf"))?;
//! // ...edit the scaffold's fields section, then populate:
//! pdfpop::run(&config, Path::new("people.xlsx"))?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod data;
pub mod document;
pub mod error;
pub mod expr;
pub mod forms;
pub mod operations;
pub mod resolver;

pub use config::{strip_type_suffix, FormConfig};
pub use data::{read_records, Record};
pub use document::FormDocument;
pub use error::{PdfPopError, Result};
pub use expr::Value;
pub use forms::{discover_fields, populate, FieldType, FillContext, Widget};
pub use operations::{generate_config, run};
pub use resolver::{resolve_fields, Resolved};
