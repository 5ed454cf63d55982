//! Value resolver
//!
//! Turns the mapping's fields section plus one record into the values the
//! fill strategies write. Resolution order per field is significant:
//! null is ignored, a numeric literal passes through untouched, a string
//! that exactly matches a record column copies that column, and only then
//! is the string evaluated as an expression. A column name that also
//! happens to parse as an expression is therefore still a column copy.

use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use tracing::info;

use crate::data::Record;
use crate::error::{PdfPopError, Result};
use crate::expr::{self, Value};

/// Outcome of resolving a fields section against one record.
#[derive(Debug)]
pub struct Resolved {
    /// Field name → value to write, in mapping order.
    pub values: IndexMap<String, Value>,
    /// Fields mapped to null, left untouched in the document.
    pub ignored: Vec<String>,
}

/// Resolve every field of a mapping section against `record`.
///
/// Expression failures abort the whole run, naming the field and the
/// offending expression.
pub fn resolve_fields(
    specs: &IndexMap<String, JsonValue>,
    record: &Record,
) -> Result<Resolved> {
    let mut values = IndexMap::new();
    let mut ignored = Vec::new();
    for (name, spec) in specs {
        if spec.is_null() {
            ignored.push(name.clone());
            continue;
        }
        let value = resolve_spec(name, spec, record)?;
        info!(field = name.as_str(), "set field {name:?} to \"{value}\"");
        values.insert(name.clone(), value);
    }
    for name in &ignored {
        info!(field = name.as_str(), "ignored field {name:?}");
    }
    Ok(Resolved { values, ignored })
}

fn resolve_spec(field: &str, spec: &JsonValue, record: &Record) -> Result<Value> {
    match spec {
        JsonValue::Null => Ok(Value::Null),
        JsonValue::Bool(b) => Ok(Value::Bool(*b)),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Int(i))
            } else {
                // serde_json numbers are i64, u64 or finite f64.
                Ok(Value::Float(n.as_f64().unwrap_or_default()))
            }
        }
        JsonValue::String(s) => {
            if let Some(column_value) = record.get(s) {
                return Ok(Value::Str(column_value.clone()));
            }
            expr::evaluate(s, record).map_err(|source| PdfPopError::Expression {
                field: field.to_string(),
                expr: s.clone(),
                source,
            })
        }
        JsonValue::Array(items) => {
            let mut resolved = Vec::with_capacity(items.len());
            for item in items {
                resolved.push(resolve_spec(field, item, record)?);
            }
            Ok(Value::List(resolved))
        }
        JsonValue::Object(_) => Err(PdfPopError::InvalidConfig(format!(
            "field {field:?} maps to an object; expected null, literal, column or expression"
        ))),
    }
}

/// Lenient single-entry interpretation for the io section.
///
/// An entry matching a record column is substituted; an entry that
/// evaluates as an expression uses the result; anything else (paths,
/// file name templates) is kept as the literal string.
pub fn interpret_io_entry(raw: &str, record: &Record) -> String {
    if let Some(column_value) = record.get(raw) {
        return column_value.clone();
    }
    match expr::evaluate(raw, record) {
        Ok(Value::Null) | Err(_) => raw.to_string(),
        Ok(value) => value.to_string(),
    }
}
