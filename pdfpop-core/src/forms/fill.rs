//! Fill strategies
//!
//! One mutation procedure per control type, dispatched by the widget's
//! classification. Each strategy rewrites the annotation's value and
//! appearance-state entries in place; the viewer re-renders everything
//! once the form-level `NeedAppearances` flag is set.

use std::collections::HashSet;

use indexmap::IndexMap;
use lopdf::{Object, ObjectId};
use tracing::info;

use crate::document::{decode_text, encode_text, FormDocument};
use crate::error::{PdfPopError, Result};
use crate::expr::Value;
use crate::forms::{walk_widgets, FieldType, Widget};

/// Strings coerced to a checked checkbox, compared case-insensitively.
const CHECKED_WORDS: &[&str] = &["x", "true", "t", "yes", "y", "on", "check", "checked"];

/// Per-run fill state.
///
/// A radio group's kids each walk as their own widget naming the shared
/// parent; the processed set makes the group's strategy run once per
/// field name. The context lives for exactly one run and is discarded
/// with it.
#[derive(Debug, Default)]
pub struct FillContext {
    processed_radio_groups: HashSet<String>,
}

/// Apply every resolved value to its widget.
///
/// Widgets whose field name has no resolved value are left untouched.
pub fn populate(doc: &mut FormDocument, values: &IndexMap<String, Value>) -> Result<()> {
    let widgets = walk_widgets(doc)?;
    let mut ctx = FillContext::default();
    for widget in &widgets {
        if let Some(value) = values.get(&widget.name) {
            fill_field(doc, widget, value, &mut ctx)?;
        }
    }
    Ok(())
}

/// Apply one resolved value to one widget.
pub fn fill_field(
    doc: &mut FormDocument,
    widget: &Widget,
    value: &Value,
    ctx: &mut FillContext,
) -> Result<()> {
    match widget.field_type {
        FieldType::Text => fill_text(doc, widget, value),
        FieldType::Checkbox => fill_checkbox(doc, widget, value),
        FieldType::Combo => fill_combo(doc, widget, value),
        FieldType::List => fill_list(doc, widget, value),
        FieldType::Radio => fill_radio(doc, widget, value, ctx),
    }
}

fn fill_text(doc: &mut FormDocument, widget: &Widget, value: &Value) -> Result<()> {
    let encoded = encode_text(&value.to_string());
    let dict = doc.dict_mut(widget.annotation)?;
    dict.set("V", encoded.clone());
    dict.set("AS", encoded);
    dict.remove(b"AP");
    Ok(())
}

fn fill_checkbox(doc: &mut FormDocument, widget: &Widget, value: &Value) -> Result<()> {
    let checked = match value {
        Value::Bool(b) => *b,
        other => {
            let text = other.to_string();
            let coerced = CHECKED_WORDS.contains(&text.to_lowercase().as_str());
            info!(
                field = widget.name.as_str(),
                "treating {text:?} as {coerced} for checkbox"
            );
            coerced
        }
    };
    let state: &[u8] = if checked { b"Yes" } else { b"Off" };
    doc.dict_mut(widget.annotation)?
        .set("V", Object::Name(state.to_vec()));
    Ok(())
}

fn fill_combo(doc: &mut FormDocument, widget: &Widget, value: &Value) -> Result<()> {
    let display = value.to_string();
    let export = lookup_export(doc, widget, &display)?;
    let encoded = encode_text(&export);
    let dict = doc.dict_mut(widget.annotation)?;
    dict.set("V", encoded.clone());
    dict.set("AS", encoded);
    dict.remove(b"AP");
    Ok(())
}

fn fill_list(doc: &mut FormDocument, widget: &Widget, value: &Value) -> Result<()> {
    let selections: Vec<String> = match value {
        Value::List(items) => items.iter().map(|item| item.to_string()).collect(),
        single => vec![single.to_string()],
    };
    let mut exports = Vec::with_capacity(selections.len());
    for display in &selections {
        exports.push(encode_text(&lookup_export(doc, widget, display)?));
    }
    // One empty appearance placeholder per selected value.
    let placeholders: Vec<Object> = exports.iter().map(|_| encode_text("")).collect();
    let dict = doc.dict_mut(widget.annotation)?;
    dict.set("V", Object::Array(exports.clone()));
    dict.set("AS", Object::Array(exports));
    dict.set("AP", Object::Array(placeholders));
    Ok(())
}

fn fill_radio(
    doc: &mut FormDocument,
    widget: &Widget,
    value: &Value,
    ctx: &mut FillContext,
) -> Result<()> {
    if !ctx.processed_radio_groups.insert(widget.name.clone()) {
        return Ok(());
    }
    let desired = value.to_string();
    let kids: Vec<ObjectId> = doc
        .array_entry(widget.annotation, b"Kids")
        .unwrap_or_default()
        .iter()
        .filter_map(|obj| obj.as_reference().ok())
        .collect();
    let states: Vec<(ObjectId, Option<String>)> = kids
        .into_iter()
        .map(|kid| {
            let on_state = kid_on_state(doc, kid);
            (kid, on_state)
        })
        .collect();
    for (kid, on_state) in states {
        let state: Vec<u8> = if on_state.as_deref() == Some(desired.as_str()) {
            desired.clone().into_bytes()
        } else {
            b"Off".to_vec()
        };
        doc.dict_mut(kid)?.set("AS", Object::Name(state));
    }
    // The group value is set whether or not any kid matched; an unmatched
    // value leaves every button off.
    doc.dict_mut(widget.annotation)?
        .set("V", Object::Name(desired.into_bytes()));
    Ok(())
}

/// A kid's "on" export name is the single key of its normal appearance
/// dictionary other than the universal "Off" state.
fn kid_on_state(doc: &FormDocument, kid: ObjectId) -> Option<String> {
    let ap = doc.dict_entry(kid, b"AP")?;
    let normal = doc.resolve(ap.get(b"N").ok()?).ok()?.as_dict().ok()?;
    normal
        .iter()
        .map(|(key, _)| decode_text(key))
        .find(|name| name != "Off")
}

/// Find the export value whose display label matches `display` among the
/// widget's `/Opt` pairs.
fn lookup_export(doc: &FormDocument, widget: &Widget, display: &str) -> Result<String> {
    for (export, label) in options(doc, widget.annotation) {
        if label == display {
            return Ok(export);
        }
    }
    Err(PdfPopError::LookupFailure {
        field: widget.name.clone(),
        value: display.to_string(),
    })
}

/// The widget's `/Opt` entries as (export value, display label) pairs.
/// A bare string option exports itself.
fn options(doc: &FormDocument, id: ObjectId) -> Vec<(String, String)> {
    let Some(items) = doc.array_entry(id, b"Opt") else {
        return Vec::new();
    };
    let mut pairs = Vec::new();
    for item in &items {
        let Ok(item) = doc.resolve(item) else {
            continue;
        };
        match item {
            Object::String(bytes, _) => {
                let text = decode_text(bytes);
                pairs.push((text.clone(), text));
            }
            Object::Array(pair) if pair.len() == 2 => {
                let export = pair[0].as_str().map(decode_text);
                let label = pair[1].as_str().map(decode_text);
                if let (Ok(export), Ok(label)) = (export, label) {
                    pairs.push((export, label));
                }
            }
            _ => {}
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_words_cover_spec_set() {
        for word in ["x", "X", "yes", "Y", "on", "checked", "TRUE", "t"] {
            assert!(
                CHECKED_WORDS.contains(&word.to_lowercase().as_str()),
                "{word} should coerce to checked"
            );
        }
        for word in ["no", "off", "0", ""] {
            assert!(!CHECKED_WORDS.contains(&word.to_lowercase().as_str()));
        }
    }
}
