//! Widget discovery
//!
//! Walks every page's annotation list and produces the form's widgets in
//! page order, then in-page annotation order. A widget without its own
//! `/T` name borrows name and type from its `/Parent` annotation, one
//! level up only; grouped controls such as radio kids rely on this.
//! Widgets that resolve to no name at either level are skipped.

use lopdf::ObjectId;
use std::collections::HashSet;

use crate::document::FormDocument;
use crate::error::Result;
use crate::forms::{FieldFlags, FieldType};

/// One discovered form widget.
#[derive(Debug, Clone)]
pub struct Widget {
    /// Fully resolved field name.
    pub name: String,
    /// Control type, classified from `/FT` and `/Ff`.
    pub field_type: FieldType,
    /// The annotation carrying the field entries. For an unnamed kid this
    /// is the parent annotation, not the kid itself.
    pub annotation: ObjectId,
}

/// Every widget annotation in the document, one entry per annotation.
///
/// Kids of a grouped control each produce an entry naming the shared
/// parent; the fill path relies on this and deduplicates radio groups
/// through its run context.
pub fn walk_widgets(doc: &FormDocument) -> Result<Vec<Widget>> {
    let mut widgets = Vec::new();
    for page in doc.pages() {
        for annotation in doc.annotations(page)? {
            if doc.name_entry(annotation, b"Subtype").as_deref() != Some("Widget") {
                continue;
            }
            let direct_name = doc
                .text_entry(annotation, b"T")
                .filter(|name| !name.is_empty());
            let target = match direct_name {
                Some(_) => annotation,
                None => match doc.reference_entry(annotation, b"Parent") {
                    Some(parent) => parent,
                    None => continue,
                },
            };
            let Some(name) = doc.text_entry(target, b"T").filter(|name| !name.is_empty())
            else {
                continue;
            };
            let type_code = doc
                .name_entry(target, b"FT")
                .unwrap_or_else(|| "(none)".to_string());
            let flags = FieldFlags::from_raw(doc.int_entry(target, b"Ff").unwrap_or(0));
            let field_type = FieldType::classify(&name, &type_code, flags)?;
            widgets.push(Widget {
                name,
                field_type,
                annotation: target,
            });
        }
    }
    Ok(widgets)
}

/// Distinct fields of the document, in first-seen order.
///
/// This is the scaffold-generation view: one entry per logical field, so
/// a radio group with several kid widgets appears once.
pub fn discover_fields(doc: &FormDocument) -> Result<Vec<Widget>> {
    let mut seen = HashSet::new();
    let widgets = walk_widgets(doc)?
        .into_iter()
        .filter(|widget| seen.insert(widget.name.clone()))
        .collect();
    Ok(widgets)
}
