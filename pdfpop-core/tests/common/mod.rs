//! Shared helpers for building interactive-form documents in memory.

use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, StringFormat};

pub fn text_string(s: &str) -> Object {
    Object::String(s.as_bytes().to_vec(), StringFormat::Literal)
}

pub fn name(s: &str) -> Object {
    Object::Name(s.as_bytes().to_vec())
}

/// Builds a single-page document whose annotations are form widgets.
pub struct FormBuilder {
    pub doc: Document,
    annotations: Vec<ObjectId>,
}

impl FormBuilder {
    pub fn new() -> Self {
        Self {
            doc: Document::with_version("1.5"),
            annotations: Vec::new(),
        }
    }

    /// Add a widget annotation to the page.
    pub fn add_annotation(&mut self, dict: Dictionary) -> ObjectId {
        let id = self.doc.add_object(dict);
        self.annotations.push(id);
        id
    }

    /// Add a text field named `field` to the page.
    pub fn add_text_field(&mut self, field: &str) -> ObjectId {
        self.add_annotation(dictionary! {
            "Subtype" => name("Widget"),
            "T" => text_string(field),
            "FT" => name("Tx"),
        })
    }

    /// Add a checkbox named `field` to the page.
    pub fn add_checkbox(&mut self, field: &str) -> ObjectId {
        self.add_annotation(dictionary! {
            "Subtype" => name("Widget"),
            "T" => text_string(field),
            "FT" => name("Btn"),
        })
    }

    /// Add a combo box with (export, display) options.
    pub fn add_combo(&mut self, field: &str, options: &[(&str, &str)]) -> ObjectId {
        let opt: Vec<Object> = options
            .iter()
            .map(|(export, display)| {
                Object::Array(vec![text_string(export), text_string(display)])
            })
            .collect();
        self.add_annotation(dictionary! {
            "Subtype" => name("Widget"),
            "T" => text_string(field),
            "FT" => name("Ch"),
            "Ff" => Object::Integer(1 << 17),
            "Opt" => Object::Array(opt),
        })
    }

    /// Add a list box with (export, display) options.
    pub fn add_list(&mut self, field: &str, options: &[(&str, &str)]) -> ObjectId {
        let opt: Vec<Object> = options
            .iter()
            .map(|(export, display)| {
                Object::Array(vec![text_string(export), text_string(display)])
            })
            .collect();
        self.add_annotation(dictionary! {
            "Subtype" => name("Widget"),
            "T" => text_string(field),
            "FT" => name("Ch"),
            "Opt" => Object::Array(opt),
        })
    }

    /// Add a radio group: a non-annotation parent field holding the name,
    /// plus one unnamed kid widget per on-state.
    pub fn add_radio_group(&mut self, field: &str, on_states: &[&str]) -> (ObjectId, Vec<ObjectId>) {
        let parent_id = self.doc.new_object_id();
        let mut kid_ids = Vec::new();
        for state in on_states {
            let kid = self.add_annotation(dictionary! {
                "Subtype" => name("Widget"),
                "Parent" => Object::Reference(parent_id),
                "AP" => Object::Dictionary(dictionary! {
                    "N" => Object::Dictionary(dictionary! {
                        *state => text_string(""),
                        "Off" => text_string(""),
                    }),
                }),
            });
            kid_ids.push(kid);
        }
        let kids: Vec<Object> = kid_ids.iter().map(|id| Object::Reference(*id)).collect();
        self.doc.objects.insert(
            parent_id,
            Object::Dictionary(dictionary! {
                "T" => text_string(field),
                "FT" => name("Btn"),
                "Ff" => Object::Integer(1 << 15),
                "Kids" => Object::Array(kids),
            }),
        );
        (parent_id, kid_ids)
    }

    /// Assemble page tree, AcroForm and catalog; returns the document.
    pub fn finish(mut self) -> Document {
        let pages_id = self.doc.new_object_id();
        let annots: Vec<Object> = self
            .annotations
            .iter()
            .map(|id| Object::Reference(*id))
            .collect();
        let page_id = self.doc.add_object(dictionary! {
            "Type" => name("Page"),
            "Parent" => Object::Reference(pages_id),
            "MediaBox" => Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(612),
                Object::Integer(792),
            ]),
            "Annots" => Object::Array(annots.clone()),
        });
        self.doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => name("Pages"),
                "Kids" => Object::Array(vec![Object::Reference(page_id)]),
                "Count" => Object::Integer(1),
            }),
        );
        let acroform_id = self.doc.add_object(dictionary! {
            "Fields" => Object::Array(annots),
        });
        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => name("Catalog"),
            "Pages" => Object::Reference(pages_id),
            "AcroForm" => Object::Reference(acroform_id),
        });
        self.doc.trailer.set("Root", Object::Reference(catalog_id));
        self.doc
    }
}
