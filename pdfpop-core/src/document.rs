//! Document model adapter
//!
//! A thin read/write wrapper around [`lopdf::Document`] exposing exactly
//! what widget discovery and the fill strategies need: ordered page
//! iteration, annotation lists, typed dictionary accessors, PDF text
//! string decode/encode and the form-level `NeedAppearances` flag. This
//! module is the only place that touches the PDF binary format.

use std::path::Path;

use lopdf::{Dictionary, Object, ObjectId, StringFormat};

use crate::error::{PdfPopError, Result};

/// A loaded PDF form document.
pub struct FormDocument {
    inner: lopdf::Document,
}

impl FormDocument {
    /// Load a document from disk.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(PdfPopError::NotFound(path.to_path_buf()));
        }
        let inner = lopdf::Document::load(path)?;
        Ok(Self { inner })
    }

    /// Wrap an already-built document. Used by tests and callers that
    /// assemble documents in memory.
    pub fn from_document(inner: lopdf::Document) -> Self {
        Self { inner }
    }

    /// Serialize the (possibly mutated) document to `path`.
    pub fn save(&mut self, path: &Path) -> Result<()> {
        self.inner.save(path)?;
        Ok(())
    }

    /// Page object ids in page order.
    pub fn pages(&self) -> Vec<ObjectId> {
        self.inner.get_pages().into_values().collect()
    }

    /// Annotation object ids of one page, in array order.
    ///
    /// Pages without an `/Annots` entry yield an empty list. Only indirect
    /// annotations are returned; widgets are required to be indirect
    /// objects since the AcroForm field tree references them.
    pub fn annotations(&self, page: ObjectId) -> Result<Vec<ObjectId>> {
        let page_dict = self.dict(page)?;
        let Ok(annots) = page_dict.get(b"Annots") else {
            return Ok(Vec::new());
        };
        let annots = self.resolve(annots)?;
        let array = annots.as_array()?;
        Ok(array
            .iter()
            .filter_map(|obj| obj.as_reference().ok())
            .collect())
    }

    /// Dictionary of an indirect object.
    pub fn dict(&self, id: ObjectId) -> Result<&Dictionary> {
        Ok(self.inner.get_object(id)?.as_dict()?)
    }

    /// Mutable dictionary of an indirect object.
    pub fn dict_mut(&mut self, id: ObjectId) -> Result<&mut Dictionary> {
        Ok(self.inner.get_object_mut(id)?.as_dict_mut()?)
    }

    /// Follow references until a direct object is reached.
    pub fn resolve<'a>(&'a self, mut obj: &'a Object) -> Result<&'a Object> {
        while let Object::Reference(id) = obj {
            obj = self.inner.get_object(*id)?;
        }
        Ok(obj)
    }

    /// Text string entry (`/T` and friends), decoded.
    pub fn text_entry(&self, id: ObjectId, key: &[u8]) -> Option<String> {
        let obj = self.entry(id, key)?;
        match obj {
            Object::String(bytes, _) => Some(decode_text(bytes)),
            Object::Name(bytes) => Some(decode_text(bytes)),
            _ => None,
        }
    }

    /// Name entry (`/FT`, `/Subtype`), without the leading slash.
    pub fn name_entry(&self, id: ObjectId, key: &[u8]) -> Option<String> {
        match self.entry(id, key)? {
            Object::Name(bytes) => Some(decode_text(bytes)),
            _ => None,
        }
    }

    /// Integer entry (`/Ff`).
    pub fn int_entry(&self, id: ObjectId, key: &[u8]) -> Option<i64> {
        self.entry(id, key)?.as_i64().ok()
    }

    /// Reference entry (`/Parent`), not followed.
    pub fn reference_entry(&self, id: ObjectId, key: &[u8]) -> Option<ObjectId> {
        self.dict(id).ok()?.get(key).ok()?.as_reference().ok()
    }

    /// Dictionary entry (`/AP`), resolved.
    pub fn dict_entry(&self, id: ObjectId, key: &[u8]) -> Option<&Dictionary> {
        match self.entry(id, key)? {
            Object::Dictionary(dict) => Some(dict),
            _ => None,
        }
    }

    /// Array entry (`/Kids`, `/Opt`), resolved and cloned.
    pub fn array_entry(&self, id: ObjectId, key: &[u8]) -> Option<Vec<Object>> {
        match self.entry(id, key)? {
            Object::Array(items) => Some(items.clone()),
            _ => None,
        }
    }

    fn entry(&self, id: ObjectId, key: &[u8]) -> Option<&Object> {
        let obj = self.dict(id).ok()?.get(key).ok()?;
        self.resolve(obj).ok()
    }

    /// Set the interactive form's `NeedAppearances` flag so viewers
    /// regenerate widget appearance streams. A document without an
    /// AcroForm has nothing to flag.
    pub fn set_need_appearances(&mut self) -> Result<()> {
        let root_id = self.inner.trailer.get(b"Root")?.as_reference()?;
        let catalog = self.dict(root_id)?;
        let form_ref = match catalog.get(b"AcroForm") {
            Err(_) => return Ok(()),
            Ok(Object::Reference(id)) => Some(*id),
            Ok(_) => None,
        };
        match form_ref {
            Some(id) => {
                self.dict_mut(id)?
                    .set("NeedAppearances", Object::Boolean(true));
            }
            None => {
                let catalog = self.dict_mut(root_id)?;
                if let Ok(form) = catalog.get_mut(b"AcroForm") {
                    if let Ok(dict) = form.as_dict_mut() {
                        dict.set("NeedAppearances", Object::Boolean(true));
                    }
                }
            }
        }
        Ok(())
    }

    /// Whether the form-level `NeedAppearances` flag is currently set.
    pub fn need_appearances(&self) -> bool {
        let Ok(root) = self.inner.trailer.get(b"Root").and_then(|o| o.as_reference()) else {
            return false;
        };
        let Ok(catalog) = self.dict(root) else {
            return false;
        };
        let Ok(form) = catalog.get(b"AcroForm") else {
            return false;
        };
        let Ok(form) = self.resolve(form) else {
            return false;
        };
        form.as_dict()
            .ok()
            .and_then(|d| d.get(b"NeedAppearances").ok())
            .and_then(|o| o.as_bool().ok())
            .unwrap_or(false)
    }
}

/// Decode a PDF text string: UTF-16BE with BOM, else UTF-8, else Latin-1.
pub fn decode_text(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let units: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        String::from_utf16_lossy(&units)
    } else {
        String::from_utf8(bytes.to_vec())
            .unwrap_or_else(|_| bytes.iter().map(|&b| b as char).collect())
    }
}

/// Encode a text value as a PDF string object: plain bytes for ASCII,
/// UTF-16BE with BOM otherwise.
pub fn encode_text(text: &str) -> Object {
    if text.is_ascii() {
        Object::String(text.as_bytes().to_vec(), StringFormat::Literal)
    } else {
        let mut bytes = vec![0xFE, 0xFF];
        for unit in text.encode_utf16() {
            bytes.extend_from_slice(&unit.to_be_bytes());
        }
        Object::String(bytes, StringFormat::Literal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_ascii() {
        assert_eq!(decode_text(b"Hello"), "Hello");
    }

    #[test]
    fn test_decode_utf16be() {
        let bytes = [0xFE, 0xFF, 0x00, 0x48, 0x00, 0x69];
        assert_eq!(decode_text(&bytes), "Hi");
    }

    #[test]
    fn test_decode_latin1_fallback() {
        // 0xE9 is not valid UTF-8 on its own; Latin-1 maps it to é.
        assert_eq!(decode_text(&[0x63, 0x61, 0x66, 0xE9]), "café");
    }

    #[test]
    fn test_encode_ascii_round_trip() {
        let obj = encode_text("Jane Doe");
        match obj {
            Object::String(bytes, StringFormat::Literal) => {
                assert_eq!(bytes, b"Jane Doe");
            }
            other => panic!("expected literal string, got {other:?}"),
        }
    }

    #[test]
    fn test_encode_non_ascii_uses_utf16() {
        let obj = encode_text("café");
        match obj {
            Object::String(bytes, _) => {
                assert_eq!(&bytes[..2], &[0xFE, 0xFF]);
                assert_eq!(decode_text(&bytes), "café");
            }
            other => panic!("expected string, got {other:?}"),
        }
    }
}
