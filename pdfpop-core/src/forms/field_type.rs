//! Form field classification per ISO 32000-1 Section 12.7.4

use bitflags::bitflags;
use std::fmt;

use crate::error::{PdfPopError, Result};

bitflags! {
    /// Field flag bits (`/Ff`) relevant to classification.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FieldFlags: u32 {
        /// Bit 16: button field is a radio group.
        const RADIO = 1 << 15;
        /// Bit 18: choice field is a combo box.
        const COMBO = 1 << 17;
    }
}

impl FieldFlags {
    /// Build from a raw `/Ff` integer; unknown bits are kept out.
    pub fn from_raw(raw: i64) -> Self {
        Self::from_bits_truncate(raw as u32)
    }
}

/// Interactive control type of a widget annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Text,
    Checkbox,
    Radio,
    Combo,
    List,
}

impl FieldType {
    /// Classify a widget by its `/FT` type code and `/Ff` flag bits.
    ///
    /// Any type code outside {Tx, Ch, Btn} is an explicit failure; a
    /// control we cannot fill must never be dropped silently.
    pub fn classify(field: &str, type_code: &str, flags: FieldFlags) -> Result<Self> {
        match type_code {
            "Tx" => Ok(FieldType::Text),
            "Ch" => {
                if flags.contains(FieldFlags::COMBO) {
                    Ok(FieldType::Combo)
                } else {
                    Ok(FieldType::List)
                }
            }
            "Btn" => {
                if flags.contains(FieldFlags::RADIO) {
                    Ok(FieldType::Radio)
                } else {
                    Ok(FieldType::Checkbox)
                }
            }
            other => Err(PdfPopError::UnsupportedFieldType {
                field: field.to_string(),
                type_code: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldType::Text => "text",
            FieldType::Checkbox => "checkbox",
            FieldType::Radio => "radio",
            FieldType::Combo => "combo",
            FieldType::List => "list",
        };
        write!(f, "{name}")
    }
}
