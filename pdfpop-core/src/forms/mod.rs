//! Form widget discovery, classification and filling

mod discovery;
mod field_type;
mod fill;

pub use discovery::{discover_fields, walk_widgets, Widget};
pub use field_type::{FieldFlags, FieldType};
pub use fill::{fill_field, populate, FillContext};
