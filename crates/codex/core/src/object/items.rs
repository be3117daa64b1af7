//! Carryable items.

use crate::error::BuildError;
use crate::object::fields::Fields;

/// A plain carryable item.
#[derive(Clone, Debug, PartialEq)]
pub struct Item {
    pub name: String,
    pub weight: f64,
    /// Display glyph, consumed from the `char` attribute.
    pub glyph: Option<String>,
}

impl Item {
    pub(crate) fn from_fields(id: &str, fields: &mut Fields) -> Result<Self, BuildError> {
        Ok(Self {
            name: fields.str_or("name", id)?,
            weight: fields.require_float("weight")?,
            glyph: fields.take_str("char")?,
        })
    }
}
