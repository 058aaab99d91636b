//! Typed result of a get

use docengine_codec::{binary, text};
use docengine_core::{Result, TypeTag, Value};

/// A stored value projected onto the requested type tag
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    /// `int64`
    Int(i64),
    /// `text`
    Text(String),
    /// `boolean`
    Bool(bool),
    /// `double`
    Double(f64),
    /// `document`, as a standalone encoded document
    Document(Vec<u8>),
    /// Any array tag; every element matches the element tag
    Array(Vec<Value>),
}

impl Output {
    /// Tag this output was projected onto, `None` for arrays
    ///
    /// An array output does not record its element tag.
    pub fn scalar_tag(&self) -> Option<TypeTag> {
        match self {
            Output::Int(_) => Some(TypeTag::Int64),
            Output::Text(_) => Some(TypeTag::Text),
            Output::Bool(_) => Some(TypeTag::Boolean),
            Output::Double(_) => Some(TypeTag::Double),
            Output::Document(_) => Some(TypeTag::Document),
            Output::Array(_) => None,
        }
    }

    /// Convert back into a value
    ///
    /// # Errors
    ///
    /// A document output whose bytes do not decode returns `Error::Corrupt`.
    pub fn into_value(self) -> Result<Value> {
        Ok(match self {
            Output::Int(i) => Value::Int(i),
            Output::Text(s) => Value::String(s),
            Output::Bool(b) => Value::Bool(b),
            Output::Double(f) => Value::Float(f),
            Output::Document(bytes) => Value::Document(binary::decode_document(&bytes)?),
            Output::Array(items) => Value::Array(items),
        })
    }

    /// Render for display: text verbatim, everything else as JSON
    pub fn to_text(&self) -> Result<String> {
        Ok(match self {
            Output::Int(i) => i.to_string(),
            Output::Text(s) => s.clone(),
            Output::Bool(b) => b.to_string(),
            Output::Double(f) => text::to_text(&Value::Float(*f)),
            Output::Document(bytes) => text::document_to_text(&binary::decode_document(bytes)?),
            Output::Array(items) => text::to_text(&Value::Array(items.clone())),
        })
    }
}
