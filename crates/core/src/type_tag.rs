//! Caller-supplied type tags
//!
//! Hosts state the type of a get result or a put payload explicitly instead
//! of letting the engine guess. Tag names follow the host's SQL type names,
//! so `bigint`, `int8` and `int64` all name the same tag.

use crate::error::Error;
use crate::value::Value;
use std::fmt;
use std::str::FromStr;

/// Element type of a typed array tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementTag {
    /// 64-bit signed integer elements
    Int64,
    /// UTF-8 string elements
    Text,
    /// Boolean elements
    Boolean,
    /// IEEE-754 double elements
    Double,
    /// Nested document elements
    Document,
}

impl ElementTag {
    /// Canonical tag name
    pub fn name(&self) -> &'static str {
        match self {
            ElementTag::Int64 => "int64",
            ElementTag::Text => "text",
            ElementTag::Boolean => "boolean",
            ElementTag::Double => "double",
            ElementTag::Document => "document",
        }
    }

    /// Check whether a value has exactly this element type
    pub fn matches(&self, value: &Value) -> bool {
        matches!(
            (self, value),
            (ElementTag::Int64, Value::Int(_))
                | (ElementTag::Text, Value::String(_))
                | (ElementTag::Boolean, Value::Bool(_))
                | (ElementTag::Double, Value::Float(_))
                | (ElementTag::Document, Value::Document(_))
        )
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "int64" | "bigint" | "int8" | "int" | "integer" => Some(ElementTag::Int64),
            "text" | "varchar" | "string" => Some(ElementTag::Text),
            "boolean" | "bool" => Some(ElementTag::Boolean),
            "double" | "double precision" | "float8" | "float" => Some(ElementTag::Double),
            "document" => Some(ElementTag::Document),
            _ => None,
        }
    }
}

/// Type tag of a get/put/delete payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    /// `int64`
    Int64,
    /// `text`
    Text,
    /// `boolean`
    Boolean,
    /// `double`
    Double,
    /// `document`: a nested whole document
    Document,
    /// Typed array such as `text[]`
    Array(ElementTag),
}

impl TypeTag {
    /// Check whether a stored value has exactly this type
    ///
    /// There is no numeric coercion: `Int` never matches `double`. An array
    /// tag matches an Array whose elements all match the element tag, so an
    /// empty Array matches every array tag.
    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (TypeTag::Int64, Value::Int(_))
            | (TypeTag::Text, Value::String(_))
            | (TypeTag::Boolean, Value::Bool(_))
            | (TypeTag::Double, Value::Float(_))
            | (TypeTag::Document, Value::Document(_)) => true,
            (TypeTag::Array(elem), Value::Array(items)) => items.iter().all(|v| elem.matches(v)),
            _ => false,
        }
    }

    /// Check if this is an array tag
    pub fn is_array(&self) -> bool {
        matches!(self, TypeTag::Array(_))
    }

    fn scalar(elem: ElementTag) -> Self {
        match elem {
            ElementTag::Int64 => TypeTag::Int64,
            ElementTag::Text => TypeTag::Text,
            ElementTag::Boolean => TypeTag::Boolean,
            ElementTag::Double => TypeTag::Double,
            ElementTag::Document => TypeTag::Document,
        }
    }
}

impl FromStr for TypeTag {
    type Err = Error;

    /// Parse a tag name, case-insensitively
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        let unknown = || Error::UnknownTypeTag(s.to_string());

        match normalized.strip_suffix("[]") {
            Some(elem) => ElementTag::from_name(elem.trim_end())
                .map(TypeTag::Array)
                .ok_or_else(unknown),
            None => ElementTag::from_name(&normalized)
                .map(TypeTag::scalar)
                .ok_or_else(unknown),
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeTag::Int64 => f.write_str("int64"),
            TypeTag::Text => f.write_str("text"),
            TypeTag::Boolean => f.write_str("boolean"),
            TypeTag::Double => f.write_str("double"),
            TypeTag::Document => f.write_str("document"),
            TypeTag::Array(elem) => write!(f, "{}[]", elem.name()),
        }
    }
}
