//! Value types for docengine
//!
//! This module defines:
//! - Value: tagged union for every document value
//! - Document: insertion-ordered mapping from key to Value
//!
//! ## Type Rules
//!
//! - Seven variants only: Null, Bool, Int, Float, String, Array, Document
//! - No implicit coercions: `Int(1) != Float(1.0)`
//! - Float uses IEEE-754 equality: `NaN != NaN`, `-0.0 == 0.0`
//! - Document equality compares key sets and values, not entry order
//! - Array equality is order-sensitive
//!
//! Equality, nesting depth and drop walk containers iteratively. `Clone` and
//! `Debug` are derived and recurse once per level.

use indexmap::IndexMap;

/// A document: unique string keys mapped to values.
///
/// Entry order is the insertion order and survives an encode/decode cycle.
/// Overwriting an existing key keeps its position.
pub type Document = IndexMap<String, Value>;

/// Document value
///
/// A stored document is always a [`Value::Document`] at the top level; the
/// other variants appear nested inside it.
#[derive(Debug, Clone)]
pub enum Value {
    /// Null value
    Null,
    /// Boolean value
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit floating point (IEEE-754)
    Float(f64),
    /// UTF-8 string
    String(String),
    /// Ordered, possibly heterogeneous, sequence of values
    Array(Vec<Value>),
    /// Nested document
    Document(Document),
}

// Custom PartialEq implementation for IEEE-754 float semantics.
// Containers are compared with an explicit stack, so depth is bounded by
// heap memory rather than the call stack.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        let mut pending = vec![(self, other)];
        while let Some(pair) = pending.pop() {
            match pair {
                (Value::Null, Value::Null) => {}
                (Value::Bool(a), Value::Bool(b)) if a == b => {}
                (Value::Int(a), Value::Int(b)) if a == b => {}
                // IEEE-754: NaN != NaN, -0.0 == 0.0
                (Value::Float(a), Value::Float(b)) if a == b => {}
                (Value::String(a), Value::String(b)) if a == b => {}
                (Value::Array(a), Value::Array(b)) if a.len() == b.len() => {
                    pending.extend(a.iter().zip(b));
                }
                (Value::Document(a), Value::Document(b)) if a.len() == b.len() => {
                    for (key, value) in a {
                        match b.get(key) {
                            Some(other) => pending.push((value, other)),
                            None => return false,
                        }
                    }
                }
                // Different types or contents
                _ => return false,
            }
        }
        true
    }
}

// Dropping moves nested containers onto a heap stack instead of recursing
// through the default drop glue.
impl Drop for Value {
    fn drop(&mut self) {
        let mut pending: Vec<Value> = match self {
            Value::Array(items) if items.iter().any(Value::has_children) => std::mem::take(items),
            Value::Document(doc) if doc.values().any(Value::has_children) => {
                doc.drain(..).map(|(_, value)| value).collect()
            }
            _ => return,
        };
        while let Some(mut value) = pending.pop() {
            match &mut value {
                Value::Array(items) => pending.append(items),
                Value::Document(doc) => pending.extend(doc.drain(..).map(|(_, value)| value)),
                _ => {}
            }
        }
    }
}

impl Value {
    /// Create an empty document value
    pub fn document() -> Self {
        Value::Document(Document::new())
    }

    /// Create an empty array value
    pub fn array() -> Self {
        Value::Array(Vec::new())
    }

    /// Get the type name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "int64",
            Value::Float(_) => "double",
            Value::String(_) => "text",
            Value::Array(_) => "array",
            Value::Document(_) => "document",
        }
    }

    /// Check if this is a null value
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Check if this is a boolean value
    pub fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    /// Check if this is an integer value
    pub fn is_int(&self) -> bool {
        matches!(self, Value::Int(_))
    }

    /// Check if this is a float value
    pub fn is_float(&self) -> bool {
        matches!(self, Value::Float(_))
    }

    /// Check if this is a string value
    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    /// Check if this is an array value
    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    /// Check if this is a document value
    pub fn is_document(&self) -> bool {
        matches!(self, Value::Document(_))
    }

    /// Get as bool if this is a Bool value
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as i64 if this is an Int value
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get as f64 if this is a Float value
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Get as &str if this is a String value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get as &[Value] if this is an Array value
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Get as &Document if this is a Document value
    pub fn as_document(&self) -> Option<&Document> {
        match self {
            Value::Document(d) => Some(d),
            _ => None,
        }
    }

    /// Consume the value, returning the string if it is one
    pub fn into_string(mut self) -> Option<String> {
        match &mut self {
            Value::String(s) => Some(std::mem::take(s)),
            _ => None,
        }
    }

    /// Consume the value, returning the elements if it is an array
    pub fn into_array(mut self) -> Option<Vec<Value>> {
        match &mut self {
            Value::Array(items) => Some(std::mem::take(items)),
            _ => None,
        }
    }

    /// Consume the value, returning the document if it is one
    pub fn into_document(mut self) -> Option<Document> {
        match &mut self {
            Value::Document(d) => Some(std::mem::take(d)),
            _ => None,
        }
    }

    fn has_children(&self) -> bool {
        match self {
            Value::Array(items) => !items.is_empty(),
            Value::Document(doc) => !doc.is_empty(),
            _ => false,
        }
    }

    /// Nesting depth of this value
    ///
    /// Scalars have depth 0; every Array or Document level adds one.
    pub fn nesting_depth(&self) -> usize {
        let mut deepest = 0;
        let mut pending = vec![(self, 0usize)];
        while let Some((value, depth)) = pending.pop() {
            match value {
                Value::Array(items) => {
                    deepest = deepest.max(depth + 1);
                    pending.extend(items.iter().map(|item| (item, depth + 1)));
                }
                Value::Document(doc) => {
                    deepest = deepest.max(depth + 1);
                    pending.extend(doc.values().map(|item| (item, depth + 1)));
                }
                _ => {}
            }
        }
        deepest
    }
}

// ============================================================================
// From implementations for ergonomic API usage
// ============================================================================

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<Document> for Value {
    fn from(d: Document) -> Self {
        Value::Document(d)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}
