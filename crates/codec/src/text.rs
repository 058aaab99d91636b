//! JSON text surface
//!
//! Parsing goes through `serde_json` with key order preserved, then converts
//! into [`Value`]. Numbers keep their literal text while parsing
//! (`arbitrary_precision`), so an integer literal outside the i64 range is
//! rejected in either direction instead of turning into a `Float`. Literals
//! with a fraction or exponent become `Float`.
//!
//! Text nesting is capped at 128 levels by the parser. Deeper documents can
//! still be built through put and stored in binary form, and rendering
//! ([`to_text`], [`document_to_text`]) has no depth bound.

use docengine_core::{Document, ParseError, Value};
use std::fmt::Write;

/// Options for text parsing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextOptions {
    /// Omit document fields whose value is `null`
    ///
    /// Applies to fields of every nested document; `null` array elements
    /// are always kept.
    pub drop_null_fields: bool,
}

/// Parse a textual document; the top level must be an object
///
/// # Examples
///
/// ```
/// use docengine_codec::text::parse_document;
///
/// assert!(parse_document(r#"{"hello":"world"}"#).is_ok());
/// assert!(parse_document(r#"{"hello":"world", 3:"invalid key"}"#).is_err());
/// assert!(parse_document(r#"{"hello":"world", "key2":}"#).is_err());
/// assert!(parse_document(r#"{"hello":"world""#).is_err());
/// ```
pub fn parse_document(text: &str) -> Result<Document, ParseError> {
    parse_document_with(text, TextOptions::default())
}

/// Parse a textual document with options
pub fn parse_document_with(text: &str, options: TextOptions) -> Result<Document, ParseError> {
    match parse_json(text)? {
        serde_json::Value::Object(map) => from_json_object(map, options),
        other => Err(ParseError::without_position(format!(
            "top-level value must be an object, found {}",
            json_type_name(&other)
        ))),
    }
}

/// Parse any JSON value
pub fn parse_value(text: &str) -> Result<Value, ParseError> {
    parse_value_with(text, TextOptions::default())
}

/// Parse any JSON value with options
pub fn parse_value_with(text: &str, options: TextOptions) -> Result<Value, ParseError> {
    from_json(parse_json(text)?, options)
}

fn parse_json(text: &str) -> Result<serde_json::Value, ParseError> {
    serde_json::from_str(text).map_err(|e| {
        // serde_json appends the position to its message; keep it separate
        let message = e.to_string();
        let message = message
            .split(" at line ")
            .next()
            .unwrap_or_default()
            .to_string();
        ParseError::new(message, e.line(), e.column())
    })
}

/// Convert a `serde_json` value
pub fn from_json(json: serde_json::Value, options: TextOptions) -> Result<Value, ParseError> {
    match json {
        serde_json::Value::Null => Ok(Value::Null),
        serde_json::Value::Bool(b) => Ok(Value::Bool(b)),
        serde_json::Value::Number(n) => from_json_number(&n),
        serde_json::Value::String(s) => Ok(Value::String(s)),
        serde_json::Value::Array(items) => items
            .into_iter()
            .map(|item| from_json(item, options))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        serde_json::Value::Object(map) => from_json_object(map, options).map(Value::Document),
    }
}

fn from_json_object(
    map: serde_json::Map<String, serde_json::Value>,
    options: TextOptions,
) -> Result<Document, ParseError> {
    let mut doc = Document::with_capacity(map.len());
    for (key, value) in map {
        if options.drop_null_fields && value.is_null() {
            continue;
        }
        doc.insert(key, from_json(value, options)?);
    }
    Ok(doc)
}

fn from_json_number(n: &serde_json::Number) -> Result<Value, ParseError> {
    if let Some(i) = n.as_i64() {
        return Ok(Value::Int(i));
    }
    let literal = n.to_string();
    if !literal.contains(&['.', 'e', 'E'][..]) {
        return Err(ParseError::without_position(format!(
            "integer {} is out of range for int64",
            literal
        )));
    }
    n.as_f64()
        .map(Value::Float)
        .ok_or_else(|| ParseError::without_position(format!("number {} is out of range", literal)))
}

fn json_type_name(json: &serde_json::Value) -> &'static str {
    match json {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// Convert to a `serde_json` value
///
/// Non-finite floats have no JSON form and become `null`. The conversion
/// recurses once per level; use [`to_text`] for arbitrarily deep values.
pub fn to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Int(i) => serde_json::Value::Number((*i).into()),
        Value::Float(f) => float_json(*f),
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Array(items) => serde_json::Value::Array(items.iter().map(to_json).collect()),
        Value::Document(doc) => serde_json::Value::Object(
            doc.iter()
                .map(|(k, v)| (k.clone(), to_json(v)))
                .collect(),
        ),
    }
}

fn float_json(f: f64) -> serde_json::Value {
    serde_json::Number::from_f64(f)
        .map(serde_json::Value::Number)
        .unwrap_or(serde_json::Value::Null)
}

/// Render a value as compact JSON text
pub fn to_text(value: &Value) -> String {
    render(vec![Token::Value(value)])
}

/// Render a document as compact JSON text
pub fn document_to_text(doc: &Document) -> String {
    let mut pending = vec![Token::Punct('}')];
    push_entries(&mut pending, doc);
    pending.push(Token::Punct('{'));
    render(pending)
}

/// Pending output of the renderer, popped from the end
enum Token<'v> {
    Value(&'v Value),
    Key(&'v str),
    Punct(char),
}

fn push_entries<'v>(pending: &mut Vec<Token<'v>>, doc: &'v Document) {
    for (i, (key, value)) in doc.iter().enumerate().rev() {
        pending.push(Token::Value(value));
        pending.push(Token::Key(key));
        if i > 0 {
            pending.push(Token::Punct(','));
        }
    }
}

/// Write tokens until none are left; containers push their children.
///
/// Scalars and strings are formatted by `serde_json`, so the output matches
/// its compact serializer byte for byte.
fn render(mut pending: Vec<Token<'_>>) -> String {
    let mut out = String::new();
    while let Some(token) = pending.pop() {
        // Writing into a String cannot fail
        let _ = match token {
            Token::Punct(c) => {
                out.push(c);
                Ok(())
            }
            Token::Key(key) => write!(out, "{}:", serde_json::Value::from(key)),
            Token::Value(Value::Null) => write!(out, "null"),
            Token::Value(Value::Bool(b)) => write!(out, "{}", b),
            Token::Value(Value::Int(i)) => write!(out, "{}", i),
            Token::Value(Value::Float(f)) => write!(out, "{}", float_json(*f)),
            Token::Value(Value::String(s)) => write!(out, "{}", serde_json::Value::from(s.as_str())),
            Token::Value(Value::Array(items)) => {
                out.push('[');
                pending.push(Token::Punct(']'));
                for (i, item) in items.iter().enumerate().rev() {
                    pending.push(Token::Value(item));
                    if i > 0 {
                        pending.push(Token::Punct(','));
                    }
                }
                Ok(())
            }
            Token::Value(Value::Document(doc)) => {
                out.push('{');
                pending.push(Token::Punct('}'));
                push_entries(&mut pending, doc);
                Ok(())
            }
        };
    }
    out
}
