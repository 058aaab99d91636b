//! Type coercion between stored values, type tags, and payload text
//!
//! Reading projects a stored value onto a tag with an exact variant match.
//! Writing parses payload text according to its tag. The only numeric
//! widening anywhere is integer elements of a `double[]` payload.

use crate::output::Output;
use docengine_codec::{binary, text, TextOptions};
use docengine_core::{ElementTag, Error, Result, TypeTag, Value};

/// Whether a value stored under `encoded_tag` could project onto `tag`
///
/// Lets a get reject a mismatch from the tag byte alone, before decoding.
pub(crate) fn admits(encoded_tag: u8, tag: TypeTag) -> bool {
    let expected = match tag {
        TypeTag::Int64 => binary::TAG_INT,
        TypeTag::Text => binary::TAG_STRING,
        TypeTag::Boolean => binary::TAG_BOOL,
        TypeTag::Double => binary::TAG_FLOAT,
        TypeTag::Document => binary::TAG_DOCUMENT,
        TypeTag::Array(_) => binary::TAG_ARRAY,
    };
    encoded_tag == expected
}

/// Reject values holding a NaN or infinite double anywhere
///
/// Such doubles have no text form, so storing one would not survive
/// `decode_document`.
pub(crate) fn ensure_finite(value: &Value) -> Result<()> {
    let mut pending = vec![value];
    while let Some(value) = pending.pop() {
        match value {
            Value::Float(f) if !f.is_finite() => {
                return Err(Error::invalid_value(
                    TypeTag::Double,
                    format!("{} is not a finite number", f),
                ));
            }
            Value::Array(items) => pending.extend(items),
            Value::Document(doc) => pending.extend(doc.values()),
            _ => {}
        }
    }
    Ok(())
}

/// Project a stored value onto a tag; `None` if the variant does not match
pub fn project(value: &Value, tag: TypeTag) -> Option<Output> {
    if !tag.matches(value) {
        return None;
    }
    match value {
        Value::Int(i) => Some(Output::Int(*i)),
        Value::String(s) => Some(Output::Text(s.clone())),
        Value::Bool(b) => Some(Output::Bool(*b)),
        Value::Float(f) => Some(Output::Double(*f)),
        Value::Document(_) => binary::encode(value).ok().map(Output::Document),
        Value::Array(items) => Some(Output::Array(items.clone())),
        Value::Null => None,
    }
}

/// Convert a put payload to a value using default text options
pub fn coerce_text(tag: TypeTag, payload: &str) -> Result<Value> {
    coerce_text_with(tag, payload, TextOptions::default())
}

/// Convert a put payload to a value
///
/// # Errors
///
/// A payload that does not parse as `tag` returns `Error::InvalidValue`;
/// malformed document text returns `Error::Parse`.
pub fn coerce_text_with(tag: TypeTag, payload: &str, options: TextOptions) -> Result<Value> {
    match tag {
        TypeTag::Int64 => payload
            .trim()
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|e| Error::invalid_value(tag, format!("'{}': {}", payload, e))),
        TypeTag::Double => parse_double(payload).map(Value::Float),
        TypeTag::Boolean => parse_bool(payload).map(Value::Bool),
        TypeTag::Text => Ok(Value::String(payload.to_string())),
        TypeTag::Document => Ok(Value::Document(text::parse_document_with(payload, options)?)),
        TypeTag::Array(elem) => {
            let value = text::parse_value_with(payload, options)?;
            let found = value.type_name();
            let items = value.into_array().ok_or_else(|| {
                Error::invalid_value(tag, format!("expected a JSON array, found {}", found))
            })?;
            items
                .into_iter()
                .enumerate()
                .map(|(i, item)| coerce_element(tag, elem, i, item))
                .collect::<Result<Vec<_>>>()
                .map(Value::Array)
        }
    }
}

fn parse_double(payload: &str) -> Result<f64> {
    let tag = TypeTag::Double;
    let f = payload
        .trim()
        .parse::<f64>()
        .map_err(|e| Error::invalid_value(tag, format!("'{}': {}", payload, e)))?;
    if !f.is_finite() {
        return Err(Error::invalid_value(
            tag,
            format!("'{}' is not a finite number", payload),
        ));
    }
    Ok(f)
}

fn parse_bool(payload: &str) -> Result<bool> {
    let trimmed = payload.trim();
    if trimmed.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if trimmed.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(Error::invalid_value(
            TypeTag::Boolean,
            format!("'{}' is neither true nor false", payload),
        ))
    }
}

fn coerce_element(tag: TypeTag, elem: ElementTag, index: usize, item: Value) -> Result<Value> {
    match (elem, item) {
        (ElementTag::Double, Value::Int(i)) => Ok(Value::Float(i as f64)),
        (elem, item) if elem.matches(&item) => Ok(item),
        (elem, item) => Err(Error::invalid_value(
            tag,
            format!(
                "element {} is {}, expected {}",
                index,
                item.type_name(),
                elem.name()
            ),
        )),
    }
}
