//! Binary document format
//!
//! Every value is self-describing: a one byte tag followed by its payload.
//! All integers are little-endian.
//!
//! # Format
//!
//! ```text
//! Value Layout:
//! ┌──────────────────┬──────────────────────────────────────────────┐
//! │ Tag (1 byte)     │ Payload (variant)                            │
//! └──────────────────┴──────────────────────────────────────────────┘
//!
//! Payloads:
//!   Null      (none)
//!   Bool      u8, 0 or 1
//!   Int       i64
//!   Float     f64 (IEEE-754 bits)
//!   String    u32 length, UTF-8 bytes
//!   Array     u32 count, count × Value
//!   Document  u32 count, count × (u32 key length, key UTF-8, Value)
//! ```
//!
//! Document entries are written in insertion order, so decode followed by
//! encode reproduces the original bytes.

use byteorder::{ByteOrder, LittleEndian};
use docengine_core::{CorruptEncoding, Document, LimitError, Limits, Value};

/// Null tag
pub const TAG_NULL: u8 = 0x00;
/// Bool tag
pub const TAG_BOOL: u8 = 0x01;
/// Int tag
pub const TAG_INT: u8 = 0x02;
/// Float tag
pub const TAG_FLOAT: u8 = 0x03;
/// String tag
pub const TAG_STRING: u8 = 0x04;
/// Array tag
pub const TAG_ARRAY: u8 = 0x05;
/// Document tag
pub const TAG_DOCUMENT: u8 = 0x06;

/// Name of the variant a tag byte introduces, for error messages
pub fn tag_name(tag: u8) -> &'static str {
    match tag {
        TAG_NULL => "null",
        TAG_BOOL => "boolean",
        TAG_INT => "int64",
        TAG_FLOAT => "double",
        TAG_STRING => "text",
        TAG_ARRAY => "array",
        TAG_DOCUMENT => "document",
        _ => "unknown",
    }
}

// =============================================================================
// Encoding
// =============================================================================

/// Encode a value to bytes
///
/// # Errors
///
/// `LimitError::LengthOverflow` if a string, key or container is longer
/// than a u32 length prefix can describe.
pub fn encode(value: &Value) -> Result<Vec<u8>, LimitError> {
    let mut bytes = Vec::with_capacity(encoded_len(value));
    write_value(&mut bytes, value)?;
    Ok(bytes)
}

/// Encode a top-level document to bytes
pub fn encode_document(doc: &Document) -> Result<Vec<u8>, LimitError> {
    let mut bytes = Vec::with_capacity(1 + document_payload_len(doc));
    bytes.push(TAG_DOCUMENT);
    write_len(&mut bytes, doc.len())?;
    for (key, value) in doc {
        write_string(&mut bytes, key)?;
        write_value(&mut bytes, value)?;
    }
    Ok(bytes)
}

/// Encode a value, enforcing nesting and size limits
pub fn encode_with_limits(value: &Value, limits: &Limits) -> Result<Vec<u8>, LimitError> {
    limits.validate_value(value)?;
    limits.validate_encoded_len(encoded_len(value))?;
    encode(value)
}

/// Exact number of bytes `encode` produces for a value
pub fn encoded_len(value: &Value) -> usize {
    let mut len = 0;
    let mut pending = vec![value];
    while let Some(value) = pending.pop() {
        len += 1 + match value {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Int(_) | Value::Float(_) => 8,
            Value::String(s) => 4 + s.len(),
            Value::Array(items) => {
                pending.extend(items);
                4
            }
            Value::Document(doc) => {
                pending.extend(doc.values());
                4 + doc.keys().map(|k| 4 + k.len()).sum::<usize>()
            }
        };
    }
    len
}

fn document_payload_len(doc: &Document) -> usize {
    4 + doc
        .iter()
        .map(|(k, v)| 4 + k.len() + encoded_len(v))
        .sum::<usize>()
}

/// Pending output of the encoder
enum Emit<'v> {
    Value(&'v Value),
    Key(&'v str),
}

/// Write one value; containers are expanded onto a heap stack.
fn write_value(bytes: &mut Vec<u8>, value: &Value) -> Result<(), LimitError> {
    let mut pending = vec![Emit::Value(value)];
    while let Some(next) = pending.pop() {
        let value = match next {
            Emit::Key(key) => {
                write_string(bytes, key)?;
                continue;
            }
            Emit::Value(value) => value,
        };
        match value {
            Value::Null => bytes.push(TAG_NULL),
            Value::Bool(b) => {
                bytes.push(TAG_BOOL);
                bytes.push(u8::from(*b));
            }
            Value::Int(i) => {
                bytes.push(TAG_INT);
                bytes.extend_from_slice(&i.to_le_bytes());
            }
            Value::Float(f) => {
                bytes.push(TAG_FLOAT);
                bytes.extend_from_slice(&f.to_le_bytes());
            }
            Value::String(s) => {
                bytes.push(TAG_STRING);
                write_string(bytes, s)?;
            }
            Value::Array(items) => {
                bytes.push(TAG_ARRAY);
                write_len(bytes, items.len())?;
                pending.extend(items.iter().rev().map(Emit::Value));
            }
            Value::Document(doc) => {
                bytes.push(TAG_DOCUMENT);
                write_len(bytes, doc.len())?;
                for (key, value) in doc.iter().rev() {
                    pending.push(Emit::Value(value));
                    pending.push(Emit::Key(key));
                }
            }
        }
    }
    Ok(())
}

/// Write a u32 length or count prefix.
fn write_len(bytes: &mut Vec<u8>, len: usize) -> Result<(), LimitError> {
    let prefix = u32::try_from(len).map_err(|_| LimitError::LengthOverflow { len })?;
    bytes.extend_from_slice(&prefix.to_le_bytes());
    Ok(())
}

/// Write a length-prefixed string.
fn write_string(bytes: &mut Vec<u8>, s: &str) -> Result<(), LimitError> {
    write_len(bytes, s.len())?;
    bytes.extend_from_slice(s.as_bytes());
    Ok(())
}

// =============================================================================
// Decoding
// =============================================================================

/// Decode a single value that spans the whole buffer
pub fn decode(bytes: &[u8]) -> Result<Value, CorruptEncoding> {
    decode_with_limits(bytes, &Limits::default())
}

/// Decode a single value, enforcing the nesting limit
pub fn decode_with_limits(bytes: &[u8], limits: &Limits) -> Result<Value, CorruptEncoding> {
    let mut reader = Reader::new(bytes, 0, bytes.len(), limits.max_nesting_depth);
    let value = reader.read_value()?;
    reader.finish()?;
    Ok(value)
}

/// Decode a buffer that must hold a top-level document
pub fn decode_document(bytes: &[u8]) -> Result<Document, CorruptEncoding> {
    decode_document_with_limits(bytes, &Limits::default())
}

/// Decode a top-level document, enforcing the nesting limit
pub fn decode_document_with_limits(
    bytes: &[u8],
    limits: &Limits,
) -> Result<Document, CorruptEncoding> {
    // Scalar or array root: reject before decoding the payload
    if let Some(&tag) = bytes.first() {
        if tag != TAG_DOCUMENT && tag <= TAG_ARRAY {
            return Err(CorruptEncoding::NotADocument {
                found: tag_name(tag),
            });
        }
    }
    let value = decode_with_limits(bytes, limits)?;
    let found = value.type_name();
    value
        .into_document()
        .ok_or(CorruptEncoding::NotADocument { found })
}

/// Cursor over an encoded buffer
///
/// Reads are bounded by `end`, which lets a reader decode one value embedded
/// in a larger buffer while reporting offsets relative to the whole buffer.
pub(crate) struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
    end: usize,
    max_depth: Option<usize>,
}

impl<'a> Reader<'a> {
    pub(crate) fn new(buf: &'a [u8], pos: usize, end: usize, max_depth: Option<usize>) -> Self {
        Reader {
            buf,
            pos,
            end,
            max_depth,
        }
    }

    pub(crate) fn pos(&self) -> usize {
        self.pos
    }

    fn remaining(&self) -> usize {
        self.end - self.pos
    }

    /// Fail if anything is left after the value.
    pub(crate) fn finish(&self) -> Result<(), CorruptEncoding> {
        if self.pos != self.end {
            return Err(CorruptEncoding::TrailingBytes {
                offset: self.pos,
                remaining: self.remaining(),
            });
        }
        Ok(())
    }

    pub(crate) fn take(&mut self, n: usize) -> Result<&'a [u8], CorruptEncoding> {
        let available = self.remaining();
        if n > available {
            return Err(CorruptEncoding::Truncated {
                offset: self.pos,
                needed: n,
                available,
            });
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    pub(crate) fn read_u8(&mut self) -> Result<u8, CorruptEncoding> {
        Ok(self.take(1)?[0])
    }

    pub(crate) fn read_len(&mut self) -> Result<usize, CorruptEncoding> {
        Ok(LittleEndian::read_u32(self.take(4)?) as usize)
    }

    fn read_i64(&mut self) -> Result<i64, CorruptEncoding> {
        Ok(LittleEndian::read_i64(self.take(8)?))
    }

    fn read_f64(&mut self) -> Result<f64, CorruptEncoding> {
        Ok(LittleEndian::read_f64(self.take(8)?))
    }

    pub(crate) fn read_bool(&mut self) -> Result<bool, CorruptEncoding> {
        let offset = self.pos;
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            byte => Err(CorruptEncoding::InvalidBool { byte, offset }),
        }
    }

    /// Read the raw bytes of a length-prefixed string.
    pub(crate) fn read_str_bytes(&mut self) -> Result<&'a [u8], CorruptEncoding> {
        let len = self.read_len()?;
        self.take(len)
    }

    fn read_string(&mut self) -> Result<String, CorruptEncoding> {
        let bytes = self.read_str_bytes()?;
        let offset = self.pos - bytes.len();
        std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|_| CorruptEncoding::InvalidUtf8 { offset })
    }

    /// Check that a container at `depth` enclosing containers is allowed.
    pub(crate) fn enter(&self, depth: usize, offset: usize) -> Result<(), CorruptEncoding> {
        match self.max_depth {
            Some(max) if depth + 1 > max => Err(CorruptEncoding::NestingTooDeep { max, offset }),
            _ => Ok(()),
        }
    }

    /// Read one complete value
    ///
    /// Containers under construction are kept on a heap stack, so nesting
    /// depth is limited by memory and `max_depth` only.
    pub(crate) fn read_value(&mut self) -> Result<Value, CorruptEncoding> {
        let mut stack: Vec<Frame> = Vec::new();
        loop {
            // Document entries start with their key
            if let Some(Frame::Document { doc, key, .. }) = stack.last_mut() {
                let offset = self.pos;
                let next = self.read_string()?;
                if doc.contains_key(&next) {
                    return Err(CorruptEncoding::DuplicateKey { key: next, offset });
                }
                *key = next;
            }

            let offset = self.pos;
            let tag = self.read_u8()?;
            let mut value = match tag {
                TAG_NULL => Value::Null,
                TAG_BOOL => Value::Bool(self.read_bool()?),
                TAG_INT => Value::Int(self.read_i64()?),
                TAG_FLOAT => Value::Float(self.read_f64()?),
                TAG_STRING => Value::String(self.read_string()?),
                TAG_ARRAY | TAG_DOCUMENT => {
                    self.enter(stack.len(), offset)?;
                    let count = self.read_len()?;
                    let frame = if tag == TAG_ARRAY {
                        // Every element takes at least one byte
                        Frame::Array {
                            items: Vec::with_capacity(count.min(self.remaining())),
                            remaining: count,
                        }
                    } else {
                        // Every entry takes at least five bytes
                        Frame::Document {
                            doc: Document::with_capacity(count.min(self.remaining() / 5)),
                            key: String::new(),
                            remaining: count,
                        }
                    };
                    if count > 0 {
                        stack.push(frame);
                        continue;
                    }
                    frame.into_value()
                }
                _ => return Err(CorruptEncoding::UnknownTag { tag, offset }),
            };

            // Hand the finished value to its parent, closing full containers
            loop {
                let Some(mut parent) = stack.pop() else {
                    return Ok(value);
                };
                parent.attach(value);
                if !parent.is_full() {
                    stack.push(parent);
                    break;
                }
                value = parent.into_value();
            }
        }
    }
}

/// A container whose children are still being read
enum Frame {
    Array {
        items: Vec<Value>,
        remaining: usize,
    },
    Document {
        doc: Document,
        /// Key of the entry being read
        key: String,
        remaining: usize,
    },
}

impl Frame {
    fn attach(&mut self, value: Value) {
        match self {
            Frame::Array { items, remaining } => {
                items.push(value);
                *remaining -= 1;
            }
            Frame::Document {
                doc,
                key,
                remaining,
            } => {
                doc.insert(std::mem::take(key), value);
                *remaining -= 1;
            }
        }
    }

    fn is_full(&self) -> bool {
        match self {
            Frame::Array { remaining, .. } | Frame::Document { remaining, .. } => *remaining == 0,
        }
    }

    fn into_value(self) -> Value {
        match self {
            Frame::Array { items, .. } => Value::Array(items),
            Frame::Document { doc, .. } => Value::Document(doc),
        }
    }
}
