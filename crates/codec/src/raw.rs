//! Path navigation over encoded bytes
//!
//! [`RawValue`] is a view of one encoded value inside a buffer. Looking up a
//! key or index walks the encoded entries and skips siblings by their length
//! prefixes, so a get only materialises the value it returns.
//!
//! Opening a root validates the whole buffer once and accepts exactly the
//! buffers [`crate::binary::decode_document`] accepts: tags, length prefixes,
//! bool bytes, UTF-8 of strings and keys, key uniqueness, trailing bytes and
//! the nesting limit. Later lookups only re-read the framing.
//!
//! Both passes walk containers with a heap stack, so a buffer of any depth
//! is either navigated or rejected with [`CorruptEncoding`].

use crate::binary::{
    tag_name, Reader, TAG_ARRAY, TAG_BOOL, TAG_DOCUMENT, TAG_FLOAT, TAG_INT, TAG_NULL, TAG_STRING,
};
use docengine_core::{CorruptEncoding, Limits, PathStep, Value};
use std::collections::HashSet;

/// One encoded value inside a validated buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawValue<'a> {
    buf: &'a [u8],
    start: usize,
    end: usize,
}

impl<'a> RawValue<'a> {
    /// Open a buffer holding one top-level document
    pub fn document(buf: &'a [u8], limits: &Limits) -> Result<Self, CorruptEncoding> {
        let mut reader = Reader::new(buf, 0, buf.len(), limits.max_nesting_depth);
        skip_value(&mut reader, Scan::Validate)?;
        reader.finish()?;

        let root = RawValue {
            buf,
            start: 0,
            end: buf.len(),
        };
        if root.tag() != TAG_DOCUMENT {
            return Err(CorruptEncoding::NotADocument {
                found: root.type_name(),
            });
        }
        Ok(root)
    }

    /// Tag byte of this value
    pub fn tag(&self) -> u8 {
        self.buf[self.start]
    }

    /// Variant name of this value
    pub fn type_name(&self) -> &'static str {
        tag_name(self.tag())
    }

    /// Offset of this value in the whole buffer
    pub fn offset(&self) -> usize {
        self.start
    }

    /// Encoded bytes of this value alone
    ///
    /// The slice is itself a complete encoding: decoding it yields the same
    /// value as [`RawValue::decode`].
    pub fn as_bytes(&self) -> &'a [u8] {
        &self.buf[self.start..self.end]
    }

    /// Decode this value
    pub fn decode(&self) -> Result<Value, CorruptEncoding> {
        let mut reader = Reader::new(self.buf, self.start, self.end, None);
        let value = reader.read_value()?;
        reader.finish()?;
        Ok(value)
    }

    /// Look up a key; `None` if this is not a document or the key is absent
    pub fn get_key(&self, key: &str) -> Result<Option<RawValue<'a>>, CorruptEncoding> {
        if self.tag() != TAG_DOCUMENT {
            return Ok(None);
        }

        let mut reader = Reader::new(self.buf, self.start + 1, self.end, None);
        let count = reader.read_len()?;
        for i in 0..count {
            let entry_key = reader.read_str_bytes()?;
            let value_start = reader.pos();
            if i + 1 == count {
                // The last entry runs to the end of the document
                let found = entry_key == key.as_bytes();
                return Ok(found.then(|| self.slice(value_start, self.end)));
            }
            skip_value(&mut reader, Scan::Framing)?;
            if entry_key == key.as_bytes() {
                return Ok(Some(self.slice(value_start, reader.pos())));
            }
        }
        Ok(None)
    }

    /// Look up an index; `None` if this is not an array or out of bounds
    pub fn get_index(&self, index: usize) -> Result<Option<RawValue<'a>>, CorruptEncoding> {
        if self.tag() != TAG_ARRAY {
            return Ok(None);
        }

        let mut reader = Reader::new(self.buf, self.start + 1, self.end, None);
        let count = reader.read_len()?;
        if index >= count {
            return Ok(None);
        }
        for _ in 0..index {
            skip_value(&mut reader, Scan::Framing)?;
        }
        let value_start = reader.pos();
        if index + 1 == count {
            return Ok(Some(self.slice(value_start, self.end)));
        }
        skip_value(&mut reader, Scan::Framing)?;
        Ok(Some(self.slice(value_start, reader.pos())))
    }

    /// Follow a sequence of steps; `None` as soon as one does not resolve
    pub fn get_path(&self, steps: &[PathStep]) -> Result<Option<RawValue<'a>>, CorruptEncoding> {
        let mut current = *self;
        for step in steps {
            let next = match step {
                PathStep::Key(key) => current.get_key(key)?,
                PathStep::Index(idx) => current.get_index(*idx)?,
            };
            match next {
                Some(value) => current = value,
                None => return Ok(None),
            }
        }
        Ok(Some(current))
    }

    fn slice(&self, start: usize, end: usize) -> RawValue<'a> {
        RawValue {
            buf: self.buf,
            start,
            end,
        }
    }
}

/// How much of a value `skip_value` checks
#[derive(Clone, Copy, PartialEq, Eq)]
enum Scan {
    /// Tags, lengths, bools and depth
    Framing,
    /// Framing plus string UTF-8 and unique keys
    Validate,
}

/// A container whose children are still being skipped
struct Open<'a> {
    remaining: usize,
    /// Keys seen so far; `Some` for documents under `Scan::Validate`
    keys: Option<HashSet<&'a [u8]>>,
    is_document: bool,
}

/// Advance past one encoded value.
fn skip_value<'a>(reader: &mut Reader<'a>, scan: Scan) -> Result<(), CorruptEncoding> {
    let mut stack: Vec<Open<'a>> = Vec::new();
    loop {
        if let Some(open) = stack.last_mut() {
            if open.is_document {
                let offset = reader.pos();
                let key = reader.read_str_bytes()?;
                if let Some(keys) = open.keys.as_mut() {
                    let text = std::str::from_utf8(key)
                        .map_err(|_| CorruptEncoding::InvalidUtf8 { offset: offset + 4 })?;
                    if !keys.insert(key) {
                        return Err(CorruptEncoding::DuplicateKey {
                            key: text.to_string(),
                            offset,
                        });
                    }
                }
            }
        }

        let offset = reader.pos();
        let tag = reader.read_u8()?;
        match tag {
            TAG_NULL => {}
            TAG_BOOL => {
                reader.read_bool()?;
            }
            TAG_INT | TAG_FLOAT => {
                reader.take(8)?;
            }
            TAG_STRING => {
                let bytes = reader.read_str_bytes()?;
                if scan == Scan::Validate && std::str::from_utf8(bytes).is_err() {
                    return Err(CorruptEncoding::InvalidUtf8 {
                        offset: reader.pos() - bytes.len(),
                    });
                }
            }
            TAG_ARRAY | TAG_DOCUMENT => {
                reader.enter(stack.len(), offset)?;
                let count = reader.read_len()?;
                if count > 0 {
                    let is_document = tag == TAG_DOCUMENT;
                    stack.push(Open {
                        remaining: count,
                        keys: (is_document && scan == Scan::Validate).then(HashSet::new),
                        is_document,
                    });
                    continue;
                }
            }
            _ => return Err(CorruptEncoding::UnknownTag { tag, offset }),
        }

        // One value is complete; close every container it fills
        loop {
            let Some(open) = stack.last_mut() else {
                return Ok(());
            };
            open.remaining -= 1;
            if open.remaining > 0 {
                break;
            }
            stack.pop();
        }
    }
}
