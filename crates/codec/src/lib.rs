//! Encoding and decoding for docengine documents
//!
//! - `binary`: the stored, self-describing byte format
//! - `raw`: lazy navigation over encoded bytes
//! - `text`: JSON text parsing and printing

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod binary;
pub mod raw;
pub mod text;

pub use binary::{
    decode, decode_document, decode_document_with_limits, decode_with_limits, encode,
    encode_document, encode_with_limits, encoded_len,
};
pub use raw::RawValue;
pub use text::{
    document_to_text, from_json, parse_document, parse_document_with, parse_value,
    parse_value_with, to_json, to_text, TextOptions,
};
