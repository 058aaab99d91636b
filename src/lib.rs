//! docengine - binary semi-structured documents with path-addressed access
//!
//! A document is a JSON-like value encoded into a compact, self-describing
//! byte format meant to live in a single column. Get, put and delete take a
//! path such as `document.arr[2][0]` and work on the encoded bytes.
//!
//! # Quick Start
//!
//! ```
//! use docengine::{DocumentEngine, TypeTag};
//!
//! let engine = DocumentEngine::default();
//! let bytes = engine
//!     .encode_document(r#"{"user":{"name":"Alice","tags":["a","b"]}}"#)
//!     .unwrap();
//!
//! assert_eq!(engine.get_text(&bytes, "user.tags[1]").unwrap().as_deref(), Some("b"));
//!
//! let bytes = engine.put(&bytes, "user.age", TypeTag::Int64, "30").unwrap();
//! let bytes = engine.delete(&bytes, "user.name", TypeTag::Text).unwrap();
//! assert_eq!(
//!     engine.decode_document(&bytes).unwrap(),
//!     r#"{"user":{"tags":["a","b"],"age":30}}"#
//! );
//! ```
//!
//! # Architecture
//!
//! - `docengine-core`: values, paths, type tags, errors, limits
//! - `docengine-codec`: binary and text codecs
//! - `docengine-engine`: accessors, coercion, configuration

pub use docengine_codec as codec;
pub use docengine_core::{
    CorruptEncoding, DocPath, Document, ElementTag, Error, LimitError, Limits, ParseError,
    PathError, PathStep, PathSyntaxError, Result, TypeTag, Value,
};
pub use docengine_engine::{
    coerce_text, decode_document, delete, encode_document, get, project, put, DocumentEngine,
    EngineConfig, Output,
};
