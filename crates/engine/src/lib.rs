//! Accessor engine for docengine
//!
//! This crate sits on top of the core types and the codec:
//! - DocumentEngine: get, put and delete by path over encoded documents
//! - Type coercion between stored values, type tags and payload text
//! - EngineConfig: `docengine.toml` settings (null dropping, limits)
//!
//! The free functions below run with the default configuration.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod coerce;
pub mod config;
pub mod engine;
pub mod output;
mod traverse;

pub use coerce::{coerce_text, coerce_text_with, project};
pub use config::{EngineConfig, CONFIG_FILE_NAME};
pub use engine::DocumentEngine;
pub use output::Output;

use docengine_core::{Result, TypeTag};

/// Parse a textual document and encode it
pub fn encode_document(source: &str) -> Result<Vec<u8>> {
    DocumentEngine::default().encode_document(source)
}

/// Decode stored bytes and render them as JSON text
pub fn decode_document(bytes: &[u8]) -> Result<String> {
    DocumentEngine::default().decode_document(bytes)
}

/// Resolve a path and project the value onto `tag`
pub fn get(bytes: &[u8], path: &str, tag: TypeTag) -> Result<Option<Output>> {
    DocumentEngine::default().get(bytes, path, tag)
}

/// Coerce `payload` according to `tag` and store it at `path`
pub fn put(bytes: &[u8], path: &str, tag: TypeTag, payload: &str) -> Result<Vec<u8>> {
    DocumentEngine::default().put(bytes, path, tag, payload)
}

/// Remove the value at `path` if it is stored with type `tag`
pub fn delete(bytes: &[u8], path: &str, tag: TypeTag) -> Result<Vec<u8>> {
    DocumentEngine::default().delete(bytes, path, tag)
}
