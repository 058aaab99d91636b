//! Shared helpers for the scenario suite

pub use docengine::{DocumentEngine, Error, Output, PathError, TypeTag, Value};
pub use serde_json::json;

/// Encode a `json!` literal with the default engine
pub fn encode(value: serde_json::Value) -> (DocumentEngine, Vec<u8>) {
    let engine = DocumentEngine::default();
    let bytes = engine.encode_document(&value.to_string()).unwrap();
    (engine, bytes)
}

/// Decode bytes back into a `serde_json` value for comparison
pub fn as_json(engine: &DocumentEngine, bytes: &[u8]) -> serde_json::Value {
    serde_json::from_str(&engine.decode_document(bytes).unwrap()).unwrap()
}

/// Parse a type tag name
pub fn tag(name: &str) -> TypeTag {
    name.parse().unwrap()
}
