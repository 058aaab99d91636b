//! Limits and Configuration
//!
//! Settings loaded from `docengine.toml` reach every engine operation.

use crate::test_utils::*;
use docengine::codec::binary;
use docengine::{CorruptEncoding, Document, EngineConfig, LimitError, Limits};
use tempfile::TempDir;

/// `depth` nested documents under key `d`, with `1` at the bottom
fn deep(depth: usize) -> Value {
    let mut value = Value::Int(1);
    for _ in 0..depth {
        let mut doc = Document::new();
        doc.insert("d".to_string(), value);
        value = Value::Document(doc);
    }
    value
}

/// The default engine accepts deep nesting without any bound.
#[test]
fn test_default_nesting_is_unbounded() {
    let e = DocumentEngine::default();
    let bytes = binary::encode(&deep(300)).unwrap();
    let path = vec!["d"; 300].join(".");
    assert_eq!(e.get_int(&bytes, &path).unwrap(), Some(1));

    let bytes = e.put_int(&bytes, &path, 2).unwrap();
    assert_eq!(e.get_int(&bytes, &path).unwrap(), Some(2));
}

/// Strict limits reject deep documents on encode and on read.
#[test]
fn test_strict_limits_reject_deep_documents() {
    let strict = DocumentEngine::new(EngineConfig {
        drop_null_fields: false,
        limits: Limits::strict(),
    })
    .unwrap();
    let shallow = strict.encode_document("{}").unwrap();
    assert!(matches!(
        strict.put_value(&shallow, "x", deep(130)),
        Err(Error::Limit(LimitError::NestingTooDeep { max: 128, .. }))
    ));

    // Bytes written without limits
    let bytes = binary::encode(&deep(200)).unwrap();
    assert!(matches!(
        strict.get_int(&bytes, "d"),
        Err(Error::Corrupt(CorruptEncoding::NestingTooDeep { max: 128, .. }))
    ));
}

/// A size limit rejects a put that would grow the document too far.
#[test]
fn test_size_limit_applies_to_put() {
    let e = DocumentEngine::new(EngineConfig {
        drop_null_fields: false,
        limits: Limits {
            max_encoded_bytes: Some(64),
            ..Limits::default()
        },
    })
    .unwrap();
    let bytes = e.encode_document(r#"{"a":1}"#).unwrap();
    let long = "x".repeat(100);
    assert!(matches!(
        e.put_text(&bytes, "b", &long),
        Err(Error::Limit(LimitError::DocumentTooLarge { max: 64, .. }))
    ));
    assert!(e.put_text(&bytes, "b", "short").is_ok());
}

/// An engine built from a config file applies its settings.
#[test]
fn test_engine_from_config_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("docengine.toml");
    std::fs::write(
        &path,
        "drop_null_fields = true\n\n[limits]\nmax_path_steps = 3\n",
    )
    .unwrap();

    let e = DocumentEngine::from_config_file(&path).unwrap();
    let bytes = e.encode_document(r#"{"a":{"b":null,"c":{"d":1}}}"#).unwrap();
    assert_eq!(as_json(&e, &bytes), json!({"a": {"c": {"d": 1}}}));
    assert_eq!(e.get_int(&bytes, "a.c.d").unwrap(), Some(1));
    assert!(matches!(
        e.get_int(&bytes, "a.c.d.e"),
        Err(Error::Limit(LimitError::PathTooLong { actual: 4, max: 3 }))
    ));

    // Null payload fields are dropped on put as well
    let bytes = e.put(&bytes, "n", tag("document"), r#"{"x":null}"#).unwrap();
    assert_eq!(as_json(&e, &bytes), json!({"a": {"c": {"d": 1}}, "n": {}}));
}

/// Unsatisfiable settings are rejected when the engine is built.
#[test]
fn test_invalid_config_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("docengine.toml");
    std::fs::write(&path, "[limits]\nmax_nesting_depth = 0\n").unwrap();
    assert!(matches!(
        DocumentEngine::from_config_file(&path),
        Err(Error::Config(_))
    ));
}
