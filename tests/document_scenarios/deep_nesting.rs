//! Deep Nesting
//!
//! **Invariant**: nesting depth is bounded only by memory. On documents far
//! deeper than one stack frame per level would allow, every operation either
//! completes or returns an error.

use crate::test_utils::*;
use docengine::codec::binary::{TAG_ARRAY, TAG_DOCUMENT, TAG_INT, TAG_NULL};
use docengine::{CorruptEncoding, EngineConfig, Limits};

const DEPTH: usize = 50_000;

/// `{"a": [[ ... [leaf] ... ]]}` with `depth` arrays, framed by hand
fn nested_arrays(depth: usize, leaf: i64) -> Vec<u8> {
    let mut bytes = nested_frames(depth);
    bytes.push(TAG_INT);
    bytes.extend_from_slice(&leaf.to_le_bytes());
    bytes
}

/// The document header and `depth` one-element array headers, no leaf
fn nested_frames(depth: usize) -> Vec<u8> {
    let mut bytes = vec![TAG_DOCUMENT, 1, 0, 0, 0, 1, 0, 0, 0, b'a'];
    for _ in 0..depth {
        bytes.extend_from_slice(&[TAG_ARRAY, 1, 0, 0, 0]);
    }
    bytes
}

/// Path to the element `depth` indices below `a`
fn below_a(depth: usize) -> String {
    format!("a{}", "[0]".repeat(depth))
}

// =============================================================================
// Get
// =============================================================================

#[test]
fn test_get_on_deep_bytes() {
    let e = DocumentEngine::default();
    let bytes = nested_arrays(DEPTH, 7);

    assert_eq!(e.get_int(&bytes, "a").unwrap(), None);
    assert_eq!(e.get(&bytes, "a", tag("int64[]")).unwrap(), None);
    assert_eq!(e.get_int(&bytes, &below_a(DEPTH)).unwrap(), Some(7));
    assert_eq!(e.get_int(&bytes, &format!("{}[0]", below_a(DEPTH))).unwrap(), None);
    assert_eq!(
        e.get(&bytes, &below_a(DEPTH - 1), tag("int64[]")).unwrap(),
        Some(Output::Array(vec![Value::Int(7)]))
    );

    let whole = e.get_value(&bytes, "a").unwrap().unwrap();
    assert_eq!(whole.nesting_depth(), DEPTH);
}

#[test]
fn test_get_document_on_deep_bytes() {
    let e = DocumentEngine::default();
    // {"d": {"d": ... {"d": null} ... }}
    let mut bytes = Vec::new();
    for _ in 0..=DEPTH {
        bytes.extend_from_slice(&[TAG_DOCUMENT, 1, 0, 0, 0, 1, 0, 0, 0, b'd']);
    }
    bytes.push(TAG_NULL);

    let inner = e.get_document(&bytes, "d").unwrap().unwrap();
    assert_eq!(inner, &bytes[10..]);
    assert_eq!(e.decode_document(&inner).unwrap().len(), 6 * DEPTH + 4);

    let path = vec!["d"; DEPTH + 1].join(".");
    assert_eq!(e.get_value(&bytes, &path).unwrap(), Some(Value::Null));
}

// =============================================================================
// Put / Delete
// =============================================================================

#[test]
fn test_put_and_delete_on_deep_bytes() {
    let e = DocumentEngine::default();
    let bytes = nested_arrays(DEPTH, 7);

    let bytes = e.put_int(&bytes, &below_a(DEPTH), 8).unwrap();
    assert_eq!(bytes, nested_arrays(DEPTH, 8));

    let appended = e
        .put_int(&bytes, &format!("{}[1]", below_a(DEPTH - 1)), 9)
        .unwrap();
    assert_eq!(e.get_int(&appended, &format!("{}[1]", below_a(DEPTH - 1))).unwrap(), Some(9));

    // Type mismatch leaves the bytes alone; a match removes index 0
    assert_eq!(e.delete(&appended, &below_a(DEPTH), TypeTag::Text).unwrap(), appended);
    let removed = e.delete(&appended, &below_a(DEPTH), TypeTag::Int64).unwrap();
    assert_eq!(removed, nested_arrays(DEPTH, 9));

    let emptied = e.delete_path(&removed, &below_a(DEPTH)).unwrap();
    let mut expected = nested_frames(DEPTH);
    let innermost = expected.len() - 4;
    expected[innermost] = 0;
    assert_eq!(emptied, expected);
}

#[test]
fn test_put_deep_value_then_render() {
    let e = DocumentEngine::default();
    let mut value = Value::Int(1);
    for _ in 0..DEPTH {
        value = Value::Array(vec![value]);
    }
    let bytes = e.encode_document("{}").unwrap();
    let bytes = e.put_value(&bytes, "a", value).unwrap();
    assert_eq!(bytes, nested_arrays(DEPTH, 1));

    let text = e.decode_document(&bytes).unwrap();
    assert_eq!(text.len(), 7 + 2 * DEPTH);
    assert!(text.starts_with(r#"{"a":[[["#));
    assert!(text.ends_with("[1]]]}"));

    // Text input stays capped by the parser
    assert!(matches!(e.encode_document(&text), Err(Error::Parse(_))));
}

// =============================================================================
// Untrusted bytes
// =============================================================================

#[test]
fn test_valid_untrusted_deep_bytes_are_navigated() {
    let e = DocumentEngine::default();
    let mut bytes = nested_frames(200_000);
    bytes.push(TAG_NULL);
    assert_eq!(e.get_int(&bytes, "a").unwrap(), None);
    assert_eq!(e.get_int(&bytes, "b").unwrap(), None);
    assert_eq!(e.delete(&bytes, "a", TypeTag::Int64).unwrap(), bytes);
}

#[test]
fn test_corrupt_deep_framing_is_an_error() {
    let e = DocumentEngine::default();
    let truncated = nested_frames(DEPTH);
    let mut unknown = nested_frames(DEPTH);
    unknown.push(0x42);

    for bytes in [&truncated, &unknown] {
        assert!(matches!(e.get_int(bytes, "a"), Err(Error::Corrupt(_))));
        assert!(matches!(e.get_value(bytes, "a"), Err(Error::Corrupt(_))));
        assert!(matches!(e.put_int(bytes, "b", 1), Err(Error::Corrupt(_))));
        assert!(matches!(e.delete_path(bytes, "a"), Err(Error::Corrupt(_))));
        assert!(matches!(e.decode_document(bytes), Err(Error::Corrupt(_))));
    }
    assert_eq!(
        e.get_int(&unknown, "a"),
        Err(Error::Corrupt(CorruptEncoding::UnknownTag {
            tag: 0x42,
            offset: truncated.len(),
        }))
    );
}

#[test]
fn test_strict_limits_reject_deep_bytes_early() {
    let strict = DocumentEngine::new(EngineConfig {
        drop_null_fields: false,
        limits: Limits::strict(),
    })
    .unwrap();
    let bytes = nested_arrays(DEPTH, 7);
    assert!(matches!(
        strict.get_int(&bytes, "a"),
        Err(Error::Corrupt(CorruptEncoding::NestingTooDeep { max: 128, .. }))
    ));
    assert!(matches!(
        strict.put_int(&bytes, "b", 1),
        Err(Error::Corrupt(CorruptEncoding::NestingTooDeep { max: 128, .. }))
    ));
}
