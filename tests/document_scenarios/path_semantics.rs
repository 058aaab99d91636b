//! Path Semantics
//!
//! **Invariant**: a path resolves step by step, and any step that misses
//! makes the whole lookup absent. Paths are positional: after an array
//! changes, the same index may name a different element.

use crate::test_utils::*;
use docengine::{DocPath, PathStep, PathSyntaxError};

// =============================================================================
// Resolution
// =============================================================================

/// Array indices are positional, not identity-based.
#[test]
fn test_paths_are_positional_not_identity() {
    let (e, bytes) = encode(json!({"items": ["A", "B", "C"]}));
    assert_eq!(e.get_text(&bytes, "items[0]").unwrap().as_deref(), Some("A"));

    let bytes = e.delete(&bytes, "items[0]", TypeTag::Text).unwrap();
    assert_eq!(e.get_text(&bytes, "items[0]").unwrap().as_deref(), Some("B"));
    assert_eq!(e.get_text(&bytes, "items[2]").unwrap(), None);
}

/// A wrong container kind at any step is absent, never an error.
#[test]
fn test_wrong_container_is_absent() {
    let (e, bytes) = encode(json!({"a": {"b": [1, 2]}, "s": "text"}));
    for path in ["a[0]", "a.b.c", "s[0]", "s.x", "a.b[0].c", "a.b[0][0]"] {
        assert_eq!(e.get_value(&bytes, path).unwrap(), None, "{}", path);
    }
}

/// Keys are case-sensitive and must match exactly.
#[test]
fn test_keys_are_case_sensitive() {
    let (e, bytes) = encode(json!({"Key": 1, "key": 2}));
    assert_eq!(e.get_int(&bytes, "Key").unwrap(), Some(1));
    assert_eq!(e.get_int(&bytes, "key").unwrap(), Some(2));
    assert_eq!(e.get_int(&bytes, "KEY").unwrap(), None);
}

/// Unicode letters and digits are valid key characters.
#[test]
fn test_unicode_keys() {
    let (e, bytes) = encode(json!({"größe": {"名前": "x"}, "_1": true}));
    assert_eq!(e.get_text(&bytes, "größe.名前").unwrap().as_deref(), Some("x"));
    assert_eq!(e.get_bool(&bytes, "_1").unwrap(), Some(true));
}

/// Keys the path grammar cannot express are still stored and returned.
#[test]
fn test_inexpressible_keys_survive_round_trip() {
    let (e, bytes) = encode(json!({"with space": 1, "dot.ted": 2, "plain": 3}));
    let bytes = e.put_int(&bytes, "plain", 4).unwrap();
    assert_eq!(
        as_json(&e, &bytes),
        json!({"with space": 1, "dot.ted": 2, "plain": 4})
    );
}

// =============================================================================
// Syntax
// =============================================================================

/// Malformed paths are errors on every operation.
#[test]
fn test_malformed_paths_are_errors() {
    let (e, bytes) = encode(json!({"a": [[1]]}));
    for path in ["", ".a", "a.", "a..b", "a[", "a[x]", "a[-1]", "a[0]]", "[0]", "a b"] {
        assert!(
            matches!(e.get_value(&bytes, path), Err(Error::PathSyntax(_))),
            "get {}",
            path
        );
        assert!(
            matches!(e.put_int(&bytes, path, 1), Err(Error::PathSyntax(_))),
            "put {}",
            path
        );
        assert!(
            matches!(e.delete(&bytes, path, TypeTag::Int64), Err(Error::PathSyntax(_))),
            "delete {}",
            path
        );
    }
}

#[test]
fn test_stray_closing_bracket() {
    assert!(matches!(
        DocPath::parse("NESTED_INT_ARRAY[1][0]]"),
        Err(PathSyntaxError::UnmatchedBracket(_))
    ));
}

/// Parsing and printing a path are inverse operations.
#[test]
fn test_path_display_is_canonical() {
    let path = DocPath::parse("document.arr[2][0].leaf").unwrap();
    assert_eq!(
        path.steps(),
        &[
            PathStep::Key("document".to_string()),
            PathStep::Key("arr".to_string()),
            PathStep::Index(2),
            PathStep::Index(0),
            PathStep::Key("leaf".to_string()),
        ]
    );
    assert_eq!(DocPath::parse(&path.to_string()).unwrap(), path);
}
