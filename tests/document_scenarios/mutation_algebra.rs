//! Mutation Algebra
//!
//! How put and delete compose:
//! - put on the same path is last-writer-wins
//! - put on disjoint paths commutes
//! - delete undoes a put of a new key
//! - delete is idempotent, and a no-op when nothing matches

use crate::test_utils::*;
use proptest::prelude::*;

// =============================================================================
// Put
// =============================================================================

/// Put operations on the same path are not commutative.
#[test]
fn test_put_not_commutative_same_path() {
    let (e, bytes) = encode(json!({}));
    let one_two = e.put_int(&e.put_int(&bytes, "x", 1).unwrap(), "x", 2).unwrap();
    let two_one = e.put_int(&e.put_int(&bytes, "x", 2).unwrap(), "x", 1).unwrap();
    assert_eq!(e.get_int(&one_two, "x").unwrap(), Some(2));
    assert_eq!(e.get_int(&two_one, "x").unwrap(), Some(1));
}

/// Put operations on disjoint existing paths commute byte for byte.
#[test]
fn test_put_commutes_on_disjoint_existing_paths() {
    let (e, bytes) = encode(json!({"a": {"x": 0}, "b": [0, 0]}));
    let ab = e
        .put_int(&e.put_int(&bytes, "a.x", 1).unwrap(), "b[1]", 2)
        .unwrap();
    let ba = e
        .put_int(&e.put_int(&bytes, "b[1]", 2).unwrap(), "a.x", 1)
        .unwrap();
    assert_eq!(ab, ba);
}

/// Putting the value already stored reproduces the same bytes.
#[test]
fn test_put_same_value_is_identity() {
    let (e, bytes) = encode(json!({"a": {"b": "same"}, "z": 1}));
    assert_eq!(e.put_text(&bytes, "a.b", "same").unwrap(), bytes);
}

/// New keys are appended after the existing ones.
#[test]
fn test_new_keys_append() {
    let (e, bytes) = encode(json!({"b": 1, "a": 2}));
    let bytes = e.put_int(&bytes, "c", 3).unwrap();
    let bytes = e.put_int(&bytes, "b", 10).unwrap();
    assert_eq!(
        e.decode_document(&bytes).unwrap(),
        r#"{"b":10,"a":2,"c":3}"#
    );
}

/// A failed put leaves nothing behind: the caller still holds the input.
#[test]
fn test_failed_put_reports_path() {
    let (e, bytes) = encode(json!({"a": {"b": 1}}));
    assert_eq!(
        e.put_int(&bytes, "a.c.d", 1),
        Err(Error::Path(PathError::Missing {
            step: "a.c".to_string()
        }))
    );
    assert_eq!(
        e.put_int(&bytes, "a.b.d", 1),
        Err(Error::Path(PathError::NotAContainer {
            step: "a.b".to_string(),
            expected: "document",
            found: "int64",
        }))
    );
}

/// Array payloads replace the whole array.
#[test]
fn test_put_array_payload_replaces() {
    let (e, bytes) = encode(json!({"arr": [1, 2, 3]}));
    let bytes = e.put(&bytes, "arr", tag("text[]"), r#"["x"]"#).unwrap();
    assert_eq!(
        e.get(&bytes, "arr", tag("text[]")).unwrap(),
        Some(Output::Array(vec![Value::from("x")]))
    );
}

// =============================================================================
// Delete
// =============================================================================

/// Delete is the inverse of putting a new key.
#[test]
fn test_delete_inverts_put_of_new_key() {
    let (e, bytes) = encode(json!({"a": 1, "b": {"c": true}}));
    let added = e.put(&bytes, "b.d", tag("double"), "2.5").unwrap();
    let removed = e.delete(&added, "b.d", tag("double")).unwrap();
    assert_eq!(removed, bytes);
}

/// Deleting with the wrong type leaves the value; the right type removes it.
#[test]
fn test_delete_matches_stored_type() {
    let (e, bytes) = encode(json!({"v": [1, 2]}));
    assert_eq!(e.delete(&bytes, "v", tag("text[]")).unwrap(), bytes);
    let removed = e.delete(&bytes, "v", tag("int64[]")).unwrap();
    assert_eq!(as_json(&e, &removed), json!({}));
}

/// Deleting the only element leaves an empty array, not a missing key.
#[test]
fn test_delete_last_array_element() {
    let (e, bytes) = encode(json!({"v": [true]}));
    let bytes = e.delete(&bytes, "v[0]", tag("boolean")).unwrap();
    assert_eq!(as_json(&e, &bytes), json!({"v": []}));
}

// =============================================================================
// Properties
// =============================================================================

fn key() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,5}"
}

proptest! {
    /// delete(delete(d, k), k) == delete(d, k)
    #[test]
    fn prop_delete_idempotent(keys in prop::collection::vec(key(), 0..6), target in key()) {
        let e = DocumentEngine::default();
        let mut bytes = e.encode_document("{}").unwrap();
        for k in &keys {
            bytes = e.put_text(&bytes, k, k).unwrap();
        }
        let once = e.delete(&bytes, &target, TypeTag::Text).unwrap();
        let twice = e.delete(&once, &target, TypeTag::Text).unwrap();
        prop_assert_eq!(&once, &twice);
        if !keys.contains(&target) {
            prop_assert_eq!(&once, &bytes);
        }
    }

    /// The last put to a key wins
    #[test]
    fn prop_last_put_wins(values in prop::collection::vec(any::<i64>(), 1..6)) {
        let e = DocumentEngine::default();
        let mut bytes = e.encode_document("{}").unwrap();
        for v in &values {
            bytes = e.put_int(&bytes, "k", *v).unwrap();
        }
        prop_assert_eq!(e.get_int(&bytes, "k").unwrap(), values.last().copied());
    }
}
