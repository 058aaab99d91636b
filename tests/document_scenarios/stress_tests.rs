//! Stress Tests
//!
//! Wide documents, very deep documents and long mutation sequences.
//! The slowest tests are `#[ignore]`.

use crate::test_utils::*;

/// Many top-level keys, each readable after a sequence of puts.
#[test]
fn test_large_document_many_keys() {
    let (e, mut bytes) = encode(json!({}));
    for i in 0..500 {
        bytes = e.put_int(&bytes, &format!("key_{}", i), i).unwrap();
    }
    for i in 0..500 {
        assert_eq!(e.get_int(&bytes, &format!("key_{}", i)).unwrap(), Some(i));
    }
}

/// Deleting every other key keeps the survivors in order.
#[test]
fn test_delete_every_other_key() {
    let (e, mut bytes) = encode(json!({}));
    for i in 0..100 {
        bytes = e.put_int(&bytes, &format!("k{}", i), i).unwrap();
    }
    for i in (0..100).step_by(2) {
        bytes = e.delete(&bytes, &format!("k{}", i), TypeTag::Int64).unwrap();
    }
    let text = e.decode_document(&bytes).unwrap();
    let expected: Vec<String> = (1..100)
        .step_by(2)
        .map(|i| format!(r#""k{}":{}"#, i, i))
        .collect();
    assert_eq!(text, format!("{{{}}}", expected.join(",")));
}

/// A long array grows one append at a time.
#[test]
fn test_array_append_sequence() {
    let (e, mut bytes) = encode(json!({"arr": []}));
    for i in 0..200 {
        bytes = e.put_int(&bytes, &format!("arr[{}]", i), i).unwrap();
    }
    assert_eq!(e.get_int(&bytes, "arr[199]").unwrap(), Some(199));
    assert_eq!(e.get_int(&bytes, "arr[200]").unwrap(), None);
}

/// Half a million nested documents through get and put.
#[test]
#[ignore]
fn test_stress_deep_nesting() {
    let depth = 500_000;
    let mut value = Value::array();
    for _ in 0..depth {
        let mut doc = docengine::Document::new();
        doc.insert("n".to_string(), value);
        value = Value::Document(doc);
    }
    let bytes = docengine::codec::binary::encode(&value).unwrap();
    let e = DocumentEngine::default();

    let path = vec!["n"; depth].join(".");
    assert_eq!(
        e.get(&bytes, &path, tag("int64[]")).unwrap(),
        Some(Output::Array(vec![]))
    );
    let bytes = e.put_bool(&bytes, &format!("{}[0]", path), true).unwrap();
    assert_eq!(e.get_bool(&bytes, &format!("{}[0]", path)).unwrap(), Some(true));
}
