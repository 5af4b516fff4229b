#![cfg(feature = "serde")]

mod common;

use crate::common::Person;
use shape_serde::{Document, Map};

#[test]
fn test_to_serde_json() {
    let at = chrono::DateTime::from_timestamp(1_700_000_000, 0).unwrap();
    let doc = Document::from(Map::from([
        ("i".to_owned(), Document::Integer(1)),
        ("big".to_owned(), Document::BigInteger("123456789012345678901234567890".parse().unwrap())),
        ("t".to_owned(), Document::Timestamp(at)),
        ("none".to_owned(), Document::Null),
        ("list".to_owned(), Document::from(vec![Document::from(true), Document::from("x")])),
    ]));
    assert_eq!(
        serde_json::to_string(&doc).unwrap(),
        r#"{"i":1,"big":"123456789012345678901234567890","t":"2023-11-14T22:13:20Z","none":null,"list":[true,"x"]}"#
    );
}

#[test]
fn test_structure_is_member_map() {
    let doc = Document::of_struct(&Person {
        name: Some("Ferris".to_owned()),
        age: Some(3),
        ..Person::default()
    })
    .unwrap();
    let value = serde_json::to_value(&doc).unwrap();
    assert_eq!(value, serde_json::json!({"name": "Ferris", "age": 3}));
}

#[test]
fn test_blob_is_byte_array() {
    let doc = Document::blob(&b"hi"[..]);
    assert_eq!(serde_json::to_string(&doc).unwrap(), "[104,105]");
}
