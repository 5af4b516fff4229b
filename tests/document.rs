#![allow(clippy::float_cmp)]

mod common;

use crate::common::{Person, PersonBuilder, PERSON};
use shape_serde::json::JsonCodec;
use shape_serde::{BigDecimal, BigInteger, Document, Map, ShapeType};

#[test]
fn test_integral_accessors_cast() {
    assert_eq!(Document::Integer(300).as_byte().unwrap(), 44);
    assert_eq!(Document::Long(-1).as_short().unwrap(), -1);
    assert_eq!(Document::Double(2.9).as_integer().unwrap(), 2);
    assert_eq!(Document::Double(-1e20).as_integer().unwrap(), i32::MIN);
    assert_eq!(
        Document::BigDecimal("12.75".parse().unwrap()).as_long().unwrap(),
        12
    );
    assert_eq!(
        Document::BigInteger(BigInteger::from(u64::MAX)).as_long().unwrap(),
        -1
    );
}

#[test]
fn test_float_accessors() {
    assert_eq!(Document::Integer(3).as_double().unwrap(), 3.0);
    assert_eq!(
        Document::from("Infinity").as_double().unwrap(),
        f64::INFINITY
    );
    assert!(Document::from("NaN").as_float().unwrap().is_nan());
    assert!(Document::from("1.5").as_double().unwrap_err().is_type_coercion());
    assert_eq!(Document::Double(f64::NEG_INFINITY).as_string().unwrap(), "-Infinity");
    assert!(Document::Double(1.5).as_string().unwrap_err().is_type_coercion());
}

#[test]
fn test_big_number_accessors() {
    let decimal = Document::BigDecimal("1.5e3".parse().unwrap());
    assert_eq!(decimal.as_big_integer().unwrap().as_str(), "1500");

    let decimal = Document::BigDecimal("-0.5".parse().unwrap());
    assert_eq!(decimal.as_big_integer().unwrap().as_str(), "0");

    assert_eq!(
        Document::Long(-42).as_big_decimal().unwrap(),
        BigDecimal::from(-42)
    );
    assert!(Document::Double(f64::NAN).as_big_integer().is_err());
    assert!("1.".parse::<BigDecimal>().is_err());
    assert!("12".parse::<BigInteger>().is_ok());
}

#[test]
fn test_null_answers_zero_values() {
    let null = Document::Null;
    assert!(null.is_null());
    assert_eq!(null.shape_type(), ShapeType::Document);
    assert!(!null.as_boolean().unwrap());
    assert_eq!(null.as_long().unwrap(), 0);
    assert_eq!(null.as_string().unwrap(), "");
    assert!(null.as_list().unwrap().is_empty());
    assert_eq!(null.get_member("x").unwrap(), None);
}

#[test]
fn test_mismatched_kinds_are_coercion_errors() {
    let text = Document::from("7");
    assert!(text.as_integer().unwrap_err().is_type_coercion());
    assert!(text.as_list().unwrap_err().is_type_coercion());
    assert!(text.get_member("x").unwrap_err().is_type_coercion());

    let list = Document::from(vec![Document::from(1)]);
    assert!(list.as_string_map().unwrap_err().is_type_coercion());
    assert!(list.as_boolean().unwrap_err().is_type_coercion());
    assert_eq!(list.size(), Some(1));
    assert_eq!(text.size(), None);
}

#[test]
fn test_timestamp_accessor() {
    let at = chrono::DateTime::from_timestamp(1_700_000_000, 500_000_000).unwrap();
    assert_eq!(Document::Timestamp(at).as_timestamp().unwrap(), at);
    assert_eq!(Document::Double(1_700_000_000.5).as_timestamp().unwrap(), at);
    assert!(Document::from("2023-11-14").as_timestamp().is_err());
}

#[test]
fn test_blob_accessor() {
    assert_eq!(Document::blob(vec![1u8, 2]).as_blob().unwrap(), [1, 2]);
    assert_eq!(Document::from("hi").as_blob().unwrap(), b"hi");
    assert!(Document::Boolean(true).as_blob().is_err());
}

#[test]
fn test_map_keeps_insertion_order() {
    let mut map = Map::new();
    map.insert("zebra".to_owned(), Document::from(1));
    map.insert("apple".to_owned(), Document::from(2));
    map.insert("mango".to_owned(), Document::from(3));
    map.insert("zebra".to_owned(), Document::from(4));
    let doc = Document::from(map);

    assert_eq!(doc.member_names(), ["zebra", "apple", "mango"]);
    assert_eq!(doc.get_member("zebra").unwrap(), Some(&Document::Integer(4)));
    assert_eq!(doc.size(), Some(3));
    assert_eq!(doc.discriminator().unwrap(), None);
}

#[test]
fn test_json_text_survives_document() {
    let input = r#"{"a":[1,2.5,"x",null,true],"b":{"c":3000000000,"d":-7}}"#;
    let codec = JsonCodec::default();
    let doc = codec.deserialize_document(input.as_bytes()).unwrap();
    let out = codec.serialize_document(&doc).unwrap();
    assert_eq!(out, input.as_bytes());
    assert_eq!(codec.deserialize_document(&out).unwrap(), doc);
}

#[test]
fn test_captured_struct() {
    let doc = Document::of_struct(&Person::ferris()).unwrap();
    assert_eq!(doc.shape_type(), ShapeType::Structure);
    assert_eq!(doc.member_names(), ["name", "age", "tags", "birthday"]);
    assert_eq!(doc.get_member("age").unwrap(), Some(&Document::Integer(7)));
    assert_eq!(doc.discriminator().unwrap(), Some(PERSON.id().clone()));

    let person = doc.as_shape(PersonBuilder::default()).unwrap();
    assert_eq!(person, Person::ferris());
}

#[test]
fn test_map_document_as_shape() {
    let doc: Document = [
        ("age".to_owned(), Document::Long(12)),
        ("tags".to_owned(), Document::from(vec![Document::from("a")])),
        ("name".to_owned(), Document::Null),
    ]
    .into_iter()
    .collect();
    let person = doc.as_shape(PersonBuilder::default()).unwrap();
    assert_eq!(
        person,
        Person {
            age: Some(12),
            tags: vec!["a".to_owned()],
            ..Person::default()
        }
    );
}

#[test]
fn test_conversions() {
    assert_eq!(Document::from(Some(1i64)), Document::Long(1));
    assert_eq!(Document::from(None::<bool>), Document::Null);
    assert_eq!(Document::from(2.0f32).shape_type(), ShapeType::Float);
    let list: Document = (1..=2i32).map(Document::from).collect();
    assert_eq!(list.to_string(), "[1,2]");
}
