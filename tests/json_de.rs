#![allow(clippy::float_cmp)]

mod common;

use crate::common::{Person, PersonBuilder, Recording, CHOICE};
use indoc::indoc;
use shape_serde::dynamic::SchemaGuidedDocumentBuilder;
use shape_serde::error::ErrorCode;
use shape_serde::json::{FieldMapper, JsonCodec, JsonSettings};
use shape_serde::schema::prelude;
use shape_serde::{Document, Schema, ShapeType, TimestampFormat};

fn codec(settings: JsonSettings) -> JsonCodec {
    JsonCodec::builder().settings(settings).build()
}

fn read_person(codec: &JsonCodec, input: &str) -> (Person, Vec<String>) {
    let mut seen = Vec::new();
    let builder = Recording {
        inner: PersonBuilder::default(),
        seen: &mut seen,
    };
    let person = codec.deserialize(input.as_bytes(), builder).unwrap();
    (person, seen)
}

#[test]
fn test_read_typed_struct() {
    let input = br#"{"name":"Ferris","age":7,"tags":["crab","rust"],"birthday":1700000000}"#;
    let person = JsonCodec::default()
        .deserialize(input, PersonBuilder::default())
        .unwrap();
    assert_eq!(person, Person::ferris());
}

#[test]
fn test_whitespace_everywhere() {
    let input = indoc! {r#"
        {
          "name" : "Ferris" ,
          "tags" : [ "crab" ,
                     "rust" ]
        }
    "#};
    let (person, unknown) = read_person(&JsonCodec::default(), input);
    assert_eq!(person.name.as_deref(), Some("Ferris"));
    assert_eq!(person.tags, ["crab", "rust"]);
    assert!(unknown.is_empty());
}

#[test]
fn test_unknown_members_reach_the_hook() {
    let (person, unknown) = read_person(
        &JsonCodec::default(),
        r#"{"age":1,"mysteryField":{"deep":[1,{"x":null}]},"other":"x"}"#,
    );
    assert_eq!(person.age, Some(1));
    assert_eq!(unknown, ["mysteryField", "other"]);
}

#[test]
fn test_json_name() {
    let settings = JsonSettings::builder()
        .field_mapper(FieldMapper::JsonName)
        .build();
    let (person, unknown) = read_person(&codec(settings), r#"{"Name":"Ferris","name":"Crab"}"#);
    assert_eq!(person.name.as_deref(), Some("Ferris"));
    assert_eq!(unknown, ["name"]);

    let (person, unknown) = read_person(&JsonCodec::default(), r#"{"Name":"Ferris"}"#);
    assert_eq!(person.name, None);
    assert_eq!(unknown, ["Name"]);
}

#[test]
fn test_null_members_are_skipped() {
    let (person, unknown) = read_person(&JsonCodec::default(), r#"{"name":null,"age":2}"#);
    assert_eq!(person.name, None);
    assert_eq!(person.age, Some(2));
    assert!(unknown.is_empty());
}

#[test]
fn test_timestamps() {
    let (person, _) = read_person(&JsonCodec::default(), r#"{"birthday":1700000000.5}"#);
    assert_eq!(
        person.birthday,
        chrono::DateTime::from_timestamp(1_700_000_000, 500_000_000)
    );

    let settings = JsonSettings::builder()
        .default_timestamp_format(TimestampFormat::DateTime)
        .build();
    let codec = codec(settings);
    let (person, _) = read_person(&codec, r#"{"birthday":"2023-11-14T22:13:20Z"}"#);
    assert_eq!(person.birthday, chrono::DateTime::from_timestamp(1_700_000_000, 0));

    let err = codec
        .deserialize(br#"{"birthday":1700000000}"#, PersonBuilder::default())
        .unwrap_err();
    assert!(err.is_type_coercion());

    let err = codec
        .deserialize(br#"{"birthday":"yesterday"}"#, PersonBuilder::default())
        .unwrap_err();
    assert!(err.is_data());
}

#[test]
fn test_integer_errors() {
    let codec = JsonCodec::default();

    let err = codec
        .deserialize(br#"{"age":1.5}"#, PersonBuilder::default())
        .unwrap_err();
    assert!(err.is_type_coercion());

    let err = codec
        .deserialize(br#"{"age":"7"}"#, PersonBuilder::default())
        .unwrap_err();
    assert!(err.is_type_coercion());

    let err = codec
        .deserialize(br#"{"age":3000000000}"#, PersonBuilder::default())
        .unwrap_err();
    assert_eq!(*err.code(), ErrorCode::NumberOutOfRange);
}

#[test]
fn test_trailing_characters() {
    let err = JsonCodec::default()
        .deserialize(br#"{"age":1} x"#, PersonBuilder::default())
        .unwrap_err();
    assert!(err.is_syntax());
    assert_eq!(*err.code(), ErrorCode::TrailingCharacters);
    assert_eq!((err.line(), err.column()), (1, 11));
}

#[test]
fn test_eof() {
    let err = JsonCodec::default()
        .deserialize(br#"{"age":1"#, PersonBuilder::default())
        .unwrap_err();
    assert!(err.is_eof());

    let err = JsonCodec::default().deserialize_document(b"").unwrap_err();
    assert!(err.is_eof());
}

#[test]
fn test_document_number_kinds() {
    let doc = JsonCodec::default()
        .deserialize_document(
            br#"{"i":1,"l":3000000000,"b":12345678901234567890123,"d":1.5,"e":1e3,"s":"NaN","n":null,"a":[true]}"#,
        )
        .unwrap();
    let member = |name| doc.get_member(name).unwrap().unwrap().clone();
    assert_eq!(member("i"), Document::Integer(1));
    assert_eq!(member("l"), Document::Long(3_000_000_000));
    assert_eq!(
        member("b"),
        Document::BigInteger("12345678901234567890123".parse().unwrap())
    );
    assert_eq!(member("d"), Document::Double(1.5));
    assert_eq!(member("e"), Document::Double(1000.0));
    assert_eq!(member("s"), Document::from("NaN"));
    assert_eq!(member("n"), Document::Null);
    assert_eq!(member("a"), Document::from(vec![Document::from(true)]));
}

#[test]
fn test_special_floats() {
    let codec = JsonCodec::default();
    let read = |input: &str| {
        codec
            .deserialize(input.as_bytes(), SchemaGuidedDocumentBuilder::new(&prelude::DOUBLE))
            .unwrap()
            .into_document()
    };
    assert_eq!(read(r#""Infinity""#), Document::Double(f64::INFINITY));
    assert_eq!(read(r#""-Infinity""#), Document::Double(f64::NEG_INFINITY));
    assert!(read(r#""NaN""#).as_double().unwrap().is_nan());
    assert_eq!(read("2.25"), Document::Double(2.25));
    assert_eq!(read("-3"), Document::Double(-3.0));

    let err = codec
        .deserialize(br#""Inf""#, SchemaGuidedDocumentBuilder::new(&prelude::DOUBLE))
        .unwrap_err();
    assert!(err.is_type_coercion());
}

#[test]
fn test_surrogates() {
    let codec = JsonCodec::default();
    let doc = codec.deserialize_document("\"🎉\"".as_bytes()).unwrap();
    assert_eq!(doc, Document::from("🎉"));

    let doc = codec.deserialize_document(br#""\ud83c\udf89""#).unwrap();
    assert_eq!(doc, Document::from("🎉"));

    let err = codec.deserialize_document(br#""\ud83c""#).unwrap_err();
    assert_eq!(*err.code(), ErrorCode::UnexpectedEndOfHexEscape);

    let err = codec.deserialize_document(br#""\udf89""#).unwrap_err();
    assert_eq!(*err.code(), ErrorCode::LoneLeadingSurrogateInHexEscape);
}

#[test]
fn test_blob() {
    let codec = JsonCodec::default();
    let blob = codec
        .deserialize(br#""aGVsbG8=""#, SchemaGuidedDocumentBuilder::new(&prelude::BLOB))
        .unwrap();
    assert_eq!(blob.document().as_blob().unwrap(), b"hello");

    let err = codec
        .deserialize(br#""!!""#, SchemaGuidedDocumentBuilder::new(&prelude::BLOB))
        .unwrap_err();
    assert_eq!(*err.code(), ErrorCode::InvalidBase64);
}

#[test]
fn test_union_members() {
    let lenient = JsonCodec::default();
    let choice = lenient
        .deserialize(
            br#"{"__type":"com.example#Choice","number":3,"extra":true}"#,
            SchemaGuidedDocumentBuilder::new(&CHOICE),
        )
        .unwrap();
    assert_eq!(choice.document().member_names(), ["number"]);

    let settings = JsonSettings::builder()
        .forbid_unknown_union_members(true)
        .build();
    let err = codec(settings)
        .deserialize(
            br#"{"number":3,"extra":true}"#,
            SchemaGuidedDocumentBuilder::new(&CHOICE),
        )
        .unwrap_err();
    assert!(err.is_data());
    assert_eq!(
        *err.code(),
        ErrorCode::UnknownMember {
            container: "com.example#Choice".into(),
            member: "extra".into(),
        }
    );
}

#[test]
fn test_discriminator() {
    let settings = JsonSettings::builder()
        .default_namespace("com.example")
        .build();
    let codec = codec(settings);

    let doc = codec.deserialize_document(br#"{"__type":"Foo"}"#).unwrap();
    let id = codec.discriminator(&doc).unwrap().unwrap();
    assert_eq!(id.to_string(), "com.example#Foo");

    let doc = codec.deserialize_document(br#"{"__type":"other.ns#Foo"}"#).unwrap();
    let id = codec.discriminator(&doc).unwrap().unwrap();
    assert_eq!(id.to_string(), "other.ns#Foo");

    let doc = codec.deserialize_document(br#"{"a":1}"#).unwrap();
    assert_eq!(codec.discriminator(&doc).unwrap(), None);
}

#[test]
fn test_deserialize_reader() {
    let input: &[u8] = br#"{"age":5,"tags":["a\nb"]}"#;
    let person = JsonCodec::default()
        .deserialize_reader(input, PersonBuilder::default())
        .unwrap();
    assert_eq!(person.age, Some(5));
    assert_eq!(person.tags, ["a\nb"]);
}

#[test]
fn test_recursion_limit() {
    let input = "[".repeat(200) + &"]".repeat(200);
    let err = JsonCodec::default()
        .deserialize_document(input.as_bytes())
        .unwrap_err();
    assert_eq!(*err.code(), ErrorCode::RecursionLimitExceeded);

    let input = "[".repeat(100) + &"]".repeat(100);
    assert!(JsonCodec::default().deserialize_document(input.as_bytes()).is_ok());
}

#[test]
fn test_error_position() {
    let input = indoc! {r#"
        {
          "name": "Ferris",
          "age": trux
        }
    "#};
    let err = JsonCodec::default()
        .deserialize_document(input.as_bytes())
        .unwrap_err();
    assert!(err.is_syntax());
    assert_eq!(err.line(), 3);
    assert!(err.to_string().contains("at line 3"));
}

#[test]
fn test_parsed_document_keeps_codec_settings() {
    let settings = JsonSettings::builder()
        .field_mapper(FieldMapper::JsonName)
        .default_timestamp_format(TimestampFormat::DateTime)
        .build();
    let codec = codec(settings);
    let wire = codec.serialize(&Person::ferris()).unwrap();
    let doc = codec.deserialize_document(&wire).unwrap();
    assert_eq!(doc.member_names(), ["Name", "age", "tags", "birthday"]);

    let person = codec.document_as_shape(&doc, PersonBuilder::default()).unwrap();
    assert_eq!(person, Person::ferris());

    let err = doc.as_shape(PersonBuilder::default()).unwrap_err();
    assert!(err.is_type_coercion());
}

#[test]
fn test_parsed_document_decodes_blobs() {
    let schema = Schema::builder("com.example#Payload".parse().unwrap(), ShapeType::Structure)
        .member("data", &*prelude::BLOB)
        .build()
        .unwrap();
    let codec = JsonCodec::default();
    let doc = codec.deserialize_document(br#"{"data":"Zm9v"}"#).unwrap();

    let payload = codec
        .document_as_shape(&doc, SchemaGuidedDocumentBuilder::new(&schema))
        .unwrap();
    assert_eq!(
        payload.get_member("data").unwrap().unwrap().document(),
        &Document::blob(&b"foo"[..])
    );

    let doc = codec.deserialize_document(br#"{"data":"!!"}"#).unwrap();
    let err = codec
        .document_as_shape(&doc, SchemaGuidedDocumentBuilder::new(&schema))
        .unwrap_err();
    assert_eq!(*err.code(), ErrorCode::InvalidBase64);
}

#[test]
fn test_parsed_document_timestamp_formats() {
    let codec = JsonCodec::default();
    let doc = codec.deserialize_document(br#"{"birthday":1700000000.5}"#).unwrap();
    let person = codec.document_as_shape(&doc, PersonBuilder::default()).unwrap();
    assert_eq!(
        person.birthday,
        chrono::DateTime::from_timestamp(1_700_000_000, 500_000_000)
    );

    let doc = codec
        .deserialize_document(br#"{"birthday":"2023-11-14T22:13:20Z"}"#)
        .unwrap();
    let err = codec
        .document_as_shape(&doc, PersonBuilder::default())
        .unwrap_err();
    assert!(err.is_type_coercion());
}
