mod common;

use crate::common::{member, text, Person, CHOICE, PERSON, TAGS};
use shape_serde::de::ShapeBuilder;
use shape_serde::dynamic::{SchemaGuidedDocumentBuilder, SchemaInterceptingSerializer, WrappedDocument};
use shape_serde::error::ErrorCode;
use shape_serde::json::{JsonCodec, JsonSerializer, JsonSettings};
use shape_serde::schema::prelude;
use shape_serde::{Document, Map, Schema, ShapeId, ShapeType};

fn ferris_members() -> Map {
    Map::from([
        ("name".to_owned(), Document::from("Ferris")),
        ("age".to_owned(), Document::from(7)),
        (
            "tags".to_owned(),
            Document::from(vec![Document::from("crab"), Document::from("rust")]),
        ),
        ("birthday".to_owned(), Document::Long(1_700_000_000)),
    ])
}

#[test]
fn test_map_document_writes_like_typed_struct() {
    let codec = JsonCodec::default();
    let typed = codec.serialize(&Person::ferris()).unwrap();

    let wrapped = WrappedDocument::new(PERSON.clone(), Document::from(ferris_members()));
    assert_eq!(codec.serialize(&wrapped).unwrap(), typed);

    let settings = JsonSettings::default();
    let mut ser = JsonSerializer::new(Vec::new(), &settings);
    let doc = Document::from(ferris_members());
    doc.serialize_contents(&mut SchemaInterceptingSerializer::new(&PERSON, &mut ser, None))
        .unwrap();
    assert_eq!(ser.into_inner().unwrap(), typed);
}

#[test]
fn test_unknown_members_are_dropped_on_write() {
    let mut members = ferris_members();
    members.insert("mystery".to_owned(), Document::from(true));
    members.insert("age".to_owned(), Document::Null);
    let wrapped = WrappedDocument::new(PERSON.clone(), Document::from(members));
    let out = JsonCodec::default().serialize(&wrapped).unwrap();
    assert_eq!(
        text(out),
        r#"{"name":"Ferris","tags":["crab","rust"],"birthday":1700000000}"#
    );
}

#[test]
fn test_typed_struct_redirected_to_another_schema() {
    let renamed = Schema::builder("com.example#Named".parse().unwrap(), ShapeType::Structure)
        .member("name", &*prelude::STRING)
        .build()
        .unwrap();

    let settings = JsonSettings::default();
    let mut ser = JsonSerializer::new(Vec::new(), &settings);
    let mut redirect = SchemaInterceptingSerializer::new(&renamed, &mut ser, None);
    shape_serde::SerializableShape::serialize(&Person::ferris(), &mut redirect).unwrap();
    assert_eq!(text(ser.into_inner().unwrap()), r#"{"name":"Ferris"}"#);
}

#[test]
fn test_map_against_scalar_schema_fails() {
    let wrapped = WrappedDocument::new(
        prelude::STRING.clone(),
        Document::from(Map::from([("a".to_owned(), Document::from(1))])),
    );
    let err = JsonCodec::default().serialize(&wrapped).unwrap_err();
    assert!(err.is_serialization());
    assert_eq!(
        err.to_string(),
        "Expected a map, structure, or union, but found shape.prelude#String"
    );
}

#[test]
fn test_wrapper_kind_decides_type_field() {
    let captured = Document::of_struct(&Person {
        age: Some(3),
        ..Person::default()
    })
    .unwrap();
    let codec = JsonCodec::default();

    assert_eq!(
        text(codec.serialize_document(&captured).unwrap()),
        r#"{"__type":"com.example#Person","age":3}"#
    );

    let as_document = WrappedDocument::new(prelude::DOCUMENT.clone(), captured.clone());
    assert_eq!(text(codec.serialize(&as_document).unwrap()), r#"{"age":3}"#);

    let as_structure = WrappedDocument::new(PERSON.clone(), captured);
    assert_eq!(text(codec.serialize(&as_structure).unwrap()), r#"{"age":3}"#);
}

#[test]
fn test_guided_read_round_trips() {
    let codec = JsonCodec::default();
    let input = codec.serialize(&Person::ferris()).unwrap();
    let wrapped = codec
        .deserialize(&input, SchemaGuidedDocumentBuilder::new(&PERSON))
        .unwrap();

    assert_eq!(wrapped.shape_type(), ShapeType::Structure);
    assert_eq!(
        wrapped.get_member("age").unwrap().unwrap().document(),
        &Document::Integer(7)
    );
    let birthday = wrapped.get_member("birthday").unwrap().unwrap();
    assert_eq!(
        birthday.document(),
        &Document::Timestamp(chrono::DateTime::from_timestamp(1_700_000_000, 0).unwrap())
    );
    assert_eq!(codec.serialize(&wrapped).unwrap(), input);

    let typed = wrapped.document().as_shape(common::PersonBuilder::default()).unwrap();
    assert_eq!(typed, Person::ferris());
}

#[test]
fn test_children_are_wrapped() {
    let wrapped = WrappedDocument::new(PERSON.clone(), Document::from(ferris_members()));

    let tags = wrapped.get_member("tags").unwrap().unwrap();
    assert_eq!(tags.shape_type(), ShapeType::List);
    let items = tags.as_list().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].shape_type(), ShapeType::String);
    assert_eq!(items[0].document().as_string().unwrap(), "crab");

    let entries = wrapped.as_string_map().unwrap();
    assert_eq!(entries["age"].shape_type(), ShapeType::Integer);
    assert!(wrapped.get_member("missing").unwrap().is_none());
}

#[test]
fn test_null_elements_become_null_documents() {
    let list = Schema::builder("com.example#Sparse".parse().unwrap(), ShapeType::List)
        .member("member", &*prelude::STRING)
        .build()
        .unwrap();
    let map = Schema::builder("com.example#SparseMap".parse().unwrap(), ShapeType::Map)
        .member("key", &*prelude::STRING)
        .member("value", &*prelude::INTEGER)
        .build()
        .unwrap();
    let codec = JsonCodec::default();

    let read = codec
        .deserialize(br#"["a",null]"#, SchemaGuidedDocumentBuilder::new(&list))
        .unwrap();
    assert_eq!(
        read.into_document(),
        Document::from(vec![Document::from("a"), Document::Null])
    );

    let read = codec
        .deserialize(br#"{"x":1,"y":null}"#, SchemaGuidedDocumentBuilder::new(&map))
        .unwrap();
    assert_eq!(
        read.into_document(),
        Document::from(Map::from([
            ("x".to_owned(), Document::Integer(1)),
            ("y".to_owned(), Document::Null),
        ]))
    );
}

#[test]
fn test_guided_read_uses_schema_kinds() {
    let codec = JsonCodec::default();
    let read = codec
        .deserialize(b"5", SchemaGuidedDocumentBuilder::new(&prelude::LONG))
        .unwrap();
    assert_eq!(read.document(), &Document::Long(5));

    let read = codec
        .deserialize(b"5", SchemaGuidedDocumentBuilder::new(&prelude::BIG_DECIMAL))
        .unwrap();
    assert_eq!(read.document(), &Document::BigDecimal("5".parse().unwrap()));

    let err = codec
        .deserialize(br#""5""#, SchemaGuidedDocumentBuilder::new(&prelude::LONG))
        .unwrap_err();
    assert!(err.is_type_coercion());
}

#[test]
fn test_union_value_count() {
    let codec = JsonCodec::default();

    let err = codec
        .deserialize(b"{}", SchemaGuidedDocumentBuilder::new(&CHOICE))
        .unwrap_err();
    assert_eq!(
        *err.code(),
        ErrorCode::EmptyUnion("com.example#Choice".into())
    );

    let err = codec
        .deserialize(
            br#"{"text":"a","number":1}"#,
            SchemaGuidedDocumentBuilder::new(&CHOICE),
        )
        .unwrap_err();
    assert_eq!(
        *err.code(),
        ErrorCode::MultipleUnionValues("com.example#Choice".into())
    );

    let one = codec
        .deserialize(
            br#"{"text":"a","number":null}"#,
            SchemaGuidedDocumentBuilder::new(&CHOICE),
        )
        .unwrap();
    assert_eq!(one.document().member_names(), ["text"]);
}

#[test]
fn test_builder_without_value() {
    let err = SchemaGuidedDocumentBuilder::new(&prelude::STRING)
        .build()
        .unwrap_err();
    assert!(err.is_data());

    let empty = SchemaGuidedDocumentBuilder::new(&PERSON).build().unwrap();
    assert_eq!(empty.document(), &Document::Map(Map::new()));
}

#[test]
fn test_set_member_value() {
    let mut builder = SchemaGuidedDocumentBuilder::new(&PERSON);
    builder
        .set_member_value(member(&PERSON, "age"), Document::from(9))
        .unwrap();

    let err = builder
        .set_member_value(member(&TAGS, "member"), Document::from("x"))
        .unwrap_err();
    assert!(matches!(err.code(), ErrorCode::SchemaMismatch(_)));

    let wrapped = builder.build().unwrap();
    assert_eq!(text(JsonCodec::default().serialize(&wrapped).unwrap()), r#"{"age":9}"#);
}

#[test]
fn test_discriminator_uses_service_namespace() {
    let doc = Document::from(Map::from([("__type".to_owned(), Document::from("Foo"))]));
    let service: ShapeId = "com.example#Service".parse().unwrap();

    let wrapped = WrappedDocument::new(prelude::DOCUMENT.clone(), doc.clone()).with_service(service);
    assert_eq!(
        wrapped.discriminator().unwrap().unwrap().to_string(),
        "com.example#Foo"
    );

    let unqualified = WrappedDocument::new(prelude::DOCUMENT.clone(), doc);
    assert!(unqualified.discriminator().is_err());

    let structure = WrappedDocument::new(
        PERSON.clone(),
        Document::of_struct(&Person::default()).unwrap(),
    );
    assert_eq!(
        structure.discriminator().unwrap().unwrap().to_string(),
        "com.example#Person"
    );
}
