#![allow(dead_code)]

use chrono::{DateTime, Utc};
use shape_serde::schema::{prelude, Trait};
use shape_serde::{
    Document, Result, Schema, SerializableShape, SerializableStruct, ShapeBuilder,
    ShapeDeserializer, ShapeSerializer, ShapeType, StructMemberConsumer,
};
use std::sync::LazyLock;

pub static TAGS: LazyLock<Schema> = LazyLock::new(|| {
    Schema::builder("com.example#Tags".parse().unwrap(), ShapeType::List)
        .member("member", &*prelude::STRING)
        .build()
        .unwrap()
});

pub static PERSON: LazyLock<Schema> = LazyLock::new(|| {
    Schema::builder("com.example#Person".parse().unwrap(), ShapeType::Structure)
        .member_with_traits("name", &*prelude::STRING, [Trait::JsonName("Name".into())])
        .member("age", &*prelude::INTEGER)
        .member("tags", &*TAGS)
        .member("birthday", &*prelude::TIMESTAMP)
        .build()
        .unwrap()
});

pub static CHOICE: LazyLock<Schema> = LazyLock::new(|| {
    Schema::builder("com.example#Choice".parse().unwrap(), ShapeType::Union)
        .member("text", &*prelude::STRING)
        .member("number", &*prelude::INTEGER)
        .build()
        .unwrap()
});

pub fn member(schema: &'static Schema, name: &str) -> &'static Schema {
    schema.member(name).unwrap()
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Person {
    pub name: Option<String>,
    pub age: Option<i32>,
    pub tags: Vec<String>,
    pub birthday: Option<DateTime<Utc>>,
}

impl Person {
    pub fn ferris() -> Self {
        Person {
            name: Some("Ferris".to_owned()),
            age: Some(7),
            tags: vec!["crab".to_owned(), "rust".to_owned()],
            birthday: DateTime::from_timestamp(1_700_000_000, 0),
        }
    }
}

impl SerializableShape for Person {
    fn serialize(&self, serializer: &mut dyn ShapeSerializer) -> Result<()> {
        serializer.write_struct(&PERSON, self)
    }
}

impl SerializableStruct for Person {
    fn schema(&self) -> &Schema {
        &PERSON
    }

    fn serialize_members(&self, serializer: &mut dyn ShapeSerializer) -> Result<()> {
        if let Some(name) = &self.name {
            serializer.write_string(member(&PERSON, "name"), name)?;
        }
        if let Some(age) = self.age {
            serializer.write_integer(member(&PERSON, "age"), age)?;
        }
        if !self.tags.is_empty() {
            serializer.write_list(member(&PERSON, "tags"), self.tags.len(), &mut |elements| {
                for tag in &self.tags {
                    elements.write_string(member(&TAGS, "member"), tag)?;
                }
                Ok(())
            })?;
        }
        if let Some(birthday) = self.birthday {
            serializer.write_timestamp(member(&PERSON, "birthday"), birthday)?;
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct PersonBuilder {
    person: Person,
    pub unknown: Vec<String>,
}

impl StructMemberConsumer for PersonBuilder {
    fn accept(&mut self, member: &Schema, de: &mut dyn ShapeDeserializer) -> Result<()> {
        match member.member_name() {
            Some("name") => self.person.name = Some(de.read_string(member)?),
            Some("age") => self.person.age = Some(de.read_integer(member)?),
            Some("tags") => {
                let tags = &mut self.person.tags;
                de.read_list(member, &mut |element| {
                    tags.push(element.read_string(&TAGS_MEMBER)?);
                    Ok(())
                })?;
            }
            Some("birthday") => self.person.birthday = Some(de.read_timestamp(member)?),
            _ => {}
        }
        Ok(())
    }

    fn unknown_member(&mut self, name: &str) -> Result<()> {
        self.unknown.push(name.to_owned());
        Ok(())
    }
}

static TAGS_MEMBER: LazyLock<Schema> = LazyLock::new(|| member(&TAGS, "member").clone());

impl ShapeBuilder for PersonBuilder {
    type Output = Person;

    fn schema(&self) -> &Schema {
        &PERSON
    }

    fn deserialize(&mut self, de: &mut dyn ShapeDeserializer) -> Result<()> {
        de.read_struct(&PERSON, self)
    }

    fn set_member_value(&mut self, member: &Schema, value: Document) -> Result<()> {
        match member.member_name() {
            Some("name") => self.person.name = Some(value.as_string()?.to_owned()),
            Some("age") => self.person.age = Some(value.as_integer()?),
            Some("tags") => {
                for tag in value.as_list()? {
                    self.person.tags.push(tag.as_string()?.to_owned());
                }
            }
            Some("birthday") => self.person.birthday = Some(value.as_timestamp()?),
            _ => {}
        }
        Ok(())
    }

    fn build(self) -> Result<Person> {
        Ok(self.person)
    }
}

/// Builder that keeps track of the unknown members it was told about.
pub struct Recording<'a> {
    pub inner: PersonBuilder,
    pub seen: &'a mut Vec<String>,
}

impl ShapeBuilder for Recording<'_> {
    type Output = Person;

    fn schema(&self) -> &Schema {
        &PERSON
    }

    fn deserialize(&mut self, de: &mut dyn ShapeDeserializer) -> Result<()> {
        self.inner.deserialize(de)?;
        self.seen.extend(self.inner.unknown.drain(..));
        Ok(())
    }

    fn set_member_value(&mut self, member: &Schema, value: Document) -> Result<()> {
        self.inner.set_member_value(member, value)
    }

    fn build(self) -> Result<Person> {
        self.inner.build()
    }
}

pub fn text(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes).unwrap()
}
