use super::wrapped::WrappedDocument;
use crate::document::{BigDecimal, BigInteger, Document, DocumentParser};
use crate::error::{Error, ErrorCode, Result};
use crate::schema::{prelude, Schema, ShapeId, ShapeType};
use crate::ser::{
    ElementWriter, EntryWriter, InterceptingSerializer, Interceptor, MapKey, MapSerializer,
    SerializableStruct, ShapeSerializer,
};
use chrono::{DateTime, Utc};

/// A serializer that writes everything against a fixed schema.
///
/// Whatever schema the caller names is replaced with the delegate schema, and
/// the contents of aggregates are redirected to its members: list elements
/// to the list member, map values to the map value member, structure
/// members to the member of the same name. This lets a value modeled one way,
/// typically a [`Document`], be written as if it had been modeled the way the
/// delegate schema describes.
///
/// A map written against a structure or union schema is written as that
/// structure, with the entries as members.
pub struct SchemaInterceptingSerializer<'a> {
    schema: &'a Schema,
    delegate: &'a mut dyn ShapeSerializer,
    service: Option<&'a ShapeId>,
}

impl<'a> SchemaInterceptingSerializer<'a> {
    /// Redirects writes into `delegate` to `schema`. `service` is carried to
    /// the wrapped documents built for maps written as structures.
    pub fn new(
        schema: &'a Schema,
        delegate: &'a mut dyn ShapeSerializer,
        service: Option<&'a ShapeId>,
    ) -> Self {
        SchemaInterceptingSerializer {
            schema,
            delegate,
            service,
        }
    }
}

impl ShapeSerializer for SchemaInterceptingSerializer<'_> {
    fn write_struct(&mut self, _: &Schema, value: &dyn SerializableStruct) -> Result<()> {
        let redirected = Redirected {
            schema: self.schema,
            value,
            service: self.service,
        };
        self.delegate.write_struct(self.schema, &redirected)
    }

    fn write_list(&mut self, _: &Schema, size: usize, elements: &mut ElementWriter) -> Result<()> {
        let member = self.schema.list_member().unwrap_or(&prelude::DOCUMENT);
        let service = self.service;
        self.delegate.write_list(self.schema, size, &mut |list| {
            elements(&mut SchemaInterceptingSerializer::new(member, list, service))
        })
    }

    fn write_map(&mut self, schema: &Schema, size: usize, entries: &mut EntryWriter) -> Result<()> {
        match self.schema.shape_type() {
            ShapeType::Map | ShapeType::Document => {
                let key_schema = self.schema.map_key_member().unwrap_or(&prelude::STRING_MAP_KEY);
                let value_schema = self.schema.map_value_member().unwrap_or(&prelude::DOCUMENT);
                let service = self.service;
                self.delegate.write_map(self.schema, size, &mut |map| {
                    entries(&mut RedirectedEntries {
                        key_schema,
                        value_schema,
                        inner: map,
                        service,
                    })
                })
            }
            ShapeType::Structure | ShapeType::Union => {
                let mut parser = DocumentParser::new();
                tri!(parser.write_map(schema, size, entries));
                let mut wrapped = WrappedDocument::new(self.schema.clone(), parser.into_document());
                if let Some(service) = self.service {
                    wrapped = wrapped.with_service(service.clone());
                }
                self.delegate.write_struct(self.schema, &wrapped)
            }
            _ => Err(Error::data(ErrorCode::SchemaMismatch(
                format!("Expected a map, structure, or union, but found {}", self.schema).into(),
            ))),
        }
    }

    fn write_boolean(&mut self, _: &Schema, value: bool) -> Result<()> {
        self.delegate.write_boolean(self.schema, value)
    }

    fn write_byte(&mut self, _: &Schema, value: i8) -> Result<()> {
        self.delegate.write_byte(self.schema, value)
    }

    fn write_short(&mut self, _: &Schema, value: i16) -> Result<()> {
        self.delegate.write_short(self.schema, value)
    }

    fn write_integer(&mut self, _: &Schema, value: i32) -> Result<()> {
        self.delegate.write_integer(self.schema, value)
    }

    fn write_long(&mut self, _: &Schema, value: i64) -> Result<()> {
        self.delegate.write_long(self.schema, value)
    }

    fn write_float(&mut self, _: &Schema, value: f32) -> Result<()> {
        self.delegate.write_float(self.schema, value)
    }

    fn write_double(&mut self, _: &Schema, value: f64) -> Result<()> {
        self.delegate.write_double(self.schema, value)
    }

    fn write_big_integer(&mut self, _: &Schema, value: &BigInteger) -> Result<()> {
        self.delegate.write_big_integer(self.schema, value)
    }

    fn write_big_decimal(&mut self, _: &Schema, value: &BigDecimal) -> Result<()> {
        self.delegate.write_big_decimal(self.schema, value)
    }

    fn write_string(&mut self, _: &Schema, value: &str) -> Result<()> {
        self.delegate.write_string(self.schema, value)
    }

    fn write_blob(&mut self, _: &Schema, value: &[u8]) -> Result<()> {
        self.delegate.write_blob(self.schema, value)
    }

    fn write_timestamp(&mut self, _: &Schema, value: DateTime<Utc>) -> Result<()> {
        self.delegate.write_timestamp(self.schema, value)
    }

    fn write_document(&mut self, _: &Schema, value: &Document) -> Result<()> {
        // The caller's schema is ignored: only a delegate modeled as a
        // document gets the document wrapper.
        if self.schema.shape_type() == ShapeType::Document {
            self.delegate.write_document(self.schema, value)
        } else {
            value.serialize_contents(self)
        }
    }

    fn write_null(&mut self, _: &Schema) -> Result<()> {
        self.delegate.write_null(self.schema)
    }

    fn flush(&mut self) -> Result<()> {
        self.delegate.flush()
    }
}

/// A structure presented under another schema. Members are matched by name;
/// members the schema does not know are dropped.
struct Redirected<'a> {
    schema: &'a Schema,
    value: &'a dyn SerializableStruct,
    service: Option<&'a ShapeId>,
}

impl SerializableStruct for Redirected<'_> {
    fn schema(&self) -> &Schema {
        self.schema
    }

    fn serialize_members(&self, serializer: &mut dyn ShapeSerializer) -> Result<()> {
        self.value
            .serialize_members(&mut InterceptingSerializer::new(MemberRedirect {
                schema: self.schema,
                inner: serializer,
                service: self.service,
            }))
    }
}

struct MemberRedirect<'a> {
    schema: &'a Schema,
    inner: &'a mut dyn ShapeSerializer,
    service: Option<&'a ShapeId>,
}

impl Interceptor for MemberRedirect<'_> {
    fn intercept(&mut self, schema: &Schema, write: &mut ElementWriter) -> Result<()> {
        let container = self.schema;
        let member = match schema.member_name().and_then(|name| container.member(name)) {
            Some(member) => member,
            None => return Ok(()),
        };
        write(&mut SchemaInterceptingSerializer::new(member, &mut *self.inner, self.service))
    }
}

struct RedirectedEntries<'a> {
    key_schema: &'a Schema,
    value_schema: &'a Schema,
    inner: &'a mut dyn MapSerializer,
    service: Option<&'a ShapeId>,
}

impl MapSerializer for RedirectedEntries<'_> {
    fn write_entry(&mut self, _: &Schema, key: MapKey<'_>, value: &mut ElementWriter) -> Result<()> {
        let value_schema = self.value_schema;
        let service = self.service;
        self.inner.write_entry(self.key_schema, key, &mut |s| {
            value(&mut SchemaInterceptingSerializer::new(value_schema, s, service))
        })
    }
}
