use super::intercept::SchemaInterceptingSerializer;
use crate::document::{Document, DISCRIMINATOR};
use crate::error::Result;
use crate::schema::{prelude, Schema, ShapeId, ShapeType};
use crate::ser::{SerializableShape, SerializableStruct, ShapeSerializer};
use indexmap::IndexMap;

/// A [`Document`] standing in for a modeled value of `schema`.
///
/// Unlike a plain document, a wrapped document serializes like the value it
/// stands for: a structure is written with `write_struct`, a list element by
/// element against the list member, and so on. Only a wrapper whose schema
/// is itself a document writes the document wrapper.
///
/// Children are wrapped with their member schema as they are accessed.
#[derive(Clone, Debug, PartialEq)]
pub struct WrappedDocument {
    schema: Schema,
    value: Document,
    service: Option<ShapeId>,
}

impl WrappedDocument {
    /// Wraps `value` as a value of `schema`.
    pub fn new(schema: Schema, value: Document) -> Self {
        WrappedDocument {
            schema,
            value,
            service: None,
        }
    }

    /// Sets the service whose namespace resolves relative `"__type"` names.
    pub fn with_service(mut self, service: ShapeId) -> Self {
        self.service = Some(service);
        self
    }

    /// The service, if any.
    pub fn service(&self) -> Option<&ShapeId> {
        self.service.as_ref()
    }

    /// The wrapped value.
    pub fn document(&self) -> &Document {
        &self.value
    }

    /// Unwraps the value.
    pub fn into_document(self) -> Document {
        self.value
    }

    /// The kind of the schema, not of the value held.
    pub fn shape_type(&self) -> ShapeType {
        self.schema.shape_type()
    }

    fn wrap(&self, schema: &Schema, value: &Document) -> WrappedDocument {
        WrappedDocument {
            schema: schema.clone(),
            value: value.clone(),
            service: self.service.clone(),
        }
    }

    /// Writes the value as a value of the schema. Only a document schema
    /// writes a document, and that document is of the wrapper's kind: a
    /// captured structure is written as its members, without `"__type"`.
    pub fn serialize(&self, serializer: &mut dyn ShapeSerializer) -> Result<()> {
        if self.schema.shape_type() != ShapeType::Document {
            return self.serialize_contents(serializer);
        }
        match &self.value {
            Document::Structure(captured) => {
                let members = Document::Map(captured.members().clone());
                serializer.write_document(&self.schema, &members)
            }
            value => serializer.write_document(&self.schema, value),
        }
    }

    /// Writes the value held, redirected to the schema.
    pub fn serialize_contents(&self, serializer: &mut dyn ShapeSerializer) -> Result<()> {
        if self.schema.shape_type().is_struct_like() {
            serializer.write_struct(&self.schema, self)
        } else {
            let mut redirect =
                SchemaInterceptingSerializer::new(&self.schema, serializer, self.service.as_ref());
            self.value.serialize_contents(&mut redirect)
        }
    }

    /// A member of the value. Members known to the schema are wrapped with
    /// their member schema, anything else with the document schema.
    pub fn get_member(&self, name: &str) -> Result<Option<WrappedDocument>> {
        let value = match tri!(self.value.get_member(name)) {
            Some(value) => value,
            None => return Ok(None),
        };
        let schema = self.schema.member(name).unwrap_or(&prelude::DOCUMENT);
        Ok(Some(self.wrap(schema, value)))
    }

    /// The elements of a list, each wrapped with the list member.
    pub fn as_list(&self) -> Result<Vec<WrappedDocument>> {
        let items = tri!(self.value.as_list());
        let member = self.schema.list_member().unwrap_or(&prelude::DOCUMENT);
        Ok(items.iter().map(|item| self.wrap(member, item)).collect())
    }

    /// The entries of a map or the members of a structure, each wrapped.
    ///
    /// Map values are wrapped with the map value member. Structure members
    /// are wrapped with their member schema, unknown ones with the document
    /// schema.
    pub fn as_string_map(&self) -> Result<IndexMap<String, WrappedDocument>> {
        let entries = tri!(self.value.as_string_map());
        let mut wrapped = IndexMap::with_capacity(entries.len());
        for (key, value) in entries {
            let schema = if self.schema.shape_type() == ShapeType::Map {
                self.schema.map_value_member()
            } else {
                self.schema.member(key)
            };
            let schema = schema.unwrap_or(&prelude::DOCUMENT);
            wrapped.insert(key.clone(), self.wrap(schema, value));
        }
        Ok(wrapped)
    }

    /// The shape the value stands for.
    ///
    /// A `"__type"` string is resolved against the namespace of the service;
    /// without one, the discriminator of the value held.
    pub fn discriminator(&self) -> Result<Option<ShapeId>> {
        if let Ok(Some(Document::String(id))) = self.value.get_member(DISCRIMINATOR) {
            let namespace = self.service.as_ref().map(ShapeId::namespace);
            return ShapeId::from_optional_namespace(namespace, id).map(Some);
        }
        self.value.discriminator()
    }
}

impl SerializableShape for WrappedDocument {
    fn serialize(&self, serializer: &mut dyn ShapeSerializer) -> Result<()> {
        WrappedDocument::serialize(self, serializer)
    }
}

impl SerializableStruct for WrappedDocument {
    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn serialize_members(&self, serializer: &mut dyn ShapeSerializer) -> Result<()> {
        let members = tri!(self.value.as_string_map());
        for (name, value) in members {
            if value.is_null() {
                continue;
            }
            if let Some(member) = self.schema.member(name) {
                let mut redirect =
                    SchemaInterceptingSerializer::new(member, &mut *serializer, self.service.as_ref());
                tri!(value.serialize_contents(&mut redirect));
            }
        }
        Ok(())
    }
}
