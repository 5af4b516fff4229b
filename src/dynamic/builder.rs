use super::wrapped::WrappedDocument;
use crate::de::{ShapeBuilder, ShapeDeserializer};
use crate::document::{Document, Map};
use crate::error::{Error, ErrorCode, Result};
use crate::schema::{prelude, Schema, ShapeId, ShapeType};

/// Builds a [`WrappedDocument`] by reading whatever `target` describes.
///
/// Every read is driven by the target schema rather than by a typed shape:
/// structures and unions become maps of member name to value, maps become
/// maps, lists recurse with the list member, and scalars are read with the
/// `read_*` call of their kind. The wire never decides the kind of a value.
///
/// ```
/// use shape_serde::dynamic::SchemaGuidedDocumentBuilder;
/// use shape_serde::json::JsonCodec;
/// use shape_serde::schema::prelude;
/// use shape_serde::{Document, Schema, ShapeType};
///
/// # fn main() -> shape_serde::Result<()> {
/// let schema = Schema::builder("com.example#Point".parse()?, ShapeType::Structure)
///     .member("x", &*prelude::LONG)
///     .member("y", &*prelude::LONG)
///     .build()?;
///
/// let codec = JsonCodec::default();
/// let point = codec.deserialize(br#"{"x":1,"y":2,"z":3}"#, SchemaGuidedDocumentBuilder::new(&schema))?;
/// assert_eq!(point.get_member("x")?.unwrap().document(), &Document::Long(1));
/// assert!(point.get_member("z")?.is_none());
/// # Ok(())
/// # }
/// ```
pub struct SchemaGuidedDocumentBuilder {
    target: Schema,
    service: Option<ShapeId>,
    members: Option<Map>,
    result: Option<Document>,
}

impl SchemaGuidedDocumentBuilder {
    /// A builder for values of `target`.
    pub fn new(target: &Schema) -> Self {
        let members = match target.shape_type() {
            ShapeType::Structure | ShapeType::Union | ShapeType::Map => Some(Map::new()),
            _ => None,
        };
        SchemaGuidedDocumentBuilder {
            target: target.clone(),
            service: None,
            members,
            result: None,
        }
    }

    /// Sets the service handed to the built document.
    pub fn with_service(mut self, service: ShapeId) -> Self {
        self.service = Some(service);
        self
    }
}

impl ShapeBuilder for SchemaGuidedDocumentBuilder {
    type Output = WrappedDocument;

    fn schema(&self) -> &Schema {
        &self.target
    }

    fn deserialize(&mut self, de: &mut dyn ShapeDeserializer) -> Result<()> {
        let value = tri!(read(de, &self.target));
        match (&mut self.members, value) {
            (Some(members), Document::Map(map)) => members.extend(map),
            (_, value) => self.result = Some(value),
        }
        Ok(())
    }

    fn set_member_value(&mut self, member: &Schema, value: Document) -> Result<()> {
        let name = match member.member_name() {
            Some(name) if self.target.member(name) == Some(member) => name,
            _ => {
                return Err(Error::data(ErrorCode::SchemaMismatch(
                    format!("{} is not a member of {}", member.id(), self.target).into(),
                )))
            }
        };
        match &mut self.members {
            Some(members) if self.target.shape_type().is_struct_like() => {
                members.insert(name.to_owned(), value);
                Ok(())
            }
            _ => Err(Error::custom(format_args!(
                "cannot set members on a builder for {} {}",
                self.target.shape_type(),
                self.target
            ))),
        }
    }

    fn build(self) -> Result<WrappedDocument> {
        let value = match self.members {
            Some(members) => {
                if self.target.shape_type() == ShapeType::Union {
                    let id = self.target.id().to_string().into_boxed_str();
                    match members.len() {
                        0 => return Err(Error::data(ErrorCode::EmptyUnion(id))),
                        1 => {}
                        _ => return Err(Error::data(ErrorCode::MultipleUnionValues(id))),
                    }
                }
                Document::Map(members)
            }
            None => match self.result {
                Some(value) => value,
                None => {
                    return Err(Error::custom(format_args!(
                        "no value was read for {}",
                        self.target
                    )))
                }
            },
        };
        let wrapped = WrappedDocument::new(self.target, value);
        Ok(match self.service {
            Some(service) => wrapped.with_service(service),
            None => wrapped,
        })
    }
}

fn read(de: &mut dyn ShapeDeserializer, schema: &Schema) -> Result<Document> {
    Ok(match schema.shape_type() {
        ShapeType::Blob => Document::Blob(tri!(de.read_blob(schema))),
        ShapeType::Boolean => Document::Boolean(tri!(de.read_boolean(schema))),
        ShapeType::String | ShapeType::Enum => Document::String(tri!(de.read_string(schema))),
        ShapeType::Timestamp => Document::Timestamp(tri!(de.read_timestamp(schema))),
        ShapeType::Byte => Document::Byte(tri!(de.read_byte(schema))),
        ShapeType::Short => Document::Short(tri!(de.read_short(schema))),
        ShapeType::Integer | ShapeType::IntEnum => Document::Integer(tri!(de.read_integer(schema))),
        ShapeType::Long => Document::Long(tri!(de.read_long(schema))),
        ShapeType::Float => Document::Float(tri!(de.read_float(schema))),
        ShapeType::Double => Document::Double(tri!(de.read_double(schema))),
        ShapeType::BigInteger => Document::BigInteger(tri!(de.read_big_integer(schema))),
        ShapeType::BigDecimal => Document::BigDecimal(tri!(de.read_big_decimal(schema))),
        ShapeType::Document => tri!(de.read_document()),
        ShapeType::List => {
            let member = schema.list_member().unwrap_or(&prelude::DOCUMENT);
            let mut items = Vec::with_capacity(de.container_size().unwrap_or(0));
            tri!(de.read_list(schema, &mut |element| {
                items.push(tri!(read_nullable(element, member)));
                Ok(())
            }));
            Document::List(items)
        }
        ShapeType::Map => {
            let member = schema.map_value_member().unwrap_or(&prelude::DOCUMENT);
            let mut entries = Map::with_capacity(de.container_size().unwrap_or(0));
            tri!(de.read_string_map(schema, &mut |key, value| {
                entries.insert(key, tri!(read_nullable(value, member)));
                Ok(())
            }));
            Document::Map(entries)
        }
        ShapeType::Structure | ShapeType::Union => {
            let mut members = Map::new();
            let mut consumer = |member: &Schema, de: &mut dyn ShapeDeserializer| -> Result<()> {
                if let Some(name) = member.member_name() {
                    members.insert(name.to_owned(), tri!(read(de, member)));
                }
                Ok(())
            };
            tri!(de.read_struct(schema, &mut consumer));
            Document::Map(members)
        }
    })
}

fn read_nullable(de: &mut dyn ShapeDeserializer, schema: &Schema) -> Result<Document> {
    if tri!(de.is_null()) {
        tri!(de.read_null());
        return Ok(Document::Null);
    }
    read(de, schema)
}
