use super::{BigDecimal, BigInteger, Document, Map, StructDocument};
use crate::error::{Error, Result};
use crate::schema::Schema;
use crate::ser::{
    ElementWriter, EntryWriter, InterceptingSerializer, Interceptor, MapKey, MapSerializer,
    SerializableStruct, ShapeSerializer,
};
use chrono::{DateTime, Utc};

/// A serializer that builds a [`Document`] out of whatever is written to it.
///
/// Structures keep their schema, so the document can be written back out
/// exactly as the typed value would have been. Null members are left out.
///
/// ```
/// use shape_serde::document::DocumentParser;
/// use shape_serde::schema::prelude;
/// use shape_serde::{Document, ShapeSerializer};
///
/// # fn main() -> shape_serde::Result<()> {
/// let mut parser = DocumentParser::new();
/// parser.write_string(&prelude::STRING, "hi")?;
/// assert_eq!(parser.into_document(), Document::from("hi"));
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct DocumentParser {
    result: Option<Document>,
}

impl DocumentParser {
    /// A parser that has not seen a value yet.
    pub fn new() -> Self {
        DocumentParser { result: None }
    }

    /// The document written, or [`Document::Null`] when nothing was.
    pub fn into_document(self) -> Document {
        self.result.unwrap_or(Document::Null)
    }

    fn set(&mut self, value: Document) -> Result<()> {
        self.result = Some(value);
        Ok(())
    }
}

fn parse(write: &mut ElementWriter) -> Result<Document> {
    let mut parser = DocumentParser::new();
    tri!(write(&mut parser));
    Ok(parser.into_document())
}

struct MemberCollector<'a> {
    members: &'a mut Map,
}

impl Interceptor for MemberCollector<'_> {
    fn intercept(&mut self, schema: &Schema, write: &mut ElementWriter) -> Result<()> {
        let name = match schema.member_name() {
            Some(name) => name,
            None => {
                return Err(Error::custom(format_args!(
                    "structure member written against non-member schema {}",
                    schema
                )))
            }
        };
        let value = tri!(parse(write));
        if !value.is_null() {
            self.members.insert(name.to_owned(), value);
        }
        Ok(())
    }
}

struct ElementCollector<'a> {
    items: &'a mut Vec<Document>,
}

impl Interceptor for ElementCollector<'_> {
    fn intercept(&mut self, _: &Schema, write: &mut ElementWriter) -> Result<()> {
        let value = tri!(parse(write));
        self.items.push(value);
        Ok(())
    }
}

struct EntryCollector<'a> {
    entries: &'a mut Map,
}

impl MapSerializer for EntryCollector<'_> {
    fn write_entry(&mut self, _: &Schema, key: MapKey<'_>, value: &mut ElementWriter) -> Result<()> {
        let value = tri!(parse(value));
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}

impl ShapeSerializer for DocumentParser {
    fn write_struct(&mut self, schema: &Schema, value: &dyn SerializableStruct) -> Result<()> {
        let mut members = Map::new();
        tri!(value.serialize_members(&mut InterceptingSerializer::new(MemberCollector {
            members: &mut members,
        })));
        self.set(Document::Structure(StructDocument::new(schema, members)))
    }

    fn write_list(&mut self, _: &Schema, size: usize, elements: &mut ElementWriter) -> Result<()> {
        let mut items = Vec::with_capacity(size);
        if size > 0 {
            tri!(elements(&mut InterceptingSerializer::new(ElementCollector {
                items: &mut items,
            })));
        }
        self.set(Document::List(items))
    }

    fn write_map(&mut self, _: &Schema, size: usize, entries: &mut EntryWriter) -> Result<()> {
        let mut map = Map::with_capacity(size);
        if size > 0 {
            tri!(entries(&mut EntryCollector { entries: &mut map }));
        }
        self.set(Document::Map(map))
    }

    fn write_boolean(&mut self, _: &Schema, value: bool) -> Result<()> {
        self.set(Document::Boolean(value))
    }

    fn write_byte(&mut self, _: &Schema, value: i8) -> Result<()> {
        self.set(Document::Byte(value))
    }

    fn write_short(&mut self, _: &Schema, value: i16) -> Result<()> {
        self.set(Document::Short(value))
    }

    fn write_integer(&mut self, _: &Schema, value: i32) -> Result<()> {
        self.set(Document::Integer(value))
    }

    fn write_long(&mut self, _: &Schema, value: i64) -> Result<()> {
        self.set(Document::Long(value))
    }

    fn write_float(&mut self, _: &Schema, value: f32) -> Result<()> {
        self.set(Document::Float(value))
    }

    fn write_double(&mut self, _: &Schema, value: f64) -> Result<()> {
        self.set(Document::Double(value))
    }

    fn write_big_integer(&mut self, _: &Schema, value: &BigInteger) -> Result<()> {
        self.set(Document::BigInteger(value.clone()))
    }

    fn write_big_decimal(&mut self, _: &Schema, value: &BigDecimal) -> Result<()> {
        self.set(Document::BigDecimal(value.clone()))
    }

    fn write_string(&mut self, _: &Schema, value: &str) -> Result<()> {
        self.set(Document::String(value.to_owned()))
    }

    fn write_blob(&mut self, _: &Schema, value: &[u8]) -> Result<()> {
        self.set(Document::Blob(value.to_vec()))
    }

    fn write_timestamp(&mut self, _: &Schema, value: DateTime<Utc>) -> Result<()> {
        self.set(Document::Timestamp(value))
    }

    fn write_document(&mut self, _: &Schema, value: &Document) -> Result<()> {
        self.set(value.clone())
    }

    fn write_null(&mut self, _: &Schema) -> Result<()> {
        self.set(Document::Null)
    }
}
