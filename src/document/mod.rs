//! The dynamic value model.
//!
//! A [`Document`] holds a value of any shape kind without a compile-time
//! type. Documents come from three places: parsed straight off the wire with
//! [`ShapeDeserializer::read_document`], captured from a typed shape with
//! [`Document::of_struct`], or built by hand.
//!
//! ```
//! use shape_serde::{Document, Map, ShapeType};
//!
//! # fn main() -> shape_serde::Result<()> {
//! let mut members = Map::new();
//! members.insert("id".to_owned(), Document::from(42));
//! members.insert("tags".to_owned(), Document::from(vec![Document::from("new")]));
//! let doc = Document::from(members);
//!
//! assert_eq!(doc.shape_type(), ShapeType::Map);
//! assert_eq!(doc.get_member("id")?.unwrap().as_long()?, 42);
//! assert_eq!(doc.member_names(), ["id", "tags"]);
//!
//! // Conversions that make no sense fail instead of guessing.
//! assert!(doc.as_string().unwrap_err().is_type_coercion());
//! # Ok(())
//! # }
//! ```
//!
//! [`ShapeDeserializer::read_document`]: crate::de::ShapeDeserializer::read_document

mod de;
mod map;
mod number;
mod parser;
#[cfg(feature = "serde")]
mod serde;

pub use self::de::DocumentDeserializer;
pub use self::map::Map;
pub use self::number::{BigDecimal, BigInteger};
pub use self::parser::DocumentParser;

use crate::de::ShapeBuilder;
use crate::error::{Error, Result};
use crate::schema::{prelude, Schema, ShapeId, ShapeType};
use crate::ser::{MapKey, SerializableShape, SerializableStruct, ShapeSerializer, WithSchema};
use crate::timestamp;
use chrono::{DateTime, Utc};
use std::fmt::{self, Display};
use std::sync::LazyLock;

/// Field of a map document naming the shape it stands for.
pub const DISCRIMINATOR: &str = "__type";

static EMPTY_MAP: LazyLock<Map> = LazyLock::new(Map::new);

/// A value of any shape kind.
///
/// Accessors convert between numeric kinds with `as`-cast semantics:
/// narrowing wraps, floats truncate towards zero and saturate. A null
/// document answers every scalar accessor with the zero value of the kind.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Document {
    /// Absence of a value.
    #[default]
    Null,
    /// `true` or `false`.
    Boolean(bool),
    /// An 8-bit integer.
    Byte(i8),
    /// A 16-bit integer.
    Short(i16),
    /// A 32-bit integer.
    Integer(i32),
    /// A 64-bit integer.
    Long(i64),
    /// A single-precision float.
    Float(f32),
    /// A double-precision float.
    Double(f64),
    /// An integer of any size.
    BigInteger(BigInteger),
    /// A decimal of any size and precision.
    BigDecimal(BigDecimal),
    /// A string.
    String(String),
    /// Binary data.
    Blob(Vec<u8>),
    /// An instant, with millisecond precision on most wire formats.
    Timestamp(DateTime<Utc>),
    /// An ordered list.
    List(Vec<Document>),
    /// A string-keyed map in insertion order.
    Map(Map),
    /// The members of a modeled structure or union.
    Structure(StructDocument),
}

/// A structure captured together with its schema.
#[derive(Clone, Debug, PartialEq)]
pub struct StructDocument {
    schema: Schema,
    members: Map,
}

impl StructDocument {
    /// Pairs member values with the schema they belong to. A member schema is
    /// replaced by its target.
    pub fn new(schema: &Schema, members: Map) -> Self {
        StructDocument {
            schema: schema.target().unwrap_or(schema).clone(),
            members,
        }
    }

    /// The member values, keyed by member name.
    pub fn members(&self) -> &Map {
        &self.members
    }

    /// Consumes the document, returning the member values.
    pub fn into_members(self) -> Map {
        self.members
    }
}

impl SerializableStruct for StructDocument {
    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn serialize_members(&self, serializer: &mut dyn ShapeSerializer) -> Result<()> {
        for (name, value) in &self.members {
            if let Some(member) = self.schema.member(name) {
                tri!(value.serialize_contents(&mut WithSchema::new(member, serializer)));
            }
        }
        Ok(())
    }
}

macro_rules! integral {
    ($($(#[$doc:meta])* $name:ident -> $ty:ty, $kind:ident;)*) => {
        $(
            $(#[$doc])*
            pub fn $name(&self) -> Result<$ty> {
                match *self {
                    Document::Null => Ok(0),
                    Document::Byte(n) => Ok(n as $ty),
                    Document::Short(n) => Ok(n as $ty),
                    Document::Integer(n) => Ok(n as $ty),
                    Document::Long(n) => Ok(n as $ty),
                    Document::Float(n) => Ok(n as $ty),
                    Document::Double(n) => Ok(n as $ty),
                    Document::BigInteger(ref n) => Ok(n.to_i64_wrapping() as $ty),
                    Document::BigDecimal(ref n) => Ok(decimal_to_i64(n) as $ty),
                    _ => Err(self.coercion(ShapeType::$kind)),
                }
            }
        )*
    };
}

macro_rules! floating {
    ($($(#[$doc:meta])* $name:ident -> $ty:ty, $kind:ident;)*) => {
        $(
            $(#[$doc])*
            pub fn $name(&self) -> Result<$ty> {
                match *self {
                    Document::Null => Ok(0.0),
                    Document::Byte(n) => Ok(n as $ty),
                    Document::Short(n) => Ok(n as $ty),
                    Document::Integer(n) => Ok(n as $ty),
                    Document::Long(n) => Ok(n as $ty),
                    Document::Float(n) => Ok(n as $ty),
                    Document::Double(n) => Ok(n as $ty),
                    Document::BigInteger(ref n) => Ok(n.to_f64() as $ty),
                    Document::BigDecimal(ref n) => Ok(n.to_f64() as $ty),
                    Document::String(ref s) => match special_float(s) {
                        Some(n) => Ok(n as $ty),
                        None => Err(self.coercion(ShapeType::$kind)),
                    },
                    _ => Err(self.coercion(ShapeType::$kind)),
                }
            }
        )*
    };
}

impl Document {
    /// A blob document.
    pub fn blob(bytes: impl Into<Vec<u8>>) -> Self {
        Document::Blob(bytes.into())
    }

    /// A structure document.
    pub fn structure(schema: &Schema, members: Map) -> Self {
        Document::Structure(StructDocument::new(schema, members))
    }

    /// Captures a typed structure as a document, keeping its schema.
    pub fn of_struct(value: &dyn SerializableStruct) -> Result<Self> {
        let mut parser = DocumentParser::new();
        tri!(parser.write_struct(value.schema(), value));
        Ok(parser.into_document())
    }

    /// Captures any serializable value as a document.
    pub fn of_shape(value: &dyn SerializableShape) -> Result<Self> {
        let mut parser = DocumentParser::new();
        tri!(value.serialize(&mut parser));
        Ok(parser.into_document())
    }

    /// Builds a typed shape out of the document.
    pub fn as_shape<B: ShapeBuilder>(&self, mut builder: B) -> Result<B::Output> {
        tri!(builder.deserialize(&mut DocumentDeserializer::new(self)));
        builder.build()
    }

    /// The kind of value held. Null answers [`ShapeType::Document`].
    pub fn shape_type(&self) -> ShapeType {
        match self {
            Document::Null => ShapeType::Document,
            Document::Boolean(_) => ShapeType::Boolean,
            Document::Byte(_) => ShapeType::Byte,
            Document::Short(_) => ShapeType::Short,
            Document::Integer(_) => ShapeType::Integer,
            Document::Long(_) => ShapeType::Long,
            Document::Float(_) => ShapeType::Float,
            Document::Double(_) => ShapeType::Double,
            Document::BigInteger(_) => ShapeType::BigInteger,
            Document::BigDecimal(_) => ShapeType::BigDecimal,
            Document::String(_) => ShapeType::String,
            Document::Blob(_) => ShapeType::Blob,
            Document::Timestamp(_) => ShapeType::Timestamp,
            Document::List(_) => ShapeType::List,
            Document::Map(_) => ShapeType::Map,
            Document::Structure(s) => s.schema.shape_type(),
        }
    }

    /// Whether the document is [`Document::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Document::Null)
    }

    #[cold]
    fn coercion(&self, expected: ShapeType) -> Error {
        Error::type_coercion(expected, self.shape_type())
    }

    /// The boolean value.
    pub fn as_boolean(&self) -> Result<bool> {
        match *self {
            Document::Boolean(b) => Ok(b),
            Document::Null => Ok(false),
            _ => Err(self.coercion(ShapeType::Boolean)),
        }
    }

    integral! {
        /// Any numeric value, narrowed to 8 bits.
        as_byte -> i8, Byte;
        /// Any numeric value, narrowed to 16 bits.
        as_short -> i16, Short;
        /// Any numeric value, narrowed to 32 bits.
        as_integer -> i32, Integer;
        /// Any numeric value as a 64-bit integer.
        as_long -> i64, Long;
    }

    floating! {
        /// Any numeric value as `f32`. The strings `NaN`, `Infinity` and
        /// `-Infinity` read as the special values.
        as_float -> f32, Float;
        /// Any numeric value as `f64`. The strings `NaN`, `Infinity` and
        /// `-Infinity` read as the special values.
        as_double -> f64, Double;
    }

    /// Any numeric value as an arbitrary-precision integer. Fractions are
    /// dropped; NaN and the infinities cannot be represented.
    pub fn as_big_integer(&self) -> Result<BigInteger> {
        let converted = match *self {
            Document::Null => Some(BigInteger::from(0)),
            Document::Byte(n) => Some(BigInteger::from(n)),
            Document::Short(n) => Some(BigInteger::from(n)),
            Document::Integer(n) => Some(BigInteger::from(n)),
            Document::Long(n) => Some(BigInteger::from(n)),
            Document::Float(n) => BigInteger::from_f64(f64::from(n)),
            Document::Double(n) => BigInteger::from_f64(n),
            Document::BigInteger(ref n) => Some(n.clone()),
            Document::BigDecimal(ref n) => return n.to_big_integer(),
            _ => None,
        };
        match converted {
            Some(n) => Ok(n),
            None => Err(self.coercion(ShapeType::BigInteger)),
        }
    }

    /// Any numeric value as an arbitrary-precision decimal. NaN and the
    /// infinities cannot be represented.
    pub fn as_big_decimal(&self) -> Result<BigDecimal> {
        let converted = match *self {
            Document::Null => Some(BigDecimal::from(0)),
            Document::Byte(n) => Some(BigDecimal::from(n)),
            Document::Short(n) => Some(BigDecimal::from(n)),
            Document::Integer(n) => Some(BigDecimal::from(n)),
            Document::Long(n) => Some(BigDecimal::from(n)),
            Document::Float(n) => BigDecimal::from_f32(n),
            Document::Double(n) => BigDecimal::from_f64(n),
            Document::BigInteger(ref n) => Some(BigDecimal::from(n.clone())),
            Document::BigDecimal(ref n) => Some(n.clone()),
            _ => None,
        };
        match converted {
            Some(n) => Ok(n),
            None => Err(self.coercion(ShapeType::BigDecimal)),
        }
    }

    /// The string value. NaN and infinite floats answer with their wire
    /// names; other numbers are not strings.
    pub fn as_string(&self) -> Result<&str> {
        match self {
            Document::String(s) => Ok(s),
            Document::Null => Ok(""),
            Document::Float(n) => match special_float_name(f64::from(*n)) {
                Some(name) => Ok(name),
                None => Err(self.coercion(ShapeType::String)),
            },
            Document::Double(n) => match special_float_name(*n) {
                Some(name) => Ok(name),
                None => Err(self.coercion(ShapeType::String)),
            },
            _ => Err(self.coercion(ShapeType::String)),
        }
    }

    /// The bytes of a blob, or the UTF-8 bytes of a string.
    pub fn as_blob(&self) -> Result<&[u8]> {
        match self {
            Document::Blob(bytes) => Ok(bytes),
            Document::String(s) => Ok(s.as_bytes()),
            Document::Null => Ok(&[]),
            _ => Err(self.coercion(ShapeType::Blob)),
        }
    }

    /// The instant held. Numbers are taken as seconds since the epoch.
    pub fn as_timestamp(&self) -> Result<DateTime<Utc>> {
        match *self {
            Document::Timestamp(t) => Ok(t),
            Document::Null => Ok(timestamp::epoch()),
            Document::Byte(_)
            | Document::Short(_)
            | Document::Integer(_)
            | Document::Long(_)
            | Document::Float(_)
            | Document::Double(_)
            | Document::BigInteger(_)
            | Document::BigDecimal(_) => timestamp::from_epoch_seconds(tri!(self.as_double())),
            _ => Err(self.coercion(ShapeType::Timestamp)),
        }
    }

    /// The elements of a list.
    pub fn as_list(&self) -> Result<&[Document]> {
        match self {
            Document::List(items) => Ok(items),
            Document::Null => Ok(&[]),
            _ => Err(self.coercion(ShapeType::List)),
        }
    }

    /// The entries of a map, or the members of a structure.
    pub fn as_string_map(&self) -> Result<&Map> {
        match self {
            Document::Map(map) => Ok(map),
            Document::Structure(s) => Ok(&s.members),
            Document::Null => Ok(&EMPTY_MAP),
            _ => Err(self.coercion(ShapeType::Map)),
        }
    }

    /// A member of a structure or an entry of a map.
    ///
    /// Absent members are `Ok(None)`. Asking a scalar or a list for a member
    /// is a coercion error.
    pub fn get_member(&self, name: &str) -> Result<Option<&Document>> {
        match self {
            Document::Map(map) => Ok(map.get(name)),
            Document::Structure(s) => Ok(s.members.get(name)),
            Document::Null => Ok(None),
            _ => Err(self.coercion(ShapeType::Structure)),
        }
    }

    /// Member names of a structure or keys of a map, in order. Empty for
    /// every other kind.
    pub fn member_names(&self) -> Vec<&str> {
        match self {
            Document::Map(map) => map.keys().map(String::as_str).collect(),
            Document::Structure(s) => s.members.keys().map(String::as_str).collect(),
            _ => Vec::new(),
        }
    }

    /// Number of elements, entries or members. `None` for scalars.
    pub fn size(&self) -> Option<usize> {
        match self {
            Document::List(items) => Some(items.len()),
            Document::Map(map) => Some(map.len()),
            Document::Structure(s) => Some(s.members.len()),
            _ => None,
        }
    }

    /// The shape this document stands for, with absolute ids only.
    ///
    /// Same as [`discriminator_in`](Self::discriminator_in) without a
    /// default namespace.
    pub fn discriminator(&self) -> Result<Option<ShapeId>> {
        self.discriminator_in(None)
    }

    /// The shape this document stands for.
    ///
    /// A structure document answers with its schema id. A map answers with
    /// its `__type` string, resolving a bare name against `namespace`.
    /// Anything else has no discriminator.
    ///
    /// ```
    /// use shape_serde::{Document, Map};
    ///
    /// # fn main() -> shape_serde::Result<()> {
    /// let doc = Document::from(Map::from([("__type".to_owned(), Document::from("Foo"))]));
    /// let id = doc.discriminator_in(Some("com.example"))?.unwrap();
    /// assert_eq!(id.to_string(), "com.example#Foo");
    /// assert!(doc.discriminator().is_err());
    /// # Ok(())
    /// # }
    /// ```
    pub fn discriminator_in(&self, namespace: Option<&str>) -> Result<Option<ShapeId>> {
        match self {
            Document::Structure(s) => Ok(Some(s.schema.id().clone())),
            Document::Map(map) => match map.get(DISCRIMINATOR) {
                Some(Document::String(id)) => {
                    ShapeId::from_optional_namespace(namespace, id).map(Some)
                }
                _ => Ok(None),
            },
            _ => Ok(None),
        }
    }

    /// Writes the document as a document, letting the encoding add whatever
    /// it adds for open content.
    pub fn serialize(&self, serializer: &mut dyn ShapeSerializer) -> Result<()> {
        serializer.write_document(&prelude::DOCUMENT, self)
    }

    /// Writes the value held with the matching `write_*` call, against
    /// prelude schemas. Structures are written against their own schema.
    pub fn serialize_contents(&self, serializer: &mut dyn ShapeSerializer) -> Result<()> {
        match self {
            Document::Null => serializer.write_null(&prelude::DOCUMENT),
            Document::Boolean(b) => serializer.write_boolean(&prelude::BOOLEAN, *b),
            Document::Byte(n) => serializer.write_byte(&prelude::BYTE, *n),
            Document::Short(n) => serializer.write_short(&prelude::SHORT, *n),
            Document::Integer(n) => serializer.write_integer(&prelude::INTEGER, *n),
            Document::Long(n) => serializer.write_long(&prelude::LONG, *n),
            Document::Float(n) => serializer.write_float(&prelude::FLOAT, *n),
            Document::Double(n) => serializer.write_double(&prelude::DOUBLE, *n),
            Document::BigInteger(n) => serializer.write_big_integer(&prelude::BIG_INTEGER, n),
            Document::BigDecimal(n) => serializer.write_big_decimal(&prelude::BIG_DECIMAL, n),
            Document::String(s) => serializer.write_string(&prelude::STRING, s),
            Document::Blob(bytes) => serializer.write_blob(&prelude::BLOB, bytes),
            Document::Timestamp(t) => serializer.write_timestamp(&prelude::TIMESTAMP, *t),
            Document::List(items) => {
                serializer.write_list(&prelude::DOCUMENT, items.len(), &mut |elements| {
                    for item in items {
                        tri!(item.serialize_contents(elements));
                    }
                    Ok(())
                })
            }
            Document::Map(map) => serializer.write_map(&prelude::STRING_MAP, map.len(), &mut |entries| {
                for (key, value) in map {
                    tri!(entries.write_entry(
                        &prelude::STRING_MAP_KEY,
                        MapKey::String(key),
                        &mut |s| value.serialize_contents(s),
                    ));
                }
                Ok(())
            }),
            Document::Structure(s) => serializer.write_struct(&s.schema, s),
        }
    }
}

fn decimal_to_i64(n: &BigDecimal) -> i64 {
    match n.to_big_integer() {
        Ok(integer) => integer.to_i64_wrapping(),
        Err(_) => n.to_f64() as i64,
    }
}

pub(crate) fn special_float(s: &str) -> Option<f64> {
    match s {
        "NaN" => Some(f64::NAN),
        "Infinity" => Some(f64::INFINITY),
        "-Infinity" => Some(f64::NEG_INFINITY),
        _ => None,
    }
}

pub(crate) fn special_float_name(n: f64) -> Option<&'static str> {
    if n.is_nan() {
        Some("NaN")
    } else if n == f64::INFINITY {
        Some("Infinity")
    } else if n == f64::NEG_INFINITY {
        Some("-Infinity")
    } else {
        None
    }
}

macro_rules! from_primitive {
    ($($ty:ty => $variant:ident,)*) => {
        $(
            impl From<$ty> for Document {
                #[inline]
                fn from(value: $ty) -> Self {
                    Document::$variant(value)
                }
            }
        )*
    };
}

from_primitive! {
    bool => Boolean,
    i8 => Byte,
    i16 => Short,
    i32 => Integer,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    BigInteger => BigInteger,
    BigDecimal => BigDecimal,
    String => String,
    DateTime<Utc> => Timestamp,
    Vec<Document> => List,
    Map => Map,
    StructDocument => Structure,
}

impl From<&str> for Document {
    fn from(value: &str) -> Self {
        Document::String(value.to_owned())
    }
}

impl<T: Into<Document>> From<Option<T>> for Document {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => value.into(),
            None => Document::Null,
        }
    }
}

impl FromIterator<Document> for Document {
    fn from_iter<I: IntoIterator<Item = Document>>(iter: I) -> Self {
        Document::List(iter.into_iter().collect())
    }
}

impl FromIterator<(String, Document)> for Document {
    fn from_iter<I: IntoIterator<Item = (String, Document)>>(iter: I) -> Self {
        Document::Map(iter.into_iter().collect())
    }
}

/// Compact JSON with default settings.
impl Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let codec = crate::json::JsonCodec::default();
        let bytes = match codec.serialize_document(self) {
            Ok(bytes) => bytes,
            Err(_) => return Err(fmt::Error),
        };
        match std::str::from_utf8(&bytes) {
            Ok(text) => f.write_str(text),
            Err(_) => Err(fmt::Error),
        }
    }
}
