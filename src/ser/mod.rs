//! The serializer half of the shape protocol.
//!
//! A value describes itself to a [`ShapeSerializer`] one `write_*` call at a
//! time, always naming the [`Schema`] it is written against. Aggregates hand
//! the serializer a closure that writes their contents into a view the
//! serializer provides, so separators, field names and map keys stay the
//! business of the encoding.

mod intercept;

pub use self::intercept::{InterceptingSerializer, Interceptor};

use crate::document::{BigDecimal, BigInteger, Document};
use crate::error::Result;
use crate::schema::Schema;
use chrono::{DateTime, Utc};
use std::fmt::{self, Display};

/// Writes the elements of a list, one `write_*` call per element.
pub type ElementWriter<'a> = dyn FnMut(&mut dyn ShapeSerializer) -> Result<()> + 'a;

/// Writes the entries of a map through a [`MapSerializer`].
pub type EntryWriter<'a> = dyn FnMut(&mut dyn MapSerializer) -> Result<()> + 'a;

/// An encoder of shapes.
///
/// The trait is object safe; values and views pass serializers around as
/// `&mut dyn ShapeSerializer`.
pub trait ShapeSerializer {
    /// Writes a structure or union. `value` writes its own members back into
    /// the serializer through [`SerializableStruct::serialize_members`], each
    /// member write naming the member schema.
    fn write_struct(&mut self, schema: &Schema, value: &dyn SerializableStruct) -> Result<()>;

    /// Writes a list of `size` elements.
    ///
    /// `elements` is called at most once with a view that accepts exactly one
    /// `write_*` call per element. It is not called when `size` is zero.
    fn write_list(&mut self, schema: &Schema, size: usize, elements: &mut ElementWriter)
        -> Result<()>;

    /// Writes a map of `size` entries.
    ///
    /// `entries` is called at most once with a view accepting one
    /// [`MapSerializer::write_entry`] per entry. It is not called when `size`
    /// is zero.
    fn write_map(&mut self, schema: &Schema, size: usize, entries: &mut EntryWriter) -> Result<()>;

    /// Writes a boolean.
    fn write_boolean(&mut self, schema: &Schema, value: bool) -> Result<()>;

    /// Writes an 8-bit integer.
    fn write_byte(&mut self, schema: &Schema, value: i8) -> Result<()>;

    /// Writes a 16-bit integer.
    fn write_short(&mut self, schema: &Schema, value: i16) -> Result<()>;

    /// Writes a 32-bit integer.
    fn write_integer(&mut self, schema: &Schema, value: i32) -> Result<()>;

    /// Writes a 64-bit integer.
    fn write_long(&mut self, schema: &Schema, value: i64) -> Result<()>;

    /// Writes a single-precision float.
    fn write_float(&mut self, schema: &Schema, value: f32) -> Result<()>;

    /// Writes a double-precision float.
    fn write_double(&mut self, schema: &Schema, value: f64) -> Result<()>;

    /// Writes an arbitrary-precision integer.
    fn write_big_integer(&mut self, schema: &Schema, value: &BigInteger) -> Result<()>;

    /// Writes an arbitrary-precision decimal.
    fn write_big_decimal(&mut self, schema: &Schema, value: &BigDecimal) -> Result<()>;

    /// Writes a string.
    fn write_string(&mut self, schema: &Schema, value: &str) -> Result<()>;

    /// Writes binary data.
    fn write_blob(&mut self, schema: &Schema, value: &[u8]) -> Result<()>;

    /// Writes an instant.
    fn write_timestamp(&mut self, schema: &Schema, value: DateTime<Utc>) -> Result<()>;

    /// Writes an open content document.
    ///
    /// Encodings that have nothing to add for documents write the contents
    /// with [`Document::serialize_contents`].
    fn write_document(&mut self, schema: &Schema, value: &Document) -> Result<()>;

    /// Writes an explicit null.
    fn write_null(&mut self, schema: &Schema) -> Result<()>;

    /// Pushes buffered output to the underlying sink.
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Accepts the entries of a map.
pub trait MapSerializer {
    /// Writes one entry. `value` is called exactly once with a view that
    /// accepts a single `write_*` call for the entry value.
    fn write_entry(
        &mut self,
        key_schema: &Schema,
        key: MapKey<'_>,
        value: &mut ElementWriter,
    ) -> Result<()>;
}

/// A map key. Integer keys are quoted by text encodings.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MapKey<'a> {
    /// A string key.
    String(&'a str),
    /// A 32-bit integer key.
    Integer(i32),
    /// A 64-bit integer key.
    Long(i64),
}

impl Display for MapKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MapKey::String(key) => f.write_str(key),
            MapKey::Integer(key) => Display::fmt(key, f),
            MapKey::Long(key) => Display::fmt(key, f),
        }
    }
}

impl<'a> From<&'a str> for MapKey<'a> {
    fn from(key: &'a str) -> Self {
        MapKey::String(key)
    }
}

/// A value that knows how to write itself.
pub trait SerializableShape {
    /// Writes the value with a single `write_*` call.
    fn serialize(&self, serializer: &mut dyn ShapeSerializer) -> Result<()>;
}

/// A structure or union that writes its members one at a time.
///
/// Implementations usually also implement [`SerializableShape`] as
/// `serializer.write_struct(self.schema(), self)`.
pub trait SerializableStruct {
    /// The schema of the structure.
    fn schema(&self) -> &Schema;

    /// Writes every present member, each with a single `write_*` call that
    /// names the member schema.
    fn serialize_members(&self, serializer: &mut dyn ShapeSerializer) -> Result<()>;
}

impl<T> SerializableShape for &T
where
    T: ?Sized + SerializableShape,
{
    fn serialize(&self, serializer: &mut dyn ShapeSerializer) -> Result<()> {
        (**self).serialize(serializer)
    }
}

impl SerializableShape for Document {
    fn serialize(&self, serializer: &mut dyn ShapeSerializer) -> Result<()> {
        Document::serialize(self, serializer)
    }
}

/// Forwards every write to `inner` against a fixed schema, ignoring the
/// schema named by the caller.
///
/// Documents use this to write their contents as a member: the contents
/// name prelude schemas, the encoding needs to see the member.
pub(crate) struct WithSchema<'a> {
    schema: &'a Schema,
    inner: &'a mut dyn ShapeSerializer,
}

impl<'a> WithSchema<'a> {
    pub(crate) fn new(schema: &'a Schema, inner: &'a mut dyn ShapeSerializer) -> Self {
        WithSchema { schema, inner }
    }
}

impl ShapeSerializer for WithSchema<'_> {
    fn write_struct(&mut self, _: &Schema, value: &dyn SerializableStruct) -> Result<()> {
        self.inner.write_struct(self.schema, value)
    }

    fn write_list(&mut self, _: &Schema, size: usize, elements: &mut ElementWriter) -> Result<()> {
        self.inner.write_list(self.schema, size, elements)
    }

    fn write_map(&mut self, _: &Schema, size: usize, entries: &mut EntryWriter) -> Result<()> {
        self.inner.write_map(self.schema, size, entries)
    }

    fn write_boolean(&mut self, _: &Schema, value: bool) -> Result<()> {
        self.inner.write_boolean(self.schema, value)
    }

    fn write_byte(&mut self, _: &Schema, value: i8) -> Result<()> {
        self.inner.write_byte(self.schema, value)
    }

    fn write_short(&mut self, _: &Schema, value: i16) -> Result<()> {
        self.inner.write_short(self.schema, value)
    }

    fn write_integer(&mut self, _: &Schema, value: i32) -> Result<()> {
        self.inner.write_integer(self.schema, value)
    }

    fn write_long(&mut self, _: &Schema, value: i64) -> Result<()> {
        self.inner.write_long(self.schema, value)
    }

    fn write_float(&mut self, _: &Schema, value: f32) -> Result<()> {
        self.inner.write_float(self.schema, value)
    }

    fn write_double(&mut self, _: &Schema, value: f64) -> Result<()> {
        self.inner.write_double(self.schema, value)
    }

    fn write_big_integer(&mut self, _: &Schema, value: &BigInteger) -> Result<()> {
        self.inner.write_big_integer(self.schema, value)
    }

    fn write_big_decimal(&mut self, _: &Schema, value: &BigDecimal) -> Result<()> {
        self.inner.write_big_decimal(self.schema, value)
    }

    fn write_string(&mut self, _: &Schema, value: &str) -> Result<()> {
        self.inner.write_string(self.schema, value)
    }

    fn write_blob(&mut self, _: &Schema, value: &[u8]) -> Result<()> {
        self.inner.write_blob(self.schema, value)
    }

    fn write_timestamp(&mut self, _: &Schema, value: DateTime<Utc>) -> Result<()> {
        self.inner.write_timestamp(self.schema, value)
    }

    fn write_document(&mut self, _: &Schema, value: &Document) -> Result<()> {
        self.inner.write_document(self.schema, value)
    }

    fn write_null(&mut self, _: &Schema) -> Result<()> {
        self.inner.write_null(self.schema)
    }

    fn flush(&mut self) -> Result<()> {
        self.inner.flush()
    }
}
