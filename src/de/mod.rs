//! The deserializer half of the shape protocol.
//!
//! Builders pull values out of a [`ShapeDeserializer`] by naming the schema
//! they expect. Aggregates push their contents back into consumers: one call
//! per structure member, list element or map entry.

use crate::document::{BigDecimal, BigInteger, Document};
use crate::error::Result;
use crate::schema::Schema;
use chrono::{DateTime, Utc};

/// Receives one list element.
pub type ElementConsumer<'a> = dyn FnMut(&mut dyn ShapeDeserializer) -> Result<()> + 'a;

/// Receives one map entry: the key and a deserializer positioned at the value.
pub type EntryConsumer<'a> = dyn FnMut(String, &mut dyn ShapeDeserializer) -> Result<()> + 'a;

/// A decoder of shapes.
///
/// A deserializer handed to a consumer is positioned at a single value and
/// must be read exactly once.
pub trait ShapeDeserializer {
    /// Reads a boolean.
    fn read_boolean(&mut self, schema: &Schema) -> Result<bool>;

    /// Reads an 8-bit integer.
    fn read_byte(&mut self, schema: &Schema) -> Result<i8>;

    /// Reads a 16-bit integer.
    fn read_short(&mut self, schema: &Schema) -> Result<i16>;

    /// Reads a 32-bit integer.
    fn read_integer(&mut self, schema: &Schema) -> Result<i32>;

    /// Reads a 64-bit integer.
    fn read_long(&mut self, schema: &Schema) -> Result<i64>;

    /// Reads a single-precision float.
    fn read_float(&mut self, schema: &Schema) -> Result<f32>;

    /// Reads a double-precision float.
    fn read_double(&mut self, schema: &Schema) -> Result<f64>;

    /// Reads an arbitrary-precision integer.
    fn read_big_integer(&mut self, schema: &Schema) -> Result<BigInteger>;

    /// Reads an arbitrary-precision decimal.
    fn read_big_decimal(&mut self, schema: &Schema) -> Result<BigDecimal>;

    /// Reads a string.
    fn read_string(&mut self, schema: &Schema) -> Result<String>;

    /// Reads binary data.
    fn read_blob(&mut self, schema: &Schema) -> Result<Vec<u8>>;

    /// Reads an instant.
    fn read_timestamp(&mut self, schema: &Schema) -> Result<DateTime<Utc>>;

    /// Reads whatever value comes next as a document. A null reads as
    /// [`Document::Null`].
    fn read_document(&mut self) -> Result<Document>;

    /// Reads a structure or union, resolving every field to a member of
    /// `schema` and handing it to `consumer`.
    ///
    /// Fields whose value is null are skipped. Fields that match no member go
    /// to [`StructMemberConsumer::unknown_member`], unless the encoding is
    /// configured to reject them.
    fn read_struct(&mut self, schema: &Schema, consumer: &mut dyn StructMemberConsumer) -> Result<()>;

    /// Reads a list, calling `consumer` once per element.
    fn read_list(&mut self, schema: &Schema, consumer: &mut ElementConsumer) -> Result<()>;

    /// Reads a string-keyed map, calling `consumer` once per entry.
    fn read_string_map(&mut self, schema: &Schema, consumer: &mut EntryConsumer) -> Result<()>;

    /// Whether the next value is null. Does not consume it.
    fn is_null(&mut self) -> Result<bool>;

    /// Consumes a null.
    fn read_null(&mut self) -> Result<()>;

    /// Number of elements or entries of the aggregate about to be read, when
    /// the encoding knows it up front. Advisory only.
    fn container_size(&self) -> Option<usize> {
        None
    }

    /// Checks that the input has been fully consumed.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Receives the members of a structure as they are read.
pub trait StructMemberConsumer {
    /// Reads the value of `member` from `de`.
    fn accept(&mut self, member: &Schema, de: &mut dyn ShapeDeserializer) -> Result<()>;

    /// Called for a field that matches no member. The value has already been
    /// skipped. Ignores the field by default.
    fn unknown_member(&mut self, name: &str) -> Result<()> {
        let _ = name;
        Ok(())
    }
}

impl<F> StructMemberConsumer for F
where
    F: FnMut(&Schema, &mut dyn ShapeDeserializer) -> Result<()>,
{
    fn accept(&mut self, member: &Schema, de: &mut dyn ShapeDeserializer) -> Result<()> {
        self(member, de)
    }
}

/// Builds a value of a shape from a deserializer or from documents.
pub trait ShapeBuilder {
    /// What the builder produces.
    type Output;

    /// The schema of the shape being built.
    fn schema(&self) -> &Schema;

    /// Reads the whole shape from `de`.
    fn deserialize(&mut self, de: &mut dyn ShapeDeserializer) -> Result<()>;

    /// Sets a single member from a document value.
    fn set_member_value(&mut self, member: &Schema, value: Document) -> Result<()>;

    /// Finishes the value.
    fn build(self) -> Result<Self::Output>
    where
        Self: Sized;
}
