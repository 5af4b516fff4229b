use super::{ElementWriter, EntryWriter, SerializableStruct, ShapeSerializer};
use crate::document::{BigDecimal, BigInteger, Document};
use crate::error::Result;
use crate::schema::Schema;
use chrono::{DateTime, Utc};

/// Hook run around every write of an [`InterceptingSerializer`].
///
/// The interceptor receives the schema of the write and a closure that
/// performs it. It may emit output before and after, pick the serializer the
/// write lands in, or drop the write altogether. Codecs use this for the
/// field name in front of a structure member and for list separators.
pub trait Interceptor {
    /// Runs `write`, which performs exactly one `write_*` call, against a
    /// serializer of the interceptor's choosing.
    fn intercept(&mut self, schema: &Schema, write: &mut ElementWriter) -> Result<()>;
}

/// A serializer that routes every write through an [`Interceptor`].
pub struct InterceptingSerializer<I> {
    interceptor: I,
}

impl<I> InterceptingSerializer<I> {
    /// Wraps `interceptor`.
    pub fn new(interceptor: I) -> Self {
        InterceptingSerializer { interceptor }
    }

    /// Unwraps the interceptor.
    pub fn into_inner(self) -> I {
        self.interceptor
    }
}

impl<I: Interceptor> ShapeSerializer for InterceptingSerializer<I> {
    fn write_struct(&mut self, schema: &Schema, value: &dyn SerializableStruct) -> Result<()> {
        self.interceptor
            .intercept(schema, &mut |s| s.write_struct(schema, value))
    }

    fn write_list(&mut self, schema: &Schema, size: usize, elements: &mut ElementWriter) -> Result<()> {
        self.interceptor
            .intercept(schema, &mut |s| s.write_list(schema, size, &mut *elements))
    }

    fn write_map(&mut self, schema: &Schema, size: usize, entries: &mut EntryWriter) -> Result<()> {
        self.interceptor
            .intercept(schema, &mut |s| s.write_map(schema, size, &mut *entries))
    }

    fn write_boolean(&mut self, schema: &Schema, value: bool) -> Result<()> {
        self.interceptor
            .intercept(schema, &mut |s| s.write_boolean(schema, value))
    }

    fn write_byte(&mut self, schema: &Schema, value: i8) -> Result<()> {
        self.interceptor
            .intercept(schema, &mut |s| s.write_byte(schema, value))
    }

    fn write_short(&mut self, schema: &Schema, value: i16) -> Result<()> {
        self.interceptor
            .intercept(schema, &mut |s| s.write_short(schema, value))
    }

    fn write_integer(&mut self, schema: &Schema, value: i32) -> Result<()> {
        self.interceptor
            .intercept(schema, &mut |s| s.write_integer(schema, value))
    }

    fn write_long(&mut self, schema: &Schema, value: i64) -> Result<()> {
        self.interceptor
            .intercept(schema, &mut |s| s.write_long(schema, value))
    }

    fn write_float(&mut self, schema: &Schema, value: f32) -> Result<()> {
        self.interceptor
            .intercept(schema, &mut |s| s.write_float(schema, value))
    }

    fn write_double(&mut self, schema: &Schema, value: f64) -> Result<()> {
        self.interceptor
            .intercept(schema, &mut |s| s.write_double(schema, value))
    }

    fn write_big_integer(&mut self, schema: &Schema, value: &BigInteger) -> Result<()> {
        self.interceptor
            .intercept(schema, &mut |s| s.write_big_integer(schema, value))
    }

    fn write_big_decimal(&mut self, schema: &Schema, value: &BigDecimal) -> Result<()> {
        self.interceptor
            .intercept(schema, &mut |s| s.write_big_decimal(schema, value))
    }

    fn write_string(&mut self, schema: &Schema, value: &str) -> Result<()> {
        self.interceptor
            .intercept(schema, &mut |s| s.write_string(schema, value))
    }

    fn write_blob(&mut self, schema: &Schema, value: &[u8]) -> Result<()> {
        self.interceptor
            .intercept(schema, &mut |s| s.write_blob(schema, value))
    }

    fn write_timestamp(&mut self, schema: &Schema, value: DateTime<Utc>) -> Result<()> {
        self.interceptor
            .intercept(schema, &mut |s| s.write_timestamp(schema, value))
    }

    fn write_document(&mut self, schema: &Schema, value: &Document) -> Result<()> {
        self.interceptor
            .intercept(schema, &mut |s| s.write_document(schema, value))
    }

    fn write_null(&mut self, schema: &Schema) -> Result<()> {
        self.interceptor.intercept(schema, &mut |s| s.write_null(schema))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentParser;
    use crate::schema::prelude;

    struct Doubler {
        inner: DocumentParser,
        seen: Vec<String>,
    }

    impl Interceptor for Doubler {
        fn intercept(&mut self, schema: &Schema, write: &mut ElementWriter) -> Result<()> {
            self.seen.push(schema.id().to_string());
            write(&mut self.inner)
        }
    }

    #[test]
    fn every_write_passes_through() {
        let mut ser = InterceptingSerializer::new(Doubler {
            inner: DocumentParser::new(),
            seen: Vec::new(),
        });
        ser.write_integer(&prelude::INTEGER, 7).unwrap();
        let doubler = ser.into_inner();
        assert_eq!(doubler.seen, ["shape.prelude#Integer"]);
        assert_eq!(doubler.inner.into_document(), Document::Integer(7));
    }
}
