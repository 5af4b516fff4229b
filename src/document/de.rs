use super::{BigDecimal, BigInteger, Document};
use crate::de::{ElementConsumer, EntryConsumer, ShapeDeserializer, StructMemberConsumer};
use crate::error::{Error, Result};
use crate::schema::{Schema, ShapeType};
use chrono::{DateTime, Utc};

/// Reads shapes out of a [`Document`], so that documents can be turned into
/// typed values with the same builders that read the wire.
///
/// Values are converted with the document accessors, so a `long` member can
/// be read from an integer document and a float from `"NaN"`. Structure
/// fields are matched by member name.
pub struct DocumentDeserializer<'a> {
    value: &'a Document,
}

impl<'a> DocumentDeserializer<'a> {
    /// Reads from `value`.
    pub fn new(value: &'a Document) -> Self {
        DocumentDeserializer { value }
    }
}

impl ShapeDeserializer for DocumentDeserializer<'_> {
    fn read_boolean(&mut self, _: &Schema) -> Result<bool> {
        self.value.as_boolean()
    }

    fn read_byte(&mut self, _: &Schema) -> Result<i8> {
        self.value.as_byte()
    }

    fn read_short(&mut self, _: &Schema) -> Result<i16> {
        self.value.as_short()
    }

    fn read_integer(&mut self, _: &Schema) -> Result<i32> {
        self.value.as_integer()
    }

    fn read_long(&mut self, _: &Schema) -> Result<i64> {
        self.value.as_long()
    }

    fn read_float(&mut self, _: &Schema) -> Result<f32> {
        self.value.as_float()
    }

    fn read_double(&mut self, _: &Schema) -> Result<f64> {
        self.value.as_double()
    }

    fn read_big_integer(&mut self, _: &Schema) -> Result<BigInteger> {
        self.value.as_big_integer()
    }

    fn read_big_decimal(&mut self, _: &Schema) -> Result<BigDecimal> {
        self.value.as_big_decimal()
    }

    fn read_string(&mut self, _: &Schema) -> Result<String> {
        self.value.as_string().map(str::to_owned)
    }

    fn read_blob(&mut self, _: &Schema) -> Result<Vec<u8>> {
        self.value.as_blob().map(<[u8]>::to_vec)
    }

    fn read_timestamp(&mut self, _: &Schema) -> Result<DateTime<Utc>> {
        self.value.as_timestamp()
    }

    fn read_document(&mut self) -> Result<Document> {
        Ok(self.value.clone())
    }

    fn read_struct(&mut self, schema: &Schema, consumer: &mut dyn StructMemberConsumer) -> Result<()> {
        let members = tri!(self.value.as_string_map());
        for (name, value) in members {
            if value.is_null() {
                continue;
            }
            match schema.member(name) {
                Some(member) => tri!(consumer.accept(member, &mut DocumentDeserializer::new(value))),
                None => tri!(consumer.unknown_member(name)),
            }
        }
        Ok(())
    }

    fn read_list(&mut self, _: &Schema, consumer: &mut ElementConsumer) -> Result<()> {
        for item in tri!(self.value.as_list()) {
            tri!(consumer(&mut DocumentDeserializer::new(item)));
        }
        Ok(())
    }

    fn read_string_map(&mut self, _: &Schema, consumer: &mut EntryConsumer) -> Result<()> {
        for (key, value) in tri!(self.value.as_string_map()) {
            tri!(consumer(key.clone(), &mut DocumentDeserializer::new(value)));
        }
        Ok(())
    }

    fn is_null(&mut self) -> Result<bool> {
        Ok(self.value.is_null())
    }

    fn read_null(&mut self) -> Result<()> {
        if self.value.is_null() {
            Ok(())
        } else {
            Err(Error::type_coercion(ShapeType::Document, self.value.shape_type()))
        }
    }

    fn container_size(&self) -> Option<usize> {
        self.value.size()
    }
}
