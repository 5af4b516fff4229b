use super::settings::JsonSettings;
use crate::de::{ElementConsumer, EntryConsumer, ShapeDeserializer, StructMemberConsumer};
use crate::document::{BigDecimal, BigInteger, Document, DocumentDeserializer, DISCRIMINATOR};
use crate::error::{Error, ErrorCode, Result};
use crate::schema::{Schema, ShapeType};
use crate::timestamp;
use base64::Engine;
use chrono::{DateTime, Utc};

/// Reads shapes out of a document parsed from JSON.
///
/// A parsed document still holds the wire representation of blobs,
/// timestamps and field names. This deserializer reads them the way
/// [`JsonDeserializer`](super::JsonDeserializer) reads the wire: blobs are
/// base64 strings, timestamps are numbers or strings in the format resolved
/// for the member, and fields are matched through the field mapper.
pub struct JsonDocumentDeserializer<'a> {
    value: &'a Document,
    settings: &'a JsonSettings,
}

impl<'a> JsonDocumentDeserializer<'a> {
    /// Reads from `value` with the options of `settings`.
    pub fn new(value: &'a Document, settings: &'a JsonSettings) -> Self {
        JsonDocumentDeserializer { value, settings }
    }

    fn nested(&self, value: &'a Document) -> Self {
        JsonDocumentDeserializer::new(value, self.settings)
    }

    fn plain(&self) -> DocumentDeserializer<'a> {
        DocumentDeserializer::new(self.value)
    }
}

impl ShapeDeserializer for JsonDocumentDeserializer<'_> {
    fn read_boolean(&mut self, schema: &Schema) -> Result<bool> {
        self.plain().read_boolean(schema)
    }

    fn read_byte(&mut self, schema: &Schema) -> Result<i8> {
        self.plain().read_byte(schema)
    }

    fn read_short(&mut self, schema: &Schema) -> Result<i16> {
        self.plain().read_short(schema)
    }

    fn read_integer(&mut self, schema: &Schema) -> Result<i32> {
        self.plain().read_integer(schema)
    }

    fn read_long(&mut self, schema: &Schema) -> Result<i64> {
        self.plain().read_long(schema)
    }

    fn read_float(&mut self, schema: &Schema) -> Result<f32> {
        self.plain().read_float(schema)
    }

    fn read_double(&mut self, schema: &Schema) -> Result<f64> {
        self.plain().read_double(schema)
    }

    fn read_big_integer(&mut self, schema: &Schema) -> Result<BigInteger> {
        self.plain().read_big_integer(schema)
    }

    fn read_big_decimal(&mut self, schema: &Schema) -> Result<BigDecimal> {
        self.plain().read_big_decimal(schema)
    }

    fn read_string(&mut self, schema: &Schema) -> Result<String> {
        self.plain().read_string(schema)
    }

    fn read_blob(&mut self, schema: &Schema) -> Result<Vec<u8>> {
        match self.value {
            Document::String(encoded) => base64::engine::general_purpose::STANDARD
                .decode(encoded.as_bytes())
                .map_err(|_| Error::data(ErrorCode::InvalidBase64)),
            _ => self.plain().read_blob(schema),
        }
    }

    fn read_timestamp(&mut self, schema: &Schema) -> Result<DateTime<Utc>> {
        let format = self.settings.timestamp_format_for(schema);
        match self.value {
            Document::Timestamp(t) => Ok(*t),
            Document::String(text) if !format.is_numeric() => format.parse_str(text),
            Document::Byte(_)
            | Document::Short(_)
            | Document::Integer(_)
            | Document::Long(_)
            | Document::Float(_)
            | Document::Double(_)
            | Document::BigInteger(_)
            | Document::BigDecimal(_)
                if format.is_numeric() =>
            {
                timestamp::from_epoch_seconds(tri!(self.value.as_double()))
            }
            Document::Null => self.plain().read_timestamp(schema),
            other => Err(Error::type_coercion(ShapeType::Timestamp, other.shape_type())),
        }
    }

    fn read_document(&mut self) -> Result<Document> {
        Ok(self.value.clone())
    }

    fn read_struct(&mut self, schema: &Schema, consumer: &mut dyn StructMemberConsumer) -> Result<()> {
        let mapper = self.settings.field_mapper();
        let is_union = schema.shape_type() == ShapeType::Union;
        for (field, value) in tri!(self.value.as_string_map()) {
            match mapper.field_to_member(schema, field) {
                Some(_) if value.is_null() => {}
                Some(member) => tri!(consumer.accept(member, &mut self.nested(value))),
                None if is_union && field == DISCRIMINATOR => {}
                None => {
                    if is_union && self.settings.forbid_unknown_union_members() {
                        return Err(Error::data(ErrorCode::UnknownMember {
                            container: schema.id().to_string().into_boxed_str(),
                            member: field.clone().into_boxed_str(),
                        }));
                    }
                    tri!(consumer.unknown_member(field));
                }
            }
        }
        Ok(())
    }

    fn read_list(&mut self, _: &Schema, consumer: &mut ElementConsumer) -> Result<()> {
        for item in tri!(self.value.as_list()) {
            tri!(consumer(&mut self.nested(item)));
        }
        Ok(())
    }

    fn read_string_map(&mut self, _: &Schema, consumer: &mut EntryConsumer) -> Result<()> {
        for (key, value) in tri!(self.value.as_string_map()) {
            tri!(consumer(key.clone(), &mut self.nested(value)));
        }
        Ok(())
    }

    fn is_null(&mut self) -> Result<bool> {
        Ok(self.value.is_null())
    }

    fn read_null(&mut self) -> Result<()> {
        self.plain().read_null()
    }

    fn container_size(&self) -> Option<usize> {
        self.value.size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::prelude;

    #[test]
    fn blob_strings_are_base64() {
        let settings = JsonSettings::default();
        let doc = Document::from("Zm9v");
        let mut de = JsonDocumentDeserializer::new(&doc, &settings);
        assert_eq!(de.read_blob(&prelude::BLOB).unwrap(), b"foo");

        let doc = Document::from("%%");
        let mut de = JsonDocumentDeserializer::new(&doc, &settings);
        let err = de.read_blob(&prelude::BLOB).unwrap_err();
        assert_eq!(*err.code(), ErrorCode::InvalidBase64);
    }

    #[test]
    fn timestamps_follow_the_format() {
        let epoch = JsonSettings::default();
        let doc = Document::Double(1.5);
        let mut de = JsonDocumentDeserializer::new(&doc, &epoch);
        assert_eq!(
            de.read_timestamp(&prelude::TIMESTAMP).unwrap().timestamp_millis(),
            1500
        );

        let doc = Document::from("1970-01-01T00:00:01Z");
        let mut de = JsonDocumentDeserializer::new(&doc, &epoch);
        assert!(de.read_timestamp(&prelude::TIMESTAMP).unwrap_err().is_type_coercion());
    }
}
