use super::format::{CompactFormatter, Formatter, PrettyFormatter};
use super::settings::JsonSettings;
use super::write::JsonStream;
use crate::document::{BigDecimal, BigInteger, Document, DISCRIMINATOR};
use crate::error::{Error, Result};
use crate::schema::{Schema, ShapeId};
use crate::ser::{
    ElementWriter, EntryWriter, InterceptingSerializer, Interceptor, MapKey, MapSerializer,
    SerializableStruct, ShapeSerializer,
};
use base64::Engine as _;
use chrono::{DateTime, Utc};
use std::io;

/// A structure for writing shapes into JSON.
pub struct JsonSerializer<'s, W, F = CompactFormatter> {
    stream: JsonStream<W>,
    formatter: F,
    settings: &'s JsonSettings,
}

impl<'s, W> JsonSerializer<'s, W>
where
    W: io::Write,
{
    /// Creates a new JSON serializer.
    #[inline]
    pub fn new(writer: W, settings: &'s JsonSettings) -> Self {
        JsonSerializer::with_formatter(writer, CompactFormatter, settings)
    }
}

impl<'s, W> JsonSerializer<'s, W, PrettyFormatter<'static>>
where
    W: io::Write,
{
    /// Creates a new JSON pretty print serializer.
    #[inline]
    pub fn pretty(writer: W, settings: &'s JsonSettings) -> Self {
        JsonSerializer::with_formatter(writer, PrettyFormatter::new(), settings)
    }
}

impl<'s, W, F> JsonSerializer<'s, W, F>
where
    W: io::Write,
    F: Formatter,
{
    /// Creates a new JSON visitor whose output will be written to the writer
    /// specified.
    #[inline]
    pub fn with_formatter(writer: W, formatter: F, settings: &'s JsonSettings) -> Self {
        JsonSerializer {
            stream: JsonStream::new(writer, settings.escape_unicode()),
            formatter,
            settings,
        }
    }

    /// Unwrap the `Writer` from the `Serializer`, handing it whatever is
    /// still buffered.
    pub fn into_inner(self) -> Result<W> {
        self.stream.into_inner()
    }

    fn write_key(&mut self, key: &str, first: bool) -> Result<()> {
        tri!(self.formatter.comma(&mut self.stream, first));
        tri!(self.stream.write_str(key));
        self.formatter.colon(&mut self.stream)
    }

    fn write_quoted<I: itoa::Integer>(&mut self, value: I) -> Result<()> {
        tri!(self.stream.write_byte(b'"'));
        tri!(self.stream.write_integer(value));
        self.stream.write_byte(b'"')
    }

    /// Writes an object holding the members of `value`, preceded by a
    /// `"__type"` field when `type_id` is given.
    fn write_object(
        &mut self,
        value: &dyn SerializableStruct,
        type_id: Option<&ShapeId>,
    ) -> Result<()> {
        tri!(self.formatter.open(&mut self.stream, b'{'));
        let mut first = true;
        if let Some(id) = type_id {
            tri!(self.write_key(DISCRIMINATOR, first));
            tri!(self.stream.write_str(&id.to_string()));
            first = false;
        }
        let mut members = InterceptingSerializer::new(JsonStructSerializer {
            parent: &mut *self,
            first,
        });
        tri!(value.serialize_members(&mut members));
        let empty = members.into_inner().first;
        self.formatter.close(&mut self.stream, b'}', empty)
    }
}

impl<W, F> ShapeSerializer for JsonSerializer<'_, W, F>
where
    W: io::Write,
    F: Formatter,
{
    fn write_struct(&mut self, _: &Schema, value: &dyn SerializableStruct) -> Result<()> {
        self.write_object(value, None)
    }

    fn write_list(&mut self, _: &Schema, size: usize, elements: &mut ElementWriter) -> Result<()> {
        if size == 0 {
            return self.stream.write_raw(b"[]");
        }
        tri!(self.formatter.open(&mut self.stream, b'['));
        let mut list = InterceptingSerializer::new(JsonListSerializer {
            parent: &mut *self,
            first: true,
        });
        tri!(elements(&mut list));
        let empty = list.into_inner().first;
        self.formatter.close(&mut self.stream, b']', empty)
    }

    fn write_map(&mut self, _: &Schema, size: usize, entries: &mut EntryWriter) -> Result<()> {
        if size == 0 {
            return self.stream.write_raw(b"{}");
        }
        tri!(self.formatter.open(&mut self.stream, b'{'));
        let mut map = JsonMapSerializer {
            parent: &mut *self,
            first: true,
        };
        tri!(entries(&mut map));
        let empty = map.first;
        self.formatter.close(&mut self.stream, b'}', empty)
    }

    #[inline]
    fn write_boolean(&mut self, _: &Schema, value: bool) -> Result<()> {
        let token: &[u8] = if value { b"true" } else { b"false" };
        self.stream.write_raw(token)
    }

    #[inline]
    fn write_byte(&mut self, _: &Schema, value: i8) -> Result<()> {
        self.stream.write_integer(value)
    }

    #[inline]
    fn write_short(&mut self, _: &Schema, value: i16) -> Result<()> {
        self.stream.write_integer(value)
    }

    #[inline]
    fn write_integer(&mut self, _: &Schema, value: i32) -> Result<()> {
        self.stream.write_integer(value)
    }

    #[inline]
    fn write_long(&mut self, _: &Schema, value: i64) -> Result<()> {
        self.stream.write_integer(value)
    }

    #[inline]
    fn write_float(&mut self, _: &Schema, value: f32) -> Result<()> {
        self.stream.write_f32(value)
    }

    #[inline]
    fn write_double(&mut self, _: &Schema, value: f64) -> Result<()> {
        self.stream.write_f64(value)
    }

    fn write_big_integer(&mut self, _: &Schema, value: &BigInteger) -> Result<()> {
        self.stream.write_raw(value.as_str().as_bytes())
    }

    fn write_big_decimal(&mut self, _: &Schema, value: &BigDecimal) -> Result<()> {
        self.stream.write_raw(value.as_str().as_bytes())
    }

    #[inline]
    fn write_string(&mut self, _: &Schema, value: &str) -> Result<()> {
        self.stream.write_str(value)
    }

    fn write_blob(&mut self, _: &Schema, value: &[u8]) -> Result<()> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(value);
        self.stream.write_str(&encoded)
    }

    fn write_timestamp(&mut self, schema: &Schema, value: DateTime<Utc>) -> Result<()> {
        let format = self.settings.timestamp_format_for(schema);
        format.write(schema, value, self)
    }

    fn write_document(&mut self, _: &Schema, value: &Document) -> Result<()> {
        match value {
            Document::Structure(s) if self.settings.serialize_type_in_documents() => {
                self.write_object(s, Some(s.schema().id()))
            }
            _ => value.serialize_contents(self),
        }
    }

    #[inline]
    fn write_null(&mut self, _: &Schema) -> Result<()> {
        self.stream.write_raw(b"null")
    }

    fn flush(&mut self) -> Result<()> {
        self.stream.flush()
    }
}

/// Writes the field name in front of every member of a structure.
struct JsonStructSerializer<'p, 's, W, F> {
    parent: &'p mut JsonSerializer<'s, W, F>,
    first: bool,
}

impl<W, F> Interceptor for JsonStructSerializer<'_, '_, W, F>
where
    W: io::Write,
    F: Formatter,
{
    fn intercept(&mut self, schema: &Schema, write: &mut ElementWriter) -> Result<()> {
        let field = match self.parent.settings.field_mapper().member_to_field(schema) {
            Some(field) => field,
            None => {
                return Err(Error::custom(format_args!(
                    "structure member written against non-member schema {}",
                    schema
                )))
            }
        };
        tri!(self.parent.write_key(field, self.first));
        self.first = false;
        write(&mut *self.parent)
    }
}

/// Writes the separator in front of every element of a list.
struct JsonListSerializer<'p, 's, W, F> {
    parent: &'p mut JsonSerializer<'s, W, F>,
    first: bool,
}

impl<W, F> Interceptor for JsonListSerializer<'_, '_, W, F>
where
    W: io::Write,
    F: Formatter,
{
    fn intercept(&mut self, _: &Schema, write: &mut ElementWriter) -> Result<()> {
        tri!(self.parent.formatter.comma(&mut self.parent.stream, self.first));
        self.first = false;
        write(&mut *self.parent)
    }
}

/// Writes map entries as object fields. Integer keys are quoted.
struct JsonMapSerializer<'p, 's, W, F> {
    parent: &'p mut JsonSerializer<'s, W, F>,
    first: bool,
}

impl<W, F> MapSerializer for JsonMapSerializer<'_, '_, W, F>
where
    W: io::Write,
    F: Formatter,
{
    fn write_entry(&mut self, _: &Schema, key: MapKey<'_>, value: &mut ElementWriter) -> Result<()> {
        let parent = &mut *self.parent;
        tri!(parent.formatter.comma(&mut parent.stream, self.first));
        self.first = false;
        tri!(match key {
            MapKey::String(key) => parent.stream.write_str(key),
            MapKey::Integer(key) => parent.write_quoted(key),
            MapKey::Long(key) => parent.write_quoted(key),
        });
        tri!(parent.formatter.colon(&mut parent.stream));
        value(parent)
    }
}
