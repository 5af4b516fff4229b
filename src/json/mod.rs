//! JSON, the reference encoding.
//!
//! [`JsonCodec`] is the entry point: it owns a set of [`JsonSettings`] and
//! hands out serializers and deserializers from the selected
//! [`JsonSerdeProvider`].
//!
//! ```
//! use shape_serde::json::{FieldMapper, JsonCodec, JsonSettings};
//! use shape_serde::Document;
//!
//! # fn main() -> shape_serde::Result<()> {
//! let codec = JsonCodec::builder()
//!     .settings(JsonSettings::builder().field_mapper(FieldMapper::JsonName).build())
//!     .build();
//!
//! let doc = codec.deserialize_document(b"[1, 2.5, \"NaN\", null]")?;
//! let items = doc.as_list()?;
//! assert_eq!(items[0], Document::Integer(1));
//! assert_eq!(items[1], Document::Double(2.5));
//! assert!(items[3].is_null());
//!
//! assert_eq!(codec.serialize_document(&doc)?, br#"[1,2.5,"NaN",null]"#);
//! # Ok(())
//! # }
//! ```

mod de;
mod document;
mod format;
mod iter;
mod provider;
pub mod read;
mod ser;
mod settings;
mod write;

pub use self::de::JsonDeserializer;
pub use self::document::JsonDocumentDeserializer;
pub use self::format::{CompactFormatter, Formatter, PrettyFormatter};
pub use self::provider::{DefaultJsonSerdeProvider, JsonSerdeProvider};
pub use self::ser::JsonSerializer;
pub use self::settings::{FieldMapper, JsonSettings, JsonSettingsBuilder};
pub use self::write::JsonStream;

use crate::de::{ShapeBuilder, ShapeDeserializer};
use crate::document::Document;
use crate::error::Result;
use crate::schema::ShapeId;
use crate::ser::{SerializableShape, ShapeSerializer};
use std::fmt::{self, Debug};
use std::io;
use std::sync::Arc;

/// Reads and writes shapes as JSON.
///
/// A codec is cheap to clone and may be shared between threads; every call
/// creates its own serializer or deserializer.
#[derive(Clone)]
pub struct JsonCodec {
    settings: JsonSettings,
    provider: Arc<dyn JsonSerdeProvider>,
}

impl JsonCodec {
    /// Starts a codec with default settings and only the built-in provider.
    pub fn builder() -> JsonCodecBuilder {
        JsonCodecBuilder {
            settings: JsonSettings::default(),
            providers: vec![Arc::new(DefaultJsonSerdeProvider)],
        }
    }

    /// The settings every serializer and deserializer is created with.
    pub fn settings(&self) -> &JsonSettings {
        &self.settings
    }

    /// Name of the provider in use.
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// A serializer writing to `sink`. Call
    /// [`flush`](ShapeSerializer::flush) once done.
    pub fn create_serializer<'a>(&'a self, sink: &'a mut dyn io::Write) -> Box<dyn ShapeSerializer + 'a> {
        self.provider.serializer(sink, &self.settings)
    }

    /// A deserializer reading `input`.
    pub fn create_deserializer<'a>(&'a self, input: &'a [u8]) -> Box<dyn ShapeDeserializer + 'a> {
        self.provider.deserializer(input, &self.settings)
    }

    /// Serializes `value` into a new byte vector.
    pub fn serialize(&self, value: &dyn SerializableShape) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(128);
        tri!(self.serialize_to_writer(value, &mut out));
        Ok(out)
    }

    /// Serializes `value` into `writer`, flushing it at the end.
    pub fn serialize_to_writer(
        &self,
        value: &dyn SerializableShape,
        writer: &mut dyn io::Write,
    ) -> Result<()> {
        let mut serializer = self.create_serializer(writer);
        tri!(value.serialize(&mut *serializer));
        serializer.flush()
    }

    /// Serializes a document. Structure documents carry `"__type"` unless
    /// the settings turn it off.
    pub fn serialize_document(&self, value: &Document) -> Result<Vec<u8>> {
        self.serialize(value)
    }

    /// Builds a shape out of `input`. The input must hold exactly one value.
    pub fn deserialize<B: ShapeBuilder>(&self, input: &[u8], mut builder: B) -> Result<B::Output> {
        let mut de = self.create_deserializer(input);
        tri!(builder.deserialize(&mut *de));
        tri!(de.finish());
        builder.build()
    }

    /// Builds a shape out of everything `reader` yields.
    pub fn deserialize_reader<R, B>(&self, mut reader: R, mut builder: B) -> Result<B::Output>
    where
        R: io::Read,
        B: ShapeBuilder,
    {
        let mut de = self.provider.reader_deserializer(&mut reader, &self.settings);
        tri!(builder.deserialize(&mut *de));
        tri!(de.finish());
        builder.build()
    }

    /// Parses `input` into a document.
    pub fn deserialize_document(&self, input: &[u8]) -> Result<Document> {
        let mut de = self.create_deserializer(input);
        let value = tri!(de.read_document());
        tri!(de.finish());
        Ok(value)
    }

    /// Builds a shape out of a document parsed by this codec.
    ///
    /// Unlike [`Document::as_shape`], blobs, timestamps and field names are
    /// read as this codec writes them.
    pub fn document_as_shape<B: ShapeBuilder>(&self, document: &Document, mut builder: B) -> Result<B::Output> {
        tri!(builder.deserialize(&mut JsonDocumentDeserializer::new(document, &self.settings)));
        builder.build()
    }

    /// The shape `document` stands for, resolving bare `"__type"` names
    /// against the configured default namespace.
    pub fn discriminator(&self, document: &Document) -> Result<Option<ShapeId>> {
        document.discriminator_in(self.settings.default_namespace())
    }
}

impl Default for JsonCodec {
    fn default() -> Self {
        JsonCodec::builder().build()
    }
}

impl Debug for JsonCodec {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("JsonCodec")
            .field("settings", &self.settings)
            .field("provider", &self.provider.name())
            .finish()
    }
}

/// Builds a [`JsonCodec`].
pub struct JsonCodecBuilder {
    settings: JsonSettings,
    providers: Vec<Arc<dyn JsonSerdeProvider>>,
}

impl JsonCodecBuilder {
    /// Replaces the settings.
    pub fn settings(mut self, settings: JsonSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Registers a provider. It is used if its priority beats every other
    /// registered provider.
    pub fn provider<P>(mut self, provider: P) -> Self
    where
        P: JsonSerdeProvider + 'static,
    {
        self.providers.push(Arc::new(provider));
        self
    }

    /// Selects the provider and finishes the codec.
    pub fn build(self) -> JsonCodec {
        JsonCodec {
            settings: self.settings,
            provider: provider::select(self.providers),
        }
    }
}
