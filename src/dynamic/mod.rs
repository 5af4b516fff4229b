//! Shapes known only through their schema.
//!
//! Clients built at runtime have schemas but no generated types. This module
//! lets them read and write such shapes through [`Document`] values while the
//! codecs still see the modeled schemas, so the output is the same as for a
//! typed shape:
//!
//! - [`SchemaGuidedDocumentBuilder`] reads a value of any schema into a
//!   [`WrappedDocument`],
//! - [`WrappedDocument`] writes a document as a value of its schema,
//! - [`SchemaInterceptingSerializer`] redirects writes to another schema.
//!
//! ```
//! use shape_serde::dynamic::WrappedDocument;
//! use shape_serde::json::JsonCodec;
//! use shape_serde::schema::prelude;
//! use shape_serde::{Document, Map, Schema, ShapeType};
//!
//! # fn main() -> shape_serde::Result<()> {
//! let schema = Schema::builder("com.example#Pet".parse()?, ShapeType::Structure)
//!     .member("name", &*prelude::STRING)
//!     .build()?;
//!
//! let members = Map::from([
//!     ("name".to_owned(), Document::from("Rex")),
//!     ("ignored".to_owned(), Document::from(true)),
//! ]);
//! let pet = WrappedDocument::new(schema, Document::from(members));
//!
//! let codec = JsonCodec::default();
//! assert_eq!(codec.serialize(&pet)?, br#"{"name":"Rex"}"#);
//! # Ok(())
//! # }
//! ```
//!
//! [`Document`]: crate::Document

mod builder;
mod intercept;
mod wrapped;

pub use self::builder::SchemaGuidedDocumentBuilder;
pub use self::intercept::SchemaInterceptingSerializer;
pub use self::wrapped::WrappedDocument;
