//! # shape_serde
//!
//! Schema-driven serialization between three worlds:
//!
//! - typed shapes, which describe themselves through a [`Schema`] and write
//!   their members through [`SerializableStruct`],
//! - the dynamic [`Document`] value model, for clients that have no typed
//!   shapes at all,
//! - wire encodings, of which JSON is the reference implementation in
//!   [`json`].
//!
//! Every encoder implements [`ShapeSerializer`] and every decoder implements
//! [`ShapeDeserializer`]. Values drive the serializer (double dispatch), and
//! builders drive the deserializer, so an encoding never needs to know about
//! concrete Rust types.
//!
//! ```
//! use shape_serde::json::JsonCodec;
//! use shape_serde::Document;
//!
//! # fn main() -> shape_serde::Result<()> {
//! let codec = JsonCodec::builder().build();
//! let doc = codec.deserialize_document(br#"{"name":"Ferris","legs":6}"#)?;
//!
//! assert_eq!(doc.get_member("name")?.unwrap().as_string()?, "Ferris");
//! assert_eq!(doc.get_member("legs")?.unwrap().as_long()?, 6);
//! assert!(doc.get_member("tail")?.is_none());
//!
//! let bytes = codec.serialize_document(&doc)?;
//! assert_eq!(bytes, br#"{"name":"Ferris","legs":6}"#);
//! # Ok(())
//! # }
//! ```
//!
//! [`Schema`]: crate::schema::Schema
//! [`SerializableStruct`]: crate::ser::SerializableStruct
//! [`ShapeSerializer`]: crate::ser::ShapeSerializer
//! [`ShapeDeserializer`]: crate::de::ShapeDeserializer

#![deny(missing_docs)]
#![allow(
    clippy::match_like_matches_macro,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::needless_doctest_main,
    clippy::too_many_lines
)]

// We use this macro instead of `?` in the codec hot paths. `?` goes through
// `From`, which the optimizer does not always see through.
macro_rules! tri {
    ($e:expr $(,)?) => {
        match $e {
            core::result::Result::Ok(val) => val,
            core::result::Result::Err(err) => return core::result::Result::Err(err),
        }
    };
}

pub mod de;
pub mod document;
pub mod dynamic;
pub mod error;
pub mod json;
pub mod schema;
pub mod ser;
pub mod timestamp;

#[doc(inline)]
pub use crate::de::{ShapeBuilder, ShapeDeserializer, StructMemberConsumer};
#[doc(inline)]
pub use crate::document::{BigDecimal, BigInteger, Document, Map};
#[doc(inline)]
pub use crate::error::{Error, Result};
#[doc(inline)]
pub use crate::schema::{Schema, ShapeId, ShapeType};
#[doc(inline)]
pub use crate::ser::{MapKey, MapSerializer, SerializableShape, SerializableStruct, ShapeSerializer};
#[doc(inline)]
pub use crate::timestamp::TimestampFormat;
