//! Schemas for the primitive kinds.
//!
//! Documents serialize their contents through these schemas when they have no
//! modeled schema of their own.

use super::{Schema, ShapeId, ShapeType};
use std::sync::LazyLock;

/// Namespace of every prelude shape.
pub const NAMESPACE: &str = "shape.prelude";

fn prelude(name: &str, shape_type: ShapeType) -> Schema {
    Schema::new(prelude_id(name), shape_type)
}

fn prelude_id(name: &str) -> ShapeId {
    match ShapeId::new(NAMESPACE, name) {
        Ok(id) => id,
        Err(_) => unreachable!("prelude shape names are valid identifiers"),
    }
}

macro_rules! prelude_schemas {
    ($($(#[$doc:meta])* $name:ident = $shape:literal, $kind:ident;)*) => {
        $(
            $(#[$doc])*
            pub static $name: LazyLock<Schema> =
                LazyLock::new(|| prelude($shape, ShapeType::$kind));
        )*
    };
}

prelude_schemas! {
    /// `shape.prelude#Blob`
    BLOB = "Blob", Blob;
    /// `shape.prelude#Boolean`
    BOOLEAN = "Boolean", Boolean;
    /// `shape.prelude#String`
    STRING = "String", String;
    /// `shape.prelude#Timestamp`
    TIMESTAMP = "Timestamp", Timestamp;
    /// `shape.prelude#Byte`
    BYTE = "Byte", Byte;
    /// `shape.prelude#Short`
    SHORT = "Short", Short;
    /// `shape.prelude#Integer`
    INTEGER = "Integer", Integer;
    /// `shape.prelude#Long`
    LONG = "Long", Long;
    /// `shape.prelude#Float`
    FLOAT = "Float", Float;
    /// `shape.prelude#Double`
    DOUBLE = "Double", Double;
    /// `shape.prelude#BigInteger`
    BIG_INTEGER = "BigInteger", BigInteger;
    /// `shape.prelude#BigDecimal`
    BIG_DECIMAL = "BigDecimal", BigDecimal;
    /// `shape.prelude#Document`
    DOCUMENT = "Document", Document;
}

/// A map of string to document, the natural schema of a map document.
pub static STRING_MAP: LazyLock<Schema> = LazyLock::new(|| {
    let built = Schema::builder(prelude_id("StringMap"), ShapeType::Map)
        .member("key", &*STRING)
        .member("value", &*DOCUMENT)
        .build();
    match built {
        Ok(schema) => schema,
        Err(_) => unreachable!("prelude map members are unique"),
    }
});

/// The key member of [`STRING_MAP`], used when writing string-keyed entries.
pub static STRING_MAP_KEY: LazyLock<Schema> = LazyLock::new(|| match STRING_MAP.map_key_member() {
    Some(key) => key.clone(),
    None => unreachable!("prelude map has a key member"),
});

/// The prelude schema for a primitive kind, or the document schema for every
/// aggregate kind.
pub fn schema_for(shape_type: ShapeType) -> &'static Schema {
    match shape_type {
        ShapeType::Blob => &*BLOB,
        ShapeType::Boolean => &*BOOLEAN,
        ShapeType::String | ShapeType::Enum => &*STRING,
        ShapeType::Timestamp => &*TIMESTAMP,
        ShapeType::Byte => &*BYTE,
        ShapeType::Short => &*SHORT,
        ShapeType::Integer | ShapeType::IntEnum => &*INTEGER,
        ShapeType::Long => &*LONG,
        ShapeType::Float => &*FLOAT,
        ShapeType::Double => &*DOUBLE,
        ShapeType::BigInteger => &*BIG_INTEGER,
        ShapeType::BigDecimal => &*BIG_DECIMAL,
        ShapeType::Map => &*STRING_MAP,
        ShapeType::Document | ShapeType::List | ShapeType::Structure | ShapeType::Union => {
            &*DOCUMENT
        }
    }
}
