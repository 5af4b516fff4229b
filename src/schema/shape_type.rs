use std::fmt::{self, Display};

/// The closed set of shape kinds a [`Schema`](super::Schema) can describe.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum ShapeType {
    /// Uninterpreted binary data.
    Blob,
    /// `true` or `false`.
    Boolean,
    /// UTF-8 text.
    String,
    /// A string restricted to a fixed set of values.
    Enum,
    /// An instant in time.
    Timestamp,
    /// 8-bit signed integer.
    Byte,
    /// 16-bit signed integer.
    Short,
    /// 32-bit signed integer.
    Integer,
    /// An integer restricted to a fixed set of values.
    IntEnum,
    /// 64-bit signed integer.
    Long,
    /// Single precision float.
    Float,
    /// Double precision float.
    Double,
    /// Arbitrary precision integer.
    BigInteger,
    /// Arbitrary precision decimal.
    BigDecimal,
    /// An open, self-describing value.
    Document,
    /// Ordered collection of a single member type.
    List,
    /// String-keyed collection of a single value type.
    Map,
    /// Fixed set of named, heterogeneous members.
    Structure,
    /// Tagged union; exactly one member is set.
    Union,
}

impl ShapeType {
    /// The name used for this kind in shape models.
    pub fn name(self) -> &'static str {
        match self {
            ShapeType::Blob => "blob",
            ShapeType::Boolean => "boolean",
            ShapeType::String => "string",
            ShapeType::Enum => "enum",
            ShapeType::Timestamp => "timestamp",
            ShapeType::Byte => "byte",
            ShapeType::Short => "short",
            ShapeType::Integer => "integer",
            ShapeType::IntEnum => "intEnum",
            ShapeType::Long => "long",
            ShapeType::Float => "float",
            ShapeType::Double => "double",
            ShapeType::BigInteger => "bigInteger",
            ShapeType::BigDecimal => "bigDecimal",
            ShapeType::Document => "document",
            ShapeType::List => "list",
            ShapeType::Map => "map",
            ShapeType::Structure => "structure",
            ShapeType::Union => "union",
        }
    }

    /// Structures and unions, whose members are addressed by name.
    pub fn is_struct_like(self) -> bool {
        matches!(self, ShapeType::Structure | ShapeType::Union)
    }

    /// Every numeric kind, including the arbitrary precision ones.
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            ShapeType::Byte
                | ShapeType::Short
                | ShapeType::Integer
                | ShapeType::IntEnum
                | ShapeType::Long
                | ShapeType::Float
                | ShapeType::Double
                | ShapeType::BigInteger
                | ShapeType::BigDecimal
        )
    }
}

impl Display for ShapeType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}
