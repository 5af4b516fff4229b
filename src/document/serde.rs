use super::{Document, Map};
use crate::timestamp::TimestampFormat;
use serde_core::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

/// Hands a document to any serde data format.
///
/// Big numbers are written as strings so that no digits are lost, timestamps
/// as RFC 3339 strings and structures as maps of their members.
impl Serialize for Document {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Document::Null => serializer.serialize_unit(),
            Document::Boolean(b) => serializer.serialize_bool(*b),
            Document::Byte(n) => serializer.serialize_i8(*n),
            Document::Short(n) => serializer.serialize_i16(*n),
            Document::Integer(n) => serializer.serialize_i32(*n),
            Document::Long(n) => serializer.serialize_i64(*n),
            Document::Float(n) => serializer.serialize_f32(*n),
            Document::Double(n) => serializer.serialize_f64(*n),
            Document::BigInteger(n) => serializer.serialize_str(n.as_str()),
            Document::BigDecimal(n) => serializer.serialize_str(n.as_str()),
            Document::String(s) => serializer.serialize_str(s),
            Document::Blob(bytes) => serializer.serialize_bytes(bytes),
            Document::Timestamp(t) => {
                serializer.serialize_str(&TimestampFormat::DateTime.format(*t))
            }
            Document::List(items) => {
                let mut seq = tri!(serializer.serialize_seq(Some(items.len())));
                for item in items {
                    tri!(seq.serialize_element(item));
                }
                seq.end()
            }
            Document::Map(map) => map.serialize(serializer),
            Document::Structure(s) => s.members().serialize(serializer),
        }
    }
}

impl Serialize for Map {
    #[inline]
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = tri!(serializer.serialize_map(Some(self.len())));
        for (k, v) in self {
            tri!(map.serialize_entry(k, v));
        }
        map.end()
    }
}
