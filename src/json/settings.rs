use crate::schema::Schema;
use crate::timestamp::TimestampFormat;

/// How structure members are named on the wire.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum FieldMapper {
    /// The member name, always.
    #[default]
    MemberName,
    /// The `jsonName` trait when present, the member name otherwise.
    JsonName,
}

impl FieldMapper {
    /// The field name `member` is written under.
    pub fn member_to_field<'a>(self, member: &'a Schema) -> Option<&'a str> {
        match self {
            FieldMapper::MemberName => member.member_name(),
            FieldMapper::JsonName => member.json_name().or_else(|| member.member_name()),
        }
    }

    /// The member of `container` that `field` names, if any.
    pub fn field_to_member<'a>(self, container: &'a Schema, field: &str) -> Option<&'a Schema> {
        match self {
            FieldMapper::MemberName => container.member(field),
            FieldMapper::JsonName => container.member_by_json_name(field),
        }
    }
}

/// Options of a [`JsonCodec`](super::JsonCodec).
///
/// ```
/// use shape_serde::json::{FieldMapper, JsonSettings};
/// use shape_serde::TimestampFormat;
///
/// let settings = JsonSettings::builder()
///     .field_mapper(FieldMapper::JsonName)
///     .default_timestamp_format(TimestampFormat::DateTime)
///     .pretty_print(true)
///     .build();
/// assert!(settings.serialize_type_in_documents());
/// assert!(!settings.escape_unicode());
/// ```
#[derive(Clone, Debug)]
pub struct JsonSettings {
    field_mapper: FieldMapper,
    default_timestamp_format: TimestampFormat,
    use_timestamp_format: bool,
    forbid_unknown_union_members: bool,
    serialize_type_in_documents: bool,
    escape_unicode: bool,
    pretty_print: bool,
    default_namespace: Option<String>,
}

impl Default for JsonSettings {
    fn default() -> Self {
        JsonSettings {
            field_mapper: FieldMapper::MemberName,
            default_timestamp_format: TimestampFormat::EpochSeconds,
            use_timestamp_format: false,
            forbid_unknown_union_members: false,
            serialize_type_in_documents: true,
            escape_unicode: false,
            pretty_print: false,
            default_namespace: None,
        }
    }
}

impl JsonSettings {
    /// Starts from the defaults.
    pub fn builder() -> JsonSettingsBuilder {
        JsonSettingsBuilder {
            settings: JsonSettings::default(),
        }
    }

    /// How members are named on the wire.
    pub fn field_mapper(&self) -> FieldMapper {
        self.field_mapper
    }

    /// Format of timestamps without a usable `timestampFormat` trait.
    pub fn default_timestamp_format(&self) -> TimestampFormat {
        self.default_timestamp_format
    }

    /// Whether the `timestampFormat` trait is honored.
    pub fn use_timestamp_format(&self) -> bool {
        self.use_timestamp_format
    }

    /// Whether a union rejects fields that name none of its members.
    pub fn forbid_unknown_union_members(&self) -> bool {
        self.forbid_unknown_union_members
    }

    /// Whether structure documents carry a `"__type"` field.
    pub fn serialize_type_in_documents(&self) -> bool {
        self.serialize_type_in_documents
    }

    /// Whether non-ASCII text is written as `\uXXXX` escapes.
    pub fn escape_unicode(&self) -> bool {
        self.escape_unicode
    }

    /// Whether output is indented.
    pub fn pretty_print(&self) -> bool {
        self.pretty_print
    }

    /// Namespace that relative `"__type"` names resolve against.
    pub fn default_namespace(&self) -> Option<&str> {
        self.default_namespace.as_deref()
    }

    /// The format a timestamp is carried in when written or read against
    /// `schema`.
    pub fn timestamp_format_for(&self, schema: &Schema) -> TimestampFormat {
        if self.use_timestamp_format {
            if let Some(format) = schema.timestamp_format() {
                return format;
            }
        }
        self.default_timestamp_format
    }
}

/// Builds [`JsonSettings`].
#[derive(Clone, Debug)]
pub struct JsonSettingsBuilder {
    settings: JsonSettings,
}

impl JsonSettingsBuilder {
    /// Defaults to [`FieldMapper::MemberName`].
    pub fn field_mapper(mut self, mapper: FieldMapper) -> Self {
        self.settings.field_mapper = mapper;
        self
    }

    /// Defaults to epoch seconds.
    pub fn default_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.settings.default_timestamp_format = format;
        self
    }

    /// Defaults to off.
    pub fn use_timestamp_format(mut self, enabled: bool) -> Self {
        self.settings.use_timestamp_format = enabled;
        self
    }

    /// Defaults to off. Structures always tolerate unknown fields.
    pub fn forbid_unknown_union_members(mut self, enabled: bool) -> Self {
        self.settings.forbid_unknown_union_members = enabled;
        self
    }

    /// Defaults to on.
    pub fn serialize_type_in_documents(mut self, enabled: bool) -> Self {
        self.settings.serialize_type_in_documents = enabled;
        self
    }

    /// Defaults to off.
    pub fn escape_unicode(mut self, enabled: bool) -> Self {
        self.settings.escape_unicode = enabled;
        self
    }

    /// Defaults to off.
    pub fn pretty_print(mut self, enabled: bool) -> Self {
        self.settings.pretty_print = enabled;
        self
    }

    /// Defaults to none.
    pub fn default_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.settings.default_namespace = Some(namespace.into());
        self
    }

    /// Finishes the settings.
    pub fn build(self) -> JsonSettings {
        self.settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{prelude, ShapeType, Trait};

    #[test]
    fn field_names_both_ways() {
        let schema = Schema::builder("com.example#Named".parse().unwrap(), ShapeType::Structure)
            .member_with_traits("renamed", &*prelude::STRING, [Trait::JsonName("Other".into())])
            .build()
            .unwrap();
        let member = schema.member("renamed").unwrap();

        assert_eq!(FieldMapper::MemberName.member_to_field(member), Some("renamed"));
        assert_eq!(FieldMapper::JsonName.member_to_field(member), Some("Other"));
        assert_eq!(FieldMapper::JsonName.field_to_member(&schema, "Other"), Some(member));
        assert_eq!(FieldMapper::JsonName.field_to_member(&schema, "renamed"), None);
        assert_eq!(FieldMapper::MemberName.field_to_member(&schema, "renamed"), Some(member));
    }

    #[test]
    fn timestamp_trait_only_when_enabled() {
        let schema = Schema::builder("com.example#Stamped".parse().unwrap(), ShapeType::Structure)
            .member_with_traits(
                "at",
                &*prelude::TIMESTAMP,
                [Trait::TimestampFormat(TimestampFormat::HttpDate)],
            )
            .build()
            .unwrap();
        let member = schema.member("at").unwrap();

        let settings = JsonSettings::default();
        assert_eq!(settings.timestamp_format_for(member), TimestampFormat::EpochSeconds);

        let settings = JsonSettings::builder().use_timestamp_format(true).build();
        assert_eq!(settings.timestamp_format_for(member), TimestampFormat::HttpDate);
        assert_eq!(
            settings.timestamp_format_for(&prelude::TIMESTAMP),
            TimestampFormat::EpochSeconds
        );
    }
}
