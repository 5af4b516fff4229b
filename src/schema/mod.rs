//! Immutable descriptions of shapes.
//!
//! A [`Schema`] is cheap to clone and compares by identity. Member schemas
//! point at their target schema; recursive shapes point at a [`SchemaSlot`]
//! that is filled once the target has been built.
//!
//! ```
//! use shape_serde::schema::{Schema, ShapeType, Trait, prelude};
//!
//! # fn main() -> shape_serde::Result<()> {
//! let person = Schema::builder("com.example#Person".parse()?, ShapeType::Structure)
//!     .member("name", &*prelude::STRING)
//!     .member_with_traits("age", &*prelude::INTEGER, [Trait::JsonName("Age".into())])
//!     .build()?;
//!
//! let age = person.member("age").unwrap();
//! assert_eq!(age.id().to_string(), "com.example#Person$age");
//! assert_eq!(age.shape_type(), ShapeType::Integer);
//! assert_eq!(age.json_name(), Some("Age"));
//! assert_eq!(person.member_by_json_name("Age"), Some(age));
//! # Ok(())
//! # }
//! ```

mod shape_id;
mod shape_type;
mod traits;

pub mod prelude;

pub use self::shape_id::ShapeId;
pub use self::shape_type::ShapeType;
pub use self::traits::{Trait, TraitMap};

use crate::document::Document;
use crate::error::{Error, Result};
use crate::timestamp::TimestampFormat;
use std::collections::HashMap;
use std::fmt::{self, Debug, Display};
use std::sync::{Arc, OnceLock};

/// Immutable description of a shape or of a member of a shape.
#[derive(Clone)]
pub struct Schema {
    inner: Arc<SchemaInner>,
}

struct SchemaInner {
    id: ShapeId,
    shape_type: ShapeType,
    traits: TraitMap,
    shape: Shape,
}

enum Shape {
    Root(Members),
    Member {
        name: Box<str>,
        index: usize,
        target: MemberTarget,
    },
}

struct Members {
    list: Vec<Schema>,
    by_name: HashMap<Box<str>, usize>,
    by_json_name: OnceLock<HashMap<Box<str>, usize>>,
}

impl Members {
    fn empty() -> Self {
        Members {
            list: Vec::new(),
            by_name: HashMap::new(),
            by_json_name: OnceLock::new(),
        }
    }

    fn json_names(&self) -> &HashMap<Box<str>, usize> {
        self.by_json_name.get_or_init(|| {
            self.list
                .iter()
                .enumerate()
                .map(|(index, member)| {
                    let name = member.json_name().or(member.member_name()).unwrap_or("");
                    (Box::from(name), index)
                })
                .collect()
        })
    }
}

/// What a member schema points at.
#[derive(Clone)]
pub enum MemberTarget {
    /// A schema that already exists.
    Schema(Schema),
    /// A schema that will be built later, for recursive shapes.
    Slot(SchemaSlot),
}

impl From<&Schema> for MemberTarget {
    fn from(schema: &Schema) -> Self {
        MemberTarget::Schema(schema.clone())
    }
}

impl From<Schema> for MemberTarget {
    fn from(schema: Schema) -> Self {
        MemberTarget::Schema(schema)
    }
}

impl From<&SchemaSlot> for MemberTarget {
    fn from(slot: &SchemaSlot) -> Self {
        MemberTarget::Slot(slot.clone())
    }
}

impl MemberTarget {
    fn shape_type(&self) -> ShapeType {
        match self {
            MemberTarget::Schema(schema) => schema.shape_type(),
            MemberTarget::Slot(slot) => slot.shape_type,
        }
    }

    fn get(&self) -> Option<&Schema> {
        match self {
            MemberTarget::Schema(schema) => Some(schema),
            MemberTarget::Slot(slot) => slot.get(),
        }
    }
}

/// A schema that is referenced before it is built.
///
/// Recursive structures name their own schema through a slot:
///
/// ```
/// use shape_serde::schema::{Schema, SchemaSlot, ShapeType, prelude};
///
/// # fn main() -> shape_serde::Result<()> {
/// let slot = SchemaSlot::new(ShapeType::Structure);
/// let node = Schema::builder("com.example#Node".parse()?, ShapeType::Structure)
///     .member("value", &*prelude::INTEGER)
///     .member("next", &slot)
///     .build_into(&slot)?;
///
/// let next = node.member("next").unwrap();
/// assert_eq!(next.target(), Some(&node));
/// assert_eq!(next.member("value"), node.member("value"));
/// # Ok(())
/// # }
/// ```
///
/// The filled slot keeps the schema graph alive for the rest of the process,
/// the same lifetime generated schemas have.
#[derive(Clone)]
pub struct SchemaSlot {
    shape_type: ShapeType,
    cell: Arc<OnceLock<Schema>>,
}

impl SchemaSlot {
    /// Creates an empty slot for a schema of the given kind.
    pub fn new(shape_type: ShapeType) -> Self {
        SchemaSlot {
            shape_type,
            cell: Arc::new(OnceLock::new()),
        }
    }

    /// The schema, once it has been built.
    pub fn get(&self) -> Option<&Schema> {
        self.cell.get()
    }

    /// The kind of schema the slot holds.
    pub fn shape_type(&self) -> ShapeType {
        self.shape_type
    }
}

/// Builds a [`Schema`] and its members.
pub struct SchemaBuilder {
    id: ShapeId,
    shape_type: ShapeType,
    traits: TraitMap,
    members: Vec<(String, MemberTarget, TraitMap)>,
}

impl SchemaBuilder {
    /// Attaches a trait to the shape.
    pub fn with_trait(mut self, t: Trait) -> Self {
        self.traits.insert(t);
        self
    }

    /// Adds a member without traits of its own.
    pub fn member(self, name: &str, target: impl Into<MemberTarget>) -> Self {
        self.member_with_traits(name, target, [])
    }

    /// Adds a member carrying its own traits. Member traits take precedence
    /// over the traits of the target.
    pub fn member_with_traits(
        mut self,
        name: &str,
        target: impl Into<MemberTarget>,
        traits: impl IntoIterator<Item = Trait>,
    ) -> Self {
        self.members
            .push((name.to_owned(), target.into(), traits.into_iter().collect()));
        self
    }

    /// Builds the schema.
    ///
    /// Fails if a member name is not a valid identifier part or appears twice.
    pub fn build(self) -> Result<Schema> {
        let mut members = Members::empty();
        for (index, (name, target, traits)) in self.members.into_iter().enumerate() {
            let id = tri!(self.id.with_member(&name));
            if members.by_name.insert(name.as_str().into(), index).is_some() {
                return Err(Error::custom(format_args!(
                    "duplicate member `{}` in {}",
                    name, self.id
                )));
            }
            members.list.push(Schema {
                inner: Arc::new(SchemaInner {
                    id,
                    shape_type: target.shape_type(),
                    traits,
                    shape: Shape::Member {
                        name: name.into_boxed_str(),
                        index,
                        target,
                    },
                }),
            });
        }
        Ok(Schema {
            inner: Arc::new(SchemaInner {
                id: self.id,
                shape_type: self.shape_type,
                traits: self.traits,
                shape: Shape::Root(members),
            }),
        })
    }

    /// Builds the schema and stores it in `slot`, resolving every member that
    /// was pointed at the slot.
    pub fn build_into(self, slot: &SchemaSlot) -> Result<Schema> {
        if slot.shape_type != self.shape_type {
            return Err(Error::custom(format_args!(
                "cannot store {} schema {} in a slot for {}",
                self.shape_type, self.id, slot.shape_type
            )));
        }
        let schema = tri!(self.build());
        match slot.cell.set(schema.clone()) {
            Ok(()) => Ok(schema),
            Err(_) => Err(Error::custom(format_args!(
                "schema slot for {} was already filled",
                schema.id()
            ))),
        }
    }
}

impl Schema {
    /// Starts building a schema.
    pub fn builder(id: ShapeId, shape_type: ShapeType) -> SchemaBuilder {
        SchemaBuilder {
            id,
            shape_type,
            traits: TraitMap::new(),
            members: Vec::new(),
        }
    }

    /// A schema without members or traits.
    pub fn new(id: ShapeId, shape_type: ShapeType) -> Schema {
        Schema {
            inner: Arc::new(SchemaInner {
                id,
                shape_type,
                traits: TraitMap::new(),
                shape: Shape::Root(Members::empty()),
            }),
        }
    }

    /// Absolute id; member schemas have a member id.
    pub fn id(&self) -> &ShapeId {
        &self.inner.id
    }

    /// Kind of the shape. For members, the kind of the target.
    pub fn shape_type(&self) -> ShapeType {
        self.inner.shape_type
    }

    /// Whether this is a member schema.
    pub fn is_member(&self) -> bool {
        matches!(self.inner.shape, Shape::Member { .. })
    }

    /// The member name, for member schemas.
    pub fn member_name(&self) -> Option<&str> {
        match &self.inner.shape {
            Shape::Member { name, .. } => Some(name),
            Shape::Root(_) => None,
        }
    }

    /// Position of the member in its container, for member schemas.
    pub fn member_index(&self) -> Option<usize> {
        match &self.inner.shape {
            Shape::Member { index, .. } => Some(*index),
            Shape::Root(_) => None,
        }
    }

    /// The schema a member points at. `None` for non-members and for members
    /// whose slot has not been filled yet.
    pub fn target(&self) -> Option<&Schema> {
        match &self.inner.shape {
            Shape::Member { target, .. } => target.get(),
            Shape::Root(_) => None,
        }
    }

    /// Traits attached directly to this schema, without those inherited from
    /// a member's target.
    pub fn traits(&self) -> &TraitMap {
        &self.inner.traits
    }

    fn find_trait<'a, T>(&'a self, f: &dyn Fn(&'a TraitMap) -> Option<T>) -> Option<T> {
        match f(&self.inner.traits) {
            Some(value) => Some(value),
            None => self.target().and_then(|target| target.find_trait(f)),
        }
    }

    /// The `jsonName` trait.
    pub fn json_name(&self) -> Option<&str> {
        self.find_trait(&TraitMap::json_name)
    }

    /// The `timestampFormat` trait, from the member or its target.
    pub fn timestamp_format(&self) -> Option<TimestampFormat> {
        self.find_trait(&TraitMap::timestamp_format)
    }

    /// Whether the `sparse` trait is present on the member or its target.
    pub fn is_sparse(&self) -> bool {
        self.find_trait(&|traits| traits.is_sparse().then_some(()))
            .is_some()
    }

    /// Whether the `required` trait is present.
    pub fn is_required(&self) -> bool {
        self.find_trait(&|traits| traits.is_required().then_some(()))
            .is_some()
    }

    /// The value of a custom trait, from the member or its target.
    pub fn custom_trait(&self, id: &ShapeId) -> Option<&Document> {
        self.find_trait(&|traits| traits.custom(id))
    }

    fn root(&self) -> Option<&Members> {
        match &self.inner.shape {
            Shape::Root(members) => Some(members),
            Shape::Member { target, .. } => target.get().and_then(Schema::root),
        }
    }

    /// Members in declaration order. Member schemas answer with the members
    /// of their target.
    pub fn members(&self) -> &[Schema] {
        match self.root() {
            Some(members) => &members.list,
            None => &[],
        }
    }

    /// Looks up a member by name.
    pub fn member(&self, name: &str) -> Option<&Schema> {
        let members = self.root()?;
        members.by_name.get(name).map(|&index| &members.list[index])
    }

    /// Looks up a member by its JSON field name: the `jsonName` trait when
    /// present, the member name otherwise.
    ///
    /// The lookup table is built once per schema on first use.
    pub fn member_by_json_name(&self, field: &str) -> Option<&Schema> {
        let members = self.root()?;
        members
            .json_names()
            .get(field)
            .map(|&index| &members.list[index])
    }

    /// The `member` member of a list.
    pub fn list_member(&self) -> Option<&Schema> {
        self.member("member")
    }

    /// The `key` member of a map.
    pub fn map_key_member(&self) -> Option<&Schema> {
        self.member("key")
    }

    /// The `value` member of a map.
    pub fn map_value_member(&self) -> Option<&Schema> {
        self.member("value")
    }
}

impl PartialEq for Schema {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Schema {}

impl Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        Display::fmt(&self.inner.id, f)
    }
}

impl Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Schema({} {})", self.inner.shape_type, self.inner.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> ShapeId {
        s.parse().unwrap()
    }

    #[test]
    fn member_traits_override_target() {
        let ts = Schema::builder(id("com.example#Stamp"), ShapeType::Timestamp)
            .with_trait(Trait::TimestampFormat(TimestampFormat::HttpDate))
            .build()
            .unwrap();
        let container = Schema::builder(id("com.example#Holder"), ShapeType::Structure)
            .member("inherited", &ts)
            .member_with_traits(
                "overridden",
                &ts,
                [Trait::TimestampFormat(TimestampFormat::DateTime)],
            )
            .build()
            .unwrap();
        assert_eq!(
            container.member("inherited").unwrap().timestamp_format(),
            Some(TimestampFormat::HttpDate)
        );
        assert_eq!(
            container.member("overridden").unwrap().timestamp_format(),
            Some(TimestampFormat::DateTime)
        );
    }

    #[test]
    fn duplicate_members() {
        let result = Schema::builder(id("com.example#Dup"), ShapeType::Structure)
            .member("a", &*prelude::STRING)
            .member("a", &*prelude::STRING)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn identity_equality() {
        let a = Schema::new(id("com.example#A"), ShapeType::String);
        let b = Schema::new(id("com.example#A"), ShapeType::String);
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn json_name_table_falls_back_to_member_name() {
        let schema = Schema::builder(id("com.example#Names"), ShapeType::Structure)
            .member_with_traits("renamed", &*prelude::STRING, [Trait::JsonName("Other".into())])
            .member("plain", &*prelude::STRING)
            .build()
            .unwrap();
        assert_eq!(
            schema.member_by_json_name("Other").and_then(Schema::member_name),
            Some("renamed")
        );
        assert_eq!(
            schema.member_by_json_name("plain").and_then(Schema::member_name),
            Some("plain")
        );
        assert!(schema.member_by_json_name("renamed").is_none());
        assert_eq!(schema.member("plain").unwrap().member_index(), Some(1));
    }

    #[test]
    fn unfilled_slot_has_no_members() {
        let slot = SchemaSlot::new(ShapeType::Structure);
        let holder = Schema::builder(id("com.example#Holder"), ShapeType::Structure)
            .member("pending", &slot)
            .build()
            .unwrap();
        let pending = holder.member("pending").unwrap();
        assert_eq!(pending.shape_type(), ShapeType::Structure);
        assert!(pending.target().is_none());
        assert!(pending.members().is_empty());
    }
}
