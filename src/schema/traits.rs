use crate::document::Document;
use crate::schema::ShapeId;
use crate::timestamp::TimestampFormat;

/// An annotation attached to a schema that influences how values of the
/// shape are serialized.
#[derive(Clone, Debug, PartialEq)]
pub enum Trait {
    /// Serialize the member under this field name in JSON.
    JsonName(String),
    /// Carry the timestamp in this format.
    TimestampFormat(TimestampFormat),
    /// Lists and maps may contain nulls.
    Sparse,
    /// The member is required. Recorded only, never enforced here.
    Required,
    /// Any other trait, identified by shape id.
    Custom {
        /// The trait's shape id.
        id: ShapeId,
        /// The trait's value.
        value: Document,
    },
}

/// The traits attached directly to a single schema.
#[derive(Clone, Debug, Default)]
pub struct TraitMap {
    traits: Vec<Trait>,
}

impl TraitMap {
    /// An empty set of traits.
    pub fn new() -> Self {
        TraitMap { traits: Vec::new() }
    }

    /// Adds a trait, replacing an earlier trait of the same kind.
    pub fn insert(&mut self, t: Trait) {
        match self.traits.iter_mut().find(|existing| same_kind(existing, &t)) {
            Some(existing) => *existing = t,
            None => self.traits.push(t),
        }
    }

    /// The value of `jsonName`, if present.
    pub fn json_name(&self) -> Option<&str> {
        self.traits.iter().find_map(|t| match t {
            Trait::JsonName(name) => Some(name.as_str()),
            _ => None,
        })
    }

    /// The value of `timestampFormat`, if present.
    pub fn timestamp_format(&self) -> Option<TimestampFormat> {
        self.traits.iter().find_map(|t| match t {
            Trait::TimestampFormat(format) => Some(*format),
            _ => None,
        })
    }

    /// Whether `sparse` is present.
    pub fn is_sparse(&self) -> bool {
        self.traits.iter().any(|t| matches!(t, Trait::Sparse))
    }

    /// Whether `required` is present.
    pub fn is_required(&self) -> bool {
        self.traits.iter().any(|t| matches!(t, Trait::Required))
    }

    /// The value of a custom trait.
    pub fn custom(&self, id: &ShapeId) -> Option<&Document> {
        self.traits.iter().find_map(|t| match t {
            Trait::Custom { id: trait_id, value } if trait_id == id => Some(value),
            _ => None,
        })
    }

    /// Iterates over every trait.
    pub fn iter(&self) -> std::slice::Iter<'_, Trait> {
        self.traits.iter()
    }

    /// Number of traits.
    pub fn len(&self) -> usize {
        self.traits.len()
    }

    /// Whether there are no traits.
    pub fn is_empty(&self) -> bool {
        self.traits.is_empty()
    }
}

fn same_kind(a: &Trait, b: &Trait) -> bool {
    match (a, b) {
        (Trait::Custom { id: a, .. }, Trait::Custom { id: b, .. }) => a == b,
        _ => core::mem::discriminant(a) == core::mem::discriminant(b),
    }
}

impl FromIterator<Trait> for TraitMap {
    fn from_iter<I: IntoIterator<Item = Trait>>(iter: I) -> Self {
        let mut map = TraitMap::new();
        for t in iter {
            map.insert(t);
        }
        map
    }
}

impl<'a> IntoIterator for &'a TraitMap {
    type Item = &'a Trait;
    type IntoIter = std::slice::Iter<'a, Trait>;

    fn into_iter(self) -> Self::IntoIter {
        self.traits.iter()
    }
}
