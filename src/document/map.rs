//! A map of String to [`Document`], preserving insertion order.
//!
//! Field order is observable on the wire, so the map is always backed by an
//! [`IndexMap`]. Removal shifts later entries down to keep the order intact.
//!
//! [`IndexMap`]: https://docs.rs/indexmap/*/indexmap/map/struct.IndexMap.html

use super::Document;
use core::borrow::Borrow;
use core::fmt::{self, Debug};
use core::hash::Hash;
use core::iter::FusedIterator;
use core::ops;
use indexmap::IndexMap;

/// String-keyed document entries in insertion order.
#[derive(Clone, Default, PartialEq)]
pub struct Map {
    map: IndexMap<String, Document>,
}

impl Map {
    /// Makes a new empty Map.
    #[inline]
    pub fn new() -> Self {
        Map {
            map: IndexMap::new(),
        }
    }

    /// Makes a new empty Map with the given initial capacity.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Map {
            map: IndexMap::with_capacity(capacity),
        }
    }

    /// Clears the map, removing all values.
    #[inline]
    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Returns a reference to the value corresponding to the key.
    #[inline]
    pub fn get<Q>(&self, key: &Q) -> Option<&Document>
    where
        String: Borrow<Q>,
        Q: ?Sized + Eq + Hash,
    {
        self.map.get(key)
    }

    /// Returns true if the map contains a value for the specified key.
    #[inline]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        String: Borrow<Q>,
        Q: ?Sized + Eq + Hash,
    {
        self.map.contains_key(key)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    #[inline]
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut Document>
    where
        String: Borrow<Q>,
        Q: ?Sized + Eq + Hash,
    {
        self.map.get_mut(key)
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the map did not have this key present, `None` is returned and the
    /// entry goes last.
    ///
    /// If the map did have this key present, the value is updated in place,
    /// and the old value is returned.
    #[inline]
    pub fn insert(&mut self, k: String, v: Document) -> Option<Document> {
        self.map.insert(k, v)
    }

    /// Removes a key from the map, returning the value at the key if the key
    /// was previously in the map. Later entries move up by one.
    #[inline]
    pub fn remove<Q>(&mut self, key: &Q) -> Option<Document>
    where
        String: Borrow<Q>,
        Q: ?Sized + Eq + Hash,
    {
        self.map.shift_remove(key)
    }

    /// Returns the number of elements in the map.
    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns true if the map contains no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Gets an iterator over the entries of the map.
    #[inline]
    pub fn iter(&self) -> Iter {
        Iter {
            iter: self.map.iter(),
        }
    }

    /// Gets an iterator over the keys of the map.
    #[inline]
    pub fn keys(&self) -> Keys {
        Keys {
            iter: self.map.keys(),
        }
    }

    /// Gets an iterator over the values of the map.
    #[inline]
    pub fn values(&self) -> Values {
        Values {
            iter: self.map.values(),
        }
    }

    /// Retains only the elements specified by the predicate.
    #[inline]
    pub fn retain<F>(&mut self, f: F)
    where
        F: FnMut(&String, &mut Document) -> bool,
    {
        self.map.retain(f);
    }
}

/// Access an element of this map. Panics if the given key is not present in
/// the map.
impl<Q> ops::Index<&Q> for Map
where
    String: Borrow<Q>,
    Q: ?Sized + Eq + Hash,
{
    type Output = Document;

    fn index(&self, index: &Q) -> &Document {
        &self.map[index]
    }
}

impl Debug for Map {
    #[inline]
    fn fmt(&self, formatter: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        self.map.fmt(formatter)
    }
}

impl<const N: usize> From<[(String, Document); N]> for Map {
    fn from(array: [(String, Document); N]) -> Self {
        Map {
            map: IndexMap::from_iter(array),
        }
    }
}

impl FromIterator<(String, Document)> for Map {
    fn from_iter<T>(iter: T) -> Self
    where
        T: IntoIterator<Item = (String, Document)>,
    {
        Map {
            map: FromIterator::from_iter(iter),
        }
    }
}

impl Extend<(String, Document)> for Map {
    fn extend<T>(&mut self, iter: T)
    where
        T: IntoIterator<Item = (String, Document)>,
    {
        self.map.extend(iter);
    }
}

macro_rules! delegate_iterator {
    (($name:ident $($generics:tt)*) => $item:ty) => {
        impl $($generics)* Iterator for $name $($generics)* {
            type Item = $item;
            #[inline]
            fn next(&mut self) -> Option<Self::Item> {
                self.iter.next()
            }
            #[inline]
            fn size_hint(&self) -> (usize, Option<usize>) {
                self.iter.size_hint()
            }
        }

        impl $($generics)* DoubleEndedIterator for $name $($generics)* {
            #[inline]
            fn next_back(&mut self) -> Option<Self::Item> {
                self.iter.next_back()
            }
        }

        impl $($generics)* ExactSizeIterator for $name $($generics)* {
            #[inline]
            fn len(&self) -> usize {
                self.iter.len()
            }
        }

        impl $($generics)* FusedIterator for $name $($generics)* {}
    }
}

impl<'a> IntoIterator for &'a Map {
    type Item = (&'a String, &'a Document);
    type IntoIter = Iter<'a>;
    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        Iter {
            iter: self.map.iter(),
        }
    }
}

/// An iterator over a Map's entries.
pub struct Iter<'a> {
    iter: indexmap::map::Iter<'a, String, Document>,
}

delegate_iterator!((Iter<'a>) => (&'a String, &'a Document));

impl IntoIterator for Map {
    type Item = (String, Document);
    type IntoIter = IntoIter;
    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            iter: self.map.into_iter(),
        }
    }
}

/// An owning iterator over a Map's entries.
pub struct IntoIter {
    iter: indexmap::map::IntoIter<String, Document>,
}

delegate_iterator!((IntoIter) => (String, Document));

/// An iterator over a Map's keys.
pub struct Keys<'a> {
    iter: indexmap::map::Keys<'a, String, Document>,
}

delegate_iterator!((Keys<'a>) => &'a String);

/// An iterator over a Map's values.
pub struct Values<'a> {
    iter: indexmap::map::Values<'a, String, Document>,
}

delegate_iterator!((Values<'a>) => &'a Document);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remove_keeps_order() {
        let mut map: Map = [
            ("a".to_owned(), Document::Integer(1)),
            ("b".to_owned(), Document::Integer(2)),
            ("c".to_owned(), Document::Integer(3)),
        ]
        .into();
        assert_eq!(map.remove("a"), Some(Document::Integer(1)));
        assert_eq!(map.keys().collect::<Vec<_>>(), ["b", "c"]);
        map.insert("b".to_owned(), Document::Integer(20));
        assert_eq!(map.keys().collect::<Vec<_>>(), ["b", "c"]);
        assert_eq!(map["b"], Document::Integer(20));
    }
}
