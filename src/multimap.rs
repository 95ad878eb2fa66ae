//! An insertion ordered map which keeps every value inserted under a key.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

/// Ordered sequence of `(key, value)` pairs with duplicate keys allowed.
///
/// Lookups by key go through an index from key to the positions holding
/// it, so both "first value" and "every value" are cheap. Two maps are equal
/// when their pair sequences are equal, order included.
#[derive(Clone)]
pub struct OrderedMultiMap<K, V> {
    entries: Vec<(K, V)>,
    index: HashMap<K, Vec<usize>>,
}

impl<K, V> OrderedMultiMap<K, V> {
    pub fn new() -> Self {
        OrderedMultiMap {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        OrderedMultiMap {
            entries: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    /// Number of pairs, counting every duplicate.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every pair in insertion order.
    pub fn all_items(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    /// Keys in insertion order; a repeated key shows up once per insertion.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn as_slice(&self) -> &[(K, V)] {
        &self.entries
    }
}

impl<K: Hash + Eq + Clone, V> OrderedMultiMap<K, V> {
    /// Appends a pair. Earlier values under the same key are kept.
    pub fn insert(&mut self, key: K, value: V) {
        let position = self.entries.len();
        self.index.entry(key.clone()).or_default().push(position);
        self.entries.push((key, value));
    }

    /// The first value inserted under `key`.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let position = *self.index.get(key)?.first()?;
        Some(&self.entries[position].1)
    }

    /// Every value inserted under `key`, oldest first.
    pub fn get_all<'a, Q>(&'a self, key: &Q) -> impl Iterator<Item = &'a V> + 'a
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index
            .get(key)
            .map(|positions| positions.as_slice())
            .unwrap_or_default()
            .iter()
            .map(move |position| &self.entries[*position].1)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains_key(key)
    }
}

impl<K, V> Default for OrderedMultiMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for OrderedMultiMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<K: Eq, V: Eq> Eq for OrderedMultiMap<K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for OrderedMultiMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries.iter()).finish()
    }
}

impl<K: Hash + Eq + Clone, V> Extend<(K, V)> for OrderedMultiMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K: Hash + Eq + Clone, V> FromIterator<(K, V)> for OrderedMultiMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut map = OrderedMultiMap::with_capacity(iter.size_hint().0);
        map.extend(iter);
        map
    }
}

impl<K: Hash + Eq + Clone, V> From<Vec<(K, V)>> for OrderedMultiMap<K, V> {
    fn from(entries: Vec<(K, V)>) -> Self {
        entries.into_iter().collect()
    }
}

impl<K: Hash + Eq + Clone, V, const N: usize> From<[(K, V); N]> for OrderedMultiMap<K, V> {
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

impl<K, V> IntoIterator for OrderedMultiMap<K, V> {
    type Item = (K, V);
    type IntoIter = std::vec::IntoIter<(K, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(feature = "serde")]
impl<K: serde::Serialize, V: serde::Serialize> serde::Serialize for OrderedMultiMap<K, V> {
    fn serialize<S: serde::Serializer>(&self, ser: S) -> Result<S::Ok, S::Error> {
        ser.collect_seq(self.entries.iter())
    }
}
