use std::fmt::{self, Debug};
use std::hash::Hash;

use hashlink::LinkedHashSet;
use indexmap::IndexMap;

/// Non-unique index: field value → set of primary keys.
///
/// Buckets keep keys in insertion order and remove them in constant time. A
/// bucket that became empty after removals is kept, so
/// [`SecondaryIndex::get`] and equality treat a missing bucket and an empty
/// one the same way.
pub struct SecondaryIndex<F, K> {
    buckets: IndexMap<F, LinkedHashSet<K>>,
}

impl<F, K> Default for SecondaryIndex<F, K> {
    fn default() -> Self {
        Self {
            buckets: IndexMap::new(),
        }
    }
}

impl<F, K> Clone for SecondaryIndex<F, K>
where
    F: Eq + Hash + Clone,
    K: Eq + Hash + Clone,
{
    fn clone(&self) -> Self {
        Self {
            buckets: self
                .buckets
                .iter()
                .map(|(value, bucket)| (value.clone(), bucket.iter().cloned().collect()))
                .collect(),
        }
    }
}

impl<F, K> Debug for SecondaryIndex<F, K>
where
    F: Debug + Eq + Hash,
    K: Debug + Eq + Hash,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.buckets
                    .iter()
                    .map(|(value, bucket)| (value, bucket.iter().collect::<Vec<_>>())),
            )
            .finish()
    }
}

// Bucket order, key order inside buckets and empty buckets are not compared.
impl<F, K> PartialEq for SecondaryIndex<F, K>
where
    F: Eq + Hash,
    K: Eq + Hash,
{
    fn eq(&self, other: &Self) -> bool {
        self.non_empty_buckets().count() == other.non_empty_buckets().count()
            && self.non_empty_buckets().all(|(value, bucket)| {
                other.buckets.get(value).is_some_and(|other| {
                    bucket.len() == other.len() && bucket.iter().all(|key| other.contains(key))
                })
            })
    }
}

impl<F, K> Eq for SecondaryIndex<F, K>
where
    F: Eq + Hash,
    K: Eq + Hash,
{
}

impl<F, K> SecondaryIndex<F, K>
where
    F: Eq + Hash,
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `key` to the bucket of `value`. Returns `false` if it was already
    /// there, keeping its position.
    pub fn insert(&mut self, value: F, key: K) -> bool {
        let bucket = self.buckets.entry(value).or_default();
        if bucket.contains(&key) {
            return false;
        }
        bucket.insert(key)
    }

    /// Removes `key` from the bucket of `value`. Missing bucket or key is a
    /// no-op returning `false`.
    pub fn remove(&mut self, value: &F, key: &K) -> bool {
        self.buckets
            .get_mut(value)
            .is_some_and(|bucket| bucket.remove(key))
    }

    /// Keys stored under `value`, in insertion order.
    pub fn get(&self, value: &F) -> impl Iterator<Item = &K> {
        self.buckets.get(value).into_iter().flat_map(|bucket| bucket.iter())
    }

    pub fn contains(&self, value: &F, key: &K) -> bool {
        self.buckets
            .get(value)
            .is_some_and(|bucket| bucket.contains(key))
    }

    /// Drops every bucket.
    pub fn clear(&mut self) {
        self.buckets.clear()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&F, &LinkedHashSet<K>)> {
        self.buckets.iter()
    }

    /// Number of buckets, empty ones included.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Number of keys over all buckets.
    pub fn key_count(&self) -> usize {
        self.buckets.values().map(LinkedHashSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.values().all(LinkedHashSet::is_empty)
    }

    fn non_empty_buckets(&self) -> impl Iterator<Item = (&F, &LinkedHashSet<K>)> {
        self.buckets.iter().filter(|(_, bucket)| !bucket.is_empty())
    }
}
