mod config;
mod report;

use std::borrow::Borrow;
use std::fmt::{self, Debug};
use std::hash::Hash;

use derive_more::Display;
use hashlink::LinkedHashMap;
use hashlink::linked_hash_map;
use indexmap::{Equivalent, IndexMap};

use crate::{IndexDefinition, IndexInfo, SecondaryIndex};

pub use config::{DuplicateIndexPolicy, MapConfig};
pub use report::IndexReport;

#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum IndexableMapError<I> {
    #[display("Index `{}` is defined more than once", _0)]
    DuplicateIndex(I),
}

impl<I> std::error::Error for IndexableMapError<I> where I: Debug + Display {}

struct IndexSlot<I, K, V, F> {
    definition: IndexDefinition<I, V, F>,
    index: SecondaryIndex<F, K>,
}

/// Insertion-ordered map that keeps named secondary indexes in sync with its
/// entries.
///
/// Every mutation goes through the map, so while indexes are enabled each
/// index holds exactly the keys whose current value passes the index filter,
/// grouped by the selected field value. While disabled, mutations touch only
/// the entries and indexes keep whatever they held; enabling them again does
/// not rebuild anything, [`IndexableMap::refresh_indexes`] does.
///
/// Insert and remove cost is proportional to the number of indexes, not to
/// the number of entries or the size of a bucket.
///
/// Selectors and filters are called while the map is being mutated. A panic
/// inside one of them unwinds through the map and leaves entries and indexes
/// in an unspecified (but memory safe) state.
pub struct IndexableMap<K, V, I = &'static str, F = ()> {
    entries: LinkedHashMap<K, V>,
    indexes: IndexMap<I, IndexSlot<I, K, V, F>>,
    indexes_enabled: bool,
    indexes_stale: bool,
}

impl<K, V, I, F> Default for IndexableMap<K, V, I, F> {
    fn default() -> Self {
        Self {
            entries: LinkedHashMap::new(),
            indexes: IndexMap::new(),
            indexes_enabled: true,
            indexes_stale: false,
        }
    }
}

impl<K, V, I, F> Debug for IndexableMap<K, V, I, F>
where
    K: Debug + Eq + Hash,
    V: Debug,
    I: Debug,
    F: Debug + Eq + Hash,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndexableMap")
            .field("entries", &self.entries.iter().collect::<Vec<_>>())
            .field(
                "indexes",
                &self
                    .indexes
                    .iter()
                    .map(|(name, slot)| (name, &slot.index))
                    .collect::<Vec<_>>(),
            )
            .field("indexes_enabled", &self.indexes_enabled)
            .field("indexes_stale", &self.indexes_stale)
            .finish()
    }
}

impl<K, V, I, F> IndexableMap<K, V, I, F> {
    /// Creates empty map without indexes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Index names in definition order.
    pub fn index_names(&self) -> impl Iterator<Item = &I> {
        self.indexes.keys()
    }

    pub fn indexes_enabled(&self) -> bool {
        self.indexes_enabled
    }

    /// `true` if entries were mutated while indexes were disabled and no
    /// [`IndexableMap::refresh_indexes`] happened since.
    pub fn indexes_are_stale(&self) -> bool {
        self.indexes_stale
    }

    /// Turns incremental index maintenance on. Does not rebuild indexes.
    pub fn enable_indexes(&mut self) -> &mut Self {
        if !self.indexes_enabled && self.indexes_stale {
            tracing::warn!(
                "Secondary indexes enabled while stale, call `refresh_indexes` to rebuild them"
            );
        }
        self.indexes_enabled = true;
        self
    }

    /// Turns incremental index maintenance off. Indexes keep their content.
    pub fn disable_indexes(&mut self) -> &mut Self {
        self.indexes_enabled = false;
        self
    }
}

impl<K, V, I, F> IndexableMap<K, V, I, F>
where
    K: Eq + Hash,
{
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> linked_hash_map::Iter<'_, K, V> {
        self.entries.iter()
    }

    pub fn keys(&self) -> linked_hash_map::Keys<'_, K, V> {
        self.entries.keys()
    }

    pub fn values(&self) -> linked_hash_map::Values<'_, K, V> {
        self.entries.values()
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.entries.get(key)
    }

    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.entries.get_key_value(key)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.entries.contains_key(key)
    }
}

impl<K, V, I, F> IndexableMap<K, V, I, F>
where
    K: Eq + Hash + Clone,
    I: Eq + Hash + Clone,
    F: Eq + Hash,
{
    /// Creates empty map with provided indexes, enabled.
    pub fn with_indexes<D>(definitions: D) -> Result<Self, IndexableMapError<I>>
    where
        D: IntoIterator<Item = IndexDefinition<I, V, F>>,
    {
        Self::with_config(std::iter::empty(), definitions, MapConfig::default())
    }

    /// Creates map from `entries` and builds provided indexes over them.
    pub fn from_entries<E, D>(entries: E, definitions: D) -> Result<Self, IndexableMapError<I>>
    where
        E: IntoIterator<Item = (K, V)>,
        D: IntoIterator<Item = IndexDefinition<I, V, F>>,
    {
        Self::with_config(entries, definitions, MapConfig::default())
    }

    /// Creates map from `entries`. Indexes are built only if
    /// [`MapConfig::indexes_enabled`] is set, otherwise they stay empty until
    /// [`IndexableMap::refresh_indexes`].
    pub fn with_config<E, D>(
        entries: E,
        definitions: D,
        config: MapConfig,
    ) -> Result<Self, IndexableMapError<I>>
    where
        E: IntoIterator<Item = (K, V)>,
        D: IntoIterator<Item = IndexDefinition<I, V, F>>,
    {
        let mut indexes = IndexMap::new();
        for definition in definitions {
            let name = definition.name().clone();
            if let Some(position) = indexes.get_index_of(&name) {
                match config.duplicate_policy {
                    DuplicateIndexPolicy::Reject => {
                        return Err(IndexableMapError::DuplicateIndex(name));
                    }
                    DuplicateIndexPolicy::LastWins => {
                        tracing::warn!(
                            position,
                            "Index is defined more than once, last one is used"
                        );
                    }
                }
            }
            indexes.insert(
                name,
                IndexSlot {
                    definition,
                    index: SecondaryIndex::new(),
                },
            );
        }

        let mut map = Self {
            entries: LinkedHashMap::new(),
            indexes,
            indexes_enabled: config.indexes_enabled,
            indexes_stale: false,
        };
        for (key, value) in entries {
            map.put(key, value);
        }
        map.indexes_stale = !map.indexes_enabled && !map.entries.is_empty();
        tracing::debug!(
            records = map.entries.len(),
            indexes = map.indexes.len(),
            indexes_enabled = map.indexes_enabled,
            "Created indexable map"
        );
        if map.indexes_enabled {
            map.refresh_indexes();
        }

        Ok(map)
    }

    /// Writes `value` at `key` keeping the position of an existing key.
    fn put(&mut self, key: K, value: V) -> Option<V> {
        if let Some(current) = self.entries.get_mut(&key) {
            return Some(std::mem::replace(current, value));
        }
        self.entries.insert(key, value);
        None
    }

    /// Inserts or overwrites `value` at `key`, returning the previous value.
    /// An overwritten key keeps its position.
    ///
    /// With indexes enabled `key` is first removed from the bucket of the old
    /// value in every index (whether the old value passed the filter or not)
    /// and then added to the bucket of the new value in every index whose
    /// filter accepts it.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        if self.indexes_enabled {
            let old = self.entries.get(&key);
            for slot in self.indexes.values_mut() {
                if let Some(old) = old {
                    slot.index.remove(&slot.definition.select(old), &key);
                }
                if slot.definition.accepts(&value) {
                    slot.index.insert(slot.definition.select(&value), key.clone());
                }
            }
            tracing::trace!(
                indexes = self.indexes.len(),
                replaced = old.is_some(),
                "Indexed entry"
            );
        } else {
            self.indexes_stale = true;
        }

        self.put(key, value)
    }

    /// Removes entry at `key`. Returns `false` if there was none.
    pub fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.take(key).is_some()
    }

    /// Removes entry at `key` and returns its value. Order of the remaining
    /// entries is preserved.
    pub fn take<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let (key, value) = self.entries.remove_entry(key)?;
        if self.indexes_enabled {
            for slot in self.indexes.values_mut() {
                slot.index.remove(&slot.definition.select(&value), &key);
            }
            tracing::trace!(indexes = self.indexes.len(), "Unindexed entry");
        } else {
            self.indexes_stale = true;
        }

        Some(value)
    }

    /// Removes all entries. With indexes enabled every index is reset too,
    /// otherwise indexes are left as they are.
    pub fn clear(&mut self) {
        if self.indexes_enabled {
            for slot in self.indexes.values_mut() {
                slot.index.clear();
            }
            self.indexes_stale = false;
        } else if !self.entries.is_empty() {
            self.indexes_stale = true;
        }

        self.entries.clear();
    }

    /// Rebuilds every index from current entries, whether indexes are enabled
    /// or not.
    pub fn refresh_indexes(&mut self) -> &mut Self {
        for slot in self.indexes.values_mut() {
            slot.index.clear();
        }
        for (key, value) in self.entries.iter() {
            for slot in self.indexes.values_mut() {
                if slot.definition.accepts(value) {
                    slot.index.insert(slot.definition.select(value), key.clone());
                }
            }
        }
        self.indexes_stale = false;
        tracing::debug!(
            records = self.entries.len(),
            indexes = self.indexes.len(),
            "Rebuilt secondary indexes"
        );

        self
    }

    /// Values stored under `value` in the index `name`, in the order their
    /// keys were added to the bucket. Unknown index or field value gives an
    /// empty result.
    pub fn get_by_index<Q>(&self, name: &Q, value: &F) -> Vec<&V>
    where
        Q: ?Sized + Hash + Equivalent<I>,
    {
        let Some(slot) = self.indexes.get(name) else {
            return vec![];
        };
        // Keys left in a stale index may be gone from entries.
        slot.index
            .get(value)
            .filter_map(|key| self.entries.get(key))
            .collect()
    }

    /// Keys stored under `value` in the index `name`.
    pub fn keys_by_index<Q>(&self, name: &Q, value: &F) -> Vec<&K>
    where
        Q: ?Sized + Hash + Equivalent<I>,
    {
        self.indexes
            .get(name)
            .map(|slot| slot.index.get(value).collect())
            .unwrap_or_default()
    }

    pub fn contains_index<Q>(&self, name: &Q) -> bool
    where
        Q: ?Sized + Hash + Equivalent<I>,
    {
        self.indexes.contains_key(name)
    }

    /// Read-only access to the index `name`.
    pub fn index<Q>(&self, name: &Q) -> Option<&SecondaryIndex<F, K>>
    where
        Q: ?Sized + Hash + Equivalent<I>,
    {
        self.indexes.get(name).map(|slot| &slot.index)
    }

    pub fn index_info(&self) -> Vec<IndexInfo<I>> {
        self.indexes
            .values()
            .map(|slot| IndexInfo::collect(&slot.definition, &slot.index))
            .collect()
    }

    /// `true` if no index holds any key.
    pub fn indexes_is_empty(&self) -> bool {
        self.indexes.values().all(|slot| slot.index.is_empty())
    }
}

impl<K, V, I, F> IndexableMap<K, V, I, F>
where
    K: Eq + Hash + Clone,
    I: Eq + Hash + Clone + Debug,
    F: Eq + Hash,
{
    pub fn index_report(&self) -> IndexReport {
        IndexReport {
            records: self.entries.len(),
            indexes_enabled: self.indexes_enabled,
            indexes_stale: self.indexes_stale,
            indexes: self
                .index_info()
                .into_iter()
                .map(|info| IndexInfo {
                    name: format!("{:?}", info.name),
                    bucket_count: info.bucket_count,
                    key_count: info.key_count,
                })
                .collect(),
        }
    }
}

impl<K, V, I, F> Extend<(K, V)> for IndexableMap<K, V, I, F>
where
    K: Eq + Hash + Clone,
    I: Eq + Hash + Clone,
    F: Eq + Hash,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<'a, K, V, I, F> IntoIterator for &'a IndexableMap<K, V, I, F>
where
    K: Eq + Hash,
{
    type Item = (&'a K, &'a V);
    type IntoIter = linked_hash_map::Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
