use std::hash::Hash;

use crate::{IndexDefinition, SecondaryIndex};

/// Snapshot of a single secondary index state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexInfo<I> {
    pub name: I,
    /// Field values with a bucket, empty buckets included.
    pub bucket_count: usize,
    pub key_count: usize,
}

impl<I> IndexInfo<I> {
    pub(crate) fn collect<V, F, K>(
        definition: &IndexDefinition<I, V, F>,
        index: &SecondaryIndex<F, K>,
    ) -> Self
    where
        I: Clone,
        F: Eq + Hash,
        K: Eq + Hash,
    {
        Self {
            name: definition.name().clone(),
            bucket_count: index.bucket_count(),
            key_count: index.key_count(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.key_count == 0
    }
}
