/// What to do when two index definitions share the same name.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DuplicateIndexPolicy {
    /// Construction fails with [`IndexableMapError::DuplicateIndex`].
    ///
    /// [`IndexableMapError::DuplicateIndex`]: crate::IndexableMapError::DuplicateIndex
    #[default]
    Reject,
    /// Later definition replaces the earlier one but keeps its position.
    LastWins,
}

/// Construction options of [`IndexableMap`].
///
/// [`IndexableMap`]: crate::IndexableMap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapConfig {
    pub indexes_enabled: bool,
    pub duplicate_policy: DuplicateIndexPolicy,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            indexes_enabled: true,
            duplicate_policy: DuplicateIndexPolicy::default(),
        }
    }
}

impl MapConfig {
    pub fn with_indexes_enabled(mut self, enabled: bool) -> Self {
        self.indexes_enabled = enabled;
        self
    }

    pub fn with_duplicate_policy(mut self, policy: DuplicateIndexPolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }
}
