mod index;
mod map;

pub use index::*;
pub use map::*;

pub use indexmap::Equivalent;

pub mod prelude {
    pub use crate::index::{IndexDefinition, IndexInfo, SecondaryIndex};
    pub use crate::map::{
        DuplicateIndexPolicy, IndexReport, IndexableMap, IndexableMapError, MapConfig,
    };
    pub use derive_more::{From, Into};
}
