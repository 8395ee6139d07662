mod definition;
mod info;
mod secondary_index;

pub use definition::IndexDefinition;
pub use info::IndexInfo;
pub use secondary_index::SecondaryIndex;
