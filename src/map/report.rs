use std::fmt;

use prettytable::{Cell, Row, Table, row};

use crate::IndexInfo;

/// Printable summary of the map and its indexes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexReport {
    pub records: usize,
    pub indexes_enabled: bool,
    pub indexes_stale: bool,
    pub indexes: Vec<IndexInfo<String>>,
}

impl fmt::Display for IndexReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match (self.indexes_enabled, self.indexes_stale) {
            (true, false) => "enabled",
            (true, true) => "enabled, stale",
            (false, false) => "disabled",
            (false, true) => "disabled, stale",
        };
        writeln!(f, "records: {}, indexes: {}", self.records, state)?;

        let mut table = Table::new();
        table.set_titles(row!["Index", "Buckets", "Keys"]);
        for info in &self.indexes {
            table.add_row(Row::new(vec![
                Cell::new(&info.name),
                Cell::new(&info.bucket_count.to_string()),
                Cell::new(&info.key_count.to_string()),
            ]));
        }
        write!(f, "{table}")
    }
}
