//! Snapshot catalog of published crawl index-sets.
//!
//! The catalog is an ordered table of `(month, index-set)` records, newest
//! first. Positions increase as months get older. The list is curated, so some
//! calendar months are missing (no crawl was published for them).
//!
//! ### Invariants
//! - At least one entry.
//! - Month keys are unique and strictly decreasing by position.
//! - Month-to-position lookup is O(1) through a precomputed index.

mod builtin;
pub mod matches;
pub mod month;

pub use matches::MatchTable;
pub use month::{MonthKey, MonthKeyError, MonthResolver, parse_target};

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Errors raised while building a catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog has no entries")]
    Empty,

    #[error("duplicate month {0}")]
    DuplicateMonth(MonthKey),

    #[error("month {newer} at position {position} is not older than {older_than}")]
    OutOfOrder { position: usize, newer: MonthKey, older_than: MonthKey },

    #[error("empty index-set id for month {0}")]
    EmptyIndexSet(MonthKey),
}

/// One published index-set and the calendar month it stands for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Calendar month, `YYYY-MM`.
    pub month: MonthKey,
    /// Index-set identifier, e.g. `CC-MAIN-2018-22`.
    pub index_set: String,
}

impl CatalogEntry {
    pub fn new(month: MonthKey, index_set: impl Into<String>) -> Self {
        Self { month, index_set: index_set.into() }
    }
}

/// Immutable, newest-first table of index-sets.
#[derive(Debug, Clone)]
pub struct SnapshotCatalog {
    entries: Vec<CatalogEntry>,
    positions: HashMap<MonthKey, usize>,
}

impl SnapshotCatalog {
    /// The curated Common Crawl catalog shipped with crawlback.
    pub fn builtin() -> Self {
        let entries: Vec<CatalogEntry> = builtin::ENTRIES
            .iter()
            .map(|e| CatalogEntry::new(MonthKey::new_unchecked(e.year, e.month), e.index_set))
            .collect();
        Self::index(entries)
    }

    /// Build a catalog from explicit records, validating ordering and uniqueness.
    pub fn from_entries(entries: Vec<CatalogEntry>) -> Result<Self, CatalogError> {
        if entries.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = std::collections::HashSet::new();
        for (position, entry) in entries.iter().enumerate() {
            if entry.index_set.trim().is_empty() {
                return Err(CatalogError::EmptyIndexSet(entry.month));
            }
            if !seen.insert(entry.month) {
                return Err(CatalogError::DuplicateMonth(entry.month));
            }
            if position > 0 && entry.month >= entries[position - 1].month {
                return Err(CatalogError::OutOfOrder {
                    position,
                    newer: entry.month,
                    older_than: entries[position - 1].month,
                });
            }
        }

        Ok(Self::index(entries))
    }

    fn index(entries: Vec<CatalogEntry>) -> Self {
        let positions = entries.iter().enumerate().map(|(i, e)| (e.month, i)).collect();
        Self { entries, positions }
    }

    /// Number of index-sets.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Position of an exact month key, if that month has a published crawl.
    pub fn position(&self, month: &MonthKey) -> Option<usize> {
        self.positions.get(month).copied()
    }

    pub fn entry(&self, position: usize) -> Option<&CatalogEntry> {
        self.entries.get(position)
    }

    pub fn newest(&self) -> &CatalogEntry {
        &self.entries[0]
    }

    pub fn oldest(&self) -> &CatalogEntry {
        &self.entries[self.entries.len() - 1]
    }

    /// Position of the oldest entry whose month is not older than `target`.
    ///
    /// Targets newer than the whole catalog map to 0; targets older than the
    /// whole catalog map to the last position.
    pub fn nearest_not_older(&self, target: &MonthKey) -> usize {
        let newer_or_equal = self.entries.partition_point(|e| e.month >= *target);
        newer_or_equal.saturating_sub(1)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter()
    }
}

impl Default for SnapshotCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> MonthKey {
        s.parse().unwrap()
    }

    #[test]
    fn test_builtin_is_valid() {
        let builtin = SnapshotCatalog::builtin();
        let rebuilt = SnapshotCatalog::from_entries(builtin.iter().cloned().collect());
        assert!(rebuilt.is_ok());
        assert_eq!(builtin.len(), 46);
    }

    #[test]
    fn test_builtin_bounds() {
        let catalog = SnapshotCatalog::builtin();
        assert_eq!(catalog.newest().month, key("2018-05"));
        assert_eq!(catalog.newest().index_set, "CC-MAIN-2018-22");
        assert_eq!(catalog.oldest().month, key("2013-09"));
        assert_eq!(catalog.oldest().index_set, "CC-MAIN-2013-20");
    }

    #[test]
    fn test_position_lookup() {
        let catalog = SnapshotCatalog::builtin();
        assert_eq!(catalog.position(&key("2018-05")), Some(0));
        assert_eq!(catalog.position(&key("2018-04")), Some(1));
        assert_eq!(catalog.position(&key("2013-09")), Some(45));
        assert_eq!(catalog.position(&key("2016-11")), None);
    }

    #[test]
    fn test_nearest_not_older() {
        let catalog = SnapshotCatalog::builtin();
        assert_eq!(catalog.nearest_not_older(&key("2020-01")), 0);
        assert_eq!(catalog.nearest_not_older(&key("2018-05")), 0);
        let dec_2016 = catalog.position(&key("2016-12")).unwrap();
        assert_eq!(catalog.nearest_not_older(&key("2016-11")), dec_2016);
        let feb_2014 = catalog.position(&key("2014-02")).unwrap();
        assert_eq!(catalog.nearest_not_older(&key("2013-10")), feb_2014);
        assert_eq!(catalog.nearest_not_older(&key("2014-01")), feb_2014);
        assert_eq!(catalog.nearest_not_older(&key("2013-08")), 45);
        assert_eq!(catalog.nearest_not_older(&key("1999-01")), 45);
    }

    #[test]
    fn test_from_entries_empty() {
        assert_eq!(SnapshotCatalog::from_entries(Vec::new()).unwrap_err(), CatalogError::Empty);
    }

    #[test]
    fn test_from_entries_duplicate() {
        let entries = vec![CatalogEntry::new(key("2018-05"), "a"), CatalogEntry::new(key("2018-05"), "b")];
        assert!(matches!(SnapshotCatalog::from_entries(entries), Err(CatalogError::DuplicateMonth(_))));
    }

    #[test]
    fn test_from_entries_out_of_order() {
        let entries = vec![CatalogEntry::new(key("2018-04"), "a"), CatalogEntry::new(key("2018-05"), "b")];
        assert!(matches!(
            SnapshotCatalog::from_entries(entries),
            Err(CatalogError::OutOfOrder { position: 1, .. })
        ));
    }

    #[test]
    fn test_from_entries_empty_index_set() {
        let entries = vec![CatalogEntry::new(key("2018-05"), "  ")];
        assert!(matches!(SnapshotCatalog::from_entries(entries), Err(CatalogError::EmptyIndexSet(_))));
    }

    #[test]
    fn test_entry_deserialize() {
        let entry: CatalogEntry = serde_json::from_str(r#"{"month":"2018-04","index_set":"idx1"}"#).unwrap();
        assert_eq!(entry.month, key("2018-04"));
        assert_eq!(entry.index_set, "idx1");
    }
}
