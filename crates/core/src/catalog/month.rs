//! Month keys and start-position resolution.
//!
//! Resolution order for a target month:
//! 1. Match override, if a table is supplied and has an entry for `(url, month)`
//! 2. Exact catalog hit
//! 3. Nearest crawl that is not older than the target (gaps, too-old and
//!    too-new dates)
//! 4. Directional offset, then clamp into the catalog bounds
//!
//! Missing or unparseable dates start at the newest crawl.

use super::{MatchTable, SnapshotCatalog};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static MONTH_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})-(\d{2})$").expect("month key pattern is valid"));

/// Error for malformed `YYYY-MM` strings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MonthKeyError {
    #[error("expected YYYY-MM, got {0:?}")]
    Format(String),

    #[error("month out of range: {0}")]
    MonthRange(u32),
}

/// A calendar month, ordered chronologically and displayed as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    /// Build a month key, rejecting months outside `1..=12` and years that do
    /// not fit in four digits.
    pub fn new(year: i32, month: u32) -> Result<Self, MonthKeyError> {
        if !(1..=12).contains(&month) {
            return Err(MonthKeyError::MonthRange(month));
        }
        if !(0..=9999).contains(&year) {
            return Err(MonthKeyError::Format(format!("{year}-{month:02}")));
        }
        Ok(Self { year, month })
    }

    pub(crate) const fn new_unchecked(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = MonthKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = MONTH_KEY_RE
            .captures(s.trim())
            .ok_or_else(|| MonthKeyError::Format(s.to_string()))?;
        let year = caps[1].parse().map_err(|_| MonthKeyError::Format(s.to_string()))?;
        let month = caps[2].parse().map_err(|_| MonthKeyError::Format(s.to_string()))?;
        Self::new(year, month)
    }
}

impl TryFrom<String> for MonthKey {
    type Error = MonthKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MonthKey> for String {
    fn from(key: MonthKey) -> Self {
        key.to_string()
    }
}

/// Parse loose year/month strings into a target month.
///
/// Both parts must be present and numeric; `"3"` and `"03"` are both accepted
/// for March. Anything else yields `None`, which callers treat as "no date".
pub fn parse_target(year: Option<&str>, month: Option<&str>) -> Option<MonthKey> {
    let year: i32 = year?.trim().parse().ok()?;
    let month: u32 = month?.trim().parse().ok()?;
    MonthKey::new(year, month).ok()
}

/// Maps target months to starting catalog positions.
#[derive(Debug, Clone, Copy)]
pub struct MonthResolver<'a> {
    catalog: &'a SnapshotCatalog,
    offset: i32,
}

impl<'a> MonthResolver<'a> {
    /// `offset` shifts the start by N index-sets (positive = older).
    pub fn new(catalog: &'a SnapshotCatalog, offset: i32) -> Self {
        Self { catalog, offset }
    }

    /// Replace the target with its override from `matches`, if any.
    pub fn apply_override(url: &str, target: Option<MonthKey>, matches: Option<&MatchTable>) -> Option<MonthKey> {
        let (Some(original), Some(table)) = (target, matches) else {
            return target;
        };

        match table.get(url, &original) {
            Some(corrected) => {
                tracing::info!(url, old = %original, new = %corrected, "MATCH");
                Some(corrected)
            }
            None => {
                tracing::debug!(url, month = %original, "no match override");
                Some(original)
            }
        }
    }

    /// Position for a target month before the offset is applied.
    ///
    /// A month inside the catalog range with no crawl of its own snaps to the
    /// nearest newer crawl, not to the newest crawl in the catalog.
    pub fn base_position(&self, target: Option<&MonthKey>) -> usize {
        match target {
            None => 0,
            Some(month) => self
                .catalog
                .position(month)
                .unwrap_or_else(|| self.catalog.nearest_not_older(month)),
        }
    }

    /// Starting position for a search. Always within `[0, len - 1]`.
    pub fn start_position(&self, url: &str, target: Option<MonthKey>, matches: Option<&MatchTable>) -> usize {
        let target = Self::apply_override(url, target, matches);
        let base = self.base_position(target.as_ref());
        self.clamp(base as i64 + i64::from(self.offset))
    }

    fn clamp(&self, position: i64) -> usize {
        let last = self.catalog.len().saturating_sub(1) as i64;
        position.clamp(0, last) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogEntry;

    fn key(s: &str) -> MonthKey {
        s.parse().unwrap()
    }

    #[test]
    fn test_month_key_parse_and_display() {
        let k = key("2018-04");
        assert_eq!(k.year(), 2018);
        assert_eq!(k.month(), 4);
        assert_eq!(k.to_string(), "2018-04");
    }

    #[test]
    fn test_month_key_rejects_bad_format() {
        assert!(matches!("2018-4".parse::<MonthKey>(), Err(MonthKeyError::Format(_))));
        assert!(matches!("18-04".parse::<MonthKey>(), Err(MonthKeyError::Format(_))));
        assert!(matches!("".parse::<MonthKey>(), Err(MonthKeyError::Format(_))));
        assert!(matches!("2018-13".parse::<MonthKey>(), Err(MonthKeyError::MonthRange(13))));
        assert!(matches!("2018-00".parse::<MonthKey>(), Err(MonthKeyError::MonthRange(0))));
    }

    #[test]
    fn test_month_key_ordering() {
        assert!(key("2018-01") > key("2017-12"));
        assert!(key("2013-09") < key("2013-10"));
    }

    #[test]
    fn test_parse_target() {
        assert_eq!(parse_target(Some("2017"), Some("3")), Some(key("2017-03")));
        assert_eq!(parse_target(Some("2017"), Some("03")), Some(key("2017-03")));
        assert_eq!(parse_target(Some("2017"), None), None);
        assert_eq!(parse_target(None, Some("03")), None);
        assert_eq!(parse_target(Some(""), Some("")), None);
        assert_eq!(parse_target(Some("abcd"), Some("03")), None);
        assert_eq!(parse_target(Some("2017"), Some("13")), None);
        assert_eq!(parse_target(Some("-5"), Some("01")), None);
    }

    #[test]
    fn test_exact_hit() {
        let catalog = SnapshotCatalog::builtin();
        let resolver = MonthResolver::new(&catalog, 0);
        assert_eq!(resolver.start_position("u", Some(key("2018-04")), None), 1);
        assert_eq!(resolver.start_position("u", Some(key("2013-09")), None), 45);
    }

    #[test]
    fn test_early_dates_snap_to_oldest_crawls() {
        let catalog = SnapshotCatalog::builtin();
        let resolver = MonthResolver::new(&catalog, 0);
        let feb_2014 = catalog.position(&key("2014-02")).unwrap();
        assert_eq!(resolver.start_position("u", Some(key("2013-10")), None), feb_2014);
        assert_eq!(resolver.start_position("u", Some(key("2014-01")), None), feb_2014);
        assert_eq!(resolver.start_position("u", Some(key("2013-08")), None), 45);
        assert_eq!(resolver.start_position("u", Some(key("2005-06")), None), 45);
    }

    #[test]
    fn test_gap_month_snaps_to_nearest_newer() {
        let catalog = SnapshotCatalog::builtin();
        let resolver = MonthResolver::new(&catalog, 0);
        let dec_2016 = catalog.position(&key("2016-12")).unwrap();
        assert_eq!(catalog.position(&key("2016-11")), None);
        assert_eq!(resolver.base_position(Some(&key("2016-11"))), dec_2016);
        assert_eq!(resolver.start_position("u", Some(key("2016-11")), None), 17);
    }

    #[test]
    fn test_new_dates_snap_to_newest() {
        let catalog = SnapshotCatalog::builtin();
        let resolver = MonthResolver::new(&catalog, 0);
        assert_eq!(resolver.start_position("u", Some(key("2018-06")), None), 0);
        assert_eq!(resolver.start_position("u", Some(key("2024-11")), None), 0);
    }

    #[test]
    fn test_missing_date_starts_newest() {
        let catalog = SnapshotCatalog::builtin();
        assert_eq!(MonthResolver::new(&catalog, 0).start_position("u", None, None), 0);
        assert_eq!(MonthResolver::new(&catalog, 3).start_position("u", None, None), 3);
    }

    #[test]
    fn test_offset_applied() {
        let catalog = SnapshotCatalog::builtin();
        assert_eq!(MonthResolver::new(&catalog, -2).start_position("u", Some(key("2018-02")), None), 1);
        assert_eq!(MonthResolver::new(&catalog, 2).start_position("u", Some(key("2018-02")), None), 5);
    }

    #[test]
    fn test_extreme_offsets_clamp() {
        let catalog = SnapshotCatalog::builtin();
        let last = catalog.len() - 1;
        for target in [None, Some(key("2016-07")), Some(key("1990-01")), Some(key("2030-12"))] {
            assert_eq!(MonthResolver::new(&catalog, -10_000).start_position("u", target, None), 0);
            assert_eq!(MonthResolver::new(&catalog, 10_000).start_position("u", target, None), last);
            assert_eq!(MonthResolver::new(&catalog, i32::MIN).start_position("u", target, None), 0);
            assert_eq!(MonthResolver::new(&catalog, i32::MAX).start_position("u", target, None), last);
        }
    }

    #[test]
    fn test_total_over_all_inputs() {
        let catalog = SnapshotCatalog::builtin();
        for offset in [-50, -1, 0, 1, 50] {
            let resolver = MonthResolver::new(&catalog, offset);
            for year in ["", "x", "0", "1999", "2013", "2014", "2016", "2018", "2019", "9999", "99999"] {
                for month in [None, Some(""), Some("0"), Some("1"), Some("6"), Some("12"), Some("13")] {
                    let target = parse_target(Some(year), month);
                    let position = resolver.start_position("u", target, None);
                    assert!(position < catalog.len(), "{year}-{month:?} offset {offset} -> {position}");
                }
            }
        }
    }

    #[test]
    fn test_match_override_retargets() {
        let catalog = SnapshotCatalog::builtin();
        let resolver = MonthResolver::new(&catalog, 0);
        let mut table = MatchTable::new();
        table.insert("http://example.com/a", key("2019-03"), key("2018-04"));

        let start = resolver.start_position("http://example.com/a", Some(key("2019-03")), Some(&table));
        assert_eq!(start, catalog.position(&key("2018-04")).unwrap());
        assert_ne!(start, resolver.start_position("http://example.com/a", Some(key("2019-03")), None));
    }

    #[test]
    fn test_match_override_missing_entry_keeps_target() {
        let catalog = SnapshotCatalog::builtin();
        let resolver = MonthResolver::new(&catalog, 0);
        let table = MatchTable::new();
        let start = resolver.start_position("http://example.com/b", Some(key("2017-06")), Some(&table));
        assert_eq!(start, catalog.position(&key("2017-06")).unwrap());
    }

    #[test]
    fn test_single_entry_catalog() {
        let catalog = SnapshotCatalog::from_entries(vec![CatalogEntry::new(key("2018-05"), "idx0")]).unwrap();
        for offset in [-3, 0, 3] {
            let resolver = MonthResolver::new(&catalog, offset);
            assert_eq!(resolver.start_position("u", Some(key("2001-01")), None), 0);
            assert_eq!(resolver.start_position("u", None, None), 0);
        }
    }
}
