//! Match override table.
//!
//! Re-targets known `(url, month)` pairs to a corrected month before a search
//! starts. On disk the table is a JSON object whose keys are `"<url>|YYYY-MM"`
//! and whose values are `"YYYY-MM"`:
//!
//! ```json
//! { "http://example.com/a|2019-03": "2018-04" }
//! ```

use super::MonthKey;
use crate::Error;
use std::collections::HashMap;
use std::path::Path;

/// Lookup table from `(url, original month)` to a corrected month.
#[derive(Debug, Clone, Default)]
pub struct MatchTable {
    entries: HashMap<(String, MonthKey), MonthKey>,
}

impl MatchTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a table from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|source| Error::MatchTableIo { path: path.display().to_string(), source })?;
        let table = Self::from_json_str(&raw)?;
        tracing::debug!(path = %path.display(), entries = table.len(), "loaded match table");
        Ok(table)
    }

    /// Parse a table from its JSON text.
    pub fn from_json_str(raw: &str) -> Result<Self, Error> {
        let object: HashMap<String, String> =
            serde_json::from_str(raw).map_err(|e| Error::MatchTableParse(e.to_string()))?;

        let mut table = Self::new();
        for (key, value) in object {
            // URLs may contain '|', the month never does.
            let (url, original) = key
                .rsplit_once('|')
                .ok_or_else(|| Error::MatchTableParse(format!("key without '|' separator: {key}")))?;
            let original: MonthKey = original
                .parse()
                .map_err(|e| Error::MatchTableParse(format!("key {key}: {e}")))?;
            let corrected: MonthKey = value
                .parse()
                .map_err(|e| Error::MatchTableParse(format!("value for {key}: {e}")))?;
            table.insert(url, original, corrected);
        }
        Ok(table)
    }

    pub fn insert(&mut self, url: impl Into<String>, original: MonthKey, corrected: MonthKey) {
        self.entries.insert((url.into(), original), corrected);
    }

    pub fn get(&self, url: &str, original: &MonthKey) -> Option<MonthKey> {
        self.entries.get(&(url.to_string(), *original)).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn key(s: &str) -> MonthKey {
        s.parse().unwrap()
    }

    #[test]
    fn test_from_json_str() {
        let table = MatchTable::from_json_str(
            r#"{"http://example.com/a|2019-03": "2018-04", "http://x.org/?q=a|b|2017-01": "2016-12"}"#,
        )
        .unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("http://example.com/a", &key("2019-03")), Some(key("2018-04")));
        assert_eq!(table.get("http://x.org/?q=a|b", &key("2017-01")), Some(key("2016-12")));
        assert_eq!(table.get("http://example.com/a", &key("2019-04")), None);
    }

    #[test]
    fn test_from_json_str_rejects_bad_keys() {
        assert!(matches!(
            MatchTable::from_json_str(r#"{"no-separator": "2018-04"}"#),
            Err(Error::MatchTableParse(_))
        ));
        assert!(matches!(
            MatchTable::from_json_str(r#"{"http://a|2019-3": "2018-04"}"#),
            Err(Error::MatchTableParse(_))
        ));
        assert!(matches!(
            MatchTable::from_json_str(r#"{"http://a|2019-03": "April"}"#),
            Err(Error::MatchTableParse(_))
        ));
        assert!(matches!(MatchTable::from_json_str("[]"), Err(Error::MatchTableParse(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"http://example.com/a|2019-03": "2018-04"}}"#).unwrap();

        let table = MatchTable::load(file.path()).unwrap();
        assert_eq!(table.get("http://example.com/a", &key("2019-03")), Some(key("2018-04")));
    }

    #[test]
    fn test_load_missing_file() {
        let result = MatchTable::load("/nonexistent/crawlback-matches.json");
        assert!(matches!(result, Err(Error::MatchTableIo { .. })));
    }
}
