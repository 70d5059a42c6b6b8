//! Record locators parsed from index lines.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ArchiveError;

/// Capture timestamp format used by the index (`20180425093012`).
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Location of one compressed record inside one storage blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchiveRecordLocator {
    /// Blob path relative to the storage endpoint.
    pub filename: String,
    /// Byte offset of the gzip member.
    pub offset: u64,
    /// Compressed length in bytes.
    pub length: u64,
    /// When the page was captured.
    pub captured_at: DateTime<Utc>,
    /// HTTP status of the captured response, if the index reports one.
    pub status: Option<u16>,
    pub mime: Option<String>,
    pub digest: Option<String>,
}

impl ArchiveRecordLocator {
    /// Inclusive last byte of the record, or `None` for an empty record.
    pub fn last_byte(&self) -> Option<u64> {
        self.length.checked_sub(1).and_then(|n| self.offset.checked_add(n))
    }

    /// `bytes=<offset>-<offset+length-1>`
    pub fn range_header(&self) -> Option<String> {
        self.last_byte().map(|end| format!("bytes={}-{}", self.offset, end))
    }
}

/// The index serializes numbers as strings; accept both.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Lenient {
    Number(u64),
    Text(String),
}

impl Lenient {
    fn as_u64(&self) -> Option<u64> {
        match self {
            Lenient::Number(n) => Some(*n),
            Lenient::Text(s) => s.trim().parse().ok(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct IndexLine {
    filename: String,
    offset: Lenient,
    length: Lenient,
    timestamp: String,
    #[serde(default)]
    status: Option<Lenient>,
    #[serde(default)]
    mime: Option<String>,
    #[serde(default)]
    digest: Option<String>,
}

/// Parse an index response body.
///
/// Only the first non-blank line is used; later captures in the same crawl
/// are ignored.
pub fn parse_index_body(body: &str) -> Result<ArchiveRecordLocator, ArchiveError> {
    let line = body
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .ok_or(ArchiveError::NotIndexed)?;

    let raw: IndexLine =
        serde_json::from_str(line).map_err(|e| ArchiveError::Malformed(format!("index line: {e}")))?;

    let offset = raw
        .offset
        .as_u64()
        .ok_or_else(|| ArchiveError::Malformed("index line: bad offset".into()))?;
    let length = raw
        .length
        .as_u64()
        .ok_or_else(|| ArchiveError::Malformed("index line: bad length".into()))?;
    let captured_at = NaiveDateTime::parse_from_str(raw.timestamp.trim(), TIMESTAMP_FORMAT)
        .map_err(|e| ArchiveError::Malformed(format!("index line: timestamp {:?}: {e}", raw.timestamp)))?
        .and_utc();

    Ok(ArchiveRecordLocator {
        filename: raw.filename,
        offset,
        length,
        captured_at,
        status: raw.status.and_then(|s| s.as_u64()).and_then(|s| u16::try_from(s).ok()),
        mime: raw.mime,
        digest: raw.digest,
    })
}
