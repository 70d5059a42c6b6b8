//! Compound record splitting.
//!
//! A stored record is the archive's own metadata block, the captured HTTP
//! header block and the captured body, joined by blank lines:
//!
//! ```text
//! WARC/1.0\r\n...\r\n\r\nHTTP/1.1 200 OK\r\n...\r\n\r\n<html>...
//! ```
//!
//! The charset is guessed statistically over the whole record, then the text
//! is split on the first two `\r\n\r\n`. The body keeps any later separators.

use chardetng::EncodingDetector;
use encoding_rs::Encoding;

/// Blank-line separator between record segments.
pub const SEPARATOR: &str = "\r\n\r\n";

/// Why a record could not be split.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SplitError {
    #[error("record is not valid {encoding}")]
    Decode { encoding: &'static str },

    #[error("expected 3 record segments, found {segments}")]
    Malformed { segments: usize },
}

/// A decoded record split into its three parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompoundRecord {
    /// Archive container metadata (`WARC/1.0` block).
    pub warc_header: String,
    /// Captured HTTP status line and headers.
    pub http_header: String,
    /// Captured HTTP body.
    pub body: String,
    /// Name of the detected character encoding.
    pub encoding: &'static str,
}

impl CompoundRecord {
    /// Status code from the captured HTTP status line.
    pub fn http_status(&self) -> Option<u16> {
        self.http_header
            .lines()
            .next()?
            .split_whitespace()
            .nth(1)?
            .parse()
            .ok()
    }

    /// Value of a WARC header field, matched case-insensitively.
    pub fn warc_field(&self, name: &str) -> Option<&str> {
        self.warc_header.lines().find_map(|line| {
            let (key, value) = line.split_once(':')?;
            key.trim().eq_ignore_ascii_case(name).then_some(value.trim())
        })
    }
}

/// Guess the encoding of raw record bytes.
pub fn detect_encoding(raw: &[u8]) -> &'static Encoding {
    let mut detector = EncodingDetector::new();
    detector.feed(raw, true);
    detector.guess(None, true)
}

/// Decode with a known encoding, failing on malformed sequences.
pub fn decode_with(raw: &[u8], encoding: &'static Encoding) -> Result<String, SplitError> {
    encoding
        .decode_without_bom_handling_and_without_replacement(raw)
        .map(|text| text.into_owned())
        .ok_or(SplitError::Decode { encoding: encoding.name() })
}

/// Split already-decoded record text into its three segments.
pub fn split_text(text: &str) -> Result<(String, String, String), SplitError> {
    let mut parts = text.trim().splitn(3, SEPARATOR);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(warc), Some(header), Some(body)) => Ok((warc.to_string(), header.to_string(), body.to_string())),
        (_, Some(_), None) => Err(SplitError::Malformed { segments: 2 }),
        _ => Err(SplitError::Malformed { segments: 1 }),
    }
}

/// Detect, decode and split a decompressed record.
pub fn split(raw: &[u8]) -> Result<CompoundRecord, SplitError> {
    let encoding = detect_encoding(raw);
    let text = decode_with(raw, encoding)?;
    let (warc_header, http_header, body) = split_text(&text)?;

    tracing::trace!(encoding = encoding.name(), body_len = body.len(), "split record");

    Ok(CompoundRecord { warc_header, http_header, body, encoding: encoding.name() })
}
