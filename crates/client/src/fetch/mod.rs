//! Byte-range record fetcher.
//!
//! ### Protocol
//! - `GET <storage-endpoint>/<filename>` with `Range: bytes=<offset>-<offset+length-1>`
//! - The body is one gzip member holding one compound record.
//!
//! ### Safety Gates
//! - Zero-length locators are rejected before any request.
//! - Locators and responses larger than the record limit are rejected.
//! - A full-content `200` is only accepted for records at offset 0, and the
//!   body is read chunk by chunk and cut off past the locator length.
//! - Decompression is bounded by the record limit.
//!
//! Anything unusable is reported as `Malformed` so the search moves on to the
//! next crawl instead of failing.

use async_trait::async_trait;
use bytes::Bytes;
use flate2::read::GzDecoder;
use reqwest::{Client, Response, StatusCode, header};
use std::io::Read;
use std::time::Instant;

use crate::http::{HttpConfig, StatusPolicy};
use crate::index::ArchiveRecordLocator;
use crate::target::storage_url;
use crate::ArchiveError;
use crawlback_core::Error;

/// Retrieves and inflates the record a locator points at.
#[async_trait]
pub trait RecordFetch: Send + Sync {
    async fn fetch(&self, locator: &ArchiveRecordLocator) -> Result<Bytes, ArchiveError>;
}

/// HTTP byte-range client for the crawl blob store.
#[derive(Debug, Clone)]
pub struct ContentFetcher {
    http: Client,
    endpoint: String,
    max_record_bytes: usize,
    statuses: StatusPolicy,
}

impl ContentFetcher {
    /// Create a new fetcher with the given configuration.
    pub fn new(config: &HttpConfig) -> Result<Self, Error> {
        Ok(Self {
            http: config.build_client(false)?,
            endpoint: config.storage_endpoint.clone(),
            max_record_bytes: config.max_record_bytes,
            statuses: config.status_policy(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl RecordFetch for ContentFetcher {
    async fn fetch(&self, locator: &ArchiveRecordLocator) -> Result<Bytes, ArchiveError> {
        let start = Instant::now();
        let range = locator
            .range_header()
            .ok_or_else(|| ArchiveError::Malformed("zero-length record".into()))?;

        if locator.length > self.max_record_bytes as u64 {
            return Err(ArchiveError::Malformed(format!(
                "record of {} bytes exceeds {}",
                locator.length, self.max_record_bytes
            )));
        }

        let url = storage_url(&self.endpoint, &locator.filename);
        tracing::debug!("fetching {} ({})", url, range);

        let mut response = self.http.get(&url).header(header::RANGE, &range).send().await?;
        let status = response.status();
        self.statuses.check(status)?;

        // A server that ignores Range streams the whole blob from byte 0.
        if status != StatusCode::PARTIAL_CONTENT && locator.offset > 0 {
            return Err(ArchiveError::Malformed(format!("server ignored {} and answered {}", range, status)));
        }
        if let Some(len) = response.content_length()
            && len > locator.length
        {
            return Err(ArchiveError::Malformed(format!(
                "expected {} bytes for {}, server sent {}",
                locator.length, range, len
            )));
        }

        let compressed = read_bounded(&mut response, locator.length).await?;
        let record = decompress_record(&compressed, self.max_record_bytes)?;

        tracing::debug!(
            "fetched {} bytes ({} inflated) from {} in {}ms",
            compressed.len(),
            record.len(),
            locator.filename,
            start.elapsed().as_millis()
        );

        Ok(Bytes::from(record))
    }
}

/// Read the response body, failing once it grows past `limit` bytes.
async fn read_bounded(response: &mut Response, limit: u64) -> Result<Vec<u8>, ArchiveError> {
    let mut body = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        if body.len() as u64 + chunk.len() as u64 > limit {
            return Err(ArchiveError::Malformed(format!("server sent more than {limit} bytes")));
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

/// Inflate one gzip member, refusing output larger than `limit` bytes.
pub fn decompress_record(compressed: &[u8], limit: usize) -> Result<Vec<u8>, ArchiveError> {
    let mut decoder = GzDecoder::new(compressed).take((limit as u64).saturating_add(1));
    let mut out = Vec::new();
    decoder
        .read_to_end(&mut out)
        .map_err(|e| ArchiveError::Malformed(format!("gzip: {e}")))?;

    if out.len() > limit {
        return Err(ArchiveError::Malformed(format!("inflated record exceeds {limit} bytes")));
    }
    Ok(out)
}
