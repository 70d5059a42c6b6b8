//! Index lookup client.
//!
//! ### Protocol
//!
//! - **Request**: `GET <index-endpoint>/<index-set>-index?url=<encoded>&output=json`
//! - **Response**: newline-delimited JSON, one object per capture
//!   (`filename`, `offset`, `length`, `timestamp`, ...)
//! - Empty body or 404 means the crawl has no capture of the URL.
//!
//! The first capture wins; captures are not ranked by distance to the target
//! date.

pub mod locator;

pub use locator::{ArchiveRecordLocator, parse_index_body};

use async_trait::async_trait;
use reqwest::Client;
use std::time::Instant;

use crate::http::{HttpConfig, StatusPolicy};
use crate::target::index_query_url;
use crate::ArchiveError;
use crawlback_core::Error;

/// Finds where a URL's capture is stored within one index-set.
#[async_trait]
pub trait IndexLookup: Send + Sync {
    async fn lookup(&self, url: &str, index_set: &str) -> Result<ArchiveRecordLocator, ArchiveError>;
}

/// HTTP client for the crawl index server.
#[derive(Debug, Clone)]
pub struct IndexClient {
    http: Client,
    endpoint: String,
    statuses: StatusPolicy,
}

impl IndexClient {
    /// Create a new index client with the given configuration.
    pub fn new(config: &HttpConfig) -> Result<Self, Error> {
        Ok(Self {
            http: config.build_client(true)?,
            endpoint: config.index_endpoint.clone(),
            statuses: config.status_policy(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl IndexLookup for IndexClient {
    async fn lookup(&self, url: &str, index_set: &str) -> Result<ArchiveRecordLocator, ArchiveError> {
        let start = Instant::now();
        let query = index_query_url(&self.endpoint, index_set, url);

        tracing::debug!("querying index: {}", query);

        let response = self.http.get(&query).send().await?;
        let status = response.status();
        self.statuses.check(status)?;

        let body = response.text().await?;
        let locator = parse_index_body(&body)?;

        tracing::debug!(
            "index {} located {} at {}+{} in {:?}",
            index_set,
            url,
            locator.offset,
            locator.length,
            start.elapsed()
        );

        Ok(locator)
    }
}
