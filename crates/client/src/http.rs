//! Shared HTTP settings for the index and storage clients.

use reqwest::{Client, StatusCode};
use std::time::Duration;

use crate::ArchiveError;
use crawlback_core::{AppConfig, Error};
use crawlback_core::config::{DEFAULT_INDEX_ENDPOINT, DEFAULT_STORAGE_ENDPOINT};

/// Configuration for the archive HTTP clients.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// User agent string (default: "crawlback/<version>")
    pub user_agent: String,

    /// Request timeout (default: 20s)
    pub timeout: Duration,

    /// Index server base URL (default: https://index.commoncrawl.org)
    pub index_endpoint: String,

    /// Blob store base URL (default: https://data.commoncrawl.org)
    pub storage_endpoint: String,

    /// Maximum decompressed record size in bytes (default: 10MB)
    pub max_record_bytes: usize,

    /// Statuses retried in place (default: 500, 502, 503, 504)
    pub transient_statuses: Vec<u16>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: concat!("crawlback/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: Duration::from_millis(20000),
            index_endpoint: DEFAULT_INDEX_ENDPOINT.to_string(),
            storage_endpoint: DEFAULT_STORAGE_ENDPOINT.to_string(),
            max_record_bytes: 10 * 1024 * 1024,
            transient_statuses: vec![500, 502, 503, 504],
        }
    }
}

impl From<&AppConfig> for HttpConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            timeout: config.timeout(),
            index_endpoint: config.index_endpoint.clone(),
            storage_endpoint: config.storage_endpoint.clone(),
            max_record_bytes: config.max_record_bytes,
            transient_statuses: config.transient_statuses.clone(),
        }
    }
}

impl HttpConfig {
    /// Build a reqwest client that keeps no idle connections between calls.
    ///
    /// `decompress` controls transparent Content-Encoding handling; the
    /// storage client turns it off because records are gzip members that the
    /// fetcher inflates itself.
    pub(crate) fn build_client(&self, decompress: bool) -> Result<Client, Error> {
        Client::builder()
            .user_agent(&self.user_agent)
            .timeout(self.timeout)
            .pool_max_idle_per_host(0)
            .use_rustls_tls()
            .gzip(decompress)
            .brotli(decompress)
            .deflate(decompress)
            .build()
            .map_err(|e| Error::HttpClient(format!("failed to build HTTP client: {}", e)))
    }

    pub(crate) fn status_policy(&self) -> StatusPolicy {
        StatusPolicy { transient: self.transient_statuses.clone() }
    }
}

/// Maps HTTP statuses onto the failure taxonomy.
#[derive(Debug, Clone)]
pub struct StatusPolicy {
    transient: Vec<u16>,
}

impl StatusPolicy {
    pub fn new(transient: Vec<u16>) -> Self {
        Self { transient }
    }

    /// `Ok(())` for 2xx, otherwise the classified failure.
    pub fn check(&self, status: StatusCode) -> Result<(), ArchiveError> {
        if status.is_success() {
            return Ok(());
        }

        let code = status.as_u16();
        if code == StatusCode::NOT_FOUND.as_u16() {
            Err(ArchiveError::NotIndexed)
        } else if self.transient.contains(&code) {
            Err(ArchiveError::Transient(code))
        } else {
            Err(ArchiveError::UnexpectedStatus(code))
        }
    }
}

impl Default for StatusPolicy {
    fn default() -> Self {
        HttpConfig::default().status_policy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_config_default() {
        let config = HttpConfig::default();
        assert!(config.user_agent.starts_with("crawlback/"));
        assert_eq!(config.timeout, Duration::from_millis(20000));
        assert_eq!(config.index_endpoint, "https://index.commoncrawl.org");
        assert_eq!(config.storage_endpoint, "https://data.commoncrawl.org");
        assert_eq!(config.max_record_bytes, 10 * 1024 * 1024);
    }

    #[test]
    fn test_http_config_from_app_config() {
        let app = AppConfig { timeout_ms: 1500, transient_statuses: vec![429], ..Default::default() };
        let config = HttpConfig::from(&app);
        assert_eq!(config.timeout, Duration::from_millis(1500));
        assert_eq!(config.transient_statuses, vec![429]);
    }

    #[test]
    fn test_status_policy() {
        let policy = StatusPolicy::default();
        assert_eq!(policy.check(StatusCode::OK), Ok(()));
        assert_eq!(policy.check(StatusCode::PARTIAL_CONTENT), Ok(()));
        assert_eq!(policy.check(StatusCode::NOT_FOUND), Err(ArchiveError::NotIndexed));
        for code in [500, 502, 503, 504] {
            let status = StatusCode::from_u16(code).unwrap();
            assert_eq!(policy.check(status), Err(ArchiveError::Transient(code)));
        }
        assert_eq!(policy.check(StatusCode::FORBIDDEN), Err(ArchiveError::UnexpectedStatus(403)));
        assert_eq!(policy.check(StatusCode::TOO_MANY_REQUESTS), Err(ArchiveError::UnexpectedStatus(429)));
    }

    #[test]
    fn test_status_policy_custom_set() {
        let policy = StatusPolicy::new(vec![429]);
        assert_eq!(policy.check(StatusCode::TOO_MANY_REQUESTS), Err(ArchiveError::Transient(429)));
        assert_eq!(policy.check(StatusCode::SERVICE_UNAVAILABLE), Err(ArchiveError::UnexpectedStatus(503)));
    }

    #[test]
    fn test_build_client() {
        let config = HttpConfig::default();
        assert!(config.build_client(true).is_ok());
        assert!(config.build_client(false).is_ok());
    }
}
