//! Resolver configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (CRAWLBACK_*)
//! 2. TOML config file (if CRAWLBACK_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::Error;
use crate::catalog::{CatalogEntry, MatchTable, SnapshotCatalog};

mod validation;

pub use validation::ConfigError;

/// Default Common Crawl index server.
pub const DEFAULT_INDEX_ENDPOINT: &str = "https://index.commoncrawl.org";

/// Default Common Crawl blob store.
pub const DEFAULT_STORAGE_ENDPOINT: &str = "https://data.commoncrawl.org";

/// Resolver configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (CRAWLBACK_*)
/// 2. TOML config file (if CRAWLBACK_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Shift of the starting search position, in index-sets.
    ///
    /// Positive values start at older crawls, negative at newer ones.
    /// Set via CRAWLBACK_MONTH_OFFSET environment variable.
    #[serde(default)]
    pub month_offset: i32,

    /// Retries of one index-set while the service answers with a transient status.
    ///
    /// Set via CRAWLBACK_MAX_RETRY environment variable.
    #[serde(default = "default_max_retry")]
    pub max_retry: u32,

    /// Seconds to sleep before each retry.
    ///
    /// Set via CRAWLBACK_RETRY_WAIT_SECS environment variable.
    #[serde(default = "default_retry_wait_secs")]
    pub retry_wait_secs: u64,

    /// Retries of one index-set after network faults (connection refused, DNS,
    /// timeouts). Counted separately from `max_retry`.
    ///
    /// Set via CRAWLBACK_MAX_FAULT_RETRY environment variable.
    #[serde(default = "default_max_fault_retry")]
    pub max_fault_retry: u32,

    /// Search toward older crawls (true) or newer crawls (false).
    ///
    /// Set via CRAWLBACK_BACKWARD environment variable.
    #[serde(default = "default_true")]
    pub backward: bool,

    /// Base URL of the index server.
    ///
    /// Set via CRAWLBACK_INDEX_ENDPOINT environment variable.
    #[serde(default = "default_index_endpoint")]
    pub index_endpoint: String,

    /// Base URL of the blob store holding the compressed records.
    ///
    /// Set via CRAWLBACK_STORAGE_ENDPOINT environment variable.
    #[serde(default = "default_storage_endpoint")]
    pub storage_endpoint: String,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via CRAWLBACK_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via CRAWLBACK_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Upper bound on a decompressed record, in bytes.
    ///
    /// Set via CRAWLBACK_MAX_RECORD_BYTES environment variable.
    #[serde(default = "default_max_record_bytes")]
    pub max_record_bytes: usize,

    /// HTTP statuses treated as transient service failures.
    ///
    /// Set via CRAWLBACK_TRANSIENT_STATUSES environment variable (e.g. `[500,503]`).
    #[serde(default = "default_transient_statuses")]
    pub transient_statuses: Vec<u16>,

    /// Optional JSON match table re-targeting `(url, month)` pairs.
    ///
    /// Set via CRAWLBACK_MATCH_FILE environment variable.
    #[serde(default)]
    pub match_file: Option<PathBuf>,

    /// Replacement for the built-in catalog, newest first.
    ///
    /// Usually given in the TOML file as `[[catalog]]` tables.
    #[serde(default)]
    pub catalog: Option<Vec<CatalogEntry>>,
}

fn default_max_retry() -> u32 {
    5
}

fn default_retry_wait_secs() -> u64 {
    3
}

fn default_max_fault_retry() -> u32 {
    20
}

fn default_true() -> bool {
    true
}

fn default_index_endpoint() -> String {
    DEFAULT_INDEX_ENDPOINT.into()
}

fn default_storage_endpoint() -> String {
    DEFAULT_STORAGE_ENDPOINT.into()
}

fn default_user_agent() -> String {
    concat!("crawlback/", env!("CARGO_PKG_VERSION")).into()
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_max_record_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_transient_statuses() -> Vec<u16> {
    vec![500, 502, 503, 504]
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            month_offset: 0,
            max_retry: default_max_retry(),
            retry_wait_secs: default_retry_wait_secs(),
            max_fault_retry: default_max_fault_retry(),
            backward: true,
            index_endpoint: default_index_endpoint(),
            storage_endpoint: default_storage_endpoint(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            max_record_bytes: default_max_record_bytes(),
            transient_statuses: default_transient_statuses(),
            match_file: None,
            catalog: None,
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Delay between retries of one index-set.
    pub fn retry_wait(&self) -> Duration {
        Duration::from_secs(self.retry_wait_secs)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `CRAWLBACK_`
    /// 2. TOML file from `CRAWLBACK_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("CRAWLBACK_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("CRAWLBACK_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// The configured catalog, or the built-in one.
    pub fn snapshot_catalog(&self) -> Result<SnapshotCatalog, Error> {
        match &self.catalog {
            Some(entries) => Ok(SnapshotCatalog::from_entries(entries.clone())?),
            None => Ok(SnapshotCatalog::builtin()),
        }
    }

    /// Load the match table named by `match_file`, if any.
    pub fn match_table(&self) -> Result<Option<MatchTable>, Error> {
        self.match_file.as_ref().map(MatchTable::load).transpose()
    }
}
