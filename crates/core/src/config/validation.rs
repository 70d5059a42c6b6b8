//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::catalog::SnapshotCatalog;
use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `retry_wait_secs` exceeds one hour
    /// - `max_record_bytes` is 0 or exceeds 100MB
    /// - `user_agent` is empty
    /// - an endpoint is not an absolute http(s) URL
    /// - a transient status is not a 4xx/5xx code, or is 404
    /// - a configured catalog is empty, unordered or has duplicates
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_ms < 100 {
            return Err(ConfigError::Invalid { field: "timeout_ms".into(), reason: "must be at least 100ms".into() });
        }
        if self.timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        if self.retry_wait_secs > 3600 {
            return Err(ConfigError::Invalid {
                field: "retry_wait_secs".into(),
                reason: "must not exceed one hour".into(),
            });
        }

        if self.max_record_bytes == 0 {
            return Err(ConfigError::Invalid {
                field: "max_record_bytes".into(),
                reason: "must be greater than 0".into(),
            });
        }
        if self.max_record_bytes > 100 * 1024 * 1024 {
            return Err(ConfigError::Invalid {
                field: "max_record_bytes".into(),
                reason: "must not exceed 100MB".into(),
            });
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        validate_endpoint("index_endpoint", &self.index_endpoint)?;
        validate_endpoint("storage_endpoint", &self.storage_endpoint)?;

        if let Some(status) = self
            .transient_statuses
            .iter()
            .find(|s| !(400..=599).contains(*s) || **s == 404)
        {
            return Err(ConfigError::Invalid {
                field: "transient_statuses".into(),
                reason: format!("{status} is not a retryable error status"),
            });
        }

        if let Some(entries) = &self.catalog {
            SnapshotCatalog::from_entries(entries.clone())
                .map_err(|e| ConfigError::Invalid { field: "catalog".into(), reason: e.to_string() })?;
        }

        if self.max_retry == 0 && self.max_fault_retry == 0 {
            tracing::warn!("max_retry and max_fault_retry are both 0; every failure advances to the next crawl");
        }

        Ok(())
    }
}

fn validate_endpoint(field: &str, value: &str) -> Result<(), ConfigError> {
    let parsed =
        url::Url::parse(value).map_err(|e| ConfigError::Invalid { field: field.into(), reason: e.to_string() })?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(ConfigError::Invalid { field: field.into(), reason: format!("unsupported scheme: {scheme}") }),
    }
}
