//! Unified error types for crawlback.
//!
//! Only construction-time problems surface here. A page that cannot be found
//! in any snapshot is a normal resolution outcome, never an `Error`.

use crate::catalog::CatalogError;
use crate::config::ConfigError;

/// Unified error type for the crawlback crates.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Snapshot catalog failed validation.
    #[error("INVALID_CATALOG: {0}")]
    Catalog(#[from] CatalogError),

    /// Configuration failed to load or validate.
    #[error("INVALID_CONFIG: {0}")]
    Config(#[from] ConfigError),

    /// Match table file could not be read.
    #[error("MATCH_TABLE_IO: {path}: {source}")]
    MatchTableIo { path: String, source: std::io::Error },

    /// Match table file is not a valid JSON object of month keys.
    #[error("MATCH_TABLE_PARSE: {0}")]
    MatchTableParse(String),

    /// HTTP client could not be constructed.
    #[error("HTTP_CLIENT: {0}")]
    HttpClient(String),
}
