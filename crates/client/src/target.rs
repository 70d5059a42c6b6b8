//! Target URL checks and archive endpoint construction.
//!
//! The index matches on the URL exactly as the caller wrote it, so targets
//! are only trimmed and checked, never rewritten.

use url::form_urlencoded;

/// Error type for target URL validation failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UrlError {
    #[error("empty URL")]
    Empty,

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// Validate a target URL and return it trimmed.
///
/// Scheme-less targets (`example.com/page`) are accepted as the index server
/// does; explicit schemes must be http or https.
pub fn validate_target(input: &str) -> Result<&str, UrlError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let with_scheme = if trimmed.contains("://") { trimmed.to_string() } else { format!("http://{trimmed}") };
    let parsed = url::Url::parse(&with_scheme).map_err(|e| UrlError::InvalidUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => Ok(trimmed),
        scheme => Err(UrlError::UnsupportedScheme(scheme.to_string())),
    }
}

/// `<endpoint>/<index_set>-index?url=<form-encoded target>&output=json`
pub fn index_query_url(endpoint: &str, index_set: &str, target: &str) -> String {
    let encoded: String = form_urlencoded::byte_serialize(target.as_bytes()).collect();
    format!("{}/{}-index?url={}&output=json", endpoint.trim_end_matches('/'), index_set, encoded)
}

/// `<endpoint>/<filename>`
pub fn storage_url(endpoint: &str, filename: &str) -> String {
    format!("{}/{}", endpoint.trim_end_matches('/'), filename.trim_start_matches('/'))
}
