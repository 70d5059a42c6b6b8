//! Per-stage failure taxonomy for archive lookups and fetches.
//!
//! Every network stage returns `Result<T, ArchiveError>`. The variant decides
//! what the search controller does next: move to another crawl, retry the
//! same crawl after a wait, or give up on it.

use crate::record::SplitError;

/// Why one stage of one index-set attempt did not produce a result.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArchiveError {
    /// The index has no capture of the URL in this crawl (empty answer or 404).
    #[error("not indexed")]
    NotIndexed,

    /// Overload or unavailability status, expected to clear with time.
    #[error("transient service status {0}")]
    Transient(u16),

    /// Any other non-success status.
    #[error("unexpected status {0}")]
    UnexpectedStatus(u16),

    /// Index line, compressed record or decoded record is unusable.
    #[error("malformed: {0}")]
    Malformed(String),

    /// Connection, DNS, timeout or body-read failure.
    #[error("network fault: {0}")]
    Fault(String),
}

/// What the controller should do after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Move on to the next index-set.
    Advance,
    /// Retry the same index-set, counted against `max_retry`.
    RetryTransient,
    /// Retry the same index-set, counted against `max_fault_retry`.
    RetryFault,
}

impl ArchiveError {
    pub fn disposition(&self) -> Disposition {
        match self {
            ArchiveError::NotIndexed | ArchiveError::UnexpectedStatus(_) | ArchiveError::Malformed(_) => {
                Disposition::Advance
            }
            ArchiveError::Transient(_) => Disposition::RetryTransient,
            ArchiveError::Fault(_) => Disposition::RetryFault,
        }
    }
}

impl From<reqwest::Error> for ArchiveError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ArchiveError::Fault(format!("timeout: {err}"))
        } else {
            ArchiveError::Fault(err.to_string())
        }
    }
}

impl From<SplitError> for ArchiveError {
    fn from(err: SplitError) -> Self {
        ArchiveError::Malformed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disposition() {
        assert_eq!(ArchiveError::NotIndexed.disposition(), Disposition::Advance);
        assert_eq!(ArchiveError::UnexpectedStatus(418).disposition(), Disposition::Advance);
        assert_eq!(ArchiveError::Malformed("x".into()).disposition(), Disposition::Advance);
        assert_eq!(ArchiveError::Transient(503).disposition(), Disposition::RetryTransient);
        assert_eq!(ArchiveError::Fault("dns".into()).disposition(), Disposition::RetryFault);
    }

    #[test]
    fn test_from_split_error() {
        let err: ArchiveError = SplitError::Malformed { segments: 2 }.into();
        assert!(matches!(err, ArchiveError::Malformed(msg) if msg.contains('2')));
    }

    #[test]
    fn test_error_display() {
        assert_eq!(ArchiveError::Transient(503).to_string(), "transient service status 503");
        assert!(ArchiveError::Fault("connection refused".into()).to_string().contains("connection refused"));
    }
}
