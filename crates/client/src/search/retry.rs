//! Retry bookkeeping for one index-set.

use std::time::Duration;

use crate::error::Disposition;
use crawlback_core::AppConfig;

/// Limits applied to in-place retries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries of one index-set on transient statuses.
    pub max_retry: u32,
    /// Retries of one index-set on network faults.
    pub max_fault_retry: u32,
    /// Sleep before each retry.
    pub wait: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for RetryPolicy {
    fn from(config: &AppConfig) -> Self {
        Self { max_retry: config.max_retry, max_fault_retry: config.max_fault_retry, wait: config.retry_wait() }
    }
}

/// Attempts spent on the current index-set. Reset on every advance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetryState {
    pub transient: u32,
    pub faults: u32,
}

impl RetryState {
    /// Record a failure; `true` means retry the same index-set.
    pub fn register(&mut self, disposition: Disposition, policy: &RetryPolicy) -> bool {
        let (count, max) = match disposition {
            Disposition::Advance => return false,
            Disposition::RetryTransient => (&mut self.transient, policy.max_retry),
            Disposition::RetryFault => (&mut self.faults, policy.max_fault_retry),
        };

        if *count >= max {
            return false;
        }
        *count += 1;
        true
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
