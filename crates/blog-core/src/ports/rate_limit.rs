//! Request throttling port for the credential endpoints.

use async_trait::async_trait;
use std::time::Duration;

/// Counts requests per client key.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Count a request against `key` and decide whether it may proceed.
    async fn check(&self, key: &str) -> Result<RateLimitDecision, RateLimitError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    Allowed,
    /// Over quota; the client may retry after the given delay.
    Limited { retry_after: Duration },
}

#[derive(Debug, thiserror::Error)]
pub enum RateLimitError {
    #[error("Invalid rate limit quota: {0}")]
    InvalidQuota(&'static str),

    #[error("Rate limiter backend error: {0}")]
    Backend(String),
}
