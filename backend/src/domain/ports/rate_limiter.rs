//! Port for per-author admission control.

use async_trait::async_trait;

use crate::domain::{AuthorId, RateLimitDecision};

use super::define_port_error;

define_port_error! {
    /// Errors raised by rate limiter adapters.
    pub enum RateLimiterError {
        /// The backing store could not be reached.
        Connection => "rate limiter connection failed",
        /// The backing store rejected or failed the admission script.
        Backend => "rate limiter backend failed",
    }
}

/// Port for sliding-window admission keyed by author id.
///
/// Implementations must make the check-and-record step atomic per key.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Admit and record the call, or deny it without recording.
    async fn try_admit(
        &self,
        author_id: &AuthorId,
    ) -> Result<RateLimitDecision, RateLimiterError>;
}

/// Limiter that admits everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureRateLimiter;

#[async_trait]
impl RateLimiter for FixtureRateLimiter {
    async fn try_admit(
        &self,
        _author_id: &AuthorId,
    ) -> Result<RateLimitDecision, RateLimiterError> {
        Ok(RateLimitDecision::Allowed)
    }
}
