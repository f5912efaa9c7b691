//! Admission policy for post creation.

use std::time::Duration;

/// Default number of admitted calls per window.
pub const DEFAULT_RATE_LIMIT_CAPACITY: u32 = 10;
/// Default sliding window length.
pub const DEFAULT_RATE_LIMIT_WINDOW: Duration = Duration::from_secs(60);

/// Validation errors returned by [`RateLimitPolicy::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RateLimitPolicyError {
    /// Capacity was zero.
    #[error("rate limit capacity must be positive")]
    ZeroCapacity,
    /// Window was shorter than one millisecond.
    #[error("rate limit window must be at least one millisecond")]
    WindowTooShort,
}

/// Sliding-window admission policy.
///
/// A call is admitted when fewer than `capacity` admitted calls fall inside
/// the trailing `window` ending at the moment of the call.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use yellboard::domain::RateLimitPolicy;
///
/// let policy = RateLimitPolicy::new(10, Duration::from_secs(60)).expect("valid policy");
/// assert_eq!(policy.capacity(), 10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    capacity: u32,
    window: Duration,
}

impl RateLimitPolicy {
    /// Validate and construct a policy.
    pub fn new(capacity: u32, window: Duration) -> Result<Self, RateLimitPolicyError> {
        if capacity == 0 {
            return Err(RateLimitPolicyError::ZeroCapacity);
        }
        if window < Duration::from_millis(1) {
            return Err(RateLimitPolicyError::WindowTooShort);
        }
        Ok(Self { capacity, window })
    }

    /// Admitted calls allowed per window.
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Window length.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Window length in whole milliseconds, saturating.
    pub fn window_millis(&self) -> i64 {
        i64::try_from(self.window.as_millis()).unwrap_or(i64::MAX)
    }
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_RATE_LIMIT_CAPACITY,
            window: DEFAULT_RATE_LIMIT_WINDOW,
        }
    }
}

/// Outcome of one admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    /// The call was admitted and recorded.
    Allowed,
    /// The window is full; nothing was recorded.
    Denied,
}

impl RateLimitDecision {
    /// Whether the call may proceed.
    pub fn is_allowed(self) -> bool {
        matches!(self, Self::Allowed)
    }
}
