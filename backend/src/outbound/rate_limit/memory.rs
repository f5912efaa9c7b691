//! Process-local sliding-log limiter.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use tracing::debug;

use crate::domain::ports::{RateLimiter, RateLimiterError};
use crate::domain::{AuthorId, RateLimitDecision, RateLimitPolicy};

#[derive(Debug)]
struct AdmissionLog {
    by_author: HashMap<AuthorId, VecDeque<DateTime<Utc>>>,
    swept_at: DateTime<Utc>,
}

impl AdmissionLog {
    /// Drop authors with no admission newer than `cutoff`. Runs at most once
    /// per window.
    fn sweep(&mut self, now: DateTime<Utc>, cutoff: DateTime<Utc>) {
        if self.swept_at > cutoff {
            return;
        }
        self.by_author
            .retain(|_, entries| entries.back().is_some_and(|latest| *latest > cutoff));
        self.swept_at = now;
    }
}

/// Sliding-log limiter held in a mutex-guarded map.
///
/// Timestamps of admitted calls are kept per author; entries at or before
/// `now - window` no longer count. Authors whose window has emptied are
/// swept out once per window so the map tracks only recent posters.
pub struct InMemoryRateLimiter {
    policy: RateLimitPolicy,
    clock: Arc<dyn Clock>,
    log: Mutex<AdmissionLog>,
}

impl InMemoryRateLimiter {
    /// Create an empty limiter.
    pub fn new(policy: RateLimitPolicy, clock: Arc<dyn Clock>) -> Self {
        let swept_at = clock.utc();
        Self {
            policy,
            clock,
            log: Mutex::new(AdmissionLog {
                by_author: HashMap::new(),
                swept_at,
            }),
        }
    }

    #[cfg(test)]
    fn tracked_authors(&self) -> usize {
        self.log
            .lock()
            .map(|log| log.by_author.len())
            .unwrap_or_default()
    }

    fn window(&self) -> Result<TimeDelta, RateLimiterError> {
        TimeDelta::from_std(self.policy.window())
            .map_err(|err| RateLimiterError::backend(format!("window out of range: {err}")))
    }
}

#[async_trait]
impl RateLimiter for InMemoryRateLimiter {
    async fn try_admit(
        &self,
        author_id: &AuthorId,
    ) -> Result<RateLimitDecision, RateLimiterError> {
        let window = self.window()?;
        let now = self.clock.utc();
        let cutoff = now - window;

        let mut log = self
            .log
            .lock()
            .map_err(|_| RateLimiterError::backend("limiter state poisoned"))?;
        log.sweep(now, cutoff);
        let entries = log.by_author.entry(author_id.clone()).or_default();
        while entries.front().is_some_and(|admitted| *admitted <= cutoff) {
            entries.pop_front();
        }

        let capacity = usize::try_from(self.policy.capacity()).unwrap_or(usize::MAX);
        if entries.len() >= capacity {
            debug!(author_id = %author_id, in_window = entries.len(), "admission denied");
            return Ok(RateLimitDecision::Denied);
        }
        entries.push_back(now);
        Ok(RateLimitDecision::Allowed)
    }
}
