//! Redis-backed sliding-log limiter.
//!
//! Each author owns a sorted set scored by admission time in milliseconds.
//! The admission script trims expired members, counts the rest and records
//! the call only when there is room. The script reads Redis' own `TIME` so
//! every instance shares one clock.

use async_trait::async_trait;
use bb8_redis::RedisConnectionManager;
use bb8_redis::bb8::{Pool, RunError};
use redis::{RedisError, Script};
use tracing::debug;
use uuid::Uuid;

use super::RATE_LIMIT_KEY_PREFIX;
use crate::domain::ports::{RateLimiter, RateLimiterError};
use crate::domain::{AuthorId, RateLimitDecision, RateLimitPolicy};

const ADMIT_SCRIPT: &str = r"
local key = KEYS[1]
local capacity = tonumber(ARGV[1])
local window_ms = tonumber(ARGV[2])
local member = ARGV[3]
local time = redis.call('TIME')
local now_ms = tonumber(time[1]) * 1000 + math.floor(tonumber(time[2]) / 1000)
redis.call('ZREMRANGEBYSCORE', key, '-inf', now_ms - window_ms)
if redis.call('ZCARD', key) < capacity then
    redis.call('ZADD', key, now_ms, member)
    redis.call('PEXPIRE', key, window_ms)
    return 1
end
return 0
";

fn map_pool_error(error: RunError<RedisError>) -> RateLimiterError {
    match error {
        RunError::User(err) => RateLimiterError::connection(err.to_string()),
        RunError::TimedOut => RateLimiterError::connection("redis pool checkout timed out"),
    }
}

/// Format the Redis key holding `author_id`'s admission log.
pub(crate) fn admission_key(author_id: &AuthorId) -> String {
    format!("{RATE_LIMIT_KEY_PREFIX}:{author_id}")
}

/// Limiter that keeps admission logs in Redis.
#[derive(Clone)]
pub struct RedisRateLimiter {
    pool: Pool<RedisConnectionManager>,
    policy: RateLimitPolicy,
    script: Script,
}

impl RedisRateLimiter {
    /// Build a limiter over an existing pool.
    pub fn new(pool: Pool<RedisConnectionManager>, policy: RateLimitPolicy) -> Self {
        Self {
            pool,
            policy,
            script: Script::new(ADMIT_SCRIPT),
        }
    }

    /// Connect a pool to `redis_url` and build a limiter over it.
    pub async fn connect(
        redis_url: &str,
        policy: RateLimitPolicy,
    ) -> Result<Self, RateLimiterError> {
        let manager = RedisConnectionManager::new(redis_url)
            .map_err(|err| RateLimiterError::connection(err.to_string()))?;
        let pool = Pool::builder()
            .build(manager)
            .await
            .map_err(|err| RateLimiterError::connection(err.to_string()))?;
        Ok(Self::new(pool, policy))
    }
}

#[async_trait]
impl RateLimiter for RedisRateLimiter {
    async fn try_admit(
        &self,
        author_id: &AuthorId,
    ) -> Result<RateLimitDecision, RateLimiterError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let admitted: i64 = self
            .script
            .key(admission_key(author_id))
            .arg(self.policy.capacity())
            .arg(self.policy.window_millis())
            .arg(Uuid::new_v4().to_string())
            .invoke_async(&mut *conn)
            .await
            .map_err(|err| RateLimiterError::backend(err.to_string()))?;

        if admitted == 1 {
            Ok(RateLimitDecision::Allowed)
        } else {
            debug!(author_id = %author_id, "admission denied");
            Ok(RateLimitDecision::Denied)
        }
    }
}
