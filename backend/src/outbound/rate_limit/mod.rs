//! Rate limiter adapters.
//!
//! - [`RedisRateLimiter`] keeps one sorted set per author in Redis and admits
//!   through a single Lua script, so admission is atomic across instances.
//! - [`InMemoryRateLimiter`] keeps the same sliding log in process memory for
//!   local runs and tests. It is not shared between processes.

mod memory;
mod redis;

pub use memory::InMemoryRateLimiter;
pub use redis::RedisRateLimiter;

/// Redis key namespace for admission logs.
pub const RATE_LIMIT_KEY_PREFIX: &str = "yellboard:ratelimit";
