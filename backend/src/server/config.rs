//! Application settings and the server configuration built from them.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use actix_web::cookie::{Key, SameSite};
#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;
use ortho_config::OrthoConfig;
use reqwest::Url;
use serde::Deserialize;
use zeroize::Zeroizing;

use yellboard::domain::{RateLimitPolicy, RateLimitPolicyError};
use yellboard::inbound::http::session_config::BuildMode;
use yellboard::outbound::identity::{IdentityHttpClient, IdentityHttpConfig};
use yellboard::outbound::persistence::DbPool;
use yellboard::outbound::rate_limit::RedisRateLimiter;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_IDENTITY_TIMEOUT_SECS: u64 = 5;

/// Settings loaded from CLI flags, `YELLBOARD_*` variables, and config files.
///
/// Every field is optional. Absent infrastructure URLs select in-memory
/// adapters so the board runs locally without PostgreSQL, Redis, or an
/// identity provider.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "YELLBOARD")]
pub struct AppSettings {
    /// Listen address, `host:port`.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection string.
    pub database_url: Option<String>,
    /// Redis connection string for the shared rate limiter.
    pub redis_url: Option<String>,
    /// Identity provider API base URL.
    pub identity_base_url: Option<String>,
    /// Identity provider secret key.
    pub identity_secret_key: Option<String>,
    /// Identity provider request timeout in seconds.
    pub identity_timeout_secs: Option<u64>,
    /// Posts admitted per author per window.
    pub rate_limit_capacity: Option<u32>,
    /// Rate limit window in seconds.
    pub rate_limit_window_secs: Option<u64>,
}

/// Settings that parse but cannot be used.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address '{value}': {source}")]
    BindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("invalid identity base url '{value}': {reason}")]
    IdentityUrl { value: String, reason: String },
    #[error("identity_secret_key is required when identity_base_url is set")]
    MissingIdentitySecret,
    #[error(transparent)]
    RateLimit(#[from] RateLimitPolicyError),
}

impl AppSettings {
    /// Listen address, defaulting to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| SettingsError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }

    pub fn database_url(&self) -> Option<&str> {
        self.database_url.as_deref()
    }

    pub fn redis_url(&self) -> Option<&str> {
        self.redis_url.as_deref()
    }

    /// Post admission policy, defaulting to 10 per 60 seconds.
    pub fn rate_limit_policy(&self) -> Result<RateLimitPolicy, SettingsError> {
        let defaults = RateLimitPolicy::default();
        let capacity = self.rate_limit_capacity.unwrap_or(defaults.capacity());
        let window = self
            .rate_limit_window_secs
            .map_or(defaults.window(), Duration::from_secs);
        Ok(RateLimitPolicy::new(capacity, window)?)
    }

    /// Identity client settings, or `None` when no base URL is configured.
    pub fn identity_config(&self) -> Result<Option<IdentityHttpConfig>, SettingsError> {
        let Some(raw) = self.identity_base_url.as_deref() else {
            return Ok(None);
        };
        let base_url = Url::parse(raw).map_err(|err| SettingsError::IdentityUrl {
            value: raw.to_owned(),
            reason: err.to_string(),
        })?;
        let secret_key = self
            .identity_secret_key
            .clone()
            .filter(|key| !key.is_empty())
            .ok_or(SettingsError::MissingIdentitySecret)?;
        Ok(Some(IdentityHttpConfig {
            base_url,
            secret_key: Zeroizing::new(secret_key),
            timeout: Duration::from_secs(
                self.identity_timeout_secs
                    .unwrap_or(DEFAULT_IDENTITY_TIMEOUT_SECS),
            ),
        }))
    }
}

/// Everything `create_server` needs, with optional external adapters.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) rate_limit: RateLimitPolicy,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) rate_limiter: Option<Arc<RedisRateLimiter>>,
    pub(crate) identity: Option<Arc<IdentityHttpClient>>,
    pub(crate) build_mode: BuildMode,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, same_site: SameSite, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            rate_limit: RateLimitPolicy::default(),
            db_pool: None,
            rate_limiter: None,
            identity: None,
            build_mode: BuildMode::from_debug_assertions(),
            #[cfg(feature = "metrics")]
            prometheus: None,
        }
    }

    /// Policy for the in-memory limiter fallback.
    #[must_use]
    pub fn with_rate_limit(mut self, policy: RateLimitPolicy) -> Self {
        self.rate_limit = policy;
        self
    }

    /// Store posts in PostgreSQL.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Share rate limit windows through Redis.
    #[must_use]
    pub fn with_rate_limiter(mut self, limiter: RedisRateLimiter) -> Self {
        self.rate_limiter = Some(Arc::new(limiter));
        self
    }

    /// Resolve authors and sessions through the identity provider.
    #[must_use]
    pub fn with_identity(mut self, client: IdentityHttpClient) -> Self {
        self.identity = Some(Arc::new(client));
        self
    }

    /// Release mode refuses the fixture identity fallback.
    #[must_use]
    pub fn with_build_mode(mut self, mode: BuildMode) -> Self {
        self.build_mode = mode;
        self
    }

    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    #[cfg(feature = "metrics")]
    #[must_use]
    pub fn with_metrics(mut self, prometheus: Option<PrometheusMetrics>) -> Self {
        self.prometheus = prometheus;
        self
    }
}
