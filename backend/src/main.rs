//! Yellboard server entry point.

mod server;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{AppSettings, ServerConfig, create_server};
use yellboard::inbound::http::health::HealthState;
use yellboard::inbound::http::session_config::{BuildMode, session_settings_from_env};
use yellboard::outbound::identity::IdentityHttpClient;
use yellboard::outbound::persistence::{DbPool, PoolConfig};
use yellboard::outbound::rate_limit::RedisRateLimiter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if let Err(error) = fmt().with_env_filter(filter).json().try_init() {
        warn!(%error, "tracing init failed");
    }
}

async fn build_config(settings: &AppSettings) -> std::io::Result<ServerConfig> {
    let mode = BuildMode::from_debug_assertions();
    let session = session_settings_from_env(&DefaultEnv::new(), mode).map_err(std::io::Error::other)?;
    info!(fingerprint = %session.key_fingerprint(), "session key loaded");

    let policy = settings.rate_limit_policy().map_err(std::io::Error::other)?;
    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;
    let mut config = ServerConfig::new(
        session.key,
        session.cookie_secure,
        session.same_site,
        bind_addr,
    )
    .with_rate_limit(policy)
    .with_build_mode(mode);

    if let Some(url) = settings.database_url() {
        let pool = DbPool::new(PoolConfig::new(url))
            .await
            .map_err(std::io::Error::other)?;
        config = config.with_db_pool(pool);
    }
    if let Some(url) = settings.redis_url() {
        let limiter = RedisRateLimiter::connect(url, policy)
            .await
            .map_err(std::io::Error::other)?;
        config = config.with_rate_limiter(limiter);
    }
    if let Some(identity) = settings.identity_config().map_err(std::io::Error::other)? {
        let client = IdentityHttpClient::new(identity).map_err(std::io::Error::other)?;
        config = config.with_identity(client);
    }
    Ok(config)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    init_tracing();

    let settings = AppSettings::load().map_err(|err| std::io::Error::other(err.to_string()))?;
    let config = build_config(&settings).await?;
    info!(addr = %config.bind_addr(), "starting yellboard");

    let health_state = web::Data::new(HealthState::new());
    create_server(health_state, config)?.await
}
