//! Port wiring for the HTTP state.
//!
//! Each external adapter is optional; a missing one is replaced by its
//! in-process counterpart with a warning so local runs need no infrastructure.
//! The fixture identity provider accepts a published token, so release builds
//! refuse to start without a real one.

use std::sync::Arc;

use actix_web::web;
use mockable::Clock;
use tracing::warn;

use yellboard::domain::ports::{
    FixtureIdentityProvider, FixtureSessionVerifier, IdentityProvider, PostRepository,
    RateLimiter, SessionVerifier,
};
use yellboard::domain::{AuthorQueryService, PostCreationService, PostQueryService};
use yellboard::inbound::http::session_config::BuildMode;
use yellboard::inbound::http::state::HttpState;
use yellboard::outbound::persistence::{DieselPostRepository, InMemoryPostRepository};
use yellboard::outbound::rate_limit::InMemoryRateLimiter;

use super::ServerConfig;

/// Adapter wiring failures.
#[derive(Debug, thiserror::Error)]
pub enum StateBuildError {
    /// Release builds need a configured identity provider.
    #[error(
        "identity provider must be configured in release builds (set YELLBOARD_IDENTITY_BASE_URL)"
    )]
    IdentityRequired,
}

fn build_post_repository(config: &ServerConfig) -> Arc<dyn PostRepository> {
    match &config.db_pool {
        Some(pool) => Arc::new(DieselPostRepository::new(pool.clone())),
        None => {
            warn!("no database configured; posts are kept in memory and lost on restart");
            Arc::new(InMemoryPostRepository::new())
        }
    }
}

fn build_rate_limiter(config: &ServerConfig, clock: &Arc<dyn Clock>) -> Arc<dyn RateLimiter> {
    match &config.rate_limiter {
        Some(limiter) => limiter.clone(),
        None => {
            warn!("no redis configured; rate limit windows are per process");
            Arc::new(InMemoryRateLimiter::new(config.rate_limit, clock.clone()))
        }
    }
}

type IdentityPorts = (Arc<dyn IdentityProvider>, Arc<dyn SessionVerifier>);

fn build_identity(config: &ServerConfig) -> Result<IdentityPorts, StateBuildError> {
    match (&config.identity, config.build_mode) {
        (Some(client), _) => {
            let identity: Arc<dyn IdentityProvider> = client.clone();
            let sessions: Arc<dyn SessionVerifier> = client.clone();
            Ok((identity, sessions))
        }
        (None, BuildMode::Release) => Err(StateBuildError::IdentityRequired),
        (None, BuildMode::Debug) => {
            warn!("no identity provider configured; using fixture identities");
            Ok((
                Arc::new(FixtureIdentityProvider),
                Arc::new(FixtureSessionVerifier),
            ))
        }
    }
}

/// Build handler state from the configured adapters.
///
/// # Errors
/// [`StateBuildError::IdentityRequired`] in release mode without an identity
/// provider.
pub fn build_http_state(
    config: &ServerConfig,
    clock: Arc<dyn Clock>,
) -> Result<web::Data<HttpState>, StateBuildError> {
    let (identity, sessions) = build_identity(config)?;
    let post_repo = build_post_repository(config);
    let limiter = build_rate_limiter(config, &clock);

    Ok(web::Data::new(HttpState {
        posts: Arc::new(PostQueryService::new(post_repo.clone(), identity.clone())),
        posts_command: Arc::new(PostCreationService::new(post_repo, limiter, clock)),
        sessions,
        authors: Arc::new(AuthorQueryService::new(identity)),
    }))
}
