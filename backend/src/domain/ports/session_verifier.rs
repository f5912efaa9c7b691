//! Driving port for opening a board session.
//!
//! Inbound adapters hand the provider-issued credentials to this port and get
//! back the author id to store in the session cookie. Adapters own the
//! mapping from provider failures to domain errors.

use async_trait::async_trait;

use crate::domain::{AuthorId, Error, SessionCredentials};

/// Domain use-case port for session verification.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionVerifier: Send + Sync {
    /// Verify credentials and return the authenticated author id.
    async fn verify(&self, credentials: &SessionCredentials) -> Result<AuthorId, Error>;
}

/// Token accepted by [`FixtureSessionVerifier`].
pub const FIXTURE_SESSION_TOKEN: &str = "fixture-token";

/// Development verifier: the fixture token opens a session whose author id is
/// the supplied session id.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureSessionVerifier;

#[async_trait]
impl SessionVerifier for FixtureSessionVerifier {
    async fn verify(&self, credentials: &SessionCredentials) -> Result<AuthorId, Error> {
        if credentials.token() != FIXTURE_SESSION_TOKEN {
            return Err(Error::unauthorized("invalid session credentials"));
        }
        AuthorId::new(credentials.session_id())
            .map_err(|err| Error::invalid_request(format!("invalid session id: {err}")))
    }
}
