//! Reqwest-backed identity provider client.
//!
//! Owns transport details only: endpoint construction, bearer auth, timeout
//! and status mapping, and JSON decoding into domain records.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::warn;
use zeroize::Zeroizing;

use super::dto::{SessionDto, UserDto, VerifySessionDto};
use crate::domain::ports::{IdentityProvider, IdentityProviderError, SessionVerifier};
use crate::domain::{AuthorId, AuthorProfile, Error, SessionCredentials};

const USER_AGENT: &str = "yellboard-backend/0.1";

/// Connection settings for [`IdentityHttpClient`].
pub struct IdentityHttpConfig {
    /// Provider API base, e.g. `https://api.clerk.com`.
    pub base_url: Url,
    /// Secret key sent as a bearer token.
    pub secret_key: Zeroizing<String>,
    /// Per-request timeout.
    pub timeout: Duration,
}

/// Identity provider client performing JSON requests against one base URL.
pub struct IdentityHttpClient {
    client: Client,
    base_url: Url,
    secret_key: Zeroizing<String>,
}

impl IdentityHttpClient {
    /// Build a client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(config: IdentityHttpConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url,
            secret_key: config.secret_key,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, IdentityProviderError> {
        endpoint(&self.base_url, segments)
    }

    async fn fetch_users(
        &self,
        ids: &[AuthorId],
        limit: usize,
    ) -> Result<Vec<AuthorProfile>, IdentityProviderError> {
        let url = self.endpoint(&["v1", "users"])?;
        let mut query: Vec<(&str, String)> = ids
            .iter()
            .map(|id| ("user_id", id.to_string()))
            .collect();
        query.push(("limit", limit.to_string()));

        let response = self
            .client
            .get(url)
            .bearer_auth(self.secret_key.as_str())
            .header(reqwest::header::ACCEPT, "application/json")
            .query(&query)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        parse_users(body.as_ref())
    }

    async fn verify_session(
        &self,
        credentials: &SessionCredentials,
    ) -> Result<Option<AuthorId>, IdentityProviderError> {
        let url = self.endpoint(&["v1", "sessions", credentials.session_id(), "verify"])?;
        let response = self
            .client
            .post(url)
            .bearer_auth(self.secret_key.as_str())
            .json(&VerifySessionDto {
                token: credentials.token(),
            })
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        match status {
            StatusCode::BAD_REQUEST | StatusCode::NOT_FOUND | StatusCode::UNAUTHORIZED => {
                return Ok(None);
            }
            _ if !status.is_success() => return Err(map_status_error(status, body.as_ref())),
            _ => {}
        }

        let session: SessionDto = serde_json::from_slice(body.as_ref()).map_err(|error| {
            IdentityProviderError::decode(format!("invalid session payload: {error}"))
        })?;
        if !session.is_active() {
            return Ok(None);
        }
        AuthorId::new(session.user_id)
            .map(Some)
            .map_err(|err| IdentityProviderError::decode(format!("session user id: {err}")))
    }
}

#[async_trait]
impl IdentityProvider for IdentityHttpClient {
    async fn get_users(
        &self,
        ids: &[AuthorId],
        limit: usize,
    ) -> Result<Vec<AuthorProfile>, IdentityProviderError> {
        if ids.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }
        self.fetch_users(ids, limit).await
    }
}

#[async_trait]
impl SessionVerifier for IdentityHttpClient {
    async fn verify(&self, credentials: &SessionCredentials) -> Result<AuthorId, Error> {
        match self.verify_session(credentials).await {
            Ok(Some(author_id)) => Ok(author_id),
            Ok(None) => Err(Error::unauthorized("invalid session credentials")),
            Err(error) => {
                warn!(%error, "session verification failed");
                Err(map_verification_error(error))
            }
        }
    }
}

fn map_verification_error(error: IdentityProviderError) -> Error {
    match error {
        IdentityProviderError::RateLimited { .. }
        | IdentityProviderError::Timeout { .. }
        | IdentityProviderError::Transport { .. } => {
            Error::service_unavailable("identity provider unavailable")
        }
        IdentityProviderError::Unauthorized { .. } | IdentityProviderError::Decode { .. } => {
            Error::internal(format!("identity provider error: {error}"))
        }
    }
}

/// Append percent-encoded path segments to the base URL.
fn endpoint(base_url: &Url, segments: &[&str]) -> Result<Url, IdentityProviderError> {
    let mut url = base_url.clone();
    url.path_segments_mut()
        .map_err(|()| IdentityProviderError::transport("identity base url cannot carry a path"))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

fn parse_users(body: &[u8]) -> Result<Vec<AuthorProfile>, IdentityProviderError> {
    let users: Vec<UserDto> = serde_json::from_slice(body).map_err(|error| {
        IdentityProviderError::decode(format!("invalid user list payload: {error}"))
    })?;
    users
        .into_iter()
        .map(UserDto::into_domain)
        .collect::<Result<Vec<_>, _>>()
        .map_err(IdentityProviderError::decode)
}

fn map_transport_error(error: reqwest::Error) -> IdentityProviderError {
    if error.is_timeout() {
        IdentityProviderError::timeout(error.to_string())
    } else {
        IdentityProviderError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> IdentityProviderError {
    let preview = body_preview(body);
    let message = if preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {preview}", status.as_u16())
    };
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            IdentityProviderError::unauthorized(message)
        }
        StatusCode::TOO_MANY_REQUESTS => IdentityProviderError::rate_limited(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            IdentityProviderError::timeout(message)
        }
        _ => IdentityProviderError::transport(message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 120;
    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let mut preview: String = compact.chars().take(PREVIEW_CHAR_LIMIT).collect();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        preview.push_str("...");
    }
    preview
}
