//! Port for reading author profiles from the external identity provider.

use async_trait::async_trait;

use crate::domain::{AuthorId, AuthorProfile};

use super::define_port_error;

define_port_error! {
    /// Errors raised by identity provider adapters.
    pub enum IdentityProviderError {
        /// The provider rejected our credentials.
        Unauthorized => "identity provider rejected credentials",
        /// The provider throttled the request.
        RateLimited => "identity provider rate limited the request",
        /// The request did not complete in time.
        Timeout => "identity provider timed out",
        /// Network or protocol failure.
        Transport => "identity provider transport failed",
        /// The response body did not match the expected shape.
        Decode => "identity provider response was malformed",
    }
}

/// Port for bulk profile lookup by author id.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Return profiles for up to `limit` of the requested ids.
    ///
    /// Unknown ids are silently omitted.
    async fn get_users(
        &self,
        ids: &[AuthorId],
        limit: usize,
    ) -> Result<Vec<AuthorProfile>, IdentityProviderError>;
}

/// Avatar used by [`FixtureIdentityProvider`].
pub const FIXTURE_PROFILE_IMAGE_URL: &str = "https://img.yellboard.invalid/avatar.png";

/// Development provider that knows every id it is asked about.
///
/// Each profile uses the author id as its first name.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureIdentityProvider;

#[async_trait]
impl IdentityProvider for FixtureIdentityProvider {
    async fn get_users(
        &self,
        ids: &[AuthorId],
        limit: usize,
    ) -> Result<Vec<AuthorProfile>, IdentityProviderError> {
        Ok(ids
            .iter()
            .take(limit)
            .map(|id| AuthorProfile {
                id: id.clone(),
                first_name: Some(id.to_string()),
                profile_image_url: FIXTURE_PROFILE_IMAGE_URL.to_owned(),
            })
            .collect())
    }
}
