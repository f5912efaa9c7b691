//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod identity_provider;
mod post_repository;
mod posts_command;
mod posts_query;
mod rate_limiter;
mod session_verifier;

#[cfg(test)]
pub use identity_provider::MockIdentityProvider;
pub use identity_provider::{
    FIXTURE_PROFILE_IMAGE_URL, FixtureIdentityProvider, IdentityProvider, IdentityProviderError,
};
#[cfg(test)]
pub use post_repository::MockPostRepository;
pub use post_repository::{FixturePostRepository, PostRepository, PostRepositoryError};
#[cfg(test)]
pub use posts_command::MockPostsCommand;
pub use posts_command::{CreatePostRequest, CreatePostResponse, FixturePostsCommand, PostsCommand};
#[cfg(test)]
pub use posts_query::{MockAuthorQuery, MockPostsQuery};
pub use posts_query::{AuthorQuery, FixtureAuthorQuery, FixturePostsQuery, PostsQuery};
#[cfg(test)]
pub use rate_limiter::MockRateLimiter;
pub use rate_limiter::{FixtureRateLimiter, RateLimiter, RateLimiterError};
#[cfg(test)]
pub use session_verifier::MockSessionVerifier;
pub use session_verifier::{FIXTURE_SESSION_TOKEN, FixtureSessionVerifier, SessionVerifier};
