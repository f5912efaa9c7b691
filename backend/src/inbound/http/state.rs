//! Shared HTTP adapter state.
//!
//! Handlers take this via `actix_web::web::Data` so they depend only on
//! driving ports and stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{AuthorQuery, PostsCommand, PostsQuery, SessionVerifier};

/// Dependency bundle for HTTP handlers.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use yellboard::domain::ports::{
///     FixtureAuthorQuery, FixturePostsCommand, FixturePostsQuery, FixtureSessionVerifier,
/// };
/// use yellboard::inbound::http::state::HttpState;
///
/// let state = HttpState {
///     posts: Arc::new(FixturePostsQuery),
///     posts_command: Arc::new(FixturePostsCommand),
///     sessions: Arc::new(FixtureSessionVerifier),
///     authors: Arc::new(FixtureAuthorQuery),
/// };
/// let _feed = state.posts.clone();
/// ```
#[derive(Clone)]
pub struct HttpState {
    /// Feed reads.
    pub posts: Arc<dyn PostsQuery>,
    /// Post creation.
    pub posts_command: Arc<dyn PostsCommand>,
    /// Session credential checks.
    pub sessions: Arc<dyn SessionVerifier>,
    /// Single-author lookups.
    pub authors: Arc<dyn AuthorQuery>,
}
