//! Feed and author read services.
//!
//! The feed joins the newest posts with their authors' public profiles. The
//! join is all-or-nothing: one unresolved author fails the whole read.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, warn};

use crate::domain::ports::{
    AuthorQuery, IdentityProvider, IdentityProviderError, PostRepository, PostRepositoryError,
    PostsQuery,
};
use crate::domain::{
    AuthorId, Error, FeedEntry, Post, ProjectedAuthor, PublicAuthor, project_authors,
};

/// Maximum posts returned by one feed read.
pub const FEED_LIMIT: usize = 100;
/// Maximum profiles requested from the identity provider per feed read.
pub const AUTHOR_LOOKUP_LIMIT: usize = 100;

const AUTHOR_NOT_FOUND: &str = "Author for post not found";

pub(crate) fn map_post_repository_error(error: PostRepositoryError) -> Error {
    match error {
        PostRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("post repository unavailable: {message}"))
        }
        PostRepositoryError::Query { message } => {
            Error::internal(format!("post repository error: {message}"))
        }
    }
}

fn map_identity_error(error: IdentityProviderError) -> Error {
    warn!(%error, "identity provider lookup failed");
    match error {
        IdentityProviderError::RateLimited { .. }
        | IdentityProviderError::Timeout { .. }
        | IdentityProviderError::Transport { .. } => {
            Error::service_unavailable(format!("identity provider unavailable: {error}"))
        }
        IdentityProviderError::Unauthorized { .. } | IdentityProviderError::Decode { .. } => {
            Error::internal(format!("identity provider error: {error}"))
        }
    }
}

/// Distinct author ids in first-seen order, capped at [`AUTHOR_LOOKUP_LIMIT`].
fn distinct_author_ids(posts: &[Post]) -> Vec<AuthorId> {
    let mut seen = HashSet::new();
    posts
        .iter()
        .map(Post::author_id)
        .filter(|id| seen.insert(*id))
        .take(AUTHOR_LOOKUP_LIMIT)
        .cloned()
        .collect()
}

/// Feed service implementing the [`PostsQuery`] driving port.
#[derive(Clone)]
pub struct PostQueryService<R: ?Sized, I: ?Sized> {
    post_repo: Arc<R>,
    identity: Arc<I>,
}

impl<R: ?Sized, I: ?Sized> PostQueryService<R, I> {
    /// Create a new query service over a post store and identity provider.
    pub fn new(post_repo: Arc<R>, identity: Arc<I>) -> Self {
        Self {
            post_repo,
            identity,
        }
    }
}

#[async_trait]
impl<R, I> PostsQuery for PostQueryService<R, I>
where
    R: PostRepository + ?Sized,
    I: IdentityProvider + ?Sized,
{
    async fn list_feed(&self) -> Result<Vec<FeedEntry>, Error> {
        let posts = self
            .post_repo
            .list_recent(FEED_LIMIT)
            .await
            .map_err(map_post_repository_error)?;
        if posts.is_empty() {
            return Ok(Vec::new());
        }

        let ids = distinct_author_ids(&posts);
        let profiles = self
            .identity
            .get_users(&ids, AUTHOR_LOOKUP_LIMIT)
            .await
            .map_err(map_identity_error)?;
        let authors: HashMap<AuthorId, ProjectedAuthor> = project_authors(profiles)
            .into_iter()
            .map(|author| (author.id.clone(), author))
            .collect();

        let entries = posts
            .into_iter()
            .map(|post| {
                let author = authors
                    .get(post.author_id())
                    .cloned()
                    .and_then(ProjectedAuthor::into_public);
                let Some(author) = author else {
                    error!(
                        post_id = %post.id(),
                        author_id = %post.author_id(),
                        "feed author could not be resolved"
                    );
                    return Err(Error::internal(AUTHOR_NOT_FOUND));
                };
                FeedEntry::new(post, author).ok_or_else(|| Error::internal(AUTHOR_NOT_FOUND))
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(entries = entries.len(), "feed assembled");
        Ok(entries)
    }
}

/// Single-author lookup implementing the [`AuthorQuery`] driving port.
#[derive(Clone)]
pub struct AuthorQueryService<I: ?Sized> {
    identity: Arc<I>,
}

impl<I: ?Sized> AuthorQueryService<I> {
    /// Create a new author lookup over an identity provider.
    pub fn new(identity: Arc<I>) -> Self {
        Self { identity }
    }
}

#[async_trait]
impl<I> AuthorQuery for AuthorQueryService<I>
where
    I: IdentityProvider + ?Sized,
{
    async fn public_author(&self, author_id: &AuthorId) -> Result<PublicAuthor, Error> {
        let profiles = self
            .identity
            .get_users(std::slice::from_ref(author_id), 1)
            .await
            .map_err(map_identity_error)?;
        project_authors(profiles)
            .into_iter()
            .find(|author| &author.id == author_id)
            .and_then(ProjectedAuthor::into_public)
            .ok_or_else(|| Error::not_found(format!("author {author_id} not found")))
    }
}

#[cfg(test)]
#[path = "post_query_service_tests.rs"]
mod tests;
