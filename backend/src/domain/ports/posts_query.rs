//! Driving ports for reading the feed and author profiles.

use async_trait::async_trait;

use crate::domain::{AuthorId, Error, FeedEntry, PublicAuthor};

/// Domain use-case port for the public feed.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostsQuery: Send + Sync {
    /// Return up to 100 feed entries, most recent first.
    ///
    /// Fails as a whole when any post's author cannot be resolved.
    async fn list_feed(&self) -> Result<Vec<FeedEntry>, Error>;
}

/// Domain use-case port for looking up a single author.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthorQuery: Send + Sync {
    /// Return the public profile for `author_id`.
    async fn public_author(&self, author_id: &AuthorId) -> Result<PublicAuthor, Error>;
}

/// Fixture feed that is always empty.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePostsQuery;

#[async_trait]
impl PostsQuery for FixturePostsQuery {
    async fn list_feed(&self) -> Result<Vec<FeedEntry>, Error> {
        Ok(Vec::new())
    }
}

/// Fixture author lookup that knows nobody.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAuthorQuery;

#[async_trait]
impl AuthorQuery for FixtureAuthorQuery {
    async fn public_author(&self, author_id: &AuthorId) -> Result<PublicAuthor, Error> {
        Err(Error::not_found(format!("author {author_id} not found")))
    }
}
