//! Driving port for writing posts.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::{AuthorId, Error, PostId};

/// Request to create a post on behalf of an authenticated author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePostRequest {
    /// Authenticated caller.
    pub author_id: AuthorId,
    /// Unvalidated body as received.
    pub content: String,
}

/// Response from creating a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostResponse {
    /// Identifier assigned to the new post.
    pub id: PostId,
}

/// Driving port for post creation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostsCommand: Send + Sync {
    /// Validate, admit and persist a post.
    ///
    /// Exactly one write happens on success and none on any failure.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// # use yellboard::domain::AuthorId;
    /// # use yellboard::domain::ports::{CreatePostRequest, FixturePostsCommand, PostsCommand};
    /// # async fn example() -> Result<(), yellboard::domain::Error> {
    /// let request = CreatePostRequest {
    ///     author_id: AuthorId::new("user_1").expect("valid id"),
    ///     content: "HELLO THERE".to_owned(),
    /// };
    /// let response = FixturePostsCommand.create_post(request).await?;
    /// println!("created {}", response.id);
    /// # Ok(())
    /// # }
    /// ```
    async fn create_post(&self, request: CreatePostRequest) -> Result<CreatePostResponse, Error>;
}

/// Fixture command that validates content and discards the post.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePostsCommand;

#[async_trait]
impl PostsCommand for FixturePostsCommand {
    async fn create_post(&self, request: CreatePostRequest) -> Result<CreatePostResponse, Error> {
        crate::domain::PostContent::new(request.content).map_err(Error::from)?;
        Ok(CreatePostResponse {
            id: PostId::random(),
        })
    }
}
