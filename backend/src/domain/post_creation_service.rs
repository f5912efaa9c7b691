//! Post creation service.
//!
//! A request moves through validation, admission and a single write. Each
//! stage can reject it; nothing is written unless every stage passes.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::SubsecRound;
use mockable::Clock;
use tracing::{debug, info, warn};

use crate::domain::ports::{
    CreatePostRequest, CreatePostResponse, PostRepository, PostsCommand, RateLimiter,
    RateLimiterError,
};
use crate::domain::post_query_service::map_post_repository_error;
use crate::domain::{Error, Post, PostContent, PostId, RateLimitDecision};

const TOO_MANY_POSTS: &str = "too many posts, try again in a minute";

fn map_rate_limiter_error(error: RateLimiterError) -> Error {
    warn!(%error, "rate limiter failed");
    Error::service_unavailable(format!("rate limiter unavailable: {error}"))
}

/// Post service implementing the [`PostsCommand`] driving port.
#[derive(Clone)]
pub struct PostCreationService<R: ?Sized, L: ?Sized> {
    post_repo: Arc<R>,
    limiter: Arc<L>,
    clock: Arc<dyn Clock>,
}

impl<R: ?Sized, L: ?Sized> PostCreationService<R, L> {
    /// Create a new command service.
    ///
    /// ```rust,no_run
    /// # use std::sync::Arc;
    /// # use mockable::DefaultClock;
    /// # use yellboard::domain::PostCreationService;
    /// # use yellboard::domain::ports::{FixturePostRepository, FixtureRateLimiter};
    /// let service = PostCreationService::new(
    ///     Arc::new(FixturePostRepository),
    ///     Arc::new(FixtureRateLimiter),
    ///     Arc::new(DefaultClock),
    /// );
    /// # let _ = service;
    /// ```
    pub fn new(post_repo: Arc<R>, limiter: Arc<L>, clock: Arc<dyn Clock>) -> Self {
        Self {
            post_repo,
            limiter,
            clock,
        }
    }
}

#[async_trait]
impl<R, L> PostsCommand for PostCreationService<R, L>
where
    R: PostRepository + ?Sized,
    L: RateLimiter + ?Sized,
{
    async fn create_post(&self, request: CreatePostRequest) -> Result<CreatePostResponse, Error> {
        let CreatePostRequest { author_id, content } = request;

        let content = PostContent::new(content).map_err(|violation| {
            debug!(author_id = %author_id, rule = violation.code(), "post rejected");
            Error::from(violation)
        })?;

        let decision = self
            .limiter
            .try_admit(&author_id)
            .await
            .map_err(map_rate_limiter_error)?;
        if decision == RateLimitDecision::Denied {
            info!(author_id = %author_id, "post rate limited");
            return Err(Error::too_many_requests(TOO_MANY_POSTS));
        }

        // Postgres keeps microseconds.
        let created_at = self.clock.utc().trunc_subsecs(6);
        let post = Post::new(PostId::random(), author_id, content, created_at);
        self.post_repo
            .insert(&post)
            .await
            .map_err(map_post_repository_error)?;

        debug!(post_id = %post.id(), author_id = %post.author_id(), "post created");
        Ok(CreatePostResponse { id: post.id() })
    }
}

#[cfg(test)]
#[path = "post_creation_service_tests.rs"]
mod tests;
