//! Port for post persistence.
//!
//! Posts are append-only: adapters insert and list, never update or delete.

use async_trait::async_trait;

use crate::domain::Post;

use super::define_port_error;

define_port_error! {
    /// Errors raised by post repository adapters.
    pub enum PostRepositoryError {
        /// Repository connection could not be established.
        Connection => "post repository connection failed",
        /// Query or insert failed during execution.
        Query => "post repository query failed",
    }
}

/// Port for writing and listing posts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Persist a new post.
    async fn insert(&self, post: &Post) -> Result<(), PostRepositoryError>;

    /// Return up to `limit` posts, newest `created_at` first.
    ///
    /// Posts sharing a timestamp come back in a stable adapter-defined order.
    async fn list_recent(&self, limit: usize) -> Result<Vec<Post>, PostRepositoryError>;
}

/// Fixture implementation for tests that do not exercise post storage.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePostRepository;

#[async_trait]
impl PostRepository for FixturePostRepository {
    async fn insert(&self, _post: &Post) -> Result<(), PostRepositoryError> {
        Ok(())
    }

    async fn list_recent(&self, _limit: usize) -> Result<Vec<Post>, PostRepositoryError> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn fixture_lists_nothing() {
        let repo = FixturePostRepository;
        let posts = repo.list_recent(100).await.expect("fixture list succeeds");
        assert!(posts.is_empty());
    }

    #[rstest]
    fn constructors_format_messages() {
        let err = PostRepositoryError::connection("pool exhausted");
        assert_eq!(
            err.to_string(),
            "post repository connection failed: pool exhausted"
        );
    }
}
