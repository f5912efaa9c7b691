//! Process-local post store.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::Post;
use crate::domain::ports::{PostRepository, PostRepositoryError};

/// Append-only in-memory post store.
///
/// Posts sharing a timestamp list later inserts first.
#[derive(Debug, Default)]
pub struct InMemoryPostRepository {
    posts: Mutex<Vec<Post>>,
}

impl InMemoryPostRepository {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn insert(&self, post: &Post) -> Result<(), PostRepositoryError> {
        let mut posts = self
            .posts
            .lock()
            .map_err(|_| PostRepositoryError::query("post store poisoned"))?;
        if posts.iter().any(|existing| existing.id() == post.id()) {
            return Err(PostRepositoryError::query("post id already exists"));
        }
        posts.push(post.clone());
        Ok(())
    }

    async fn list_recent(&self, limit: usize) -> Result<Vec<Post>, PostRepositoryError> {
        let posts = self
            .posts
            .lock()
            .map_err(|_| PostRepositoryError::query("post store poisoned"))?;
        let mut recent: Vec<Post> = posts.iter().rev().cloned().collect();
        recent.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        recent.truncate(limit);
        Ok(recent)
    }
}
