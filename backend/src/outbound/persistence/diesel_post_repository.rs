//! PostgreSQL-backed `PostRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{PostRepository, PostRepositoryError};
use crate::domain::{AuthorId, Post, PostContent, PostId};

use super::models::{NewPostRow, PostRow};
use super::pool::{DbPool, PoolError};
use super::schema::posts;

/// Diesel-backed implementation of the post repository port.
#[derive(Clone)]
pub struct DieselPostRepository {
    pool: DbPool,
}

impl DieselPostRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> PostRepositoryError {
    PostRepositoryError::connection(error.message())
}

fn map_diesel_error(error: DieselError) -> PostRepositoryError {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            PostRepositoryError::connection("database connection error")
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            PostRepositoryError::query("post id already exists")
        }
        _ => PostRepositoryError::query("database error"),
    }
}

/// Rebuild a post through the validating constructors.
fn row_to_post(row: PostRow) -> Result<Post, PostRepositoryError> {
    let PostRow {
        id,
        author_id,
        content,
        created_at,
    } = row;

    let author_id = AuthorId::new(author_id)
        .map_err(|err| PostRepositoryError::query(format!("stored author id: {err}")))?;
    let content = PostContent::new(content)
        .map_err(|err| PostRepositoryError::query(format!("stored content: {err}")))?;
    Ok(Post::new(
        PostId::from_uuid(id),
        author_id,
        content,
        created_at,
    ))
}

#[async_trait]
impl PostRepository for DieselPostRepository {
    async fn insert(&self, post: &Post) -> Result<(), PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewPostRow {
            id: *post.id().as_uuid(),
            author_id: post.author_id().as_ref(),
            content: post.content().as_ref(),
            created_at: post.created_at(),
        };

        diesel::insert_into(posts::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn list_recent(&self, limit: usize) -> Result<Vec<Post>, PostRepositoryError> {
        let limit = i64::try_from(limit)
            .map_err(|_| PostRepositoryError::query("list limit out of range"))?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<PostRow> = posts::table
            .select(PostRow::as_select())
            .order((posts::created_at.desc(), posts::id.desc()))
            .limit(limit)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_post).collect()
    }
}
