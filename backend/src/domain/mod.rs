//! Domain primitives, ports and services.
//!
//! Purpose: define strongly typed entities for the yell board and the
//! services that drive them. Keep types immutable and document invariants and
//! serialisation contracts (serde) in each type's Rustdoc.
//!
//! Public surface:
//! - Error (alias to `error::Error`) — API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`) — stable error identifier.
//! - Post, PostContent, FeedEntry — the yells and the feed built from them.
//! - AuthorId, PublicAuthor — identities owned by the external provider.

pub mod auth;
pub mod author;
pub mod error;
pub mod ports;
pub mod post;
pub mod post_creation_service;
pub mod post_query_service;
pub mod rate_limit;
pub mod trace_id;

pub use self::auth::{SessionCredentials, SessionCredentialsValidationError};
pub use self::author::{
    AUTHOR_ID_MAX, AuthorId, AuthorIdValidationError, AuthorProfile, ProjectedAuthor,
    PublicAuthor, project_authors,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::post::{
    FeedEntry, POST_CONTENT_MAX, POST_CONTENT_MIN, Post, PostContent, PostContentViolation,
    PostId,
};
pub use self::post_creation_service::PostCreationService;
pub use self::post_query_service::{
    AUTHOR_LOOKUP_LIMIT, AuthorQueryService, FEED_LIMIT, PostQueryService,
};
pub use self::rate_limit::{
    DEFAULT_RATE_LIMIT_CAPACITY, DEFAULT_RATE_LIMIT_WINDOW, RateLimitDecision, RateLimitPolicy,
    RateLimitPolicyError,
};
pub use self::trace_id::TraceId;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use yellboard::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::unauthorized("sign in to yell"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
