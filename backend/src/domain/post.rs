//! Posts and the feed entries built from them.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{AuthorId, Error, PublicAuthor};

/// Maximum number of characters in a post.
pub const POST_CONTENT_MAX: usize = 280;
/// Minimum number of characters in a post.
pub const POST_CONTENT_MIN: usize = 1;

static YELL_RE: OnceLock<Regex> = OnceLock::new();

fn yell_regex() -> &'static Regex {
    YELL_RE.get_or_init(|| {
        // Length is enforced by separate rules; this only constrains characters.
        Regex::new(r"^[A-Z\s]+$")
            .unwrap_or_else(|error| panic!("yell regex failed to compile: {error}"))
    })
}

/// A content rule that rejected a post.
///
/// Rules are evaluated in declaration order and the first failure wins, so a
/// long message with lowercase letters reports [`Self::NotYelling`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PostContentViolation {
    /// Contains something other than `A-Z` and whitespace, or nothing at all.
    #[error("YOU HAVE TO YELL (NO LOWERCASE ALLOWED)")]
    NotYelling,
    /// Shorter than [`POST_CONTENT_MIN`].
    #[error("YOUR MESSAGE MUST NOT BE EMPTY")]
    TooShort,
    /// Longer than [`POST_CONTENT_MAX`].
    #[error("YOUR MESSAGE IS TOO LONG, TRY AGAIN!")]
    TooLong,
}

impl PostContentViolation {
    /// Stable machine-readable rule identifier.
    pub fn code(self) -> &'static str {
        match self {
            Self::NotYelling => "not_yelling",
            Self::TooShort => "too_short",
            Self::TooLong => "too_long",
        }
    }
}

impl From<PostContentViolation> for Error {
    fn from(violation: PostContentViolation) -> Self {
        Error::invalid_request(violation.to_string()).with_details(serde_json::json!({
            "field": "content",
            "code": violation.code(),
        }))
    }
}

type ContentRule = fn(&str) -> Option<PostContentViolation>;

const CONTENT_RULES: [ContentRule; 3] = [
    |raw| (!yell_regex().is_match(raw)).then_some(PostContentViolation::NotYelling),
    |raw| (raw.chars().count() < POST_CONTENT_MIN).then_some(PostContentViolation::TooShort),
    |raw| (raw.chars().count() > POST_CONTENT_MAX).then_some(PostContentViolation::TooLong),
];

/// Validated post body.
///
/// ## Invariants
/// - 1 to 280 characters.
/// - Only uppercase `A-Z` and whitespace.
///
/// # Examples
/// ```
/// use yellboard::domain::{PostContent, PostContentViolation};
///
/// assert!(PostContent::new("HELLO THERE").is_ok());
/// assert_eq!(
///     PostContent::new("hello").unwrap_err(),
///     PostContentViolation::NotYelling
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PostContent(String);

impl PostContent {
    /// Validate raw input against the content rules.
    pub fn new(raw: impl Into<String>) -> Result<Self, PostContentViolation> {
        let raw = raw.into();
        if let Some(violation) = CONTENT_RULES.iter().find_map(|rule| rule(&raw)) {
            return Err(violation);
        }
        Ok(Self(raw))
    }
}

impl AsRef<str> for PostContent {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for PostContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<PostContent> for String {
    fn from(value: PostContent) -> Self {
        value.0
    }
}

impl TryFrom<String> for PostContent {
    type Error = PostContentViolation;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Identifier assigned to a post when it is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(Uuid);

impl PostId {
    /// Generate a new random identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap a stored UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A stored yell. Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[schema(value_type = String, format = Uuid)]
    id: PostId,
    #[schema(value_type = String, example = "user_2NNEqL2nrIRdJ194ndJqAHwEfxC")]
    author_id: AuthorId,
    #[schema(value_type = String, example = "HELLO THERE")]
    content: PostContent,
    created_at: DateTime<Utc>,
}

impl Post {
    /// Assemble a post from validated parts.
    pub fn new(
        id: PostId,
        author_id: AuthorId,
        content: PostContent,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            author_id,
            content,
            created_at,
        }
    }

    /// Post identifier.
    pub fn id(&self) -> PostId {
        self.id
    }

    /// Author identifier.
    pub fn author_id(&self) -> &AuthorId {
        &self.author_id
    }

    /// Post body.
    pub fn content(&self) -> &PostContent {
        &self.content
    }

    /// Creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// A post paired with its author for one feed response.
///
/// ## Invariants
/// - `author.id() == post.author_id()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FeedEntry {
    post: Post,
    author: PublicAuthor,
}

impl FeedEntry {
    /// Pair a post with its author, or `None` when the ids differ.
    pub fn new(post: Post, author: PublicAuthor) -> Option<Self> {
        (author.id() == post.author_id()).then_some(Self { post, author })
    }

    /// The stored post.
    pub fn post(&self) -> &Post {
        &self.post
    }

    /// The post's author.
    pub fn author(&self) -> &PublicAuthor {
        &self.author
    }
}
