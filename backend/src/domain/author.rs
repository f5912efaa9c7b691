//! Author identity as seen by the yell board.
//!
//! Authors are owned by the external identity provider. This module holds the
//! opaque identifier, the provider's profile record, and the projection that
//! reduces a profile to the public fields a feed entry displays.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Longest author identifier the store accepts.
pub const AUTHOR_ID_MAX: usize = 191;

/// Validation errors returned by [`AuthorId::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthorIdValidationError {
    /// Identifier was empty.
    #[error("author id must not be empty")]
    Empty,
    /// Identifier carried leading or trailing whitespace.
    #[error("author id must not contain surrounding whitespace")]
    SurroundingWhitespace,
    /// Identifier exceeded [`AUTHOR_ID_MAX`] bytes.
    #[error("author id must be at most {max} bytes")]
    TooLong {
        /// Maximum accepted length.
        max: usize,
    },
}

/// Opaque identifier issued by the identity provider.
///
/// # Examples
/// ```
/// use yellboard::domain::AuthorId;
///
/// let id = AuthorId::new("user_2NNEqL2nrIRdJ194ndJqAHwEfxC").expect("valid id");
/// assert_eq!(id.as_ref(), "user_2NNEqL2nrIRdJ194ndJqAHwEfxC");
/// assert!(AuthorId::new(" padded ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AuthorId(String);

impl AuthorId {
    /// Validate and construct an [`AuthorId`].
    pub fn new(id: impl Into<String>) -> Result<Self, AuthorIdValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(AuthorIdValidationError::Empty);
        }
        if id.trim() != id {
            return Err(AuthorIdValidationError::SurroundingWhitespace);
        }
        if id.len() > AUTHOR_ID_MAX {
            return Err(AuthorIdValidationError::TooLong { max: AUTHOR_ID_MAX });
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for AuthorId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for AuthorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<AuthorId> for String {
    fn from(value: AuthorId) -> Self {
        value.0
    }
}

impl TryFrom<String> for AuthorId {
    type Error = AuthorIdValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Profile record as returned by the identity provider.
///
/// Read-only to this system; only the fields the board needs are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorProfile {
    /// Provider-issued identifier.
    pub id: AuthorId,
    /// Given name; providers may leave it unset.
    pub first_name: Option<String>,
    /// Avatar location.
    pub profile_image_url: String,
}

/// Public view of a profile before the feed checks for a display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectedAuthor {
    /// Provider-issued identifier.
    pub id: AuthorId,
    /// Given name copied verbatim from the profile.
    pub first_name: Option<String>,
    /// Avatar location.
    pub profile_image_url: String,
}

impl From<AuthorProfile> for ProjectedAuthor {
    fn from(profile: AuthorProfile) -> Self {
        let AuthorProfile {
            id,
            first_name,
            profile_image_url,
        } = profile;
        Self {
            id,
            first_name,
            profile_image_url,
        }
    }
}

impl ProjectedAuthor {
    /// Narrow to a [`PublicAuthor`], or `None` when the first name is absent
    /// or empty. Whitespace-only names are displayed as given.
    pub fn into_public(self) -> Option<PublicAuthor> {
        let first_name = self.first_name.filter(|name| !name.is_empty())?;
        Some(PublicAuthor {
            id: self.id,
            first_name,
            profile_image_url: self.profile_image_url,
        })
    }
}

/// Reduce provider profiles to the public fields a post view needs.
///
/// Pure and infallible: blank or missing first names pass through untouched.
///
/// # Examples
/// ```
/// use yellboard::domain::{project_authors, AuthorId, AuthorProfile};
///
/// let profiles = vec![AuthorProfile {
///     id: AuthorId::new("user_1").expect("id"),
///     first_name: None,
///     profile_image_url: "https://img.example/1.png".into(),
/// }];
/// let projected = project_authors(profiles);
/// assert_eq!(projected[0].first_name, None);
/// ```
pub fn project_authors(profiles: impl IntoIterator<Item = AuthorProfile>) -> Vec<ProjectedAuthor> {
    profiles.into_iter().map(ProjectedAuthor::from).collect()
}

/// Author attached to a feed entry.
///
/// ## Invariants
/// - `first_name` is non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicAuthor {
    #[schema(value_type = String, example = "user_2NNEqL2nrIRdJ194ndJqAHwEfxC")]
    id: AuthorId,
    #[schema(example = "Ada")]
    first_name: String,
    #[schema(example = "https://img.clerk.com/avatar.png")]
    profile_image_url: String,
}

impl PublicAuthor {
    /// Provider-issued identifier.
    pub fn id(&self) -> &AuthorId {
        &self.id
    }

    /// Display name.
    pub fn first_name(&self) -> &str {
        self.first_name.as_str()
    }

    /// Avatar location.
    pub fn profile_image_url(&self) -> &str {
        self.profile_image_url.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn profile(first_name: Option<&str>) -> AuthorProfile {
        AuthorProfile {
            id: AuthorId::new("user_1").expect("valid id"),
            first_name: first_name.map(str::to_owned),
            profile_image_url: "https://img.example/user_1.png".to_owned(),
        }
    }

    #[rstest]
    #[case("", AuthorIdValidationError::Empty)]
    #[case(" user_1", AuthorIdValidationError::SurroundingWhitespace)]
    #[case("user_1\n", AuthorIdValidationError::SurroundingWhitespace)]
    fn author_id_rejects_malformed_input(
        #[case] raw: &str,
        #[case] expected: AuthorIdValidationError,
    ) {
        assert_eq!(AuthorId::new(raw), Err(expected));
    }

    #[rstest]
    fn author_id_rejects_oversized_input() {
        let raw = "u".repeat(AUTHOR_ID_MAX + 1);
        assert_eq!(
            AuthorId::new(raw),
            Err(AuthorIdValidationError::TooLong { max: AUTHOR_ID_MAX })
        );
    }

    #[rstest]
    #[case(Some("Ada"))]
    #[case(Some(""))]
    #[case(None)]
    fn projection_copies_fields_verbatim(#[case] first_name: Option<&str>) {
        let source = profile(first_name);
        let projected = project_authors(vec![source.clone()]);

        assert_eq!(projected.len(), 1);
        let author = &projected[0];
        assert_eq!(author.id, source.id);
        assert_eq!(author.first_name.as_deref(), first_name);
        assert_eq!(author.profile_image_url, source.profile_image_url);
    }

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    fn into_public_requires_a_first_name(#[case] first_name: Option<&str>) {
        let projected = ProjectedAuthor::from(profile(first_name));
        assert!(projected.into_public().is_none());
    }

    #[rstest]
    #[case("   ")]
    #[case("\t")]
    fn into_public_keeps_whitespace_names(#[case] first_name: &str) {
        let author = ProjectedAuthor::from(profile(Some(first_name)))
            .into_public()
            .expect("whitespace name is still a name");
        assert_eq!(author.first_name(), first_name);
    }

    #[rstest]
    fn into_public_serialises_camel_case() {
        let author = ProjectedAuthor::from(profile(Some("Ada")))
            .into_public()
            .expect("named author");
        let value = serde_json::to_value(&author).expect("serialise author");
        assert_eq!(
            value,
            serde_json::json!({
                "id": "user_1",
                "firstName": "Ada",
                "profileImageUrl": "https://img.example/user_1.png",
            })
        );
    }
}
