//! Credentials presented when opening a board session.
//!
//! The identity provider issues a session id and a short-lived token. The
//! board never sees passwords; it only forwards these values for
//! verification.

use std::fmt;

use zeroize::Zeroizing;

/// Domain error returned when session credential values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCredentialsValidationError {
    /// Session id was missing or blank once trimmed.
    EmptySessionId,
    /// Token was blank.
    EmptyToken,
}

impl fmt::Display for SessionCredentialsValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySessionId => write!(f, "session id must not be empty"),
            Self::EmptyToken => write!(f, "session token must not be empty"),
        }
    }
}

impl std::error::Error for SessionCredentialsValidationError {}

/// Validated session credentials issued by the identity provider.
///
/// ## Invariants
/// - `session_id` is trimmed and non-empty.
/// - `token` is non-empty; it is wiped from memory on drop.
///
/// # Examples
/// ```
/// use yellboard::domain::SessionCredentials;
///
/// let creds = SessionCredentials::try_from_parts(" sess_1 ", "tok").expect("valid");
/// assert_eq!(creds.session_id(), "sess_1");
/// assert_eq!(creds.token(), "tok");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCredentials {
    session_id: String,
    token: Zeroizing<String>,
}

impl SessionCredentials {
    /// Construct credentials from raw inputs.
    pub fn try_from_parts(
        session_id: &str,
        token: &str,
    ) -> Result<Self, SessionCredentialsValidationError> {
        let session_id = session_id.trim();
        if session_id.is_empty() {
            return Err(SessionCredentialsValidationError::EmptySessionId);
        }
        if token.is_empty() {
            return Err(SessionCredentialsValidationError::EmptyToken);
        }
        Ok(Self {
            session_id: session_id.to_owned(),
            token: Zeroizing::new(token.to_owned()),
        })
    }

    /// Provider session identifier.
    pub fn session_id(&self) -> &str {
        self.session_id.as_str()
    }

    /// Provider-issued bearer token.
    pub fn token(&self) -> &str {
        self.token.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "tok", SessionCredentialsValidationError::EmptySessionId)]
    #[case("   ", "tok", SessionCredentialsValidationError::EmptySessionId)]
    #[case("sess_1", "", SessionCredentialsValidationError::EmptyToken)]
    fn rejects_blank_parts(
        #[case] session_id: &str,
        #[case] token: &str,
        #[case] expected: SessionCredentialsValidationError,
    ) {
        assert_eq!(
            SessionCredentials::try_from_parts(session_id, token),
            Err(expected)
        );
    }

    #[rstest]
    fn keeps_token_whitespace() {
        let creds = SessionCredentials::try_from_parts("sess_1", " tok ").expect("valid");
        assert_eq!(creds.token(), " tok ");
    }
}
