//! Cookie session settings read from `SESSION_*` environment variables.
//!
//! Debug builds fall back to warned defaults so the board starts with no
//! configuration. Release builds refuse to start on any missing or invalid
//! toggle.

use std::path::PathBuf;

use actix_web::cookie::{Key, SameSite};
use mockable::Env;
use sha2::{Digest, Sha256};
use tracing::warn;
use zeroize::Zeroizing;

const KEY_FILE_ENV: &str = "SESSION_KEY_FILE";
const COOKIE_SECURE_ENV: &str = "SESSION_COOKIE_SECURE";
const SAMESITE_ENV: &str = "SESSION_SAMESITE";
const ALLOW_EPHEMERAL_ENV: &str = "SESSION_ALLOW_EPHEMERAL";

const DEFAULT_KEY_PATH: &str = "/var/run/secrets/session_key";
/// Shortest key file accepted in release builds.
pub const SESSION_KEY_MIN_LEN: usize = 64;
const FINGERPRINT_BYTES: usize = 8;

const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";

/// How strictly settings are validated.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Missing or invalid toggles warn and fall back.
    Debug,
    /// Missing or invalid toggles are fatal.
    Release,
}

impl BuildMode {
    /// Pick the mode matching `cfg!(debug_assertions)`.
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }
}

/// Validated cookie session settings.
pub struct SessionSettings {
    /// Cookie signing and encryption key.
    pub key: Key,
    /// Mark the cookie `Secure`.
    pub cookie_secure: bool,
    /// `SameSite` policy.
    pub same_site: SameSite,
}

impl SessionSettings {
    /// Short fingerprint of the active key, safe to log.
    pub fn key_fingerprint(&self) -> String {
        key_fingerprint(&self.key)
    }
}

/// Reasons session settings were rejected.
#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    /// Required variable absent.
    #[error("missing required environment variable: {name}")]
    MissingEnv { name: &'static str },
    /// Variable present with an unusable value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    /// Key file unreadable and no fallback allowed.
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Key file shorter than [`SESSION_KEY_MIN_LEN`].
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    /// `SameSite=None` on a cookie that is not `Secure`.
    #[error("SESSION_SAMESITE=None requires SESSION_COOKIE_SECURE=1")]
    InsecureSameSiteNone,
    /// Ephemeral keys requested in a release build.
    #[error("SESSION_ALLOW_EPHEMERAL must be 0 in release builds")]
    EphemeralNotAllowed,
}

/// Read and validate session settings.
///
/// # Examples
/// ```
/// use mockable::MockEnv;
/// use yellboard::inbound::http::session_config::{BuildMode, session_settings_from_env};
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|name| match name {
///     "SESSION_KEY_FILE" => Some("/nonexistent/session_key".to_owned()),
///     _ => None,
/// });
///
/// let settings = session_settings_from_env(&env, BuildMode::Debug).expect("debug defaults");
/// assert!(settings.cookie_secure);
/// ```
pub fn session_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let reader = Reader { env, mode };
    let cookie_secure = reader.toggle(COOKIE_SECURE_ENV, parse_bool, BOOL_EXPECTED, true)?;
    let same_site = reader.toggle(
        SAMESITE_ENV,
        parse_same_site,
        SAMESITE_EXPECTED,
        SameSite::Lax,
    )?;
    if same_site == SameSite::None && !cookie_secure {
        match mode {
            BuildMode::Release => return Err(SessionConfigError::InsecureSameSiteNone),
            BuildMode::Debug => warn!(
                "SESSION_SAMESITE=None without a secure cookie; browsers may drop the session"
            ),
        }
    }
    let allow_ephemeral = reader.toggle(ALLOW_EPHEMERAL_ENV, parse_bool, BOOL_EXPECTED, false)?;
    if allow_ephemeral && mode == BuildMode::Release {
        return Err(SessionConfigError::EphemeralNotAllowed);
    }
    let key = reader.key(allow_ephemeral)?;

    Ok(SessionSettings {
        key,
        cookie_secure,
        same_site,
    })
}

struct Reader<'a, E> {
    env: &'a E,
    mode: BuildMode,
}

impl<E: Env> Reader<'_, E> {
    fn toggle<T>(
        &self,
        name: &'static str,
        parse: fn(&str) -> Option<T>,
        expected: &'static str,
        fallback: T,
    ) -> Result<T, SessionConfigError> {
        let Some(value) = self.env.string(name) else {
            return match self.mode {
                BuildMode::Release => Err(SessionConfigError::MissingEnv { name }),
                BuildMode::Debug => {
                    warn!(variable = name, "session toggle not set; using default");
                    Ok(fallback)
                }
            };
        };
        match (parse(&value), self.mode) {
            (Some(parsed), _) => Ok(parsed),
            (None, BuildMode::Release) => Err(SessionConfigError::InvalidEnv {
                name,
                value,
                expected,
            }),
            (None, BuildMode::Debug) => {
                warn!(variable = name, value = %value, "invalid session toggle; using default");
                Ok(fallback)
            }
        }
    }

    fn key(&self, allow_ephemeral: bool) -> Result<Key, SessionConfigError> {
        let path = PathBuf::from(
            self.env
                .string(KEY_FILE_ENV)
                .unwrap_or_else(|| DEFAULT_KEY_PATH.to_owned()),
        );
        match std::fs::read(&path) {
            Ok(bytes) => {
                let bytes = Zeroizing::new(bytes);
                if self.mode == BuildMode::Release && bytes.len() < SESSION_KEY_MIN_LEN {
                    return Err(SessionConfigError::KeyTooShort {
                        path,
                        length: bytes.len(),
                        min_len: SESSION_KEY_MIN_LEN,
                    });
                }
                Ok(Key::derive_from(&bytes))
            }
            Err(error) if self.mode == BuildMode::Debug || allow_ephemeral => {
                warn!(path = %path.display(), %error, "using temporary session key (dev only)");
                Ok(Key::generate())
            }
            Err(source) => Err(SessionConfigError::KeyRead { path, source }),
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

fn parse_same_site(value: &str) -> Option<SameSite> {
    match value.to_ascii_lowercase().as_str() {
        "lax" => Some(SameSite::Lax),
        "strict" => Some(SameSite::Strict),
        "none" => Some(SameSite::None),
        _ => None,
    }
}

/// First eight bytes of the SHA-256 of the signing key, hex encoded.
///
/// Identifies which key is live without exposing it.
#[must_use]
pub fn key_fingerprint(key: &Key) -> String {
    let digest = Sha256::digest(key.signing());
    hex::encode(digest.get(..FINGERPRINT_BYTES).unwrap_or_default())
}
