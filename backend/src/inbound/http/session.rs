//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! Wraps the Actix cookie session so handlers deal only with the signed-in
//! author id.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{AuthorId, Error};

pub(crate) const AUTHOR_ID_KEY: &str = "author_id";

/// Newtype exposing author-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Wrap the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Store the signed-in author's id, rotating the session cookie.
    pub fn persist_author(&self, author_id: &AuthorId) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(AUTHOR_ID_KEY, author_id.as_ref())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Current author id, if the cookie carries a valid one.
    pub fn author_id(&self) -> Result<Option<AuthorId>, Error> {
        let raw = self
            .0
            .get::<String>(AUTHOR_ID_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        Ok(raw.and_then(|raw| match AuthorId::new(raw) {
            Ok(id) => Some(id),
            Err(error) => {
                warn!(%error, "invalid author id in session cookie");
                None
            }
        }))
    }

    /// Require a signed-in author or fail with `401 Unauthorized`.
    pub fn require_author_id(&self) -> Result<AuthorId, Error> {
        self.author_id()?
            .ok_or_else(|| Error::unauthorized("sign in to yell"))
    }

    /// Drop all session state.
    pub fn clear(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
