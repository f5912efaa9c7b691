//! Session API handlers.
//!
//! ```text
//! POST   /api/v1/session {"sessionId":"sess_..","token":".."}
//! GET    /api/v1/session
//! DELETE /api/v1/session
//! ```

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use utoipa::ToSchema;

use crate::domain::{
    Error, PublicAuthor, SessionCredentials, SessionCredentialsValidationError,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Request body for `POST /api/v1/session`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionBody {
    /// Session id issued by the identity provider.
    pub session_id: String,
    /// Short-lived session token issued by the identity provider.
    pub token: String,
}

impl TryFrom<SessionBody> for SessionCredentials {
    type Error = SessionCredentialsValidationError;

    fn try_from(value: SessionBody) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.session_id, &value.token)
    }
}

fn map_credentials_error(err: SessionCredentialsValidationError) -> Error {
    let (field, code) = match err {
        SessionCredentialsValidationError::EmptySessionId => ("sessionId", "empty_session_id"),
        SessionCredentialsValidationError::EmptyToken => ("token", "empty_token"),
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field, "code": code }))
}

/// Exchange identity provider credentials for a board session cookie.
#[utoipa::path(
    post,
    path = "/api/v1/session",
    request_body = SessionBody,
    responses(
        (status = 204, description = "Signed in", headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Credentials rejected", body = Error),
        (status = 503, description = "Identity provider unavailable", body = Error)
    ),
    tags = ["session"],
    operation_id = "createSession",
    security([])
)]
#[post("/session")]
pub async fn create_session(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SessionBody>,
) -> ApiResult<HttpResponse> {
    let credentials =
        SessionCredentials::try_from(payload.into_inner()).map_err(map_credentials_error)?;
    let author_id = state.sessions.verify(&credentials).await?;
    session.persist_author(&author_id)?;
    info!(author_id = %author_id, "session opened");
    Ok(HttpResponse::NoContent().finish())
}

/// Return the signed-in author's public profile.
#[utoipa::path(
    get,
    path = "/api/v1/session",
    responses(
        (status = 200, description = "Signed-in author", body = PublicAuthor),
        (status = 401, description = "Not signed in", body = Error),
        (status = 404, description = "Author has no public profile", body = Error),
        (status = 503, description = "Identity provider unavailable", body = Error)
    ),
    tags = ["session"],
    operation_id = "currentSession"
)]
#[get("/session")]
pub async fn current_session(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<PublicAuthor>> {
    let author_id = session.require_author_id()?;
    let author = state.authors.public_author(&author_id).await?;
    Ok(web::Json(author))
}

/// Sign out.
#[utoipa::path(
    delete,
    path = "/api/v1/session",
    responses((status = 204, description = "Signed out")),
    tags = ["session"],
    operation_id = "deleteSession",
    security([])
)]
#[delete("/session")]
pub async fn delete_session(session: SessionContext) -> HttpResponse {
    session.clear();
    HttpResponse::NoContent().finish()
}
