//! OpenAPI document served by Swagger UI in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode, FeedEntry, Post, PublicAuthor};
use crate::inbound::http::posts::{CreatePostBody, CreatedPostBody};
use crate::inbound::http::sessions::SessionBody;

/// Registers the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Encrypted session cookie issued by POST /api/v1/session.",
            ))),
        );
    }
}

/// OpenAPI document for the yell board API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Yellboard API",
        description = "Post uppercase-only messages and read the newest ones."
    ),
    servers((url = "/", description = "Relative to the deployment base URL")),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::posts::list_posts,
        crate::inbound::http::posts::create_post,
        crate::inbound::http::sessions::create_session,
        crate::inbound::http::sessions::current_session,
        crate::inbound::http::sessions::delete_session,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        FeedEntry,
        Post,
        PublicAuthor,
        CreatePostBody,
        CreatedPostBody,
        SessionBody,
        Error,
        ErrorCode
    )),
    tags(
        (name = "posts", description = "Read and write yells"),
        (name = "session", description = "Sign in with an identity provider session"),
        (name = "health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;
