//! Posts API handlers.
//!
//! ```text
//! GET  /api/v1/posts
//! POST /api/v1/posts {"content":"HELLO THERE"}
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::ports::CreatePostRequest;
use crate::domain::{Error, FeedEntry};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Request body for `POST /api/v1/posts`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostBody {
    /// Uppercase letters and whitespace, 1 to 280 characters.
    #[schema(example = "HELLO THERE")]
    pub content: String,
}

/// Response body for a created post.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatedPostBody {
    /// Identifier of the new post.
    pub id: Uuid,
}

/// List the most recent posts with their authors.
#[utoipa::path(
    get,
    path = "/api/v1/posts",
    responses(
        (status = 200, description = "Up to 100 posts, newest first", body = [FeedEntry]),
        (status = 500, description = "Internal server error", body = Error),
        (status = 503, description = "Backing service unavailable", body = Error)
    ),
    tags = ["posts"],
    operation_id = "listPosts",
    security([])
)]
#[get("/posts")]
pub async fn list_posts(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<FeedEntry>>> {
    let feed = state.posts.list_feed().await?;
    Ok(web::Json(feed))
}

/// Create a post as the signed-in author.
///
/// Authentication is checked before the body is looked at.
#[utoipa::path(
    post,
    path = "/api/v1/posts",
    request_body = CreatePostBody,
    responses(
        (status = 201, description = "Post created", body = CreatedPostBody),
        (status = 400, description = "Content rejected", body = Error),
        (status = 401, description = "Not signed in", body = Error),
        (status = 429, description = "Too many posts in the last minute", body = Error),
        (status = 500, description = "Internal server error", body = Error),
        (status = 503, description = "Backing service unavailable", body = Error)
    ),
    tags = ["posts"],
    operation_id = "createPost"
)]
#[post("/posts")]
pub async fn create_post(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: Result<web::Json<CreatePostBody>, actix_web::Error>,
) -> ApiResult<HttpResponse> {
    let author_id = session.require_author_id()?;
    let body = payload.map_err(|err| {
        Error::invalid_request(format!("invalid JSON body: {err}"))
            .with_details(json!({ "field": "body", "code": "invalid_json" }))
    })?;

    let response = state
        .posts_command
        .create_post(CreatePostRequest {
            author_id,
            content: body.into_inner().content,
        })
        .await?;

    Ok(HttpResponse::Created().json(CreatedPostBody {
        id: *response.id.as_uuid(),
    }))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test, web};
    use rstest::rstest;
    use serde_json::Value;

    use super::*;
    use crate::domain::ports::{
        CreatePostResponse, FIXTURE_SESSION_TOKEN, MockPostsCommand, MockPostsQuery,
    };
    use crate::domain::{AuthorId, PostId};
    use crate::inbound::http::sessions::{SessionBody, create_session};
    use crate::inbound::http::state::HttpState;
    use crate::inbound::http::test_utils::{TestState, session_cookie, test_session_middleware};

    fn test_app(
        state: HttpState,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new().app_data(web::Data::new(state)).service(
            web::scope("/api/v1")
                .wrap(test_session_middleware())
                .service(create_session)
                .service(list_posts)
                .service(create_post),
        )
    }

    async fn sign_in<S>(app: &S) -> actix_web::cookie::Cookie<'static>
    where
        S: actix_web::dev::Service<
                actix_http::Request,
                Response = actix_web::dev::ServiceResponse,
                Error = actix_web::Error,
            >,
    {
        let response = actix_test::call_service(
            app,
            actix_test::TestRequest::post()
                .uri("/api/v1/session")
                .set_json(SessionBody {
                    session_id: "user_1".to_owned(),
                    token: FIXTURE_SESSION_TOKEN.to_owned(),
                })
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        session_cookie(&response)
    }

    #[rstest]
    #[actix_web::test]
    async fn list_posts_returns_feed_json() {
        let mut query = MockPostsQuery::new();
        query.expect_list_feed().times(1).returning(|| Ok(Vec::new()));
        let app = actix_test::init_service(test_app(TestState::default().posts(query).build())).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/api/v1/posts").to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body, Value::Array(Vec::new()));
    }

    #[rstest]
    #[actix_web::test]
    async fn feed_failures_are_redacted() {
        let mut query = MockPostsQuery::new();
        query
            .expect_list_feed()
            .returning(|| Err(Error::internal("Author for post not found")));
        let app = actix_test::init_service(test_app(TestState::default().posts(query).build())).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/api/v1/posts").to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["message"], "Internal server error");
    }

    #[rstest]
    #[case::valid_body(r#"{"content":"HELLO"}"#)]
    #[case::invalid_content(r#"{"content":"hello"}"#)]
    #[case::malformed_json("{")]
    #[actix_web::test]
    async fn create_requires_a_session_before_anything_else(#[case] body: &'static str) {
        let mut command = MockPostsCommand::new();
        command.expect_create_post().never();
        let app =
            actix_test::init_service(test_app(TestState::default().posts_command(command).build()))
                .await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/posts")
                .insert_header(("content-type", "application/json"))
                .set_payload(body)
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[rstest]
    #[actix_web::test]
    async fn create_passes_the_session_author_and_returns_created() {
        let post_id = PostId::random();
        let mut command = MockPostsCommand::new();
        command
            .expect_create_post()
            .withf(|request| {
                request.author_id == AuthorId::new("user_1").expect("id")
                    && request.content == "HELLO THERE"
            })
            .times(1)
            .returning(move |_| Ok(CreatePostResponse { id: post_id }));
        let app =
            actix_test::init_service(test_app(TestState::default().posts_command(command).build()))
                .await;
        let cookie = sign_in(&app).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/posts")
                .cookie(cookie)
                .set_json(CreatePostBody {
                    content: "HELLO THERE".to_owned(),
                })
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::CREATED);
        let body: CreatedPostBody = actix_test::read_body_json(response).await;
        assert_eq!(&body.id, post_id.as_uuid());
    }

    #[rstest]
    #[case(Error::invalid_request("YOU HAVE TO YELL (NO LOWERCASE ALLOWED)"), StatusCode::BAD_REQUEST)]
    #[case(Error::too_many_requests("slow down"), StatusCode::TOO_MANY_REQUESTS)]
    #[case(Error::service_unavailable("redis down"), StatusCode::SERVICE_UNAVAILABLE)]
    #[actix_web::test]
    async fn create_maps_command_errors(#[case] error: Error, #[case] expected: StatusCode) {
        let mut command = MockPostsCommand::new();
        command
            .expect_create_post()
            .return_once(move |_| Err(error));
        let app =
            actix_test::init_service(test_app(TestState::default().posts_command(command).build()))
                .await;
        let cookie = sign_in(&app).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/posts")
                .cookie(cookie)
                .set_json(CreatePostBody {
                    content: "whatever".to_owned(),
                })
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), expected);
    }

    #[rstest]
    #[actix_web::test]
    async fn malformed_body_from_a_signed_in_author_is_bad_request() {
        let mut command = MockPostsCommand::new();
        command.expect_create_post().never();
        let app =
            actix_test::init_service(test_app(TestState::default().posts_command(command).build()))
                .await;
        let cookie = sign_in(&app).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/posts")
                .cookie(cookie)
                .insert_header(("content-type", "application/json"))
                .set_payload("{\"content\":")
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["details"]["code"], "invalid_json");
    }
}
