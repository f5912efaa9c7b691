//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;

use super::state::HttpState;
use crate::domain::ports::{
    AuthorQuery, FixtureAuthorQuery, FixturePostsCommand, FixturePostsQuery,
    FixtureSessionVerifier, PostsCommand, PostsQuery, SessionVerifier,
};

/// Build a session middleware with a fresh key and an insecure cookie for
/// plain-HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Pull the session cookie out of a response.
pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie set")
}

/// State builder defaulting every port to its fixture.
pub struct TestState {
    posts: Arc<dyn PostsQuery>,
    posts_command: Arc<dyn PostsCommand>,
    sessions: Arc<dyn SessionVerifier>,
    authors: Arc<dyn AuthorQuery>,
}

impl Default for TestState {
    fn default() -> Self {
        Self {
            posts: Arc::new(FixturePostsQuery),
            posts_command: Arc::new(FixturePostsCommand),
            sessions: Arc::new(FixtureSessionVerifier),
            authors: Arc::new(FixtureAuthorQuery),
        }
    }
}

impl TestState {
    pub fn posts(mut self, port: impl PostsQuery + 'static) -> Self {
        self.posts = Arc::new(port);
        self
    }

    pub fn posts_command(mut self, port: impl PostsCommand + 'static) -> Self {
        self.posts_command = Arc::new(port);
        self
    }

    pub fn authors(mut self, port: impl AuthorQuery + 'static) -> Self {
        self.authors = Arc::new(port);
        self
    }

    pub fn build(self) -> HttpState {
        HttpState {
            posts: self.posts,
            posts_command: self.posts_command,
            sessions: self.sessions,
            authors: self.authors,
        }
    }
}
