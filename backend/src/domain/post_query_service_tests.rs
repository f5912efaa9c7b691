//! Tests for the feed and author query services.

use std::sync::Arc;

use rstest::rstest;

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::{MockIdentityProvider, MockPostRepository};
use crate::domain::AuthorProfile;
use crate::test_support::{author, post_by};

fn profile(id: &str, first_name: Option<&str>) -> AuthorProfile {
    AuthorProfile {
        id: author(id),
        first_name: first_name.map(str::to_owned),
        profile_image_url: format!("https://img.example/{id}.png"),
    }
}

fn make_service(
    repo: MockPostRepository,
    identity: MockIdentityProvider,
) -> PostQueryService<MockPostRepository, MockIdentityProvider> {
    PostQueryService::new(Arc::new(repo), Arc::new(identity))
}

fn repo_returning(posts: Vec<Post>) -> MockPostRepository {
    let mut repo = MockPostRepository::new();
    repo.expect_list_recent()
        .withf(|limit| *limit == FEED_LIMIT)
        .times(1)
        .return_once(move |_| Ok(posts));
    repo
}

#[rstest]
#[tokio::test]
async fn feed_pairs_posts_with_their_authors_in_store_order() {
    let posts = vec![
        post_by("user_a", "NEWEST", 1),
        post_by("user_b", "MIDDLE", 2),
        post_by("user_a", "OLDEST", 3),
    ];
    let expected_ids: Vec<_> = posts.iter().map(Post::id).collect();

    let mut identity = MockIdentityProvider::new();
    identity
        .expect_get_users()
        .withf(|ids, limit| {
            ids == [author("user_a"), author("user_b")] && *limit == AUTHOR_LOOKUP_LIMIT
        })
        .times(1)
        .return_once(|_, _| {
            Ok(vec![
                profile("user_b", Some("Bea")),
                profile("user_a", Some("Ada")),
            ])
        });

    let feed = make_service(repo_returning(posts), identity)
        .list_feed()
        .await
        .expect("feed resolves");

    let ids: Vec<_> = feed.iter().map(|entry| entry.post().id()).collect();
    assert_eq!(ids, expected_ids);
    for entry in &feed {
        assert_eq!(entry.author().id(), entry.post().author_id());
    }
    assert_eq!(feed[1].author().first_name(), "Bea");
}

#[rstest]
#[tokio::test]
async fn empty_store_skips_identity_lookup() {
    let mut identity = MockIdentityProvider::new();
    identity.expect_get_users().never();

    let feed = make_service(repo_returning(Vec::new()), identity)
        .list_feed()
        .await
        .expect("empty feed");
    assert!(feed.is_empty());
}

#[rstest]
#[case::missing_author(vec![profile("user_a", Some("Ada"))])]
#[case::absent_first_name(vec![profile("user_a", Some("Ada")), profile("user_b", None)])]
#[case::blank_first_name(vec![profile("user_a", Some("Ada")), profile("user_b", Some(""))])]
#[tokio::test]
async fn unresolved_author_fails_the_whole_feed(#[case] profiles: Vec<AuthorProfile>) {
    let posts = vec![post_by("user_a", "FINE", 1), post_by("user_b", "ORPHAN", 2)];
    let mut identity = MockIdentityProvider::new();
    identity
        .expect_get_users()
        .return_once(move |_, _| Ok(profiles));

    let error = make_service(repo_returning(posts), identity)
        .list_feed()
        .await
        .expect_err("feed must fail");

    assert_eq!(error.code(), ErrorCode::InternalError);
    assert_eq!(error.message(), "Author for post not found");
}

#[rstest]
#[tokio::test]
async fn whitespace_first_name_still_resolves() {
    let posts = vec![post_by("user_a", "QUIET NAME", 1)];
    let mut identity = MockIdentityProvider::new();
    identity
        .expect_get_users()
        .return_once(|_, _| Ok(vec![profile("user_a", Some("   "))]));

    let feed = make_service(repo_returning(posts), identity)
        .list_feed()
        .await
        .expect("whitespace name resolves");

    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0].author().first_name(), "   ");
}

#[rstest]
#[tokio::test]
async fn author_lookup_is_capped() {
    let posts: Vec<Post> = (0..FEED_LIMIT)
        .map(|n| post_by(&format!("user_{n}"), "HI", i64::try_from(n).expect("small")))
        .collect();
    let mut identity = MockIdentityProvider::new();
    identity
        .expect_get_users()
        .withf(|ids, limit| ids.len() <= AUTHOR_LOOKUP_LIMIT && *limit == AUTHOR_LOOKUP_LIMIT)
        .return_once(|ids, _| {
            Ok(ids
                .iter()
                .map(|id| profile(id.as_ref(), Some("Yeller")))
                .collect())
        });

    let feed = make_service(repo_returning(posts), identity)
        .list_feed()
        .await
        .expect("feed resolves");
    assert_eq!(feed.len(), FEED_LIMIT);
}

#[rstest]
#[case(PostRepositoryError::connection("down"), ErrorCode::ServiceUnavailable)]
#[case(PostRepositoryError::query("bad sql"), ErrorCode::InternalError)]
#[tokio::test]
async fn repository_errors_are_mapped(
    #[case] failure: PostRepositoryError,
    #[case] expected: ErrorCode,
) {
    let mut repo = MockPostRepository::new();
    repo.expect_list_recent()
        .return_once(move |_| Err(failure));
    let mut identity = MockIdentityProvider::new();
    identity.expect_get_users().never();

    let error = make_service(repo, identity)
        .list_feed()
        .await
        .expect_err("feed must fail");
    assert_eq!(error.code(), expected);
}

#[rstest]
#[case(IdentityProviderError::timeout("5s"), ErrorCode::ServiceUnavailable)]
#[case(IdentityProviderError::rate_limited("slow"), ErrorCode::ServiceUnavailable)]
#[case(IdentityProviderError::unauthorized("bad key"), ErrorCode::InternalError)]
#[case(IdentityProviderError::decode("not json"), ErrorCode::InternalError)]
#[tokio::test]
async fn identity_errors_are_mapped(
    #[case] failure: IdentityProviderError,
    #[case] expected: ErrorCode,
) {
    let mut identity = MockIdentityProvider::new();
    identity
        .expect_get_users()
        .return_once(move |_, _| Err(failure));

    let error = make_service(repo_returning(vec![post_by("user_a", "HI", 0)]), identity)
        .list_feed()
        .await
        .expect_err("feed must fail");
    assert_eq!(error.code(), expected);
}

#[rstest]
#[tokio::test]
async fn repeated_reads_return_the_same_feed() {
    let posts = vec![post_by("user_a", "ONE", 1), post_by("user_a", "TWO", 2)];
    let mut repo = MockPostRepository::new();
    repo.expect_list_recent()
        .times(2)
        .returning(move |_| Ok(posts.clone()));
    let mut identity = MockIdentityProvider::new();
    identity
        .expect_get_users()
        .times(2)
        .returning(|_, _| Ok(vec![profile("user_a", Some("Ada"))]));
    let service = make_service(repo, identity);

    let first = service.list_feed().await.expect("first read");
    let second = service.list_feed().await.expect("second read");
    assert_eq!(first, second);
}

#[rstest]
#[case(vec![profile("user_a", Some("Ada"))], None)]
#[case(vec![profile("user_a", None)], Some(ErrorCode::NotFound))]
#[case(Vec::new(), Some(ErrorCode::NotFound))]
#[tokio::test]
async fn author_query_requires_a_named_profile(
    #[case] profiles: Vec<AuthorProfile>,
    #[case] expected_error: Option<ErrorCode>,
) {
    let mut identity = MockIdentityProvider::new();
    identity
        .expect_get_users()
        .withf(|ids, limit| ids == [author("user_a")] && *limit == 1)
        .return_once(move |_, _| Ok(profiles));
    let service = AuthorQueryService::new(Arc::new(identity));

    let result = service.public_author(&author("user_a")).await;
    match (expected_error, result) {
        (None, Ok(found)) => assert_eq!(found.first_name(), "Ada"),
        (Some(code), Err(err)) => assert_eq!(err.code(), code),
        (expected, other) => panic!("expected {expected:?}, got {other:?}"),
    }
}
