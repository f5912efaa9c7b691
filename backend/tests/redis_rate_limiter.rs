//! `RedisRateLimiter` against a live Redis.
//!
//! Point `YELLBOARD_TEST_REDIS_URL` at a disposable server to run these; the
//! suite is skipped when it is unset. Each test uses a fresh author id so
//! runs do not share admission logs.

use std::sync::Arc;
use std::time::Duration;

use rstest::rstest;
use uuid::Uuid;

use yellboard::domain::ports::RateLimiter;
use yellboard::domain::{AuthorId, RateLimitPolicy};
use yellboard::outbound::rate_limit::RedisRateLimiter;

const REDIS_URL_ENV: &str = "YELLBOARD_TEST_REDIS_URL";

async fn limiter(policy: RateLimitPolicy) -> Option<RedisRateLimiter> {
    let Ok(url) = std::env::var(REDIS_URL_ENV) else {
        eprintln!("SKIP-REDIS: {REDIS_URL_ENV} is not set");
        return None;
    };
    Some(
        RedisRateLimiter::connect(&url, policy)
            .await
            .expect("connect to redis"),
    )
}

fn fresh_author() -> AuthorId {
    AuthorId::new(format!("user_{}", Uuid::new_v4())).expect("valid author id")
}

async fn admit_n(limiter: &RedisRateLimiter, id: &AuthorId, n: usize) -> Vec<bool> {
    let mut out = Vec::with_capacity(n);
    for _ in 0..n {
        let decision = limiter.try_admit(id).await.expect("admission check");
        out.push(decision.is_allowed());
    }
    out
}

#[rstest]
#[tokio::test]
async fn eleventh_call_in_window_is_denied() {
    let Some(limiter) = limiter(RateLimitPolicy::default()).await else {
        return;
    };
    let id = fresh_author();

    let decisions = admit_n(&limiter, &id, 11).await;
    assert_eq!(decisions.iter().filter(|allowed| **allowed).count(), 10);
    assert_eq!(decisions.last(), Some(&false));

    assert_eq!(admit_n(&limiter, &fresh_author(), 1).await, vec![true]);
}

#[rstest]
#[tokio::test]
async fn calls_are_readmitted_once_the_window_slides() {
    let policy = RateLimitPolicy::new(3, Duration::from_millis(500)).expect("valid policy");
    let Some(limiter) = limiter(policy).await else {
        return;
    };
    let id = fresh_author();

    assert_eq!(admit_n(&limiter, &id, 4).await, vec![true, true, true, false]);
    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(admit_n(&limiter, &id, 3).await, vec![true; 3]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_calls_never_exceed_capacity() {
    let Some(limiter) = limiter(RateLimitPolicy::default()).await else {
        return;
    };
    let limiter = Arc::new(limiter);
    let id = fresh_author();

    let handles: Vec<_> = (0..40)
        .map(|_| {
            let limiter = Arc::clone(&limiter);
            let id = id.clone();
            tokio::spawn(async move { limiter.try_admit(&id).await })
        })
        .collect();

    let mut allowed = 0;
    for handle in handles {
        let decision = handle.await.expect("task joins").expect("admission check");
        if decision.is_allowed() {
            allowed += 1;
        }
    }
    assert_eq!(allowed, 10);
}
