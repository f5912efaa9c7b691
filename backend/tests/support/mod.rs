//! Shared helpers for backend integration tests.
//!
//! Each file under `tests/` builds as its own crate, so suites pull these in
//! with `mod support;` and use only what they need.
#![allow(dead_code, reason = "each suite uses a different subset")]

pub mod embedded_postgres;

/// Returns true when `name` holds a truthy value ("1", "true", "yes").
pub fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Skip or fail a suite whose backing service could not be reached.
///
/// With `SKIP_TEST_CLUSTER` set this prints a skip marker and returns `None`;
/// otherwise it panics so CI breakage is not hidden.
pub fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    if env_flag("SKIP_TEST_CLUSTER") {
        eprintln!("SKIP-TEST-CLUSTER: {reason}");
        None
    } else {
        panic!("Test cluster setup failed: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.");
    }
}
