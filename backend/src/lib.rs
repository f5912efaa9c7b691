//! Yellboard: a public board of uppercase-only posts.
//!
//! The crate follows a ports-and-adapters layout: [`domain`] holds the rules
//! and port traits, [`inbound`] exposes them over HTTP, and [`outbound`]
//! provides PostgreSQL, Redis, and identity provider adapters.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
#[cfg(test)]
pub(crate) mod test_support;

pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
