//! Identity provider outbound adapters.
//!
//! A thin reqwest client implementing both the `IdentityProvider` port (bulk
//! profile lookup) and the `SessionVerifier` port (session token checks).

mod dto;
mod http_client;

pub use http_client::{IdentityHttpClient, IdentityHttpConfig};
