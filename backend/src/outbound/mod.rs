//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL post store using Diesel, plus an in-memory
//!   store
//! - **identity**: reqwest client for the external identity provider
//! - **rate_limit**: Redis sliding-log limiter, plus an in-memory limiter
//!
//! Adapters are thin translators between domain types and infrastructure
//! representations. They contain no business logic.

pub mod identity;
pub mod persistence;
pub mod rate_limit;
