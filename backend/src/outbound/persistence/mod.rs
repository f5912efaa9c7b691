//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! - [`DbPool`] / [`PoolConfig`]: async connection pool over `diesel-async`.
//! - [`DieselPostRepository`]: the post store.
//! - [`InMemoryPostRepository`]: process-local store for runs without a
//!   database.
//!
//! Row structs in `models` stay private to this module.

mod diesel_post_repository;
mod memory_post_repository;
mod models;
mod pool;
mod schema;

pub use diesel_post_repository::DieselPostRepository;
pub use memory_post_repository::InMemoryPostRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
