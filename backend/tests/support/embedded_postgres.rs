//! Embedded PostgreSQL for adapter tests.
//!
//! One cluster is shared per test binary. Every test gets its own temporary
//! database with the crate's Diesel migrations applied.

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use pg_embedded_setup_unpriv::test_support::shared_cluster_handle;
use pg_embedded_setup_unpriv::{ClusterHandle, TemporaryDatabase};
use uuid::Uuid;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Shared cluster for this test binary.
pub fn shared_cluster() -> Result<&'static ClusterHandle, String> {
    shared_cluster_handle().map_err(|err| format!("bootstrap cluster: {err:?}"))
}

/// Create a fresh database and bring its schema up to date.
pub fn provision_database(cluster: &ClusterHandle) -> Result<TemporaryDatabase, String> {
    let name = format!("test_{}", Uuid::new_v4().simple());
    let database = cluster
        .temporary_database(name.as_str())
        .map_err(|err| format!("create database: {err:?}"))?;
    migrate_schema(&database.url().to_string())?;
    Ok(database)
}

/// Run all pending migrations against `url`.
pub fn migrate_schema(url: &str) -> Result<(), String> {
    let mut conn = PgConnection::establish(url).map_err(|err| format!("connect: {err}"))?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|err| format!("migration: {err:?}"))?;
    Ok(())
}
