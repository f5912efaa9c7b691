//! Diesel table definitions for the PostgreSQL schema.
//!
//! Must match `backend/migrations/` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Yells, append-only.
    posts (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Identity provider user id of the author.
        author_id -> Varchar,
        /// Validated body, at most 280 characters.
        content -> Varchar,
        /// Creation timestamp; the feed orders on this column.
        created_at -> Timestamptz,
    }
}
