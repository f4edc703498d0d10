//! SQL DDL for the local key-value table.

/// SQLite schema with:
/// - `key` TEXT PRIMARY KEY
/// - `value` TEXT, stored verbatim (callers serialize)
/// - `updated_at` TEXT, RFC3339 of the last write
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS kv_store (
    key TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
"#;
