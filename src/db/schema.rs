//! SQL DDL for initializing the database schema.

/// One row per record. `created_at` holds the canonical RFC 3339 text form,
/// so ordering by the column is ordering by time.
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS expenses (
    id TEXT PRIMARY KEY NOT NULL,
    title TEXT NOT NULL,
    amount REAL NOT NULL,
    category TEXT NOT NULL,
    created_at TEXT NOT NULL -- RFC3339, microsecond precision
);
"#;
