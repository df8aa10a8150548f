//! Database schema initialization

use sqlx::SqlitePool;

use crate::error::Result;

/// Initialize the database schema
pub async fn initialize_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(SCHEMA_SQL).execute(pool).await?;

    Ok(())
}

const SCHEMA_SQL: &str = r#"
-- Audit trail: one row per successful sign operation.
-- Append-only: no code path updates or deletes rows here.
CREATE TABLE IF NOT EXISTS audit_records (
    id TEXT PRIMARY KEY,
    document_id TEXT NOT NULL,
    hash_before TEXT NOT NULL,
    hash_after TEXT NOT NULL,
    artifact_key TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_audit_document_id ON audit_records(document_id);
CREATE INDEX IF NOT EXISTS idx_audit_created_at ON audit_records(created_at);
"#;
