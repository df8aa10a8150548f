//! Audit record database operations
//!
//! The audit trail is append-only: this repository exposes `create`, `get`
//! and `list` and nothing else. A record links a source document to the
//! artifact produced from it via the before/after content digests.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::{AppError, Result};

/// Audit record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AuditRecord {
    pub id: String,
    pub document_id: String,
    pub hash_before: String,
    pub hash_after: String,
    pub artifact_key: String,
    pub created_at: String,
}

/// Fields of a record about to be written
#[derive(Debug, Clone)]
pub struct NewAuditRecord {
    pub document_id: String,
    pub hash_before: String,
    pub hash_after: String,
    pub artifact_key: String,
}

/// Audit record repository
pub struct AuditRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> AuditRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a specific audit record
    pub async fn get(&self, id: &str) -> Result<Option<AuditRecord>> {
        let record = sqlx::query_as::<_, AuditRecord>(
            r#"
            SELECT id, document_id, hash_before, hash_after, artifact_key, created_at
            FROM audit_records
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(record)
    }

    /// List audit records, newest first, optionally scoped to one document
    pub async fn list(&self, document_id: Option<&str>, limit: i64) -> Result<Vec<AuditRecord>> {
        let records = match document_id {
            Some(document_id) => {
                sqlx::query_as::<_, AuditRecord>(
                    r#"
                    SELECT id, document_id, hash_before, hash_after, artifact_key, created_at
                    FROM audit_records
                    WHERE document_id = ?
                    ORDER BY created_at DESC, id
                    LIMIT ?
                    "#,
                )
                .bind(document_id)
                .bind(limit)
                .fetch_all(self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, AuditRecord>(
                    r#"
                    SELECT id, document_id, hash_before, hash_after, artifact_key, created_at
                    FROM audit_records
                    ORDER BY created_at DESC, id
                    LIMIT ?
                    "#,
                )
                .bind(limit)
                .fetch_all(self.pool)
                .await?
            }
        };

        Ok(records)
    }

    /// Append a new audit record
    pub async fn create(&self, data: &NewAuditRecord) -> Result<AuditRecord> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO audit_records (id, document_id, hash_before, hash_after, artifact_key, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&data.document_id)
        .bind(&data.hash_before)
        .bind(&data.hash_after)
        .bind(&data.artifact_key)
        .bind(&now)
        .execute(self.pool)
        .await?;

        self.get(&id)
            .await?
            .ok_or_else(|| AppError::Internal("Failed to fetch created audit record".to_string()))
    }

    /// Count records for a document
    pub async fn count_for_document(&self, document_id: &str) -> Result<i64> {
        let result: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM audit_records
            WHERE document_id = ?
            "#,
        )
        .bind(document_id)
        .fetch_one(self.pool)
        .await?;

        Ok(result.0)
    }
}

// ============================================================================
// Tests
// ============================================================================
