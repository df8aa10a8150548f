//! Audit trail routes
//!
//! Read-only access to the audit trail:
//! - GET /api/v1/audit - list records, optionally scoped to one document
//! - GET /api/v1/audit/:id - fetch a single record
//!
//! There are intentionally no mutating endpoints here; the trail is
//! append-only and only the signing pipeline appends to it.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::db::{AuditRecord, AuditRepository};
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Maximum records returned by one list call
const MAX_LIST_LIMIT: i64 = 500;

/// Default list page size
const DEFAULT_LIST_LIMIT: i64 = 100;

/// Create the audit router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_records))
        .route("/:id", get(get_record))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuditListQuery {
    document_id: Option<String>,
    limit: Option<i64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AuditListResponse {
    records: Vec<AuditRecord>,
    total: usize,
}

/// GET /api/v1/audit
async fn list_records(
    State(state): State<AppState>,
    Query(query): Query<AuditListQuery>,
) -> Result<Json<AuditListResponse>> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_LIST_LIMIT)
        .clamp(1, MAX_LIST_LIMIT);

    let repo = AuditRepository::new(state.db());
    let records = repo.list(query.document_id.as_deref(), limit).await?;

    Ok(Json(AuditListResponse {
        total: records.len(),
        records,
    }))
}

/// GET /api/v1/audit/:id
async fn get_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AuditRecord>> {
    let repo = AuditRepository::new(state.db());
    let record = repo
        .get(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("audit record {id}")))?;

    Ok(Json(record))
}
