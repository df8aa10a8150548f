//! Source document routes
//!
//! - GET /api/v1/documents - list the documents available for signing

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Create the documents router
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_documents))
}

/// Response for document list
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DocumentListResponse {
    documents: Vec<DocumentSummary>,
    total: usize,
}

/// Summary of a signable document
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DocumentSummary {
    id: String,
    size: u64,
    url: String,
}

/// GET /api/v1/documents
async fn list_documents(State(state): State<AppState>) -> Result<Json<DocumentListResponse>> {
    let objects = state
        .documents()
        .list()
        .await
        .map_err(|e| AppError::Internal(format!("Failed to list documents: {e}")))?;

    let documents: Vec<DocumentSummary> = objects
        .into_iter()
        .map(|object| DocumentSummary {
            url: format!("/files/documents/{}", object.key),
            id: object.key,
            size: object.size,
        })
        .collect();

    Ok(Json(DocumentListResponse {
        total: documents.len(),
        documents,
    }))
}
