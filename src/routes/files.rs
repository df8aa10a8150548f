//! File serving routes
//!
//! Serves source documents and signed artifacts from their stores:
//! - GET /files/documents/:id
//! - GET /files/signed/:key

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::Response,
    routing::get,
    Router,
};

use crate::error::{AppError, Result};
use crate::state::AppState;
use crate::storage::{FileStore, StorageError};

/// Create the files router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/documents/:id", get(serve_document))
        .route("/signed/:key", get(serve_artifact))
}

/// GET /files/documents/:id
async fn serve_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response> {
    serve(state.documents(), &id).await
}

/// GET /files/signed/:key
async fn serve_artifact(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Response> {
    serve(state.artifacts(), &key).await
}

/// Serve an object from a store
async fn serve(store: &FileStore, key: &str) -> Result<Response> {
    let bytes = store.read(key).await.map_err(|e| match e {
        StorageError::NotFound(key) => AppError::NotFound(key),
        StorageError::InvalidKey(key) => AppError::BadRequest(format!("invalid key: {key}")),
        other => AppError::Internal(other.to_string()),
    })?;

    let content_type = guess_content_type(key);
    let filename = key.rsplit('/').next().unwrap_or(key);
    let size = bytes.len();

    Ok(Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, size)
        .header(
            header::CONTENT_DISPOSITION,
            format!("inline; filename=\"{}\"", filename),
        )
        .header(header::CACHE_CONTROL, "public, max-age=86400")
        .body(Body::from(bytes))
        .map_err(|e| AppError::Internal(e.to_string()))?)
}

/// Guess content type from file extension
fn guess_content_type(path: &str) -> String {
    let ext = path.rsplit('.').next().unwrap_or("");
    match ext.to_lowercase().as_str() {
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        _ => "application/octet-stream",
    }
    .to_string()
}
