//! Sign route
//!
//! HTTP endpoint for the signing pipeline:
//! - POST /api/v1/sign - place a signature image on a stored document

use axum::{
    extract::State,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde::Serialize;

use crate::signing::{SignError, SignRequest, SignResponse};
use crate::state::AppState;

// ============================================================================
// Error Response
// ============================================================================

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    code: String,
}

impl IntoResponse for SignError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        let code = match &self {
            SignError::DocumentNotFound(_) => "DOCUMENT_NOT_FOUND",
            SignError::PageNotFound { .. } => "PAGE_NOT_FOUND",
            SignError::InvalidPlacement(_) => "INVALID_PLACEMENT",
            SignError::PlacementOutOfBounds { .. } => "PLACEMENT_OUT_OF_BOUNDS",
            SignError::SignatureDecode(_) => "SIGNATURE_DECODE_FAILED",
            SignError::UnsupportedImageFormat(_) => "UNSUPPORTED_IMAGE_FORMAT",
            SignError::PayloadTooLarge { .. } => "PAYLOAD_TOO_LARGE",
            SignError::DocumentLoad(_) => "DOCUMENT_LOAD_FAILED",
            SignError::Storage(_) => "STORAGE_ERROR",
            SignError::Audit(_) => "AUDIT_ERROR",
            SignError::Internal(_) => "INTERNAL_ERROR",
        };

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
        });

        (status, body).into_response()
    }
}

// ============================================================================
// Router
// ============================================================================

/// Create the sign router
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(sign_document))
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/v1/sign
///
/// Runs the whole pipeline: resolve the document, hash it, embed the
/// signature, persist the artifact, hash it again, record the audit entry.
async fn sign_document(
    State(state): State<AppState>,
    Json(request): Json<SignRequest>,
) -> Result<Json<SignResponse>, SignError> {
    let document_id = request.document_id.clone();
    let outcome = state.signing().sign_document(request).await?;

    tracing::debug!(
        document_id = %document_id,
        url = %outcome.url,
        "Sign request complete"
    );

    Ok(Json(SignResponse {
        success: true,
        url: outcome.url,
        hash_before: outcome.hash_before,
        hash_after: outcome.hash_after,
        audit_id: outcome.audit_id,
    }))
}
