//! Signing pipeline error types

use thiserror::Error;

/// Errors raised anywhere in the signing pipeline
#[derive(Debug, Error)]
pub enum SignError {
    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    #[error("Page {page} not found (document has {pages})")]
    PageNotFound { page: u32, pages: u32 },

    #[error("Invalid placement: {0}")]
    InvalidPlacement(String),

    #[error("Placement outside the page: x={x:.2} y={y:.2} width={width:.2} height={height:.2}")]
    PlacementOutOfBounds {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },

    #[error("Signature payload decode failed: {0}")]
    SignatureDecode(String),

    #[error("Unsupported signature image format: {0}")]
    UnsupportedImageFormat(String),

    #[error("Signature payload too large: {size} bytes (max: {max})")]
    PayloadTooLarge { size: usize, max: usize },

    #[error("Failed to load document: {0}")]
    DocumentLoad(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Audit error: {0}")]
    Audit(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl SignError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            Self::DocumentNotFound(_) => StatusCode::NOT_FOUND,
            Self::PageNotFound { .. } => StatusCode::NOT_FOUND,
            Self::InvalidPlacement(_) => StatusCode::BAD_REQUEST,
            Self::PlacementOutOfBounds { .. } => StatusCode::BAD_REQUEST,
            Self::SignatureDecode(_) => StatusCode::BAD_REQUEST,
            Self::UnsupportedImageFormat(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::DocumentLoad(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Audit(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
