//! Signing request/response types

use serde::{Deserialize, Serialize};

use super::geometry::PlacementBox;

// ============================================================================
// Constants
// ============================================================================

/// Maximum decoded signature payload size: 8MB
pub const MAX_SIGNATURE_BYTES: usize = 8 * 1024 * 1024;

// ============================================================================
// Request / Response Types
// ============================================================================

/// Request to sign a document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignRequest {
    /// Key of the source document in the document store
    pub document_id: String,

    /// Signature image as a `data:<mime>;base64,<data>` payload
    pub signature: String,

    /// Normalized placement box in screen coordinates
    pub coords: PlacementBox,

    /// Target page, 1-based
    #[serde(default = "default_page")]
    pub page: u32,
}

fn default_page() -> u32 {
    1
}

/// Response after a successful sign
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignResponse {
    pub success: bool,

    /// URL the signed artifact can be retrieved from
    pub url: String,

    /// Digest of the source document at signing time
    pub hash_before: String,

    /// Digest of the stored artifact
    pub hash_after: String,

    /// Id of the audit record written for this sign
    pub audit_id: String,
}

// ============================================================================
// Pipeline Output
// ============================================================================

/// What one successful run of the pipeline produced
#[derive(Debug, Clone)]
pub struct SignOutcome {
    pub artifact_key: String,
    pub url: String,
    pub hash_before: String,
    pub hash_after: String,
    pub audit_id: String,
}
