//! Signing service
//!
//! Orchestrates one sign operation end to end. The pipeline is strictly
//! ordered; any failure aborts the whole operation and no audit record is
//! written for a sign that did not fully succeed.

use std::sync::Arc;

use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::db::{AuditRepository, NewAuditRecord};
use crate::storage::{FileStore, StorageError};

use super::digest::sha256_hex;
use super::error::SignError;
use super::signer::{decode_signature_payload, PdfSigner, SignatureImage};
use super::types::{SignOutcome, SignRequest, MAX_SIGNATURE_BYTES};

/// Service driving the signing pipeline
#[derive(Clone)]
pub struct SigningService {
    inner: Arc<SigningServiceInner>,
}

struct SigningServiceInner {
    /// Source documents, read-only inputs
    documents: FileStore,

    /// Signed artifacts, written once under fresh keys
    artifacts: FileStore,

    /// Audit trail database
    db: SqlitePool,
}

impl SigningService {
    /// Create a new signing service
    pub fn new(documents: FileStore, artifacts: FileStore, db: SqlitePool) -> Self {
        Self {
            inner: Arc::new(SigningServiceInner {
                documents,
                artifacts,
                db,
            }),
        }
    }

    /// Run the full signing pipeline for one request
    pub async fn sign_document(&self, request: SignRequest) -> Result<SignOutcome, SignError> {
        // Validate the placement before touching any document.
        request.coords.validate()?;

        let source = self
            .inner
            .documents
            .read(&request.document_id)
            .await
            .map_err(|e| match e {
                StorageError::NotFound(key) => SignError::DocumentNotFound(key),
                StorageError::InvalidKey(key) => SignError::DocumentNotFound(key),
                other => SignError::Storage(other.to_string()),
            })?;

        let hash_before = sha256_hex(&source);

        let image_bytes = decode_signature_payload(&request.signature, MAX_SIGNATURE_BYTES)?;

        // Raster decode and document mutation are CPU-bound; keep them off
        // the async runtime.
        let coords = request.coords;
        let page = request.page;
        let signed = tokio::task::spawn_blocking(move || {
            let image = SignatureImage::decode(&image_bytes)?;

            let mut signer = PdfSigner::load(&source)?;
            let page_size = signer.page_size(page)?;

            let rect = coords.to_pdf_space(page_size);
            if !rect.fits_within(page_size) {
                return Err(SignError::PlacementOutOfBounds {
                    x: rect.x,
                    y: rect.y,
                    width: rect.width,
                    height: rect.height,
                });
            }

            signer.embed_signature(page, &image, &rect)?;
            signer.to_bytes()
        })
        .await
        .map_err(|e| SignError::Internal(format!("signing task failed: {e}")))??;

        let artifact_key = new_artifact_key();
        self.inner
            .artifacts
            .write(&artifact_key, &signed)
            .await
            .map_err(|e| SignError::Storage(e.to_string()))?;

        // Hash what is actually retrievable, not the in-memory buffer.
        let stored = self
            .inner
            .artifacts
            .read(&artifact_key)
            .await
            .map_err(|e| SignError::Storage(e.to_string()))?;
        let hash_after = sha256_hex(&stored);

        let repo = AuditRepository::new(&self.inner.db);
        let record = NewAuditRecord {
            document_id: request.document_id.clone(),
            hash_before: hash_before.clone(),
            hash_after: hash_after.clone(),
            artifact_key: artifact_key.clone(),
        };

        let created = match repo.create(&record).await {
            Ok(created) => created,
            Err(e) => {
                // No audit trail, no artifact: roll the file back so nothing
                // unaccounted-for survives the failure.
                tracing::error!(
                    document_id = %request.document_id,
                    artifact_key = %artifact_key,
                    error = %e,
                    "Audit write failed, rolling back artifact"
                );
                if let Err(cleanup) = self.inner.artifacts.remove(&artifact_key).await {
                    tracing::warn!(
                        artifact_key = %artifact_key,
                        error = %cleanup,
                        "Failed to remove artifact after audit failure"
                    );
                }
                return Err(SignError::Audit(e.to_string()));
            }
        };

        tracing::info!(
            document_id = %request.document_id,
            page = page,
            artifact_key = %artifact_key,
            audit_id = %created.id,
            hash_before = %hash_before,
            hash_after = %hash_after,
            "Document signed"
        );

        Ok(SignOutcome {
            url: format!("/files/signed/{artifact_key}"),
            artifact_key,
            hash_before,
            hash_after,
            audit_id: created.id,
        })
    }
}

/// Fresh artifact key: timestamp for humans, UUID for uniqueness
fn new_artifact_key() -> String {
    format!(
        "signed-{}-{}.pdf",
        Utc::now().format("%Y%m%dT%H%M%S%3fZ"),
        Uuid::new_v4()
    )
}

// ============================================================================
// Tests
// ============================================================================
