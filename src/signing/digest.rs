//! Content digests
//!
//! SHA-256 hex digests anchor the audit trail: one digest of the source bytes
//! before signing, one of the artifact bytes after. Auditors recompute these
//! over whatever is stored to confirm nothing changed since.

use sha2::{Digest, Sha256};

/// Compute the SHA-256 digest of `data` as lowercase hex
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

// ============================================================================
// Tests
// ============================================================================
