//! Storage module for local filesystem byte stores
//!
//! Two instances back the service: the source-document directory (read-only
//! input) and the signed-artifact directory (write-once output).

mod local;
mod types;

pub use local::FileStore;
pub use types::*;
