//! The signing pipeline
//!
//! Everything between "a client picked a spot on the page" and "a signed
//! artifact plus its audit record exist": placement geometry, document
//! mutation, content digests, and the orchestrating service.

mod digest;
mod error;
mod geometry;
mod service;
mod signer;
mod types;

pub use digest::*;
pub use error::*;
pub use geometry::*;
pub use service::*;
pub use signer::*;
pub use types::*;
