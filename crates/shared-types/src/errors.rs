//! # Error Types
//!
//! Errors shared by subsystems that serialize core artifacts.

use thiserror::Error;

/// Canonical serialization failed.
#[derive(Debug, Error)]
pub enum SerializationError {
    /// The value could not be turned into JSON.
    #[error("Canonical serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}
