//! Store-specific error types

use thiserror::Error;

/// Errors surfaced by discovery and store collaborators
#[derive(Debug, Error)]
pub enum StoreError {
    /// Repository discovery failed in the underlying collaborator
    #[error("Discovery failed: {0}")]
    DiscoveryFailed(String),

    /// Represents an I/O error from a store implementation
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Invalid input provided to a store operation
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
