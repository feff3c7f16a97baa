//! Runtime error types

use propcast_core::PropertyError;
use thiserror::Error;

/// Errors surfaced by the runtime crate
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Registry or payload error from the core crate
    #[error("property error: {0}")]
    Property(#[from] PropertyError),

    /// The publication task panicked or was aborted
    #[error("property task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Result alias for runtime operations
pub type RuntimeResult<T> = Result<T, RuntimeError>;
