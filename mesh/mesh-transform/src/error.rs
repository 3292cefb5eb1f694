//! Error types for transform operations.

use thiserror::Error;

/// Result type for transform operations.
pub type TransformResult<T> = Result<T, TransformError>;

/// Errors that can occur during transform composition.
#[derive(Debug, Error)]
pub enum TransformError {
    /// Parent/child chain has no entries.
    #[error("transform chain is empty")]
    EmptyChain,
}
