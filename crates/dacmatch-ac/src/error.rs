//! Error types for automaton construction and search

use thiserror::Error;

/// Result type alias for automaton operations
pub type Result<T> = std::result::Result<T, AcError>;

/// Error type for automaton operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AcError {
    /// Malformed pattern set, raised while building
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Search mode not supported by the automaton's match kind
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// Resource limit exceeded (e.g., too many states)
    #[error("Resource limit exceeded: {0}")]
    ResourceLimitExceeded(String),
}
