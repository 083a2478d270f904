//! Error types for the dacmatch library
//!
//! Wraps the automaton's errors and adds the failures that only the entry
//! point can produce.

use thiserror::Error;

/// Main error type for dacmatch operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DacmatchError {
    /// Error from building or searching the automaton
    #[error(transparent)]
    Automaton(#[from] dacmatch_ac::AcError),

    /// Numeric code or name that does not denote a match kind
    #[error(transparent)]
    InvalidMatchKind(#[from] dacmatch_match_kind::InvalidMatchKind),
}

/// Result type alias for dacmatch operations
pub type Result<T> = std::result::Result<T, DacmatchError>;

// Re-export component error types for users who need them
pub use dacmatch_ac::AcError;
pub use dacmatch_match_kind::InvalidMatchKind;
