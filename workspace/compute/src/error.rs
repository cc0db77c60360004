use thiserror::Error;

/// Error types for the compute module
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComputeError {
    /// A required field is missing for the given status
    #[error("Validation error: {0}")]
    Validation(String),

    /// The update can no longer be changed
    #[error("Edit window expired: {0}")]
    EditWindowExpired(String),

    /// Error from date operations
    #[error("Date error: {0}")]
    Date(String),
}

/// Type alias for Result with ComputeError
pub type Result<T> = std::result::Result<T, ComputeError>;
