//! Common result and error types for internal failures.

/// The standard result type for fallible internal computations.
///
/// `Err` indicates a bug in the mapper (for example a fixed-point iteration
/// that failed to converge), not a user-facing mapping failure. Mapping
/// failures are reported through [`MappingError`](crate::MappingError).
pub type MfpgaResult<T> = Result<T, InternalError>;

/// An internal error indicating a logic error in the mapper, not a problem
/// with the design or platform description.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("internal mapping error: {message}")]
pub struct InternalError {
    /// Description of the internal error.
    pub message: String,
}

impl InternalError {
    /// Creates a new internal error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for InternalError {
    fn from(message: String) -> Self {
        Self { message }
    }
}
