//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors describe payloads the tree model refuses to adopt.
///
/// Absent ids are not errors: every locate/mutate operation treats them as a no-op.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("malformed hierarchy payload: {reason}")]
    MalformedShape { reason: String },

    #[error("failed to encode hierarchy: {reason}")]
    Encoding { reason: String },
}

impl DomainError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedShape {
            reason: reason.into(),
        }
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
