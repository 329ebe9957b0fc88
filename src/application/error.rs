//! Application-level errors (wraps domain errors)

use thiserror::Error;

use crate::domain::DomainError;

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("network failure during {operation}")]
    NetworkFailure {
        operation: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("snapshot cache failure: {context}")]
    Cache {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("config error: {message}")]
    Config { message: String },
}

impl ApplicationError {
    /// True for payloads the service sent but the model refused to adopt.
    pub fn is_malformed_shape(&self) -> bool {
        matches!(self, Self::Domain(DomainError::MalformedShape { .. }))
    }

    pub fn is_network_failure(&self) -> bool {
        matches!(self, Self::NetworkFailure { .. })
    }
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
