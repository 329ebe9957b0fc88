//! Error conversion helpers for transport operations
//!
//! Provides extension traits for attaching the failed operation to transport errors.

use crate::application::{ApplicationError, ApplicationResult};
use crate::infrastructure::TransportResult;

/// Extension trait for converting `TransportResult` to `ApplicationResult` with context.
pub trait TransportResultExt<T> {
    /// Report a failed round trip as a network failure.
    ///
    /// # Example
    /// ```ignore
    /// service.sync_relationships()
    ///     .network_context("sync relationships")?;
    /// ```
    fn network_context(self, operation: &str) -> ApplicationResult<T>;

    /// Report a failed store access as a cache failure.
    fn cache_context(self, context: &str) -> ApplicationResult<T>;
}

impl<T> TransportResultExt<T> for TransportResult<T> {
    fn network_context(self, operation: &str) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::NetworkFailure {
            operation: operation.to_string(),
            source: Box::new(e),
        })
    }

    fn cache_context(self, context: &str) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::Cache {
            context: context.to_string(),
            source: Box::new(e),
        })
    }
}
