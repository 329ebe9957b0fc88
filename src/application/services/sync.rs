//! Hierarchy sync service
//!
//! One load round trip: ask the backend to recompute relationships, then fetch
//! the hierarchy and normalize it into a [`Forest`].

use std::sync::Arc;

use tracing::{debug, warn};

use crate::application::{ApplicationResult, TransportResultExt};
use crate::domain::Forest;
use crate::infrastructure::traits::HierarchyService;

/// Service performing the sync-then-fetch pair.
pub struct HierarchySync {
    service: Arc<dyn HierarchyService>,
}

impl HierarchySync {
    pub fn new(service: Arc<dyn HierarchyService>) -> Self {
        Self { service }
    }

    /// Sync relationships, fetch, and parse.
    ///
    /// The fetch is never issued when the sync fails. A payload that is neither
    /// a node nor an array of nodes is rejected as a whole.
    pub fn fetch_snapshot(&self) -> ApplicationResult<Forest> {
        self.service
            .sync_relationships()
            .network_context("sync relationships")?;
        debug!("fetch_snapshot: relationships synchronized");

        let payload = self
            .service
            .fetch_hierarchy()
            .network_context("fetch hierarchy")?;
        let forest = Forest::from_json_value(payload)?;

        let duplicates = forest.duplicate_ids();
        if !duplicates.is_empty() {
            warn!(
                "fetch_snapshot: duplicate entity ids {:?}, first occurrence wins",
                duplicates
            );
        }
        debug!(
            "fetch_snapshot: {} roots, {} nodes",
            forest.roots().len(),
            forest.len()
        );
        Ok(forest)
    }
}
