//! Warm-start snapshot cache
//!
//! The last adopted hierarchy is kept as JSON in a key-value store so a view
//! can show something before the next sync completes. Advisory only.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::application::{ApplicationError, ApplicationResult, TransportResultExt};
use crate::domain::Forest;
use crate::infrastructure::traits::KeyValueStore;

/// Stored form: `{ "savedAt": ..., "tree": <node or array of nodes> }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedSnapshot {
    pub saved_at: DateTime<Utc>,
    pub tree: Forest,
}

pub struct SnapshotCache {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl SnapshotCache {
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn save(&self, forest: &Forest) -> ApplicationResult<()> {
        let snapshot = CachedSnapshot {
            saved_at: Utc::now(),
            tree: forest.clone(),
        };
        let json = serde_json::to_string(&snapshot).map_err(|e| ApplicationError::Cache {
            context: format!("encode snapshot for {}", self.key),
            source: Box::new(e),
        })?;
        self.store
            .set(&self.key, &json)
            .cache_context(&format!("store {}", self.key))?;
        debug!("save: {} nodes under {}", forest.len(), self.key);
        Ok(())
    }

    /// Cached snapshot, if any. Unreadable or corrupt entries count as a miss.
    pub fn load(&self) -> Option<CachedSnapshot> {
        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("load: cache read failed for {}: {}", self.key, e);
                return None;
            }
        };
        match serde_json::from_str::<CachedSnapshot>(&raw) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                warn!("load: ignoring corrupt cache entry {}: {}", self.key, e);
                None
            }
        }
    }

    pub fn clear(&self) -> ApplicationResult<()> {
        self.store
            .remove(&self.key)
            .cache_context(&format!("remove {}", self.key))
    }
}
