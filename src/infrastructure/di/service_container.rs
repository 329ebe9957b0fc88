//! Service container for dependency injection
//!
//! Wires up hierarchy controllers with their dependencies.

use std::sync::Arc;

use crate::application::services::{HierarchySync, SnapshotCache};
use crate::application::{ApplicationError, ApplicationResult, HierarchyController};
use crate::config::Settings;
use crate::infrastructure::http::HttpHierarchyService;
use crate::infrastructure::store::FileKeyValueStore;
use crate::infrastructure::traits::{FileSystem, HierarchyService, KeyValueStore, RealFileSystem};

/// Container holding the shared collaborators of every hierarchy view.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Backend owning the hierarchy
    pub service: Arc<dyn HierarchyService>,

    /// Snapshot store, `None` when caching is disabled
    pub store: Option<Arc<dyn KeyValueStore>>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> ApplicationResult<Self> {
        let service = HttpHierarchyService::new(&settings.api).map_err(|e| {
            ApplicationError::Config {
                message: format!("build HTTP client: {e}"),
            }
        })?;
        let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
        let store: Option<Arc<dyn KeyValueStore>> = settings.cache.enabled.then(|| {
            Arc::new(FileKeyValueStore::new(settings.cache.dir.clone(), Arc::clone(&fs)))
                as Arc<dyn KeyValueStore>
        });

        Ok(Self::with_deps(settings, fs, Arc::new(service), store))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        service: Arc<dyn HierarchyService>,
        store: Option<Arc<dyn KeyValueStore>>,
    ) -> Self {
        let settings = Arc::new(settings);

        Self {
            settings,
            fs,
            service,
            store,
        }
    }

    /// A fresh, independent hierarchy view sharing this container's collaborators.
    pub fn controller(&self) -> HierarchyController {
        let cache = self
            .store
            .as_ref()
            .map(|store| SnapshotCache::new(Arc::clone(store), self.settings.cache.key.clone()));
        HierarchyController::new(HierarchySync::new(Arc::clone(&self.service)), cache)
    }
}
