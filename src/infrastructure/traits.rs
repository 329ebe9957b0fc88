//! I/O boundary traits for testability
//!
//! These traits abstract external I/O operations, allowing the controller and
//! its services to be tested with fake implementations.

use std::io;
use std::path::Path;

use serde_json::Value;

use crate::infrastructure::error::TransportResult;

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Read file contents to string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Write string content to file.
    fn write(&self, path: &Path, content: &str) -> io::Result<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Create directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Rename/move a file.
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;

    /// Remove a file.
    fn remove_file(&self, path: &Path) -> io::Result<()>;

    /// Create parent directories if needed.
    fn ensure_parent(&self, path: &Path) -> io::Result<()>;
}

/// Backend that owns the entity hierarchy.
pub trait HierarchyService: Send + Sync {
    /// Ask the backend to recompute parent/child relationships.
    fn sync_relationships(&self) -> TransportResult<()>;

    /// Fetch the hierarchy as raw JSON: one node object or an array of nodes.
    fn fetch_hierarchy(&self) -> TransportResult<Value>;
}

/// Simple string key-value store.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> TransportResult<Option<String>>;

    fn set(&self, key: &str, value: &str) -> TransportResult<()>;

    fn remove(&self, key: &str) -> TransportResult<()>;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        std::fs::write(path, content)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        std::fs::rename(from, to)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_file(path)
    }

    fn ensure_parent(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                self.create_dir_all(parent)?;
            }
        }
        Ok(())
    }
}
