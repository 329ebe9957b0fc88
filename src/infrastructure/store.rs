//! File-backed key-value store: one file per key inside a directory

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::trace;

use crate::infrastructure::error::{TransportError, TransportResult};
use crate::infrastructure::traits::{FileSystem, KeyValueStore};

pub struct FileKeyValueStore {
    dir: PathBuf,
    fs: Arc<dyn FileSystem>,
}

impl FileKeyValueStore {
    pub fn new(dir: impl Into<PathBuf>, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            dir: dir.into(),
            fs,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Keys map to `<dir>/<key>.json`; path separators are neutralized.
    pub fn path_for(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' { c } else { '_' })
            .collect();
        self.dir.join(format!("{file_name}.json"))
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> TransportResult<Option<String>> {
        let path = self.path_for(key);
        if !self.fs.exists(&path) {
            return Ok(None);
        }
        self.fs
            .read_to_string(&path)
            .map(Some)
            .map_err(|e| TransportError::io(format!("read {}", path.display()), e))
    }

    fn set(&self, key: &str, value: &str) -> TransportResult<()> {
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        trace!("set: {} ({} bytes)", path.display(), value.len());

        self.fs
            .ensure_parent(&path)
            .map_err(|e| TransportError::io(format!("create {}", self.dir.display()), e))?;
        self.fs
            .write(&tmp, value)
            .map_err(|e| TransportError::io(format!("write {}", tmp.display()), e))?;
        self.fs
            .rename(&tmp, &path)
            .map_err(|e| TransportError::io(format!("rename to {}", path.display()), e))
    }

    fn remove(&self, key: &str) -> TransportResult<()> {
        let path = self.path_for(key);
        if !self.fs.exists(&path) {
            return Ok(());
        }
        self.fs
            .remove_file(&path)
            .map_err(|e| TransportError::io(format!("remove {}", path.display()), e))
    }
}
