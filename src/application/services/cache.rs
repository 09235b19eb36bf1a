//! Cache service
//!
//! The cache folder holds one subdirectory per installed binary version.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::{ApplicationResult, IoResultExt};
use crate::config::Settings;
use crate::infrastructure::traits::FileSystem;

/// Service behind `cache list|path|clear`.
pub struct CacheService {
    settings: Arc<Settings>,
    fs: Arc<dyn FileSystem>,
}

impl CacheService {
    /// Create a new cache service.
    pub fn new(settings: Arc<Settings>, fs: Arc<dyn FileSystem>) -> Self {
        Self { settings, fs }
    }

    pub fn path(&self) -> PathBuf {
        self.settings.cache_folder.clone()
    }

    /// Cached versions, sorted. A missing cache folder is an empty cache.
    #[instrument(skip(self))]
    pub fn list(&self) -> ApplicationResult<Vec<String>> {
        let folder = self.path();
        if !self.fs.is_dir(&folder) {
            debug!("no cache folder at {}", folder.display());
            return Ok(Vec::new());
        }
        let dirs = self
            .fs
            .list_dirs(&folder)
            .with_path_context("list cache", &folder)?;
        Ok(dirs
            .iter()
            .filter_map(|d| d.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .collect())
    }

    /// Delete the whole cache folder, if present.
    #[instrument(skip(self))]
    pub fn clear(&self) -> ApplicationResult<()> {
        let folder = self.path();
        if !self.fs.exists(&folder) {
            return Ok(());
        }
        self.fs
            .remove_dir_all(&folder)
            .with_path_context("clear cache", &folder)
    }
}
