//! Disk-backed image store.
//!
//! Serves encoded image bytes from a root directory. The store is strictly
//! read-only; identifiers are file names relative to the root and must not
//! escape it.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use bytes::Bytes;
use tokio::fs;
use tracing::{debug, trace};

use crate::domain::entities::ImageId;
use crate::domain::errors::{LoadError, LoadResult};
use crate::domain::ports::ImageStorePort;

/// File extensions `scan` recognizes as images.
const IMAGE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "webp"];

/// Read-only store of encoded images rooted at a directory.
pub struct DiskImageStore {
    root: PathBuf,
}

impl DiskImageStore {
    /// Opens a store over an existing directory.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::Io` if the root cannot be read or is not a
    /// directory.
    pub async fn open(root: impl Into<PathBuf>) -> LoadResult<Self> {
        let root = root.into();
        let root_display = root.display().to_string();
        let metadata = fs::metadata(&root)
            .await
            .map_err(|e| LoadError::io(&root_display, e.to_string()))?;
        if !metadata.is_dir() {
            return Err(LoadError::io(&root_display, "not a directory"));
        }

        debug!(root = %root_display, "Opened image store");
        Ok(Self { root })
    }

    /// Directory the store reads from.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Maps an identifier to a path inside the root.
    ///
    /// Absolute identifiers and any path component other than a plain name
    /// (so `..` and `.`) do not resolve. Such identifiers are reported as
    /// not found, same as a missing file.
    fn resolve(&self, id: &ImageId) -> LoadResult<PathBuf> {
        let relative = Path::new(id.as_str());
        let plain = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if relative.as_os_str().is_empty() || relative.is_absolute() || !plain {
            trace!(id = %id, "Identifier does not resolve inside the store root");
            return Err(LoadError::not_found(id.as_str()));
        }
        Ok(self.root.join(relative))
    }

    /// Lists the images directly under the root, sorted by identifier.
    ///
    /// Only entries with a known image extension are reported.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::Io` if the root directory cannot be listed.
    pub async fn scan(&self) -> LoadResult<Vec<ImageId>> {
        let root_display = self.root.display().to_string();
        let mut entries = fs::read_dir(&self.root)
            .await
            .map_err(|e| LoadError::io(&root_display, e.to_string()))?;

        let mut ids = Vec::new();
        while let Ok(Some(entry)) = entries.next_entry().await {
            let path = entry.path();
            let is_image = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(is_image_extension);
            if is_image && let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                ids.push(ImageId::new(name));
            }
        }

        ids.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        debug!(root = %root_display, count = ids.len(), "Scanned image store");
        Ok(ids)
    }
}

fn is_image_extension(ext: &str) -> bool {
    IMAGE_EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e))
}

#[async_trait::async_trait]
impl ImageStorePort for DiskImageStore {
    async fn fetch(&self, id: &ImageId) -> LoadResult<Bytes> {
        let path = self.resolve(id)?;
        match fs::read(&path).await {
            Ok(bytes) => {
                trace!(id = %id, size = bytes.len(), "Read image bytes from store");
                Ok(Bytes::from(bytes))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                trace!(id = %id, "Image not present in store");
                Err(LoadError::not_found(id.as_str()))
            }
            Err(e) => Err(LoadError::io(id.as_str(), e.to_string())),
        }
    }

    async fn contains(&self, id: &ImageId) -> bool {
        match self.resolve(id) {
            Ok(path) => fs::try_exists(&path).await.unwrap_or(false),
            Err(_) => false,
        }
    }
}
