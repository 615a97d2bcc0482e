//! Shared image cache port definition.

use crate::domain::entities::{ImageId, LoadedImage};

/// Port for the crate-wide cache of decoded images.
///
/// Implementations must be thread-safe. The cache never answers for the
/// per-handle memoization of lazy images; it only saves repeated decodes
/// across handles.
#[async_trait::async_trait]
pub trait ImageCachePort: Send + Sync {
    /// Attempts to get a cached record. Returns `None` if not cached.
    ///
    /// The returned record keeps the checksum and load timestamp of the
    /// original decode; callers rewrite the provenance if they need to.
    async fn get(&self, id: &ImageId) -> Option<LoadedImage>;

    /// Stores a record under its own identifier.
    async fn put(&self, loaded: LoadedImage);

    /// Removes a record from the cache.
    async fn evict(&self, id: &ImageId);

    /// Returns the current number of cached records.
    fn len(&self) -> usize;

    /// Returns true if the cache is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clears all records from the cache.
    async fn clear(&self);
}
