//! Backing store port definition.

use bytes::Bytes;

use crate::domain::entities::ImageId;
use crate::domain::errors::LoadResult;

/// Port for the store that owns the encoded image bytes.
///
/// The store is a read-only source of truth; caching happens in front of
/// it, never inside it.
#[async_trait::async_trait]
pub trait ImageStorePort: Send + Sync {
    /// Fetches the encoded bytes for an identifier.
    ///
    /// # Errors
    /// Returns [`crate::domain::errors::LoadError::NotFound`] when the
    /// identifier does not resolve, `Io` when reading fails.
    async fn fetch(&self, id: &ImageId) -> LoadResult<Bytes>;

    /// Checks whether an identifier resolves without fetching it.
    async fn contains(&self, id: &ImageId) -> bool;
}
