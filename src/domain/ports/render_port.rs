//! The render capability shared by eager and lazy image variants.

use crate::domain::entities::{ImageId, ImageStatus};
use crate::domain::errors::LoadResult;

/// Capability interface for anything that can present an image.
///
/// Callers hold `Arc<dyn Render>` and stay oblivious to whether the pixels
/// are already in memory or still waiting on their first load. Errors from
/// the load step propagate out of [`Render::render`]; the display effect
/// itself flows through the display port.
#[async_trait::async_trait]
pub trait Render: Send + Sync {
    /// Presents the image, loading it first if necessary.
    ///
    /// # Errors
    /// Returns a [`crate::domain::errors::LoadError`] when the image cannot
    /// be resolved, read or decoded. A failed call presents nothing.
    async fn render(&self) -> LoadResult<()>;

    /// Identifier this handle was created for.
    fn id(&self) -> &ImageId;

    /// Current lifecycle state of the handle.
    fn status(&self) -> ImageStatus;
}
