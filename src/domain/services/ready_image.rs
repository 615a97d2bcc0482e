//! Eager image variant.
//!
//! A `ReadyImage` performs its load up front: once construction succeeds
//! the pixels are in memory and every render is a plain presentation.

use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, info};

use crate::domain::entities::{ImageId, ImageSource, ImageStatus, LoadedImage, RenderFrame};
use crate::domain::errors::{LoadError, LoadResult};
use crate::domain::ports::{DisplayPort, ImageStorePort, Render};

/// An image that was loaded at construction time.
pub struct ReadyImage {
    loaded: LoadedImage,
    display: Arc<dyn DisplayPort>,
}

impl ReadyImage {
    /// Fetches and decodes the image immediately.
    ///
    /// This is the fallible-factory form of an eager constructor: the
    /// expensive work happens here, and an identifier that does not
    /// resolve never produces an instance.
    ///
    /// # Errors
    /// Returns an error when the store cannot resolve the identifier or
    /// the bytes do not decode.
    pub async fn load(
        id: ImageId,
        store: &dyn ImageStorePort,
        display: Arc<dyn DisplayPort>,
    ) -> LoadResult<Self> {
        let bytes = store.fetch(&id).await?;
        let decoded = decode(&id, bytes.clone()).await?;
        let loaded = LoadedImage::new(id, Arc::new(decoded), ImageSource::DiskStore, &bytes);
        info!(
            id = %loaded.id,
            width = loaded.width(),
            height = loaded.height(),
            checksum = %loaded.checksum,
            "Loaded image eagerly"
        );
        Ok(Self { loaded, display })
    }

    /// Wraps an already-loaded record, typically one a loader resolved.
    #[must_use]
    pub fn from_loaded(loaded: LoadedImage, display: Arc<dyn DisplayPort>) -> Self {
        Self { loaded, display }
    }

    /// The underlying loaded record.
    #[must_use]
    pub fn loaded(&self) -> &LoadedImage {
        &self.loaded
    }
}

#[async_trait::async_trait]
impl Render for ReadyImage {
    async fn render(&self) -> LoadResult<()> {
        let frame = RenderFrame::from_loaded(&self.loaded);
        debug!(id = %frame.id, source = %frame.source, "Presenting frame");
        self.display.present(&frame);
        Ok(())
    }

    fn id(&self) -> &ImageId {
        &self.loaded.id
    }

    fn status(&self) -> ImageStatus {
        ImageStatus::Ready
    }
}

/// Decodes encoded bytes on the blocking pool.
async fn decode(id: &ImageId, bytes: Bytes) -> LoadResult<image::DynamicImage> {
    let task = tokio::task::spawn_blocking(move || image::load_from_memory(&bytes));
    task.await
        .map_err(|e| LoadError::decode(id.as_str(), format!("decode task panicked: {e}")))?
        .map_err(|e| LoadError::decode(id.as_str(), e.to_string()))
}
