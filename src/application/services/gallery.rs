//! Ordered collection of renderable image handles.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::entities::{ImageId, ImageStatus};
use crate::domain::errors::{LoadError, LoadResult};
use crate::domain::ports::{DisplayPort, ImageLoaderPort, Render};
use crate::domain::services::{LazyImage, ReadyImage};

/// A gallery of image handles sharing one loader and one display.
///
/// Handles keep their insertion order. Lazy handles cost nothing until
/// first rendered; eager handles pay the load when added.
pub struct Gallery {
    loader: Arc<dyn ImageLoaderPort>,
    display: Arc<dyn DisplayPort>,
    handles: Vec<Arc<dyn Render>>,
}

impl Gallery {
    #[must_use]
    pub fn new(loader: Arc<dyn ImageLoaderPort>, display: Arc<dyn DisplayPort>) -> Self {
        Self {
            loader,
            display,
            handles: Vec::new(),
        }
    }

    /// Adds a lazy handle. No bytes move until it is first rendered.
    pub fn add(&mut self, id: impl Into<ImageId>) {
        let handle = LazyImage::new(id, self.loader.clone(), self.display.clone());
        self.handles.push(Arc::new(handle));
    }

    /// Loads an image now and adds it as an always-ready handle.
    ///
    /// # Errors
    /// Returns a [`LoadError`] if the load fails; the gallery is left
    /// unchanged in that case.
    pub async fn add_eager(&mut self, id: impl Into<ImageId>) -> LoadResult<()> {
        let id = id.into();
        let loaded = self.loader.load(&id).await?;
        info!(id = %id, "Loaded eager image handle");
        let handle = ReadyImage::from_loaded(loaded, self.display.clone());
        self.handles.push(Arc::new(handle));
        Ok(())
    }

    /// Renders a single image by identifier.
    ///
    /// # Errors
    /// Returns `LoadError::NotFound` for identifiers never added, or the
    /// underlying load error if loading fails.
    pub async fn render(&self, id: &ImageId) -> LoadResult<()> {
        let handle = self
            .handles
            .iter()
            .find(|h| h.id() == id)
            .ok_or_else(|| LoadError::not_found(id.as_str()))?;
        handle.render().await
    }

    /// Renders every handle in insertion order.
    ///
    /// A failing handle does not stop the pass; each result is reported
    /// per identifier.
    pub async fn render_all(&self) -> Vec<(ImageId, LoadResult<()>)> {
        let mut results = Vec::with_capacity(self.handles.len());
        for handle in &self.handles {
            let result = handle.render().await;
            if let Err(e) = &result {
                warn!(id = %handle.id(), error = %e, "Failed to render image");
            }
            results.push((handle.id().clone(), result));
        }
        results
    }

    /// Status of every handle, in insertion order.
    #[must_use]
    pub fn statuses(&self) -> Vec<(ImageId, ImageStatus)> {
        self.handles
            .iter()
            .map(|h| (h.id().clone(), h.status()))
            .collect()
    }

    /// Status of one handle, if it was added.
    #[must_use]
    pub fn status(&self, id: &ImageId) -> Option<ImageStatus> {
        self.handles
            .iter()
            .find(|h| h.id() == id)
            .map(|h| h.status())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}
