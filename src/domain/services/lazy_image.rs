//! Lazy image variant.
//!
//! A `LazyImage` stands in for an image that has not been loaded yet. It
//! knows only its identifier until the first render forces a load through
//! the loader port; the resolved [`ReadyImage`] is then memoized for every
//! later render on the same handle.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use super::ready_image::ReadyImage;
use crate::domain::entities::{ImageId, ImageStatus};
use crate::domain::errors::LoadResult;
use crate::domain::ports::{DisplayPort, ImageLoaderPort, Render};

/// A render handle that defers its load to the first render.
///
/// The load runs at most once per handle, even under concurrent renders:
/// the initialization cell lets exactly one caller perform it while the
/// rest await the same resolved instance. A failed load leaves the cell
/// empty, so a later render may try again.
pub struct LazyImage {
    id: ImageId,
    loader: Arc<dyn ImageLoaderPort>,
    display: Arc<dyn DisplayPort>,
    inner: OnceCell<ReadyImage>,
    last_error: Mutex<Option<String>>,
}

impl LazyImage {
    /// Creates a handle for the identifier without touching the store.
    #[must_use]
    pub fn new(
        id: impl Into<ImageId>,
        loader: Arc<dyn ImageLoaderPort>,
        display: Arc<dyn DisplayPort>,
    ) -> Self {
        Self {
            id: id.into(),
            loader,
            display,
            inner: OnceCell::new(),
            last_error: Mutex::new(None),
        }
    }

    /// Returns true once the underlying image has been resolved.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.inner.initialized()
    }

    /// Message of the most recent failed load, if any.
    #[must_use]
    pub fn last_error(&self) -> Option<String> {
        self.last_error.lock().clone()
    }

    /// Resolves the inner image, loading it on first use.
    async fn ready(&self) -> LoadResult<&ReadyImage> {
        let result: LoadResult<&ReadyImage> = self
            .inner
            .get_or_try_init(|| async {
                debug!(id = %self.id, "First render, resolving image");
                let loaded = self.loader.load(&self.id).await?;
                Ok(ReadyImage::from_loaded(loaded, Arc::clone(&self.display)))
            })
            .await;

        match &result {
            Ok(_) => {
                self.last_error.lock().take();
            }
            Err(e) => {
                warn!(id = %self.id, error = %e, "Image load failed");
                *self.last_error.lock() = Some(e.to_string());
            }
        }

        result
    }
}

#[async_trait::async_trait]
impl Render for LazyImage {
    async fn render(&self) -> LoadResult<()> {
        let ready = self.ready().await?;
        ready.render().await
    }

    fn id(&self) -> &ImageId {
        &self.id
    }

    fn status(&self) -> ImageStatus {
        if self.inner.initialized() {
            ImageStatus::Ready
        } else if let Some(message) = self.last_error.lock().clone() {
            ImageStatus::Failed(message)
        } else {
            ImageStatus::NotStarted
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::LoadError;
    use crate::domain::ports::mocks::{MockImageLoader, RecordingDisplay};

    fn make_handle(
        id: &str,
        loader: &Arc<MockImageLoader>,
        display: &Arc<RecordingDisplay>,
    ) -> LazyImage {
        LazyImage::new(
            id,
            Arc::clone(loader) as Arc<dyn ImageLoaderPort>,
            Arc::clone(display) as Arc<dyn DisplayPort>,
        )
    }

    #[tokio::test]
    async fn test_construction_does_not_load() {
        let loader = Arc::new(MockImageLoader::new());
        let display = Arc::new(RecordingDisplay::new());

        let handle = make_handle("car.png", &loader, &display);

        assert_eq!(loader.load_count(), 0);
        assert_eq!(display.presented_count(), 0);
        assert!(handle.status().is_not_started());
        assert!(!handle.is_loaded());
    }

    #[tokio::test]
    async fn test_first_render_loads_then_presents() {
        let loader = Arc::new(MockImageLoader::new());
        let display = Arc::new(RecordingDisplay::new());
        let handle = make_handle("car.png", &loader, &display);

        handle.render().await.unwrap();

        assert_eq!(loader.load_count(), 1);
        assert_eq!(display.presented_count(), 1);
        assert_eq!(display.presented_ids(), vec![ImageId::new("car.png")]);
        assert!(handle.status().is_ready());
    }

    #[tokio::test]
    async fn test_repeat_renders_load_once() {
        let loader = Arc::new(MockImageLoader::new());
        let display = Arc::new(RecordingDisplay::new());
        let handle = make_handle("bike.png", &loader, &display);

        handle.render().await.unwrap();
        handle.render().await.unwrap();

        // One load, one presentation per render call.
        assert_eq!(loader.load_count(), 1);
        assert_eq!(display.presented_count(), 2);
    }

    #[tokio::test]
    async fn test_handles_do_not_share_load_state() {
        let loader = Arc::new(MockImageLoader::new());
        let display = Arc::new(RecordingDisplay::new());
        let car = make_handle("car.png", &loader, &display);
        let bike = make_handle("bike.png", &loader, &display);

        car.render().await.unwrap();
        bike.render().await.unwrap();
        bike.render().await.unwrap();

        assert_eq!(loader.load_count(), 2);
        assert_eq!(
            display.presented_ids(),
            vec![
                ImageId::new("car.png"),
                ImageId::new("bike.png"),
                ImageId::new("bike.png"),
            ]
        );
    }

    #[tokio::test]
    async fn test_failed_load_propagates_and_presents_nothing() {
        let loader = Arc::new(MockImageLoader::failing(LoadError::not_found("ghost.png")));
        let display = Arc::new(RecordingDisplay::new());
        let handle = make_handle("ghost.png", &loader, &display);

        let result = handle.render().await;

        assert!(matches!(result, Err(LoadError::NotFound { .. })));
        assert_eq!(display.presented_count(), 0);
        assert!(!handle.is_loaded());
        assert!(handle.status().is_failed());
    }

    #[tokio::test]
    async fn test_render_after_failure_retries() {
        let loader = Arc::new(MockImageLoader::failing(LoadError::io(
            "car.png",
            "disk asleep",
        )));
        let display = Arc::new(RecordingDisplay::new());
        let handle = make_handle("car.png", &loader, &display);

        assert!(handle.render().await.is_err());
        loader.set_failure(None);

        handle.render().await.unwrap();

        assert_eq!(loader.load_count(), 2);
        assert_eq!(display.presented_count(), 1);
        assert!(handle.status().is_ready());
        assert!(handle.last_error().is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_renders_load_once() {
        let loader = Arc::new(MockImageLoader::new());
        let display = Arc::new(RecordingDisplay::new());
        let handle: Arc<dyn Render> = Arc::new(make_handle("car.png", &loader, &display));

        let mut tasks = Vec::new();
        for _ in 0..8 {
            let handle = Arc::clone(&handle);
            tasks.push(tokio::spawn(async move { handle.render().await }));
        }
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        assert_eq!(loader.load_count(), 1);
        assert_eq!(display.presented_count(), 8);
    }
}
