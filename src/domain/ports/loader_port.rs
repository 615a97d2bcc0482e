//! Image loading port definition.

use crate::domain::entities::{ImageId, LoadedImage};
use crate::domain::errors::LoadResult;

/// Port for resolving an identifier into decoded pixels.
///
/// This is the expensive step lazy handles defer; eager handles skip it
/// and go straight to the store.
#[async_trait::async_trait]
pub trait ImageLoaderPort: Send + Sync {
    /// Loads an image, consulting the shared cache before the store.
    ///
    /// # Errors
    /// Returns a [`crate::domain::errors::LoadError`] if the image cannot
    /// be loaded from any tier.
    async fn load(&self, id: &ImageId) -> LoadResult<LoadedImage>;

    /// Queues a background load so a later `load` is a cache hit.
    ///
    /// Fire and forget; completion is reported out-of-band.
    fn prefetch(&self, id: ImageId);
}

#[cfg(test)]
pub mod mock {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use parking_lot::Mutex;

    use super::*;
    use crate::domain::entities::ImageSource;
    use crate::domain::errors::LoadError;

    /// Loader mock that counts loads and can inject failures.
    ///
    /// Successful loads answer with a fixed 2x2 image so tests never touch
    /// real decode paths.
    pub struct MockImageLoader {
        pixels: Arc<image::DynamicImage>,
        loads: AtomicUsize,
        prefetched: Mutex<Vec<ImageId>>,
        fail_with: Mutex<Option<LoadError>>,
    }

    impl MockImageLoader {
        /// Creates a mock that always succeeds.
        pub fn new() -> Self {
            Self {
                pixels: Arc::new(image::DynamicImage::new_rgb8(2, 2)),
                loads: AtomicUsize::new(0),
                prefetched: Mutex::new(Vec::new()),
                fail_with: Mutex::new(None),
            }
        }

        /// Creates a mock that fails every load with the given error.
        pub fn failing(error: LoadError) -> Self {
            let mock = Self::new();
            mock.set_failure(Some(error));
            mock
        }

        /// Switches failure injection on or off.
        pub fn set_failure(&self, error: Option<LoadError>) {
            *self.fail_with.lock() = error;
        }

        /// Number of load calls observed so far.
        pub fn load_count(&self) -> usize {
            self.loads.load(Ordering::SeqCst)
        }

        /// Identifiers handed to `prefetch`, in order.
        pub fn prefetched(&self) -> Vec<ImageId> {
            self.prefetched.lock().clone()
        }
    }

    impl Default for MockImageLoader {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait::async_trait]
    impl ImageLoaderPort for MockImageLoader {
        async fn load(&self, id: &ImageId) -> LoadResult<LoadedImage> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            if let Some(err) = self.fail_with.lock().clone() {
                return Err(err);
            }
            Ok(LoadedImage::new(
                id.clone(),
                Arc::clone(&self.pixels),
                ImageSource::DiskStore,
                b"mock bytes",
            ))
        }

        fn prefetch(&self, id: ImageId) {
            self.prefetched.lock().push(id);
        }
    }
}
