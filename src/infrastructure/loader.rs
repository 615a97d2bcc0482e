//! Async image loading orchestrator.
//!
//! Implements a two-tier lookup: memory cache -> backing store. Loads can
//! run inline through [`ImageLoaderPort::load`] or in the background
//! through `prefetch`, with completions reported on an event channel.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use tokio::sync::{RwLock, Semaphore, mpsc};
use tracing::{debug, error, trace};

use crate::domain::entities::{ImageId, ImageSource, LoadedImage};
use crate::domain::errors::{LoadError, LoadResult};
use crate::domain::ports::{ImageCachePort, ImageLoaderPort, ImageStorePort};

use super::cache::{CacheStats, DEFAULT_CACHE_CAPACITY, MemoryImageCache};

/// Message sent when a background load finishes.
#[derive(Debug, Clone)]
pub struct ImageLoadedEvent {
    /// The image ID.
    pub id: ImageId,
    /// The loaded image, or the error that stopped it.
    pub result: Result<LoadedImage, LoadError>,
}

/// Configuration for the image loader.
#[derive(Debug, Clone)]
pub struct ImageLoaderConfig {
    /// Maximum images in the memory cache.
    pub cache_capacity: usize,
    /// Maximum loads decoded concurrently.
    pub max_concurrent_loads: usize,
    /// Decoded images wider than this are downscaled to fit it.
    /// `None` keeps full resolution.
    pub downscale_width: Option<u32>,
}

impl Default for ImageLoaderConfig {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            max_concurrent_loads: 4,
            downscale_width: Some(400),
        }
    }
}

#[derive(Debug)]
enum LoaderCommand {
    Load { id: ImageId },
    Cancel { id: ImageId },
    CancelAll,
}

/// Cache-then-store lookup shared by inline and background loads.
struct LoaderCore {
    cache: Arc<MemoryImageCache>,
    store: Arc<dyn ImageStorePort>,
    downscale_width: Option<u32>,
}

impl LoaderCore {
    async fn load_tiers(&self, id: &ImageId) -> LoadResult<LoadedImage> {
        if let Some(cached) = self.cache.get(id).await {
            return Ok(cached.with_source(ImageSource::MemoryCache));
        }

        let bytes = self.store.fetch(id).await?;

        let downscale = self.downscale_width;
        let bytes_for_decode = bytes.clone();
        let id_for_decode = id.clone();
        let decoded =
            tokio::task::spawn_blocking(move || -> LoadResult<image::DynamicImage> {
                let img = image::load_from_memory(&bytes_for_decode)
                    .map_err(|e| LoadError::decode(id_for_decode.as_str(), e.to_string()))?;

                Ok(match downscale {
                    Some(max) if img.width() > max => {
                        img.resize(max, max, image::imageops::FilterType::Lanczos3)
                    }
                    _ => img,
                })
            })
            .await
            .map_err(|e| LoadError::decode(id.as_str(), format!("decode task panicked: {e}")))??;

        let loaded = LoadedImage::new(id.clone(), Arc::new(decoded), ImageSource::DiskStore, &bytes);
        self.cache.put(loaded.clone()).await;

        debug!(
            id = %id,
            width = loaded.width(),
            height = loaded.height(),
            checksum = %loaded.checksum,
            "Image loaded from store"
        );
        Ok(loaded)
    }
}

/// State for the background worker loop.
struct WorkerState {
    core: Arc<LoaderCore>,
    pending_loads: Arc<RwLock<HashSet<ImageId>>>,
    event_tx: mpsc::UnboundedSender<ImageLoadedEvent>,
    semaphore: Arc<Semaphore>,
    request_rx: mpsc::UnboundedReceiver<LoaderCommand>,
}

/// Orchestrates image loading from the memory cache and the backing store.
pub struct ImageLoader {
    core: Arc<LoaderCore>,
    pending_loads: Arc<RwLock<HashSet<ImageId>>>,
    request_tx: mpsc::UnboundedSender<LoaderCommand>,
    config: ImageLoaderConfig,
}

impl std::fmt::Debug for ImageLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageLoader")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ImageLoader {
    /// Creates a new image loader and spawns its background worker.
    #[must_use]
    pub fn new(
        config: ImageLoaderConfig,
        store: Arc<dyn ImageStorePort>,
        event_tx: &mpsc::UnboundedSender<ImageLoadedEvent>,
    ) -> Self {
        let core = Arc::new(LoaderCore {
            cache: Arc::new(MemoryImageCache::new(config.cache_capacity)),
            store,
            downscale_width: config.downscale_width,
        });

        let (request_tx, request_rx) = mpsc::unbounded_channel();
        let semaphore = Arc::new(Semaphore::new(config.max_concurrent_loads));
        let pending_loads = Arc::new(RwLock::new(HashSet::new()));

        let worker_state = WorkerState {
            core: core.clone(),
            pending_loads: pending_loads.clone(),
            event_tx: event_tx.clone(),
            semaphore,
            request_rx,
        };

        tokio::spawn(Self::run_worker_loop(worker_state));

        Self {
            core,
            pending_loads,
            request_tx,
            config,
        }
    }

    /// Creates a loader with default configuration.
    #[must_use]
    pub fn with_defaults(
        store: Arc<dyn ImageStorePort>,
        event_tx: &mpsc::UnboundedSender<ImageLoadedEvent>,
    ) -> Self {
        Self::new(ImageLoaderConfig::default(), store, event_tx)
    }

    /// Worker loop handling queued loads and throttling.
    async fn run_worker_loop(mut state: WorkerState) {
        let mut queue: VecDeque<ImageId> = VecDeque::new();

        loop {
            tokio::select! {
                cmd = state.request_rx.recv() => {
                    match cmd {
                        Some(LoaderCommand::Load { id }) => {
                            if !queue.contains(&id) {
                                trace!(id = %id, "Queued image load");
                                queue.push_back(id);
                            }
                        }
                        Some(LoaderCommand::Cancel { id }) => {
                            queue.retain(|qid| *qid != id);
                        }
                        Some(LoaderCommand::CancelAll) => {
                            queue.clear();
                        }
                        None => break,
                    }
                }
                Ok(permit) = state.semaphore.clone().acquire_owned(), if !queue.is_empty() => {
                    if let Some(id) = queue.pop_front() {
                        let core = state.core.clone();
                        let pending_loads = state.pending_loads.clone();
                        let event_tx = state.event_tx.clone();

                        tokio::spawn(async move {
                            {
                                let mut pending = pending_loads.write().await;
                                if pending.contains(&id) {
                                    return;
                                }
                                pending.insert(id.clone());
                            }

                            let result = core.load_tiers(&id).await;

                            {
                                let mut pending = pending_loads.write().await;
                                pending.remove(&id);
                            }

                            let _ = event_tx.send(ImageLoadedEvent {
                                id: id.clone(),
                                result,
                            });
                            drop(permit);
                        });
                    }
                }
            }
        }
    }

    /// Checks the memory cache without promoting the entry.
    pub async fn is_cached(&self, id: &ImageId) -> bool {
        self.core.cache.peek(id).await.is_some()
    }

    /// Queues several images for background loading.
    pub fn prefetch_batch(&self, ids: impl IntoIterator<Item = ImageId>) {
        for id in ids {
            self.prefetch(id);
        }
    }

    /// Cancels a queued load. A load already in flight still completes.
    pub async fn cancel(&self, id: &ImageId) {
        if let Err(e) = self
            .request_tx
            .send(LoaderCommand::Cancel { id: id.clone() })
        {
            error!("Failed to send cancel request: {}", e);
        }
        debug!(id = %id, "Cancelled queued image load");
    }

    /// Cancels all queued loads.
    pub async fn cancel_all(&self) {
        if let Err(e) = self.request_tx.send(LoaderCommand::CancelAll) {
            error!("Failed to send cancel all request: {}", e);
        }
        debug!("Cancelled all queued image loads");
    }

    /// Returns true if an image load is currently in flight.
    pub async fn is_loading(&self, id: &ImageId) -> bool {
        let pending = self.pending_loads.read().await;
        pending.contains(id)
    }

    /// Returns the number of loads in flight.
    pub async fn pending_count(&self) -> usize {
        let pending = self.pending_loads.read().await;
        pending.len()
    }

    /// Returns memory cache statistics.
    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        self.core.cache.stats()
    }

    /// Clears the memory cache. The backing store is untouched.
    pub async fn clear_cache(&self) {
        self.core.cache.clear().await;
    }
}

#[async_trait::async_trait]
impl ImageLoaderPort for ImageLoader {
    async fn load(&self, id: &ImageId) -> LoadResult<LoadedImage> {
        self.core.load_tiers(id).await
    }

    fn prefetch(&self, id: ImageId) {
        if let Err(e) = self.request_tx.send(LoaderCommand::Load { id }) {
            error!("Failed to send load request: {}", e);
        }
    }
}
