//! In-memory LRU image cache implementation.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};

use lru::LruCache;
use tokio::sync::RwLock;
use tracing::{debug, trace};

use crate::domain::entities::{ImageId, LoadedImage};
use crate::domain::ports::ImageCachePort;

/// Default maximum number of images to cache in memory.
pub const DEFAULT_CACHE_CAPACITY: usize = 32;

/// In-memory LRU cache for decoded images.
///
/// Thread-safe and optimized for frequent reads. Stores whole
/// [`LoadedImage`] records so cache hits keep the checksum and load
/// timestamp of the original decode.
pub struct MemoryImageCache {
    cache: RwLock<LruCache<ImageId, LoadedImage>>,
    decoded_bytes: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl MemoryImageCache {
    /// Creates a new cache with the specified capacity.
    ///
    /// A zero capacity is clamped to one entry.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: RwLock::new(LruCache::new(cap)),
            decoded_bytes: AtomicU64::new(0),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Creates a new cache with the default capacity.
    #[must_use]
    pub fn with_default_capacity() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }

    /// Returns cache statistics.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        let hit_rate = if total > 0 {
            (hits as f64 / total as f64) * 100.0
        } else {
            0.0
        };
        CacheStats {
            hits,
            misses,
            hit_rate,
            size: self.len(),
            approx_decoded_bytes: self.decoded_bytes.load(Ordering::Relaxed),
        }
    }

    /// Peeks at a record without promoting it in the LRU.
    /// Use this in read-only contexts to avoid write locks.
    pub async fn peek(&self, id: &ImageId) -> Option<LoadedImage> {
        let cache = self.cache.read().await;
        cache.peek(id).cloned()
    }
}

impl Default for MemoryImageCache {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}

/// Statistics about cache performance.
#[derive(Debug, Clone)]
pub struct CacheStats {
    /// Number of cache hits.
    pub hits: u64,
    /// Number of cache misses.
    pub misses: u64,
    /// Hit rate as a percentage.
    pub hit_rate: f64,
    /// Current number of cached images.
    pub size: usize,
    /// Approximate decoded size of all cached images, in bytes.
    pub approx_decoded_bytes: u64,
}

impl std::fmt::Display for CacheStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Cache: {} images (~{} KiB decoded), {:.1}% hit rate ({} hits, {} misses)",
            self.size,
            self.approx_decoded_bytes / 1024,
            self.hit_rate,
            self.hits,
            self.misses
        )
    }
}

#[async_trait::async_trait]
impl ImageCachePort for MemoryImageCache {
    async fn get(&self, id: &ImageId) -> Option<LoadedImage> {
        let mut cache = self.cache.write().await;
        if let Some(loaded) = cache.get(id) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            trace!(id = %id, "Memory cache hit");
            Some(loaded.clone())
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            trace!(id = %id, "Memory cache miss");
            None
        }
    }

    async fn put(&self, loaded: LoadedImage) {
        let mut cache = self.cache.write().await;
        debug!(id = %loaded.id, "Storing image in memory cache");
        let cost = loaded.decoded_cost();
        // push reports both same-key replacement and capacity eviction,
        // which keeps the cost counter exact.
        if let Some((displaced_id, displaced)) = cache.push(loaded.id.clone(), loaded) {
            trace!(id = %displaced_id, "Displaced image from memory cache");
            self.decoded_bytes
                .fetch_sub(displaced.decoded_cost(), Ordering::Relaxed);
        }
        self.decoded_bytes.fetch_add(cost, Ordering::Relaxed);
    }

    async fn evict(&self, id: &ImageId) {
        let mut cache = self.cache.write().await;
        if let Some(removed) = cache.pop(id) {
            self.decoded_bytes
                .fetch_sub(removed.decoded_cost(), Ordering::Relaxed);
            debug!(id = %id, "Evicted image from memory cache");
        }
    }

    fn len(&self) -> usize {
        // This is a best-effort estimate; actual size may differ slightly
        // due to concurrent modifications
        let cache = self.cache.try_read();
        cache.map(|c| c.len()).unwrap_or(0)
    }

    async fn clear(&self) {
        let mut cache = self.cache.write().await;
        cache.clear();
        self.decoded_bytes.store(0, Ordering::Relaxed);
        debug!("Cleared memory image cache");
    }
}
