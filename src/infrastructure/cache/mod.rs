//! Cache adapters.

pub mod memory_cache;

pub use memory_cache::{CacheStats, DEFAULT_CACHE_CAPACITY, MemoryImageCache};
