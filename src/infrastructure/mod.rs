//! Infrastructure layer with external service adapters.

/// In-memory caching.
pub mod cache;
/// Application configuration.
pub mod config;
/// Console output.
pub mod display;
/// Load orchestration.
pub mod loader;
/// Backing stores.
pub mod store;

pub use cache::{CacheStats, MemoryImageCache};
pub use config::{AppConfig, CliArgs, LogLevel, StorageManager};
pub use display::ConsoleDisplay;
pub use loader::{ImageLoadedEvent, ImageLoader, ImageLoaderConfig};
pub use store::DiskImageStore;
