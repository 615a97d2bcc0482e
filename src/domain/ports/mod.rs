mod cache_port;
mod display_port;
mod loader_port;
mod render_port;
mod store_port;

pub use cache_port::ImageCachePort;
pub use display_port::DisplayPort;
pub use loader_port::ImageLoaderPort;
pub use render_port::Render;
pub use store_port::ImageStorePort;

#[cfg(test)]
pub mod mocks {
    pub use super::display_port::mock::RecordingDisplay;
    pub use super::loader_port::mock::MockImageLoader;
    pub use super::store_port::mock::MemoryImageStore;
}
