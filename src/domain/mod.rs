//! Domain layer with core business entities and port definitions.

/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Port definitions.
pub mod ports;
/// The eager and lazy render variants.
pub mod services;

pub use entities::{ImageId, ImageSource, ImageStatus, LoadedImage, RenderFrame};
pub use errors::{LoadError, LoadResult};
pub use ports::{DisplayPort, ImageCachePort, ImageLoaderPort, ImageStorePort, Render};
pub use services::{LazyImage, ReadyImage};
