//! Domain services: the two render variants.

mod lazy_image;
mod ready_image;

pub use lazy_image::LazyImage;
pub use ready_image::ReadyImage;
