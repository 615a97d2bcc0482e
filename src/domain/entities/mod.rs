//! Domain entity definitions.

mod frame;
mod image;

pub use self::frame::RenderFrame;
pub use self::image::{ImageId, ImageSource, ImageStatus, LoadedImage, content_checksum};
