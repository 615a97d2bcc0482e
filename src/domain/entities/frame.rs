//! Render frame handed to display sinks.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::image::{ImageId, ImageSource, LoadedImage};

/// Everything a display sink needs to present one image once.
///
/// Frames are cheap to clone; the pixel data is shared.
#[derive(Debug, Clone)]
pub struct RenderFrame {
    /// Identifier of the image being presented.
    pub id: ImageId,
    /// Decoded pixel data.
    pub image: Arc<image::DynamicImage>,
    /// Where the pixels originally came from.
    pub source: ImageSource,
    /// Content checksum of the encoded bytes.
    pub checksum: String,
    /// When the pixels were decoded.
    pub loaded_at: DateTime<Utc>,
}

impl RenderFrame {
    /// Builds a frame from a loaded image record.
    #[must_use]
    pub fn from_loaded(loaded: &LoadedImage) -> Self {
        Self {
            id: loaded.id.clone(),
            image: Arc::clone(&loaded.image),
            source: loaded.source,
            checksum: loaded.checksum.clone(),
            loaded_at: loaded.loaded_at,
        }
    }

    /// Pixel width of the frame.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Pixel height of the frame.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_mirrors_loaded_image() {
        let loaded = LoadedImage::new(
            ImageId::new("car.png"),
            Arc::new(image::DynamicImage::new_rgb8(8, 4)),
            ImageSource::DiskStore,
            b"raw",
        );

        let frame = RenderFrame::from_loaded(&loaded);

        assert_eq!(frame.id, loaded.id);
        assert_eq!(frame.width(), 8);
        assert_eq!(frame.height(), 4);
        assert_eq!(frame.checksum, loaded.checksum);
        assert_eq!(frame.source, ImageSource::DiskStore);
    }
}
