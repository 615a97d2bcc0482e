//! Domain types for identified, loadable images.

use std::sync::Arc;

use chrono::{DateTime, Utc};

/// Unique identifier for an image resource.
///
/// Holds the store-relative file name the image is known by. The value is
/// fixed at construction and doubles as the cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageId(pub String);

impl ImageId {
    /// Creates a new `ImageId` from any string-like input.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the inner string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ImageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ImageId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ImageId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Lifecycle state of a lazily-loaded image handle.
///
/// `NotStarted -> Ready` is a one-way transition taken on the first
/// successful load. `Failed` reports the most recent unsuccessful attempt
/// and is replaced by `Ready` if a later attempt succeeds.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ImageStatus {
    /// No load has been attempted yet.
    #[default]
    NotStarted,
    /// Image is decoded and ready for display.
    Ready,
    /// The last load attempt failed with an error message.
    Failed(String),
}

impl ImageStatus {
    /// Returns true if the image is ready for rendering.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }

    /// Returns true if the last load attempt failed.
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Returns true if no load has been attempted.
    #[must_use]
    pub const fn is_not_started(&self) -> bool {
        matches!(self, Self::NotStarted)
    }
}

/// Where a loaded image's pixels came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource {
    /// Served from the in-memory LRU cache.
    MemoryCache,
    /// Read from the backing disk store and decoded.
    DiskStore,
}

impl std::fmt::Display for ImageSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MemoryCache => write!(f, "memory"),
            Self::DiskStore => write!(f, "disk"),
        }
    }
}

/// A fully decoded image together with its provenance.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    /// Identifier the image was loaded under.
    pub id: ImageId,
    /// Decoded pixel data, shared between cache and handles.
    pub image: Arc<image::DynamicImage>,
    /// Where the pixels came from.
    pub source: ImageSource,
    /// Size of the encoded bytes the image was decoded from.
    pub byte_len: usize,
    /// Content checksum of the encoded bytes (hex, 16 bytes of SHA-256).
    pub checksum: String,
    /// When the decode finished.
    pub loaded_at: DateTime<Utc>,
}

impl LoadedImage {
    /// Creates a loaded image record from freshly decoded pixels.
    ///
    /// `encoded` is the raw byte content the pixels were decoded from; it
    /// determines `byte_len` and `checksum`.
    #[must_use]
    pub fn new(
        id: ImageId,
        image: Arc<image::DynamicImage>,
        source: ImageSource,
        encoded: &[u8],
    ) -> Self {
        Self {
            id,
            image,
            source,
            byte_len: encoded.len(),
            checksum: content_checksum(encoded),
            loaded_at: Utc::now(),
        }
    }

    /// Returns a copy with the provenance rewritten.
    ///
    /// Used when a cached record is served again: the pixels, checksum and
    /// load timestamp stay those of the original decode.
    #[must_use]
    pub fn with_source(mut self, source: ImageSource) -> Self {
        self.source = source;
        self
    }

    /// Pixel width of the decoded image.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Pixel height of the decoded image.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Approximate decoded size in memory, assuming four bytes per pixel.
    #[must_use]
    pub fn decoded_cost(&self) -> u64 {
        u64::from(self.width()) * u64::from(self.height()) * 4
    }
}

/// Computes the content checksum used throughout the crate: the first 16
/// bytes of a SHA-256 digest, hex encoded.
#[must_use]
pub fn content_checksum(bytes: &[u8]) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let digest = hasher.finalize();
    hex::encode(&digest[..16])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_id_roundtrip() {
        let id = ImageId::new("car.png");
        assert_eq!(id.as_str(), "car.png");
        assert_eq!(id.to_string(), "car.png");
        assert_eq!(ImageId::from("car.png"), id);
    }

    #[test]
    fn test_status_predicates() {
        assert!(ImageStatus::default().is_not_started());
        assert!(ImageStatus::Ready.is_ready());
        assert!(ImageStatus::Failed("nope".into()).is_failed());
        assert!(!ImageStatus::Ready.is_failed());
    }

    #[test]
    fn test_checksum_is_stable() {
        let a = content_checksum(b"pixels");
        let b = content_checksum(b"pixels");
        assert_eq!(a, b);
        assert_eq!(a.len(), 32);
        assert_ne!(a, content_checksum(b"other pixels"));
    }

    #[test]
    fn test_loaded_image_records_provenance() {
        let pixels = Arc::new(image::DynamicImage::new_rgb8(4, 2));
        let loaded = LoadedImage::new(
            ImageId::new("bike.png"),
            pixels,
            ImageSource::DiskStore,
            b"encoded bytes",
        );

        assert_eq!(loaded.width(), 4);
        assert_eq!(loaded.height(), 2);
        assert_eq!(loaded.byte_len, 13);
        assert_eq!(loaded.decoded_cost(), 32);
        assert_eq!(loaded.source, ImageSource::DiskStore);

        let reserved = loaded.clone().with_source(ImageSource::MemoryCache);
        assert_eq!(reserved.source, ImageSource::MemoryCache);
        assert_eq!(reserved.checksum, loaded.checksum);
        assert_eq!(reserved.loaded_at, loaded.loaded_at);
    }
}
