//! Image load error types.

use thiserror::Error;

/// Result type for load operations.
pub type LoadResult<T> = std::result::Result<T, LoadError>;

/// Errors that can occur while resolving, reading or decoding an image.
///
/// Cloneable so loader completion events can carry the failure to every
/// listener.
#[derive(Debug, Clone, Error)]
#[allow(missing_docs)]
pub enum LoadError {
    #[error("image not found: {id}")]
    NotFound { id: String },

    #[error("failed to read {id}: {message}")]
    Io { id: String, message: String },

    #[error("failed to decode {id}: {message}")]
    Decode { id: String, message: String },
}

impl LoadError {
    /// Creates a not-found error for the given identifier.
    #[must_use]
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Creates an I/O error for the given identifier.
    #[must_use]
    pub fn io(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Io {
            id: id.into(),
            message: message.into(),
        }
    }

    /// Creates a decode error for the given identifier.
    #[must_use]
    pub fn decode(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            id: id.into(),
            message: message.into(),
        }
    }

    /// Returns whether the identifier simply did not resolve.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns whether the failure happened after the bytes were fetched.
    ///
    /// Decode failures are permanent for a given store content; read
    /// failures may clear up on a later attempt.
    #[must_use]
    pub const fn is_decode_error(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }

    /// Identifier the failing operation was addressed to.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::NotFound { id } | Self::Io { id, .. } | Self::Decode { id, .. } => id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_image() {
        let err = LoadError::not_found("car.png");
        assert_eq!(err.to_string(), "image not found: car.png");
        assert!(err.is_not_found());
        assert_eq!(err.id(), "car.png");

        let err = LoadError::decode("bike.png", "bad magic bytes");
        assert_eq!(err.to_string(), "failed to decode bike.png: bad magic bytes");
        assert!(err.is_decode_error());
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_io_error_carries_message() {
        let err = LoadError::io("car.png", "permission denied");
        assert_eq!(err.id(), "car.png");
        assert!(err.to_string().contains("permission denied"));
    }
}
