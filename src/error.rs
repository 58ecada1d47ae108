//! Error types for card rendering and asset decoding.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T, E = CardError> = std::result::Result<T, E>;

/// The single error type surfaced by a render call.
///
/// A render either returns a complete image or one of these; no partial
/// image is ever handed back.
#[derive(Debug, Error)]
pub enum CardError {
    /// A rendering option is invalid (unknown enum value, too many colors,
    /// missing numeric field). Never retried.
    #[error("invalid {option}: {message}")]
    Configuration {
        /// The option name as it appears in the JSON input.
        option: &'static str,
        message: String,
    },

    /// An asset that has no fallback could not be decoded.
    #[error(transparent)]
    AssetDecode(#[from] AssetDecodeError),

    /// A drawing surface could not be allocated.
    #[error("failed to allocate {0}")]
    Surface(String),

    /// The composited card could not be encoded.
    #[error("failed to encode card: {0}")]
    Encode(#[from] image::ImageError),
}

impl CardError {
    pub fn configuration(option: &'static str, message: impl Into<String>) -> Self {
        Self::Configuration {
            option,
            message: message.into(),
        }
    }

    pub fn surface(what: impl Into<String>) -> Self {
        Self::Surface(what.into())
    }

    /// Returns the offending option name for configuration errors.
    pub fn option(&self) -> Option<&'static str> {
        match self {
            Self::Configuration { option, .. } => Some(*option),
            _ => None,
        }
    }
}

/// Failure to turn an [`ImageSource`](crate::ImageSource) into pixels.
///
/// Recoverable for the background, avatar and badges; fatal everywhere else.
#[derive(Debug, Error)]
pub enum AssetDecodeError {
    #[error("unsupported image source: {0}")]
    Unsupported(String),

    #[error("no asset registered for {0}")]
    Missing(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode image: {0}")]
    Image(#[from] image::ImageError),

    #[error("invalid base64 image data: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("failed to rasterize embedded asset {0}")]
    Svg(String),
}
