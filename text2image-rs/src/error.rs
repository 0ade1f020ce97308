//! Error types for text2image-rs.

use thiserror::Error;

/// Result type alias using Text2ImageError.
pub type Text2ImageResult<T> = Result<T, Text2ImageError>;

/// Errors that can occur while rendering text images.
#[derive(Debug, Error)]
pub enum Text2ImageError {
    /// Malformed measure/color/ratio string or violated request invariant.
    #[error("Invalid argument: {0}")]
    Argument(String),

    /// Font resource missing or unreadable.
    #[error("Font error: {0}")]
    Font(String),

    /// Invalid canvas dimensions (must be positive and within limits).
    #[error("Invalid dimensions: width={width}, height={height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// Unexpected failure while compositing a text item.
    #[error("Render error: {0}")]
    Render(String),

    /// PNG encoding error.
    #[error("PNG encoding error: {0}")]
    Png(String),
}

impl From<png::EncodingError> for Text2ImageError {
    fn from(err: png::EncodingError) -> Self {
        Text2ImageError::Png(err.to_string())
    }
}
