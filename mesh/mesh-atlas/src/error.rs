//! Error types for texture atlas operations.

use mesh_scan::ScanError;
use thiserror::Error;

/// Result type for atlas operations.
pub type AtlasResult<T> = Result<T, AtlasError>;

/// Errors that can occur while building texture atlases.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AtlasError {
    /// Colour raster and colour mask disagree in size.
    #[error("{what} is {actual:?}, expected {expected:?}")]
    ShapeMismatch {
        /// What was being compared.
        what: &'static str,
        /// Expected `(width, height)`.
        expected: (usize, usize),
        /// Actual `(width, height)`.
        actual: (usize, usize),
    },

    /// Raw RGBA bytes do not fill `width * height * 4`.
    #[error("{actual} bytes cannot hold a {width}x{height} RGBA image")]
    PixelBufferSize {
        /// Image width.
        width: u32,
        /// Image height.
        height: u32,
        /// Bytes supplied.
        actual: usize,
    },

    /// The texture has zero width or height.
    #[error("texture is empty")]
    EmptyTexture,

    /// Pixel rounding interval of zero.
    #[error("pixel interval must be at least 1")]
    InvalidInterval,

    /// PNG encoding failed.
    #[error("failed to encode atlas: {0}")]
    Encode(String),

    /// Colour mask processing failed.
    #[error(transparent)]
    Scan(#[from] ScanError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = AtlasError::ShapeMismatch {
            what: "colour mask",
            expected: (4, 2),
            actual: (2, 2),
        };
        assert_eq!(err.to_string(), "colour mask is (2, 2), expected (4, 2)");

        let err = AtlasError::PixelBufferSize {
            width: 2,
            height: 2,
            actual: 3,
        };
        assert_eq!(err.to_string(), "3 bytes cannot hold a 2x2 RGBA image");
    }
}
