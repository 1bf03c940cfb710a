//! Error types for the geometry and color engine.

use thiserror::Error;

use crate::Rect;

/// Errors that can occur while analyzing or planning a single image.
///
/// Every variant is scoped to one image. Batch callers collect these per item
/// rather than aborting the whole batch.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// Width or height is zero.
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// Pixel data length doesn't match the declared dimensions and layout.
    #[error("Invalid pixel data: expected {expected} bytes, got {actual}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    /// A planned rectangle falls outside the area it must fit in.
    #[error("Rectangle {rect:?} exceeds bounds {bound_width}x{bound_height}")]
    GeometryOutOfBounds {
        rect: Rect,
        bound_width: u32,
        bound_height: u32,
    },

    /// Aspect ratio crop parameters are malformed.
    #[error("Invalid aspect ratio spec: {0}")]
    InvalidAspectRatio(String),

    /// Smart crop parameters are malformed.
    #[error("Invalid crop options: {0}")]
    InvalidCropOptions(String),

    /// Layer transform parameters are malformed.
    #[error("Invalid layer transform: {0}")]
    InvalidLayerTransform(String),

    /// An indexed pixel references a palette entry that doesn't exist.
    #[error("Palette index {index} out of range for palette of {palette_len} entries")]
    PaletteExpansion { index: u8, palette_len: usize },

    /// Packed palette bytes don't divide into RGBA entries.
    #[error("Invalid palette: {len} bytes is not a whole number of RGBA entries")]
    InvalidPalette { len: usize },

    /// Preset names must contain at least one non-whitespace character.
    #[error("Preset name must not be empty")]
    InvalidPresetName,
}

/// Result alias used throughout the engine.
pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EngineError::InvalidDimensions {
            width: 0,
            height: 10,
        };
        assert_eq!(
            err.to_string(),
            "Invalid dimensions: width (0) and height (10) must be non-zero"
        );

        let err = EngineError::BufferSizeMismatch {
            expected: 12,
            actual: 9,
        };
        assert_eq!(err.to_string(), "Invalid pixel data: expected 12 bytes, got 9");
    }

    #[test]
    fn test_palette_error_display() {
        let err = EngineError::PaletteExpansion {
            index: 7,
            palette_len: 4,
        };
        assert_eq!(
            err.to_string(),
            "Palette index 7 out of range for palette of 4 entries"
        );

        let err = EngineError::InvalidPalette { len: 6 };
        assert_eq!(
            err.to_string(),
            "Invalid palette: 6 bytes is not a whole number of RGBA entries"
        );
    }
}
