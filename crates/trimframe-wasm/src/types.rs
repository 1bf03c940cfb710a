//! WASM-compatible wrapper types for pixel buffers and rectangles.
//!
//! This module provides JavaScript-friendly types that wrap the core Trimframe
//! types, handling the conversion between Rust and JavaScript data
//! representations.

use trimframe_core::{EngineError, Palette, PixelBuffer, Rect, ResampleFilter};
use wasm_bindgen::prelude::*;

/// A decoded image held in WASM memory.
///
/// # Memory Management
///
/// The pixel data is stored in WASM memory. When you call `pixels()`, a copy is
/// made to JavaScript memory as a `Uint8Array`. Keep images in WASM memory
/// between engine calls and only extract pixels for display.
#[wasm_bindgen]
pub struct JsPixelBuffer {
    inner: PixelBuffer,
}

#[wasm_bindgen]
impl JsPixelBuffer {
    /// Create a buffer from RGB or RGBA pixel data.
    ///
    /// # Arguments
    /// * `width` - Image width in pixels
    /// * `height` - Image height in pixels
    /// * `pixels` - Row-major pixel data, 3 or 4 bytes per pixel
    /// * `has_alpha` - True for RGBA data, false for RGB
    ///
    /// # Errors
    /// Returns an error if the dimensions are zero or the data length doesn't
    /// match them.
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>, has_alpha: bool) -> Result<JsPixelBuffer, JsValue> {
        let inner = if has_alpha {
            PixelBuffer::rgba(width, height, pixels)
        } else {
            PixelBuffer::rgb(width, height, pixels)
        };
        inner.map(Self::from_core).map_err(to_js_error)
    }

    /// Create a palette-indexed buffer.
    ///
    /// # Arguments
    /// * `indices` - One palette index per pixel
    /// * `palette` - RGBA palette entries, 4 bytes each
    ///
    /// # Errors
    /// Returns an error if the palette length is not a multiple of 4, or the
    /// indices don't match the dimensions.
    pub fn indexed(width: u32, height: u32, indices: Vec<u8>, palette: &[u8]) -> Result<JsPixelBuffer, JsValue> {
        Palette::from_rgba_bytes(palette)
            .and_then(|palette| PixelBuffer::indexed(width, height, palette, indices))
            .map(Self::from_core)
            .map_err(to_js_error)
    }

    /// Get the image width in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width()
    }

    /// Get the image height in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height()
    }

    /// Bytes per pixel (1 for indexed, 3 for RGB, 4 for RGBA)
    #[wasm_bindgen(getter)]
    pub fn channels(&self) -> usize {
        self.inner.channels()
    }

    /// Whether pixels store a per-pixel alpha byte (RGBA only)
    #[wasm_bindgen(getter)]
    pub fn has_alpha(&self) -> bool {
        self.inner.has_alpha()
    }

    /// Get the number of bytes in the pixel buffer
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.inner.data().len()
    }

    /// Returns the raw pixel data as Uint8Array.
    ///
    /// Note: This creates a copy of the pixel data.
    pub fn pixels(&self) -> Vec<u8> {
        self.inner.data().to_vec()
    }
}

impl JsPixelBuffer {
    pub(crate) fn from_core(inner: PixelBuffer) -> Self {
        Self { inner }
    }

    pub(crate) fn inner(&self) -> &PixelBuffer {
        &self.inner
    }
}

/// A pixel rectangle returned to JavaScript.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsRect {
    inner: Rect,
}

#[wasm_bindgen]
impl JsRect {
    #[wasm_bindgen(getter)]
    pub fn left(&self) -> u32 {
        self.inner.left
    }

    #[wasm_bindgen(getter)]
    pub fn top(&self) -> u32 {
        self.inner.top
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height
    }
}

impl From<Rect> for JsRect {
    fn from(inner: Rect) -> Self {
        Self { inner }
    }
}

/// Convert a u8 filter type value to the core ResampleFilter enum.
///
/// Values:
/// - 0 = Nearest (fastest, lowest quality)
/// - 1 = Bilinear (good balance of speed and quality)
/// - 2 = Lanczos3 (best quality, slowest)
///
/// Any other value defaults to Bilinear.
pub(crate) fn filter_from_u8(value: u8) -> ResampleFilter {
    match value {
        0 => ResampleFilter::Nearest,
        2 => ResampleFilter::Lanczos3,
        _ => ResampleFilter::Bilinear,
    }
}

/// Narrow a JS number to a 0-255 detection tolerance.
///
/// wasm-bindgen would silently wrap a larger value passed as `u8`.
pub(crate) fn tolerance_from_u32(value: u32) -> Result<u8, EngineError> {
    u8::try_from(value).map_err(|_| {
        EngineError::InvalidCropOptions(format!("tolerance must be between 0 and 255, got {value}"))
    })
}

/// Map an engine error to a JavaScript error string.
pub(crate) fn to_js_error(err: EngineError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_buffer_creation() {
        let img = JsPixelBuffer::new(100, 50, vec![0u8; 100 * 50 * 3], false).unwrap();
        assert_eq!(img.width(), 100);
        assert_eq!(img.height(), 50);
        assert_eq!(img.channels(), 3);
        assert!(!img.has_alpha());
        assert_eq!(img.byte_length(), 15000);
    }

    #[test]
    fn test_rgba_buffer_pixels() {
        let pixels = vec![255u8, 128, 64, 0, 32, 16, 8, 255];
        let img = JsPixelBuffer::new(2, 1, pixels.clone(), true).unwrap();
        assert!(img.has_alpha());
        assert_eq!(img.pixels(), pixels);
    }

    #[test]
    fn test_indexed_buffer() {
        let palette = [0u8, 0, 0, 0, 255, 0, 0, 255];
        let img = JsPixelBuffer::indexed(2, 2, vec![0, 1, 1, 0], &palette).unwrap();
        assert_eq!(img.channels(), 1);
        assert!(!img.has_alpha());
        assert_eq!(img.inner().rgba_at(1, 0), [255, 0, 0, 255]);
    }

    #[test]
    fn test_tolerance_range() {
        assert_eq!(tolerance_from_u32(0), Ok(0));
        assert_eq!(tolerance_from_u32(255), Ok(255));
        assert!(matches!(
            tolerance_from_u32(256),
            Err(EngineError::InvalidCropOptions(_))
        ));
        assert!(tolerance_from_u32(u32::MAX).is_err());
    }

    #[test]
    fn test_rect_getters() {
        let rect = JsRect::from(Rect::new(1, 2, 3, 4));
        assert_eq!((rect.left(), rect.top(), rect.width(), rect.height()), (1, 2, 3, 4));
    }

    #[test]
    fn test_filter_from_u8() {
        assert_eq!(filter_from_u8(0), ResampleFilter::Nearest);
        assert_eq!(filter_from_u8(1), ResampleFilter::Bilinear);
        assert_eq!(filter_from_u8(2), ResampleFilter::Lanczos3);
        // Unknown values default to Bilinear
        assert_eq!(filter_from_u8(3), ResampleFilter::Bilinear);
        assert_eq!(filter_from_u8(255), ResampleFilter::Bilinear);
    }
}

/// WASM-specific tests that require JsValue.
///
/// Use `wasm-pack test` to run these.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_indexed_rejects_partial_palette_entry() {
        // 6 bytes: one full RGBA entry plus two stray bytes
        let palette = [0u8, 0, 0, 255, 9, 9];
        assert!(JsPixelBuffer::indexed(1, 1, vec![0], &palette).is_err());
    }

    #[wasm_bindgen_test]
    fn test_huge_dimensions_rejected() {
        // 32768 * 32768 * 4 overflows the 32-bit usize of wasm32
        assert!(JsPixelBuffer::new(32768, 32768, Vec::new(), true).is_err());
    }
}
