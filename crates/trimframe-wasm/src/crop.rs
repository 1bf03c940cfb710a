//! Content detection and crop planning bindings.
//!
//! These functions only compute geometry. Use the returned rectangles with a
//! canvas `drawImage` call, or with `render_trim_fit` for the trim workflow.

use crate::types::{to_js_error, tolerance_from_u32, JsPixelBuffer, JsRect};
use trimframe_core::{
    analyze_content_bounds as core_bounds, plan_aspect_crop as core_aspect,
    smart_crop as core_smart_crop, AspectCropSpec, ContentBounds, CropOptions, CropPlan,
};
use wasm_bindgen::prelude::*;

/// Detected content bounds accessible from JavaScript.
#[wasm_bindgen]
pub struct JsContentBounds {
    inner: ContentBounds,
}

#[wasm_bindgen]
impl JsContentBounds {
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

    #[wasm_bindgen(getter)]
    pub fn center_x(&self) -> f64 {
        self.inner.center_x
    }

    #[wasm_bindgen(getter)]
    pub fn center_y(&self) -> f64 {
        self.inner.center_y
    }

    /// False when nothing but background was found
    #[wasm_bindgen(getter)]
    pub fn has_content(&self) -> bool {
        self.inner.has_content
    }

    /// Serialize to a plain object (includes the detection strategy)
    pub fn to_json(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

/// Detect the bounding box of the foreground pixels.
///
/// # Arguments
/// * `image` - Image to analyze
/// * `tolerance` - Alpha threshold, or color distance from the background
///   (0 to 255)
///
/// # Errors
/// Returns an error if `tolerance` is above 255.
///
/// # Example (TypeScript)
/// ```typescript
/// const bounds = analyze_content_bounds(image, 10);
/// if (bounds.has_content) {
///   console.log(`Content at ${bounds.left},${bounds.top}`);
/// }
/// ```
#[wasm_bindgen]
pub fn analyze_content_bounds(image: &JsPixelBuffer, tolerance: u32) -> Result<JsContentBounds, JsValue> {
    let tolerance = tolerance_from_u32(tolerance).map_err(to_js_error)?;
    Ok(JsContentBounds {
        inner: core_bounds(image.inner(), tolerance),
    })
}

/// Smart crop options.
///
/// Mirrors `CropOptions` from the core crate. Per-side padding overrides are
/// set through `from_json`.
#[wasm_bindgen]
pub struct JsCropOptions {
    inner: CropOptions,
}

#[wasm_bindgen]
impl JsCropOptions {
    /// Create options with zero padding and a tolerance of 10
    #[wasm_bindgen(constructor)]
    pub fn new() -> JsCropOptions {
        Self {
            inner: CropOptions::default(),
        }
    }

    /// Get uniform padding in pixels
    #[wasm_bindgen(getter)]
    pub fn padding(&self) -> u32 {
        self.inner.padding
    }

    /// Set uniform padding in pixels
    #[wasm_bindgen(setter)]
    pub fn set_padding(&mut self, value: u32) {
        self.inner.padding = value;
    }

    /// Get detection tolerance
    #[wasm_bindgen(getter)]
    pub fn tolerance(&self) -> u8 {
        self.inner.tolerance
    }

    /// Set detection tolerance (0 to 255).
    ///
    /// Property assignment can't report errors, so out-of-range values are
    /// wrapped by wasm-bindgen. Use `try_set_tolerance` for a checked update.
    #[wasm_bindgen(setter)]
    pub fn set_tolerance(&mut self, value: u8) {
        self.inner.tolerance = value;
    }

    /// Set detection tolerance, rejecting values above 255
    pub fn try_set_tolerance(&mut self, value: u32) -> Result<(), JsValue> {
        self.inner.tolerance = tolerance_from_u32(value).map_err(to_js_error)?;
        Ok(())
    }

    /// Get minimum content ratio
    #[wasm_bindgen(getter)]
    pub fn min_content_ratio(&self) -> f64 {
        self.inner.min_content_ratio
    }

    /// Set minimum content ratio (0.0 to 1.0)
    #[wasm_bindgen(setter)]
    pub fn set_min_content_ratio(&mut self, value: f64) {
        self.inner.min_content_ratio = value;
    }

    /// Serialize to JSON for storage
    pub fn to_json(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Deserialize from JSON
    pub fn from_json(value: JsValue) -> Result<JsCropOptions, JsValue> {
        let inner: CropOptions =
            serde_wasm_bindgen::from_value(value).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self { inner })
    }
}

impl Default for JsCropOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl JsCropOptions {
    pub(crate) fn inner(&self) -> &CropOptions {
        &self.inner
    }
}

/// Result of smart crop planning.
#[wasm_bindgen]
pub struct JsCropPlan {
    plan: CropPlan,
    source_width: u32,
    source_height: u32,
}

#[wasm_bindgen]
impl JsCropPlan {
    /// True when the plan extracts a sub-rectangle
    #[wasm_bindgen(getter)]
    pub fn is_crop(&self) -> bool {
        self.plan.is_crop()
    }

    /// Region to extract; the full image when nothing should be cropped
    pub fn rect(&self) -> JsRect {
        self.plan.rect_or_full(self.source_width, self.source_height).into()
    }

    /// Serialize to a tagged plain object (`{ kind: "crop", rect }` or
    /// `{ kind: "unchanged", reason }`)
    pub fn to_json(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.plan).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

/// Plan a padded crop around the detected content.
///
/// # Example (TypeScript)
/// ```typescript
/// const options = new JsCropOptions();
/// options.padding = 20;
/// const plan = smart_crop(image, options);
/// const r = plan.rect();
/// ctx.drawImage(source, r.left, r.top, r.width, r.height, 0, 0, r.width, r.height);
/// ```
#[wasm_bindgen]
pub fn smart_crop(image: &JsPixelBuffer, options: &JsCropOptions) -> Result<JsCropPlan, JsValue> {
    let buffer = image.inner();
    let plan = core_smart_crop(buffer, options.inner()).map_err(to_js_error)?;
    Ok(JsCropPlan {
        plan,
        source_width: buffer.width(),
        source_height: buffer.height(),
    })
}

/// Plan the largest crop with a fixed aspect ratio.
///
/// # Arguments
/// * `width`, `height` - Source dimensions
/// * `ratio_width`, `ratio_height` - Target ratio, e.g. 16 and 9
/// * `position_x`, `position_y` - Focal position along each axis (0 to 100,
///   50 = centred)
#[wasm_bindgen]
pub fn plan_aspect_crop(
    width: u32,
    height: u32,
    ratio_width: f64,
    ratio_height: f64,
    position_x: f64,
    position_y: f64,
) -> Result<JsRect, JsValue> {
    let spec = AspectCropSpec::new(ratio_width, ratio_height).with_position(position_x, position_y);
    core_aspect(width, height, &spec)
        .map(JsRect::from)
        .map_err(to_js_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// RGBA image, transparent except for an opaque block.
    fn block_image(width: u32, height: u32, left: u32, top: u32, size: u32) -> JsPixelBuffer {
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                let inside = x >= left && x < left + size && y >= top && y < top + size;
                let alpha = if inside { 255 } else { 0 };
                pixels.extend_from_slice(&[10, 20, 30, alpha]);
            }
        }
        JsPixelBuffer::new(width, height, pixels, true).unwrap()
    }

    #[test]
    fn test_analyze_content_bounds() {
        let img = block_image(40, 30, 5, 8, 10);
        let bounds = analyze_content_bounds(&img, 10).unwrap();
        assert!(bounds.has_content());
        assert_eq!(
            (bounds.left(), bounds.top(), bounds.width(), bounds.height()),
            (5, 8, 10, 10)
        );
        assert_eq!(bounds.center_x(), 10.0);
        assert_eq!(bounds.center_y(), 13.0);
    }

    #[test]
    fn test_crop_options_defaults() {
        let options = JsCropOptions::new();
        assert_eq!(options.padding(), 0);
        assert_eq!(options.tolerance(), 10);
        assert_eq!(options.min_content_ratio(), 0.0);
    }

    #[test]
    fn test_crop_options_setters() {
        let mut options = JsCropOptions::new();
        options.set_padding(12);
        options.set_tolerance(40);
        options.set_min_content_ratio(0.25);
        assert_eq!(options.inner().padding, 12);
        assert_eq!(options.inner().tolerance, 40);
        assert_eq!(options.inner().min_content_ratio, 0.25);
    }

    #[test]
    fn test_try_set_tolerance_in_range() {
        let mut options = JsCropOptions::new();
        options.try_set_tolerance(200).unwrap();
        assert_eq!(options.tolerance(), 200);
        // Largest accepted threshold still finds fully opaque content
        let bounds = analyze_content_bounds(&block_image(4, 4, 0, 0, 2), 254).unwrap();
        assert_eq!((bounds.width(), bounds.height()), (2, 2));
    }

    #[test]
    fn test_smart_crop_with_padding() {
        let img = block_image(40, 30, 5, 8, 10);
        let mut options = JsCropOptions::new();
        options.set_padding(2);
        let plan = smart_crop(&img, &options).unwrap();
        assert!(plan.is_crop());
        let rect = plan.rect();
        assert_eq!((rect.left(), rect.top(), rect.width(), rect.height()), (3, 6, 14, 14));
    }

    #[test]
    fn test_smart_crop_empty_image_is_full_rect() {
        let img = JsPixelBuffer::new(6, 4, vec![0u8; 6 * 4 * 4], true).unwrap();
        let plan = smart_crop(&img, &JsCropOptions::new()).unwrap();
        assert!(!plan.is_crop());
        let rect = plan.rect();
        assert_eq!((rect.width(), rect.height()), (6, 4));
    }

    #[test]
    fn test_plan_aspect_crop_square() {
        let rect = plan_aspect_crop(1920, 1080, 1.0, 1.0, 50.0, 50.0).unwrap();
        assert_eq!((rect.left(), rect.top(), rect.width(), rect.height()), (420, 0, 1080, 1080));
    }

    #[test]
    fn test_plan_aspect_crop_position() {
        let rect = plan_aspect_crop(1920, 1080, 1.0, 1.0, 0.0, 50.0).unwrap();
        assert_eq!(rect.left(), 0);
        let rect = plan_aspect_crop(1920, 1080, 1.0, 1.0, 100.0, 50.0).unwrap();
        assert_eq!(rect.left(), 840);
    }
}
