//! Auto-trim and fit bindings.
//!
//! Trims transparent or background margins, then scales the remaining content
//! onto a fixed-size transparent canvas.

use crate::crop::JsCropOptions;
use crate::types::{filter_from_u8, to_js_error, JsPixelBuffer, JsRect};
use trimframe_core::{plan_trim_and_fit as core_plan, render_trim_fit, TrimFitPlan};
use wasm_bindgen::prelude::*;

/// Planned trim and placement, accessible from JavaScript.
#[wasm_bindgen]
pub struct JsTrimFitPlan {
    inner: TrimFitPlan,
}

#[wasm_bindgen]
impl JsTrimFitPlan {
    /// Region of the source that is kept
    pub fn source(&self) -> JsRect {
        self.inner.source.into()
    }

    /// Where the scaled region lands on the canvas
    pub fn placement(&self) -> JsRect {
        self.inner.placement.into()
    }

    /// Uniform scale factor from source region to placement
    #[wasm_bindgen(getter)]
    pub fn scale(&self) -> f64 {
        self.inner.scale
    }

    /// True when margins were actually trimmed
    #[wasm_bindgen(getter)]
    pub fn trimmed(&self) -> bool {
        self.inner.crop.is_crop()
    }

    /// Serialize the full plan to a plain object
    pub fn to_json(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

/// Plan a trim and fit without touching pixels.
///
/// # Arguments
/// * `image` - Source image
/// * `options` - Trim options (padding, tolerance 0 to 255, content ratio guard)
/// * `target_width`, `target_height` - Output canvas size
#[wasm_bindgen]
pub fn plan_trim_and_fit(
    image: &JsPixelBuffer,
    options: &JsCropOptions,
    target_width: u32,
    target_height: u32,
) -> Result<JsTrimFitPlan, JsValue> {
    core_plan(image.inner(), options.inner(), target_width, target_height)
        .map(|inner| JsTrimFitPlan { inner })
        .map_err(to_js_error)
}

/// Trim an image and render it centred on a transparent canvas.
///
/// # Arguments
/// * `image` - Source image
/// * `options` - Trim options
/// * `target_width`, `target_height` - Output canvas size
/// * `filter` - Resampling filter: 0=Nearest, 1=Bilinear, 2=Lanczos3
///
/// # Returns
/// RGBA image of exactly `target_width x target_height`.
///
/// # Example (TypeScript)
/// ```typescript
/// const options = new JsCropOptions();
/// options.padding = 8;
/// const tile = trim_and_fit(productShot, options, 512, 512, 2);
/// ```
#[wasm_bindgen]
pub fn trim_and_fit(
    image: &JsPixelBuffer,
    options: &JsCropOptions,
    target_width: u32,
    target_height: u32,
    filter: u8,
) -> Result<JsPixelBuffer, JsValue> {
    let plan = core_plan(image.inner(), options.inner(), target_width, target_height).map_err(to_js_error)?;
    render_trim_fit(image.inner(), &plan, filter_from_u8(filter))
        .map(JsPixelBuffer::from_core)
        .map_err(to_js_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block_image() -> JsPixelBuffer {
        // 20x20 transparent with an opaque 10x5 block at (5, 5)
        let mut pixels = Vec::with_capacity(20 * 20 * 4);
        for y in 0..20u32 {
            for x in 0..20u32 {
                let inside = (5..15).contains(&x) && (5..10).contains(&y);
                let px: [u8; 4] = if inside { [0, 200, 0, 255] } else { [0, 0, 0, 0] };
                pixels.extend_from_slice(&px);
            }
        }
        JsPixelBuffer::new(20, 20, pixels, true).unwrap()
    }

    #[test]
    fn test_plan_trim_and_fit() {
        let plan = plan_trim_and_fit(&block_image(), &JsCropOptions::new(), 100, 100).unwrap();
        assert!(plan.trimmed());
        assert_eq!(plan.scale(), 10.0);
        let source = plan.source();
        assert_eq!((source.left(), source.top(), source.width(), source.height()), (5, 5, 10, 5));
        let placement = plan.placement();
        assert_eq!(
            (placement.left(), placement.top(), placement.width(), placement.height()),
            (0, 25, 100, 50)
        );
    }

    #[test]
    fn test_trim_and_fit_output() {
        let out = trim_and_fit(&block_image(), &JsCropOptions::new(), 100, 100, 0).unwrap();
        assert_eq!((out.width(), out.height()), (100, 100));
        assert!(out.has_alpha());
        let pixels = out.pixels();
        // Centre pixel is content, top-left corner is transparent
        let centre = ((50 * 100 + 50) * 4) as usize;
        assert_eq!(&pixels[centre..centre + 4], &[0, 200, 0, 255]);
        assert_eq!(pixels[3], 0);
    }
}
