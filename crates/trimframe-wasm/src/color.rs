//! Color profile and color matching bindings.

use crate::types::JsPixelBuffer;
use trimframe_core::{
    analyze_profile, calculate_adjustment, match_batch, ColorAdjustment, ColorProfile,
};
use wasm_bindgen::prelude::*;

/// Mean color statistics of an image.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy)]
pub struct JsColorProfile {
    inner: ColorProfile,
}

#[wasm_bindgen]
impl JsColorProfile {
    #[wasm_bindgen(getter)]
    pub fn saturation(&self) -> f64 {
        self.inner.saturation
    }

    #[wasm_bindgen(getter)]
    pub fn brightness(&self) -> f64 {
        self.inner.brightness
    }

    #[wasm_bindgen(getter)]
    pub fn contrast(&self) -> f64 {
        self.inner.contrast
    }

    #[wasm_bindgen(getter)]
    pub fn avg_red(&self) -> f64 {
        self.inner.avg_red
    }

    #[wasm_bindgen(getter)]
    pub fn avg_green(&self) -> f64 {
        self.inner.avg_green
    }

    #[wasm_bindgen(getter)]
    pub fn avg_blue(&self) -> f64 {
        self.inner.avg_blue
    }

    /// Serialize to JSON for caching reference profiles
    pub fn to_json(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Deserialize from JSON
    pub fn from_json(value: JsValue) -> Result<JsColorProfile, JsValue> {
        let inner: ColorProfile =
            serde_wasm_bindgen::from_value(value).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self { inner })
    }
}

/// Multipliers for a brightness/saturation/hue modulate operation.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy)]
pub struct JsColorAdjustment {
    inner: ColorAdjustment,
}

#[wasm_bindgen]
impl JsColorAdjustment {
    #[wasm_bindgen(getter)]
    pub fn saturation_multiplier(&self) -> f64 {
        self.inner.saturation_multiplier
    }

    #[wasm_bindgen(getter)]
    pub fn brightness_multiplier(&self) -> f64 {
        self.inner.brightness_multiplier
    }

    #[wasm_bindgen(getter)]
    pub fn hue_rotation_degrees(&self) -> f64 {
        self.inner.hue_rotation_degrees
    }

    /// Check if applying this adjustment would change nothing
    pub fn is_identity(&self) -> bool {
        self.inner.is_identity()
    }
}

/// Compute the color profile of an image.
///
/// Large images are sampled at a fixed stride, so this is cheap to call on
/// full-resolution data.
#[wasm_bindgen]
pub fn analyze_color_profile(image: &JsPixelBuffer) -> JsColorProfile {
    JsColorProfile {
        inner: analyze_profile(image.inner()),
    }
}

/// Compute the adjustment that moves `source` toward `target`.
///
/// # Arguments
/// * `source` - Profile of the image being adjusted
/// * `target` - Profile of the reference image
/// * `intensity` - Match strength in percent (100 = full match, up to 300
///   for an amplified match)
///
/// # Example (TypeScript)
/// ```typescript
/// const reference = analyze_color_profile(referenceImage);
/// const profile = analyze_color_profile(image);
/// const adj = calculate_color_adjustment(profile, reference, 100);
/// ctx.filter = `saturate(${adj.saturation_multiplier}) brightness(${adj.brightness_multiplier})`;
/// ```
#[wasm_bindgen]
pub fn calculate_color_adjustment(
    source: &JsColorProfile,
    target: &JsColorProfile,
    intensity: u32,
) -> JsColorAdjustment {
    JsColorAdjustment {
        inner: calculate_adjustment(&source.inner, &target.inner, intensity),
    }
}

/// Match several images to one reference in a single call.
///
/// # Returns
/// A flat Float64Array of `[saturation, brightness, hue]` triples, one per
/// target, in input order.
#[wasm_bindgen]
pub fn match_color_batch(reference: &JsPixelBuffer, targets: Vec<JsPixelBuffer>, intensity: u32) -> Vec<f64> {
    let reference = analyze_profile(reference.inner());
    let profiles: Vec<ColorProfile> = targets
        .iter()
        .map(|image| analyze_profile(image.inner()))
        .collect();

    match_batch(&reference, &profiles, intensity)
        .into_iter()
        .flat_map(|adj| {
            [
                adj.saturation_multiplier,
                adj.brightness_multiplier,
                adj.hue_rotation_degrees,
            ]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(r: u8, g: u8, b: u8) -> JsPixelBuffer {
        let pixels = [r, g, b].repeat(16);
        JsPixelBuffer::new(4, 4, pixels, false).unwrap()
    }

    #[test]
    fn test_analyze_color_profile() {
        let profile = analyze_color_profile(&solid(255, 0, 0));
        assert_eq!(profile.saturation(), 1.0);
        assert_eq!(profile.brightness(), 1.0);
        assert_eq!(profile.avg_red(), 1.0);
        assert_eq!(profile.avg_blue(), 0.0);
    }

    #[test]
    fn test_self_match_is_identity() {
        let profile = analyze_color_profile(&solid(120, 80, 40));
        let adj = calculate_color_adjustment(&profile, &profile, 100);
        assert!(adj.is_identity());
        assert_eq!(adj.hue_rotation_degrees(), 0.0);
    }

    #[test]
    fn test_brighter_reference_raises_brightness() {
        let dark = analyze_color_profile(&solid(50, 50, 50));
        let bright = analyze_color_profile(&solid(100, 100, 100));
        let adj = calculate_color_adjustment(&dark, &bright, 100);
        assert!((adj.brightness_multiplier() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_match_color_batch_triples() {
        let reference = solid(100, 100, 100);
        let targets = vec![solid(50, 50, 50), solid(100, 100, 100)];
        let values = match_color_batch(&reference, targets, 100);
        assert_eq!(values.len(), 6);
        assert!((values[1] - 2.0).abs() < 1e-9);
        assert_eq!(&values[3..], &[1.0, 1.0, 0.0]);
    }
}
