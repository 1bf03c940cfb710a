//! Trimframe WASM - WebAssembly bindings for Trimframe
//!
//! This crate provides WASM bindings to expose the trimframe-core functionality
//! to JavaScript/TypeScript applications.
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible wrapper types for pixel buffers and rectangles
//! - `crop` - Content bounds, smart crop and aspect ratio crop planning
//! - `trim` - Auto-trim and fit onto a fixed-size canvas
//! - `layer` - Layer transforms, placement and compositing
//! - `color` - Color profiles and color matching
//! - `preset` - Named layer presets
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsPixelBuffer, JsCropOptions, smart_crop } from '@trimframe/wasm';
//!
//! await init();
//!
//! const data = ctx.getImageData(0, 0, width, height).data;
//! const image = new JsPixelBuffer(width, height, data, true);
//! const plan = smart_crop(image, new JsCropOptions());
//! ```

use wasm_bindgen::prelude::*;

mod color;
mod crop;
mod layer;
mod preset;
mod trim;
mod types;

// Re-export public types
pub use color::{
    analyze_color_profile, calculate_color_adjustment, match_color_batch, JsColorAdjustment,
    JsColorProfile,
};
pub use crop::{
    analyze_content_bounds, plan_aspect_crop, smart_crop, JsContentBounds, JsCropOptions,
    JsCropPlan,
};
pub use layer::{resolve_layer, JsLayerPlacement, JsLayerStack, JsLayerTransform};
pub use preset::{JsLayerPreset, JsPresetStore};
pub use trim::{plan_trim_and_fit, trim_and_fit, JsTrimFitPlan};
pub use types::{JsPixelBuffer, JsRect};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
