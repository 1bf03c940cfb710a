//! Multi-layer composition bindings.
//!
//! Layers are edited in JavaScript against a preview canvas. At export time a
//! `JsLayerStack` re-projects every transform onto the output canvas and
//! composites the result.

use crate::types::{filter_from_u8, to_js_error, JsPixelBuffer, JsRect};
use trimframe_core::{
    composite_layers, resolve_layer as core_resolve, LayerPlacement, LayerTransform, PixelBuffer,
};
use wasm_bindgen::prelude::*;

/// Transform of one layer in preview space.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsLayerTransform {
    inner: LayerTransform,
}

#[wasm_bindgen]
impl JsLayerTransform {
    /// Create an identity transform (visible, scale 1, centred, no crop)
    #[wasm_bindgen(constructor)]
    pub fn new() -> JsLayerTransform {
        Self {
            inner: LayerTransform::default(),
        }
    }

    #[wasm_bindgen(getter)]
    pub fn visible(&self) -> bool {
        self.inner.visible
    }

    #[wasm_bindgen(setter)]
    pub fn set_visible(&mut self, value: bool) {
        self.inner.visible = value;
    }

    #[wasm_bindgen(getter)]
    pub fn scale(&self) -> f64 {
        self.inner.scale
    }

    #[wasm_bindgen(setter)]
    pub fn set_scale(&mut self, value: f64) {
        self.inner.scale = value;
    }

    /// Horizontal offset from the canvas centre, in preview pixels
    #[wasm_bindgen(getter)]
    pub fn x(&self) -> f64 {
        self.inner.x
    }

    #[wasm_bindgen(setter)]
    pub fn set_x(&mut self, value: f64) {
        self.inner.x = value;
    }

    /// Vertical offset from the canvas centre, in preview pixels
    #[wasm_bindgen(getter)]
    pub fn y(&self) -> f64 {
        self.inner.y
    }

    #[wasm_bindgen(setter)]
    pub fn set_y(&mut self, value: f64) {
        self.inner.y = value;
    }

    /// Enable a percentage crop (each value 0 to 100)
    pub fn set_crop(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.inner.crop_enabled = true;
        self.inner.crop_x = x;
        self.inner.crop_y = y;
        self.inner.crop_width = width;
        self.inner.crop_height = height;
    }

    pub fn clear_crop(&mut self) {
        self.inner.crop_enabled = false;
    }

    #[wasm_bindgen(getter)]
    pub fn crop_enabled(&self) -> bool {
        self.inner.crop_enabled
    }

    /// Serialize to JSON for storage
    pub fn to_json(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Deserialize from JSON
    pub fn from_json(value: JsValue) -> Result<JsLayerTransform, JsValue> {
        let inner: LayerTransform =
            serde_wasm_bindgen::from_value(value).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self { inner })
    }
}

impl JsLayerTransform {
    pub(crate) fn from_core(inner: LayerTransform) -> Self {
        Self { inner }
    }

    pub(crate) fn inner(&self) -> &LayerTransform {
        &self.inner
    }
}

/// Resolved placement of one layer on the output canvas.
#[wasm_bindgen]
pub struct JsLayerPlacement {
    inner: LayerPlacement,
}

#[wasm_bindgen]
impl JsLayerPlacement {
    /// Position and final size on the output canvas
    pub fn placement(&self) -> JsRect {
        self.inner.placement.into()
    }

    /// Source region to draw, if the layer is cropped
    pub fn crop(&self) -> Option<JsRect> {
        self.inner.crop.map(JsRect::from)
    }

    #[wasm_bindgen(getter)]
    pub fn visible(&self) -> bool {
        self.inner.visible
    }
}

/// Resolve one layer's preview-space transform to output canvas pixels.
///
/// # Arguments
/// * `source_width`, `source_height` - Layer image size in pixels
/// * `transform` - Transform authored against the preview canvas
/// * `preview_canvas_size` - Edge length of the square preview canvas
/// * `output_canvas_size` - Edge length of the square output canvas
#[wasm_bindgen]
pub fn resolve_layer(
    source_width: u32,
    source_height: u32,
    transform: &JsLayerTransform,
    preview_canvas_size: u32,
    output_canvas_size: u32,
) -> Result<JsLayerPlacement, JsValue> {
    core_resolve(
        source_width,
        source_height,
        transform.inner(),
        preview_canvas_size,
        output_canvas_size,
    )
    .map(|inner| JsLayerPlacement { inner })
    .map_err(to_js_error)
}

/// An ordered stack of layers for export, bottom layer first.
///
/// # Example (TypeScript)
/// ```typescript
/// const stack = new JsLayerStack(400, 2048);
/// stack.add_layer(background, new JsLayerTransform());
/// stack.add_layer(logo, logoTransform);
/// const output = stack.render(2);
/// stack.free();
/// ```
#[wasm_bindgen]
pub struct JsLayerStack {
    preview_canvas_size: u32,
    output_canvas_size: u32,
    layers: Vec<(PixelBuffer, LayerPlacement)>,
}

#[wasm_bindgen]
impl JsLayerStack {
    #[wasm_bindgen(constructor)]
    pub fn new(preview_canvas_size: u32, output_canvas_size: u32) -> JsLayerStack {
        Self {
            preview_canvas_size,
            output_canvas_size,
            layers: Vec::new(),
        }
    }

    /// Number of layers added so far
    #[wasm_bindgen(getter)]
    pub fn length(&self) -> usize {
        self.layers.len()
    }

    /// Resolve a layer and push it on top of the stack.
    ///
    /// # Errors
    /// Returns an error for an invalid transform; the stack is left unchanged.
    pub fn add_layer(&mut self, image: &JsPixelBuffer, transform: &JsLayerTransform) -> Result<(), JsValue> {
        let buffer = image.inner();
        let placement = core_resolve(
            buffer.width(),
            buffer.height(),
            transform.inner(),
            self.preview_canvas_size,
            self.output_canvas_size,
        )
        .map_err(to_js_error)?;
        self.layers.push((buffer.clone(), placement));
        Ok(())
    }

    /// Placement of the layer at `index`
    pub fn placement(&self, index: usize) -> Option<JsLayerPlacement> {
        self.layers
            .get(index)
            .map(|(_, placement)| JsLayerPlacement { inner: *placement })
    }

    /// Composite all visible layers onto a transparent square canvas.
    ///
    /// # Arguments
    /// * `filter` - Resampling filter: 0=Nearest, 1=Bilinear, 2=Lanczos3
    pub fn render(&self, filter: u8) -> Result<JsPixelBuffer, JsValue> {
        let layers: Vec<(&PixelBuffer, LayerPlacement)> = self
            .layers
            .iter()
            .map(|(buffer, placement)| (buffer, *placement))
            .collect();
        composite_layers(&layers, self.output_canvas_size, filter_from_u8(filter))
            .map(JsPixelBuffer::from_core)
            .map_err(to_js_error)
    }
}
