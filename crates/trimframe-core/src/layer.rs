//! Layer placement for multi-layer composition.
//!
//! The interactive client edits each layer against a fixed-size preview
//! canvas. At export time the same transform must land in the same relative
//! spot on an output canvas of a different size, so scale and offsets are
//! re-projected from preview space to output space.
//!
//! # Coordinate System
//!
//! - `x`/`y` are offsets of the layer centre from the canvas centre, in
//!   preview pixels
//! - `scale` is relative to the source pixel size as shown in the preview
//! - Crop values are percentages (0 to 100) of the source image

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{EngineError, Result};
use crate::Rect;

/// User-facing transform of one layer, in preview space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayerTransform {
    pub visible: bool,
    /// Scale factor (> 0)
    pub scale: f64,
    /// Horizontal offset from canvas centre (preview pixels)
    pub x: f64,
    /// Vertical offset from canvas centre (preview pixels)
    pub y: f64,
    pub crop_enabled: bool,
    /// Crop left edge (0 to 100, percent of source width)
    pub crop_x: f64,
    /// Crop top edge (0 to 100, percent of source height)
    pub crop_y: f64,
    /// Crop width (0 to 100, percent of source width)
    pub crop_width: f64,
    /// Crop height (0 to 100, percent of source height)
    pub crop_height: f64,
}

impl Default for LayerTransform {
    fn default() -> Self {
        Self {
            visible: true,
            scale: 1.0,
            x: 0.0,
            y: 0.0,
            crop_enabled: false,
            crop_x: 0.0,
            crop_y: 0.0,
            crop_width: 100.0,
            crop_height: 100.0,
        }
    }
}

impl LayerTransform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn validate(&self) -> Result<()> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(EngineError::InvalidLayerTransform(format!(
                "scale must be positive, got {}",
                self.scale
            )));
        }
        if !self.x.is_finite() || !self.y.is_finite() {
            return Err(EngineError::InvalidLayerTransform(
                "position must be finite".to_string(),
            ));
        }
        if self.crop_enabled {
            let percents = [
                ("crop_x", self.crop_x),
                ("crop_y", self.crop_y),
                ("crop_width", self.crop_width),
                ("crop_height", self.crop_height),
            ];
            for (name, value) in percents {
                if !value.is_finite() || !(0.0..=100.0).contains(&value) {
                    return Err(EngineError::InvalidLayerTransform(format!(
                        "{name} must be between 0 and 100, got {value}"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Absolute placement of a layer on the output canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerPlacement {
    /// Region of the source to use, when the layer is cropped
    pub crop: Option<Rect>,
    /// Position and final size on the output canvas
    pub placement: Rect,
    pub visible: bool,
}

/// Resolve one layer's preview-space transform to output canvas pixels.
///
/// # Arguments
/// * `source_width`, `source_height` - Layer image size in pixels
/// * `transform` - Transform authored in preview space
/// * `preview_canvas_size` - Edge length of the (square) preview canvas
/// * `output_canvas_size` - Edge length of the (square) output canvas
///
/// # Algorithm
/// 1. Convert the percentage crop to source pixels, clamped to the source.
/// 2. `effective_scale = scale * output / preview`; the final size is the
///    cropped size times that, capped at the canvas size.
/// 3. Centre = canvas centre + offset re-projected to output space; the top
///    left corner is clamped so the layer stays on the canvas.
pub fn resolve_layer(
    source_width: u32,
    source_height: u32,
    transform: &LayerTransform,
    preview_canvas_size: u32,
    output_canvas_size: u32,
) -> Result<LayerPlacement> {
    if source_width == 0 || source_height == 0 {
        return Err(EngineError::InvalidDimensions {
            width: source_width,
            height: source_height,
        });
    }
    if preview_canvas_size == 0 || output_canvas_size == 0 {
        return Err(EngineError::InvalidDimensions {
            width: preview_canvas_size,
            height: output_canvas_size,
        });
    }
    transform.validate()?;

    let crop = transform
        .crop_enabled
        .then(|| percent_crop(source_width, source_height, transform));
    let (base_width, base_height) = crop.map_or((source_width, source_height), |r| (r.width, r.height));

    let output = output_canvas_size as f64;
    let ratio = preview_canvas_size as f64 / output;
    let effective_scale = transform.scale / ratio;
    let final_width = scaled_dimension(base_width, effective_scale, output_canvas_size);
    let final_height = scaled_dimension(base_height, effective_scale, output_canvas_size);

    let position_scale = output / preview_canvas_size as f64;
    let center_x = output / 2.0 + transform.x * position_scale;
    let center_y = output / 2.0 + transform.y * position_scale;
    let left = clamp_offset(center_x - final_width as f64 / 2.0, output_canvas_size - final_width);
    let top = clamp_offset(center_y - final_height as f64 / 2.0, output_canvas_size - final_height);

    let placement = Rect::new(left, top, final_width, final_height)
        .ensure_within(output_canvas_size, output_canvas_size)?;

    debug!(
        ?crop,
        ?placement,
        effective_scale,
        "Resolved layer placement"
    );
    Ok(LayerPlacement {
        crop,
        placement,
        visible: transform.visible,
    })
}

/// Resolve a stack of layers, bottom first.
///
/// Each entry is `(source_width, source_height, transform)`. The stack fails
/// as a whole if any layer fails, since all layers share one output image.
pub fn resolve_layers(
    layers: &[(u32, u32, LayerTransform)],
    preview_canvas_size: u32,
    output_canvas_size: u32,
) -> Result<Vec<LayerPlacement>> {
    layers
        .iter()
        .map(|(width, height, transform)| {
            resolve_layer(*width, *height, transform, preview_canvas_size, output_canvas_size)
        })
        .collect()
}

/// Convert percentage crop values to a source rectangle of at least 1x1.
fn percent_crop(source_width: u32, source_height: u32, transform: &LayerTransform) -> Rect {
    let (left, width) = percent_span(source_width, transform.crop_x, transform.crop_width);
    let (top, height) = percent_span(source_height, transform.crop_y, transform.crop_height);
    Rect::new(left, top, width, height)
}

fn percent_span(dimension: u32, start_percent: f64, size_percent: f64) -> (u32, u32) {
    let dim = dimension as f64;
    let start = (start_percent * dim / 100.0).round().clamp(0.0, dim - 1.0) as u32;
    let size = (size_percent * dim / 100.0)
        .round()
        .clamp(1.0, (dimension - start) as f64) as u32;
    (start, size)
}

#[inline]
fn scaled_dimension(dimension: u32, scale: f64, canvas: u32) -> u32 {
    (dimension as f64 * scale).round().clamp(1.0, canvas as f64) as u32
}

#[inline]
fn clamp_offset(offset: f64, max: u32) -> u32 {
    offset.round().clamp(0.0, max as f64) as u32
}
