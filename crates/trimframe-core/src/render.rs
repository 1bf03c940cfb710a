//! Apply planned geometry to pixels.
//!
//! The planners in this crate only produce rectangles. These helpers hand
//! them to the `image` crate's resize and overlay primitives so callers that
//! don't have their own codec can still produce output buffers. All
//! functions return new buffers without modifying the input.

use image::{imageops, RgbaImage};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::buffer::PixelBuffer;
use crate::error::{EngineError, Result};
use crate::layer::LayerPlacement;
use crate::trim::TrimFitPlan;
use crate::Rect;

/// Kernel used when scaling a cropped region onto its placement.
///
/// Placements are usually upscaled for exports and downscaled for previews,
/// so the choice trades edge sharpness against render time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResampleFilter {
    /// Copies the closest source pixel; keeps hard edges in pixel art and masks.
    Nearest,
    /// Linear blend of the four surrounding pixels; the preview default.
    #[default]
    Bilinear,
    /// Windowed sinc over a 6x6 neighbourhood; sharpest downscales for export.
    Lanczos3,
}

impl ResampleFilter {
    /// The `imageops` kernel that implements this filter.
    pub fn imageops_filter(self) -> imageops::FilterType {
        match self {
            Self::Nearest => imageops::FilterType::Nearest,
            Self::Bilinear => imageops::FilterType::Triangle,
            Self::Lanczos3 => imageops::FilterType::Lanczos3,
        }
    }
}

/// Copy a rectangular region into a new buffer with the same layout.
///
/// # Errors
/// `GeometryOutOfBounds` if `rect` is empty or extends past the buffer.
pub fn extract(buffer: &PixelBuffer, rect: Rect) -> Result<PixelBuffer> {
    let rect = rect.ensure_within(buffer.width(), buffer.height())?;

    // Fast path: full extraction returns a clone
    if rect == Rect::full(buffer.width(), buffer.height()) {
        return Ok(buffer.clone());
    }

    let channels = buffer.channels();
    let stride = buffer.width() as usize * channels;
    let row_len = rect.width as usize * channels;
    let mut output = Vec::with_capacity(row_len * rect.height as usize);

    // Copy pixel data row by row
    for y in rect.top..rect.top + rect.height {
        let start = y as usize * stride + rect.left as usize * channels;
        output.extend_from_slice(&buffer.data()[start..start + row_len]);
    }

    PixelBuffer::new(rect.width, rect.height, buffer.layout().clone(), output)
}

/// Render a [`TrimFitPlan`]: extract, scale and centre on a transparent canvas.
///
/// The output is always RGBA and exactly `canvas_width x canvas_height`.
pub fn render_trim_fit(buffer: &PixelBuffer, plan: &TrimFitPlan, filter: ResampleFilter) -> Result<PixelBuffer> {
    let region = extract(buffer, plan.source)?.to_rgba_image();
    let placement = plan.placement;
    let scaled = resize_region(&region, placement, filter);

    let mut canvas = RgbaImage::new(plan.canvas_width, plan.canvas_height);
    imageops::overlay(&mut canvas, &scaled, placement.left as i64, placement.top as i64);

    debug!(
        canvas_width = plan.canvas_width,
        canvas_height = plan.canvas_height,
        ?placement,
        "Rendered trimmed image"
    );
    PixelBuffer::rgba(plan.canvas_width, plan.canvas_height, canvas.into_raw())
}

/// Composite layers onto a transparent square canvas, bottom layer first.
///
/// Invisible layers are skipped. Each layer is cropped (when its placement
/// carries a crop), resized to its placement and alpha-blended over the
/// layers below it.
pub fn composite_layers(
    layers: &[(&PixelBuffer, LayerPlacement)],
    output_canvas_size: u32,
    filter: ResampleFilter,
) -> Result<PixelBuffer> {
    if output_canvas_size == 0 {
        return Err(EngineError::InvalidDimensions {
            width: output_canvas_size,
            height: output_canvas_size,
        });
    }

    let mut canvas = RgbaImage::new(output_canvas_size, output_canvas_size);
    for (buffer, layer) in layers.iter().filter(|(_, layer)| layer.visible) {
        let placement = layer
            .placement
            .ensure_within(output_canvas_size, output_canvas_size)?;
        let source = match layer.crop {
            Some(crop) => extract(buffer, crop)?.to_rgba_image(),
            None => buffer.to_rgba_image(),
        };
        let scaled = resize_region(&source, placement, filter);
        imageops::overlay(&mut canvas, &scaled, placement.left as i64, placement.top as i64);
    }

    debug!(layers = layers.len(), output_canvas_size, "Composited layers");
    PixelBuffer::rgba(output_canvas_size, output_canvas_size, canvas.into_raw())
}

fn resize_region(region: &RgbaImage, placement: Rect, filter: ResampleFilter) -> RgbaImage {
    if region.dimensions() == (placement.width, placement.height) {
        return region.clone();
    }
    imageops::resize(region, placement.width, placement.height, filter.imageops_filter())
}
