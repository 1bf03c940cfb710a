//! Auto-trim and fit onto a fixed-size canvas.
//!
//! Trims transparent or background margins with the smart crop planner, then
//! scales the trimmed region uniformly to fit a `target_width x
//! target_height` canvas and centres it. The content keeps its proportions
//! even though every output has the same canvas size.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::buffer::PixelBuffer;
use crate::crop::{smart_crop, CropOptions, CropPlan};
use crate::error::{EngineError, Result};
use crate::Rect;

/// Everything needed to render a trimmed, centred image on a blank canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrimFitPlan {
    /// Outcome of the trim step
    pub crop: CropPlan,
    /// Region of the source to extract (full image when nothing was trimmed)
    pub source: Rect,
    /// Where the scaled region lands on the canvas
    pub placement: Rect,
    /// Uniform scale factor from source region to placement
    pub scale: f64,
    pub canvas_width: u32,
    pub canvas_height: u32,
}

/// Trim a buffer and plan its placement on a fixed-size canvas.
///
/// # Errors
/// `InvalidDimensions` for a zero-sized target, plus any error from
/// [`smart_crop`].
pub fn plan_trim_and_fit(
    buffer: &PixelBuffer,
    options: &CropOptions,
    target_width: u32,
    target_height: u32,
) -> Result<TrimFitPlan> {
    if target_width == 0 || target_height == 0 {
        return Err(EngineError::InvalidDimensions {
            width: target_width,
            height: target_height,
        });
    }

    let crop = smart_crop(buffer, options)?;
    let source = crop.rect_or_full(buffer.width(), buffer.height());
    let (placement, scale) = fit_centered(source.width, source.height, target_width, target_height);

    debug!(?source, ?placement, scale, "Planned trim and fit");
    Ok(TrimFitPlan {
        crop,
        source,
        placement,
        scale,
        canvas_width: target_width,
        canvas_height: target_height,
    })
}

/// Scale a `width x height` region uniformly to fit the canvas and centre it.
///
/// Returns the placement rectangle and the scale factor. Both inputs must be
/// non-zero.
pub fn fit_centered(width: u32, height: u32, canvas_width: u32, canvas_height: u32) -> (Rect, f64) {
    let scale = (canvas_width as f64 / width as f64).min(canvas_height as f64 / height as f64);
    let scaled_width = (width as f64 * scale).round().clamp(1.0, canvas_width as f64) as u32;
    let scaled_height = (height as f64 * scale).round().clamp(1.0, canvas_height as f64) as u32;

    let offset_x = ((canvas_width - scaled_width) as f64 / 2.0).round() as u32;
    let offset_y = ((canvas_height - scaled_height) as f64 / 2.0).round() as u32;

    (Rect::new(offset_x, offset_y, scaled_width, scaled_height), scale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crop::UnchangedReason;
    use crate::test_support::{solid_rgb, transparent_with_block};

    #[test]
    fn test_trim_then_fit_wide_content() {
        let buf = transparent_with_block(100, 100, Rect::new(10, 10, 20, 10));
        let plan = plan_trim_and_fit(&buf, &CropOptions::new(), 200, 200).unwrap();

        assert_eq!(plan.source, Rect::new(10, 10, 20, 10));
        assert_eq!(plan.scale, 10.0);
        assert_eq!(plan.placement, Rect::new(0, 50, 200, 100));
        assert_eq!((plan.canvas_width, plan.canvas_height), (200, 200));
    }

    #[test]
    fn test_trim_then_fit_downscales() {
        let buf = transparent_with_block(400, 400, Rect::new(0, 100, 400, 200));
        let plan = plan_trim_and_fit(&buf, &CropOptions::new(), 100, 100).unwrap();

        assert_eq!(plan.scale, 0.25);
        assert_eq!(plan.placement, Rect::new(0, 25, 100, 50));
    }

    #[test]
    fn test_padding_is_part_of_trimmed_region() {
        let buf = transparent_with_block(100, 100, Rect::new(40, 40, 20, 20));
        let plan = plan_trim_and_fit(&buf, &CropOptions::with_padding(10), 80, 80).unwrap();
        assert_eq!(plan.source, Rect::new(30, 30, 40, 40));
        assert_eq!(plan.placement, Rect::new(0, 0, 80, 80));
    }

    #[test]
    fn test_nothing_to_trim_fits_whole_image() {
        let buf = solid_rgb(50, 25, [1, 2, 3]);
        let plan = plan_trim_and_fit(&buf, &CropOptions::new(), 100, 100).unwrap();

        assert_eq!(
            plan.crop,
            CropPlan::Unchanged {
                reason: UnchangedReason::NoContent
            }
        );
        assert_eq!(plan.source, Rect::full(50, 25));
        assert_eq!(plan.placement, Rect::new(0, 25, 100, 50));
    }

    #[test]
    fn test_zero_target_rejected() {
        let buf = solid_rgb(4, 4, [0, 0, 0]);
        assert!(matches!(
            plan_trim_and_fit(&buf, &CropOptions::new(), 0, 10),
            Err(EngineError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_fit_centered_odd_slack_rounds() {
        // 3 pixels of slack split as round(1.5) = 2
        let (rect, _) = fit_centered(10, 10, 13, 10);
        assert_eq!(rect, Rect::new(2, 0, 10, 10));
    }
}
