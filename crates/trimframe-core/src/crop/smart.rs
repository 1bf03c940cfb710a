//! Content-centered ("smart") cropping.
//!
//! Expands detected content bounds by a configurable padding and clamps the
//! result to the buffer. Padding is clamped at the buffer edges rather than
//! re-centred, so content near an edge ends up with asymmetric padding
//! instead of being pushed off-canvas.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bounds::{analyze_content_bounds, ContentBounds};
use crate::buffer::PixelBuffer;
use crate::error::{EngineError, Result};
use crate::Rect;

/// Options for content-centered cropping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CropOptions {
    /// Uniform padding applied to every side (pixels)
    pub padding: u32,
    /// Top padding override
    pub padding_top: Option<u32>,
    /// Right padding override
    pub padding_right: Option<u32>,
    /// Bottom padding override
    pub padding_bottom: Option<u32>,
    /// Left padding override
    pub padding_left: Option<u32>,
    /// Detection threshold (0-255)
    pub tolerance: u8,
    /// Minimum share of the image the content must cover (0.0 to 1.0)
    pub min_content_ratio: f64,
}

impl Default for CropOptions {
    fn default() -> Self {
        Self {
            padding: 0,
            padding_top: None,
            padding_right: None,
            padding_bottom: None,
            padding_left: None,
            tolerance: 10,
            min_content_ratio: 0.0,
        }
    }
}

/// Padding for each side after overrides are applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Padding {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

impl CropOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options with the same padding on every side.
    pub fn with_padding(padding: u32) -> Self {
        Self {
            padding,
            ..Self::default()
        }
    }

    /// Resolve per-side padding, falling back to the uniform value.
    pub fn resolved_padding(&self) -> Padding {
        Padding {
            top: self.padding_top.unwrap_or(self.padding),
            right: self.padding_right.unwrap_or(self.padding),
            bottom: self.padding_bottom.unwrap_or(self.padding),
            left: self.padding_left.unwrap_or(self.padding),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.min_content_ratio.is_finite() || !(0.0..=1.0).contains(&self.min_content_ratio) {
            return Err(EngineError::InvalidCropOptions(format!(
                "min_content_ratio must be between 0 and 1, got {}",
                self.min_content_ratio
            )));
        }
        Ok(())
    }
}

/// Why a crop plan leaves the image untouched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum UnchangedReason {
    /// No foreground pixel was detected.
    NoContent,
    /// Content covers less of the image than `min_content_ratio`.
    InsufficientContent { ratio: f64 },
}

/// Outcome of content-centered crop planning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum CropPlan {
    /// Extract this rectangle.
    Crop { rect: Rect },
    /// Use the original buffer unchanged.
    Unchanged { reason: UnchangedReason },
}

impl CropPlan {
    pub fn is_crop(&self) -> bool {
        matches!(self, CropPlan::Crop { .. })
    }

    /// The crop rectangle, or the full `width x height` area for a no-op plan.
    pub fn rect_or_full(&self, width: u32, height: u32) -> Rect {
        match self {
            CropPlan::Crop { rect } => *rect,
            CropPlan::Unchanged { .. } => Rect::full(width, height),
        }
    }
}

/// Plan a padded crop around detected content.
///
/// # Arguments
/// * `buffer_width`, `buffer_height` - Dimensions of the analyzed buffer
/// * `bounds` - Content bounds for that buffer
/// * `options` - Padding and content ratio guard
///
/// # Returns
/// `CropPlan::Unchanged` when there is no content or too little of it,
/// otherwise the padded rectangle clamped to the buffer.
///
/// # Errors
/// `InvalidCropOptions` for a malformed ratio, `InvalidDimensions` for an
/// empty buffer and `GeometryOutOfBounds` when the bounds don't belong to a
/// buffer of this size.
pub fn plan_crop(
    buffer_width: u32,
    buffer_height: u32,
    bounds: &ContentBounds,
    options: &CropOptions,
) -> Result<CropPlan> {
    options.validate()?;
    if buffer_width == 0 || buffer_height == 0 {
        return Err(EngineError::InvalidDimensions {
            width: buffer_width,
            height: buffer_height,
        });
    }

    if !bounds.has_content {
        return Ok(CropPlan::Unchanged {
            reason: UnchangedReason::NoContent,
        });
    }
    let content = bounds.rect().ensure_within(buffer_width, buffer_height)?;

    let ratio = content.area() as f64 / (buffer_width as u64 * buffer_height as u64) as f64;
    if ratio < options.min_content_ratio {
        debug!(ratio, min = options.min_content_ratio, "Content too small to crop");
        return Ok(CropPlan::Unchanged {
            reason: UnchangedReason::InsufficientContent { ratio },
        });
    }

    let pad = options.resolved_padding();
    let left = content.left.saturating_sub(pad.left);
    let top = content.top.saturating_sub(pad.top);
    let width = (content.width as u64 + pad.left as u64 + pad.right as u64).min((buffer_width - left) as u64);
    let height = (content.height as u64 + pad.top as u64 + pad.bottom as u64).min((buffer_height - top) as u64);

    let rect = Rect::new(left, top, width as u32, height as u32).ensure_within(buffer_width, buffer_height)?;
    debug!(?rect, "Planned content crop");
    Ok(CropPlan::Crop { rect })
}

/// Detect content and plan a padded crop in one call.
///
/// Options are validated before the buffer is scanned.
pub fn smart_crop(buffer: &PixelBuffer, options: &CropOptions) -> Result<CropPlan> {
    options.validate()?;
    let bounds = analyze_content_bounds(buffer, options.tolerance);
    plan_crop(buffer.width(), buffer.height(), &bounds, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{opaque_with_block, solid_rgb, transparent_with_block};

    fn bounds_at(left: u32, top: u32, width: u32, height: u32) -> ContentBounds {
        let buf = transparent_with_block(left + width + 1, top + height + 1, Rect::new(left, top, width, height));
        analyze_content_bounds(&buf, 0)
    }

    #[test]
    fn test_centered_content_scenario() {
        let buf = opaque_with_block(1000, 800, [255, 255, 255], [30, 30, 30], Rect::new(400, 350, 200, 100));
        let plan = smart_crop(&buf, &CropOptions::with_padding(20)).unwrap();
        assert_eq!(
            plan,
            CropPlan::Crop {
                rect: Rect::new(380, 330, 240, 140)
            }
        );
    }

    #[test]
    fn test_padding_clamped_at_edges() {
        let buf = transparent_with_block(100, 100, Rect::new(5, 90, 10, 10));
        let plan = smart_crop(&buf, &CropOptions::with_padding(20)).unwrap();
        // Left and bottom padding are cut by the buffer edges; the width keeps
        // the full padding budget so the right side absorbs the difference
        assert_eq!(
            plan,
            CropPlan::Crop {
                rect: Rect::new(0, 70, 50, 30)
            }
        );
    }

    #[test]
    fn test_per_side_padding_overrides() {
        let options = CropOptions {
            padding: 5,
            padding_top: Some(0),
            padding_left: Some(10),
            ..CropOptions::default()
        };
        assert_eq!(
            options.resolved_padding(),
            Padding {
                top: 0,
                right: 5,
                bottom: 5,
                left: 10
            }
        );

        let buf = transparent_with_block(100, 100, Rect::new(40, 40, 20, 20));
        let plan = smart_crop(&buf, &options).unwrap();
        assert_eq!(
            plan,
            CropPlan::Crop {
                rect: Rect::new(30, 40, 35, 25)
            }
        );
    }

    #[test]
    fn test_no_content_is_unchanged() {
        let buf = solid_rgb(20, 20, [9, 9, 9]);
        let plan = smart_crop(&buf, &CropOptions::with_padding(4)).unwrap();
        assert_eq!(
            plan,
            CropPlan::Unchanged {
                reason: UnchangedReason::NoContent
            }
        );
        assert_eq!(plan.rect_or_full(20, 20), Rect::full(20, 20));
    }

    #[test]
    fn test_insufficient_content_is_unchanged() {
        let buf = transparent_with_block(100, 100, Rect::new(10, 10, 2, 2));
        let options = CropOptions {
            min_content_ratio: 0.01,
            ..CropOptions::default()
        };
        let plan = smart_crop(&buf, &options).unwrap();
        assert!(matches!(
            plan,
            CropPlan::Unchanged {
                reason: UnchangedReason::InsufficientContent { ratio }
            } if (ratio - 0.0004).abs() < 1e-12
        ));
        assert!(!plan.is_crop());
    }

    #[test]
    fn test_invalid_ratio_rejected() {
        let buf = solid_rgb(4, 4, [0, 0, 0]);
        for ratio in [-0.1, 1.5, f64::NAN] {
            let options = CropOptions {
                min_content_ratio: ratio,
                ..CropOptions::default()
            };
            assert!(matches!(
                smart_crop(&buf, &options),
                Err(EngineError::InvalidCropOptions(_))
            ));
        }
    }

    #[test]
    fn test_bounds_from_other_buffer_rejected() {
        let bounds = bounds_at(50, 50, 20, 20);
        let err = plan_crop(60, 60, &bounds, &CropOptions::default()).unwrap_err();
        assert!(matches!(err, EngineError::GeometryOutOfBounds { .. }));
    }

    #[test]
    fn test_zero_padding_is_tight() {
        let bounds = bounds_at(3, 4, 5, 6);
        let plan = plan_crop(9, 11, &bounds, &CropOptions::new()).unwrap();
        assert_eq!(plan.rect_or_full(9, 11), Rect::new(3, 4, 5, 6));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::test_support::transparent_with_block;
    use proptest::prelude::*;

    fn scene_strategy() -> impl Strategy<Value = (u32, u32, Rect)> {
        (4u32..=60, 4u32..=60).prop_flat_map(|(w, h)| {
            (0..w, 0..h).prop_flat_map(move |(l, t)| {
                (1..=w - l, 1..=h - t).prop_map(move |(cw, ch)| (w, h, Rect::new(l, t, cw, ch)))
            })
        })
    }

    proptest! {
        /// Property: The crop stays inside the buffer and covers the content.
        #[test]
        fn prop_crop_within_buffer_and_covers_content(
            (w, h, block) in scene_strategy(),
            pads in proptest::array::uniform4(0u32..40),
        ) {
            let buf = transparent_with_block(w, h, block);
            let options = CropOptions {
                padding: pads[0],
                padding_top: Some(pads[1]),
                padding_right: Some(pads[2]),
                padding_bottom: Some(pads[3]),
                ..CropOptions::default()
            };
            let plan = smart_crop(&buf, &options).unwrap();
            let rect = plan.rect_or_full(w, h);

            prop_assert!(plan.is_crop());
            prop_assert!(rect.fits_within(w, h));
            prop_assert!(rect.width >= block.width);
            prop_assert!(rect.height >= block.height);
            prop_assert!(rect.left <= block.left && rect.top <= block.top);
            prop_assert!(rect.right() >= block.right() && rect.bottom() >= block.bottom());
        }
    }
}
