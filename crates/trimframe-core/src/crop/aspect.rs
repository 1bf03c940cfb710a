//! Fixed aspect ratio cropping.
//!
//! Computes the largest crop of a target aspect ratio that fits the source,
//! then slides it along the free axis by a 0-100% position. Position 0 is the
//! top-left-most crop, 100 the bottom-right-most, 50 centred.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{EngineError, Result};
use crate::Rect;

/// Target aspect ratio and focal position for [`plan_aspect_crop`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AspectCropSpec {
    /// Ratio numerator (e.g. 16 for 16:9)
    pub ratio_width: f64,
    /// Ratio denominator (e.g. 9 for 16:9)
    pub ratio_height: f64,
    /// Horizontal position of the crop (0 to 100)
    pub position_x: f64,
    /// Vertical position of the crop (0 to 100)
    pub position_y: f64,
}

impl Default for AspectCropSpec {
    fn default() -> Self {
        Self {
            ratio_width: 1.0,
            ratio_height: 1.0,
            position_x: 50.0,
            position_y: 50.0,
        }
    }
}

impl AspectCropSpec {
    /// Centred crop with the given ratio.
    pub fn new(ratio_width: f64, ratio_height: f64) -> Self {
        Self {
            ratio_width,
            ratio_height,
            ..Self::default()
        }
    }

    pub fn with_position(mut self, position_x: f64, position_y: f64) -> Self {
        self.position_x = position_x;
        self.position_y = position_y;
        self
    }

    /// Target width / height.
    pub fn ratio(&self) -> f64 {
        self.ratio_width / self.ratio_height
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [("ratio_width", self.ratio_width), ("ratio_height", self.ratio_height)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(EngineError::InvalidAspectRatio(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }
        for (name, value) in [("position_x", self.position_x), ("position_y", self.position_y)] {
            if !value.is_finite() || !(0.0..=100.0).contains(&value) {
                return Err(EngineError::InvalidAspectRatio(format!(
                    "{name} must be between 0 and 100, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Plan a crop of a fixed aspect ratio.
///
/// # Arguments
/// * `buffer_width`, `buffer_height` - Source dimensions in pixels
/// * `spec` - Target ratio and position
///
/// # Returns
/// The crop rectangle in source pixels.
///
/// # Errors
/// `InvalidAspectRatio` for a malformed spec, `InvalidDimensions` for an
/// empty source, `GeometryOutOfBounds` if the result doesn't fit.
///
/// # Example
/// ```
/// use trimframe_core::crop::{plan_aspect_crop, AspectCropSpec};
///
/// let rect = plan_aspect_crop(1920, 1080, &AspectCropSpec::new(1.0, 1.0)).unwrap();
/// assert_eq!((rect.left, rect.top, rect.width, rect.height), (420, 0, 1080, 1080));
/// ```
pub fn plan_aspect_crop(buffer_width: u32, buffer_height: u32, spec: &AspectCropSpec) -> Result<Rect> {
    spec.validate()?;
    if buffer_width == 0 || buffer_height == 0 {
        return Err(EngineError::InvalidDimensions {
            width: buffer_width,
            height: buffer_height,
        });
    }

    let target = spec.ratio();
    let (w, h) = (buffer_width as f64, buffer_height as f64);

    let (crop_width, crop_height) = if w / h > target {
        let crop_width = (h * target).round().clamp(1.0, w) as u32;
        (crop_width, buffer_height)
    } else {
        let crop_height = (w / target).round().clamp(1.0, h) as u32;
        (buffer_width, crop_height)
    };

    let max_x = buffer_width - crop_width;
    let max_y = buffer_height - crop_height;
    let x = position_offset(max_x, spec.position_x);
    let y = position_offset(max_y, spec.position_y);

    let rect = Rect::new(x, y, crop_width, crop_height).ensure_within(buffer_width, buffer_height)?;
    debug!(?rect, target, "Planned aspect ratio crop");
    Ok(rect)
}

/// Offset along an axis with `max` pixels of slack for a 0-100 position.
#[inline]
fn position_offset(max: u32, position: f64) -> u32 {
    (max as f64 * position / 100.0).round().clamp(0.0, max as f64) as u32
}
