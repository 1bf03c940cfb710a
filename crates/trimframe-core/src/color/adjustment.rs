//! Color matching between two profiles.
//!
//! `intensity` is a percentage: 100 means "match the reference", 50 goes
//! half way, 0 changes nothing. Above 100 the delta is amplified
//! non-linearly so users can ask for a stronger-than-literal match, and
//! above 150 a contrast-driven boost is added to saturation. The results are
//! always clamped; there is no failure mode.
//!
//! ## Formula
//! ```text
//! ratio      = target / source
//! raw        = (ratio - 1) * intensity / 100
//! multiplier = 1 + raw                       (intensity <= 100)
//! multiplier = 1 + raw * (1 + extra * k)     (intensity > 100)
//!   extra = (intensity - 100) / 100, k = 1.5 saturation, 1.2 brightness
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::profile::ColorProfile;

/// Sources below this value are treated as zero and left unscaled.
const SOURCE_EPSILON: f64 = 1e-3;

const SATURATION_AMPLIFICATION: f64 = 1.5;
const BRIGHTNESS_AMPLIFICATION: f64 = 1.2;
const CONTRAST_BOOST_START: f64 = 150.0;
const CONTRAST_BOOST_WEIGHT: f64 = 0.3;

const SATURATION_RANGE: (f64, f64) = (0.1, 5.0);
const BRIGHTNESS_RANGE: (f64, f64) = (0.2, 3.0);

/// Multipliers for an external modulate primitive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorAdjustment {
    /// Saturation multiplier (0.1 to 5.0)
    pub saturation_multiplier: f64,
    /// Brightness multiplier (0.2 to 3.0)
    pub brightness_multiplier: f64,
    /// Hue rotation in degrees (currently always 0)
    pub hue_rotation_degrees: f64,
}

impl Default for ColorAdjustment {
    fn default() -> Self {
        Self::identity()
    }
}

impl ColorAdjustment {
    /// Adjustment that leaves the image unchanged.
    pub fn identity() -> Self {
        Self {
            saturation_multiplier: 1.0,
            brightness_multiplier: 1.0,
            hue_rotation_degrees: 0.0,
        }
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }
}

/// Compute the adjustment that moves `source` toward `target`.
///
/// # Arguments
/// * `source` - Profile of the image being adjusted
/// * `target` - Profile of the reference image
/// * `intensity` - Match strength in percent (100 = full match)
///
/// # Example
/// ```
/// use trimframe_core::color::{calculate_adjustment, ColorProfile};
///
/// let source = ColorProfile { saturation: 0.2, brightness: 0.5, ..Default::default() };
/// let target = ColorProfile { saturation: 0.4, brightness: 0.5, ..Default::default() };
/// let adj = calculate_adjustment(&source, &target, 100);
/// assert_eq!(adj.saturation_multiplier, 2.0);
/// ```
pub fn calculate_adjustment(source: &ColorProfile, target: &ColorProfile, intensity: u32) -> ColorAdjustment {
    let strength = intensity as f64 / 100.0;
    let extra = if intensity > 100 {
        Some((intensity - 100) as f64 / 100.0)
    } else {
        None
    };

    let multiplier = |source: f64, target: f64, amplification: f64| {
        let raw = (guarded_ratio(target, source) - 1.0) * strength;
        match extra {
            Some(extra) => 1.0 + raw * (1.0 + extra * amplification),
            None => 1.0 + raw,
        }
    };

    let mut saturation = multiplier(source.saturation, target.saturation, SATURATION_AMPLIFICATION);
    let brightness = multiplier(source.brightness, target.brightness, BRIGHTNESS_AMPLIFICATION);

    if intensity as f64 > CONTRAST_BOOST_START && target.contrast > source.contrast {
        let contrast_ratio = guarded_ratio(target.contrast, source.contrast);
        let ramp = (intensity as f64 - CONTRAST_BOOST_START) / CONTRAST_BOOST_START;
        saturation *= 1.0 + (contrast_ratio - 1.0) * ramp * CONTRAST_BOOST_WEIGHT;
    }

    let adjustment = ColorAdjustment {
        saturation_multiplier: clamp_finite(saturation, SATURATION_RANGE),
        brightness_multiplier: clamp_finite(brightness, BRIGHTNESS_RANGE),
        hue_rotation_degrees: 0.0,
    };
    debug!(intensity, ?adjustment, "Calculated color adjustment");
    adjustment
}

/// Match every target profile to one reference profile.
pub fn match_batch(reference: &ColorProfile, targets: &[ColorProfile], intensity: u32) -> Vec<ColorAdjustment> {
    targets
        .iter()
        .map(|profile| calculate_adjustment(profile, reference, intensity))
        .collect()
}

#[inline]
fn guarded_ratio(target: f64, source: f64) -> f64 {
    if source < SOURCE_EPSILON {
        1.0
    } else {
        target / source
    }
}

#[inline]
fn clamp_finite(value: f64, (min, max): (f64, f64)) -> f64 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        1.0
    }
}
