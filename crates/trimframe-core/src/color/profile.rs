//! Aggregate color statistics of an image.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::buffer::PixelBuffer;

/// Upper bound on the number of pixels sampled per profile.
pub const MAX_PROFILE_SAMPLES: usize = 10_000;

/// Mean color statistics of an image. All values are in 0.0 to 1.0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorProfile {
    /// Mean HSV saturation, `(max - min) / max`
    pub saturation: f64,
    /// Mean HSV value, `max`
    pub brightness: f64,
    /// Mean channel spread, `max - min`
    pub contrast: f64,
    pub avg_red: f64,
    pub avg_green: f64,
    pub avg_blue: f64,
}

/// Compute the color profile of a buffer.
///
/// Pixels are sampled at a fixed stride of `max(1, pixel_count / 10_000)`
/// so large images cost the same as small ones. Alpha is ignored; indexed
/// buffers are read through their palette.
///
/// # Example
/// ```
/// use trimframe_core::{analyze_profile, PixelBuffer};
///
/// let buffer = PixelBuffer::rgb(1, 1, vec![255, 0, 0]).unwrap();
/// let profile = analyze_profile(&buffer);
/// assert_eq!(profile.saturation, 1.0);
/// assert_eq!(profile.avg_red, 1.0);
/// ```
pub fn analyze_profile(buffer: &PixelBuffer) -> ColorProfile {
    let width = buffer.width() as usize;
    let total = buffer.pixel_count();
    let stride = (total / MAX_PROFILE_SAMPLES).max(1);

    let mut sums = ColorProfile::default();
    let mut samples = 0usize;

    for index in (0..total).step_by(stride) {
        let [r, g, b] = buffer.rgb_at((index % width) as u32, (index / width) as u32);
        let (r, g, b) = (r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0);

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);

        sums.saturation += if max > 0.0 { (max - min) / max } else { 0.0 };
        sums.brightness += max;
        sums.contrast += max - min;
        sums.avg_red += r;
        sums.avg_green += g;
        sums.avg_blue += b;
        samples += 1;
    }

    // PixelBuffer is never empty, so there is at least one sample
    let n = samples as f64;
    let profile = ColorProfile {
        saturation: sums.saturation / n,
        brightness: sums.brightness / n,
        contrast: sums.contrast / n,
        avg_red: sums.avg_red / n,
        avg_green: sums.avg_green / n,
        avg_blue: sums.avg_blue / n,
    };

    debug!(samples, stride, ?profile, "Analyzed color profile");
    profile
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: Every statistic stays in 0.0 to 1.0.
        #[test]
        fn prop_profile_normalized(
            (w, h, data) in (1u32..=64, 1u32..=64).prop_flat_map(|(w, h)| {
                (Just(w), Just(h), proptest::collection::vec(any::<u8>(), (w * h * 3) as usize))
            })
        ) {
            let profile = analyze_profile(&PixelBuffer::rgb(w, h, data).unwrap());
            for value in [
                profile.saturation,
                profile.brightness,
                profile.contrast,
                profile.avg_red,
                profile.avg_green,
                profile.avg_blue,
            ] {
                prop_assert!((0.0..=1.0 + 1e-12).contains(&value));
            }
            prop_assert!(profile.contrast <= profile.brightness + 1e-12);
        }
    }
}
