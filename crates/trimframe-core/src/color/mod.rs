//! Color statistics and color matching.
//!
//! [`analyze_profile`] summarises an image as mean saturation, brightness,
//! contrast and channel averages. [`calculate_adjustment`] compares two
//! profiles and produces multipliers that pull one image toward the other.
//! The multipliers are meant for an external modulate primitive
//! (brightness/saturation/hue).

pub mod adjustment;
pub mod profile;

pub use adjustment::{calculate_adjustment, match_batch, ColorAdjustment};
pub use profile::{analyze_profile, ColorProfile, MAX_PROFILE_SAMPLES};
