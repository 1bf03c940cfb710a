//! Trimframe Core - Image geometry and color matching engine
//!
//! This crate turns decoded pixel buffers into geometry and color parameters:
//! content bounds, crop rectangles, canvas placements for layered
//! compositions, and color-matching multipliers. Pixel kernels (resize,
//! overlay) are delegated to the `image` crate through [`render`].
//!
//! # Pipeline
//!
//! ```text
//! PixelBuffer ─┬─> bounds ──> crop::smart ──> trim
//!              │              crop::aspect
//!              │              layer
//!              └─> color::profile ──> color::adjustment
//! ```
//!
//! Every operation is a pure function of its inputs. Independent images can
//! be processed concurrently with [`batch::process_batch`].

pub mod batch;
pub mod bounds;
pub mod buffer;
pub mod color;
pub mod crop;
pub mod error;
pub mod layer;
pub mod preset;
pub mod render;
pub mod trim;

pub use batch::{process_batch, BatchReport};
pub use bounds::{analyze_content_bounds, analyze_with_strategy, ContentBounds, DetectionStrategy};
pub use buffer::{Palette, PixelBuffer, PixelLayout};
pub use color::{
    analyze_profile, calculate_adjustment, match_batch, ColorAdjustment, ColorProfile,
};
pub use crop::{plan_aspect_crop, plan_crop, smart_crop, AspectCropSpec, CropOptions, CropPlan};
pub use error::{EngineError, Result};
pub use layer::{resolve_layer, resolve_layers, LayerPlacement, LayerTransform};
pub use preset::{LayerPreset, MemoryPresetStore, PresetStore};
pub use render::{composite_layers, extract, render_trim_fit, ResampleFilter};
pub use trim::{plan_trim_and_fit, TrimFitPlan};

use serde::{Deserialize, Serialize};

/// Axis-aligned pixel rectangle.
///
/// Used for crop regions in source space and placements in canvas space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge in pixels
    pub left: u32,
    /// Top edge in pixels
    pub top: u32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Rect {
    pub fn new(left: u32, top: u32, width: u32, height: u32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Rectangle covering a whole `width x height` area.
    pub fn full(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Exclusive right edge.
    #[inline]
    pub fn right(&self) -> u64 {
        self.left as u64 + self.width as u64
    }

    /// Exclusive bottom edge.
    #[inline]
    pub fn bottom(&self) -> u64 {
        self.top as u64 + self.height as u64
    }

    /// Area in pixels.
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Check that the rectangle is non-empty and lies inside a
    /// `bound_width x bound_height` area.
    pub fn fits_within(&self, bound_width: u32, bound_height: u32) -> bool {
        self.width > 0
            && self.height > 0
            && self.right() <= bound_width as u64
            && self.bottom() <= bound_height as u64
    }

    /// Return `Ok(self)` if the rectangle fits, `GeometryOutOfBounds` otherwise.
    pub fn ensure_within(self, bound_width: u32, bound_height: u32) -> Result<Self> {
        if self.fits_within(bound_width, bound_height) {
            Ok(self)
        } else {
            Err(EngineError::GeometryOutOfBounds {
                rect: self,
                bound_width,
                bound_height,
            })
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_edges() {
        let rect = Rect::new(10, 20, 30, 40);
        assert_eq!(rect.right(), 40);
        assert_eq!(rect.bottom(), 60);
        assert_eq!(rect.area(), 1200);
    }

    #[test]
    fn test_rect_fits_within() {
        assert!(Rect::new(0, 0, 100, 100).fits_within(100, 100));
        assert!(!Rect::new(1, 0, 100, 100).fits_within(100, 100));
        assert!(!Rect::new(0, 0, 0, 10).fits_within(100, 100));
    }

    #[test]
    fn test_rect_ensure_within_reports_bounds() {
        let err = Rect::new(50, 50, 60, 10).ensure_within(100, 100).unwrap_err();
        assert_eq!(
            err,
            EngineError::GeometryOutOfBounds {
                rect: Rect::new(50, 50, 60, 10),
                bound_width: 100,
                bound_height: 100,
            }
        );
    }

    #[test]
    fn test_rect_no_overflow_at_max() {
        let rect = Rect::new(u32::MAX, 0, u32::MAX, 1);
        assert!(!rect.fits_within(u32::MAX, 1));
    }
}
