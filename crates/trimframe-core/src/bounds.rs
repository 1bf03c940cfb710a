//! Content bounds detection.
//!
//! Finds the tightest axis-aligned rectangle enclosing all foreground pixels
//! of a [`PixelBuffer`]. Three detectors are available and picked from the
//! buffer layout:
//!
//! 1. **Alpha**: RGBA buffers. Foreground when alpha > tolerance.
//! 2. **Indexed**: palette buffers are expanded to RGBA first. If the palette
//!    has transparent entries the alpha detector runs on the expansion,
//!    otherwise the background detector does. A failed expansion falls
//!    through to the background detector on the raw buffer.
//! 3. **Background distance**: opaque buffers. The background color is
//!    inferred from the four corners and a pixel is foreground when its
//!    Euclidean RGB distance from it exceeds the tolerance.
//!
//! All detectors share the same single pass over the buffer.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::buffer::{PixelBuffer, PixelLayout};
use crate::error::Result;
use crate::Rect;

/// Which detector produced a [`ContentBounds`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DetectionStrategy {
    Alpha,
    Indexed,
    BackgroundDistance,
}

/// Bounding box of the foreground pixels in a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentBounds {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
    pub center_x: f64,
    pub center_y: f64,
    /// False when no foreground pixel was found. The bounds then cover the
    /// whole buffer.
    pub has_content: bool,
    pub strategy: DetectionStrategy,
}

impl ContentBounds {
    fn from_extent(min_x: u32, min_y: u32, max_x: u32, max_y: u32, strategy: DetectionStrategy) -> Self {
        let width = max_x - min_x + 1;
        let height = max_y - min_y + 1;
        Self {
            left: min_x,
            top: min_y,
            width,
            height,
            center_x: min_x as f64 + width as f64 / 2.0,
            center_y: min_y as f64 + height as f64 / 2.0,
            has_content: true,
            strategy,
        }
    }

    fn empty(width: u32, height: u32, strategy: DetectionStrategy) -> Self {
        Self {
            left: 0,
            top: 0,
            width,
            height,
            center_x: width as f64 / 2.0,
            center_y: height as f64 / 2.0,
            has_content: false,
            strategy,
        }
    }

    /// The bounds as a rectangle.
    pub fn rect(&self) -> Rect {
        Rect::new(self.left, self.top, self.width, self.height)
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// Detect content bounds, choosing the detector from the buffer layout.
///
/// - `Rgba` uses the alpha detector.
/// - `Indexed` is expanded through its palette. The alpha detector runs on the
///   expansion only when some palette entry is translucent; a fully opaque
///   palette has no transparent pixels to find, so the expansion goes through
///   background distance instead (the result's `strategy` is then
///   `BackgroundDistance`). If expansion fails, background distance runs on
///   the raw buffer.
/// - `Rgb` uses background distance.
///
/// Use [`analyze_with_strategy`] to force the alpha detector on an indexed
/// buffer.
///
/// # Arguments
/// * `buffer` - Decoded pixels
/// * `tolerance` - Alpha threshold or RGB distance threshold (0-255)
///
/// # Example
/// ```
/// use trimframe_core::{analyze_content_bounds, PixelBuffer};
///
/// // 3x1 transparent strip with one opaque pixel in the middle
/// let data = vec![0, 0, 0, 0, 255, 0, 0, 255, 0, 0, 0, 0];
/// let buffer = PixelBuffer::rgba(3, 1, data).unwrap();
/// let bounds = analyze_content_bounds(&buffer, 10);
/// assert!(bounds.has_content);
/// assert_eq!((bounds.left, bounds.width), (1, 1));
/// ```
pub fn analyze_content_bounds(buffer: &PixelBuffer, tolerance: u8) -> ContentBounds {
    let bounds = match buffer.layout() {
        PixelLayout::Rgba => scan_alpha(buffer, tolerance, DetectionStrategy::Alpha),
        PixelLayout::Indexed(palette) => match buffer.expand_indexed() {
            Ok(expanded) if palette.entries.iter().any(|c| c[3] < 255) => {
                scan_alpha(&expanded, tolerance, DetectionStrategy::Indexed)
            }
            Ok(expanded) => scan_background(&expanded, tolerance),
            Err(err) => {
                trace!(%err, "Palette expansion failed, using background distance");
                scan_background(buffer, tolerance)
            }
        },
        PixelLayout::Rgb => scan_background(buffer, tolerance),
    };

    debug!(
        width = buffer.width(),
        height = buffer.height(),
        tolerance,
        strategy = ?bounds.strategy,
        has_content = bounds.has_content,
        "Analyzed content bounds"
    );
    bounds
}

/// Detect content bounds with an explicitly chosen detector.
///
/// `Indexed` expands the palette and runs the alpha detector on the result;
/// it fails if the expansion fails. `Alpha` on an opaque buffer reports the
/// whole buffer as content.
pub fn analyze_with_strategy(
    buffer: &PixelBuffer,
    tolerance: u8,
    strategy: DetectionStrategy,
) -> Result<ContentBounds> {
    let bounds = match strategy {
        DetectionStrategy::Alpha => scan_alpha(buffer, tolerance, DetectionStrategy::Alpha),
        DetectionStrategy::Indexed => {
            let expanded = buffer.expand_indexed()?;
            scan_alpha(&expanded, tolerance, DetectionStrategy::Indexed)
        }
        DetectionStrategy::BackgroundDistance => scan_background(buffer, tolerance),
    };
    Ok(bounds)
}

fn scan_alpha(buffer: &PixelBuffer, tolerance: u8, strategy: DetectionStrategy) -> ContentBounds {
    scan(buffer, strategy, |x, y| buffer.alpha_at(x, y) > tolerance)
}

fn scan_background(buffer: &PixelBuffer, tolerance: u8) -> ContentBounds {
    let background = background_color(buffer);
    let threshold = tolerance as u32 * tolerance as u32;
    trace!(?background, "Inferred background color");

    scan(buffer, DetectionStrategy::BackgroundDistance, |x, y| {
        color_distance_squared(buffer.rgb_at(x, y), background) > threshold
    })
}

/// Single pass over every pixel tracking the foreground extent.
fn scan<F>(buffer: &PixelBuffer, strategy: DetectionStrategy, is_foreground: F) -> ContentBounds
where
    F: Fn(u32, u32) -> bool,
{
    let (width, height) = (buffer.width(), buffer.height());
    let mut min_x = width;
    let mut min_y = height;
    let mut max_x = 0;
    let mut max_y = 0;
    let mut has_content = false;

    for y in 0..height {
        for x in 0..width {
            if is_foreground(x, y) {
                has_content = true;
                min_x = min_x.min(x);
                max_x = max_x.max(x);
                min_y = min_y.min(y);
                max_y = max_y.max(y);
            }
        }
    }

    if has_content {
        ContentBounds::from_extent(min_x, min_y, max_x, max_y, strategy)
    } else {
        ContentBounds::empty(width, height, strategy)
    }
}

/// Pick the background color from the four corners.
///
/// The color found in the most corners wins. Ties go to the earlier corner in
/// top-left, top-right, bottom-left, bottom-right order.
fn background_color(buffer: &PixelBuffer) -> [u8; 3] {
    let (right, bottom) = (buffer.width() - 1, buffer.height() - 1);
    let corners = [
        buffer.rgb_at(0, 0),
        buffer.rgb_at(right, 0),
        buffer.rgb_at(0, bottom),
        buffer.rgb_at(right, bottom),
    ];

    let mut best = corners[0];
    let mut best_count = 0;
    for candidate in corners {
        let count = corners.iter().filter(|&&c| c == candidate).count();
        if count > best_count {
            best = candidate;
            best_count = count;
        }
    }
    best
}

#[inline]
fn color_distance_squared(a: [u8; 3], b: [u8; 3]) -> u32 {
    a.iter()
        .zip(b.iter())
        .map(|(&p, &q)| {
            let d = p as i32 - q as i32;
            (d * d) as u32
        })
        .sum()
}
