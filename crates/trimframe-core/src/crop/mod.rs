//! Crop rectangle planning.
//!
//! Two independent planners produce pixel rectangles in source space:
//!
//! - [`smart`]: content-centered crop around detected [`ContentBounds`]
//!   with per-side padding, or a no-op when there is nothing worth cropping.
//! - [`aspect`]: fixed aspect ratio crop positioned by a 0-100% focal point,
//!   independent of pixel content.
//!
//! Planners never touch pixels; the resulting [`Rect`] is applied with
//! [`crate::render::extract`] or by an external codec.
//!
//! [`ContentBounds`]: crate::bounds::ContentBounds
//! [`Rect`]: crate::Rect

pub mod aspect;
pub mod smart;

pub use aspect::{plan_aspect_crop, AspectCropSpec};
pub use smart::{plan_crop, smart_crop, CropOptions, CropPlan, Padding, UnchangedReason};
