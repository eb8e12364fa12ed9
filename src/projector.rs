//! Portable crop form for reuse across images.
//!
//! A [`NormalizedCrop`] expresses a crop as fractions of an image's own
//! displayed footprint, so the viewport centering offsets drop out. Projecting
//! it onto another image's geometry keeps the proportional framing ("the
//! central half") rather than absolute pixels.
//!
//! No minimum-size check happens here: the source rect was valid, and ratios
//! carry over unchanged.

use crate::geometry::{CropRect, DisplayGeometry};
use serde::{Deserialize, Serialize};

/// Crop rectangle relative to the displayed image, each field nominally in `0..=1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedCrop {
    pub rel_x: f64,
    pub rel_y: f64,
    pub rel_w: f64,
    pub rel_h: f64,
}

/// Express `rect` as fractions of the image drawn with `geometry`.
pub fn to_normalized(rect: &CropRect, geometry: &DisplayGeometry) -> NormalizedCrop {
    let display_w = geometry.display_width();
    let display_h = geometry.display_height();

    NormalizedCrop {
        rel_x: (rect.x - geometry.offset_x) / display_w,
        rel_y: (rect.y - geometry.offset_y) / display_h,
        rel_w: rect.width / display_w,
        rel_h: rect.height / display_h,
    }
}

/// Rebuild a viewport rect from `crop` against a (possibly different) image's geometry.
pub fn from_normalized(crop: &NormalizedCrop, geometry: &DisplayGeometry) -> CropRect {
    let display_w = geometry.display_width();
    let display_h = geometry.display_height();

    CropRect {
        x: geometry.offset_x + crop.rel_x * display_w,
        y: geometry.offset_y + crop.rel_y * display_h,
        width: crop.rel_w * display_w,
        height: crop.rel_h * display_h,
    }
}
