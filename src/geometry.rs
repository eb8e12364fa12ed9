//! Coordinate mapping between image-native space and display space.
//!
//! Images are shown scaled to fit a fixed-size viewport and centered in it.
//! Everything the user touches (the crop rectangle, its handles) lives in
//! viewport coordinates, while pixel extraction needs native coordinates.
//! All functions here are pure and testable without any I/O or images.
//!
//! ```text
//! viewport (Vw x Vh)
//! ┌──────────────────────────────┐
//! │   offset_x                   │
//! │ ◄──────►┌──────────────┐     │
//! │         │ image * scale│     │
//! │         └──────────────┘     │
//! └──────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

/// Native pixel size of a loaded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when either side is zero. Such images cannot be displayed or cropped.
    pub fn is_degenerate(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Fixed logical size of the surface images are rendered into.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Where and how large an image is drawn inside the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayGeometry {
    pub offset_x: f64,
    pub offset_y: f64,
    pub scale: f64,
    /// Native size the geometry was derived from.
    pub dimensions: Dimensions,
}

impl DisplayGeometry {
    /// Width of the image as drawn, in viewport units.
    pub fn display_width(&self) -> f64 {
        self.dimensions.width as f64 * self.scale
    }

    /// Height of the image as drawn, in viewport units.
    pub fn display_height(&self) -> f64 {
        self.dimensions.height as f64 * self.scale
    }
}

/// Fit an image into the viewport, preserving its aspect ratio, and center it.
///
/// `scale = min(Vw / width, Vh / height)`; the leftover space on the loose axis
/// is split evenly on both sides. Callers must not pass degenerate dimensions.
///
/// # Examples
/// ```
/// # use batchcrop::geometry::{compute_display_geometry, Dimensions, Viewport};
/// let geo = compute_display_geometry(Dimensions::new(2000, 1000), Viewport::new(800.0, 600.0));
/// assert_eq!(geo.scale, 0.4);
/// assert_eq!((geo.offset_x, geo.offset_y), (0.0, 100.0));
/// ```
pub fn compute_display_geometry(dimensions: Dimensions, viewport: Viewport) -> DisplayGeometry {
    let w = dimensions.width as f64;
    let h = dimensions.height as f64;
    let scale = (viewport.width / w).min(viewport.height / h);

    DisplayGeometry {
        offset_x: (viewport.width - w * scale) / 2.0,
        offset_y: (viewport.height - h * scale) / 2.0,
        scale,
        dimensions,
    }
}

/// Map a viewport point back into native pixel coordinates.
pub fn to_image_space(point: Point, geometry: &DisplayGeometry) -> Point {
    Point {
        x: (point.x - geometry.offset_x) / geometry.scale,
        y: (point.y - geometry.offset_y) / geometry.scale,
    }
}

/// Crop rectangle in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CropRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CropRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn aspect(&self) -> f64 {
        self.width / self.height
    }

    /// Map this rectangle into native pixel bounds, rounding to the nearest pixel.
    ///
    /// The origin is not clamped: a rectangle hanging off the displayed image
    /// yields negative or oversized bounds. The image backend pads those to
    /// the full size rather than shrinking them.
    pub fn to_pixel_bounds(&self, geometry: &DisplayGeometry) -> PixelBounds {
        let origin = to_image_space(self.origin(), geometry);
        PixelBounds {
            x: origin.x.round() as i64,
            y: origin.y.round() as i64,
            width: (self.width / geometry.scale).round() as i64,
            height: (self.height / geometry.scale).round() as i64,
        }
    }
}

/// Inclusive containment test: points on any edge count as inside.
pub fn contains_point(rect: &CropRect, point: Point) -> bool {
    point.x >= rect.x && point.x <= rect.right() && point.y >= rect.y && point.y <= rect.bottom()
}

/// Extraction bounds in native pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelBounds {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl PixelBounds {
    /// Intersect with the image area, returning `(x, y, width, height)` of the
    /// covered pixels, or `None` when nothing of the image is covered.
    pub fn clip_to(&self, dimensions: Dimensions) -> Option<(u32, u32, u32, u32)> {
        let left = self.x.max(0);
        let top = self.y.max(0);
        let right = (self.x + self.width).min(dimensions.width as i64);
        let bottom = (self.y + self.height).min(dimensions.height as i64);

        if right <= left || bottom <= top {
            return None;
        }
        Some((
            left as u32,
            top as u32,
            (right - left) as u32,
            (bottom - top) as u32,
        ))
    }
}
