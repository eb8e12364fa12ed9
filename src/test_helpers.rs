//! Shared test utilities for the batchcrop test suite.
//!
//! Provides float assertions for viewport geometry, synthetic image bytes for
//! backend tests, and fixture builders for sessions.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let mut session = Session::default();
//! session.add_image(new_image("a.jpg", 1600, 1200)).unwrap();
//! assert_aspect(&session.active_crop().unwrap(), AspectRatio::THREE_TWO);
//! ```

use std::io::Cursor;
use std::path::PathBuf;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, RgbImage};
use tempfile::TempDir;

use crate::aspect::AspectRatio;
use crate::geometry::{CropRect, Dimensions};
use crate::session::NewImage;

const TOLERANCE: f64 = 1e-6;

// =========================================================================
// Geometry assertions
// =========================================================================

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < TOLERANCE,
        "expected {expected}, got {actual}"
    );
}

pub fn assert_rect_close(actual: &CropRect, expected: &CropRect) {
    let close = |a: f64, b: f64| (a - b).abs() < TOLERANCE;
    assert!(
        close(actual.x, expected.x)
            && close(actual.y, expected.y)
            && close(actual.width, expected.width)
            && close(actual.height, expected.height),
        "expected {expected:?}, got {actual:?}"
    );
}

/// Assert that `width / height` matches the ratio.
pub fn assert_aspect(rect: &CropRect, aspect: AspectRatio) {
    assert!(
        (rect.aspect() - aspect.value()).abs() < TOLERANCE,
        "expected ratio {aspect} ({}), got {} for {rect:?}",
        aspect.value(),
        rect.aspect()
    );
}

// =========================================================================
// Synthetic images
// =========================================================================

/// A gradient so encoders have something non-trivial to compress.
fn gradient(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    }))
}

pub fn synthetic_jpeg(width: u32, height: u32) -> Vec<u8> {
    let mut out = Vec::new();
    gradient(width, height)
        .write_with_encoder(JpegEncoder::new_with_quality(&mut out, 90))
        .unwrap();
    out
}

pub fn synthetic_png(width: u32, height: u32) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    gradient(width, height)
        .write_with_encoder(PngEncoder::new(&mut out))
        .unwrap();
    out.into_inner()
}

// =========================================================================
// Session fixtures
// =========================================================================

/// A `NewImage` whose source path is just its name. Pairs with `MockBackend`,
/// which never reads from disk.
pub fn new_image(name: &str, width: u32, height: u32) -> NewImage {
    NewImage {
        name: name.to_string(),
        source: PathBuf::from(name),
        byte_size: 0,
        dimensions: Dimensions::new(width, height),
    }
}

/// A temp directory with files whose contents are their own names, for
/// tests that pair disk input with `MockBackend`.
pub fn marker_files(names: &[&str]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    for name in names {
        let path = tmp.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, name.as_bytes()).unwrap();
    }
    tmp
}
