//! Pure Rust image backend built on the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Identify (JPEG, PNG, TIFF, WebP) | `ImageReader::with_guessed_format` + `into_dimensions` |
//! | Decode | `ImageReader::decode` |
//! | Crop | `DynamicImage::crop_imm` + `imageops::replace` onto a black canvas |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder::new_with_quality` |

use super::backend::{BackendError, ImageBackend};
use super::params::CropParams;
use crate::geometry::Dimensions;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, ImageReader, RgbImage, imageops};
use std::io::Cursor;
use std::path::Path;
use std::sync::LazyLock;

/// Extensions whose decoders are compiled in.
const PHOTO_CANDIDATES: &[(&str, ImageFormat)] = &[
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("png", ImageFormat::Png),
    ("tif", ImageFormat::Tiff),
    ("tiff", ImageFormat::Tiff),
    ("webp", ImageFormat::WebP),
];

static SUPPORTED_EXTENSIONS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    PHOTO_CANDIDATES
        .iter()
        .filter(|(_, fmt)| fmt.reading_enabled())
        .map(|(ext, _)| *ext)
        .collect()
});

/// Returns the set of image file extensions that have working decoders compiled in.
pub fn supported_input_extensions() -> &'static [&'static str] {
    &SUPPORTED_EXTENSIONS
}

/// True when `path` has one of the [`supported_input_extensions`] (case-insensitive).
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            supported_input_extensions()
                .iter()
                .any(|s| s.eq_ignore_ascii_case(ext))
        })
}

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn reader(data: &[u8]) -> Result<ImageReader<Cursor<&[u8]>>, BackendError> {
    ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| BackendError::Decode(format!("Failed to sniff format: {}", e)))
}

fn load_image(data: &[u8]) -> Result<DynamicImage, BackendError> {
    reader(data)?
        .decode()
        .map_err(|e| BackendError::Decode(e.to_string()))
}

/// Encode as baseline JPEG. Alpha is dropped since JPEG cannot carry it.
fn encode_jpeg(img: &DynamicImage, quality: u32) -> Result<Vec<u8>, BackendError> {
    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
    let mut out = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut out, quality as u8);
    rgb.write_with_encoder(encoder)
        .map_err(|e| BackendError::Encode(format!("JPEG encode failed: {}", e)))?;
    Ok(out)
}

impl ImageBackend for RustBackend {
    fn identify(&self, data: &[u8]) -> Result<Dimensions, BackendError> {
        let (width, height) = reader(data)?
            .into_dimensions()
            .map_err(|e| BackendError::Decode(format!("Failed to read dimensions: {}", e)))?;
        Ok(Dimensions { width, height })
    }

    fn crop(&self, data: &[u8], params: &CropParams) -> Result<Vec<u8>, BackendError> {
        let img = load_image(data)?;
        let dims = Dimensions::new(img.width(), img.height());
        let bounds = params.bounds;
        let empty = || BackendError::EmptyRegion {
            bounds,
            width: dims.width,
            height: dims.height,
        };

        let (x, y, w, h) = bounds.clip_to(dims).ok_or_else(empty)?;
        let canvas_width = u32::try_from(bounds.width).map_err(|_| empty())?;
        let canvas_height = u32::try_from(bounds.height).map_err(|_| empty())?;

        // Output always has the full bounds size; the part hanging off the
        // image stays black.
        let covered = img.crop_imm(x, y, w, h).to_rgb8();
        let mut canvas = RgbImage::new(canvas_width, canvas_height);
        imageops::replace(
            &mut canvas,
            &covered,
            x as i64 - bounds.x,
            y as i64 - bounds.y,
        );
        encode_jpeg(&DynamicImage::ImageRgb8(canvas), params.quality.value())
    }
}
