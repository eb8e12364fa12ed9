//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the two operations the cropper needs
//! from an image codec: identify (decode enough to learn the native size) and
//! crop (extract a pixel region and encode it).
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate. Tests use the recording `MockBackend` below.

use super::params::CropParams;
use crate::geometry::{Dimensions, PixelBounds};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Decode failed: {0}")]
    Decode(String),
    #[error("Encode failed: {0}")]
    Encode(String),
    #[error("Crop region {bounds:?} lies outside the {width}x{height} image")]
    EmptyRegion {
        bounds: PixelBounds,
        width: u32,
        height: u32,
    },
}

/// Trait for image codec backends.
///
/// Both operations take the raw file bytes, so the rest of the codebase never
/// touches a decoder directly.
pub trait ImageBackend {
    /// Decode the image header and report its native size.
    fn identify(&self, data: &[u8]) -> Result<Dimensions, BackendError>;

    /// Decode, cut out `params.bounds` and encode the result as JPEG.
    ///
    /// The output is exactly `bounds.width × bounds.height`. Any part outside
    /// the image is black; bounds that cover no pixel at all are an
    /// [`BackendError::EmptyRegion`].
    fn crop(&self, data: &[u8], params: &CropParams) -> Result<Vec<u8>, BackendError>;
}
