//! Image codec collaborator: pure Rust, no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `ImageReader::into_dimensions` |
//! | **Crop → JPEG** | `crop_imm` + `JpegEncoder` (quality 90 by default) |
//!
//! The module is split into:
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]

pub mod backend;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, ImageBackend};
pub use params::{CropParams, Quality};
pub use rust_backend::{RustBackend, is_supported_image, supported_input_extensions};
