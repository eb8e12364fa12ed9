//! # batchcrop
//!
//! Crop a batch of images with one fixed-aspect-ratio rectangle. The crop is
//! framed on a reference image, carried over to every other image by relative
//! position and size, and all results are bundled into a single zip.
//!
//! # Architecture: Display Space and Native Space
//!
//! Every image is shown scaled to fit a fixed viewport (800×600 by default)
//! and centered in it. The crop rectangle lives in that viewport, so pointer
//! gestures map onto it directly; only at export time is it mapped back to the
//! image's own pixels.
//!
//! ```text
//! 1. Load      files     →  Session        (identify, fit to viewport, center crop)
//! 2. Gestures  script    →  crop rect      (drag / resize from a corner, locked ratio)
//! 3. Apply     crop rect →  every image    (normalized to 0..1 of the displayed footprint)
//! 4. Export    Session   →  zip            (native bounds → crop → JPEG → archive)
//! ```
//!
//! Carrying the crop over in normalized form means a crop covering the middle
//! half of a wide image covers the middle half of a square one, whatever their
//! pixel sizes.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`geometry`] | Display geometry, viewport ↔ native mapping, rectangle containment |
//! | [`aspect`] | Locked width:height ratio type and its presets |
//! | [`engine`] | Crop rectangle state machine: idle, dragging, resizing from a handle |
//! | [`projector`] | Normalized crops and their re-projection onto another image |
//! | [`session`] | Ordered image set, active image, per-image crop assignments |
//! | [`load`] | Input discovery and loading with skip-and-continue |
//! | [`script`] | JSON gesture scripts replayed against a session |
//! | [`export`] | Sequential crop + encode of every image, progress events, single-image preview |
//! | [`archive`] | Zip bundling and output naming |
//! | [`imaging`] | Pure-Rust image backend: identify, crop, JPEG encode |
//! | [`config`] | `config.toml` loading, validation, and merging with defaults |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Resize Is Not Clamped to the Image
//!
//! Dragging keeps the crop inside the viewport, but resizing is only limited by
//! the minimum size. A crop can therefore hang over the letterbox area; its
//! native bounds then have a negative origin or overshoot the image. The
//! [`imaging`] backend still emits the full bounds size, so the locked ratio
//! survives export; the part outside the image is filled black.
//!
//! ## One Engine, Many Images
//!
//! The [`session::Session`] owns a single [`engine::CropEngine`]. Switching the
//! active image stores the current rectangle on the outgoing image in
//! normalized form and loads the incoming image's rectangle (or a fresh
//! centered one). There is no global state.

pub mod archive;
pub mod aspect;
pub mod config;
pub mod engine;
pub mod export;
pub mod geometry;
pub mod imaging;
pub mod load;
pub mod output;
pub mod projector;
pub mod script;
pub mod session;

#[cfg(test)]
pub(crate) mod test_helpers;
