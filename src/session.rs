//! The image set and the one crop in play.
//!
//! A [`Session`] holds the ordered list of loaded images, which one is active,
//! and the [`CropEngine`] editing the active image's crop. Whenever the active
//! index changes, the session swaps the engine's rectangle out (as a
//! [`NormalizedCrop`] stored on the entry) and in (reprojected against the new
//! image's display geometry, or freshly centered).
//!
//! Every method runs to completion before returning; there is no shared state
//! outside the session, so independent sessions never interfere.

use crate::aspect::AspectRatio;
use crate::config::BatchConfig;
use crate::engine::{CropEngine, Handle, init_centered_rect};
use crate::geometry::{
    CropRect, Dimensions, DisplayGeometry, PixelBounds, Point, Viewport, compute_display_geometry,
};
use crate::projector::{NormalizedCrop, from_normalized, to_normalized};
use log::debug;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum SessionError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Index {index} out of range for {len} images")]
    OutOfRange { index: usize, len: usize },
}

/// Stable identity of a loaded image, unaffected by removals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageId(u64);

impl ImageId {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// A successfully decoded image, ready to join the session.
#[derive(Debug, Clone)]
pub struct NewImage {
    pub name: String,
    pub source: PathBuf,
    pub byte_size: u64,
    pub dimensions: Dimensions,
}

#[derive(Debug, Clone)]
pub struct ImageEntry {
    pub id: ImageId,
    /// Original file name, used for the exported entry name.
    pub name: String,
    pub source: PathBuf,
    pub byte_size: u64,
    pub dimensions: Dimensions,
    /// Recomputed whenever the entry becomes active.
    pub geometry: DisplayGeometry,
    /// Crop assigned by "apply to all" or by adjusting it while active.
    pub assigned_crop: Option<NormalizedCrop>,
}

/// Result of [`Session::apply_current_to_all`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The crop was stored on this many entries (all of them).
    Applied(usize),
    /// Fewer than two images are loaded; nothing to propagate to.
    Skipped,
}

#[derive(Debug, Clone)]
pub struct Session {
    viewport: Viewport,
    entries: Vec<ImageEntry>,
    active: Option<usize>,
    engine: CropEngine,
    next_id: u64,
}

impl Session {
    pub fn new(viewport: Viewport, aspect: AspectRatio, min_crop_size: f64) -> Self {
        Self {
            viewport,
            entries: Vec::new(),
            active: None,
            engine: CropEngine::new(viewport, aspect, min_crop_size),
            next_id: 0,
        }
    }

    /// A session using the configured viewport, ratio and minimum size.
    pub fn from_config(config: &BatchConfig) -> Self {
        Self::new(
            config.viewport.viewport(),
            config.crop.aspect_ratio,
            config.crop.min_size,
        )
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn entries(&self) -> &[ImageEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn engine(&self) -> &CropEngine {
        &self.engine
    }

    /// The crop rectangle currently being edited, in viewport coordinates.
    pub fn active_crop(&self) -> Option<CropRect> {
        self.engine.rect()
    }

    pub fn aspect_ratio(&self) -> AspectRatio {
        self.engine.aspect_ratio()
    }

    /// Append a decoded image. The first image loaded becomes active with a
    /// centered crop.
    pub fn add_image(&mut self, image: NewImage) -> Result<ImageId, SessionError> {
        if image.dimensions.is_degenerate() {
            return Err(SessionError::InvalidInput(format!(
                "{} has zero size ({}x{})",
                image.name, image.dimensions.width, image.dimensions.height
            )));
        }

        let id = ImageId(self.next_id);
        self.next_id += 1;
        self.entries.push(ImageEntry {
            id,
            name: image.name,
            source: image.source,
            byte_size: image.byte_size,
            dimensions: image.dimensions,
            geometry: compute_display_geometry(image.dimensions, self.viewport),
            assigned_crop: None,
        });

        if self.entries.len() == 1 {
            self.set_active(0)?;
        }
        Ok(id)
    }

    /// Make `index` the active image and load its crop into the engine.
    pub fn set_active(&mut self, index: usize) -> Result<(), SessionError> {
        self.check_index(index)?;

        let viewport = self.viewport;
        let entry = &mut self.entries[index];
        entry.geometry = compute_display_geometry(entry.dimensions, viewport);

        match entry.assigned_crop {
            Some(crop) => self.engine.load(from_normalized(&crop, &entry.geometry)),
            None => {
                self.engine.center_on(&entry.geometry);
            }
        }
        self.active = Some(index);
        debug!("active image {} ({})", index, entry.name);
        Ok(())
    }

    /// Remove the entry at `index`.
    ///
    /// If it was active, the entry now at the same index becomes active, or
    /// the previous one when the last entry was removed. Removing an entry in
    /// front of the active one keeps the same image active.
    pub fn remove_image(&mut self, index: usize) -> Result<ImageEntry, SessionError> {
        self.check_index(index)?;
        let removed = self.entries.remove(index);

        if self.entries.is_empty() {
            self.active = None;
            self.engine.clear();
            return Ok(removed);
        }

        match self.active {
            Some(active) if active == index => {
                let next = index.min(self.entries.len() - 1);
                self.set_active(next)?;
            }
            Some(active) if active > index => self.active = Some(active - 1),
            _ => {}
        }
        Ok(removed)
    }

    /// Store the active crop, normalized, on every entry including the active one.
    pub fn apply_current_to_all(&mut self) -> ApplyOutcome {
        if self.entries.len() < 2 {
            return ApplyOutcome::Skipped;
        }
        let Some(crop) = self.active_normalized() else {
            return ApplyOutcome::Skipped;
        };

        for entry in &mut self.entries {
            entry.assigned_crop = Some(crop);
        }
        ApplyOutcome::Applied(self.entries.len())
    }

    /// Forget every assigned crop and re-center the active one.
    pub fn reset_all_crops(&mut self) {
        for entry in &mut self.entries {
            entry.assigned_crop = None;
        }
        self.recenter_active();
    }

    /// Re-center only the active crop and drop its assignment.
    pub fn reset_crop(&mut self) {
        if let Some(index) = self.active {
            self.entries[index].assigned_crop = None;
        }
        self.recenter_active();
    }

    /// Switch the locked ratio and re-center the active crop to match.
    ///
    /// Crops already assigned to other images keep the framing they were given.
    pub fn set_aspect_ratio(&mut self, aspect: AspectRatio) {
        self.engine.set_aspect_ratio(aspect);
        self.reset_crop();
    }

    /// Native-pixel extraction bounds for the entry at `index`.
    ///
    /// The active entry uses the engine's live rect; others use their assigned
    /// crop reprojected onto their own geometry, or a centered default.
    pub fn extract_cropped_region(&self, index: usize) -> Result<PixelBounds, SessionError> {
        self.check_index(index)?;
        let entry = &self.entries[index];
        let geometry = compute_display_geometry(entry.dimensions, self.viewport);
        Ok(self.effective_rect(index, &geometry).to_pixel_bounds(&geometry))
    }

    /// Size of the active crop in native pixels.
    pub fn active_crop_size(&self) -> Option<(u32, u32)> {
        let entry = &self.entries[self.active?];
        let rect = self.engine.rect()?;
        let scale = entry.geometry.scale;
        Some((
            (rect.width / scale).round() as u32,
            (rect.height / scale).round() as u32,
        ))
    }

    // -------------------------------------------------------------------------
    // Gestures: delegate to the engine, record adjustments on the active entry
    // -------------------------------------------------------------------------

    pub fn pointer_down(&mut self, pointer: Point) -> bool {
        self.engine.pointer_down(pointer)
    }

    pub fn handle_down(&mut self, handle: Handle) -> bool {
        self.engine.handle_down(handle)
    }

    /// Returns `true` when the crop changed.
    pub fn pointer_move(&mut self, pointer: Point) -> bool {
        let changed = self.engine.pointer_move(pointer);
        if changed {
            self.record_active_crop();
        }
        changed
    }

    pub fn pointer_up(&mut self) {
        self.engine.pointer_up();
    }

    pub fn pointer_leave(&mut self) {
        self.engine.pointer_leave();
    }

    fn record_active_crop(&mut self) {
        let crop = self.active_normalized();
        if let Some(index) = self.active {
            self.entries[index].assigned_crop = crop;
        }
    }

    fn active_normalized(&self) -> Option<NormalizedCrop> {
        let entry = &self.entries[self.active?];
        let rect = self.engine.rect()?;
        Some(to_normalized(&rect, &entry.geometry))
    }

    fn recenter_active(&mut self) {
        if let Some(index) = self.active {
            self.engine.center_on(&self.entries[index].geometry);
        }
    }

    fn effective_rect(&self, index: usize, geometry: &DisplayGeometry) -> CropRect {
        if self.active == Some(index) {
            if let Some(rect) = self.engine.rect() {
                return rect;
            }
        }
        match &self.entries[index].assigned_crop {
            Some(crop) => from_normalized(crop, geometry),
            None => init_centered_rect(geometry, self.engine.aspect_ratio()),
        }
    }

    fn check_index(&self, index: usize) -> Result<(), SessionError> {
        if index < self.entries.len() {
            Ok(())
        } else {
            Err(SessionError::OutOfRange {
                index,
                len: self.entries.len(),
            })
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(
            Viewport::default(),
            AspectRatio::default(),
            crate::engine::MIN_CROP_SIZE,
        )
    }
}
