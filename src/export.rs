//! Batch export: cut every image in the session and bundle the results.
//!
//! For each entry, in session order:
//!
//! 1. Resolve its native-pixel bounds ([`Session::extract_cropped_region`]).
//! 2. Read the source file and hand bytes and bounds to the [`ImageBackend`],
//!    which crops (padding any overhang) and encodes JPEG.
//! 3. Name the result `{entry_prefix}_{n}_{stem}.jpg`, `n` being the 1-based
//!    position in the session.
//!
//! A failure on one image is recorded and the rest carry on; the archive holds
//! whatever succeeded. Images are processed one at a time.
//!
//! Progress is reported through an optional channel so the caller can print
//! while the export runs.
//!
//! [`preview_active`] cuts just the active image the same way, for checking a
//! framing before committing to the whole batch.

use crate::archive::{ArchiveError, ArchiveFile, archive_file_name, build_archive, entry_name};
use crate::config::ExportConfig;
use crate::geometry::{Dimensions, PixelBounds};
use crate::imaging::{CropParams, ImageBackend, Quality};
use crate::session::Session;
use log::{debug, warn};
use serde::Serialize;
use std::sync::mpsc::Sender;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Archive error: {0}")]
    Archive(#[from] ArchiveError),
    #[error("No images to export")]
    NoImages,
    #[error("No active image to preview")]
    NoActiveImage,
    #[error("Failed to crop {name}: {reason}")]
    Crop { name: String, reason: String },
}

/// Progress events sent while exporting.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportEvent {
    Started {
        total: usize,
    },
    ImageCropped {
        /// 1-based position in the session.
        index: usize,
        total: usize,
        source_name: String,
        entry_name: String,
        bounds: PixelBounds,
        size_bytes: usize,
    },
    ImageFailed {
        index: usize,
        total: usize,
        source_name: String,
        reason: String,
    },
    ArchiveBuilt {
        file_name: String,
        entries: usize,
        size_bytes: usize,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportedFile {
    pub index: usize,
    pub source_name: String,
    pub entry_name: String,
    pub bounds: PixelBounds,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportFailure {
    pub index: usize,
    pub source_name: String,
    pub reason: String,
}

#[derive(Debug)]
pub struct ExportResult {
    /// Suggested file name for the archive.
    pub archive_name: String,
    /// The zip bytes.
    pub archive: Vec<u8>,
    pub files: Vec<ExportedFile>,
    pub failures: Vec<ExportFailure>,
}

/// Crop every image in `session` and bundle the results into a zip.
pub fn export_all(
    backend: &impl ImageBackend,
    session: &Session,
    config: &ExportConfig,
    events: Option<Sender<ExportEvent>>,
) -> Result<ExportResult, ExportError> {
    if session.is_empty() {
        return Err(ExportError::NoImages);
    }

    let send = |event: ExportEvent| {
        if let Some(tx) = &events {
            // A dropped receiver only means nobody is listening.
            tx.send(event).ok();
        }
    };

    let total = session.len();
    let quality = Quality::new(config.quality);
    send(ExportEvent::Started { total });

    let mut archive_files = Vec::new();
    let mut files = Vec::new();
    let mut failures = Vec::new();

    for (i, entry) in session.entries().iter().enumerate() {
        let index = i + 1;
        match crop_entry(backend, session, i, quality) {
            Ok((bounds, data)) => {
                let name = entry_name(&config.entry_prefix, index, &entry.name);
                debug!("cropped {} -> {} {:?}", entry.name, name, bounds);
                send(ExportEvent::ImageCropped {
                    index,
                    total,
                    source_name: entry.name.clone(),
                    entry_name: name.clone(),
                    bounds,
                    size_bytes: data.len(),
                });
                files.push(ExportedFile {
                    index,
                    source_name: entry.name.clone(),
                    entry_name: name.clone(),
                    bounds,
                });
                archive_files.push(ArchiveFile { name, data });
            }
            Err(reason) => {
                warn!("failed to export {}: {}", entry.name, reason);
                send(ExportEvent::ImageFailed {
                    index,
                    total,
                    source_name: entry.name.clone(),
                    reason: reason.clone(),
                });
                failures.push(ExportFailure {
                    index,
                    source_name: entry.name.clone(),
                    reason,
                });
            }
        }
    }

    let archive = build_archive(&archive_files)?;
    let archive_name = archive_file_name(&config.archive_prefix, unix_millis());
    send(ExportEvent::ArchiveBuilt {
        file_name: archive_name.clone(),
        entries: archive_files.len(),
        size_bytes: archive.len(),
    });

    Ok(ExportResult {
        archive_name,
        archive,
        files,
        failures,
    })
}

/// The active image, cropped on its own.
#[derive(Debug)]
pub struct PreviewImage {
    /// 1-based position in the session.
    pub index: usize,
    pub source_name: String,
    /// Same name the image gets inside the archive.
    pub file_name: String,
    pub bounds: PixelBounds,
    /// JPEG bytes.
    pub data: Vec<u8>,
}

/// Crop only the active image and return it as a single JPEG.
pub fn preview_active(
    backend: &impl ImageBackend,
    session: &Session,
    config: &ExportConfig,
) -> Result<PreviewImage, ExportError> {
    let i = session.active_index().ok_or(ExportError::NoActiveImage)?;
    let entry = &session.entries()[i];
    let (bounds, data) = crop_entry(backend, session, i, Quality::new(config.quality))
        .map_err(|reason| ExportError::Crop {
            name: entry.name.clone(),
            reason,
        })?;
    debug!("previewed {} {:?}", entry.name, bounds);

    Ok(PreviewImage {
        index: i + 1,
        source_name: entry.name.clone(),
        file_name: entry_name(&config.entry_prefix, i + 1, &entry.name),
        bounds,
        data,
    })
}

/// Where each image would be cut, without touching any pixels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedCrop {
    /// 1-based position in the session.
    pub index: usize,
    pub name: String,
    pub dimensions: Dimensions,
    pub bounds: PixelBounds,
    /// Set when the crop came from an explicit assignment rather than the
    /// centered default.
    pub assigned: bool,
}

/// Resolve the extraction bounds of every image in the session.
pub fn plan_crops(session: &Session) -> Vec<PlannedCrop> {
    session
        .entries()
        .iter()
        .enumerate()
        .filter_map(|(i, entry)| {
            let bounds = session.extract_cropped_region(i).ok()?;
            Some(PlannedCrop {
                index: i + 1,
                name: entry.name.clone(),
                dimensions: entry.dimensions,
                bounds,
                assigned: entry.assigned_crop.is_some(),
            })
        })
        .collect()
}

fn crop_entry(
    backend: &impl ImageBackend,
    session: &Session,
    index: usize,
    quality: Quality,
) -> Result<(PixelBounds, Vec<u8>), String> {
    let bounds = session
        .extract_cropped_region(index)
        .map_err(|e| e.to_string())?;
    let source = &session.entries()[index].source;
    let data = std::fs::read(source).map_err(|e| format!("{}: {}", source.display(), e))?;
    let cropped = backend
        .crop(&data, &CropParams { bounds, quality })
        .map_err(|e| e.to_string())?;
    Ok((bounds, cropped))
}

fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}
