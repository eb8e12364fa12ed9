//! CLI output formatting for every command.
//!
//! # Information-First Display
//!
//! Each image is shown by its positional index and file name, with its native
//! size and byte size as detail and its source path as indented context. The
//! same header is used when loading and exporting, so the two listings line
//! up.
//!
//! # Output Format
//!
//! ## Load
//!
//! ```text
//! Images
//! 001 beach.jpg (4000 × 3000, 2.41 MB)
//!     Source: photos/beach.jpg
//! 002 dunes.png (1600 × 1200, 880.5 KB)
//!     Source: photos/dunes.png
//!
//! Skipped
//!     photos/notes.jpg: Decode failed: ...
//!
//! Loaded 2 images, skipped 1
//! ```
//!
//! ## Gestures
//!
//! ```text
//! Replayed 6 steps: 2 adjustments, 1 ignored
//! Crop: 4000 × 2667 (3:2) on 001 beach.jpg
//! ```
//!
//! ## Export
//!
//! ```text
//! Exporting 2 images
//!     001 beach.jpg → cropped_1_beach.jpg (4000 × 2667, 1.02 MB)
//!     002 dunes.png failed: Decode failed: ...
//! Archive cropped_images_1700000000000.zip (1 file, 1.02 MB)
//! ```
//!
//! ## Preview
//!
//! ```text
//! Preview 001 beach.jpg → cropped_1_beach.jpg (4000 × 2667, 1.02 MB)
//! ```
//!
//! # Architecture
//!
//! Each listing has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::export::{ExportEvent, ExportResult, PreviewImage};
use crate::load::LoadSummary;
use crate::script::ScriptReport;
use crate::session::{ImageEntry, Session};

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{} {}", n, word)
    } else {
        format!("{} {}s", n, word)
    }
}

/// Human-readable byte size with up to two decimals, trailing zeros dropped.
///
/// ```text
/// 0 → "0 Bytes"    1536 → "1.5 KB"    1048576 → "1 MB"
/// ```
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let fixed = format!("{:.2}", value);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[unit])
}

/// `001 beach.jpg (4000 × 3000, 2.41 MB)`
fn image_header(index: usize, entry: &ImageEntry) -> String {
    format!(
        "{} {} ({} × {}, {})",
        format_index(index),
        entry.name,
        entry.dimensions.width,
        entry.dimensions.height,
        format_file_size(entry.byte_size)
    )
}

// ============================================================================
// Load
// ============================================================================

pub fn format_load_summary(session: &Session, summary: &LoadSummary) -> Vec<String> {
    let mut lines = Vec::new();

    if !session.is_empty() {
        lines.push("Images".to_string());
        for (i, entry) in session.entries().iter().enumerate() {
            lines.push(image_header(i + 1, entry));
            lines.push(format!("{}Source: {}", indent(1), entry.source.display()));
        }
        lines.push(String::new());
    }

    if !summary.skipped.is_empty() {
        lines.push("Skipped".to_string());
        for skipped in &summary.skipped {
            lines.push(format!(
                "{}{}: {}",
                indent(1),
                skipped.path.display(),
                skipped.reason
            ));
        }
        lines.push(String::new());
    }

    let mut tally = format!("Loaded {}", plural(summary.loaded, "image"));
    if !summary.skipped.is_empty() {
        tally.push_str(&format!(", skipped {}", summary.skipped.len()));
    }
    lines.push(tally);
    lines
}

pub fn print_load_summary(session: &Session, summary: &LoadSummary) {
    for line in format_load_summary(session, summary) {
        println!("{}", line);
    }
}

// ============================================================================
// Gestures
// ============================================================================

pub fn format_script_report(session: &Session, report: &ScriptReport) -> Vec<String> {
    let mut lines = vec![format!(
        "Replayed {}: {}, {} ignored",
        plural(report.steps, "step"),
        plural(report.adjustments, "adjustment"),
        report.ignored
    )];

    if let (Some(index), Some((w, h))) = (session.active_index(), session.active_crop_size()) {
        lines.push(format!(
            "Crop: {} × {} ({}) on {} {}",
            w,
            h,
            session.aspect_ratio(),
            format_index(index + 1),
            session.entries()[index].name
        ));
    }
    lines
}

pub fn print_script_report(session: &Session, report: &ScriptReport) {
    for line in format_script_report(session, report) {
        println!("{}", line);
    }
}

// ============================================================================
// Export
// ============================================================================

/// Format a single export progress event as display lines.
pub fn format_export_event(event: &ExportEvent) -> Vec<String> {
    match event {
        ExportEvent::Started { total } => {
            vec![format!("Exporting {}", plural(*total, "image"))]
        }
        ExportEvent::ImageCropped {
            index,
            source_name,
            entry_name,
            bounds,
            size_bytes,
            ..
        } => vec![format!(
            "{}{} {} → {} ({} × {}, {})",
            indent(1),
            format_index(*index),
            source_name,
            entry_name,
            bounds.width,
            bounds.height,
            format_file_size(*size_bytes as u64)
        )],
        ExportEvent::ImageFailed {
            index,
            source_name,
            reason,
            ..
        } => vec![format!(
            "{}{} {} failed: {}",
            indent(1),
            format_index(*index),
            source_name,
            reason
        )],
        ExportEvent::ArchiveBuilt {
            file_name,
            entries,
            size_bytes,
        } => vec![format!(
            "Archive {} ({}, {})",
            file_name,
            plural(*entries, "file"),
            format_file_size(*size_bytes as u64)
        )],
    }
}

/// Closing lines after the archive has been written to `path`.
pub fn format_export_result(result: &ExportResult, path: &std::path::Path) -> Vec<String> {
    let failed = match result.failures.len() {
        0 => String::new(),
        n => format!(", {} failed", n),
    };
    vec![format!(
        "Wrote {} ({} cropped{})",
        path.display(),
        result.files.len(),
        failed
    )]
}

pub fn print_export_result(result: &ExportResult, path: &std::path::Path) {
    for line in format_export_result(result, path) {
        println!("{}", line);
    }
}

// ============================================================================
// Preview
// ============================================================================

/// `Preview 002 dunes.png → out/cropped_2_dunes.jpg (1500 × 1000, 412 KB)`
pub fn format_preview(preview: &PreviewImage, path: &std::path::Path) -> Vec<String> {
    vec![format!(
        "Preview {} {} → {} ({} × {}, {})",
        format_index(preview.index),
        preview.source_name,
        path.display(),
        preview.bounds.width,
        preview.bounds.height,
        format_file_size(preview.data.len() as u64)
    )]
}

pub fn print_preview(preview: &PreviewImage, path: &std::path::Path) {
    for line in format_preview(preview, path) {
        println!("{}", line);
    }
}
