//! Zip bundling for exported crops.
//!
//! All crops end up in one in-memory archive written with stored (uncompressed)
//! entries: the payloads are already JPEG-compressed, so deflating them again
//! buys nothing.

use std::io::{Cursor, Write};
use std::path::Path;
use thiserror::Error;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// One file to place in the archive.
#[derive(Debug, Clone, PartialEq)]
pub struct ArchiveFile {
    pub name: String,
    pub data: Vec<u8>,
}

/// Write every file into a fresh zip and return its bytes.
pub fn build_archive(files: &[ArchiveFile]) -> Result<Vec<u8>, ArchiveError> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

    for file in files {
        writer.start_file(file.name.as_str(), options)?;
        writer.write_all(&file.data)?;
    }

    Ok(writer.finish()?.into_inner())
}

/// Entry name for the `n`th exported image (1-based): `{prefix}_{n}_{stem}.jpg`.
///
/// The extension always becomes `.jpg` because every crop is re-encoded as JPEG.
pub fn entry_name(prefix: &str, n: usize, source_name: &str) -> String {
    let stem = Path::new(source_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(source_name);
    format!("{}_{}_{}.jpg", prefix, n, stem)
}

/// Archive file name: `{prefix}_{unix_millis}.zip`.
pub fn archive_file_name(prefix: &str, unix_millis: u128) -> String {
    format!("{}_{}.zip", prefix, unix_millis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use zip::ZipArchive;

    fn read_back(bytes: Vec<u8>) -> Vec<(String, Vec<u8>, CompressionMethod)> {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        (0..archive.len())
            .map(|i| {
                let mut entry = archive.by_index(i).unwrap();
                let mut data = Vec::new();
                entry.read_to_end(&mut data).unwrap();
                (entry.name().to_string(), data, entry.compression())
            })
            .collect()
    }

    #[test]
    fn archive_contains_files_in_order() {
        let bytes = build_archive(&[
            ArchiveFile {
                name: "cropped_1_a.jpg".into(),
                data: b"first".to_vec(),
            },
            ArchiveFile {
                name: "cropped_2_b.jpg".into(),
                data: b"second".to_vec(),
            },
        ])
        .unwrap();

        let entries = read_back(bytes);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].0, "cropped_1_a.jpg");
        assert_eq!(entries[0].1, b"first");
        assert_eq!(entries[1].0, "cropped_2_b.jpg");
        assert_eq!(entries[1].1, b"second");
    }

    #[test]
    fn entries_are_stored_uncompressed() {
        let bytes = build_archive(&[ArchiveFile {
            name: "x.jpg".into(),
            data: vec![0u8; 4096],
        }])
        .unwrap();
        assert_eq!(read_back(bytes)[0].2, CompressionMethod::Stored);
    }

    #[test]
    fn empty_archive_is_valid_zip() {
        let bytes = build_archive(&[]).unwrap();
        assert!(read_back(bytes).is_empty());
    }

    #[test]
    fn entry_name_replaces_extension() {
        assert_eq!(entry_name("cropped", 1, "beach.png"), "cropped_1_beach.jpg");
        assert_eq!(entry_name("cropped", 12, "IMG_0042.JPG"), "cropped_12_IMG_0042.jpg");
        assert_eq!(entry_name("out", 3, "no_extension"), "out_3_no_extension.jpg");
    }

    #[test]
    fn entry_name_keeps_inner_dots() {
        assert_eq!(
            entry_name("cropped", 2, "trip.day1.jpeg"),
            "cropped_2_trip.day1.jpg"
        );
    }

    #[test]
    fn archive_name_uses_millis() {
        assert_eq!(
            archive_file_name("cropped_images", 1_700_000_000_123),
            "cropped_images_1700000000123.zip"
        );
    }
}
