//! Artifact extraction
//!
//! Build artifacts are downloaded as zip archives and unpacked into a
//! caller-chosen directory.

use std::fs::{self, File};
use std::io::{self, Cursor};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use zip::ZipArchive;

use crate::error::PollError;

/// Unpacks a zip archive into `destination`, creating it if needed
///
/// Entries whose path would land outside `destination` are skipped. Returns
/// the paths of the extracted files.
pub fn extract_zip(bytes: &[u8], destination: &Path) -> Result<Vec<PathBuf>, PollError> {
    fs::create_dir_all(destination)?;

    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| PollError::Artifact(format!("invalid zip archive: {}", e)))?;

    let mut extracted = Vec::new();

    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|e| PollError::Artifact(format!("unreadable entry #{}: {}", index, e)))?;

        let Some(relative) = entry.enclosed_name().map(|path| path.to_path_buf()) else {
            warn!("Skipping archive entry with unsafe path '{}'", entry.name());
            continue;
        };
        let target = destination.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&target)?;
            continue;
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut file = File::create(&target)?;
        io::copy(&mut entry, &mut file)?;
        debug!("Extracted {}", target.display());
        extracted.push(target);
    }

    Ok(extracted)
}
