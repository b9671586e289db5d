//! The build operation: scan → serialize → atomic write.
//!
//! The whole manifest is assembled in memory and written once at the end,
//! so an interrupted run never leaves a partial file behind, and a failed
//! scan never replaces a good manifest with an empty one.
//!
//! [`check`] runs the same scan and serialization without writing, and
//! compares the result with what is on disk.

use crate::config::IndexConfig;
use crate::index::GalleryIndex;
use crate::persist::{self, PersistError};
use crate::scan::{self, ScanError, SkippedEntry};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("ConfigurationError: {0}")]
    Configuration(#[from] ScanError),
    #[error("WriteFailure: {0}")]
    Write(#[from] PersistError),
    #[error("WriteFailure: cannot serialize manifest: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// What a successful build produced.
#[derive(Debug)]
pub struct BuildReport {
    pub index: GalleryIndex,
    pub output_path: PathBuf,
    /// Entries left out because they could not be read.
    pub skipped: Vec<SkippedEntry>,
}

impl BuildReport {
    pub fn folder_count(&self) -> usize {
        self.index.folder_count()
    }

    pub fn image_count(&self) -> usize {
        self.index.image_count()
    }
}

/// Scan the gallery root and write the manifest to `config.output_path`.
pub fn build_index(config: &IndexConfig) -> Result<BuildReport, BuildError> {
    let outcome = scan::scan(config)?;
    let json = outcome.index.to_json()?;
    persist::write_atomic(&config.output_path, json.as_bytes())?;

    tracing::info!(
        folders = outcome.index.folder_count(),
        images = outcome.index.image_count(),
        skipped = outcome.skipped.len(),
        output = %config.output_path.display(),
        "gallery index written"
    );

    Ok(BuildReport {
        index: outcome.index,
        output_path: config.output_path.clone(),
        skipped: outcome.skipped,
    })
}

/// How the manifest on disk compares with a fresh scan.
#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    UpToDate,
    Missing,
    Stale(IndexDiff),
}

/// Folder-level differences between the manifest on disk and a fresh scan.
///
/// All three lists are empty when the on-disk file has the right content
/// but not the canonical formatting.
#[derive(Debug, Default, PartialEq)]
pub struct IndexDiff {
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub changed: Vec<String>,
}

impl IndexDiff {
    /// Differences going from `old` to `new`, each list in manifest order.
    pub fn between(old: &GalleryIndex, new: &GalleryIndex) -> Self {
        let mut diff = IndexDiff::default();
        for entry in new.entries() {
            match old.get(&entry.folder) {
                None => diff.added.push(entry.folder.clone()),
                Some(images) if images != entry.images.as_slice() => {
                    diff.changed.push(entry.folder.clone())
                }
                Some(_) => {}
            }
        }
        diff.removed = old
            .folders()
            .filter(|f| new.get(f).is_none())
            .map(str::to_string)
            .collect();
        diff
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.changed.is_empty()
    }
}

#[derive(Debug)]
pub struct CheckReport {
    pub status: CheckStatus,
    pub index: GalleryIndex,
    pub output_path: PathBuf,
    pub skipped: Vec<SkippedEntry>,
}

/// Compare a fresh scan with the manifest at `config.output_path`.
///
/// Nothing is written. A manifest that exists but cannot be parsed counts
/// as stale with every scanned folder reported as added.
pub fn check(config: &IndexConfig) -> Result<CheckReport, BuildError> {
    let outcome = scan::scan(config)?;
    let json = outcome.index.to_json()?;

    let status = match persist::read_existing(&config.output_path)? {
        None => CheckStatus::Missing,
        Some(bytes) if bytes == json.as_bytes() => CheckStatus::UpToDate,
        Some(bytes) => {
            let on_disk = std::str::from_utf8(&bytes)
                .ok()
                .and_then(|s| GalleryIndex::from_json(s).ok())
                .unwrap_or_default();
            CheckStatus::Stale(IndexDiff::between(&on_disk, &outcome.index))
        }
    };

    tracing::debug!(?status, output = %config.output_path.display(), "checked manifest");

    Ok(CheckReport {
        status,
        index: outcome.index,
        output_path: config.output_path.clone(),
        skipped: outcome.skipped,
    })
}
