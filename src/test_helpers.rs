//! Shared test utilities.
//!
//! Builds throwaway gallery trees in temp directories and pulls plain
//! strings back out of a [`GalleryIndex`] so assertions stay short.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = gallery(&[
//!     ("1_Fort", &["a.jpg", "b.txt"]),
//!     ("3_Empty", &[]),
//! ]);
//! let outcome = scan(&config_for(tmp.path())).unwrap();
//! assert_eq!(folder_names(&outcome.index), vec!["1_Fort"]);
//! ```

use std::fs;
use std::path::Path;
use tempfile::TempDir;

use crate::config::IndexConfig;
use crate::index::GalleryIndex;

// =========================================================================
// Fixture setup
// =========================================================================

/// Create a temp gallery root with one folder per `(name, files)` pair.
///
/// Every file gets a few placeholder bytes; the builder never decodes images.
pub fn gallery(folders: &[(&str, &[&str])]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    for (folder, files) in folders {
        let dir = tmp.path().join(folder);
        fs::create_dir_all(&dir).unwrap();
        for file in *files {
            fs::write(dir.join(file), b"img").unwrap();
        }
    }
    tmp
}

/// Default config pointed at `root`, writing the manifest inside it.
///
/// A file at the gallery root is never a landmark folder, so the manifest
/// does not disturb later scans of the same tree.
pub fn config_for(root: &Path) -> IndexConfig {
    IndexConfig {
        gallery_root: root.to_path_buf(),
        output_path: root.join("galleryIndex.json"),
        ..IndexConfig::default()
    }
}

// =========================================================================
// Index extractors
// =========================================================================

/// All folder keys in manifest order.
pub fn folder_names(index: &GalleryIndex) -> Vec<&str> {
    index.folders().collect()
}

/// Image list of `folder`. Panics if the folder is not indexed.
pub fn images_of<'a>(index: &'a GalleryIndex, folder: &str) -> Vec<&'a str> {
    index
        .get(folder)
        .map(|images| images.iter().map(String::as_str).collect())
        .unwrap_or_else(|| {
            let folders = folder_names(index);
            panic!("folder '{folder}' not indexed. Available: {folders:?}")
        })
}
