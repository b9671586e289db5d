//! Filesystem scanning.
//!
//! Walks the gallery root exactly two levels deep: the root's direct
//! subdirectories are landmark folders, and the direct files of each folder
//! are candidate images.
//!
//! ```text
//! public/gallery/                  # Gallery root
//! ├── 1_Fort/                      # Landmark folder → manifest key
//! │   ├── a.jpg                    # Indexed
//! │   ├── IMAGE.JPG                # Indexed (extensions are case-insensitive)
//! │   ├── notes.txt                # Not an image
//! │   └── raw/                     # Never traversed
//! │       └── b.jpg
//! ├── 2_Mosque/
//! │   └── c.png
//! ├── 3_Empty/                     # No images → omitted from the manifest
//! ├── .cache/                      # Hidden → skipped
//! └── readme.md                    # Not a folder → ignored
//! ```
//!
//! ## Failures
//!
//! A root that is missing, not a directory, or unreadable is a configuration
//! error and nothing is written. Anything that goes wrong below the root (a
//! folder deleted or made unreadable mid-scan, a dangling symlink, a name
//! that is not valid UTF-8) only drops that entry: it is recorded in
//! [`ScanOutcome::skipped`] and the scan carries on.

use crate::config::IndexConfig;
use crate::index::GalleryIndex;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("gallery root not found: {path}")]
    RootNotFound { path: PathBuf },
    #[error("gallery root is not a directory: {path}")]
    RootNotDirectory { path: PathBuf },
    #[error("gallery root is unreadable: {path}: {source}")]
    RootUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// An entry left out of the index because it could not be read.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedEntry {
    pub path: PathBuf,
    pub reason: String,
}

impl fmt::Display for SkippedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.reason)
    }
}

/// Result of a completed scan.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub index: GalleryIndex,
    pub skipped: Vec<SkippedEntry>,
}

/// Scan the gallery root named by `config`.
pub fn scan(config: &IndexConfig) -> Result<ScanOutcome, ScanError> {
    let root = &config.gallery_root;
    check_root(root)?;

    let mut outcome = ScanOutcome::default();

    for entry in children(root, config) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.depth() == 0 => {
                return Err(ScanError::RootUnreadable {
                    path: root.clone(),
                    source: err.into(),
                });
            }
            Err(err) => {
                outcome.skip(err_path(&err, root), err.to_string());
                continue;
            }
        };

        if !entry.file_type().is_dir() || !is_visible(&entry, config) {
            continue;
        }

        let Some(folder) = entry.file_name().to_str() else {
            outcome.skip(entry.path().to_path_buf(), "folder name is not valid UTF-8");
            continue;
        };

        index_folder(&mut outcome, folder, entry.path(), config);
    }

    Ok(outcome)
}

/// Add one landmark folder to `outcome`, or record it as skipped if it
/// cannot be listed.
fn index_folder(outcome: &mut ScanOutcome, folder: &str, path: &Path, config: &IndexConfig) {
    match scan_folder(path, config, &mut outcome.skipped) {
        Ok(images) => {
            tracing::debug!(folder, images = images.len(), "scanned folder");
            outcome.index.insert(folder, images);
        }
        Err(err) => outcome.skip(path.to_path_buf(), err.to_string()),
    }
}

fn check_root(root: &Path) -> Result<(), ScanError> {
    match fs::metadata(root) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(ScanError::RootNotDirectory {
            path: root.to_path_buf(),
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(ScanError::RootNotFound {
            path: root.to_path_buf(),
        }),
        Err(source) => Err(ScanError::RootUnreadable {
            path: root.to_path_buf(),
            source,
        }),
    }
}

/// Recognized image filenames directly inside `folder`.
///
/// Fails only if the folder itself cannot be listed; unreadable individual
/// entries are appended to `skipped`.
fn scan_folder(
    folder: &Path,
    config: &IndexConfig,
    skipped: &mut Vec<SkippedEntry>,
) -> Result<Vec<String>, walkdir::Error> {
    let mut images = Vec::new();

    for entry in children(folder, config) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.depth() == 0 => return Err(err),
            Err(err) => {
                let path = err_path(&err, folder);
                skip_entry(skipped, path, err.to_string());
                continue;
            }
        };

        if !entry.file_type().is_file()
            || !is_visible(&entry, config)
            || !config.is_recognized(entry.path())
        {
            continue;
        }

        match entry.file_name().to_str() {
            Some(name) => images.push(name.to_string()),
            None => skip_entry(
                skipped,
                entry.path().to_path_buf(),
                "file name is not valid UTF-8",
            ),
        }
    }

    Ok(images)
}

/// Direct children of `dir`, unsorted; ordering is applied by the index.
fn children(dir: &Path, config: &IndexConfig) -> walkdir::IntoIter {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(config.follow_links)
        .into_iter()
}

fn is_visible(entry: &DirEntry, config: &IndexConfig) -> bool {
    config.include_hidden || !entry.file_name().to_string_lossy().starts_with('.')
}

fn err_path(err: &walkdir::Error, fallback: &Path) -> PathBuf {
    err.path().unwrap_or(fallback).to_path_buf()
}

fn skip_entry(skipped: &mut Vec<SkippedEntry>, path: PathBuf, reason: impl Into<String>) {
    let reason = reason.into();
    tracing::warn!(path = %path.display(), %reason, "skipping unreadable entry");
    skipped.push(SkippedEntry { path, reason });
}

impl ScanOutcome {
    fn skip(&mut self, path: PathBuf, reason: impl Into<String>) {
        skip_entry(&mut self.skipped, path, reason);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    #[test]
    fn indexes_images_per_folder() {
        let tmp = gallery(&[
            ("1_Fort", &["a.jpg", "b.txt"]),
            ("2_Mosque", &["c.png"]),
        ]);
        let outcome = scan(&config_for(tmp.path())).unwrap();

        assert_eq!(folder_names(&outcome.index), vec!["1_Fort", "2_Mosque"]);
        assert_eq!(images_of(&outcome.index, "1_Fort"), vec!["a.jpg"]);
        assert_eq!(images_of(&outcome.index, "2_Mosque"), vec!["c.png"]);
        assert!(outcome.skipped.is_empty());
    }

    #[test]
    fn empty_folders_omitted() {
        let tmp = gallery(&[("1_Fort", &["a.jpg"]), ("3_Empty", &[])]);
        let outcome = scan(&config_for(tmp.path())).unwrap();
        assert_eq!(folder_names(&outcome.index), vec!["1_Fort"]);
    }

    #[test]
    fn folders_without_images_omitted() {
        let tmp = gallery(&[("4_Docs", &["notes.txt", "readme.md"])]);
        let outcome = scan(&config_for(tmp.path())).unwrap();
        assert!(outcome.index.is_empty());
    }

    #[test]
    fn files_at_root_ignored() {
        let tmp = gallery(&[("1_Fort", &["a.jpg"])]);
        fs::write(tmp.path().join("stray.jpg"), b"x").unwrap();

        let outcome = scan(&config_for(tmp.path())).unwrap();
        assert_eq!(folder_names(&outcome.index), vec!["1_Fort"]);
    }

    #[test]
    fn nested_folders_not_traversed() {
        let tmp = gallery(&[("1_Fort", &["a.jpg"])]);
        let nested = tmp.path().join("1_Fort/raw");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("deep.jpg"), b"x").unwrap();
        // A directory named like an image is still a directory.
        fs::create_dir_all(tmp.path().join("1_Fort/fake.jpg")).unwrap();

        let outcome = scan(&config_for(tmp.path())).unwrap();
        assert_eq!(images_of(&outcome.index, "1_Fort"), vec!["a.jpg"]);
    }

    #[test]
    fn uppercase_extensions_recognized() {
        let tmp = gallery(&[("1_Fort", &["IMAGE.JPG", "b.Png", "c.WEBP", "d.jpeg"])]);
        let outcome = scan(&config_for(tmp.path())).unwrap();
        assert_eq!(
            images_of(&outcome.index, "1_Fort"),
            vec!["b.Png", "c.WEBP", "d.jpeg", "IMAGE.JPG"]
        );
    }

    #[test]
    fn hidden_entries_skipped_by_default() {
        let tmp = gallery(&[
            ("1_Fort", &["a.jpg", ".thumb.jpg"]),
            (".cache", &["x.jpg"]),
        ]);
        let outcome = scan(&config_for(tmp.path())).unwrap();

        assert_eq!(folder_names(&outcome.index), vec!["1_Fort"]);
        assert_eq!(images_of(&outcome.index, "1_Fort"), vec!["a.jpg"]);
    }

    #[test]
    fn hidden_entries_included_when_configured() {
        let tmp = gallery(&[
            ("1_Fort", &["a.jpg", ".thumb.jpg"]),
            (".cache", &["x.jpg"]),
        ]);
        let mut config = config_for(tmp.path());
        config.include_hidden = true;

        let outcome = scan(&config).unwrap();
        assert_eq!(folder_names(&outcome.index), vec![".cache", "1_Fort"]);
        assert_eq!(images_of(&outcome.index, "1_Fort"), vec![".thumb.jpg", "a.jpg"]);
    }

    #[test]
    fn custom_extensions() {
        let tmp = gallery(&[("1_Fort", &["a.jpg", "b.avif", "c.gif"])]);
        let mut config = config_for(tmp.path());
        config.extensions = vec!["avif".into(), "gif".into()];

        let outcome = scan(&config).unwrap();
        assert_eq!(images_of(&outcome.index, "1_Fort"), vec!["b.avif", "c.gif"]);
    }

    #[test]
    fn missing_root_is_not_found() {
        let tmp = gallery(&[]);
        let config = config_for(&tmp.path().join("missing"));
        assert!(matches!(scan(&config), Err(ScanError::RootNotFound { .. })));
    }

    #[test]
    fn file_root_is_not_directory() {
        let tmp = gallery(&[]);
        let file = tmp.path().join("gallery.jpg");
        fs::write(&file, b"x").unwrap();
        assert!(matches!(
            scan(&config_for(&file)),
            Err(ScanError::RootNotDirectory { .. })
        ));
    }

    #[test]
    fn empty_root_gives_empty_index() {
        let tmp = gallery(&[]);
        let outcome = scan(&config_for(tmp.path())).unwrap();
        assert!(outcome.index.is_empty());
        assert!(outcome.skipped.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_ignored_by_default() {
        use std::os::unix::fs::symlink;
        let tmp = gallery(&[("1_Fort", &["a.jpg"])]);
        symlink(tmp.path().join("1_Fort"), tmp.path().join("2_Alias")).unwrap();
        symlink(
            tmp.path().join("1_Fort/a.jpg"),
            tmp.path().join("1_Fort/link.jpg"),
        )
        .unwrap();

        let outcome = scan(&config_for(tmp.path())).unwrap();
        assert_eq!(folder_names(&outcome.index), vec!["1_Fort"]);
        assert_eq!(images_of(&outcome.index, "1_Fort"), vec!["a.jpg"]);
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_followed_when_configured() {
        use std::os::unix::fs::symlink;
        let tmp = gallery(&[("1_Fort", &["a.jpg"])]);
        symlink(tmp.path().join("1_Fort"), tmp.path().join("2_Alias")).unwrap();

        let mut config = config_for(tmp.path());
        config.follow_links = true;

        let outcome = scan(&config).unwrap();
        assert_eq!(folder_names(&outcome.index), vec!["1_Fort", "2_Alias"]);
        assert_eq!(images_of(&outcome.index, "2_Alias"), vec!["a.jpg"]);
    }

    #[cfg(unix)]
    #[test]
    fn dangling_link_reported_when_following() {
        use std::os::unix::fs::symlink;
        let tmp = gallery(&[("1_Fort", &["a.jpg"])]);
        symlink(
            tmp.path().join("1_Fort/gone.jpg"),
            tmp.path().join("1_Fort/broken.jpg"),
        )
        .unwrap();

        let mut config = config_for(tmp.path());
        config.follow_links = true;

        let outcome = scan(&config).unwrap();
        assert_eq!(images_of(&outcome.index, "1_Fort"), vec!["a.jpg"]);
        assert_eq!(outcome.skipped.len(), 1);
        assert!(outcome.skipped[0].path.ends_with("broken.jpg"));
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_folder_skipped_and_reported() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;
        let tmp = gallery(&[("1_Fort", &["a.jpg"])]);
        let bad = tmp.path().join(OsStr::from_bytes(b"9_\xffBad"));
        fs::create_dir(&bad).unwrap();
        fs::write(bad.join("x.jpg"), b"x").unwrap();

        let outcome = scan(&config_for(tmp.path())).unwrap();
        assert_eq!(folder_names(&outcome.index), vec!["1_Fort"]);
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.skipped[0].path, bad);
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_folder_skipped_and_reported() {
        use std::os::unix::fs::PermissionsExt;
        let tmp = gallery(&[("1_Fort", &["a.jpg"]), ("2_Locked", &["b.jpg"])]);
        let locked = tmp.path().join("2_Locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Permission bits do not stop a privileged user.
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            eprintln!("note: running with privileges, 0o000 folder still readable; skipped");
            return;
        }

        let outcome = scan(&config_for(tmp.path())).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        assert_eq!(folder_names(&outcome.index), vec!["1_Fort"]);
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.skipped[0].path, locked);
    }

    #[test]
    fn scan_folder_on_vanished_folder_fails() {
        let tmp = gallery(&[]);
        let mut skipped = Vec::new();
        let result = scan_folder(
            &tmp.path().join("deleted"),
            &config_for(tmp.path()),
            &mut skipped,
        );
        assert!(result.is_err());
    }

    #[test]
    fn folder_that_cannot_be_listed_is_skipped_and_scan_continues() {
        let tmp = gallery(&[("1_Fort", &["a.jpg"])]);
        let config = config_for(tmp.path());
        let vanished = tmp.path().join("2_Gone");
        let mut outcome = ScanOutcome::default();

        index_folder(&mut outcome, "2_Gone", &vanished, &config);
        index_folder(&mut outcome, "1_Fort", &tmp.path().join("1_Fort"), &config);

        assert_eq!(folder_names(&outcome.index), vec!["1_Fort"]);
        assert!(outcome.index.get("2_Gone").is_none());
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.skipped[0].path, vanished);
        assert!(!outcome.skipped[0].reason.is_empty());
    }
}
