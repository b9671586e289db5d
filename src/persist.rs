//! Reading and atomically replacing the manifest file.
//!
//! The manifest is served to browsers straight from the static assets
//! directory, so a reader must never see a partially written file. Writes go
//! to a temporary file created next to the target (same filesystem) which is
//! flushed, synced, and then renamed over the target in one step. If any of
//! that fails, the temporary file is removed and the previous manifest is
//! left exactly as it was.
//!
//! The replacement keeps the previous manifest's permissions. A first write
//! gets `0644` less the process umask, like any file the build creates, so
//! a web server running as another user can still read it.

use crate::index::GalleryIndex;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PersistError {
    #[error("cannot create output directory {path}: {source}")]
    CreateDir { path: PathBuf, source: io::Error },
    #[error("cannot write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("cannot read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("{path} is not a valid gallery manifest: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Replace `path` with `contents` atomically.
///
/// Missing parent directories are created first. An existing target's
/// permissions carry over to the new file.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), PersistError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|source| PersistError::CreateDir {
        path: parent.to_path_buf(),
        source,
    })?;

    let write_err = |source| PersistError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut tmp = temp_file_in(parent).map_err(write_err)?;
    tmp.write_all(contents).map_err(write_err)?;
    match fs::metadata(path) {
        Ok(meta) if meta.is_file() => tmp
            .as_file()
            .set_permissions(meta.permissions())
            .map_err(write_err)?,
        _ => {}
    }
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}

// tempfile defaults to 0600. The mode goes through open(2), so the umask
// still applies.
#[cfg(unix)]
fn temp_file_in(dir: &Path) -> io::Result<NamedTempFile> {
    use std::os::unix::fs::PermissionsExt;
    tempfile::Builder::new()
        .permissions(fs::Permissions::from_mode(0o644))
        .tempfile_in(dir)
}

#[cfg(not(unix))]
fn temp_file_in(dir: &Path) -> io::Result<NamedTempFile> {
    NamedTempFile::new_in(dir)
}

/// Read the raw bytes of an existing manifest, `None` if there is none.
pub fn read_existing(path: &Path) -> Result<Option<Vec<u8>>, PersistError> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(PersistError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Load and parse a manifest from disk.
pub fn load_index(path: &Path) -> Result<GalleryIndex, PersistError> {
    let content = fs::read_to_string(path).map_err(|source| PersistError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    GalleryIndex::from_json(&content).map_err(|source| PersistError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
