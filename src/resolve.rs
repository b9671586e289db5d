//! Image URL resolution, as done by the site that consumes the manifest.
//!
//! The site serves gallery images from `<base>/gallery/<folder>/<file>` and
//! finds a landmark's folder by the `<id>_` prefix of its key. The first
//! image of a folder is that landmark's preview.

use crate::index::GalleryIndex;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ResolveError {
    #[error("no gallery folder for landmark {0}")]
    UnknownLandmark(u32),
}

/// URL of one image: `<base>/gallery/<folder>/<file>`.
///
/// Exactly one slash separates `base` from `gallery`, whether or not `base`
/// ends with one. An empty base yields a root-relative URL.
pub fn image_url(base_url: &str, folder: &str, file: &str) -> String {
    let base = base_url.trim_end_matches('/');
    format!("{base}/gallery/{folder}/{file}")
}

/// URLs of every image of landmark `id`, preview first.
pub fn landmark_urls(
    index: &GalleryIndex,
    id: u32,
    base_url: &str,
) -> Result<Vec<String>, ResolveError> {
    let entry = index
        .find_landmark(id)
        .ok_or(ResolveError::UnknownLandmark(id))?;
    Ok(entry
        .images
        .iter()
        .map(|file| image_url(base_url, &entry.folder, file))
        .collect())
}

/// Preview URL for landmark `id`, `None` if it has no gallery.
pub fn preview_url(index: &GalleryIndex, id: u32, base_url: &str) -> Option<String> {
    let entry = index.find_landmark(id)?;
    entry
        .images
        .first()
        .map(|file| image_url(base_url, &entry.folder, file))
}
