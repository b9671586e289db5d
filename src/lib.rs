//! # Gallery Index
//!
//! Builds the JSON manifest a static landmark site uses to find its gallery
//! images. The site has no server to list directories, so this runs at build
//! time: every subfolder of the gallery root is a landmark, and the manifest
//! maps each folder name to the image files directly inside it.
//!
//! ```text
//! public/gallery/1_Fort/a.jpg        {
//! public/gallery/1_Fort/b.txt   →      "1_Fort": ["a.jpg"],
//! public/gallery/2_Mosque/c.png        "2_Mosque": ["c.png"]
//! public/gallery/3_Empty/            }
//! ```
//!
//! The site then loads `<base>/gallery/<folder>/<file>` for each entry.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Walks the gallery root two levels deep, collecting recognized images per folder |
//! | [`index`] | The manifest data model, its ordering, and its JSON form |
//! | [`build`] | Scan → serialize → atomic write; `check` for staleness |
//! | [`persist`] | Atomic replacement and read-back of the manifest file |
//! | [`config`] | Layered `gallery-index.toml` loading and validation |
//! | [`naming`] | `<id>_<slug>` folder-name convention and name ordering |
//! | [`resolve`] | Image URL resolution, as the consuming site does it |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Deterministic Ordering
//!
//! Directory enumeration order depends on the OS and filesystem. Folder
//! keys and image lists are sorted case-insensitively (ties broken by byte
//! order), so the same tree always produces the same bytes. A rebuild of an
//! unchanged gallery is a no-op diff in version control.
//!
//! ## Whole-File Atomic Replacement
//!
//! The manifest is assembled in memory and written once, through a temp file
//! renamed over the target. A site reading the file mid-build sees either
//! the old manifest or the new one. A failed scan of the root aborts before
//! the write, so a typo in `gallery_root` cannot replace a good manifest with
//! `{}`.
//!
//! ## Partial Failures Are Warnings
//!
//! A landmark folder that cannot be read is left out and reported; the rest
//! of the gallery is still indexed. Only an unusable root or a failed write
//! stops the build.

pub mod build;
pub mod config;
pub mod index;
pub mod naming;
pub mod output;
pub mod persist;
pub mod resolve;
pub mod scan;

#[cfg(test)]
pub(crate) mod test_helpers;
