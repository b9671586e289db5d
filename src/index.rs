//! The gallery manifest: landmark folder name → image filenames.
//!
//! On disk this is a plain JSON object with no wrapper and no version
//! field:
//!
//! ```json
//! {
//!   "1_Fort": ["a.jpg", "b.png"],
//!   "2_Mosque": ["c.png"]
//! }
//! ```
//!
//! Both the keys and every image list are kept in [`compare_names`] order at
//! all times, so two indexes built from the same tree serialize to the same
//! bytes regardless of the order the filesystem enumerated entries in.

use crate::naming::compare_names;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde::Deserialize;
use std::collections::BTreeMap;

/// One landmark folder and the images it contains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryEntry {
    pub folder: String,
    pub images: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "BTreeMap<String, Vec<String>>")]
pub struct GalleryIndex {
    entries: Vec<GalleryEntry>,
}

impl GalleryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `folder → images`, sorting the images.
    ///
    /// An empty image list removes the folder instead: folders without
    /// images never appear in the manifest. Inserting an existing folder
    /// replaces its list.
    pub fn insert(&mut self, folder: impl Into<String>, mut images: Vec<String>) {
        let folder = folder.into();
        let slot = self
            .entries
            .binary_search_by(|e| compare_names(&e.folder, &folder));

        if images.is_empty() {
            if let Ok(pos) = slot {
                self.entries.remove(pos);
            }
            return;
        }

        images.sort_by(|a, b| compare_names(a, b));
        images.dedup();
        match slot {
            Ok(pos) => self.entries[pos].images = images,
            Err(pos) => self.entries.insert(pos, GalleryEntry { folder, images }),
        }
    }

    pub fn get(&self, folder: &str) -> Option<&[String]> {
        self.entries
            .binary_search_by(|e| compare_names(&e.folder, folder))
            .ok()
            .map(|pos| self.entries[pos].images.as_slice())
    }

    pub fn entries(&self) -> &[GalleryEntry] {
        &self.entries
    }

    pub fn folders(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.folder.as_str())
    }

    pub fn folder_count(&self) -> usize {
        self.entries.len()
    }

    pub fn image_count(&self) -> usize {
        self.entries.iter().map(|e| e.images.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find the folder belonging to a landmark id.
    ///
    /// Matches the first key (in manifest order) that starts with `<id>_`,
    /// the same way the site looks up a tile's gallery. `007_Souq` is not
    /// landmark 7.
    pub fn find_landmark(&self, id: u32) -> Option<&GalleryEntry> {
        let prefix = format!("{id}_");
        self.entries.iter().find(|e| e.folder.starts_with(&prefix))
    }

    /// Render as the on-disk manifest: two-space indented JSON, no
    /// trailing newline.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

impl From<BTreeMap<String, Vec<String>>> for GalleryIndex {
    fn from(map: BTreeMap<String, Vec<String>>) -> Self {
        let mut index = GalleryIndex::new();
        for (folder, images) in map {
            index.insert(folder, images);
        }
        index
    }
}

impl Serialize for GalleryIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.folder, &entry.images)?;
        }
        map.end()
    }
}
