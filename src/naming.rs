//! Folder-name parsing for the `<id>_<slug>` convention, and the name
//! ordering shared by every list in the manifest.
//!
//! Landmark asset folders are named after the landmark dataset they belong
//! to: a numeric landmark id, an underscore, then a slug with underscores
//! between words.
//!
//! - `12_Bab_Al_Bahrain` → id 12, slug `Bab_Al_Bahrain`, title "Bab Al Bahrain"
//! - `3_Fort` → id 3, slug `Fort`, title "Fort"
//! - `misc` → no id, slug `misc`, title "misc"
//!
//! The builder never interprets folder names when writing the manifest; keys
//! are copied verbatim. Parsing only matters for lookups by landmark id and
//! for display.

use std::cmp::Ordering;

/// Result of parsing a folder name like `12_Bab_Al_Bahrain`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedFolder {
    /// Landmark id if the name has a numeric prefix (e.g. `12`).
    pub id: Option<u32>,
    /// Raw slug after `<id>_`, underscores preserved. Empty if id-only.
    /// For names without an id prefix, this is the full input.
    pub slug: String,
    /// Display title: slug with underscores converted to spaces.
    pub display_title: String,
}

/// Parse a folder name following the `<id>_<slug>` convention.
pub fn parse_folder_name(name: &str) -> ParsedFolder {
    if let Some(pos) = name.find('_') {
        let prefix = &name[..pos];
        if let Some(id) = parse_id(prefix) {
            let raw = &name[pos + 1..];
            return ParsedFolder {
                id: Some(id),
                slug: raw.to_string(),
                display_title: raw.replace('_', " "),
            };
        }
    }
    if let Some(id) = parse_id(name) {
        return ParsedFolder {
            id: Some(id),
            slug: String::new(),
            display_title: String::new(),
        };
    }
    ParsedFolder {
        id: None,
        slug: name.to_string(),
        display_title: name.replace('_', " "),
    }
}

// `u32::from_str` accepts a leading `+`, which is not part of the convention.
fn parse_id(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Ordering used for folder keys and image filenames in the manifest.
///
/// Case-insensitive first, then plain byte order so that names differing
/// only in case (`a.jpg`, `A.jpg`) still have a fixed relative order.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
