//! CLI output formatting.
//!
//! Each command has a `format_*` function returning lines, which keeps the
//! formatting testable without capturing stdout, and a `print_*` wrapper
//! that writes them. Format functions are pure: no I/O, no side effects.
//!
//! ## Build
//!
//! ```text
//! Indexed 2 folders, 3 images → public/galleryIndex.json
//! ```
//!
//! With `--list`, the summary is preceded by the folder listing:
//!
//! ```text
//! 001 Fort (2 images)
//!     Source: 1_Fort/
//!     a.jpg
//!     b.jpg
//! ```
//!
//! Skipped entries are warnings and go to stderr.

use crate::build::{BuildReport, CheckReport, CheckStatus};
use crate::index::GalleryIndex;
use crate::naming::parse_folder_name;
use crate::scan::SkippedEntry;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

/// Folder listing: display title and image count, then source folder and
/// filenames as indented context lines.
pub fn format_listing(index: &GalleryIndex) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, entry) in index.entries().iter().enumerate() {
        let parsed = parse_folder_name(&entry.folder);
        let title = if parsed.display_title.is_empty() {
            entry.folder.as_str()
        } else {
            parsed.display_title.as_str()
        };
        lines.push(format!(
            "{} {} ({})",
            format_index(i + 1),
            title,
            plural(entry.images.len(), "image")
        ));
        lines.push(format!("    Source: {}/", entry.folder));
        for image in &entry.images {
            lines.push(format!("    {image}"));
        }
    }
    lines
}

pub fn format_build_summary(report: &BuildReport) -> String {
    let mut line = format!(
        "Indexed {}, {} → {}",
        plural(report.folder_count(), "folder"),
        plural(report.image_count(), "image"),
        report.output_path.display()
    );
    if !report.skipped.is_empty() {
        line.push_str(&format!(" ({} skipped)", report.skipped.len()));
    }
    line
}

/// One warning line per skipped entry, headed by the class of the problem.
pub fn format_skipped(skipped: &[SkippedEntry]) -> Vec<String> {
    if skipped.is_empty() {
        return Vec::new();
    }
    let noun = if skipped.len() == 1 { "entry" } else { "entries" };
    let mut lines = vec![format!(
        "warning: PartialScanWarning: skipped {} {noun}",
        skipped.len()
    )];
    lines.extend(skipped.iter().map(|s| format!("    {s}")));
    lines
}

pub fn format_check_output(report: &CheckReport) -> Vec<String> {
    let path = report.output_path.display();
    match &report.status {
        CheckStatus::UpToDate => vec![format!("{path} is up to date")],
        CheckStatus::Missing => vec![format!("{path} does not exist")],
        CheckStatus::Stale(diff) => {
            let mut lines = vec![format!("{path} is out of date")];
            for folder in &diff.added {
                lines.push(format!("    + {folder}"));
            }
            for folder in &diff.removed {
                lines.push(format!("    - {folder}"));
            }
            for folder in &diff.changed {
                lines.push(format!("    ~ {folder}"));
            }
            if diff.is_empty() {
                lines.push("    (formatting differs)".to_string());
            }
            lines
        }
    }
}

pub fn print_build_output(report: &BuildReport, list: bool) {
    if list {
        for line in format_listing(&report.index) {
            println!("{}", line);
        }
    }
    print_skipped(&report.skipped);
    println!("{}", format_build_summary(report));
}

pub fn print_check_output(report: &CheckReport) {
    print_skipped(&report.skipped);
    for line in format_check_output(report) {
        println!("{}", line);
    }
}

fn print_skipped(skipped: &[SkippedEntry]) {
    for line in format_skipped(skipped) {
        eprintln!("{}", line);
    }
}
