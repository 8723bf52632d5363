//! Target selection from the input directory.

use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Select the file to analyze from `input_dir`.
///
/// Only direct children that are regular files (after following symlinks)
/// are candidates. When several exist the lexicographically first file
/// name wins and the rest are ignored with a warning.
pub fn select_target(input_dir: &Path) -> Option<PathBuf> {
    if !input_dir.is_dir() {
        debug!(path = %input_dir.display(), "input directory missing");
        return None;
    }

    let candidates: Vec<PathBuf> = WalkDir::new(input_dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .collect();

    let mut candidates = candidates.into_iter();
    let chosen = candidates.next()?;
    let ignored = candidates.count();
    if ignored > 0 {
        warn!(
            chosen = %chosen.display(),
            ignored,
            "multiple input files present, analyzing only the first"
        );
    }
    Some(chosen)
}
