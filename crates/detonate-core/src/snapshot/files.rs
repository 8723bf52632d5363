//! Filesystem enumeration via `walkdir`.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Collect every non-directory entry below `root`.
///
/// Symlinks are recorded, not followed. Entries that cannot be read,
/// including ones deleted between listing and stat, are skipped. A missing
/// root yields an empty set.
pub fn capture_files(root: &Path) -> BTreeSet<PathBuf> {
    let (files, skipped) = collect_files(WalkDir::new(root).follow_links(false));
    if skipped > 0 {
        debug!(root = %root.display(), skipped, "file snapshot skipped unreadable entries");
    }
    files
}

/// Drain `walker`, returning the non-directory paths and how many entries
/// could not be read.
fn collect_files(walker: WalkDir) -> (BTreeSet<PathBuf>, usize) {
    let mut skipped = 0;
    let files = walker
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(e) => {
                debug!(
                    path = ?e.path().map(Path::display),
                    error = %e,
                    "skipping unreadable entry"
                );
                skipped += 1;
                None
            }
        })
        .filter(|e| !e.file_type().is_dir())
        .map(walkdir::DirEntry::into_path)
        .collect();
    (files, skipped)
}
