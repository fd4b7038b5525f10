//! ``src/fs/folder_size.rs``
//! ============================================================================
//! # Folder Size: Recursive Byte Total for One Directory Subtree
//!
//! Sums the length of every regular file at or below a directory. The walk is
//! driven by `walkdir`, which keeps its own stack of open directory handles,
//! so arbitrarily deep trees never grow the call stack.
//!
//! Symlinks are not followed. A link contributes nothing to the total, and a
//! link to a directory is never descended into.

use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, instrument};
use walkdir::{DirEntry, WalkDir};

use crate::error::AppError;

/// Total size in bytes of all regular files under `root`.
///
/// Directories contribute 0. Any descendant that cannot be read makes the
/// whole total indeterminate and yields [`AppError::Traversal`]; no partial
/// sum is ever returned.
#[instrument(level = "debug", fields(path = %root.display()))]
pub fn folder_size(root: &Path) -> Result<u64, AppError> {
    let started: Instant = Instant::now();
    let mut total_size: u64 = 0;
    let mut visited: u64 = 0;

    for entry in WalkDir::new(root).follow_links(false) {
        let entry: DirEntry = entry.map_err(|source| traversal_error(root, source))?;
        visited += 1;

        if !entry.file_type().is_file() {
            continue;
        }

        let len: u64 = entry
            .metadata()
            .map_err(|source| traversal_error(root, source))?
            .len();

        total_size = total_size.saturating_add(len);
    }

    debug!(
        marker = "FOLDER_SIZE",
        operation_type = "folder_size_walk",
        total_size,
        visited,
        duration_us = started.elapsed().as_micros(),
        "Folder size walk completed"
    );

    Ok(total_size)
}

fn traversal_error(root: &Path, source: walkdir::Error) -> AppError {
    let path: PathBuf = source
        .path()
        .map_or_else(|| root.to_path_buf(), Path::to_path_buf);

    AppError::Traversal { path, source }
}
