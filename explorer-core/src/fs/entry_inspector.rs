//! `src/fs/entry_inspector.rs`
//! ============================================================
//! Per-child metadata for one directory listing.
//!
//! An inspection stats the child itself (never following symlinks), sizes it
//! (recursively for directories) and records its own modification time.
//! Inspections run on blocking worker threads, so everything here is sync.

use std::ffi::OsStr;
use std::fmt::Write as _;
use std::fs::{self, FileType, Metadata};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use compact_str::CompactString;

use crate::error::AppError;
use crate::fs::folder_size::folder_size;

// ------------------------------------------------------------
// DirectoryEntry — one sized child of the scanned directory.
// ------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    // Child name relative to the scanned directory
    pub relative_name: CompactString,

    // Own length for files, recursive file total for directories
    pub byte_size: u64,

    // Last-modification timestamp of the entry itself
    pub modified: SystemTime,

    pub is_dir: bool,
}

/// Resolves one directory child into a [`DirectoryEntry`].
///
/// Implementations are shared across the scanner's worker threads.
pub trait EntryInspector: Send + Sync + 'static {
    fn inspect(&self, parent: &Path, name: &OsStr) -> Result<DirectoryEntry, AppError>;
}

/// Inspector backed by the real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsInspector;

impl EntryInspector for FsInspector {
    fn inspect(&self, parent: &Path, name: &OsStr) -> Result<DirectoryEntry, AppError> {
        inspect(parent, name)
    }
}

/// Stats `parent/name` and sizes it.
///
/// Fails with [`AppError::Inspection`] if the child is gone or unreadable, or
/// with [`AppError::Traversal`] if it is a directory whose subtree cannot be
/// fully walked.
pub fn inspect(parent: &Path, name: &OsStr) -> Result<DirectoryEntry, AppError> {
    let path: PathBuf = parent.join(name);

    let meta: Metadata =
        fs::symlink_metadata(&path).map_err(|source| AppError::inspection(&path, source))?;
    let ftype: FileType = meta.file_type();
    let is_dir: bool = ftype.is_dir();

    let modified: SystemTime = meta
        .modified()
        .map_err(|source| AppError::inspection(&path, source))?;

    let byte_size: u64 = if is_dir {
        folder_size(&path)?
    } else {
        meta.len()
    };

    Ok(DirectoryEntry {
        relative_name: display_name(name),
        byte_size,
        modified,
        is_dir,
    })
}

/// Child name as text. Bytes that are not valid UTF-8 are written as `\xNN`,
/// so two names differing only in such bytes stay distinct.
fn display_name(name: &OsStr) -> CompactString {
    if let Some(text) = name.to_str() {
        return CompactString::new(text);
    }

    let mut out: CompactString = CompactString::default();
    for chunk in name.as_encoded_bytes().utf8_chunks() {
        out.push_str(chunk.valid());
        for byte in chunk.invalid() {
            let _ = write!(out, "\\x{byte:02X}");
        }
    }
    out
}
