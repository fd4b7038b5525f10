//! src/service/listing.rs
//! ============================================================================
//! # Listing Service
//!
//! Entry point for the request layer: resolve the root, scan it, sort the
//! result and total it. Formatting for display is a separate projection so
//! callers can still use raw byte counts.

use std::path::PathBuf;
use std::time::Instant;

use tokio::fs as TokioFs;
use tracing::{info, instrument};

use crate::config::Locale;
use crate::error::AppError;
use crate::fs::dir_scanner::DirectoryScanner;
use crate::fs::entry_inspector::{DirectoryEntry, EntryInspector, FsInspector};
use crate::model::formatted::{FormattedEntry, format_entries};
use crate::model::sort::{SortSpec, sort_entries};

/// Outcome of one successful listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    /// Canonical path that was scanned
    pub root: PathBuf,

    /// Entries in the requested order
    pub entries: Vec<DirectoryEntry>,

    /// Sum of `byte_size` over `entries`
    pub total_size: u64,
}

impl Listing {
    #[must_use]
    pub fn formatted(&self, locale: Locale) -> Vec<FormattedEntry> {
        format_entries(&self.entries, locale)
    }
}

#[derive(Debug)]
pub struct ListingService<I: EntryInspector = FsInspector> {
    scanner: DirectoryScanner<I>,
}

impl ListingService<FsInspector> {
    #[must_use]
    pub fn new() -> Self {
        Self::with_scanner(DirectoryScanner::new())
    }
}

impl Default for ListingService<FsInspector> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: EntryInspector> Clone for ListingService<I> {
    fn clone(&self) -> Self {
        Self {
            scanner: self.scanner.clone(),
        }
    }
}

impl<I: EntryInspector> ListingService<I> {
    pub const fn with_scanner(scanner: DirectoryScanner<I>) -> Self {
        Self { scanner }
    }

    /// Scans `path`, sorts by `spec` and totals the entries.
    ///
    /// An empty `path` means the process working directory. Only
    /// directory-level failures are returned; children that could not be
    /// inspected are already absent from the listing.
    #[instrument(skip(self), fields(field = ?spec.field, direction = %spec.direction))]
    pub async fn list(&self, path: &str, spec: SortSpec) -> Result<Listing, AppError> {
        let started: Instant = Instant::now();

        let root: PathBuf = Self::resolve_root(path).await?;
        let scanned: Vec<DirectoryEntry> = self.scanner.scan(&root).await?;
        let entries: Vec<DirectoryEntry> = sort_entries(scanned, spec);

        let total_size: u64 = entries
            .iter()
            .fold(0u64, |acc, entry| acc.saturating_add(entry.byte_size));

        info!(
            marker = "LISTING",
            operation_type = "list",
            root = %root.display(),
            entries = entries.len(),
            total_size,
            duration_ms = started.elapsed().as_millis(),
            "Listing completed"
        );

        Ok(Listing {
            root,
            entries,
            total_size,
        })
    }

    async fn resolve_root(path: &str) -> Result<PathBuf, AppError> {
        let requested: PathBuf = if path.trim().is_empty() {
            PathBuf::from(".")
        } else {
            PathBuf::from(path)
        };

        TokioFs::canonicalize(&requested)
            .await
            .map_err(|source| AppError::directory_read(&requested, source))
    }
}
