//! ``src/fs/dir_scanner.rs``
//!
//! # `Directory Scanner`: Concurrent Listing of One Directory
//!
//! Enumerates the immediate children of a directory and inspects every child
//! on its own blocking task. Each child keeps the slot of its enumeration
//! index, tasks hand their result back through the join set, and the scan
//! returns only once every task has finished. Children whose inspection
//! failed leave their slot empty and are dropped from the result.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::fs::{self, ReadDir};
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, info, warn};

use crate::error::AppError;
use crate::fs::entry_inspector::{DirectoryEntry, EntryInspector, FsInspector};

/// Scans `path` with the filesystem inspector.
pub async fn scan_dir(path: &Path) -> Result<Vec<DirectoryEntry>, AppError> {
    DirectoryScanner::new().scan(path).await
}

type SlotResult = (usize, Result<DirectoryEntry, AppError>);

/// Fans out one inspection per child and joins them all before returning.
#[derive(Debug)]
pub struct DirectoryScanner<I: EntryInspector = FsInspector> {
    inspector: Arc<I>,
}

impl DirectoryScanner<FsInspector> {
    #[must_use]
    pub fn new() -> Self {
        Self::with_inspector(FsInspector)
    }
}

impl Default for DirectoryScanner<FsInspector> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: EntryInspector> Clone for DirectoryScanner<I> {
    fn clone(&self) -> Self {
        Self {
            inspector: Arc::clone(&self.inspector),
        }
    }
}

impl<I: EntryInspector> DirectoryScanner<I> {
    pub fn with_inspector(inspector: I) -> Self {
        Self {
            inspector: Arc::new(inspector),
        }
    }

    /// Lists and sizes every immediate child of `path`.
    ///
    /// Fails with [`AppError::DirectoryRead`] when `path` is missing, is not a
    /// directory or cannot be read. Per-child failures never fail the scan.
    /// The returned entries follow enumeration order.
    pub async fn scan(&self, path: &Path) -> Result<Vec<DirectoryEntry>, AppError> {
        let start_time: Instant = Instant::now();

        let names: Vec<OsString> = Self::read_child_names(path).await?;
        let child_count: usize = names.len();

        // One slot per enumerated child; only the task for index i fills slot i.
        let mut slots: Vec<Option<DirectoryEntry>> = Vec::with_capacity(child_count);
        slots.resize_with(child_count, || None);

        let parent: Arc<PathBuf> = Arc::new(path.to_path_buf());
        let mut tasks: JoinSet<SlotResult> = JoinSet::new();

        for (index, name) in names.into_iter().enumerate() {
            let inspector: Arc<I> = Arc::clone(&self.inspector);
            let parent: Arc<PathBuf> = Arc::clone(&parent);

            tasks.spawn_blocking(move || -> SlotResult {
                (index, inspector.inspect(&parent, &name))
            });
        }

        let mut skipped: usize = 0;

        // Barrier: drain every task before the slots are read.
        while let Some(joined) = tasks.join_next().await {
            if !Self::fill_slot(&mut slots, joined) {
                skipped += 1;
            }
        }

        let entries: Vec<DirectoryEntry> = slots.into_iter().flatten().collect();

        let duration: Duration = start_time.elapsed();
        info!(
            marker = "PERF_DIRECTORY_SCAN",
            operation_type = "scan_dir",
            path = %path.display(),
            children = child_count,
            listed = entries.len(),
            skipped,
            duration_ns = duration.as_nanos(),
            "Directory scan completed in {:?}",
            duration
        );

        Ok(entries)
    }

    /// Stores one task's outcome. Returns `false` if the child was dropped.
    fn fill_slot(
        slots: &mut [Option<DirectoryEntry>],
        joined: Result<SlotResult, JoinError>,
    ) -> bool {
        match joined {
            Ok((index, Ok(entry))) => match slots.get_mut(index) {
                Some(slot) => {
                    *slot = Some(entry);
                    true
                }

                None => {
                    warn!(index, "Inspection returned an out-of-range slot");
                    false
                }
            },

            Ok((index, Err(e))) => {
                // Expected on a live filesystem: the child is simply omitted
                debug!(index, error = %e, "Skipping entry that could not be inspected");
                false
            }

            Err(e) => {
                warn!(error = %e, "Inspection task did not complete");
                false
            }
        }
    }

    async fn read_child_names(path: &Path) -> Result<Vec<OsString>, AppError> {
        let mut read_dir: ReadDir = fs::read_dir(path)
            .await
            .map_err(|source| AppError::directory_read(path, source))?;

        let mut names: Vec<OsString> = Vec::new();

        while let Some(entry_result) = read_dir.next_entry().await.transpose() {
            match entry_result {
                Ok(entry) => names.push(entry.file_name()),

                Err(e) => {
                    // Log the error but continue enumerating other entries
                    debug!(path = %path.display(), error = %e, "Failed to read directory entry");
                }
            }
        }

        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use compact_str::CompactString;
    use std::collections::BTreeSet;
    use std::ffi::OsStr;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::SystemTime;
    use tempfile::TempDir;

    fn create_test_directory(files: usize, dirs: usize) -> TempDir {
        let temp_dir = TempDir::new().unwrap();

        for i in 0..files {
            std::fs::write(temp_dir.path().join(format!("file{i}.txt")), vec![b'a'; i + 1])
                .unwrap();
        }

        for i in 0..dirs {
            let dir = temp_dir.path().join(format!("dir{i}"));
            std::fs::create_dir(&dir).unwrap();
            std::fs::write(dir.join("inner.bin"), vec![b'b'; 10]).unwrap();
        }

        temp_dir
    }

    fn names_of(entries: &[DirectoryEntry]) -> BTreeSet<String> {
        entries
            .iter()
            .map(|entry| entry.relative_name.to_string())
            .collect()
    }

    /// Deletes one child right before inspecting it.
    struct VanishingInspector {
        victim: &'static str,
    }

    impl EntryInspector for VanishingInspector {
        fn inspect(&self, parent: &Path, name: &OsStr) -> Result<DirectoryEntry, AppError> {
            if name == self.victim {
                std::fs::remove_file(parent.join(name)).unwrap();
            }

            FsInspector.inspect(parent, name)
        }
    }

    /// Sleeps a name-dependent amount and counts finished inspections.
    struct SlowInspector {
        completed: Arc<AtomicUsize>,
    }

    impl EntryInspector for SlowInspector {
        fn inspect(&self, _parent: &Path, name: &OsStr) -> Result<DirectoryEntry, AppError> {
            let name = name.to_string_lossy();
            let n: u64 = name.trim_start_matches("child").parse().unwrap_or(0);

            std::thread::sleep(Duration::from_millis((n * 7) % 23));
            self.completed.fetch_add(1, Ordering::SeqCst);

            Ok(DirectoryEntry {
                relative_name: CompactString::new(&name),
                byte_size: n,
                modified: SystemTime::now(),
                is_dir: false,
            })
        }
    }

    struct PanickingInspector;

    impl EntryInspector for PanickingInspector {
        fn inspect(&self, parent: &Path, name: &OsStr) -> Result<DirectoryEntry, AppError> {
            assert!(name != "bad.txt", "inspector blew up");
            FsInspector.inspect(parent, name)
        }
    }

    #[tokio::test]
    async fn test_every_child_listed_exactly_once() {
        let temp_dir = create_test_directory(6, 4);

        let entries = scan_dir(temp_dir.path()).await.unwrap();

        assert_eq!(entries.len(), 10);
        let expected: BTreeSet<String> = (0..6)
            .map(|i| format!("file{i}.txt"))
            .chain((0..4).map(|i| format!("dir{i}")))
            .collect();
        assert_eq!(names_of(&entries), expected);

        for entry in entries.iter().filter(|entry| entry.is_dir) {
            assert_eq!(entry.byte_size, 10);
        }
    }

    #[tokio::test]
    async fn test_results_follow_enumeration_order() {
        let temp_dir = create_test_directory(20, 5);

        let enumerated: Vec<String> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();

        let entries = scan_dir(temp_dir.path()).await.unwrap();
        let scanned: Vec<String> = entries
            .iter()
            .map(|entry| entry.relative_name.to_string())
            .collect();

        assert_eq!(scanned, enumerated);
    }

    #[tokio::test]
    async fn test_vanished_child_leaves_no_placeholder() {
        let temp_dir = create_test_directory(5, 2);
        std::fs::write(temp_dir.path().join("victim.txt"), b"bye").unwrap();

        let scanner = DirectoryScanner::with_inspector(VanishingInspector {
            victim: "victim.txt",
        });
        let entries = scanner.scan(temp_dir.path()).await.unwrap();

        assert_eq!(entries.len(), 7);
        assert!(entries.iter().all(|entry| entry.relative_name != "victim.txt"));
        assert!(entries.iter().all(|entry| !entry.relative_name.is_empty()));
    }

    #[tokio::test]
    async fn test_scan_waits_for_slowest_inspection() {
        let temp_dir = TempDir::new().unwrap();
        for i in 0..50 {
            std::fs::write(temp_dir.path().join(format!("child{i}")), b"").unwrap();
        }

        let completed = Arc::new(AtomicUsize::new(0));
        let scanner = DirectoryScanner::with_inspector(SlowInspector {
            completed: Arc::clone(&completed),
        });

        let entries = scanner.scan(temp_dir.path()).await.unwrap();

        assert_eq!(completed.load(Ordering::SeqCst), 50);
        assert_eq!(entries.len(), 50);
        let total: u64 = entries.iter().map(|entry| entry.byte_size).sum();
        assert_eq!(total, (0..50).sum::<u64>());
    }

    #[tokio::test]
    async fn test_panicking_inspection_drops_only_that_child() {
        let temp_dir = create_test_directory(3, 0);
        std::fs::write(temp_dir.path().join("bad.txt"), b"x").unwrap();

        let scanner = DirectoryScanner::with_inspector(PanickingInspector);
        let entries = scanner.scan(temp_dir.path()).await.unwrap();

        assert_eq!(entries.len(), 3);
        assert!(entries.iter().all(|entry| entry.relative_name != "bad.txt"));
    }

    #[tokio::test]
    async fn test_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        assert!(scan_dir(temp_dir.path()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_or_non_directory_path_is_fatal() {
        let temp_dir = create_test_directory(1, 0);

        let missing = scan_dir(&temp_dir.path().join("nope")).await.unwrap_err();
        assert!(matches!(missing, AppError::DirectoryRead { .. }));
        assert!(missing.is_fatal());

        let not_dir = scan_dir(&temp_dir.path().join("file0.txt"))
            .await
            .unwrap_err();
        assert!(matches!(not_dir, AppError::DirectoryRead { .. }));
    }
}
