//! Directory snapshots used as diff baselines.

use std::collections::HashMap;
use std::path::Path;

use tokio::fs;
use tracing::trace;

use crate::error::{AcquireError, AcquireResult};
use crate::model::DirectorySnapshot;

/// Capture the canonical path and last-modified time of every regular file
/// directly inside `dir`. Non-recursive; symlinks are only resolved through
/// canonicalization.
///
/// Entries that vanish or become unreadable mid-scan are skipped: the
/// producer may be writing into the directory while we look.
///
/// # Errors
///
/// Returns [`AcquireError::DirectoryAccess`] when the directory itself cannot
/// be opened or iterated.
pub async fn snapshot_dir(dir: &Path) -> AcquireResult<DirectorySnapshot> {
    let mut reader = fs::read_dir(dir)
        .await
        .map_err(|source| AcquireError::DirectoryAccess {
            path: dir.to_path_buf(),
            source,
        })?;

    let mut entries = HashMap::new();
    loop {
        let entry = reader
            .next_entry()
            .await
            .map_err(|source| AcquireError::DirectoryAccess {
                path: dir.to_path_buf(),
                source,
            })?;
        let Some(entry) = entry else { break };

        let path = entry.path();
        let Ok(metadata) = fs::metadata(&path).await else {
            trace!(path = %path.display(), "skipping unreadable entry");
            continue;
        };
        if !metadata.is_file() {
            continue;
        }
        let Ok(modified) = metadata.modified() else {
            trace!(path = %path.display(), "skipping entry without mtime");
            continue;
        };
        let Ok(canonical) = fs::canonicalize(&path).await else {
            trace!(path = %path.display(), "skipping entry that vanished mid-scan");
            continue;
        };

        entries.insert(canonical, modified);
    }

    Ok(DirectorySnapshot::from_entries(entries))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn captures_only_regular_files_at_the_top_level() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("a.mp3"), b"audio").expect("write");
        std::fs::write(dir.path().join("notes.txt"), b"text").expect("write");
        std::fs::create_dir(dir.path().join("nested")).expect("mkdir");
        std::fs::write(dir.path().join("nested").join("b.mp3"), b"audio").expect("write");

        let snapshot = snapshot_dir(dir.path()).await.expect("snapshot");
        assert_eq!(snapshot.len(), 2, "the nested file must not be captured");

        let canonical_root = std::fs::canonicalize(dir.path()).expect("canonicalize");
        assert!(snapshot.modified(&canonical_root.join("a.mp3")).is_some());
        assert!(snapshot.modified(&canonical_root.join("notes.txt")).is_some());
    }

    #[tokio::test]
    async fn missing_directory_is_a_directory_access_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("absent");

        let err = snapshot_dir(&missing).await.unwrap_err();
        assert!(matches!(err, AcquireError::DirectoryAccess { .. }));
    }

    #[tokio::test]
    async fn a_file_path_is_a_directory_access_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = dir.path().join("plain.mp3");
        std::fs::write(&file, b"audio").expect("write");

        let err = snapshot_dir(&file).await.unwrap_err();
        assert!(matches!(err, AcquireError::DirectoryAccess { .. }));
    }
}
