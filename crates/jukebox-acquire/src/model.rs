//! Data carriers for the acquisition pipeline.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::error::{AcquireError, AcquireResult};

/// A validated acquisition request: a non-empty title with surrounding
/// whitespace removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackRequest {
    title: String,
}

impl TrackRequest {
    /// Validate a raw title.
    ///
    /// # Errors
    ///
    /// Returns [`AcquireError::InvalidRequest`] when the title is empty or
    /// whitespace-only.
    pub fn new(raw: &str) -> AcquireResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AcquireError::InvalidRequest);
        }
        Ok(Self {
            title: trimmed.to_string(),
        })
    }

    /// The trimmed title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }
}

/// Immutable mapping of canonical file path to last-modified time, captured
/// at one instant for the regular files directly inside a directory.
#[derive(Debug, Clone, Default)]
pub struct DirectorySnapshot {
    entries: HashMap<PathBuf, SystemTime>,
}

impl DirectorySnapshot {
    pub(crate) const fn from_entries(entries: HashMap<PathBuf, SystemTime>) -> Self {
        Self { entries }
    }

    /// Number of files captured.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the snapshot captured no files.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Recorded modification time for a canonical path, when present.
    #[must_use]
    pub fn modified(&self, path: &Path) -> Option<SystemTime> {
        self.entries.get(path).copied()
    }

    /// Iterate over the captured `(path, modified)` pairs.
    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = (&PathBuf, &SystemTime)> {
        self.entries.iter()
    }
}

/// A file discovered after the baseline that may satisfy the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Canonical path of the discovered file.
    pub path: PathBuf,
    /// Last-modified time observed during the scan.
    pub modified: SystemTime,
}

/// Outcome of a successful acquisition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackResult {
    /// The trimmed requested title.
    pub title: String,
    /// Canonical path of the acquired file.
    pub path: PathBuf,
}

impl TrackResult {
    /// Final path component as UTF-8, when representable.
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|name| name.to_str())
    }
}
