//! Candidate eligibility and deterministic selection.

use std::path::Path;

use crate::model::{Candidate, DirectorySnapshot};

/// Pick the winning candidate from a fresh scan relative to `baseline`.
///
/// A file is eligible when its extension (case-insensitive) is in `allowed`
/// and it is either absent from the baseline or carries a strictly greater
/// modification time than the baseline recorded. Among eligible files the
/// greatest modification time wins; equal times are broken by the greatest
/// canonical path, making the choice a pure function of the scan contents.
///
/// Returns `None` when nothing is eligible, the normal "not ready yet"
/// outcome while polling.
#[must_use]
pub fn select_candidate(
    baseline: &DirectorySnapshot,
    scan: &DirectorySnapshot,
    allowed: &[String],
) -> Option<Candidate> {
    scan.iter()
        .filter(|(path, _)| has_allowed_extension(path, allowed))
        .filter(|(path, modified)| {
            baseline
                .modified(path)
                .is_none_or(|previous| **modified > previous)
        })
        .map(|(path, modified)| Candidate {
            path: path.clone(),
            modified: *modified,
        })
        // (modified, path) is a total order over distinct paths, so the
        // maximum is independent of map iteration order.
        .max_by(|a, b| {
            a.modified
                .cmp(&b.modified)
                .then_with(|| a.path.cmp(&b.path))
        })
}

fn has_allowed_extension(path: &Path, allowed: &[String]) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| {
            let dotted = format!(".{}", extension.to_ascii_lowercase());
            allowed.iter().any(|entry| *entry == dotted)
        })
}
