//! Bounded polling for a produced track file.

use std::path::Path;
use std::time::Duration;

use tokio::time::{Instant, sleep};
use tracing::debug;

use jukebox_telemetry::Metrics;

use crate::error::{AcquireError, AcquireResult};
use crate::model::{Candidate, DirectorySnapshot};
use crate::selector::select_candidate;
use crate::snapshot::snapshot_dir;

/// Floor applied to the configured poll interval so a near-zero value cannot
/// busy-loop against the filesystem.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Re-scan `dir` until an eligible candidate appears or `timeout` elapses,
/// measured from the start of the watch. Between scans the task suspends for
/// `poll_interval`, clamped to [`MIN_POLL_INTERVAL`]. Once the deadline has
/// passed no further scan is attempted.
///
/// # Errors
///
/// Returns [`AcquireError::Timeout`] when the deadline elapses and
/// [`AcquireError::DirectoryAccess`] when a scan fails outright.
pub async fn watch_for_candidate(
    dir: &Path,
    baseline: &DirectorySnapshot,
    allowed: &[String],
    poll_interval: Duration,
    timeout: Duration,
    telemetry: &Metrics,
) -> AcquireResult<Candidate> {
    let poll = poll_interval.max(MIN_POLL_INTERVAL);
    let started = Instant::now();
    let deadline = started + timeout;

    while Instant::now() < deadline {
        let scan = snapshot_dir(dir).await?;
        telemetry.inc_watch_scan();

        if let Some(candidate) = select_candidate(baseline, &scan, allowed) {
            debug!(
                path = %candidate.path.display(),
                waited_ms = started.elapsed().as_millis(),
                "candidate found"
            );
            return Ok(candidate);
        }

        sleep(poll).await;
    }

    Err(AcquireError::Timeout {
        waited: started.elapsed(),
    })
}
