//! The acquisition coordinator.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;

use jukebox_config::AcquireProfile;
use jukebox_events::{Event, EventBus};
use jukebox_telemetry::Metrics;

use crate::command::{build_command, run_command};
use crate::error::AcquireResult;
use crate::model::{TrackRequest, TrackResult};
use crate::snapshot::snapshot_dir;
use crate::watch::watch_for_candidate;

/// Seam between the serving layer and the acquisition core.
#[async_trait]
pub trait TrackAcquirer: Send + Sync {
    /// Acquire a track for `title`, returning the produced file's path or a
    /// typed failure. One call is one full pipeline run; failed requests are
    /// reissued by the caller, never retried here.
    ///
    /// # Errors
    ///
    /// Returns an [`AcquireError`](crate::AcquireError) naming the stage that
    /// failed: validation, producer launch/exit, or the watch deadline.
    async fn acquire(&self, title: &str) -> AcquireResult<TrackResult>;
}

/// Coordinates one acquisition: validate → snapshot → invoke → watch.
///
/// The library directory is a shared, unsynchronized resource. Two
/// overlapping acquisitions against the same directory may each observe and
/// claim a file produced for the other; callers that need isolation must
/// serialize requests or give each producer its own directory.
pub struct AcquireService {
    profile: AcquireProfile,
    events: EventBus,
    telemetry: Metrics,
}

impl AcquireService {
    /// Build a service around an already validated profile.
    #[must_use]
    pub const fn new(profile: AcquireProfile, events: EventBus, telemetry: Metrics) -> Self {
        Self {
            profile,
            events,
            telemetry,
        }
    }

    /// Wrap the service in the trait object handed to the serving layer.
    #[must_use]
    pub fn into_handle(self) -> Arc<dyn TrackAcquirer> {
        Arc::new(self)
    }

    async fn run_pipeline(&self, request_id: Uuid, raw_title: &str) -> AcquireResult<TrackResult> {
        let request = TrackRequest::new(raw_title)?;
        self.publish(Event::TrackRequested {
            request_id,
            title: request.title().to_string(),
        });

        let baseline = snapshot_dir(&self.profile.library_dir).await?;
        info!(
            request_id = %request_id,
            title = %request.title(),
            baseline_files = baseline.len(),
            "starting acquisition"
        );

        let argv = build_command(&self.profile.command_template, request.title())?;
        run_command(&argv).await?;
        self.publish(Event::CommandCompleted { request_id });

        let candidate = watch_for_candidate(
            &self.profile.library_dir,
            &baseline,
            &self.profile.allowed_extensions,
            self.profile.poll_interval(),
            self.profile.timeout(),
            &self.telemetry,
        )
        .await?;

        let result = TrackResult {
            title: request.title().to_string(),
            path: candidate.path,
        };
        self.publish(Event::TrackReady {
            request_id,
            title: result.title.clone(),
            file_name: result.file_name().unwrap_or_default().to_string(),
        });
        info!(request_id = %request_id, path = %result.path.display(), "track acquired");
        Ok(result)
    }

    fn publish(&self, event: Event) {
        self.telemetry.inc_event(event.kind());
        self.events.publish(event);
    }
}

#[async_trait]
impl TrackAcquirer for AcquireService {
    async fn acquire(&self, title: &str) -> AcquireResult<TrackResult> {
        let request_id = Uuid::new_v4();
        let started = Instant::now();
        self.telemetry.acquisition_started();

        let outcome = self.run_pipeline(request_id, title).await;

        self.telemetry.acquisition_finished();
        self.telemetry.observe_acquire_latency(started.elapsed());
        match &outcome {
            Ok(_) => self.telemetry.inc_acquisition("succeeded"),
            Err(err) => {
                self.telemetry.inc_acquisition(err.kind());
                warn!(request_id = %request_id, error = %err, "acquisition failed");
                self.publish(Event::AcquireFailed {
                    request_id,
                    reason: err.kind().to_string(),
                });
            }
        }

        outcome
    }
}
