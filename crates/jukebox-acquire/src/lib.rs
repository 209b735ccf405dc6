#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Track acquisition core: detect the file an opaque producer command leaves
//! behind in a shared directory.
//!
//! The pipeline per request is strictly sequential: validate the title, take
//! a baseline snapshot of the library directory, run the producer command to
//! completion, then poll the directory until a new or newly modified file
//! with an allowed extension appears or the watch deadline elapses.
//!
//! Layout: `model.rs` (requests, snapshots, candidates, results),
//! `snapshot.rs` (directory capture), `command.rs` (template rendering and
//! child process execution), `selector.rs` (candidate eligibility and
//! deterministic selection), `watch.rs` (bounded poll loop), `service.rs`
//! (the coordinating [`AcquireService`]).

pub mod command;
pub mod error;
pub mod model;
pub mod selector;
pub mod service;
pub mod snapshot;
pub mod watch;

pub use command::{build_command, run_command};
pub use error::{AcquireError, AcquireResult};
pub use model::{Candidate, DirectorySnapshot, TrackRequest, TrackResult};
pub use selector::select_candidate;
pub use service::{AcquireService, TrackAcquirer};
pub use snapshot::snapshot_dir;
pub use watch::{MIN_POLL_INTERVAL, watch_for_candidate};
