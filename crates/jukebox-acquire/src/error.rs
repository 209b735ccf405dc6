//! Error types for the acquisition pipeline.
//!
//! # Design
//! - One variant per failure the caller must distinguish; no failure is
//!   reported by panicking or by stringly-typed errors.
//! - Constant messages with context carried in structured fields.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Primary error type for acquisition operations.
#[derive(Debug, Error)]
pub enum AcquireError {
    /// The requested title was empty after trimming.
    #[error("track title must not be empty")]
    InvalidRequest,
    /// The rendered command could not be split into shell words.
    #[error("producer command could not be tokenized")]
    CommandParse {
        /// Command line after placeholder substitution.
        rendered: String,
        /// Source tokenizer error.
        source: shell_words::ParseError,
    },
    /// The rendered command produced an empty argument vector.
    #[error("producer command produced no arguments")]
    EmptyCommand {
        /// Command line after placeholder substitution.
        rendered: String,
    },
    /// The producer process could not be launched.
    #[error("producer command could not be launched")]
    Spawn {
        /// Program that failed to start.
        program: String,
        /// Source IO error.
        source: io::Error,
    },
    /// The producer process exited unsuccessfully.
    #[error("producer command exited with failure")]
    CommandFailed {
        /// Observed exit code; `None` when terminated by a signal.
        code: Option<i32>,
    },
    /// No eligible file appeared before the watch deadline.
    #[error("no matching file appeared before the deadline")]
    Timeout {
        /// Wall-clock time spent watching.
        waited: Duration,
    },
    /// The library directory could not be scanned.
    #[error("library directory is not usable")]
    DirectoryAccess {
        /// Directory that failed to open.
        path: PathBuf,
        /// Source IO error.
        source: io::Error,
    },
}

impl AcquireError {
    /// Stable discriminator used for metrics labels and event payloads.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid_request",
            Self::CommandParse { .. } | Self::EmptyCommand { .. } => "invalid_command",
            Self::Spawn { .. } => "spawn_failed",
            Self::CommandFailed { .. } => "command_failed",
            Self::Timeout { .. } => "timeout",
            Self::DirectoryAccess { .. } => "directory_error",
        }
    }
}

/// Convenience alias for acquisition results.
pub type AcquireResult<T> = Result<T, AcquireError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_are_stable() {
        assert_eq!(AcquireError::InvalidRequest.kind(), "invalid_request");
        assert_eq!(
            AcquireError::CommandFailed { code: Some(3) }.kind(),
            "command_failed"
        );
        assert_eq!(
            AcquireError::Timeout {
                waited: Duration::from_secs(1)
            }
            .kind(),
            "timeout"
        );
        assert_eq!(
            AcquireError::DirectoryAccess {
                path: PathBuf::from("/missing"),
                source: io::Error::new(io::ErrorKind::NotFound, "missing"),
            }
            .kind(),
            "directory_error"
        );
    }
}
