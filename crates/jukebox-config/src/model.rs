//! Typed settings profiles consumed by the jukebox services.
//!
//! # Design
//! - Pure data carriers; loading and validation live in `loader.rs` and
//!   `validate.rs`.
//! - No process-global settings object: a `Settings` value is built once at
//!   bootstrap and handed to each service explicitly.

use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::defaults;

/// Placeholder token in the producer command template that is replaced with
/// the requested track title.
pub const TITLE_PLACEHOLDER: &str = "{title}";

/// Full configuration tree for one jukebox process.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    /// HTTP listener configuration.
    #[serde(default)]
    pub http: HttpProfile,
    /// Track acquisition configuration.
    #[serde(default)]
    pub acquire: AcquireProfile,
    /// Logging configuration.
    #[serde(default)]
    pub log: LogProfile,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct HttpProfile {
    /// Address the listener binds to.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: IpAddr,
    /// Port the listener binds to.
    #[serde(default = "default_http_port")]
    pub port: u16,
    /// Absolute base URL used when building stream URLs. When unset, the
    /// request's `Host` and `X-Forwarded-Proto` headers are used instead.
    #[serde(default)]
    pub public_base_url: Option<String>,
}

impl Default for HttpProfile {
    fn default() -> Self {
        Self {
            bind_addr: defaults::BIND_ADDR,
            port: defaults::HTTP_PORT,
            public_base_url: None,
        }
    }
}

/// Track acquisition configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AcquireProfile {
    /// Directory scanned and watched for produced track files. Created at
    /// bootstrap when missing.
    #[serde(default = "default_library_dir")]
    pub library_dir: PathBuf,
    /// Producer command template containing exactly one [`TITLE_PLACEHOLDER`]
    /// occurrence.
    #[serde(default)]
    pub command_template: String,
    /// Seconds between directory re-scans during the watch phase. Values
    /// below the runtime floor are clamped, not rejected.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: f64,
    /// Total seconds the watch phase may spend before reporting a timeout.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: f64,
    /// Case-insensitive, dot-prefixed extensions eligible as track files.
    /// Entries are normalised to lowercase with a leading dot at load time.
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,
}

impl Default for AcquireProfile {
    fn default() -> Self {
        Self {
            library_dir: default_library_dir(),
            command_template: String::new(),
            poll_interval_seconds: defaults::POLL_INTERVAL_SECONDS,
            timeout_seconds: defaults::TIMEOUT_SECONDS,
            allowed_extensions: default_allowed_extensions(),
        }
    }
}

impl AcquireProfile {
    /// Pause between directory re-scans.
    ///
    /// Validation guarantees the configured value converts; the fallback only
    /// guards hand-built profiles that bypassed [`Settings::load`](crate::Settings::load).
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::try_from_secs_f64(self.poll_interval_seconds)
            .unwrap_or_else(|_| Duration::from_secs_f64(defaults::POLL_INTERVAL_SECONDS))
    }

    /// Total time the watch phase may spend.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::try_from_secs_f64(self.timeout_seconds)
            .unwrap_or_else(|_| Duration::from_secs_f64(defaults::TIMEOUT_SECONDS))
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LogProfile {
    /// Default log level when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Output format: `json` or `pretty`. Inferred from the build profile
    /// when absent.
    #[serde(default)]
    pub format: Option<String>,
}

impl Default for LogProfile {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
            format: None,
        }
    }
}

const fn default_bind_addr() -> IpAddr {
    defaults::BIND_ADDR
}

const fn default_http_port() -> u16 {
    defaults::HTTP_PORT
}

fn default_library_dir() -> PathBuf {
    PathBuf::from(defaults::LIBRARY_DIR)
}

const fn default_poll_interval() -> f64 {
    defaults::POLL_INTERVAL_SECONDS
}

const fn default_timeout() -> f64 {
    defaults::TIMEOUT_SECONDS
}

fn default_allowed_extensions() -> Vec<String> {
    defaults::ALLOWED_EXTENSIONS
        .iter()
        .copied()
        .map(str::to_string)
        .collect()
}

fn default_log_level() -> String {
    defaults::LOG_LEVEL.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_the_documented_values() {
        let settings = Settings::default();
        assert_eq!(settings.http.port, 8000);
        assert!(settings.http.bind_addr.is_unspecified());
        assert!((settings.acquire.poll_interval_seconds - 1.0).abs() < f64::EPSILON);
        assert!((settings.acquire.timeout_seconds - 120.0).abs() < f64::EPSILON);
        assert_eq!(
            settings.acquire.allowed_extensions,
            vec![".mp3", ".m4a", ".wav", ".flac"]
        );
        assert_eq!(settings.log.level, "info");
        assert!(settings.log.format.is_none());
    }

    #[test]
    fn durations_convert_from_fractional_seconds() {
        let profile = AcquireProfile {
            poll_interval_seconds: 0.25,
            timeout_seconds: 1.5,
            ..AcquireProfile::default()
        };
        assert_eq!(profile.poll_interval(), Duration::from_millis(250));
        assert_eq!(profile.timeout(), Duration::from_millis(1500));
    }

    #[test]
    fn invalid_durations_fall_back_to_defaults() {
        let profile = AcquireProfile {
            poll_interval_seconds: -1.0,
            timeout_seconds: f64::NAN,
            ..AcquireProfile::default()
        };
        assert_eq!(profile.poll_interval(), Duration::from_secs(1));
        assert_eq!(profile.timeout(), Duration::from_secs(120));
    }
}
