//! Default values applied when a setting is absent from file and environment.
#![allow(clippy::redundant_pub_crate)]

use std::net::{IpAddr, Ipv4Addr};

/// Address the HTTP listener binds to unless configured otherwise.
pub(crate) const BIND_ADDR: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
/// Port the HTTP listener binds to unless configured otherwise.
pub(crate) const HTTP_PORT: u16 = 8000;
/// Seconds between directory re-scans while waiting for a track.
pub(crate) const POLL_INTERVAL_SECONDS: f64 = 1.0;
/// Total seconds the watch phase may spend before giving up.
pub(crate) const TIMEOUT_SECONDS: f64 = 120.0;
/// Extensions considered eligible track files.
pub(crate) const ALLOWED_EXTENSIONS: &[&str] = &[".mp3", ".m4a", ".wav", ".flac"];
/// Directory scanned and watched for produced tracks.
pub(crate) const LIBRARY_DIR: &str = "/var/lib/jukebox/tracks";
/// Log level applied when `RUST_LOG` and configuration are both silent.
pub(crate) const LOG_LEVEL: &str = "info";
