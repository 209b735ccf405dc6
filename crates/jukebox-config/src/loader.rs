//! Settings loading: optional TOML file merged with environment overrides.
//!
//! # Design
//! - The file named by `JUKEBOX_CONFIG` seeds the tree; individual
//!   `JUKEBOX_*` variables override single fields on top of it.
//! - Overrides are applied through an injectable lookup so tests never touch
//!   the process environment.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{ConfigError, ConfigResult};
use crate::model::Settings;
use crate::validate;

/// Environment variable naming the optional TOML settings file.
pub const ENV_CONFIG_FILE: &str = "JUKEBOX_CONFIG";

const ENV_BIND_ADDR: &str = "JUKEBOX_BIND_ADDR";
const ENV_HTTP_PORT: &str = "JUKEBOX_HTTP_PORT";
const ENV_PUBLIC_BASE_URL: &str = "JUKEBOX_PUBLIC_BASE_URL";
const ENV_LIBRARY_DIR: &str = "JUKEBOX_LIBRARY_DIR";
const ENV_TRACK_COMMAND: &str = "JUKEBOX_TRACK_COMMAND";
const ENV_POLL_INTERVAL: &str = "JUKEBOX_POLL_INTERVAL";
const ENV_TIMEOUT_SECONDS: &str = "JUKEBOX_TIMEOUT_SECONDS";
const ENV_ALLOWED_EXTENSIONS: &str = "JUKEBOX_ALLOWED_EXTENSIONS";
const ENV_LOG_LEVEL: &str = "JUKEBOX_LOG_LEVEL";
const ENV_LOG_FORMAT: &str = "JUKEBOX_LOG_FORMAT";

impl Settings {
    /// Load settings from the process environment, honouring
    /// [`ENV_CONFIG_FILE`] when set.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read or parsed, or when the
    /// merged tree fails validation.
    pub fn load() -> ConfigResult<Self> {
        let mut settings = match std::env::var(ENV_CONFIG_FILE) {
            Ok(path) => Self::from_file(Path::new(&path))?,
            Err(_) => Self::default(),
        };
        settings.apply_env(|name| std::env::var(name).ok())?;
        settings.finish()
    }

    /// Parse settings from a TOML file. The tree is not validated until
    /// [`Settings::finish`] runs, so file values can still be overridden.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            operation: "settings.read_file",
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Self = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loaded settings file");
        Ok(settings)
    }

    /// Create the library directory when missing and return its path.
    ///
    /// # Errors
    ///
    /// Returns an error when the directory cannot be created.
    pub fn ensure_library_dir(&self) -> ConfigResult<PathBuf> {
        let dir = &self.acquire.library_dir;
        fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            operation: "settings.ensure_library_dir",
            path: dir.clone(),
            source,
        })?;
        Ok(dir.clone())
    }

    /// Apply `JUKEBOX_*` overrides from the provided lookup.
    pub(crate) fn apply_env(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> ConfigResult<()> {
        if let Some(value) = lookup(ENV_BIND_ADDR) {
            self.http.bind_addr = value.parse().map_err(|_| {
                ConfigError::invalid("env", ENV_BIND_ADDR, Some(value), "must_be_ip_addr")
            })?;
        }
        if let Some(value) = lookup(ENV_HTTP_PORT) {
            self.http.port = value.parse().map_err(|_| {
                ConfigError::invalid("env", ENV_HTTP_PORT, Some(value), "must_be_port")
            })?;
        }
        if let Some(value) = lookup(ENV_PUBLIC_BASE_URL) {
            self.http.public_base_url = Some(value);
        }
        if let Some(value) = lookup(ENV_LIBRARY_DIR) {
            self.acquire.library_dir = PathBuf::from(value);
        }
        if let Some(value) = lookup(ENV_TRACK_COMMAND) {
            self.acquire.command_template = value;
        }
        if let Some(value) = lookup(ENV_POLL_INTERVAL) {
            self.acquire.poll_interval_seconds = value.parse().map_err(|_| {
                ConfigError::invalid("env", ENV_POLL_INTERVAL, Some(value), "must_be_seconds")
            })?;
        }
        if let Some(value) = lookup(ENV_TIMEOUT_SECONDS) {
            self.acquire.timeout_seconds = value.parse().map_err(|_| {
                ConfigError::invalid("env", ENV_TIMEOUT_SECONDS, Some(value), "must_be_seconds")
            })?;
        }
        if let Some(value) = lookup(ENV_ALLOWED_EXTENSIONS) {
            self.acquire.allowed_extensions =
                value.split(',').map(str::to_string).collect();
        }
        if let Some(value) = lookup(ENV_LOG_LEVEL) {
            self.log.level = value;
        }
        if let Some(value) = lookup(ENV_LOG_FORMAT) {
            self.log.format = Some(value);
        }
        Ok(())
    }

    /// Normalise derived fields and validate the merged tree.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure in the tree.
    pub fn finish(mut self) -> ConfigResult<Self> {
        validate::normalize_extensions(&mut self.acquire.allowed_extensions);
        validate::validate(&self)?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn env_overrides_replace_file_values() {
        let mut settings = Settings::default();
        settings
            .apply_env(lookup_from(&[
                (ENV_HTTP_PORT, "9100"),
                (ENV_LIBRARY_DIR, "/srv/tracks"),
                (ENV_TRACK_COMMAND, "fetch {title}"),
                (ENV_POLL_INTERVAL, "0.5"),
                (ENV_ALLOWED_EXTENSIONS, "MP3, ogg"),
            ]))
            .expect("overrides should apply");

        let settings = settings.finish().expect("tree should validate");
        assert_eq!(settings.http.port, 9100);
        assert_eq!(settings.acquire.library_dir, PathBuf::from("/srv/tracks"));
        assert_eq!(settings.acquire.command_template, "fetch {title}");
        assert_eq!(settings.acquire.allowed_extensions, vec![".mp3", ".ogg"]);
    }

    #[test]
    fn malformed_env_values_are_typed_errors() {
        let mut settings = Settings::default();
        let err = settings
            .apply_env(lookup_from(&[(ENV_HTTP_PORT, "eighty")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidField { section: "env", .. }));
    }

    #[test]
    fn missing_template_fails_validation_after_merge() {
        let settings = Settings::default();
        assert!(settings.finish().is_err());
    }
}
