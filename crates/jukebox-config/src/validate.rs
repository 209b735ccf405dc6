//! Validation and normalisation helpers for settings values.

use url::Url;

use crate::error::{ConfigError, ConfigResult};
use crate::model::{Settings, TITLE_PLACEHOLDER};

/// Validate a fully merged settings tree.
///
/// # Errors
///
/// Returns the first [`ConfigError::InvalidField`] encountered.
pub fn validate(settings: &Settings) -> ConfigResult<()> {
    if settings.http.port == 0 {
        return Err(ConfigError::invalid(
            "http",
            "port",
            Some(settings.http.port.to_string()),
            "must_be_nonzero",
        ));
    }

    if let Some(base) = settings.http.public_base_url.as_deref() {
        let parsed = Url::parse(base).map_err(|_| {
            ConfigError::invalid(
                "http",
                "public_base_url",
                Some(base.to_string()),
                "must_be_absolute_url",
            )
        })?;
        if parsed.cannot_be_a_base() {
            return Err(ConfigError::invalid(
                "http",
                "public_base_url",
                Some(base.to_string()),
                "must_be_absolute_url",
            ));
        }
    }

    validate_positive_seconds(
        settings.acquire.poll_interval_seconds,
        "poll_interval_seconds",
    )?;
    validate_positive_seconds(settings.acquire.timeout_seconds, "timeout_seconds")?;
    validate_command_template(&settings.acquire.command_template)?;

    if settings.acquire.allowed_extensions.is_empty() {
        return Err(ConfigError::invalid(
            "acquire",
            "allowed_extensions",
            None,
            "must_not_be_empty",
        ));
    }

    Ok(())
}

/// Normalise one extension entry to lowercase with a leading dot.
///
/// Returns `None` for entries that are empty once trimmed.
#[must_use]
pub fn normalize_extension(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_start_matches('.');
    if trimmed.is_empty() {
        return None;
    }
    Some(format!(".{}", trimmed.to_ascii_lowercase()))
}

/// Normalise the allow-list in place, dropping unusable entries.
pub(crate) fn normalize_extensions(entries: &mut Vec<String>) {
    let normalized: Vec<String> = entries
        .iter()
        .filter_map(|entry| normalize_extension(entry))
        .collect();
    *entries = normalized;
}

fn validate_positive_seconds(value: f64, field: &'static str) -> ConfigResult<()> {
    let valid = value.is_finite()
        && value > 0.0
        && std::time::Duration::try_from_secs_f64(value).is_ok();
    if valid {
        Ok(())
    } else {
        Err(ConfigError::invalid(
            "acquire",
            field,
            Some(value.to_string()),
            "must_be_positive_seconds",
        ))
    }
}

fn validate_command_template(template: &str) -> ConfigResult<()> {
    if template.trim().is_empty() {
        return Err(ConfigError::invalid(
            "acquire",
            "command_template",
            None,
            "must_not_be_empty",
        ));
    }

    match template.matches(TITLE_PLACEHOLDER).count() {
        1 => Ok(()),
        0 => Err(ConfigError::invalid(
            "acquire",
            "command_template",
            Some(template.to_string()),
            "missing_title_placeholder",
        )),
        _ => Err(ConfigError::invalid(
            "acquire",
            "command_template",
            Some(template.to_string()),
            "duplicate_title_placeholder",
        )),
    }
}
