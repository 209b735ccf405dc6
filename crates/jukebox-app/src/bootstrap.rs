//! Boot sequence: settings, telemetry, core service, API listener.

use std::net::SocketAddr;

use tracing::info;

use jukebox_acquire::AcquireService;
use jukebox_api::ApiServer;
use jukebox_config::Settings;
use jukebox_events::EventBus;
use jukebox_telemetry::{GlobalContextGuard, LoggingConfig, Metrics};

use crate::error::{AppError, AppResult};

/// Dependencies required to bootstrap the jukebox application.
pub(crate) struct BootstrapDependencies {
    settings: Settings,
    events: EventBus,
    telemetry: Metrics,
}

impl BootstrapDependencies {
    /// Construct production dependencies from the environment for the binary
    /// entrypoint.
    pub(crate) fn from_env() -> AppResult<Self> {
        let settings = Settings::load().map_err(|err| AppError::config("settings.load", err))?;
        settings
            .ensure_library_dir()
            .map_err(|err| AppError::config("settings.ensure_library_dir", err))?;

        let events = EventBus::new();
        let telemetry =
            Metrics::new().map_err(|err| AppError::telemetry("telemetry.metrics", err))?;

        Ok(Self {
            settings,
            events,
            telemetry,
        })
    }
}

/// Entry point for the jukebox application boot sequence.
///
/// # Errors
///
/// Returns an error if dependency construction or application startup fails.
pub async fn run_app() -> AppResult<()> {
    let dependencies = BootstrapDependencies::from_env()?;
    run_app_with(dependencies).await
}

/// Boot sequence that relies entirely on injected dependencies to simplify
/// testing.
pub(crate) async fn run_app_with(dependencies: BootstrapDependencies) -> AppResult<()> {
    let BootstrapDependencies {
        settings,
        events,
        telemetry,
    } = dependencies;

    let logging = logging_config(&settings);
    jukebox_telemetry::init_logging(&logging)
        .map_err(|err| AppError::telemetry("telemetry.init", err))?;
    let _context = GlobalContextGuard::new("bootstrap");

    info!("jukebox application bootstrap starting");

    let acquirer = AcquireService::new(
        settings.acquire.clone(),
        events.clone(),
        telemetry.clone(),
    )
    .into_handle();

    let api = ApiServer::new(&settings, acquirer, events, telemetry);
    let addr = listen_addr(&settings);
    info!(addr = %addr, "launching API listener");

    api.serve(addr)
        .await
        .map_err(|err| AppError::api_server("api_server.serve", err))?;
    info!("API server shutdown complete");
    Ok(())
}

fn logging_config(settings: &Settings) -> LoggingConfig<'_> {
    LoggingConfig {
        level: &settings.log.level,
        format: jukebox_telemetry::log_format_from_name(settings.log.format.as_deref()),
        build_sha: jukebox_telemetry::build_sha(),
    }
}

const fn listen_addr(settings: &Settings) -> SocketAddr {
    SocketAddr::new(settings.http.bind_addr, settings.http.port)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jukebox_telemetry::LogFormat;

    fn settings_for_tests() -> Settings {
        let mut settings = Settings::default();
        settings.http.port = 9100;
        settings.log.level = "debug".to_string();
        settings.log.format = Some("json".to_string());
        settings.acquire.command_template = "fetch {title}".to_string();
        settings
    }

    #[test]
    fn listen_addr_combines_bind_addr_and_port() {
        let addr = listen_addr(&settings_for_tests());
        assert_eq!(addr.port(), 9100);
        assert!(addr.ip().is_unspecified());
    }

    #[test]
    fn logging_config_reads_the_log_profile() {
        let settings = settings_for_tests();
        let logging = logging_config(&settings);
        assert_eq!(logging.level, "debug");
        assert!(matches!(logging.format, LogFormat::Json));
    }

    #[test]
    fn the_library_dir_is_created_before_serving() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut settings = settings_for_tests();
        settings.acquire.library_dir = dir.path().join("tracks");

        // Mirrors `from_env` without touching the process environment.
        settings.ensure_library_dir().expect("library dir");
        assert!(settings.acquire.library_dir.is_dir());
    }
}
