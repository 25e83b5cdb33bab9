/*!
 * Logging
 * Centralized tracing configuration: rolling log files plus a console layer.
 */
use std::{io, path::PathBuf};

use tracing_appender::{non_blocking, non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Guards for the background log writers. They MUST be held for the
/// programme's lifetime; dropping them loses buffered log lines.
#[must_use]
pub struct LogGuards {
    _guards: Vec<WorkerGuard>,
}

#[derive(Debug, Clone)]
pub struct LogSettings {
    pub environment: String,
    pub log_dir: Option<PathBuf>,
    pub verbose: bool,
}

impl LogSettings {
    pub fn from_env(log_dir: Option<PathBuf>, verbose: bool) -> Self {
        Self {
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            log_dir,
            verbose,
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    fn default_level(&self) -> String {
        std::env::var("LOG_LEVEL").unwrap_or_else(|_| {
            if self.verbose {
                "debug".to_string()
            } else if self.is_production() {
                "warn".to_string()
            } else {
                "info".to_string()
            }
        })
    }
}

/// Default location for log files: `<data_dir>/yuntas/logs`.
pub fn default_log_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|dir| dir.join("yuntas").join("logs"))
}

/// Initialize the logging system
pub fn init(settings: &LogSettings) -> LogGuards {
    let level = settings.default_level();
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("cli={level},services={level},utils={level}")));

    let mut guards = Vec::new();

    // Console output goes to stderr so command output on stdout stays clean.
    let (console_writer, console_guard) = non_blocking(io::stderr());
    guards.push(console_guard);

    let file_writers = settings.log_dir.as_ref().and_then(|dir| {
        std::fs::create_dir_all(dir).ok()?;
        let (file_writer, file_guard) = non_blocking(rolling::daily(dir, "yuntas.log"));
        let (error_writer, error_guard) = non_blocking(rolling::daily(dir, "error.log"));
        guards.push(file_guard);
        guards.push(error_guard);
        Some((file_writer, error_writer))
    });

    let subscriber = tracing_subscriber::registry().with(env_filter);

    if settings.is_production() {
        let console_layer = fmt::layer()
            .json()
            .with_writer(console_writer)
            .with_target(false);
        let file_layers = file_writers.map(|(file_writer, error_writer)| {
            fmt::layer()
                .json()
                .with_writer(file_writer)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .and_then(
                    fmt::layer()
                        .json()
                        .with_writer(error_writer)
                        .with_target(true)
                        .with_file(true)
                        .with_line_number(true)
                        .with_filter(tracing_subscriber::filter::LevelFilter::ERROR),
                )
        });
        subscriber.with(console_layer).with(file_layers).init();
    } else {
        let console_layer = fmt::layer()
            .with_writer(console_writer)
            .with_target(false)
            .compact();
        let file_layers = file_writers.map(|(file_writer, error_writer)| {
            fmt::layer()
                .with_writer(file_writer)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_ansi(false)
                .and_then(
                    fmt::layer()
                        .with_writer(error_writer)
                        .with_ansi(false)
                        .with_filter(tracing_subscriber::filter::LevelFilter::ERROR),
                )
        });
        subscriber.with(console_layer).with(file_layers).init();
    }

    tracing::debug!(environment = %settings.environment, "logging initialized");
    LogGuards { _guards: guards }
}
