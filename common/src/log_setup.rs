//! Tracing subscriber setup shared by applications and tests.
//!
//! Libraries only emit `tracing` events; whoever owns `main` decides where
//! they go by calling [`setup_logging`] once.

use std::path::PathBuf;
use std::sync::OnceLock;

use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{Builder, Rotation};
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogSettings {
    /// Filter directive, e.g. `info` or `swapfix=debug`. `RUST_LOG` wins when set.
    pub level: String,
    /// Directory for daily-rolling log files. `None` logs to the console only.
    pub directory: Option<PathBuf>,
    pub file_prefix: String,
    pub max_files: usize,
    pub console: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: Some(PathBuf::from("logs")),
            file_prefix: "swapfix".to_string(),
            max_files: 5,
            console: true,
        }
    }
}

/// Builds the subscriber described by `settings` without installing it.
///
/// Console output goes to stdout, with warnings and errors also on stderr.
/// The returned guard flushes the file writer when dropped and must outlive
/// any logging.
pub fn build_subscriber(
    settings: &LogSettings,
) -> anyhow::Result<(impl tracing::Subscriber + Send + Sync, Option<WorkerGuard>)> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .with_context(|| format!("Invalid log filter '{}'", settings.level))?;

    let console_layer = settings.console.then(|| {
        let console_writer = std::io::stdout.and(std::io::stderr.with_min_level(Level::WARN));
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_line_number(true)
            .with_ansi(true)
            .with_writer(console_writer)
    });

    let (file_layer, guard) = match &settings.directory {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

            let appender = Builder::new()
                .rotation(Rotation::DAILY)
                .filename_prefix(&settings.file_prefix)
                .filename_suffix("log")
                .max_log_files(settings.max_files)
                .build(dir)
                .context("Failed to create log file appender")?;
            let (writer, guard) = tracing_appender::non_blocking(appender);

            let layer = tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_line_number(true)
                .with_file(true)
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer);

    Ok((subscriber, guard))
}

/// Installs the global subscriber. Fails if logging is already set up.
pub fn setup_logging(settings: &LogSettings) -> anyhow::Result<()> {
    let (subscriber, guard) = build_subscriber(settings)?;
    subscriber
        .try_init()
        .map_err(|e| anyhow!("Logger initialization failed: {e}"))?;

    if let Some(guard) = guard {
        LOG_GUARD
            .set(guard)
            .map_err(|_| anyhow!("Logging already initialized"))?;
    }
    Ok(())
}

/// Test-only subscriber writing through the libtest capture.
/// Safe to call from every test; only the first call installs it.
pub fn init_test_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
