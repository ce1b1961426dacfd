//! Structured logging setup with console and file output.
//!
//! The library crates only emit `tracing` events. Binaries embedding ctxmenu
//! call [`init_logging`] once at startup. An interactive terminal gets console
//! output only; anything else also gets a daily rotating file under
//! [`log_dir`]. `CTXMENU_LOG` (then `RUST_LOG`) overrides the default filter.

use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

/// Environment variable consulted before `RUST_LOG`.
pub const LOG_ENV: &str = "CTXMENU_LOG";

type InitError = Box<dyn std::error::Error + Send + Sync>;

/// Logging configuration.
pub struct LogConfig {
    /// Directory for rotated log files
    pub log_dir: PathBuf,
    /// Whether stdout is an interactive terminal
    pub is_pty: bool,
    /// Filter directive overriding the environment
    pub log_filter: Option<String>,
}

impl LogConfig {
    /// Configuration writing files to `log_dir` unless stdout is a terminal.
    pub fn new(log_dir: PathBuf) -> Self {
        Self { log_dir, is_pty: atty::is(atty::Stream::Stdout), log_filter: None }
    }

    /// Builder: use a fixed filter directive.
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = Some(filter.into());
        self
    }
}

/// Keeps the file writer alive; dropping it flushes pending entries.
pub struct LoggingGuard {
    _worker_guard: Option<WorkerGuard>,
}

/// Install the global subscriber.
///
/// A log directory that cannot be used degrades to console output.
pub fn init_logging(config: LogConfig) -> LoggingGuard {
    let filter = config.log_filter.as_deref();
    if config.is_pty {
        init_console(filter);
        return LoggingGuard { _worker_guard: None };
    }

    match init_file(&config.log_dir, filter) {
        Ok(guard) => LoggingGuard { _worker_guard: Some(guard) },
        Err(e) => {
            init_console(filter);
            tracing::warn!(
                log_dir = %config.log_dir.display(),
                error = %e,
                "File logging unavailable, logging to console only"
            );
            LoggingGuard { _worker_guard: None }
        }
    }
}

fn init_console(filter: Option<&str>) {
    // A second init (tests, embedding hosts) keeps the existing subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(build_env_filter(filter))
        .with_target(false)
        .try_init();
}

fn init_file(log_dir: &Path, filter: Option<&str>) -> Result<WorkerGuard, InitError> {
    std::fs::create_dir_all(log_dir)?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("ctxmenu")
        .filename_suffix("log")
        .build(log_dir)?;
    let (file, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_writer(std::io::stdout.with_max_level(tracing::Level::INFO).and(file))
        .with_env_filter(build_env_filter(filter))
        .with_ansi(false)
        .try_init()?;

    Ok(guard)
}

/// Filter priority: explicit directive, `CTXMENU_LOG`, `RUST_LOG`, default.
fn build_env_filter(custom: Option<&str>) -> EnvFilter {
    let default = || EnvFilter::new(default_log_filter());
    match custom {
        Some(directive) => EnvFilter::try_new(directive).unwrap_or_else(|_| default()),
        None => EnvFilter::try_from_env(LOG_ENV)
            .or_else(|_| EnvFilter::try_from_env("RUST_LOG"))
            .unwrap_or_else(|_| default()),
    }
}

/// Default filter for the current build profile.
pub fn default_log_filter() -> &'static str {
    if cfg!(debug_assertions) {
        "info,ctxmenu=debug,ctxmenu_ui=debug,ctxmenu_core=debug"
    } else {
        "warn,ctxmenu=info,ctxmenu_ui=info,ctxmenu_core=info"
    }
}

/// Default log directory, under the platform's local data directory.
pub fn log_dir() -> PathBuf {
    dirs::data_local_dir().unwrap_or_else(std::env::temp_dir).join("ctxmenu").join("logs")
}
