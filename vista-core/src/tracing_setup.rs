//! Log output for the Vista binary.
//!
//! The console shows Vista's own events at the chosen level and only warnings
//! from dependencies such as reqwest. Every run also rewrites
//! `<logs_dir>/vista-last-run.log` with a full trace of the Vista crates, so a
//! failed browse can be inspected afterwards without a noisy terminal.

use std::fs::{File, create_dir_all};
use std::path::PathBuf;
use std::sync::Arc;

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

use crate::VistaError;
use crate::config::LoggingConfig;

/// Crate targets that follow the requested level.
const VISTA_TARGETS: &[&str] = &["vista_core", "vista_search", "vista"];

/// Log file written on every run, relative to the logs directory.
pub const LOG_FILE_NAME: &str = "vista-last-run.log";

/// Environment variable that replaces the console filter entirely.
pub const LOG_FILTER_ENV: &str = "VISTA_LOG";

/// `EnvFilter` directives: `others` for every target, `vista` for Vista crates.
pub fn filter_directives(vista: Level, others: Level) -> String {
    let mut directives = vec![others.as_str().to_ascii_lowercase()];
    directives.extend(
        VISTA_TARGETS
            .iter()
            .map(|target| format!("{target}={}", vista.as_str().to_ascii_lowercase())),
    );
    directives.join(",")
}

/// Installs the console and log file layers as the global subscriber.
///
/// `VISTA_LOG` overrides the console filter when it parses. Returns the path
/// of the log file.
///
/// # Errors
/// - `VistaError::Io` - Logs directory or log file cannot be created
/// - `VistaError::Configuration` - A global subscriber is already installed
pub fn init_tracing(console_level: Level, logging: &LoggingConfig) -> Result<PathBuf, VistaError> {
    create_dir_all(&logging.logs_dir)?;
    let log_file_path = logging.logs_dir.join(LOG_FILE_NAME);
    let log_file = File::create(&log_file_path)?;

    let console_filter = EnvFilter::try_from_env(LOG_FILTER_ENV)
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(console_level, Level::WARN)));

    let console_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(console_filter);

    let file_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false)
        .with_writer(Arc::new(log_file))
        .with_filter(EnvFilter::new(filter_directives(Level::TRACE, Level::INFO)));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| VistaError::Configuration {
            reason: format!("logging already initialized: {e}"),
        })?;

    tracing::debug!(
        console = %console_level,
        log_file = %log_file_path.display(),
        "Tracing initialized"
    );

    Ok(log_file_path)
}

/// Console verbosity chosen on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl CliLogLevel {
    pub fn as_tracing_level(self) -> Level {
        match self {
            CliLogLevel::Error => Level::ERROR,
            CliLogLevel::Warn => Level::WARN,
            CliLogLevel::Info => Level::INFO,
            CliLogLevel::Debug => Level::DEBUG,
            CliLogLevel::Trace => Level::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::ValueEnum;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_directives_scope_level_to_vista_crates() {
        assert_eq!(
            filter_directives(Level::DEBUG, Level::WARN),
            "warn,vista_core=debug,vista_search=debug,vista=debug"
        );
        assert!(EnvFilter::try_new(filter_directives(Level::TRACE, Level::INFO)).is_ok());
    }

    #[test]
    fn test_log_level_values() {
        assert_eq!(CliLogLevel::from_str("WARN", true), Ok(CliLogLevel::Warn));
        assert!(CliLogLevel::from_str("loud", true).is_err());
        assert_eq!(CliLogLevel::Trace.as_tracing_level(), Level::TRACE);
    }

    // Only test in this binary that installs a global subscriber.
    #[test]
    fn test_init_tracing_reports_failures() {
        let dir = TempDir::new().unwrap();

        let blocked = dir.path().join("not-a-dir");
        std::fs::write(&blocked, b"").unwrap();
        let error = init_tracing(
            Level::INFO,
            &LoggingConfig {
                logs_dir: blocked.join("logs"),
            },
        )
        .unwrap_err();
        assert!(matches!(error, VistaError::Io(_)));
        assert!(error.is_retryable());

        let logging = LoggingConfig {
            logs_dir: dir.path().join("logs"),
        };
        let log_file = init_tracing(Level::INFO, &logging).unwrap();
        assert_eq!(log_file, dir.path().join("logs").join(LOG_FILE_NAME));
        assert!(log_file.is_file());

        let again = init_tracing(Level::INFO, &logging).unwrap_err();
        assert!(matches!(again, VistaError::Configuration { .. }));
        assert!(again.is_user_error());
        assert!(again.user_message().starts_with("Invalid configuration"));
    }
}
