//! Logging setup
//!
//! Console output goes to stderr and is filtered by `CHECKERS_LOG`, then
//! `RUST_LOG`, then `warn`. A JSON log at debug level is written daily to
//! `CHECKERS_LOG_DIR`, or `~/.checkers/logs` when that is unset. File
//! logging is skipped when no directory can be created.

use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const LOG_FILTER_ENV: &str = "CHECKERS_LOG";
const LOG_DIR_ENV: &str = "CHECKERS_LOG_DIR";
const LOG_FILE_PREFIX: &str = "checkers.log";
const DEFAULT_CONSOLE_DIRECTIVE: &str = "warn";

/// Install the global subscriber. Keep the guard alive until exit so the
/// file log is flushed.
pub fn init() -> Option<WorkerGuard> {
    let directive = console_directive(
        std::env::var(LOG_FILTER_ENV).ok(),
        std::env::var(EnvFilter::DEFAULT_ENV).ok(),
    );
    let console = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(
            EnvFilter::try_new(&directive)
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_CONSOLE_DIRECTIVE)),
        );

    let log_dir = log_dir(
        std::env::var_os(LOG_DIR_ENV).map(PathBuf::from),
        dirs::home_dir(),
    )
    .filter(|dir| std::fs::create_dir_all(dir).is_ok());

    let (file, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .json()
                .with_writer(writer)
                .with_filter(EnvFilter::new("debug"));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(console)
        .with(file)
        .init();

    guard
}

/// First non-blank filter directive, in precedence order
fn console_directive(checkers_log: Option<String>, rust_log: Option<String>) -> String {
    [checkers_log, rust_log]
        .into_iter()
        .flatten()
        .find(|d| !d.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_CONSOLE_DIRECTIVE.to_string())
}

fn log_dir(override_dir: Option<PathBuf>, home: Option<PathBuf>) -> Option<PathBuf> {
    override_dir
        .filter(|dir| !dir.as_os_str().is_empty())
        .or_else(|| home.map(|home| home.join(".checkers").join("logs")))
}
