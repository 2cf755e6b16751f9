//! Logging Infrastructure
//!
//! `tracing-subscriber` with an env filter, optional JSON lines and optional
//! daily rolling files.

use std::path::Path;

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is not set
fn default_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("ceylon_server={level},tower_http={level}")))
}

/// Initialize the logger with optional JSON format and file output
///
/// Files roll daily under `log_dir` as `ceylon-server.YYYY-MM-DD`; the
/// directory is created when missing.
pub fn init_logger_with_file(level: &str, json: bool, log_dir: Option<&str>) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(default_filter(level))
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(true);

    let file_appender = log_dir.and_then(|dir| {
        let path = Path::new(dir);
        if let Err(e) = std::fs::create_dir_all(path) {
            eprintln!("Cannot create log directory {dir}: {e}");
            return None;
        }
        Some(tracing_appender::rolling::daily(path, "ceylon-server"))
    });

    match (json, file_appender) {
        (true, Some(appender)) => builder.json().with_writer(appender).init(),
        (true, None) => builder.json().init(),
        (false, Some(appender)) => builder.with_ansi(false).with_writer(appender).init(),
        (false, None) => builder.init(),
    }
}
