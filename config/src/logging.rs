//! Tracing initialization for the forecast binaries.
//!
//! - **RUST_LOG**: filter, e.g. `info`, `forecast=debug`. Default: `info,hyper=warn`.
//! - **LOG_FILE**: when set, logs are also appended to this file (plain text, no ANSI).
//!
//! Console output goes to stderr so `forecast predict` keeps stdout for the JSON result.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const DEFAULT_FILTER: &str = "info,hyper=warn";

fn filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Installs the global subscriber. Keep the returned guard alive for the process lifetime
/// when `LOG_FILE` is set, otherwise buffered file lines are lost on exit.
pub fn init() -> Result<Option<WorkerGuard>, Box<dyn std::error::Error + Send + Sync>> {
    let console = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(filter());

    match std::env::var("LOG_FILE").ok().filter(|p| !p.trim().is_empty()) {
        Some(path) => {
            let path = Path::new(&path);
            let dir = path
                .parent()
                .filter(|d| !d.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let file_name = path
                .file_name()
                .ok_or_else(|| format!("LOG_FILE has no file name: {}", path.display()))?;
            std::fs::create_dir_all(dir)?;
            let appender = tracing_appender::rolling::never(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let file_layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(filter());
            tracing_subscriber::registry()
                .with(console)
                .with(file_layer)
                .try_init()?;
            tracing::info!(path = %path.display(), "logging to file");
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::registry().with(console).try_init()?;
            Ok(None)
        }
    }
}
