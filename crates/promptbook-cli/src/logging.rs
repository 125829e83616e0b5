//! Tracing setup for the binary.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

const LOG_FILE_PREFIX: &str = "promptbook.log";

/// Installs the global subscriber.
///
/// `RUST_LOG` wins over `default_level`. Stderr only shows warnings unless
/// `verbose` is set; the daily log file under `logs_dir` gets everything the
/// filter lets through. The returned guard must live until exit so buffered
/// log lines are flushed.
pub fn init(default_level: &str, verbose: bool, logs_dir: Option<&Path>) -> Option<WorkerGuard> {
    let directive = std::env::var("RUST_LOG").unwrap_or_else(|_| default_level.to_string());

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(if verbose {
            EnvFilter::new(&directive)
        } else {
            EnvFilter::new("warn")
        });

    let (file_layer, guard) = match logs_dir {
        Some(dir) if std::fs::create_dir_all(dir).is_ok() => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(EnvFilter::new(&directive));
            (Some(layer), Some(guard))
        }
        _ => (None, None),
    };

    // A second init (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .try_init();

    guard
}
