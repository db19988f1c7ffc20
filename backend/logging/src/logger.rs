//! Structured Logger
//!
//! Wraps `tracing` to provide a human-readable console layer, a rolling
//! NDJSON file layer, and environment-based level control.

use std::path::Path;

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the global structured logger.
///
/// `RUST_LOG` takes precedence over `level`. The file layer writes
/// `crumb.<date>.log` under `log_dir`; if the directory cannot be used the
/// logger falls back to the console layer alone. Pass `console = false` when
/// stdout/stderr belong to a full-screen terminal UI.
pub fn init_logger<P: AsRef<Path>>(log_dir: P, level: &str, console: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("crumb")
        .filename_suffix("log")
        .build(log_dir.as_ref());

    let file_layer = match file_appender {
        Ok(appender) => Some(
            fmt::layer()
                .json()
                .with_writer(appender)
                .with_ansi(false),
        ),
        Err(e) => {
            eprintln!(
                "WARN: cannot write logs to {}: {e}; file logging disabled",
                log_dir.as_ref().display()
            );
            None
        }
    };

    let console_layer = console.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_ansi(true)
    });

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init();
}
