//! Logging configuration using tracing.
//!
//! The terminal belongs to the UI, so all log output goes to a daily rolling
//! file under `~/.local/share/coderefine/logs/`. The level is controlled by the
//! `CODEREFINE_LOG` environment variable.
//!
//! ```bash
//! CODEREFINE_LOG=debug coderefine
//! CODEREFINE_LOG=coderefine_core=trace coderefine
//! ```

use std::path::PathBuf;

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEFAULT_FILTER: &str = "coderefine=info,coderefine_core=info,warn";

/// Initialises the global subscriber. Must run before the terminal is set up
/// so that directory errors can still be reported on stderr.
///
/// # Errors
///
/// Returns an I/O error if the log directory cannot be created.
pub fn init() -> std::io::Result<PathBuf> {
    let log_dir = log_directory();
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "coderefine.log");

    let env_filter = EnvFilter::try_from_env("CODEREFINE_LOG")
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true)
                .with_timer(fmt::time::ChronoLocal::new("%Y-%m-%d %H:%M:%S%.3f".to_string())),
        )
        .init();

    tracing::info!("CodeRefine {} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!("Log directory: {}", log_dir.display());

    Ok(log_dir)
}

fn log_directory() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("coderefine")
        .join("logs")
}
