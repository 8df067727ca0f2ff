//! Logging initialization for the `wgrid` binary.
//!
//! Configures the `tracing` subscriber with level filtering via the
//! `WGRID_LOG` environment variable. Falls back to the configured
//! `[logging] level` when the variable is unset or invalid.
//!
//! # Usage
//!
//! ```bash
//! # Configured level (warn by default)
//! wgrid show
//!
//! # Debug level
//! WGRID_LOG=debug wgrid add equity-curve
//!
//! # Module-specific filtering
//! WGRID_LOG=widget_grid::store=trace,warn wgrid reset
//! ```

use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::schema::LoggingConfig;
use crate::config::xdg;

/// Environment variable holding filter directives.
pub const LOG_ENV: &str = "WGRID_LOG";

/// Builds the filter from `WGRID_LOG`, falling back to `fallback`.
fn filter(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// Initialize the tracing subscriber.
///
/// Output goes to stderr, or is appended to `config.file` when set. A
/// second call is a no-op.
///
/// # Errors
///
/// Returns the I/O error if the log file cannot be opened.
pub fn init(config: &LoggingConfig) -> std::io::Result<()> {
    let filter = filter(config.level.as_directive());

    if config.file.is_empty() {
        let _ = fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init();
        return Ok(());
    }

    let path = xdg::expand_tilde(&config.file);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    let _ = fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
    Ok(())
}
