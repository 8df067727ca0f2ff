//! TOML configuration schema types for widget-grid.
//!
//! All structs derive `Deserialize` and `Serialize` with defaults via
//! `#[serde(default)]`, so a partial (or empty) file is always valid TOML
//! input. Duration fields use human-readable strings (e.g. `"5s"`,
//! `"750ms"`) parsed by the `humantime` crate.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::config::error::ConfigError;
use crate::config::xdg;
use crate::drag::GridMetrics;

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root configuration encompassing all sections.
///
/// Corresponds to the full TOML file structure:
/// ```toml
/// [dashboard]
/// [grid]
/// [persistence]
/// [logging]
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub dashboard: DashboardConfig,
    /// Pixel geometry used to map pointer input onto the grid.
    pub grid: GridConfig,
    pub persistence: PersistenceConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Checks values that parse as TOML but make no sense.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dashboard.user_id.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "dashboard.user_id",
                message: "must not be empty".to_string(),
            });
        }
        self.grid.validate()?;
        self.persistence.save_timeout()?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct DashboardConfig {
    /// Whose layout to load when `--user` is not given.
    pub user_id: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            user_id: "default".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Grid
// ---------------------------------------------------------------------------

/// Rendered grid geometry in pixels.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct GridConfig {
    /// Width of the dashboard container.
    pub container_width: f64,
    /// Height of one grid row.
    pub row_height: f64,
    /// Gap between adjacent widgets, horizontally and vertically.
    pub margin: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            container_width: 1200.0,
            row_height: 80.0,
            margin: 10.0,
        }
    }
}

impl GridConfig {
    pub fn metrics(&self) -> GridMetrics {
        GridMetrics::new(self.container_width, self.row_height, self.margin)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let positive = |key, value: f64| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::InvalidValue {
                    key,
                    message: format!("must be greater than zero, got {value}"),
                })
            }
        };
        positive("grid.container_width", self.container_width)?;
        positive("grid.row_height", self.row_height)?;
        if !self.margin.is_finite() || self.margin < 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "grid.margin",
                message: format!("must not be negative, got {}", self.margin),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct PersistenceConfig {
    /// Directory for layout blobs. Empty string means the XDG data directory.
    /// Tilde (`~`) is expanded.
    pub dir: String,
    /// Upper bound on a single save, as a human-readable duration.
    pub save_timeout: String,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            dir: String::new(),
            save_timeout: "5s".to_string(),
        }
    }
}

impl PersistenceConfig {
    /// Resolved blob directory.
    pub fn layouts_dir(&self) -> PathBuf {
        if self.dir.is_empty() {
            xdg::layouts_dir()
        } else {
            xdg::expand_tilde(&self.dir)
        }
    }

    /// Parsed `save_timeout`. Zero is rejected.
    pub fn save_timeout(&self) -> Result<Duration, ConfigError> {
        let timeout = humantime::parse_duration(&self.save_timeout).map_err(|e| {
            ConfigError::InvalidValue {
                key: "persistence.save_timeout",
                message: format!("{:?}: {}", self.save_timeout, e),
            }
        })?;
        if timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                key: "persistence.save_timeout",
                message: "must be greater than zero".to_string(),
            });
        }
        Ok(timeout)
    }
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Verbosity used when `WGRID_LOG` is not set.
    pub level: LogLevel,
    /// Path to log file. Empty string means stderr.
    pub file: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Warn,
            file: String::new(),
        }
    }
}

/// Log verbosity levels (kebab-case in TOML).
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum LogLevel {
    /// Only errors.
    Error,
    /// Errors and warnings (default).
    Warn,
    /// Informational messages.
    Info,
    /// Debug-level detail.
    Debug,
    /// Full trace output.
    Trace,
}

impl LogLevel {
    /// The level as an `EnvFilter` directive.
    pub fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
