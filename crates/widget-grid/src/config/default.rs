//! Default configuration template and file creation utilities.
//!
//! Provides a commented TOML template that matches `Config::default()` and
//! a function to write it to the XDG config path.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::error::ConfigError;
use crate::config::xdg;

// ---------------------------------------------------------------------------
// Default TOML template
// ---------------------------------------------------------------------------

/// A commented TOML template with all default values.
///
/// Every value here must match `Config::default()` from `schema.rs`.
/// Sections: `[dashboard]`, `[grid]`, `[persistence]`, `[logging]`.
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# widget-grid configuration
#
# This file was generated with default values.
# All values shown below are the built-in defaults.
#
# Location: $XDG_CONFIG_HOME/widget-grid/config.toml

# ==============================================================================
# Dashboard
# ==============================================================================

[dashboard]

# Layout owner used when --user is not given.
user_id = "default"

# ==============================================================================
# Grid geometry
# ==============================================================================

[grid]

# The grid always has 12 columns; these values map pixels onto it when
# dragging widgets.

# Width of the dashboard container in pixels.
container_width = 1200.0

# Height of a single grid row in pixels.
row_height = 80.0

# Gap between widgets in pixels.
margin = 10.0

# ==============================================================================
# Persistence
# ==============================================================================

[persistence]

# Directory for saved layouts, one JSON file per user.
# Empty string means $XDG_DATA_HOME/widget-grid/layouts.
# Tilde (~) is expanded to the user's home directory.
dir = ""

# Give up on a single save after this long. The layout stays in memory and
# is written again with the next change.
# Examples: "500ms", "5s", "1m"
save_timeout = "5s"

# ==============================================================================
# Logging
# ==============================================================================

[logging]

# Verbosity when WGRID_LOG is not set.
# Options: "error", "warn", "info", "debug", "trace"
level = "warn"

# Path to log file. Empty string means log to stderr.
file = ""
"#;

// ---------------------------------------------------------------------------
// File creation
// ---------------------------------------------------------------------------

/// Creates (or force-overwrites) the default config file.
///
/// - If the file exists and `force` is `false`, returns `ConfigError::AlreadyExists`.
/// - If the file exists and `force` is `true`, backs it up to `.toml.backup` first.
/// - Returns the path where the config was written.
pub fn create_default_config(force: bool) -> Result<PathBuf, ConfigError> {
    let path = xdg::config_path();

    if path.exists() {
        if !force {
            return Err(ConfigError::AlreadyExists { path });
        }
        let backup_path = path.with_extension("toml.backup");
        fs::rename(&path, &backup_path).map_err(|e| ConfigError::WriteError {
            path: backup_path.clone(),
            source: e,
        })?;
        tracing::info!("Backed up existing config to {}", backup_path.display());
    }

    write_default_config(&path)?;
    tracing::info!("Created default configuration at {}", path.display());
    Ok(path)
}

/// Writes the default template to `path`, creating parent dirs and setting 0600 permissions.
fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let write_error = |source| ConfigError::WriteError {
        path: path.to_path_buf(),
        source,
    };

    xdg::ensure_config_dir().map_err(write_error)?;
    fs::write(path, DEFAULT_CONFIG_TEMPLATE).map_err(write_error)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600)).map_err(write_error)?;
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
