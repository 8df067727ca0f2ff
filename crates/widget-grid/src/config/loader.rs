//! Reads `config.toml` into a validated [`Config`].
//!
//! An explicit `--config` path must exist. The XDG path is optional: when it
//! has no file the built-in defaults apply. TOML errors carry the line and
//! column of the offending token.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::config::error::ConfigError;
use crate::config::schema::Config;
use crate::config::xdg;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads `path` (or the XDG config file when `None`) and validates it.
    pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
        let config = match path {
            Some(path) => Self::load_from_path(path)?,
            None => {
                let default_path = xdg::config_path();
                match Self::load_from_path(&default_path) {
                    Err(ConfigError::NotFound { .. }) => {
                        tracing::debug!("No config file at {:?}, using defaults", default_path);
                        Config::default()
                    }
                    other => other?,
                }
            }
        };
        config.validate()?;
        Ok(config)
    }

    /// Parses the file at `path` without validating values.
    pub fn load_from_path(path: &Path) -> Result<Config, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => ConfigError::NotFound {
                path: path.to_path_buf(),
            },
            _ => ConfigError::ReadError {
                path: path.to_path_buf(),
                source,
            },
        })?;
        Self::parse_toml(&content, path)
    }

    fn parse_toml(content: &str, path: &Path) -> Result<Config, ConfigError> {
        toml::from_str(content).map_err(|e| {
            let (line, column) = e.span().map_or((0, 0), |span| {
                let before = &content[..span.start];
                let line_start = before.rfind('\n').map_or(0, |p| p + 1);
                (before.matches('\n').count() + 1, span.start - line_start + 1)
            });
            ConfigError::ParseError {
                path: path.to_path_buf(),
                line,
                column,
                message: e.message().to_string(),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::LogLevel;
    use serial_test::serial;
    use std::path::PathBuf;

    /// Run a closure with `XDG_CONFIG_HOME` temporarily set, then restore.
    fn with_xdg_config<F: FnOnce()>(value: &Path, f: F) {
        let original = std::env::var("XDG_CONFIG_HOME").ok();
        std::env::set_var("XDG_CONFIG_HOME", value);
        f();
        match original {
            Some(v) => std::env::set_var("XDG_CONFIG_HOME", v),
            None => std::env::remove_var("XDG_CONFIG_HOME"),
        }
    }

    // -----------------------------------------------------------------------
    // parse_toml
    // -----------------------------------------------------------------------

    #[test]
    fn test_parse_partial_config_fills_defaults() {
        let toml_str = r#"
[logging]
level = "debug"
"#;
        let path = PathBuf::from("partial.toml");
        let config =
            ConfigLoader::parse_toml(toml_str, &path).expect("partial config should parse");
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.dashboard.user_id, "default");
        assert_eq!(config.persistence.save_timeout, "5s");
    }

    #[test]
    fn test_parse_invalid_toml_returns_parse_error_with_position() {
        let toml_str = "[grid]\nrow_height = \n";
        let path = PathBuf::from("bad.toml");
        let err = ConfigLoader::parse_toml(toml_str, &path).expect_err("should fail");
        match err {
            ConfigError::ParseError {
                path: p,
                line,
                column,
                message,
            } => {
                assert_eq!(p, path);
                assert!(line >= 2, "error should point past the section header");
                assert!(column > 0, "column should be > 0 for known span");
                assert!(!message.is_empty(), "message should not be empty");
            }
            other => panic!("expected ParseError, got: {other:?}"),
        }
    }

    #[test]
    fn test_parse_error_for_wrong_type() {
        let toml_str = "[grid]\nrow_height = \"tall\"\n";
        let path = PathBuf::from("wrong_type.toml");
        let err = ConfigLoader::parse_toml(toml_str, &path).expect_err("should fail");
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    // -----------------------------------------------------------------------
    // load_from_path
    // -----------------------------------------------------------------------

    #[test]
    fn test_load_rejects_invalid_values() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let file = dir.path().join("config.toml");
        fs::write(&file, "[persistence]\nsave_timeout = \"0s\"\n").expect("write config");
        assert!(ConfigLoader::load_from_path(&file).is_ok(), "parsing alone accepts it");
        let err = ConfigLoader::load(Some(&file)).expect_err("zero timeout");
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_load_from_path_valid_file() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let file = dir.path().join("config.toml");
        fs::write(&file, "[dashboard]\nuser_id = \"alice\"\n").expect("failed to write temp file");
        let config = ConfigLoader::load_from_path(&file).expect("should load");
        assert_eq!(config.dashboard.user_id, "alice");
    }

    #[test]
    fn test_load_from_path_missing_file_returns_not_found() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let path = dir.path().join("absent.toml");
        let err = ConfigLoader::load(Some(&path)).expect_err("should fail");
        match err {
            ConfigError::NotFound { path: p } => assert_eq!(p, path),
            other => panic!("expected NotFound, got: {other:?}"),
        }
    }

    #[test]
    fn test_load_from_path_directory_returns_read_error() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let err = ConfigLoader::load_from_path(dir.path()).expect_err("should fail");
        match err {
            ConfigError::ReadError { path, .. } => assert_eq!(path, dir.path()),
            other => panic!("expected ReadError, got: {other:?}"),
        }
    }

    // -----------------------------------------------------------------------
    // load without an explicit path
    // -----------------------------------------------------------------------

    #[test]
    #[serial]
    fn test_load_without_file_returns_defaults() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        with_xdg_config(dir.path(), || {
            let config = ConfigLoader::load(None).expect("should return defaults");
            assert_eq!(config, Config::default());
        });
    }

    #[test]
    #[serial]
    fn test_load_reads_xdg_file() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let config_dir = dir.path().join("widget-grid");
        fs::create_dir_all(&config_dir).expect("failed to create config dir");
        fs::write(config_dir.join("config.toml"), "[logging]\nlevel = \"trace\"\n")
            .expect("failed to write config");
        with_xdg_config(dir.path(), || {
            let config = ConfigLoader::load(None).expect("should load");
            assert_eq!(config.logging.level, LogLevel::Trace);
        });
    }
}
