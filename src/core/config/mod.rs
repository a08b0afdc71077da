//! core::config
//!
//! Configuration schema and loading.
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Config file
//! 3. CLI flags (not handled here)
//!
//! # Config Locations
//!
//! An explicit path (from `--config`) is used as is and must exist.
//! Otherwise these are searched in order:
//! 1. `$QBC_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/qbc/config.toml`
//! 3. `~/.qbc/config.toml` (canonical write location)
//!
//! # Example
//!
//! ```no_run
//! use qbc::core::config::Config;
//!
//! let result = Config::load(None).unwrap();
//! let config = result.config;
//!
//! println!("Embed packages: {}", config.embed());
//! println!("Raster size: {}", config.raster_size());
//! ```

pub mod schema;

pub use schema::{
    GlobalConfig, OrientationDefaults, RasterDefaults, RenderDefaults, DEFAULT_RASTER_SIZE,
    DEFAULT_RENDER_PADDING, DEFAULT_RENDER_SIZE,
};

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::package::Orientation;

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("failed to write config file '{path}': {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config value: {0}")]
    InvalidValue(String),

    #[error("home directory not found")]
    NoHomeDir,
}

/// Warnings generated during config loading.
#[derive(Debug, Clone)]
pub struct ConfigWarning {
    /// The warning message.
    pub message: String,
    /// The path that triggered the warning.
    pub path: PathBuf,
}

/// Result of loading configuration.
#[derive(Debug)]
pub struct ConfigLoadResult {
    /// The loaded configuration.
    pub config: Config,
    /// Any warnings generated during loading.
    pub warnings: Vec<ConfigWarning>,
}

/// Loaded configuration with defaults applied through accessors.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// File configuration
    pub global: GlobalConfig,
    /// Path to the config file (if loaded)
    path: Option<PathBuf>,
}

impl Config {
    /// Load configuration.
    ///
    /// If `explicit` is given that file is read; otherwise the standard
    /// locations are searched.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be parsed or
    /// fails validation, or if an explicit path cannot be read. A missing
    /// config in the standard locations is not an error.
    pub fn load(explicit: Option<&Path>) -> Result<ConfigLoadResult, ConfigError> {
        let mut warnings = Vec::new();

        let (global, path) = match explicit {
            Some(path) => (Self::read_config(path)?, Some(path.to_path_buf())),
            None => Self::load_global()?,
        };

        global.validate()?;

        if let Some(lattice) = &global.lattice {
            if !lattice.exists() {
                warnings.push(ConfigWarning {
                    message: format!(
                        "Configured lattice '{}' does not exist; using the standard lattice",
                        lattice.display()
                    ),
                    path: path.clone().unwrap_or_default(),
                });
            }
        }

        Ok(ConfigLoadResult {
            config: Config { global, path },
            warnings,
        })
    }

    /// Load configuration from standard locations.
    fn load_global() -> Result<(GlobalConfig, Option<PathBuf>), ConfigError> {
        // 1. Check $QBC_CONFIG
        if let Ok(path) = std::env::var("QBC_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                let config = Self::read_config(&path)?;
                return Ok((config, Some(path)));
            }
        }

        // 2. Check $XDG_CONFIG_HOME/qbc/config.toml
        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("qbc/config.toml");
            if path.exists() {
                let config = Self::read_config(&path)?;
                return Ok((config, Some(path)));
            }
        }

        // 3. Check ~/.qbc/config.toml
        if let Some(home) = dirs::home_dir() {
            let path = home.join(".qbc/config.toml");
            if path.exists() {
                let config = Self::read_config(&path)?;
                return Ok((config, Some(path)));
            }
        }

        // No config found, use defaults
        Ok((GlobalConfig::default(), None))
    }

    /// Read and parse a config file.
    fn read_config(path: &Path) -> Result<GlobalConfig, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Get the canonical path for the config file.
    ///
    /// Returns `~/.qbc/config.toml`.
    pub fn global_config_path() -> Result<PathBuf, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        Ok(home.join(".qbc/config.toml"))
    }

    /// Write config atomically to `path`.
    ///
    /// Creates parent directories if needed. Writes to a temp file, then
    /// renames over the target.
    pub fn write_to(path: &Path, config: &GlobalConfig) -> Result<(), ConfigError> {
        config.validate()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
                path: path.to_path_buf(),
                source: e,
            })?;
        }

        let contents =
            toml::to_string_pretty(config).map_err(|e| ConfigError::InvalidValue(e.to_string()))?;

        let temp_path = path.with_extension("toml.tmp");
        let mut file = fs::File::create(&temp_path).map_err(|e| ConfigError::WriteError {
            path: temp_path.clone(),
            source: e,
        })?;

        file.write_all(contents.as_bytes())
            .map_err(|e| ConfigError::WriteError {
                path: temp_path.clone(),
                source: e,
            })?;

        file.sync_all().map_err(|e| ConfigError::WriteError {
            path: temp_path.clone(),
            source: e,
        })?;

        fs::rename(&temp_path, path).map_err(|e| ConfigError::WriteError {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(())
    }

    // =========================================================================
    // Accessor methods with defaults
    // =========================================================================

    /// Get the configured lattice path, if it exists on disk.
    pub fn lattice_path(&self) -> Option<&Path> {
        self.global.lattice.as_deref().filter(|p| p.exists())
    }

    /// Default orientation.
    pub fn orientation(&self) -> Orientation {
        let defaults = self.global.orientation.clone().unwrap_or_default();
        Orientation {
            rotation_degrees: defaults.rotation_degrees.unwrap_or(0.0),
            mirror: defaults.mirror.unwrap_or(false),
            flip_vertical: defaults.flip_vertical.unwrap_or(false),
            ..Default::default()
        }
    }

    /// Whether renders embed their package.
    ///
    /// Defaults to `true` if not configured.
    pub fn embed(&self) -> bool {
        self.global
            .render
            .as_ref()
            .and_then(|r| r.embed)
            .unwrap_or(true)
    }

    /// Raster surface edge length.
    pub fn raster_size(&self) -> u32 {
        self.global
            .raster
            .as_ref()
            .and_then(|r| r.size)
            .unwrap_or(DEFAULT_RASTER_SIZE)
    }

    /// Get the path to the loaded config file.
    pub fn loaded_from(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_without_file() {
        let config = Config::default();
        assert!(config.global.render.is_none());
        assert!(config.orientation().is_identity());
        assert!(config.embed());
        assert_eq!(config.raster_size(), DEFAULT_RASTER_SIZE);
        assert!(config.lattice_path().is_none());
    }

    #[test]
    fn load_explicit_file() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("config.toml");
        fs::write(
            &config_path,
            r#"
            [render]
            size = 200
            padding = 10
            grid = true
            embed = false

            [orientation]
            rotation_degrees = 90
            mirror = true

            [raster]
            size = 64
            "#,
        )
        .unwrap();

        let result = Config::load(Some(&config_path)).unwrap();
        let config = result.config;

        let render = config.global.render.clone().unwrap();
        assert_eq!(render.size, Some(200.0));
        assert_eq!(render.padding, Some(10.0));
        assert_eq!(render.grid, Some(true));
        assert!(!config.embed());
        assert_eq!(config.orientation().rotation_degrees, 90.0);
        assert!(config.orientation().mirror);
        assert_eq!(config.raster_size(), 64);
        assert_eq!(config.loaded_from(), Some(config_path.as_path()));
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn missing_explicit_file_is_error() {
        let temp = TempDir::new().unwrap();
        let result = Config::load(Some(&temp.path().join("nope.toml")));
        assert!(matches!(result, Err(ConfigError::ReadError { .. })));
    }

    #[test]
    fn missing_lattice_warns() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("config.toml");
        fs::write(&config_path, "lattice = \"/definitely/not/here.json\"").unwrap();

        let result = Config::load(Some(&config_path)).unwrap();
        assert_eq!(result.warnings.len(), 1);
        assert!(result.config.lattice_path().is_none());
    }

    #[test]
    fn invalid_values_rejected() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("config.toml");
        fs::write(&config_path, "[raster]\nsize = 0").unwrap();
        assert!(matches!(
            Config::load(Some(&config_path)),
            Err(ConfigError::InvalidValue(_))
        ));
    }

    #[test]
    fn unknown_fields_rejected() {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("config.toml");
        fs::write(&config_path, "unknown_field = true").unwrap();
        assert!(matches!(
            Config::load(Some(&config_path)),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn write_then_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested/config.toml");
        let config = GlobalConfig {
            raster: Some(RasterDefaults { size: Some(300) }),
            ..Default::default()
        };

        Config::write_to(&path, &config).unwrap();
        let loaded = Config::load(Some(&path)).unwrap();
        assert_eq!(loaded.config.raster_size(), 300);
    }
}
