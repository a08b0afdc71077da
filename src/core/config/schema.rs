//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Location
//!
//! Searched in order of precedence:
//! 1. `$QBC_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/qbc/config.toml`
//! 3. `~/.qbc/config.toml` (canonical write location)
//!
//! # Validation
//!
//! Values are validated after parsing so that a bad config is reported at
//! load time, not halfway through a render.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Default viewport edge length.
pub const DEFAULT_RENDER_SIZE: f64 = 400.0;

/// Default inset between the viewport edge and the unit square.
pub const DEFAULT_RENDER_PADDING: f64 = 40.0;

/// Default raster surface edge, in pixels.
pub const DEFAULT_RASTER_SIZE: u32 = 512;

/// Largest raster surface edge, in pixels.
pub const MAX_RASTER_SIZE: u32 = 8192;

/// Global configuration (user scope).
///
/// # Example
///
/// ```toml
/// lattice = "/home/me/lattices/round.json"
///
/// [render]
/// size = 512
/// padding = 48
/// grid = true
/// grid_lines = 8
/// labels = true
///
/// [orientation]
/// rotation_degrees = 90
/// mirror = false
///
/// [raster]
/// size = 1024
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Lattice JSON used when no `--lattice` is given
    pub lattice: Option<PathBuf>,

    /// Rendering defaults
    pub render: Option<RenderDefaults>,

    /// Orientation defaults
    pub orientation: Option<OrientationDefaults>,

    /// Raster export defaults
    pub raster: Option<RasterDefaults>,
}

impl GlobalConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(render) = &self.render {
            render.validate()?;
        }
        if let Some(raster) = &self.raster {
            raster.validate()?;
        }
        if let Some(orientation) = &self.orientation {
            if orientation.rotation_degrees.is_some_and(|r| !r.is_finite()) {
                return Err(ConfigError::InvalidValue(
                    "orientation.rotation_degrees must be finite".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Render defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RenderDefaults {
    /// Viewport edge length
    pub size: Option<f64>,

    /// Viewport padding on every side
    pub padding: Option<f64>,

    /// Draw grid lines
    pub grid: Option<bool>,

    /// Number of grid cells per axis
    pub grid_lines: Option<u32>,

    /// Draw anchor nodes
    pub nodes: Option<bool>,

    /// Draw anchor labels
    pub labels: Option<bool>,

    /// Embed the package in rendered markup
    pub embed: Option<bool>,
}

impl RenderDefaults {
    /// Validate render settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let size = self.size.unwrap_or(DEFAULT_RENDER_SIZE);
        let padding = self.padding.unwrap_or(DEFAULT_RENDER_PADDING);

        if !(size.is_finite() && padding.is_finite()) || padding < 0.0 {
            return Err(ConfigError::InvalidValue(
                "render size and padding must be finite and non-negative".to_string(),
            ));
        }
        if size <= 2.0 * padding {
            return Err(ConfigError::InvalidValue(format!(
                "render size {size} must exceed twice the padding {padding}"
            )));
        }
        if self.grid_lines == Some(0) {
            return Err(ConfigError::InvalidValue(
                "render.grid_lines must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Orientation defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct OrientationDefaults {
    pub rotation_degrees: Option<f64>,
    pub mirror: Option<bool>,
    pub flip_vertical: Option<bool>,
}

/// Raster export defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RasterDefaults {
    /// Surface edge length in pixels
    pub size: Option<u32>,
}

impl RasterDefaults {
    /// Validate raster settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(size) = self.size {
            if size == 0 || size > MAX_RASTER_SIZE {
                return Err(ConfigError::InvalidValue(format!(
                    "raster.size must be between 1 and {MAX_RASTER_SIZE}, got {size}"
                )));
            }
        }
        Ok(())
    }
}
