//! Configuration for the hash grid, fog of war and ruleset evaluation.
//!
//! Strongly-typed structures mapping onto a `rtsopen.toml` file.
//!
//! ## Configuration Hierarchy
//!
//! 1. Default values (hardcoded in `Default` impls)
//! 2. `rtsopen.toml` file (overrides defaults, missing sections fall back)
//!
//! ## Example `rtsopen.toml`
//!
//! ```toml
//! [hash_grid]
//! uniform_cell_size = 200.0
//!
//! [fog_of_war]
//! size_positive = { x = 2048.0, y = 2048.0 }
//! size_negative = { x = 0.0, y = 0.0 }
//! center = { x = 0.0, y = 0.0 }
//!
//! [ruleset]
//! max_depth = 16
//!
//! [logging]
//! level = "info"
//! ```

use std::fs;
use std::path::Path;

use rtsopen_data::{WorldDescriptor, WorldExtent};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::fog_of_war::map::raster_bytes;

pub const DEFAULT_CELL_SIZE: f64 = 200.0;

/// Default fog footprint per axis, a 16 MiB raster per observer.
pub const DEFAULT_FOG_EXTENT: f64 = 2048.0;

/// Uniform cell size shared by every hash-grid lookup.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct HashGridConfig {
    pub uniform_cell_size: f64,
}

impl Default for HashGridConfig {
    fn default() -> Self {
        Self {
            uniform_cell_size: DEFAULT_CELL_SIZE,
        }
    }
}

/// World footprint covered by each observer's fog-of-war raster.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct FogOfWarConfig {
    pub size_positive: WorldExtent,
    pub size_negative: WorldExtent,
    pub center: WorldExtent,
}

impl Default for FogOfWarConfig {
    fn default() -> Self {
        Self {
            size_positive: WorldExtent::new(DEFAULT_FOG_EXTENT, DEFAULT_FOG_EXTENT),
            size_negative: WorldExtent::new(0.0, 0.0),
            center: WorldExtent::new(0.0, 0.0),
        }
    }
}

impl FogOfWarConfig {
    #[must_use]
    pub fn world(&self) -> WorldDescriptor {
        WorldDescriptor {
            size_positive: self.size_positive,
            size_negative: self.size_negative,
            center: self.center,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct RulesetConfig {
    /// How many inner rulesets may be nested before evaluation gives up.
    pub max_depth: usize,
}

impl Default for RulesetConfig {
    fn default() -> Self {
        Self { max_depth: 16 }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// An `EnvFilter` directive, e.g. `info` or `rtsopen_core=debug`.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct RtsConfig {
    pub hash_grid: HashGridConfig,
    pub fog_of_war: FogOfWarConfig,
    pub ruleset: RulesetConfig,
    pub logging: LoggingConfig,
}

impl RtsConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }

    /// Reads and validates a config file. Errors carry the path as context.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        fs::read_to_string(path)
            .map_err(CoreError::from)
            .and_then(|content| Self::from_toml_str(&content))
            .map_err(|e| e.with_context(format!("loading {}", path.display())))
    }

    /// Like [`RtsConfig::load`] but falls back to defaults when the file is missing.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file missing, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn validate(&self) -> Result<()> {
        let size = self.hash_grid.uniform_cell_size;
        if !size.is_finite() || size <= 0.0 {
            return Err(CoreError::InvalidCellSize(size));
        }
        let fow = &self.fog_of_war;
        let extents = [fow.size_positive, fow.size_negative];
        if extents
            .iter()
            .any(|e| !e.x.is_finite() || !e.y.is_finite() || e.x < 0.0 || e.y < 0.0)
        {
            return Err(CoreError::validation(
                "fog_of_war sizes must be finite and non-negative",
            ));
        }
        if raster_bytes(&fow.world()).is_none() {
            return Err(CoreError::validation(
                "fog_of_war footprint is too large for a raster",
            ));
        }
        if self.ruleset.max_depth == 0 {
            return Err(CoreError::validation("ruleset.max_depth must be at least 1"));
        }
        Ok(())
    }
}
