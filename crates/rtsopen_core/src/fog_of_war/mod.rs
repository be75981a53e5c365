//! Fog of war: which parts of the world each observer has seen.
//!
//! - [`VisibilityMap`]: one observer's visited cells plus the RGBA8 raster
//!   painted from them
//! - [`FogOfWarTracker`]: owns a map per observer and gates updates on network authority
//! - [`settings`]: mode rows loaded from named tables
//! - [`sink`]: where rasters go once they change

pub mod map;
pub mod settings;
pub mod sink;
pub mod tracker;

pub use map::VisibilityMap;
pub use settings::{FogOfWarSettings, FogOfWarSettingsRegistry, FogOfWarSettingsTable};
pub use sink::{RasterFrame, RasterSink, SnapshotSink};
pub use tracker::{FogOfWarTracker, NetMode};
