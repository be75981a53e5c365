//! Owns one [`VisibilityMap`] per observer and routes visits to it.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use rtsopen_data::{VisitedWorldDatum, WorldDescriptor};

use super::map::VisibilityMap;
use super::settings::{FogOfWarSettings, FogOfWarSettingsRegistry, FogOfWarSettingsTable};
use crate::config::RtsConfig;
use crate::error::{FogError, Result};
use crate::metrics::FogMetrics;
use crate::spatial_hash::HashGrid;

/// How the running world relates to the network. Only clients lack authority
/// over fog of war.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NetMode {
    #[default]
    Standalone,
    DedicatedServer,
    ListenServer,
    Client,
}

impl NetMode {
    #[must_use]
    pub const fn has_complete_authority(self) -> bool {
        !matches!(self, NetMode::Client)
    }
}

/// Fog-of-war bookkeeping for every tracked observer (player controllers,
/// AI commanders, spectators).
///
/// Maps are created and initialized the first time an observer reports a visit.
pub struct FogOfWarTracker<K> {
    world: WorldDescriptor,
    grid: HashGrid,
    net_mode: NetMode,
    observers: HashMap<K, VisibilityMap>,
    settings: FogOfWarSettingsRegistry,
    metrics: Arc<FogMetrics>,
}

impl<K: Eq + Hash> FogOfWarTracker<K> {
    #[must_use]
    pub fn new(world: WorldDescriptor, grid: HashGrid, net_mode: NetMode) -> Self {
        Self {
            world,
            grid,
            net_mode,
            observers: HashMap::new(),
            settings: FogOfWarSettingsRegistry::new(),
            metrics: Arc::new(FogMetrics::new()),
        }
    }

    pub fn from_config(config: &RtsConfig, net_mode: NetMode) -> Result<Self> {
        let grid = HashGrid::from_config(&config.hash_grid)?;
        Ok(Self::new(config.fog_of_war.world(), grid, net_mode))
    }

    #[must_use]
    pub fn has_complete_authority(&self) -> bool {
        self.net_mode.has_complete_authority()
    }

    pub fn set_net_mode(&mut self, net_mode: NetMode) {
        self.net_mode = net_mode;
    }

    /// Applies a visit for `observer`, creating its map on first use.
    ///
    /// Without authority nothing is recorded and `Ok(false)` is returned.
    /// Otherwise the result says whether the observer's raster changed.
    pub fn update_world_datum(
        &mut self,
        observer: K,
        datum: VisitedWorldDatum,
    ) -> std::result::Result<bool, FogError> {
        if !self.has_complete_authority() {
            return Ok(false);
        }
        let (world, grid) = (self.world, self.grid);
        let map = self.observers.entry(observer).or_insert_with(|| {
            tracing::debug!("tracking new fog of war observer");
            VisibilityMap::new(world, grid)
        });
        // also covers maps released by a previous loss of authority
        if !map.is_initialized() {
            map.initialize()?;
        }
        let repainted = map.visit(datum)?;
        self.metrics.record_visit(repainted);
        Ok(repainted)
    }

    /// Marks the cell containing `position` visible for `observer`.
    pub fn update_world_location(
        &mut self,
        observer: K,
        position: [f64; 3],
    ) -> std::result::Result<bool, FogError> {
        let datum = VisitedWorldDatum::visible(self.grid.cell_index(position));
        self.update_world_datum(observer, datum)
    }

    /// Per-frame housekeeping. Returns false, after releasing every raster,
    /// when this world has no authority.
    pub fn tick(&mut self) -> bool {
        if self.has_complete_authority() {
            return true;
        }
        for map in self.observers.values_mut() {
            map.deinitialize();
        }
        false
    }

    /// Reveals or hides the whole raster of every observer.
    pub fn fill_all(&mut self, discovered: bool) -> std::result::Result<(), FogError> {
        for map in self.observers.values_mut().filter(|m| m.is_initialized()) {
            map.fill_all(discovered)?;
            self.metrics.record_fill();
        }
        Ok(())
    }

    /// Stops tracking `observer`, returning its map.
    pub fn remove(&mut self, observer: &K) -> Option<VisibilityMap> {
        self.observers.remove(observer)
    }

    #[must_use]
    pub fn map(&self, observer: &K) -> Option<&VisibilityMap> {
        self.observers.get(observer)
    }

    pub fn map_mut(&mut self, observer: &K) -> Option<&mut VisibilityMap> {
        self.observers.get_mut(observer)
    }

    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    pub fn process_tables(&mut self, tables: &[FogOfWarSettingsTable]) -> usize {
        self.settings.process_tables(tables)
    }

    pub fn set_custom_mode(&mut self, mode: &str) -> std::result::Result<&FogOfWarSettings, FogError> {
        self.settings.set_custom_mode(mode)
    }

    #[must_use]
    pub fn settings(&self) -> &FogOfWarSettingsRegistry {
        &self.settings
    }

    #[must_use]
    pub fn metrics(&self) -> Arc<FogMetrics> {
        Arc::clone(&self.metrics)
    }

    #[must_use]
    pub fn grid(&self) -> &HashGrid {
        &self.grid
    }
}
