pub mod macros;

use rtsopen_core::fog_of_war::VisibilityMap;
use rtsopen_core::spatial_hash::HashGrid;
use rtsopen_data::{
    GridCell, OperandSource, RulesetOpType, RulesetOperator, VisibilityState, VisitedWorldDatum,
    WorldDescriptor,
};

#[allow(dead_code)]
pub struct MapBuilder {
    world: WorldDescriptor,
    cell_size: f64,
    visits: Vec<VisitedWorldDatum>,
    initialize: bool,
}

#[allow(dead_code)]
impl MapBuilder {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            world: WorldDescriptor::positive(width, height),
            cell_size: 1.0,
            visits: Vec::new(),
            initialize: true,
        }
    }

    pub fn with_world(mut self, world: WorldDescriptor) -> Self {
        self.world = world;
        self
    }

    pub fn with_cell_size(mut self, cell_size: f64) -> Self {
        self.cell_size = cell_size;
        self
    }

    pub fn with_visit(mut self, x: i32, y: i32, z: i32, state: VisibilityState) -> Self {
        self.visits
            .push(VisitedWorldDatum::new(GridCell::new(x, y, z), state));
        self
    }

    pub fn uninitialized(mut self) -> Self {
        self.initialize = false;
        self
    }

    pub fn build(self) -> VisibilityMap {
        let grid = HashGrid::new(self.cell_size).expect("Invalid cell size in test builder");
        let mut map = VisibilityMap::new(self.world, grid);
        if self.initialize {
            map.initialize().expect("Raster too large in test builder");
            for datum in self.visits {
                map.visit(datum).expect("Visit failed in test builder");
            }
        }
        map
    }
}

/// Shorthand for operators used across ruleset tests.
#[allow(dead_code)]
pub mod ops {
    use super::*;

    pub fn own(op: RulesetOpType) -> RulesetOperator {
        RulesetOperator::new(op, OperandSource::SelfValue)
    }

    pub fn other(op: RulesetOpType) -> RulesetOperator {
        RulesetOperator::new(op, OperandSource::OtherValue)
    }

    pub fn fixed(op: RulesetOpType, value: i32) -> RulesetOperator {
        RulesetOperator::constant(op, value)
    }
}

/// Counts texels whose RGBA matches `color`.
#[allow(dead_code)]
pub fn count_texels(map: &VisibilityMap, color: [u8; 4]) -> usize {
    map.pixels()
        .map(|p| p.chunks_exact(4).filter(|t| *t == color).count())
        .unwrap_or(0)
}
