use rtsopen_data::GridCell;

use crate::config::{HashGridConfig, DEFAULT_CELL_SIZE};
use crate::error::{CoreError, Result};

/// Floors each component and truncates it into a [`GridCell`].
///
/// Values outside the `i32` range saturate and NaN maps to 0, which is how
/// float-to-int `as` casts behave.
#[inline]
#[must_use]
pub fn floor_to_cell(scaled: [f64; 3]) -> GridCell {
    GridCell::new(
        scaled[0].floor() as i32,
        scaled[1].floor() as i32,
        scaled[2].floor() as i32,
    )
}

/// Computes `floor(position / cell_size)` per axis.
///
/// `cell_size` is not validated; a zero or negative size gives meaningless
/// cells. Use [`HashGrid`] when the size comes from outside.
#[inline]
#[must_use]
pub fn cell_of(position: [f64; 3], cell_size: f64) -> GridCell {
    floor_to_cell([
        position[0] / cell_size,
        position[1] / cell_size,
        position[2] / cell_size,
    ])
}

/// Snaps a world position to the minimum corner of its cell, in world units.
#[inline]
#[must_use]
pub fn snapped_world_position(position: [f64; 3], cell_size: f64) -> [f64; 3] {
    [
        (position[0] / cell_size).floor() * cell_size,
        (position[1] / cell_size).floor() * cell_size,
        (position[2] / cell_size).floor() * cell_size,
    ]
}

#[inline]
#[must_use]
pub fn is_neighbor_2d(a: GridCell, b: GridCell) -> bool {
    a.is_neighbor_2d(b)
}

#[inline]
#[must_use]
pub fn is_neighbor_3d(a: GridCell, b: GridCell) -> bool {
    a.is_neighbor_3d(b)
}

/// Uniform hash grid used to bucket world positions into cells.
///
/// Holds a single validated cell size and exposes the cell lookups that every
/// grid consumer (fog of war, proximity checks) shares.
///
/// # Examples
/// ```
/// use rtsopen_core::spatial_hash::HashGrid;
/// use rtsopen_data::GridCell;
///
/// let grid = HashGrid::new(200.0).unwrap();
/// assert_eq!(grid.cell_index([450.0, -10.0, 0.0]), GridCell::new(2, -1, 0));
/// assert_eq!(grid.cell_vector([450.0, -10.0, 0.0]), [400.0, -200.0, 0.0]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HashGrid {
    cell_size: f64,
}

impl Default for HashGrid {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
        }
    }
}

impl HashGrid {
    /// Creates a grid, rejecting non-positive or non-finite sizes.
    pub fn new(cell_size: f64) -> Result<Self> {
        validate_cell_size(cell_size)?;
        Ok(Self { cell_size })
    }

    pub fn from_config(config: &HashGridConfig) -> Result<Self> {
        Self::new(config.uniform_cell_size)
    }

    #[inline]
    #[must_use]
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Replaces the cell size, e.g. after the settings file changed.
    ///
    /// Cells computed with the old size are not remapped.
    pub fn set_cell_size(&mut self, cell_size: f64) -> Result<()> {
        validate_cell_size(cell_size)?;
        if cell_size != self.cell_size {
            tracing::debug!(old = self.cell_size, new = cell_size, "hash grid cell size changed");
        }
        self.cell_size = cell_size;
        Ok(())
    }

    #[inline]
    #[must_use]
    pub fn cell_index(&self, position: [f64; 3]) -> GridCell {
        cell_of(position, self.cell_size)
    }

    #[inline]
    #[must_use]
    pub fn cell_vector(&self, position: [f64; 3]) -> [f64; 3] {
        snapped_world_position(position, self.cell_size)
    }

    /// Minimum corner of `cell` in world units.
    #[inline]
    #[must_use]
    pub fn cell_origin(&self, cell: GridCell) -> [f64; 3] {
        cell.to_world(self.cell_size)
    }
}

fn validate_cell_size(cell_size: f64) -> Result<()> {
    if cell_size.is_finite() && cell_size > 0.0 {
        Ok(())
    } else {
        Err(CoreError::InvalidCellSize(cell_size))
    }
}
