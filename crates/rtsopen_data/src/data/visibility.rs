use serde::{Deserialize, Serialize};

use super::grid::GridCell;

/// What level of visibility an area of the world has for one observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum VisibilityState {
    /// Visited and currently in sight.
    Visible,
    /// Visited but no longer in sight.
    Obscured,
    /// Never visited.
    #[default]
    NotVisible,
}

impl VisibilityState {
    /// RGBA8 colour this state paints into a fog-of-war raster.
    #[must_use]
    pub const fn rgba(self) -> [u8; 4] {
        match self {
            VisibilityState::Visible => [255, 255, 255, 255],
            VisibilityState::Obscured => [192, 192, 192, 255],
            VisibilityState::NotVisible => [0, 0, 0, 255],
        }
    }
}

/// A single fog-of-war update: a cell and its new visibility.
///
/// Only `x` and `y` of the cell matter to a visibility map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitedWorldDatum {
    pub cell: GridCell,
    pub state: VisibilityState,
}

impl VisitedWorldDatum {
    #[must_use]
    pub const fn new(cell: GridCell, state: VisibilityState) -> Self {
        Self { cell, state }
    }

    #[must_use]
    pub const fn visible(cell: GridCell) -> Self {
        Self::new(cell, VisibilityState::Visible)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldExtent {
    pub x: f64,
    pub y: f64,
}

impl WorldExtent {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Footprint of the world plane a fog-of-war raster covers.
///
/// The raster has one texel per world unit over
/// `size_negative + size_positive`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldDescriptor {
    /// Absolute size of the positive part of the world plane.
    pub size_positive: WorldExtent,
    /// Absolute size of the negative part of the world plane.
    pub size_negative: WorldExtent,
    pub center: WorldExtent,
}

impl WorldDescriptor {
    /// Descriptor covering `[0, width) x [0, height)`.
    #[must_use]
    pub const fn positive(width: f64, height: f64) -> Self {
        Self {
            size_positive: WorldExtent::new(width, height),
            size_negative: WorldExtent::new(0.0, 0.0),
            center: WorldExtent::new(0.0, 0.0),
        }
    }

    #[must_use]
    pub fn total_size(&self) -> WorldExtent {
        WorldExtent::new(
            self.size_negative.x + self.size_positive.x,
            self.size_negative.y + self.size_positive.y,
        )
    }

    /// Raster dimensions in texels, fractional world units truncated.
    #[must_use]
    pub fn texel_dimensions(&self) -> (u32, u32) {
        let total = self.total_size();
        (total.x.max(0.0) as u32, total.y.max(0.0) as u32)
    }
}
