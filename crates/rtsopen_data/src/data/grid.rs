use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Sub, SubAssign};

/// Integer cell coordinate produced by floor-dividing a world position by a
/// uniform cell size.
///
/// Equality is component-wise over all three axes. The 2D helpers
/// ([`GridCell::is_neighbor_2d`], [`GridCell::is_same_2d`]) ignore `z`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct GridCell {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl GridCell {
    pub const ZERO: GridCell = GridCell { x: 0, y: 0, z: 0 };

    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Expands the cell back into world space, `cell * scale` per axis.
    ///
    /// With `scale` equal to the grid's cell size this is the minimum corner of
    /// the cell in world units.
    #[must_use]
    pub fn to_world(self, scale: f64) -> [f64; 3] {
        [
            f64::from(self.x) * scale,
            f64::from(self.y) * scale,
            f64::from(self.z) * scale,
        ]
    }

    /// Same cell with the height discarded.
    #[must_use]
    pub const fn flattened(self) -> Self {
        Self {
            x: self.x,
            y: self.y,
            z: 0,
        }
    }

    /// True if both cells share `x` and `y`.
    #[must_use]
    pub const fn is_same_2d(self, other: GridCell) -> bool {
        self.x == other.x && self.y == other.y
    }

    /// True iff `|dx| <= 1` and `|dy| <= 1`.
    #[must_use]
    pub fn is_neighbor_2d(self, other: GridCell) -> bool {
        let delta = other - self;
        (-1..=1).contains(&delta.x) && (-1..=1).contains(&delta.y)
    }

    /// [`GridCell::is_neighbor_2d`] plus `|dz| <= 1`.
    #[must_use]
    pub fn is_neighbor_3d(self, other: GridCell) -> bool {
        let delta = other - self;
        self.is_neighbor_2d(other) && (-1..=1).contains(&delta.z)
    }
}

impl Add for GridCell {
    type Output = GridCell;

    fn add(self, rhs: GridCell) -> GridCell {
        GridCell {
            x: self.x.wrapping_add(rhs.x),
            y: self.y.wrapping_add(rhs.y),
            z: self.z.wrapping_add(rhs.z),
        }
    }
}

impl Sub for GridCell {
    type Output = GridCell;

    fn sub(self, rhs: GridCell) -> GridCell {
        GridCell {
            x: self.x.wrapping_sub(rhs.x),
            y: self.y.wrapping_sub(rhs.y),
            z: self.z.wrapping_sub(rhs.z),
        }
    }
}

impl AddAssign for GridCell {
    fn add_assign(&mut self, rhs: GridCell) {
        *self = *self + rhs;
    }
}

impl SubAssign for GridCell {
    fn sub_assign(&mut self, rhs: GridCell) {
        *self = *self - rhs;
    }
}

impl From<(i32, i32, i32)> for GridCell {
    fn from((x, y, z): (i32, i32, i32)) -> Self {
        Self { x, y, z }
    }
}
