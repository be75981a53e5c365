//! Per-observer fog-of-war state: a sparse set of visited cells and the RGBA8
//! raster synthesized from it.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use rtsopen_data::{GridCell, VisibilityState, VisitedWorldDatum, WorldDescriptor};

use super::sink::{RasterFrame, RasterSink};
use crate::error::{FogError, Result};
use crate::spatial_hash::{cell_of, HashGrid};

pub const BYTES_PER_TEXEL: usize = 4;

/// Added to the far edge of a repainted block before the texel loop compares
/// against it. Blocks therefore reach one texel further than the cell when the
/// cell size is a whole number.
pub const BLOCK_END_BIAS: f64 = 0.5;

/// Byte size of the RGBA8 raster covering `world`, or `None` if it overflows.
#[must_use]
pub fn raster_bytes(world: &WorldDescriptor) -> Option<usize> {
    let (width, height) = world.texel_dimensions();
    (width as usize)
        .checked_mul(height as usize)?
        .checked_mul(BYTES_PER_TEXEL)
}

/// Key of the visited set. Only `x` and `y` take part in hashing and equality,
/// so cells that differ only in height share one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct PlanarKey {
    x: i32,
    y: i32,
}

impl From<GridCell> for PlanarKey {
    fn from(cell: GridCell) -> Self {
        Self {
            x: cell.x,
            y: cell.y,
        }
    }
}

/// One observer's view of the world.
///
/// The raster holds one texel per world unit over the descriptor's total
/// footprint, row-major, tightly packed. Cell `(x, y)` paints the block whose
/// origin is `(x * cell_size, y * cell_size)`; the descriptor's negative
/// extent and center do not shift it.
///
/// Tracking is 2D only: visiting `(5, 5, 9)` after `(5, 5, 0)` replaces the
/// earlier entry instead of adding a second one.
#[derive(Debug)]
pub struct VisibilityMap {
    world: WorldDescriptor,
    grid: HashGrid,
    cells: HashMap<PlanarKey, VisitedWorldDatum>,
    pixels: Option<Vec<u8>>,
    width: usize,
    height: usize,
    init_count: u32,
    total_pixels: usize,
    data_size: usize,
    row_pitch: usize,
    repaint_count: u64,
    dirty: bool,
}

impl VisibilityMap {
    /// Creates an uninitialized map. Call [`VisibilityMap::initialize`] before visiting.
    #[must_use]
    pub fn new(world: WorldDescriptor, grid: HashGrid) -> Self {
        Self {
            world,
            grid,
            cells: HashMap::new(),
            pixels: None,
            width: 0,
            height: 0,
            init_count: 0,
            total_pixels: 0,
            data_size: 0,
            row_pitch: 0,
            repaint_count: 0,
            dirty: false,
        }
    }

    /// Allocates the raster and fills it undiscovered (opaque black).
    ///
    /// Calling it again on an initialized map releases the old raster first and
    /// forgets every visited cell. A footprint whose byte size overflows fails
    /// with [`FogError::RasterTooLarge`] and leaves the map untouched.
    pub fn initialize(&mut self) -> std::result::Result<(), FogError> {
        let (width, height) = self.world.texel_dimensions();
        let data_size =
            raster_bytes(&self.world).ok_or(FogError::RasterTooLarge { width, height })?;

        if self.init_count > 0 {
            self.deinitialize();
        }
        self.init_count += 1;

        self.width = width as usize;
        self.height = height as usize;
        self.total_pixels = self.width * self.height;
        self.data_size = data_size;
        self.row_pitch = self.width * BYTES_PER_TEXEL;

        let mut pixels = vec![0u8; self.data_size];
        fill_rows(&mut pixels, self.row_pitch, VisibilityState::NotVisible.rgba());
        self.pixels = Some(pixels);

        self.cells.clear();
        self.repaint_count = 0;
        self.dirty = true;

        tracing::debug!(
            width = self.width,
            height = self.height,
            bytes = self.data_size,
            "fog of war raster initialized"
        );
        Ok(())
    }

    /// Releases the raster. Only the first call after an `initialize` does anything.
    pub fn deinitialize(&mut self) {
        if self.init_count == 0 {
            return;
        }
        self.init_count -= 1;
        self.pixels = None;
        self.dirty = false;
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.pixels.is_some()
    }

    /// Records a visit and repaints the cell's block if its state changed.
    ///
    /// Returns `Ok(true)` when texels were rewritten. Revisiting a cell with the
    /// state it already has does no raster work at all.
    pub fn visit(&mut self, datum: VisitedWorldDatum) -> std::result::Result<bool, FogError> {
        let Some(pixels) = self.pixels.as_mut() else {
            return Err(FogError::NotInitialized);
        };

        let changed = match self.cells.entry(PlanarKey::from(datum.cell)) {
            Entry::Vacant(slot) => {
                slot.insert(datum);
                true
            }
            Entry::Occupied(mut slot) => {
                let changed = slot.get().state != datum.state;
                *slot.get_mut() = datum;
                changed
            }
        };
        if !changed {
            return Ok(false);
        }

        paint_block(
            pixels,
            self.width,
            self.height,
            self.grid.cell_size(),
            datum.cell,
            datum.state.rgba(),
        );
        self.repaint_count += 1;
        self.dirty = true;
        Ok(true)
    }

    /// Marks the cell containing `position` as visible.
    pub fn visit_location(&mut self, position: [f64; 3]) -> std::result::Result<bool, FogError> {
        let cell = cell_of(position, self.grid.cell_size());
        self.visit(VisitedWorldDatum::visible(cell))
    }

    /// Paints the whole raster discovered (white) or undiscovered (black)
    /// without touching the visited set.
    pub fn fill_all(&mut self, discovered: bool) -> std::result::Result<(), FogError> {
        let pixels = self.pixels.as_mut().ok_or(FogError::NotInitialized)?;
        let state = if discovered {
            VisibilityState::Visible
        } else {
            VisibilityState::NotVisible
        };
        fill_rows(pixels, self.row_pitch, state.rgba());
        self.dirty = true;
        Ok(())
    }

    /// Hands the raster to `sink` if it changed since the last sync.
    ///
    /// Returns whether an upload happened.
    pub fn sync(&mut self, sink: &mut impl RasterSink) -> Result<bool> {
        let Some(pixels) = self.pixels.as_deref() else {
            tracing::warn!("fog of war raster synced before being initialized");
            return Err(FogError::NotInitialized.into());
        };
        if !self.dirty {
            return Ok(false);
        }
        sink.upload(&RasterFrame {
            width: self.width,
            height: self.height,
            pitch: self.row_pitch,
            data: pixels,
        })?;
        self.dirty = false;
        Ok(true)
    }

    #[must_use]
    pub fn texel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let start = (y * self.width + x) * BYTES_PER_TEXEL;
        let bytes = self.pixels.as_ref()?.get(start..start + BYTES_PER_TEXEL)?;
        Some([bytes[0], bytes[1], bytes[2], bytes[3]])
    }

    /// The raw raster, `None` while uninitialized.
    #[must_use]
    pub fn pixels(&self) -> Option<&[u8]> {
        self.pixels.as_deref()
    }

    #[must_use]
    pub fn state_of(&self, cell: GridCell) -> Option<VisibilityState> {
        self.cells.get(&PlanarKey::from(cell)).map(|d| d.state)
    }

    pub fn visited(&self) -> impl Iterator<Item = &VisitedWorldDatum> {
        self.cells.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    #[must_use]
    pub fn row_pitch(&self) -> usize {
        self.row_pitch
    }

    #[must_use]
    pub fn total_pixels(&self) -> usize {
        self.total_pixels
    }

    #[must_use]
    pub fn data_size(&self) -> usize {
        self.data_size
    }

    /// Number of block repaints since the last `initialize`.
    #[must_use]
    pub fn repaint_count(&self) -> u64 {
        self.repaint_count
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[must_use]
    pub fn world(&self) -> &WorldDescriptor {
        &self.world
    }

    #[must_use]
    pub fn grid(&self) -> &HashGrid {
        &self.grid
    }
}

fn fill_rows(pixels: &mut [u8], row_pitch: usize, color: [u8; 4]) {
    if pixels.is_empty() || row_pitch == 0 {
        return;
    }
    #[cfg(feature = "parallel")]
    pixels.par_chunks_mut(row_pitch).for_each(|row| {
        for texel in row.chunks_exact_mut(BYTES_PER_TEXEL) {
            texel.copy_from_slice(&color);
        }
    });
    #[cfg(not(feature = "parallel"))]
    for texel in pixels.chunks_exact_mut(BYTES_PER_TEXEL) {
        texel.copy_from_slice(&color);
    }
}

/// Exclusive texel range covered by one axis of a block starting at `origin`.
///
/// Steps start at the truncated origin and continue while `step < origin +
/// cell_size + BLOCK_END_BIAS`, then get clipped to `[0, limit)`.
fn block_span(origin: f64, cell_size: f64, limit: usize) -> (usize, usize) {
    let start = origin.trunc() as i64;
    let end = (origin + cell_size + BLOCK_END_BIAS).ceil() as i64;
    let limit = limit as i64;
    let start = start.clamp(0, limit);
    let end = end.clamp(0, limit);
    (start as usize, end.max(start) as usize)
}

fn paint_block(
    pixels: &mut [u8],
    width: usize,
    height: usize,
    cell_size: f64,
    cell: GridCell,
    color: [u8; 4],
) {
    let origin = cell.to_world(cell_size);
    let (x0, x1) = block_span(origin[0], cell_size, width);
    let (y0, y1) = block_span(origin[1], cell_size, height);
    if x0 == x1 || y0 == y1 {
        tracing::trace!(cell = ?cell, "cell block lies outside the raster");
        return;
    }
    for y in y0..y1 {
        let row_start = (y * width + x0) * BYTES_PER_TEXEL;
        let row_end = (y * width + x1) * BYTES_PER_TEXEL;
        for texel in pixels[row_start..row_end].chunks_exact_mut(BYTES_PER_TEXEL) {
            texel.copy_from_slice(&color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: [u8; 4] = [255, 255, 255, 255];
    const SILVER: [u8; 4] = [192, 192, 192, 255];
    const BLACK: [u8; 4] = [0, 0, 0, 255];

    fn map(width: f64, height: f64, cell_size: f64) -> VisibilityMap {
        let mut map = VisibilityMap::new(
            WorldDescriptor::positive(width, height),
            HashGrid::new(cell_size).unwrap(),
        );
        map.initialize().unwrap();
        map
    }

    fn count_texels(map: &VisibilityMap, color: [u8; 4]) -> usize {
        map.pixels()
            .unwrap()
            .chunks_exact(BYTES_PER_TEXEL)
            .filter(|t| *t == color)
            .count()
    }

    #[test]
    fn test_initialize_fills_black() {
        let map = map(8.0, 4.0, 2.0);
        assert_eq!(map.data_size(), 8 * 4 * 4);
        assert_eq!(map.row_pitch(), 32);
        assert_eq!(count_texels(&map, BLACK), 32);
    }

    #[test]
    fn test_block_span_bias() {
        // 0.0 + 4.0 + 0.5 -> steps 0..=4
        assert_eq!(block_span(0.0, 4.0, 100), (0, 5));
        assert_eq!(block_span(8.0, 4.0, 100), (8, 13));
        // fractional cell: 0.0 + 2.5 + 0.5 = 3.0 -> steps 0..=2
        assert_eq!(block_span(0.0, 2.5, 100), (0, 3));
    }

    #[test]
    fn test_block_span_clips() {
        assert_eq!(block_span(96.0, 4.0, 100), (96, 100));
        assert_eq!(block_span(-8.0, 4.0, 100), (0, 0));
        assert_eq!(block_span(200.0, 4.0, 100), (100, 100));
    }

    #[test]
    fn test_visit_paints_block() {
        let mut map = map(20.0, 20.0, 4.0);
        assert!(map.visit(VisitedWorldDatum::visible(GridCell::new(1, 1, 0))).unwrap());
        for y in 4..=8 {
            for x in 4..=8 {
                assert_eq!(map.texel(x, y), Some(WHITE), "texel ({x}, {y})");
            }
        }
        assert_eq!(map.texel(3, 4), Some(BLACK));
        assert_eq!(map.texel(9, 9), Some(BLACK));
        assert_eq!(count_texels(&map, WHITE), 25);
    }

    #[test]
    fn test_same_state_does_not_repaint() {
        let mut map = map(20.0, 20.0, 4.0);
        let datum = VisitedWorldDatum::visible(GridCell::new(2, 0, 0));
        assert!(map.visit(datum).unwrap());
        assert!(!map.visit(datum).unwrap());
        assert_eq!(map.repaint_count(), 1);
    }

    #[test]
    fn test_state_change_repaints() {
        let mut map = map(20.0, 20.0, 4.0);
        let cell = GridCell::new(0, 0, 0);
        map.visit(VisitedWorldDatum::visible(cell)).unwrap();
        map.visit(VisitedWorldDatum::new(cell, VisibilityState::Obscured))
            .unwrap();
        assert_eq!(count_texels(&map, SILVER), 25);
        assert_eq!(count_texels(&map, WHITE), 0);
        assert_eq!(map.repaint_count(), 2);
    }

    #[test]
    fn test_height_collides() {
        let mut map = map(20.0, 20.0, 4.0);
        map.visit(VisitedWorldDatum::visible(GridCell::new(5, 5, 0))).unwrap();
        map.visit(VisitedWorldDatum::new(GridCell::new(5, 5, 9), VisibilityState::Obscured))
            .unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map.state_of(GridCell::new(5, 5, -3)), Some(VisibilityState::Obscured));
    }

    #[test]
    fn test_visit_location_uses_grid() {
        let mut map = map(20.0, 20.0, 4.0);
        map.visit_location([9.0, 13.0, 250.0]).unwrap();
        assert_eq!(map.state_of(GridCell::new(2, 3, 0)), Some(VisibilityState::Visible));
        assert_eq!(map.texel(8, 12), Some(WHITE));
    }

    #[test]
    fn test_uninitialized_fails_fast() {
        let mut map = VisibilityMap::new(WorldDescriptor::positive(4.0, 4.0), HashGrid::default());
        assert_eq!(
            map.visit(VisitedWorldDatum::visible(GridCell::ZERO)),
            Err(FogError::NotInitialized)
        );
        assert_eq!(map.fill_all(true), Err(FogError::NotInitialized));
        assert!(map.is_empty());
    }

    #[test]
    fn test_deinitialize_twice_is_safe() {
        let mut map = map(4.0, 4.0, 1.0);
        map.deinitialize();
        map.deinitialize();
        assert!(!map.is_initialized());
        assert!(map.pixels().is_none());
    }

    #[test]
    fn test_oversized_world_is_rejected() {
        let world = WorldDescriptor::positive(5e9, 5e9);
        assert_eq!(raster_bytes(&world), None);
        let mut map = VisibilityMap::new(world, HashGrid::new(1.0).unwrap());
        assert_eq!(
            map.initialize(),
            Err(FogError::RasterTooLarge {
                width: u32::MAX,
                height: u32::MAX
            })
        );
        assert!(!map.is_initialized());
        assert_eq!(map.data_size(), 0);
        assert_eq!(
            map.visit(VisitedWorldDatum::visible(GridCell::ZERO)),
            Err(FogError::NotInitialized)
        );
    }

    #[test]
    fn test_raster_bytes() {
        assert_eq!(raster_bytes(&WorldDescriptor::positive(10.0, 3.0)), Some(120));
        assert_eq!(raster_bytes(&WorldDescriptor::positive(0.0, 3.0)), Some(0));
    }

    #[test]
    fn test_reinitialize_resets_progress() {
        let mut map = map(10.0, 10.0, 1.0);
        map.visit(VisitedWorldDatum::visible(GridCell::ZERO)).unwrap();
        map.initialize().unwrap();
        assert!(map.is_empty());
        assert_eq!(map.texel(0, 0), Some(BLACK));
        assert_eq!(map.repaint_count(), 0);
        // the same visit repaints again after a reset
        assert!(map.visit(VisitedWorldDatum::visible(GridCell::ZERO)).unwrap());
    }

    #[test]
    fn test_fill_all_keeps_visited_set() {
        let mut map = map(6.0, 6.0, 2.0);
        map.visit(VisitedWorldDatum::visible(GridCell::new(1, 1, 0))).unwrap();
        map.fill_all(false).unwrap();
        assert_eq!(count_texels(&map, BLACK), 36);
        assert_eq!(map.len(), 1);
        map.fill_all(true).unwrap();
        assert_eq!(count_texels(&map, WHITE), 36);
    }

    #[test]
    fn test_zero_sized_world() {
        let mut map = map(0.0, 0.0, 1.0);
        assert!(map.visit(VisitedWorldDatum::visible(GridCell::ZERO)).unwrap());
        map.fill_all(true).unwrap();
        assert_eq!(map.pixels().unwrap().len(), 0);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(256))]

            #[test]
            fn test_block_span_stays_in_raster(
                origin in -1_000.0f64..1_000.0,
                cell_size in 0.5f64..64.0,
                limit in 0usize..512
            ) {
                let (start, end) = block_span(origin, cell_size, limit);
                prop_assert!(start <= end);
                prop_assert!(end <= limit);
            }

            #[test]
            fn test_repaint_count_matches_state_changes(
                states in proptest::collection::vec(0u8..3, 1..40)
            ) {
                let mut map = map(16.0, 16.0, 2.0);
                let cell = GridCell::new(3, 3, 0);
                let mut previous = None;
                let mut changes = 0;
                for s in states {
                    let state = match s {
                        0 => VisibilityState::Visible,
                        1 => VisibilityState::Obscured,
                        _ => VisibilityState::NotVisible,
                    };
                    if previous != Some(state) {
                        changes += 1;
                    }
                    previous = Some(state);
                    map.visit(VisitedWorldDatum::new(cell, state)).unwrap();
                }
                prop_assert_eq!(map.repaint_count(), changes);
                prop_assert_eq!(map.len(), 1);
            }
        }
    }
}
