use std::collections::TryReserveError;

use crate::direction::Dir;
use crate::tile::Tile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TilePos {
    pub x: i32,
    pub y: i32,
}

impl TilePos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn step(self, dir: Dir) -> Self {
        let (dx, dy) = dir.delta();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    pub fn manhattan(self, other: TilePos) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

/// Owned row-major tile buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileGrid {
    width: usize,
    height: usize,
    cells: Vec<Tile>,
}

impl TileGrid {
    pub fn empty() -> Self {
        Self {
            width: 0,
            height: 0,
            cells: Vec::new(),
        }
    }

    /// Allocates a `width x height` grid of filler, reporting allocation
    /// failure instead of aborting.
    pub fn try_new(width: usize, height: usize) -> Result<Self, TryReserveError> {
        let len = width.saturating_mul(height);
        let mut cells = Vec::new();
        cells.try_reserve_exact(len)?;
        cells.resize(len, Tile::Filler);
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn same_size(&self, width: usize, height: usize) -> bool {
        self.width == width && self.height == height
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y * self.width + x)
    }

    pub fn get(&self, x: i32, y: i32) -> Option<Tile> {
        self.index(x, y).map(|idx| self.cells[idx])
    }

    /// Writes `tile` at `(x, y)`; returns false when the cell does not exist.
    pub fn set(&mut self, x: i32, y: i32, tile: Tile) -> bool {
        match self.index(x, y) {
            Some(idx) => {
                self.cells[idx] = tile;
                true
            }
            None => false,
        }
    }

    pub fn set_index(&mut self, idx: usize, tile: Tile) {
        if let Some(cell) = self.cells.get_mut(idx) {
            *cell = tile;
        }
    }

    pub fn fill_from(&mut self, start: usize, tile: Tile) {
        if let Some(tail) = self.cells.get_mut(start..) {
            tail.fill(tile);
        }
    }

    /// Cell-by-cell copy; both grids must share dimensions.
    pub fn copy_from(&mut self, other: &TileGrid) {
        debug_assert!(other.same_size(self.width, self.height));
        self.cells.copy_from_slice(&other.cells);
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn pellet_count(&self) -> usize {
        self.cells.iter().filter(|tile| tile.is_pellet()).count()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> {
        self.cells.chunks(self.width.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_grid_is_filled_with_filler() {
        let grid = TileGrid::try_new(4, 3).expect("small grid allocates");
        assert_eq!(grid.len(), 12);
        assert_eq!(grid.get(3, 2), Some(Tile::Filler));
        assert_eq!(grid.rows().count(), 3);
    }

    #[test]
    fn out_of_range_access_is_rejected() {
        let mut grid = TileGrid::try_new(2, 2).expect("small grid allocates");
        assert_eq!(grid.get(-1, 0), None);
        assert_eq!(grid.get(2, 0), None);
        assert_eq!(grid.get(0, 2), None);
        assert!(!grid.set(2, 1, Tile::Pellet));
        assert!(grid.set(1, 1, Tile::Pellet));
        assert_eq!(grid.get(1, 1), Some(Tile::Pellet));
    }

    #[test]
    fn row_major_layout() {
        let mut grid = TileGrid::try_new(3, 2).expect("small grid allocates");
        grid.set_index(4, Tile::Power);
        assert_eq!(grid.get(1, 1), Some(Tile::Power));
        grid.fill_from(3, Tile::Empty);
        assert_eq!(grid.get(2, 0), Some(Tile::Filler));
        assert_eq!(grid.get(0, 1), Some(Tile::Empty));
    }

    #[test]
    fn copy_and_pellet_count() {
        let mut pristine = TileGrid::try_new(2, 2).expect("small grid allocates");
        pristine.set(0, 0, Tile::Pellet);
        pristine.set(1, 1, Tile::Power);
        let mut working = TileGrid::try_new(2, 2).expect("small grid allocates");
        working.copy_from(&pristine);
        assert_eq!(working, pristine);
        assert_eq!(working.pellet_count(), 2);
    }

    #[test]
    fn positions_step_and_measure() {
        let origin = TilePos::new(2, 2);
        assert_eq!(origin.step(Dir::Left), TilePos::new(1, 2));
        assert_eq!(origin.step(Dir::Up), TilePos::new(2, 1));
        assert_eq!(origin.manhattan(TilePos::new(5, 0)), 5);
    }

    #[test]
    fn absurd_sizes_fail_to_allocate() {
        assert!(TileGrid::try_new(usize::MAX, 2).is_err());
    }
}
