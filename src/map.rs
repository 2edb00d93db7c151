use std::collections::TryReserveError;
use std::io;

use tracing::{debug, info, warn};

use crate::direction::{Dir, Moves};
use crate::error::LevelError;
use crate::grid::{TileGrid, TilePos};
use crate::level::{self, LevelSource};
use crate::render::{Display, Palette};
use crate::tile::{Tile, WallGroup};

// What a read lands on in the column one past the last: the end of the row.
const ROW_END: Tile = Tile::Filler;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded,
    /// No definition for the level; the current map was reset and kept.
    ReusedPrevious,
    /// No definition and nothing loaded to fall back on.
    Unavailable,
}

/// The maze: a working grid mutated during play, the pristine grid it is
/// restored from, the pellet counter and the queue of cells to redraw.
#[derive(Debug, Clone)]
pub struct GameMap {
    working: TileGrid,
    pristine: TileGrid,
    palette: Palette,
    loaded_dots: u32,
    dots_remaining: u32,
    dirty: Vec<TilePos>,
}

impl Default for GameMap {
    fn default() -> Self {
        Self::new()
    }
}

impl GameMap {
    pub fn new() -> Self {
        Self {
            working: TileGrid::empty(),
            pristine: TileGrid::empty(),
            palette: Palette::default(),
            loaded_dots: 0,
            dots_remaining: 0,
            dirty: Vec::new(),
        }
    }

    pub fn load(&mut self, level: u32, source: &dyn LevelSource) -> Result<LoadOutcome, LevelError> {
        let Some(text) = source.fetch(level)? else {
            if self.loaded_dots > 0 {
                warn!(level, "no definition for level, reusing current map");
                self.reset_to_pristine();
                return Ok(LoadOutcome::ReusedPrevious);
            }
            warn!(level, "no definition for level and no map to fall back on");
            return Ok(LoadOutcome::Unavailable);
        };

        let (header, tiles) = level::parse(level, &text)?;
        let (width, height) = (header.width, header.height);

        // Same dimensions: keep the buffers we already have.
        if !self.pristine.same_size(width, height) {
            let alloc_failed = |source: TryReserveError| LevelError::Allocation { level, source };
            let pristine = TileGrid::try_new(width, height).map_err(alloc_failed)?;
            let working = TileGrid::try_new(width, height).map_err(alloc_failed)?;
            debug!(level, width, height, "allocated map buffers");
            self.pristine = pristine;
            self.working = working;
        }
        self.palette = Palette {
            fore: header.fore_color,
            back: header.back_color,
        };

        let total = width * height;
        let mut read = 0;
        let mut dots = 0;
        for tile in tiles.take(total) {
            self.pristine.set_index(read, tile);
            if tile.is_pellet() {
                dots += 1;
            }
            read += 1;
        }
        if read < total {
            warn!(level, read, expected = total, "level data ended early");
            self.pristine.fill_from(read, Tile::Filler);
        }

        self.loaded_dots = dots;
        self.reset_to_pristine();
        info!(level, width, height, dots, "level loaded");
        Ok(LoadOutcome::Loaded)
    }

    pub fn reset_to_pristine(&mut self) {
        self.working.copy_from(&self.pristine);
        self.dots_remaining = self.loaded_dots;
        self.dirty.clear();
    }

    pub fn width(&self) -> i32 {
        self.working.width() as i32
    }

    pub fn height(&self) -> i32 {
        self.working.height() as i32
    }

    /// Rightmost column an entity may occupy.
    pub fn map_edge(&self) -> i32 {
        self.width() - 2
    }

    pub fn palette(&self) -> Palette {
        self.palette
    }

    fn stored(&self, x: i32, y: i32) -> Tile {
        self.working.get(x, y).unwrap_or(ROW_END)
    }

    /// Not range checked beyond the grid itself: positions outside the grid
    /// are never walls.
    pub fn is_wall(&self, x: i32, y: i32, group: WallGroup) -> bool {
        self.working
            .get(x, y)
            .is_some_and(|tile| tile.is_wall_in(group))
    }

    // The horizontal bound admits x == width while the vertical one stops
    // before height.
    pub fn check_for_empty_space(&self, x: i32, y: i32) -> bool {
        if x >= 0 && x <= self.width() && y >= 0 && y < self.height() {
            return self.stored(x, y).is_open();
        }
        false
    }

    pub fn available_moves(&self, x: i32, y: i32) -> Moves {
        let mut moves = Moves::NONE;
        if self.check_for_empty_space(x - 1, y) {
            moves = moves.with(Dir::Left);
        }
        if self.check_for_empty_space(x + 1, y) {
            moves = moves.with(Dir::Right);
        }
        if self.check_for_empty_space(x, y + 1) {
            moves = moves.with(Dir::Down);
        }
        if self.check_for_empty_space(x, y - 1) {
            moves = moves.with(Dir::Up);
        }
        moves
    }

    fn in_accessor_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x <= self.width() && y >= 0 && y <= self.height()
    }

    pub fn set_tile(&mut self, tile: Tile, x: i32, y: i32) {
        if !self.in_accessor_bounds(x, y) {
            return;
        }
        self.working.set(x, y, tile);
    }

    pub fn tile(&self, x: i32, y: i32) -> Tile {
        if !self.in_accessor_bounds(x, y) {
            return Tile::Empty;
        }
        self.stored(x, y)
    }

    pub fn remaining_dots(&self) -> u32 {
        self.dots_remaining
    }

    pub fn loaded_dots(&self) -> u32 {
        self.loaded_dots
    }

    pub fn decrement_dots(&mut self) {
        self.dots_remaining = self.dots_remaining.saturating_sub(1);
    }

    pub fn increment_dots(&mut self) {
        self.dots_remaining += 1;
    }

    pub fn mark_dirty(&mut self, pos: TilePos) {
        self.dirty.push(pos);
    }

    pub fn clear_dirty(&mut self) {
        self.dirty.clear();
    }

    pub fn dirty_len(&self) -> usize {
        self.dirty.len()
    }

    /// Full pass redraws every cell and leaves the dirty queue alone; the
    /// incremental pass pops every queued cell, newest first.
    pub fn render(&mut self, display: &mut dyn Display, full: bool) -> io::Result<()> {
        if full {
            for (y, row) in self.working.rows().enumerate() {
                for (x, tile) in row.iter().enumerate() {
                    display.draw_tile(x as i32, y as i32, *tile, self.palette)?;
                }
            }
            return Ok(());
        }

        while let Some(pos) = self.dirty.pop() {
            if let Some(tile) = self.working.get(pos.x, pos.y) {
                display.draw_tile(pos.x, pos.y, tile, self.palette)?;
            }
        }
        Ok(())
    }
}
