use std::cell::Cell;
use std::io;
use std::rc::Rc;

use crate::direction::Moves;
use crate::grid::TilePos;
use crate::render::Display;

/// Capability shared by the player and the pursuers.
pub trait Entity {
    /// Advances the entity by `dt` seconds using the legal moves of the tile
    /// it currently occupies.
    fn update(&mut self, moves: Moves, dt: f64);

    fn x_position(&self) -> f32;

    fn y_position(&self) -> f32;

    /// Grid cell under the entity; sub-tile positions are truncated.
    fn tile(&self) -> TilePos {
        TilePos::new(self.x_position() as i32, self.y_position() as i32)
    }

    /// True when the last update changed the occupied tile.
    fn moved_since_last_update(&self) -> bool;

    fn is_active(&self) -> bool;

    fn is_vulnerable(&self) -> bool;

    fn set_vulnerable(&mut self, vulnerable: bool);

    fn reset(&mut self);

    fn render(&self, display: &mut dyn Display) -> io::Result<()>;

    fn set_max_valid_width(&mut self, edge: i32);
}

pub trait Pursuer: Entity {
    fn set_respawn_timer(&mut self, at_ms: u32);

    fn respawn_timer(&self) -> Option<u32>;

    /// Moves the pursuer out to its spawn position and activates it.
    fn initialize(&mut self);

    fn set_target(&mut self, target: Beacon);

    fn set_color(&mut self, color: u8);
}

/// Shared read handle on the tile the player occupies.
#[derive(Debug, Clone, Default)]
pub struct Beacon {
    pos: Rc<Cell<TilePos>>,
}

impl Beacon {
    pub fn new(pos: TilePos) -> Self {
        Self {
            pos: Rc::new(Cell::new(pos)),
        }
    }

    pub fn get(&self) -> TilePos {
        self.pos.get()
    }

    pub fn publish(&self, pos: TilePos) {
        self.pos.set(pos);
    }
}
