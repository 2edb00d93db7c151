use crate::grid::TilePos;

pub const STATE_DELAY_MS: u32 = 3000;
pub const VULNERABILITY_MS: u32 = 7000;
pub const GHOST_SPAWN_MS: u32 = 4000;
pub const GHOST_RESPAWN_FACTOR: u32 = 4;

pub const PELLET_SCORE: u32 = 10;
pub const POWER_PELLET_SCORE: u32 = 50;
pub const GHOST_SCORE: u32 = 200;

pub const STARTING_LIVES: i32 = 3;
pub const FIRST_LEVEL: u32 = 1;
pub const DEFAULT_GHOSTS: usize = 4;

/// Tiles per second.
pub const PLAYER_SPEED: f32 = 8.0;
pub const GHOST_SPEED: f32 = 7.0;
pub const GHOST_FRIGHTENED_SPEED: f32 = 4.0;

/// ANSI color id of the first pursuer; the rest follow on from it.
pub const FIRST_GHOST_COLOR: u8 = 32;
pub const GHOST_COLOR_COUNT: u8 = 6;

pub const READY_TEXT: &str = "READY!";
pub const PAUSED_TEXT: &str = "PAUSED";
pub const GAME_OVER_TEXT: &str = "GAME  OVER";
pub const PRESS_START_TEXT: &str = "PRESS START";

pub fn level_banner(level: u32) -> String {
    format!("LEVEL {}", level)
}

/// Where entities start on the built-in 28x31 maze.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnLayout {
    pub player: TilePos,
    /// Cell just outside the pen door where pursuers enter play.
    pub ghost_exit: TilePos,
    /// Cells inside the pen where idle pursuers wait.
    pub ghost_homes: Vec<TilePos>,
}

impl Default for SpawnLayout {
    fn default() -> Self {
        Self {
            player: TilePos::new(13, 23),
            ghost_exit: TilePos::new(13, 11),
            ghost_homes: vec![
                TilePos::new(12, 14),
                TilePos::new(13, 14),
                TilePos::new(14, 14),
                TilePos::new(15, 14),
            ],
        }
    }
}

impl SpawnLayout {
    pub fn home_for(&self, index: usize) -> TilePos {
        if self.ghost_homes.is_empty() {
            return self.ghost_exit;
        }
        self.ghost_homes[index % self.ghost_homes.len()]
    }
}
