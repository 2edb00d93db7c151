//! Grid-based Pac-Man: level loading, the maze engine, entities and the game
//! state machine, plus a crossterm render backend.

pub mod clock;
pub mod config;
pub mod constants;
pub mod direction;
pub mod entity;
pub mod error;
pub mod game;
pub mod ghost;
pub mod grid;
pub mod level;
pub mod map;
pub mod player;
pub mod render;
pub mod session;
pub mod terminal;
pub mod tile;

pub use error::{GameError, LevelError};
pub use game::{Game, GameState, Input};
