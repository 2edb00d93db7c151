use std::io;

use crate::constants::PLAYER_SPEED;
use crate::direction::{Dir, Moves};
use crate::entity::{Beacon, Entity};
use crate::grid::TilePos;
use crate::render::{Display, Sprite};

#[derive(Debug, Clone)]
pub struct Player {
    spawn: TilePos,
    x: f32,
    y: f32,
    direction: Option<Dir>,
    facing: Option<Dir>,
    // Fraction of the next tile already travelled.
    progress: f32,
    speed: f32,
    moved: bool,
    vulnerable: bool,
    max_valid_width: i32,
    beacon: Beacon,
}

impl Player {
    pub fn new(spawn: TilePos) -> Self {
        Self {
            spawn,
            x: spawn.x as f32,
            y: spawn.y as f32,
            direction: None,
            facing: None,
            progress: 0.0,
            speed: PLAYER_SPEED,
            moved: false,
            vulnerable: false,
            max_valid_width: i32::MAX - 1,
            beacon: Beacon::new(spawn),
        }
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    pub fn set_direction(&mut self, dir: Dir) {
        self.direction = Some(dir);
        self.facing = Some(dir);
    }

    pub fn direction(&self) -> Option<Dir> {
        self.direction
    }

    pub fn spawn(&self) -> TilePos {
        self.spawn
    }

    /// Handle pursuers use to follow the player.
    pub fn beacon(&self) -> Beacon {
        self.beacon.clone()
    }

    pub fn place(&mut self, pos: TilePos) {
        self.x = pos.x as f32;
        self.y = pos.y as f32;
        self.beacon.publish(pos);
    }
}

impl Entity for Player {
    fn update(&mut self, moves: Moves, dt: f64) {
        self.moved = false;
        let Some(dir) = self.direction else {
            return;
        };
        if !moves.allows(dir) {
            self.direction = None;
            self.progress = 0.0;
            return;
        }

        self.progress += self.speed * dt as f32;
        if self.progress < 1.0 {
            return;
        }
        self.progress = (self.progress - 1.0).min(1.0);

        let before = self.tile();
        let next = before.step(dir);
        let x = next.x.clamp(0, self.max_valid_width + 1);
        self.place(TilePos::new(x, next.y));
        self.moved = self.tile() != before;
    }

    fn x_position(&self) -> f32 {
        self.x
    }

    fn y_position(&self) -> f32 {
        self.y
    }

    fn moved_since_last_update(&self) -> bool {
        self.moved
    }

    fn is_active(&self) -> bool {
        true
    }

    fn is_vulnerable(&self) -> bool {
        self.vulnerable
    }

    fn set_vulnerable(&mut self, vulnerable: bool) {
        self.vulnerable = vulnerable;
    }

    fn reset(&mut self) {
        self.place(self.spawn);
        self.direction = None;
        self.facing = None;
        self.progress = 0.0;
        self.moved = false;
        self.vulnerable = false;
    }

    fn render(&self, display: &mut dyn Display) -> io::Result<()> {
        let pos = self.tile();
        display.draw_sprite(
            pos.x,
            pos.y,
            Sprite::Player {
                facing: self.facing,
            },
        )
    }

    fn set_max_valid_width(&mut self, edge: i32) {
        self.max_valid_width = edge;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_moves() -> Moves {
        Dir::ALL.into_iter().fold(Moves::NONE, Moves::with)
    }

    #[test]
    fn idle_player_never_moves() {
        let mut player = Player::new(TilePos::new(3, 3));
        player.update(all_moves(), 10.0);
        assert!(!player.moved_since_last_update());
        assert_eq!(player.tile(), TilePos::new(3, 3));
    }

    #[test]
    fn steps_one_tile_once_enough_time_passed() {
        let mut player = Player::new(TilePos::new(3, 3)).with_speed(10.0);
        let beacon = player.beacon();
        player.set_direction(Dir::Right);

        player.update(all_moves(), 0.05);
        assert!(!player.moved_since_last_update());

        player.update(all_moves(), 0.06);
        assert!(player.moved_since_last_update());
        assert_eq!(player.tile(), TilePos::new(4, 3));
        assert_eq!(beacon.get(), TilePos::new(4, 3));

        player.update(all_moves(), 0.01);
        assert!(!player.moved_since_last_update());
    }

    #[test]
    fn stops_when_blocked() {
        let mut player = Player::new(TilePos::new(3, 3)).with_speed(10.0);
        player.set_direction(Dir::Up);
        player.update(Moves::NONE.with(Dir::Down), 1.0);
        assert!(!player.moved_since_last_update());
        assert_eq!(player.direction(), None);
        assert_eq!(player.tile(), TilePos::new(3, 3));
    }

    #[test]
    fn never_walks_past_the_map_edge() {
        let mut player = Player::new(TilePos::new(5, 1)).with_speed(10.0);
        player.set_max_valid_width(4);
        player.set_direction(Dir::Right);
        player.update(all_moves(), 0.2);
        assert!(!player.moved_since_last_update());
        assert_eq!(player.tile(), TilePos::new(5, 1));
    }

    #[test]
    fn reset_returns_to_spawn() {
        let mut player = Player::new(TilePos::new(1, 1)).with_speed(10.0);
        player.set_direction(Dir::Down);
        player.update(all_moves(), 0.2);
        assert_eq!(player.tile(), TilePos::new(1, 2));
        player.reset();
        assert_eq!(player.tile(), TilePos::new(1, 1));
        assert_eq!(player.direction(), None);
        assert_eq!(player.beacon().get(), TilePos::new(1, 1));
    }
}
