use std::io;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::constants::{GHOST_FRIGHTENED_SPEED, GHOST_SPEED};
use crate::direction::{Dir, Moves};
use crate::entity::{Beacon, Entity, Pursuer};
use crate::grid::TilePos;
use crate::render::{Display, Sprite};

/// Pursuer that heads for its target on the grid and runs from it while
/// vulnerable. It never reverses unless that is the only way out.
#[derive(Debug, Clone)]
pub struct Ghost {
    home: TilePos,
    exit: TilePos,
    pos: TilePos,
    direction: Option<Dir>,
    progress: f32,
    speed: f32,
    frightened_speed: f32,
    active: bool,
    vulnerable: bool,
    moved: bool,
    respawn_timer: Option<u32>,
    target: Option<Beacon>,
    color: u8,
    max_valid_width: i32,
    rng: StdRng,
}

impl Ghost {
    pub fn new(home: TilePos, exit: TilePos, seed: u64) -> Self {
        Self {
            home,
            exit,
            pos: home,
            direction: None,
            progress: 0.0,
            speed: GHOST_SPEED,
            frightened_speed: GHOST_FRIGHTENED_SPEED,
            active: false,
            vulnerable: false,
            moved: false,
            respawn_timer: None,
            target: None,
            color: 0,
            max_valid_width: i32::MAX - 1,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn with_speeds(mut self, speed: f32, frightened_speed: f32) -> Self {
        self.speed = speed;
        self.frightened_speed = frightened_speed;
        self
    }

    pub fn color(&self) -> u8 {
        self.color
    }

    fn choose_direction(&mut self, moves: Moves) -> Option<Dir> {
        let mut options: Vec<Dir> = moves
            .iter()
            .filter(|dir| Some(dir.reverse()) != self.direction)
            .collect();
        if options.is_empty() {
            options = moves.iter().collect();
        }
        if options.is_empty() {
            return None;
        }

        if let Some(target) = self.target.as_ref().map(Beacon::get) {
            let flee = self.vulnerable;
            let score = |dir: Dir| {
                let d = self.pos.step(dir).manhattan(target);
                if flee {
                    -d
                } else {
                    d
                }
            };
            let best = options.iter().map(|dir| score(*dir)).min().unwrap_or(0);
            options.retain(|dir| score(*dir) == best);
        }
        options.choose(&mut self.rng).copied()
    }
}

impl Entity for Ghost {
    fn update(&mut self, moves: Moves, dt: f64) {
        self.moved = false;
        if !self.active {
            return;
        }

        let speed = if self.vulnerable {
            self.frightened_speed
        } else {
            self.speed
        };
        self.progress += speed * dt as f32;
        if self.progress < 1.0 {
            return;
        }
        self.progress = (self.progress - 1.0).min(1.0);

        let Some(dir) = self.choose_direction(moves) else {
            return;
        };
        let before = self.pos;
        let next = before.step(dir);
        self.pos = TilePos::new(next.x.clamp(0, self.max_valid_width + 1), next.y);
        self.direction = Some(dir);
        self.moved = self.pos != before;
    }

    fn x_position(&self) -> f32 {
        self.pos.x as f32
    }

    fn y_position(&self) -> f32 {
        self.pos.y as f32
    }

    fn moved_since_last_update(&self) -> bool {
        self.moved
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn is_vulnerable(&self) -> bool {
        self.vulnerable
    }

    fn set_vulnerable(&mut self, vulnerable: bool) {
        self.vulnerable = vulnerable;
    }

    fn reset(&mut self) {
        self.pos = self.home;
        self.direction = None;
        self.progress = 0.0;
        self.active = false;
        self.vulnerable = false;
        self.moved = false;
        self.respawn_timer = None;
    }

    fn render(&self, display: &mut dyn Display) -> io::Result<()> {
        display.draw_sprite(
            self.pos.x,
            self.pos.y,
            Sprite::Ghost {
                color: self.color,
                frightened: self.vulnerable,
            },
        )
    }

    fn set_max_valid_width(&mut self, edge: i32) {
        self.max_valid_width = edge;
    }
}

impl Pursuer for Ghost {
    fn set_respawn_timer(&mut self, at_ms: u32) {
        self.respawn_timer = Some(at_ms);
    }

    fn respawn_timer(&self) -> Option<u32> {
        self.respawn_timer
    }

    fn initialize(&mut self) {
        self.pos = self.exit;
        self.direction = None;
        self.progress = 0.0;
        self.moved = false;
        self.active = true;
        self.respawn_timer = None;
    }

    fn set_target(&mut self, target: Beacon) {
        self.target = Some(target);
    }

    fn set_color(&mut self, color: u8) {
        self.color = color;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_moves() -> Moves {
        Dir::ALL.into_iter().fold(Moves::NONE, Moves::with)
    }

    fn ghost() -> Ghost {
        Ghost::new(TilePos::new(5, 5), TilePos::new(5, 3), 7).with_speeds(10.0, 10.0)
    }

    #[test]
    fn inactive_ghost_waits_at_home() {
        let mut ghost = ghost();
        ghost.update(all_moves(), 1.0);
        assert!(!ghost.is_active());
        assert!(!ghost.moved_since_last_update());
        assert_eq!(ghost.tile(), TilePos::new(5, 5));
    }

    #[test]
    fn initialize_moves_to_exit_and_activates() {
        let mut ghost = ghost();
        ghost.set_respawn_timer(1234);
        ghost.initialize();
        assert!(ghost.is_active());
        assert_eq!(ghost.tile(), TilePos::new(5, 3));
        assert_eq!(ghost.respawn_timer(), None);
    }

    #[test]
    fn seeks_its_target() {
        let mut ghost = ghost();
        ghost.initialize();
        ghost.set_target(Beacon::new(TilePos::new(9, 3)));
        ghost.update(all_moves(), 0.1);
        assert!(ghost.moved_since_last_update());
        assert_eq!(ghost.tile(), TilePos::new(6, 3));
    }

    #[test]
    fn flees_while_vulnerable() {
        let mut ghost = ghost();
        ghost.initialize();
        ghost.set_target(Beacon::new(TilePos::new(9, 3)));
        ghost.set_vulnerable(true);
        ghost.update(Moves::NONE.with(Dir::Left).with(Dir::Right), 0.1);
        assert_eq!(ghost.tile(), TilePos::new(4, 3));
    }

    #[test]
    fn only_reverses_in_a_dead_end() {
        let mut ghost = ghost();
        ghost.initialize();
        ghost.set_target(Beacon::new(TilePos::new(9, 3)));
        ghost.update(Moves::NONE.with(Dir::Right), 0.1);
        assert_eq!(ghost.tile(), TilePos::new(6, 3));

        // Target is behind, but the corridor continues.
        ghost.set_target(Beacon::new(TilePos::new(0, 3)));
        ghost.update(Moves::NONE.with(Dir::Left).with(Dir::Right), 0.1);
        assert_eq!(ghost.tile(), TilePos::new(7, 3));

        ghost.update(Moves::NONE.with(Dir::Left), 0.1);
        assert_eq!(ghost.tile(), TilePos::new(6, 3));
    }

    #[test]
    fn boxed_in_ghost_stays_put() {
        let mut ghost = ghost();
        ghost.initialize();
        ghost.update(Moves::NONE, 0.1);
        assert!(!ghost.moved_since_last_update());
    }

    #[test]
    fn reset_sends_ghost_home() {
        let mut ghost = ghost();
        ghost.initialize();
        ghost.set_vulnerable(true);
        ghost.reset();
        assert!(!ghost.is_active());
        assert!(!ghost.is_vulnerable());
        assert_eq!(ghost.tile(), TilePos::new(5, 5));
    }
}
