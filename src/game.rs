//! The orchestrator: state machine, per-tick update order, collision
//! resolution and pursuer release.
//!
//! One frame is `handle_input` (the state machine step), `update` (movement
//! and collisions, only while running) and `render`.

use std::io;

use tracing::{debug, error, info, warn};

use crate::clock::{elapsed, Clock};
use crate::constants::{
    FIRST_GHOST_COLOR, GAME_OVER_TEXT, GHOST_COLOR_COUNT, GHOST_RESPAWN_FACTOR, GHOST_SPAWN_MS,
    PAUSED_TEXT, PRESS_START_TEXT, READY_TEXT, STATE_DELAY_MS, VULNERABILITY_MS,
};
use crate::direction::Dir;
use crate::entity::{Entity, Pursuer};
use crate::error::GameError;
use crate::level::LevelSource;
use crate::map::{GameMap, LoadOutcome};
use crate::player::Player;
use crate::render::{Display, StatusLine};
use crate::session::Session;
use crate::tile::Tile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Attract,
    Ready,
    Running,
    Paused,
    NextLevel,
    GameOver,
}

/// Inputs gathered for one frame. Every flag is a fresh press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Input {
    pub credit: bool,
    pub start: bool,
    pub pause: bool,
    pub steer: Option<Dir>,
}

pub struct Game<C: Clock> {
    clock: C,
    levels: Box<dyn LevelSource>,
    map: GameMap,
    player: Player,
    ghosts: Vec<Box<dyn Pursuer>>,
    session: Session,
    state: GameState,
    status: StatusLine,
    full_redraw: bool,
}

impl<C: Clock> Game<C> {
    /// Loads the first level and parks the game in attract mode.
    pub fn new(
        clock: C,
        levels: Box<dyn LevelSource>,
        player: Player,
        ghosts: Vec<Box<dyn Pursuer>>,
    ) -> Result<Self, GameError> {
        let session = Session::new();
        let mut map = GameMap::new();
        if map.load(session.level(), levels.as_ref())? != LoadOutcome::Loaded {
            return Err(GameError::NoStartingLevel(session.level()));
        }

        let mut game = Self {
            clock,
            levels,
            map,
            player,
            ghosts,
            session,
            state: GameState::Attract,
            status: StatusLine::default(),
            full_redraw: true,
        };
        game.reset();
        game.status.show(PRESS_START_TEXT);
        info!(ghosts = game.ghosts.len(), "game ready");
        Ok(game)
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn map(&self) -> &GameMap {
        &self.map
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn ghosts(&self) -> &[Box<dyn Pursuer>] {
        &self.ghosts
    }

    pub fn status_text(&self) -> Option<&str> {
        self.status.text()
    }

    fn set_state(&mut self, next: GameState) {
        if self.state != next {
            info!(from = ?self.state, to = ?next, level = self.session.level(), "state change");
            self.state = next;
        }
    }

    pub fn tick(&mut self, input: Input, dt: f64) {
        self.handle_input(input);
        self.update(dt);
    }

    /// State machine step. Triggers that mean nothing in the current state
    /// are dropped.
    pub fn handle_input(&mut self, input: Input) {
        let now = self.clock.now_ms();
        match self.state {
            GameState::Attract => {
                if input.credit {
                    self.session.insert_credit();
                }
                if input.start && self.session.spend_credit() {
                    self.status.show(READY_TEXT);
                    self.session.start_timer(now);
                    self.set_state(GameState::Ready);
                }
            }
            GameState::Ready => {
                if self.session.timer_elapsed(now) >= STATE_DELAY_MS {
                    self.session.mark_spawn(now);
                    self.session.end_vulnerability();
                    self.status.clear();
                    self.set_state(GameState::Running);
                }
            }
            GameState::Running => {
                if let Some(dir) = input.steer {
                    self.steer_player(dir);
                }
                if input.pause {
                    self.toggle_pause();
                }
            }
            GameState::Paused => {
                if input.pause {
                    self.toggle_pause();
                }
            }
            GameState::NextLevel => {
                if self.session.timer_elapsed(now) >= STATE_DELAY_MS {
                    self.trigger_new_level();
                    self.status.show(READY_TEXT);
                    self.set_state(GameState::Ready);
                }
            }
            GameState::GameOver => {
                if self.session.timer_elapsed(now) >= STATE_DELAY_MS {
                    self.trigger_new_level();
                    self.status.show(PRESS_START_TEXT);
                    self.set_state(GameState::Attract);
                }
            }
        }
    }

    /// One simulation step; does nothing unless the game is running.
    pub fn update(&mut self, dt: f64) {
        if self.state != GameState::Running {
            return;
        }
        let now = self.clock.now_ms();

        if self.map.remaining_dots() == 0 {
            self.session.advance_level();
            self.session.start_timer(now);
            self.status.show(self.session.level_banner());
            self.set_state(GameState::NextLevel);
            return;
        }
        if self.session.lives_left() < 0 {
            self.session.start_timer(now);
            self.status.show(GAME_OVER_TEXT);
            self.set_state(GameState::GameOver);
            return;
        }

        // Player first: pickups and contact resolve before pursuers move.
        self.update_player(dt);
        if self.state != GameState::Running {
            return;
        }
        self.update_ghosts(dt);
        if self.state != GameState::Running {
            return;
        }

        if self
            .session
            .vulnerability_expired(self.clock.now_ms(), VULNERABILITY_MS)
        {
            self.set_all_vulnerable(false);
            self.session.end_vulnerability();
        }
    }

    pub fn render(&mut self, display: &mut dyn Display) -> io::Result<()> {
        display.draw_hud(&self.session.hud())?;
        if self.full_redraw {
            self.map.render(display, true)?;
            self.full_redraw = false;
            self.status.invalidate();
        } else {
            self.map.render(display, false)?;
        }
        self.player.render(display)?;
        for ghost in &self.ghosts {
            ghost.render(display)?;
        }
        self.status.flush(display)?;
        display.present()
    }

    /// Asks for the whole board to be drawn again on the next render.
    pub fn request_full_redraw(&mut self) {
        self.full_redraw = true;
    }

    fn steer_player(&mut self, dir: Dir) {
        let next = self.player.tile().step(dir);
        if self.map.check_for_empty_space(next.x, next.y) {
            self.player.set_direction(dir);
        }
    }

    fn toggle_pause(&mut self) {
        match self.state {
            GameState::Running => {
                self.status.show(PAUSED_TEXT);
                self.set_state(GameState::Paused);
            }
            GameState::Paused => {
                self.session.mark_spawn(self.clock.now_ms());
                self.status.clear();
                self.set_state(GameState::Running);
            }
            _ => {}
        }
    }

    fn update_player(&mut self, dt: f64) {
        let before = self.player.tile();
        let moves = self.map.available_moves(before.x, before.y);
        self.player.update(moves, dt);
        if self.player.moved_since_last_update() {
            self.map.mark_dirty(before);
            self.check_collisions();
        }
    }

    fn update_ghosts(&mut self, dt: f64) {
        let now = self.clock.now_ms();
        for idx in 0..self.ghosts.len() {
            if !self.ghosts[idx].is_active() {
                self.try_release(idx, now);
                continue;
            }
            let ghost = &mut self.ghosts[idx];
            let before = ghost.tile();
            let moves = self.map.available_moves(before.x, before.y);
            ghost.update(moves, dt);
            if ghost.moved_since_last_update() {
                self.map.mark_dirty(before);
            }
        }
        self.check_collisions();
    }

    // A waiting pursuer comes out once the shared stagger has passed and, if
    // it was eaten, its own longer cool-down too.
    fn try_release(&mut self, idx: usize, now: u32) {
        if self.session.since_last_spawn(now) <= GHOST_SPAWN_MS {
            return;
        }
        let ghost = &mut self.ghosts[idx];
        if let Some(eaten_at) = ghost.respawn_timer() {
            if elapsed(now, eaten_at) <= GHOST_SPAWN_MS * GHOST_RESPAWN_FACTOR {
                return;
            }
        }
        self.map.mark_dirty(ghost.tile());
        ghost.initialize();
        ghost.set_target(self.player.beacon());
        self.session.mark_spawn(now);
        debug!(ghost = idx, "pursuer released");
    }

    fn check_collisions(&mut self) {
        let pos = self.player.tile();
        let tile = self.map.tile(pos.x, pos.y);
        match tile {
            Tile::Pellet => {
                self.map.decrement_dots();
                self.map.set_tile(Tile::Empty, pos.x, pos.y);
                self.session.award_pickup(tile);
            }
            Tile::Power => {
                self.map.decrement_dots();
                self.map.set_tile(Tile::Empty, pos.x, pos.y);
                self.set_all_vulnerable(true);
                self.session.start_vulnerability(self.clock.now_ms());
                self.session.award_pickup(tile);
            }
            _ => {}
        }

        for idx in 0..self.ghosts.len() {
            let ghost = &self.ghosts[idx];
            if !ghost.is_active() || ghost.tile() != pos {
                continue;
            }
            if ghost.is_vulnerable() {
                self.ghost_eaten(idx);
            } else {
                self.life_lost();
                return;
            }
        }
    }

    fn ghost_eaten(&mut self, idx: usize) {
        let now = self.clock.now_ms();
        let points = self.session.award_ghost();
        let ghost = &mut self.ghosts[idx];
        self.map.mark_dirty(ghost.tile());
        ghost.reset();
        ghost.set_respawn_timer(now);
        debug!(ghost = idx, points, "pursuer eaten");
    }

    fn life_lost(&mut self) {
        let pos = self.player.tile();
        self.map.set_tile(Tile::Empty, pos.x, pos.y);
        self.map.reset_to_pristine();
        self.reset();
        self.session.start_timer(self.clock.now_ms());

        let left = self.session.lose_life();
        debug!(lives = left, "life lost");
        if left >= 0 {
            self.status.show(READY_TEXT);
            self.set_state(GameState::Ready);
        } else {
            self.status.show(GAME_OVER_TEXT);
            self.set_state(GameState::GameOver);
        }
    }

    fn trigger_new_level(&mut self) {
        if self.state == GameState::GameOver {
            self.session.restart();
        }

        let level = self.session.level();
        match self.map.load(level, self.levels.as_ref()) {
            Ok(LoadOutcome::Loaded) | Ok(LoadOutcome::ReusedPrevious) => {}
            Ok(LoadOutcome::Unavailable) => {
                warn!(level, "nothing to load, replaying current map");
                self.map.reset_to_pristine();
            }
            Err(err) => {
                error!(level, error = %err, "level load failed, replaying current map");
                self.map.reset_to_pristine();
            }
        }
        self.reset();
        self.session.start_timer(self.clock.now_ms());
    }

    /// Puts every entity back on its start tile and schedules a full redraw.
    fn reset(&mut self) {
        self.session.reset_round();

        let edge = self.map.map_edge();
        self.player.set_max_valid_width(edge);
        self.player.reset();

        let beacon = self.player.beacon();
        for (idx, ghost) in self.ghosts.iter_mut().enumerate() {
            ghost.set_color(FIRST_GHOST_COLOR + (idx as u8 % GHOST_COLOR_COUNT));
            ghost.reset();
            ghost.set_max_valid_width(edge);
            if idx == 0 {
                ghost.set_target(beacon.clone());
                ghost.initialize();
            }
        }

        self.map.clear_dirty();
        self.full_redraw = true;
    }

    fn set_all_vulnerable(&mut self, vulnerable: bool) {
        for ghost in &mut self.ghosts {
            ghost.set_vulnerable(vulnerable);
        }
    }
}
