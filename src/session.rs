use crate::clock::elapsed;
use crate::constants::{
    level_banner, FIRST_LEVEL, GHOST_SCORE, PELLET_SCORE, POWER_PELLET_SCORE, STARTING_LIVES,
};
use crate::render::Hud;
use crate::tile::Tile;

/// Counters and timers that outlive a single life.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    level: u32,
    lives: i32,
    credits: u32,
    score: u32,
    high_score: u32,
    ghost_multiplier: u32,
    vulnerable_since: Option<u32>,
    last_spawn_at: u32,
    timer_started_at: u32,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            level: FIRST_LEVEL,
            lives: STARTING_LIVES,
            credits: 0,
            score: 0,
            high_score: 0,
            ghost_multiplier: 1,
            vulnerable_since: None,
            last_spawn_at: 0,
            timer_started_at: 0,
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn level_banner(&self) -> String {
        level_banner(self.level)
    }

    pub fn advance_level(&mut self) {
        self.level += 1;
    }

    pub fn lives_left(&self) -> i32 {
        self.lives
    }

    pub fn set_lives_left(&mut self, lives: i32) {
        self.lives = lives;
    }

    /// Takes a life and returns how many are left; negative means the game is
    /// over.
    pub fn lose_life(&mut self) -> i32 {
        self.lives -= 1;
        self.lives
    }

    pub fn credits(&self) -> u32 {
        self.credits
    }

    pub fn insert_credit(&mut self) {
        self.credits += 1;
    }

    pub fn spend_credit(&mut self) -> bool {
        if self.credits == 0 {
            return false;
        }
        self.credits -= 1;
        true
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn award_points(&mut self, points: u32) {
        self.score += points;
        self.high_score = self.high_score.max(self.score);
    }

    pub fn award_pickup(&mut self, tile: Tile) {
        match tile {
            Tile::Pellet => self.award_points(PELLET_SCORE),
            Tile::Power => self.award_points(POWER_PELLET_SCORE),
            _ => {}
        }
    }

    /// Scores an eaten pursuer at the current multiplier, then raises it.
    pub fn award_ghost(&mut self) -> u32 {
        let points = GHOST_SCORE * self.ghost_multiplier;
        self.award_points(points);
        self.ghost_multiplier += 1;
        points
    }

    pub fn ghost_multiplier(&self) -> u32 {
        self.ghost_multiplier
    }

    pub fn start_vulnerability(&mut self, now: u32) {
        self.ghost_multiplier = 1;
        self.vulnerable_since = Some(now);
    }

    pub fn vulnerable_since(&self) -> Option<u32> {
        self.vulnerable_since
    }

    /// True once an active vulnerability window has lasted longer than
    /// `limit_ms`.
    pub fn vulnerability_expired(&self, now: u32, limit_ms: u32) -> bool {
        self.vulnerable_since
            .is_some_and(|since| elapsed(now, since) > limit_ms)
    }

    pub fn end_vulnerability(&mut self) {
        self.vulnerable_since = None;
    }

    pub fn reset_round(&mut self) {
        self.ghost_multiplier = 1;
        self.vulnerable_since = None;
    }

    pub fn mark_spawn(&mut self, now: u32) {
        self.last_spawn_at = now;
    }

    pub fn since_last_spawn(&self, now: u32) -> u32 {
        elapsed(now, self.last_spawn_at)
    }

    pub fn start_timer(&mut self, now: u32) {
        self.timer_started_at = now;
    }

    pub fn timer_elapsed(&self, now: u32) -> u32 {
        elapsed(now, self.timer_started_at)
    }

    /// Back to a fresh game after game over. Credits and the high score stay.
    pub fn restart(&mut self) {
        self.level = FIRST_LEVEL;
        self.lives = STARTING_LIVES;
        self.score = 0;
        self.reset_round();
    }

    pub fn hud(&self) -> Hud {
        Hud {
            score: self.score,
            high_score: self.high_score,
            lives: self.lives,
            credits: self.credits,
            level: self.level,
        }
    }
}
