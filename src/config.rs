use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::constants::{SpawnLayout, DEFAULT_GHOSTS};
use crate::entity::Pursuer;
use crate::ghost::Ghost;
use crate::level::{LevelDirectory, LevelSource, MemoryLevels};
use crate::player::Player;

pub const DEFAULT_FPS: u64 = 60;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Pac-Man in the terminal")]
pub struct Config {
    /// Directory holding level<N>.txt definitions. Built-in levels when unset.
    #[arg(long, env = "PACMAN_LEVELS")]
    pub levels: Option<PathBuf>,
    /// Frames per second of the input, update and render loop.
    #[arg(long, env = "PACMAN_FPS", default_value_t = DEFAULT_FPS,
          value_parser = clap::value_parser!(u64).range(1..))]
    pub fps: u64,
    #[arg(long, default_value_t = DEFAULT_GHOSTS)]
    pub ghosts: usize,
    /// Seed for pursuer tie-breaking.
    #[arg(long)]
    pub seed: Option<u64>,
    /// Write tracing output here; nothing is logged without it.
    #[arg(long, env = "PACMAN_LOG")]
    pub log_file: Option<PathBuf>,
}

impl Config {
    pub fn level_source(&self) -> Box<dyn LevelSource> {
        match &self.levels {
            Some(root) => Box::new(LevelDirectory::new(root.clone())),
            None => Box::new(MemoryLevels::builtin()),
        }
    }

    pub fn frame_time(&self) -> Duration {
        Duration::from_micros(1_000_000 / self.fps.max(1))
    }
}

/// The entities a game is started with.
pub struct Roster {
    pub player: Player,
    pub ghosts: Vec<Box<dyn Pursuer>>,
}

/// Places the player and `ghosts` pursuers on `layout`. Each pursuer gets
/// its own stream derived from `seed`.
pub fn build_roster(layout: &SpawnLayout, ghosts: usize, seed: u64) -> Roster {
    let ghosts = (0..ghosts)
        .map(|idx| {
            let ghost = Ghost::new(
                layout.home_for(idx),
                layout.ghost_exit,
                seed.wrapping_add(idx as u64),
            );
            Box::new(ghost) as Box<dyn Pursuer>
        })
        .collect();
    Roster {
        player: Player::new(layout.player),
        ghosts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Entity;

    #[test]
    fn defaults_without_arguments() {
        let config = Config::try_parse_from(["pacman"]).expect("defaults parse");
        assert_eq!(config.ghosts, DEFAULT_GHOSTS);
        assert_eq!(config.seed, None);
        assert!(config.fps > 0);
    }

    #[test]
    fn zero_fps_is_rejected() {
        assert!(Config::try_parse_from(["pacman", "--fps", "0"]).is_err());
    }

    #[test]
    fn frame_time_follows_fps() {
        let config =
            Config::try_parse_from(["pacman", "--fps", "50"]).expect("valid fps parses");
        assert_eq!(config.frame_time(), Duration::from_millis(20));
    }

    #[test]
    fn roster_cycles_through_homes() {
        let layout = SpawnLayout::default();
        let roster = build_roster(&layout, 6, 1);
        assert_eq!(roster.ghosts.len(), 6);
        assert_eq!(roster.player.tile(), layout.player);
        assert_eq!(roster.ghosts[4].tile(), layout.ghost_homes[0]);
        assert!(roster.ghosts.iter().all(|ghost| !ghost.is_active()));
    }
}
