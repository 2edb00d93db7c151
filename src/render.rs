//! Render backend contract.
//!
//! The simulation never writes to the screen itself: the map and the
//! entities describe what to draw through [`Display`], and the binary plugs in
//! the terminal implementation.

use std::io;

use crate::direction::Dir;
use crate::tile::Tile;

/// The two color ids a level definition carries for its walls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Palette {
    pub fore: i32,
    pub back: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sprite {
    Player { facing: Option<Dir> },
    Ghost { color: u8, frightened: bool },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Hud {
    pub score: u32,
    pub high_score: u32,
    pub lives: i32,
    pub credits: u32,
    pub level: u32,
}

pub trait Display {
    /// Draws a map cell. Walls and filler use `palette`; pellets and empty
    /// space are drawn unstyled.
    fn draw_tile(&mut self, x: i32, y: i32, tile: Tile, palette: Palette) -> io::Result<()>;

    fn draw_sprite(&mut self, x: i32, y: i32, sprite: Sprite) -> io::Result<()>;

    fn draw_hud(&mut self, hud: &Hud) -> io::Result<()>;

    /// Shows `text` centered on the status row.
    fn show_status(&mut self, text: &str) -> io::Result<()>;

    fn clear_status(&mut self) -> io::Result<()>;

    /// Called once per frame after everything else was drawn.
    fn present(&mut self) -> io::Result<()>;
}

/// Status line owned by the orchestrator and flushed on the next render.
#[derive(Debug, Clone, Default)]
pub struct StatusLine {
    text: Option<String>,
    pending: bool,
}

impl StatusLine {
    pub fn show(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
        self.pending = true;
    }

    pub fn clear(&mut self) {
        self.text = None;
        self.pending = true;
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn invalidate(&mut self) {
        self.pending = true;
    }

    pub fn flush(&mut self, display: &mut dyn Display) -> io::Result<()> {
        if !self.pending {
            return Ok(());
        }
        self.pending = false;
        display.clear_status()?;
        match &self.text {
            Some(text) => display.show_status(text),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
pub(crate) mod recording {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    pub enum Call {
        Tile(i32, i32, Tile),
        Sprite(i32, i32, Sprite),
        Hud(Hud),
        Status(String),
        ClearStatus,
        Present,
    }

    /// Display that remembers every call in order.
    #[derive(Debug, Default)]
    pub struct RecordingDisplay {
        pub calls: Vec<Call>,
    }

    impl RecordingDisplay {
        pub fn tiles(&self) -> Vec<(i32, i32)> {
            self.calls
                .iter()
                .filter_map(|call| match call {
                    Call::Tile(x, y, _) => Some((*x, *y)),
                    _ => None,
                })
                .collect()
        }

        pub fn statuses(&self) -> Vec<String> {
            self.calls
                .iter()
                .filter_map(|call| match call {
                    Call::Status(text) => Some(text.clone()),
                    _ => None,
                })
                .collect()
        }

        pub fn take(&mut self) -> Vec<Call> {
            std::mem::take(&mut self.calls)
        }
    }

    impl Display for RecordingDisplay {
        fn draw_tile(&mut self, x: i32, y: i32, tile: Tile, _palette: Palette) -> io::Result<()> {
            self.calls.push(Call::Tile(x, y, tile));
            Ok(())
        }

        fn draw_sprite(&mut self, x: i32, y: i32, sprite: Sprite) -> io::Result<()> {
            self.calls.push(Call::Sprite(x, y, sprite));
            Ok(())
        }

        fn draw_hud(&mut self, hud: &Hud) -> io::Result<()> {
            self.calls.push(Call::Hud(hud.clone()));
            Ok(())
        }

        fn show_status(&mut self, text: &str) -> io::Result<()> {
            self.calls.push(Call::Status(text.to_string()));
            Ok(())
        }

        fn clear_status(&mut self) -> io::Result<()> {
            self.calls.push(Call::ClearStatus);
            Ok(())
        }

        fn present(&mut self) -> io::Result<()> {
            self.calls.push(Call::Present);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::recording::{Call, RecordingDisplay};
    use super::*;

    #[test]
    fn status_line_flushes_once_per_change() {
        let mut display = RecordingDisplay::default();
        let mut status = StatusLine::default();
        status.show("READY!");
        status.flush(&mut display).expect("recording never fails");
        status.flush(&mut display).expect("recording never fails");
        assert_eq!(
            display.take(),
            vec![Call::ClearStatus, Call::Status("READY!".to_string())]
        );

        status.clear();
        status.flush(&mut display).expect("recording never fails");
        assert_eq!(display.take(), vec![Call::ClearStatus]);
        assert_eq!(status.text(), None);
    }
}
