//! crossterm backend for [`Display`].
//!
//! Every map cell is `CELL_W` columns wide so that emoji sprites and
//! box-drawing walls line up. The board is centered with the HUD on the row
//! above it and the status text on the row below.

use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};
use crossterm::QueueableCommand;
use unicode_width::UnicodeWidthStr;

use crate::render::{Display, Hud, Palette, Sprite};
use crate::tile::Tile;

pub const CELL_W: usize = 2;

/// Maps an ANSI SGR color id (30-37 / 40-47 and their bright variants) to a
/// crossterm color. Anything else falls back to the terminal default.
pub fn sgr_color(id: i32) -> Color {
    let base = match id {
        30..=37 => id - 30,
        40..=47 => id - 40,
        90..=97 => id - 90 + 8,
        100..=107 => id - 100 + 8,
        _ => return Color::Reset,
    };
    match base {
        0 => Color::Black,
        1 => Color::DarkRed,
        2 => Color::DarkGreen,
        3 => Color::DarkYellow,
        4 => Color::DarkBlue,
        5 => Color::DarkMagenta,
        6 => Color::DarkCyan,
        7 => Color::Grey,
        8 => Color::DarkGrey,
        9 => Color::Red,
        10 => Color::Green,
        11 => Color::Yellow,
        12 => Color::Blue,
        13 => Color::Magenta,
        14 => Color::Cyan,
        _ => Color::White,
    }
}

fn tile_text(tile: Tile) -> String {
    let fill = match tile {
        Tile::Wall(piece) => piece.fill(),
        _ => ' ',
    };
    [tile.glyph(), fill].iter().collect()
}

pub struct TerminalDisplay<W: Write> {
    out: W,
    board_w: u16,
    board_h: u16,
    origin_x: u16,
    origin_y: u16,
    // False until the board fits the terminal; nothing is drawn meanwhile.
    placed: bool,
    last_hud: String,
}

impl<W: Write> TerminalDisplay<W> {
    pub fn new(out: W, width: i32, height: i32) -> Self {
        Self {
            out,
            board_w: width.clamp(0, u16::MAX as i32) as u16,
            board_h: height.clamp(0, u16::MAX as i32) as u16,
            origin_x: 0,
            origin_y: 1,
            placed: false,
            last_hud: String::new(),
        }
    }

    /// A different board size re-centres everything on the next `fit`.
    pub fn set_board_size(&mut self, width: i32, height: i32) {
        let width = width.clamp(0, u16::MAX as i32) as u16;
        let height = height.clamp(0, u16::MAX as i32) as u16;
        if width != self.board_w || height != self.board_h {
            self.board_w = width;
            self.board_h = height;
            self.placed = false;
        }
    }

    fn needed(&self) -> (u16, u16) {
        let width = (self.board_w as usize * CELL_W).min(u16::MAX as usize) as u16;
        (width, self.board_h.saturating_add(2))
    }

    /// Centers the board in a `term_w` x `term_h` terminal. Returns true when
    /// the screen was cleared and the caller must redraw everything.
    pub fn fit(&mut self, term_w: u16, term_h: u16) -> io::Result<bool> {
        let (needed_w, needed_h) = self.needed();
        if term_w < needed_w || term_h < needed_h {
            self.out.queue(MoveTo(0, 0))?;
            self.out.queue(Clear(ClearType::All))?;
            let msg = format!(
                "Terminal too small. Need at least {}x{} (cols x rows). Current: {}x{}.",
                needed_w, needed_h, term_w, term_h
            );
            self.out.queue(Print(msg))?;
            self.out.flush()?;
            self.placed = false;
            return Ok(false);
        }

        let origin_x = (term_w - needed_w) / 2;
        let origin_y = (term_h - needed_h) / 2 + 1;
        if self.placed && origin_x == self.origin_x && origin_y == self.origin_y {
            return Ok(false);
        }
        self.origin_x = origin_x;
        self.origin_y = origin_y;
        self.placed = true;
        self.last_hud.clear();
        self.out.queue(Clear(ClearType::All))?;
        Ok(true)
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn get_mut(&mut self) -> &mut W {
        &mut self.out
    }

    fn draw_cell(&mut self, x: i32, y: i32, text: &str, fg: Color, bg: Color) -> io::Result<()> {
        if !self.placed || x < 0 || y < 0 || x >= self.board_w as i32 || y >= self.board_h as i32 {
            return Ok(());
        }
        let x_pos = self.origin_x + (x as usize * CELL_W) as u16;
        let y_pos = self.origin_y + y as u16;
        self.out.queue(MoveTo(x_pos, y_pos))?;
        self.out.queue(SetForegroundColor(fg))?;
        self.out.queue(SetBackgroundColor(bg))?;
        self.out.queue(Print(text))?;
        let w = UnicodeWidthStr::width(text);
        if w < CELL_W {
            for _ in 0..(CELL_W - w) {
                self.out.queue(Print(' '))?;
            }
        }
        self.out.queue(ResetColor)?;
        Ok(())
    }

    fn status_row(&self) -> u16 {
        self.origin_y + self.board_h
    }
}

impl<W: Write> Display for TerminalDisplay<W> {
    fn draw_tile(&mut self, x: i32, y: i32, tile: Tile, palette: Palette) -> io::Result<()> {
        let text = tile_text(tile);
        match tile {
            Tile::Wall(_) | Tile::Filler => {
                self.draw_cell(x, y, &text, sgr_color(palette.fore), sgr_color(palette.back))
            }
            Tile::Empty | Tile::Pellet | Tile::Power => {
                self.draw_cell(x, y, &text, Color::Reset, Color::Reset)
            }
        }
    }

    fn draw_sprite(&mut self, x: i32, y: i32, sprite: Sprite) -> io::Result<()> {
        let (text, color) = match sprite {
            Sprite::Player { .. } => ("😃", Color::Yellow),
            Sprite::Ghost {
                frightened: true, ..
            } => ("😱", Color::Blue),
            Sprite::Ghost { color, .. } => ("👻", sgr_color(color as i32)),
        };
        self.draw_cell(x, y, text, color, Color::Reset)
    }

    fn draw_hud(&mut self, hud: &Hud) -> io::Result<()> {
        if !self.placed {
            return Ok(());
        }
        let text = format!(
            "Score: {}  High: {}  Lives: {}  Credits: {}  Level: {}  (q to quit)",
            hud.score,
            hud.high_score,
            hud.lives.max(0),
            hud.credits,
            hud.level
        );
        if text == self.last_hud {
            return Ok(());
        }
        self.out.queue(MoveTo(self.origin_x, self.origin_y - 1))?;
        self.out.queue(SetForegroundColor(Color::White))?;
        self.out.queue(Clear(ClearType::CurrentLine))?;
        self.out.queue(Print(&text))?;
        self.out.queue(ResetColor)?;
        self.last_hud = text;
        Ok(())
    }

    fn show_status(&mut self, text: &str) -> io::Result<()> {
        if !self.placed {
            return Ok(());
        }
        let (needed_w, _) = self.needed();
        let w = UnicodeWidthStr::width(text).min(needed_w as usize) as u16;
        let x = self.origin_x + (needed_w - w) / 2;
        self.out.queue(MoveTo(x, self.status_row()))?;
        self.out.queue(SetForegroundColor(Color::Yellow))?;
        self.out.queue(Print(text))?;
        self.out.queue(ResetColor)?;
        Ok(())
    }

    fn clear_status(&mut self) -> io::Result<()> {
        if !self.placed {
            return Ok(());
        }
        let (needed_w, _) = self.needed();
        self.out.queue(MoveTo(self.origin_x, self.status_row()))?;
        self.out.queue(Print(" ".repeat(needed_w as usize)))?;
        Ok(())
    }

    fn present(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}
