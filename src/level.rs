//! Level definitions.
//!
//! A definition is a whitespace separated token stream: width, height, the
//! foreground and background color ids, then `width * height` hexadecimal tile
//! codes in row-major order. A stream that ends early is not an error; the
//! caller keeps whatever cells were read.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::SplitWhitespace;

use tracing::warn;

use crate::error::LevelError;
use crate::tile::Tile;

const BUILTIN_LEVEL_1: &str = include_str!("../levels/level1.txt");
const BUILTIN_LEVEL_2: &str = include_str!("../levels/level2.txt");

pub fn level_file_name(level: u32) -> String {
    format!("level{}.txt", level)
}

pub trait LevelSource {
    /// Returns the raw definition for `level`, or `None` when there is none.
    fn fetch(&self, level: u32) -> Result<Option<String>, LevelError>;
}

#[derive(Debug, Clone)]
pub struct LevelDirectory {
    root: PathBuf,
}

impl LevelDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl LevelSource for LevelDirectory {
    fn fetch(&self, level: u32) -> Result<Option<String>, LevelError> {
        let path = self.root.join(level_file_name(level));
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(LevelError::Io { level, source }),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryLevels {
    levels: BTreeMap<u32, String>,
}

impl MemoryLevels {
    pub fn new() -> Self {
        Self::default()
    }

    /// The levels compiled into the binary.
    pub fn builtin() -> Self {
        Self::new()
            .with(1, BUILTIN_LEVEL_1)
            .with(2, BUILTIN_LEVEL_2)
    }

    pub fn with(mut self, level: u32, text: impl Into<String>) -> Self {
        self.insert(level, text);
        self
    }

    pub fn insert(&mut self, level: u32, text: impl Into<String>) {
        self.levels.insert(level, text.into());
    }
}

impl LevelSource for MemoryLevels {
    fn fetch(&self, level: u32) -> Result<Option<String>, LevelError> {
        Ok(self.levels.get(&level).cloned())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelHeader {
    pub width: usize,
    pub height: usize,
    pub fore_color: i32,
    pub back_color: i32,
}

/// Splits a definition into its header and the lazy tile stream behind it.
pub fn parse(level: u32, text: &str) -> Result<(LevelHeader, TileStream<'_>), LevelError> {
    let mut tokens = text.split_whitespace();
    let mut next_int = |field: &'static str| -> Result<i64, LevelError> {
        tokens
            .next()
            .and_then(|tok| tok.parse::<i64>().ok())
            .ok_or(LevelError::Header { level, field })
    };

    let width = next_int("width")?;
    let height = next_int("height")?;
    let fore_color = next_int("foreground color")?;
    let back_color = next_int("background color")?;

    if width <= 0 || height <= 0 || width > i32::MAX as i64 || height > i32::MAX as i64 {
        return Err(LevelError::Dimensions {
            level,
            width,
            height,
        });
    }

    let header = LevelHeader {
        width: width as usize,
        height: height as usize,
        fore_color: fore_color as i32,
        back_color: back_color as i32,
    };
    Ok((
        header,
        TileStream {
            level,
            tokens,
            done: false,
        },
    ))
}

pub struct TileStream<'a> {
    level: u32,
    tokens: SplitWhitespace<'a>,
    done: bool,
}

impl Iterator for TileStream<'_> {
    type Item = Tile;

    fn next(&mut self) -> Option<Tile> {
        if self.done {
            return None;
        }
        let Some(token) = self.tokens.next() else {
            self.done = true;
            return None;
        };
        let Some(code) = parse_hex_code(token) else {
            warn!(level = self.level, token, "malformed tile code, truncating level");
            self.done = true;
            return None;
        };
        Some(Tile::from_code(code).unwrap_or_else(|| {
            warn!(level = self.level, code, "unknown tile code, treating as filler");
            Tile::Filler
        }))
    }
}

fn parse_hex_code(token: &str) -> Option<u8> {
    let digits = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
        .unwrap_or(token);
    u32::from_str_radix(digits, 16)
        .ok()
        .map(|value| (value & 0xFF) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::WallPiece;

    #[test]
    fn header_and_tiles_are_read_in_order() {
        let (header, tiles) = parse(1, "3 2\n34 40\nc9 cd bb\nfa fe 20\n").expect("valid level");
        assert_eq!(
            header,
            LevelHeader {
                width: 3,
                height: 2,
                fore_color: 34,
                back_color: 40,
            }
        );
        let tiles: Vec<Tile> = tiles.collect();
        assert_eq!(
            tiles,
            vec![
                Tile::Wall(WallPiece::OuterTopLeft),
                Tile::Wall(WallPiece::OuterHorizontal),
                Tile::Wall(WallPiece::OuterTopRight),
                Tile::Pellet,
                Tile::Power,
                Tile::Empty,
            ]
        );
    }

    #[test]
    fn short_stream_ends_without_error() {
        let (_, tiles) = parse(1, "2 2 0 0 fa fa").expect("valid header");
        assert_eq!(tiles.count(), 2);
    }

    #[test]
    fn malformed_token_stops_the_stream() {
        let (_, tiles) = parse(1, "3 1 0 0 fa zz fa").expect("valid header");
        assert_eq!(tiles.collect::<Vec<_>>(), vec![Tile::Pellet]);
    }

    #[test]
    fn prefixed_and_oversized_codes_are_accepted() {
        let (_, tiles) = parse(1, "2 1 0 0 0xFA 1fe").expect("valid header");
        assert_eq!(tiles.collect::<Vec<_>>(), vec![Tile::Pellet, Tile::Power]);
    }

    #[test]
    fn unknown_codes_become_filler() {
        let (_, tiles) = parse(1, "1 1 0 0 41").expect("valid header");
        assert_eq!(tiles.collect::<Vec<_>>(), vec![Tile::Filler]);
    }

    #[test]
    fn broken_header_is_rejected() {
        assert!(matches!(
            parse(4, "28"),
            Err(LevelError::Header {
                level: 4,
                field: "height"
            })
        ));
        assert!(matches!(
            parse(4, "28 31 blue 40"),
            Err(LevelError::Header {
                field: "foreground color",
                ..
            })
        ));
        assert!(matches!(
            parse(4, "0 31 34 40"),
            Err(LevelError::Dimensions { width: 0, .. })
        ));
    }

    #[test]
    fn builtin_levels_parse_completely() {
        let levels = MemoryLevels::builtin();
        for level in [1, 2] {
            let text = levels
                .fetch(level)
                .expect("memory fetch cannot fail")
                .expect("builtin level exists");
            let (header, tiles) = parse(level, &text).expect("builtin level parses");
            assert_eq!((header.width, header.height), (28, 31));
            let tiles: Vec<Tile> = tiles.collect();
            assert_eq!(tiles.len(), 28 * 31);
            assert_eq!(tiles.iter().filter(|t| t.is_pellet()).count(), 244);
        }
        assert!(levels.fetch(3).expect("memory fetch cannot fail").is_none());
    }

    #[test]
    fn missing_file_in_directory_is_not_an_error() {
        let dir = LevelDirectory::new(std::env::temp_dir().join("pacman-arcade-no-such-dir"));
        assert!(dir.fetch(7).expect("not found maps to none").is_none());
    }

    #[test]
    fn directory_reads_numbered_files() {
        let root = std::env::temp_dir().join(format!("pacman-arcade-levels-{}", std::process::id()));
        fs::create_dir_all(&root).expect("create temp dir");
        fs::write(root.join(level_file_name(3)), "1 1 0 0 fa").expect("write level");
        let dir = LevelDirectory::new(&root);
        assert_eq!(
            dir.fetch(3).expect("readable").as_deref(),
            Some("1 1 0 0 fa")
        );
        fs::remove_dir_all(&root).ok();
    }
}
