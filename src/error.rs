use std::collections::TryReserveError;
use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("failed to read level {level}: {source}")]
    Io {
        level: u32,
        #[source]
        source: io::Error,
    },

    #[error("level {level}: missing or malformed {field} in header")]
    Header { level: u32, field: &'static str },

    #[error("level {level}: invalid dimensions {width}x{height}")]
    Dimensions { level: u32, width: i64, height: i64 },

    #[error("level {level}: could not allocate map buffers: {source}")]
    Allocation {
        level: u32,
        #[source]
        source: TryReserveError,
    },
}

#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Level(#[from] LevelError),

    #[error("terminal i/o failed: {0}")]
    Io(#[from] io::Error),

    #[error("no definition found for starting level {0}")]
    NoStartingLevel(u32),

    #[error("failed to install log subscriber: {0}")]
    Logging(String),
}
