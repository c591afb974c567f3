//! Construction-time configuration errors.
//!
//! Gameplay itself has no error path: commands that do not apply to the
//! current state are absorbed. Only building a board or an engine from an
//! invalid configuration fails.

use thiserror::Error;

use crate::types::PieceKind;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("board width {width} is outside {min}..={max}")]
    InvalidWidth { width: u8, min: u8, max: u8 },

    #[error("visible height {height} is outside {min}..={max}")]
    InvalidVisibleHeight { height: u8, min: u8, max: u8 },

    #[error("buffer height {height} exceeds {max}")]
    InvalidBufferHeight { height: u8, max: u8 },

    #[error("piece {kind:?} has {cells} filled cells, expected 4")]
    MalformedShape { kind: PieceKind, cells: usize },

    #[error("piece {kind:?} does not fit the board at spawn column {x}")]
    SpawnOutOfBounds { kind: PieceKind, x: i8 },
}
