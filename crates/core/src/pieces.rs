//! Pieces module - piece shapes and clockwise rotation
//!
//! A piece is a plain value: kind, color, current shape matrix and anchor.
//! Moving or rotating returns a new value; nothing mutates in place.
//! Rotation is a pure matrix transform with no wall kicks: the anchor stays
//! where it is and the caller rejects the result if it collides.

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::error::ConfigError;
use crate::types::{Color, PieceKind, BOARD_WIDTH, SPAWN_POSITION};

/// Largest matrix side any shape can have
pub const MAX_SHAPE_SIDE: usize = 4;

/// Offset of a filled cell relative to the piece anchor, as (dx, dy)
pub type CellOffset = (i8, i8);

/// A `rows x cols` matrix of filled/empty cells
///
/// Only the top-left `rows x cols` region of `cells` is meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Shape {
    rows: u8,
    cols: u8,
    cells: [[bool; MAX_SHAPE_SIDE]; MAX_SHAPE_SIDE],
}

impl Shape {
    /// Build a shape from row-major 0/1 rows
    ///
    /// Panics if the matrix is larger than 4x4 or ragged; only used for the
    /// fixed base table and tests.
    pub fn from_rows(rows: &[&[u8]]) -> Self {
        assert!(!rows.is_empty() && rows.len() <= MAX_SHAPE_SIDE);
        let cols = rows[0].len();
        assert!(cols > 0 && cols <= MAX_SHAPE_SIDE);

        let mut cells = [[false; MAX_SHAPE_SIDE]; MAX_SHAPE_SIDE];
        for (i, row) in rows.iter().enumerate() {
            assert_eq!(row.len(), cols, "ragged shape row {i}");
            for (j, &v) in row.iter().enumerate() {
                cells[i][j] = v != 0;
            }
        }

        Self {
            rows: rows.len() as u8,
            cols: cols as u8,
            cells,
        }
    }

    /// Base (spawn) shape for a piece kind
    pub fn base(kind: PieceKind) -> Self {
        match kind {
            PieceKind::I => Self::from_rows(&[&[1, 1, 1, 1]]),
            PieceKind::O => Self::from_rows(&[&[1, 1], &[1, 1]]),
            PieceKind::T => Self::from_rows(&[&[0, 1, 0], &[1, 1, 1]]),
            PieceKind::S => Self::from_rows(&[&[0, 1, 1], &[1, 1, 0]]),
            PieceKind::Z => Self::from_rows(&[&[1, 1, 0], &[0, 1, 1]]),
            PieceKind::J => Self::from_rows(&[&[1, 0, 0], &[1, 1, 1]]),
            PieceKind::L => Self::from_rows(&[&[0, 0, 1], &[1, 1, 1]]),
        }
    }

    pub fn rows(&self) -> u8 {
        self.rows
    }

    pub fn cols(&self) -> u8 {
        self.cols
    }

    /// Whether matrix cell (row i, column j) is filled
    pub fn is_filled(&self, i: usize, j: usize) -> bool {
        i < self.rows as usize && j < self.cols as usize && self.cells[i][j]
    }

    /// Rotate 90° clockwise: `out[j][rows - 1 - i] = in[i][j]`
    ///
    /// An R x C matrix becomes C x R.
    pub fn rotated_cw(&self) -> Self {
        let rows = self.rows as usize;
        let cols = self.cols as usize;
        let mut cells = [[false; MAX_SHAPE_SIDE]; MAX_SHAPE_SIDE];

        for i in 0..rows {
            for j in 0..cols {
                cells[j][rows - 1 - i] = self.cells[i][j];
            }
        }

        Self {
            rows: self.cols,
            cols: self.rows,
            cells,
        }
    }

    /// Offsets (dx, dy) of every filled cell, row-major
    pub fn filled_offsets(&self) -> ArrayVec<CellOffset, 16> {
        let mut out = ArrayVec::new();
        for i in 0..self.rows as usize {
            for j in 0..self.cols as usize {
                if self.cells[i][j] {
                    out.push((j as i8, i as i8));
                }
            }
        }
        out
    }

    /// Rows of the matrix as 0/1 vectors (for display and tests)
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        (0..self.rows as usize)
            .map(|i| {
                (0..self.cols as usize)
                    .map(|j| u8::from(self.cells[i][j]))
                    .collect()
            })
            .collect()
    }
}

/// A piece on (or about to enter) the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub kind: PieceKind,
    pub shape: Shape,
    pub color: Color,
    pub x: i8,
    pub y: i8,
}

impl Piece {
    /// New piece in base orientation at the standard spawn anchor
    pub fn spawn(kind: PieceKind) -> Self {
        Self::at(kind, SPAWN_POSITION.0, SPAWN_POSITION.1)
    }

    /// New piece in base orientation at the spawn anchor for this board's width
    pub fn spawn_on(kind: PieceKind, board: &Board) -> Self {
        Self::at(kind, spawn_column(board.width()), SPAWN_POSITION.1)
    }

    /// New piece in base orientation at an explicit anchor
    pub fn at(kind: PieceKind, x: i8, y: i8) -> Self {
        Self {
            kind,
            shape: Shape::base(kind),
            color: kind.color(),
            x,
            y,
        }
    }

    /// Same piece (kind, color and current shape) at a new anchor
    pub fn move_to(&self, x: i8, y: i8) -> Self {
        Self { x, y, ..*self }
    }

    /// Same piece rotated 90° clockwise around an unchanged anchor
    pub fn rotated_clockwise(&self) -> Self {
        Self {
            shape: self.shape.rotated_cw(),
            ..*self
        }
    }

    /// Absolute board coordinates of every filled cell
    ///
    /// Coordinates saturate at the `i8` limits; a saturated cell is always
    /// outside the board and so always reads as occupied.
    pub fn cells(&self) -> impl Iterator<Item = (i8, i8)> + '_ {
        self.shape
            .filled_offsets()
            .into_iter()
            .map(move |(dx, dy)| (self.x.saturating_add(dx), self.y.saturating_add(dy)))
    }
}

/// Spawn column for a board width: `width / 2 - 1` (4 on the standard board)
pub fn spawn_column(width: u8) -> i8 {
    (width / 2) as i8 - 1
}

/// Check the base shape table: every kind has exactly four cells and fits
/// horizontally at the spawn column of a board `width` wide.
pub fn validate_piece_table(width: u8) -> Result<(), ConfigError> {
    let x = spawn_column(width);
    for kind in PieceKind::ALL {
        let shape = Shape::base(kind);
        let cells = shape.filled_offsets().len();
        if cells != 4 {
            return Err(ConfigError::MalformedShape { kind, cells });
        }
        if x < 0 || x as i16 + shape.cols() as i16 > width as i16 {
            return Err(ConfigError::SpawnOutOfBounds { kind, x });
        }
    }
    Ok(())
}

const _: () = assert!((BOARD_WIDTH / 2) as i8 - 1 == SPAWN_POSITION.0);
