//! Collision rules - pure placement checks against the board
//!
//! None of these functions mutate anything. Out-of-bounds cells read as
//! occupied (see [`Board::is_occupied`]), so walls and floor need no special
//! casing here.

use crate::board::Board;
use crate::pieces::{Piece, Shape};

/// Whether every filled cell of `shape` anchored at (x, y) lands on a free cell
pub fn can_place(shape: &Shape, x: i8, y: i8, board: &Board) -> bool {
    shape
        .filled_offsets()
        .iter()
        .all(|&(dx, dy)| !board.is_occupied(x.saturating_add(dx), y.saturating_add(dy)))
}

/// Lowest row the piece can reach by falling straight down from its current row
///
/// Terminates because the floor is always occupied.
pub fn hard_drop_row(piece: &Piece, board: &Board) -> i8 {
    let mut row = piece.y;
    while let Some(next) = row.checked_add(1) {
        if !can_place(&piece.shape, piece.x, next, board) {
            break;
        }
        row = next;
    }
    row
}

/// Game-over check for a freshly spawned piece
///
/// Only overlaps inside the visible field count: a filled cell at
/// `y >= buffer_height` sitting on an occupied cell ends the game, while an
/// overlap confined to the buffer rows does not.
pub fn is_spawn_blocked(piece: &Piece, board: &Board) -> bool {
    let first_visible = board.buffer_height() as i8;
    piece
        .cells()
        .any(|(x, y)| y >= first_visible && board.is_occupied(x, y))
}
