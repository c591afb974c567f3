use serde::{Deserialize, Serialize};

use crate::pieces::Piece;
use crate::types::{Cell, Color, GameStatus};

/// Owned, read-only view of a session at one point in time
///
/// Every field is copied out of the engine; holding a snapshot never
/// observes later mutations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub width: u8,
    pub height: u8,
    pub buffer_height: u8,
    /// Row-major cells including buffer rows
    pub cells: Vec<Cell>,
    pub current: Option<Piece>,
    pub shadow: Option<Piece>,
    pub next_queue: Vec<Piece>,
    pub hold: Option<Piece>,
    pub can_hold: bool,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    pub elapsed_ms: u64,
    pub total_pieces: u32,
    pub status: GameStatus,
}

impl GameSnapshot {
    pub fn visible_height(&self) -> u8 {
        self.height - self.buffer_height
    }

    pub fn color_at(&self, x: i8, y: i8) -> Option<Color> {
        if x < 0 || x >= self.width as i8 || y < 0 || y >= self.height as i8 {
            return None;
        }
        self.cells[y as usize * self.width as usize + x as usize]
    }

    /// Same rule as the board: outside the grid counts as occupied
    pub fn is_occupied(&self, x: i8, y: i8) -> bool {
        if x < 0 || x >= self.width as i8 || y < 0 || y >= self.height as i8 {
            return true;
        }
        self.color_at(x, y).is_some()
    }

    /// Rows of the visible field, top to bottom
    pub fn visible_rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells
            .chunks(self.width as usize)
            .skip(self.buffer_height as usize)
    }

    /// Elapsed play time as `MM:SS`
    pub fn formatted_time(&self) -> String {
        let seconds = self.elapsed_ms / 1000;
        format!("{:02}:{:02}", seconds / 60, seconds % 60)
    }

    /// Pieces per second, 0 during the first second of play
    pub fn pieces_per_second(&self) -> f64 {
        let seconds = self.elapsed_ms as f64 / 1000.0;
        if seconds < 1.0 {
            return 0.0;
        }
        self.total_pieces as f64 / seconds
    }

    pub fn playable(&self) -> bool {
        self.status == GameStatus::Playing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank() -> GameSnapshot {
        GameSnapshot {
            width: 4,
            height: 3,
            buffer_height: 1,
            cells: vec![None; 12],
            current: None,
            shadow: None,
            next_queue: Vec::new(),
            hold: None,
            can_hold: true,
            score: 0,
            level: 1,
            lines: 0,
            elapsed_ms: 0,
            total_pieces: 0,
            status: GameStatus::NotStarted,
        }
    }

    #[test]
    fn formatted_time_pads_minutes_and_seconds() {
        let mut s = blank();
        s.elapsed_ms = 65_400;
        assert_eq!(s.formatted_time(), "01:05");
        s.elapsed_ms = 0;
        assert_eq!(s.formatted_time(), "00:00");
    }

    #[test]
    fn pieces_per_second_needs_a_full_second() {
        let mut s = blank();
        s.total_pieces = 3;
        s.elapsed_ms = 900;
        assert_eq!(s.pieces_per_second(), 0.0);
        s.elapsed_ms = 2_000;
        assert_eq!(s.pieces_per_second(), 1.5);
    }

    #[test]
    fn visible_rows_skip_buffer() {
        let mut s = blank();
        s.cells[4] = Some(Color::RED);
        let rows: Vec<_> = s.visible_rows().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][0], Some(Color::RED));
        assert!(s.is_occupied(0, 1));
        assert!(s.is_occupied(-1, 0));
        assert!(!s.is_occupied(1, 1));
    }
}
