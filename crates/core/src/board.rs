//! Board module - manages the game grid
//!
//! The board is a `width x (visible_height + buffer_height)` grid where each cell
//! is either empty or carries the color of a locked block. Storage is a flat
//! row-major array for cache locality.
//!
//! Coordinates: (x, y) where x ranges 0..width (left to right) and y ranges
//! 0..height (top to bottom). Rows `0..buffer_height` are hidden spawn headroom.
//! Every coordinate outside the grid reads as occupied, which turns the side
//! walls and the floor into obstacles for the generic collision test.

use crate::config::GameConfig;
use crate::error::ConfigError;
use crate::types::{Cell, Color, BOARD_WIDTH, BUFFER_HEIGHT, VISIBLE_HEIGHT};

/// The game board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: u8,
    visible_height: u8,
    buffer_height: u8,
    /// Flat array of cells, row-major order (y * width + x)
    cells: Vec<Cell>,
}

impl Board {
    /// Create a new empty standard board (10 x (20 + 2))
    pub fn new() -> Self {
        Self::empty(BOARD_WIDTH, VISIBLE_HEIGHT, BUFFER_HEIGHT)
    }

    /// Create an empty board with custom dimensions
    pub fn with_dimensions(
        width: u8,
        visible_height: u8,
        buffer_height: u8,
    ) -> Result<Self, ConfigError> {
        GameConfig {
            width,
            visible_height,
            buffer_height,
            seed: 1,
        }
        .validate()?;
        Ok(Self::empty(width, visible_height, buffer_height))
    }

    fn empty(width: u8, visible_height: u8, buffer_height: u8) -> Self {
        let height = visible_height as usize + buffer_height as usize;
        Self {
            width,
            visible_height,
            buffer_height,
            cells: vec![None; width as usize * height],
        }
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(&self, x: i8, y: i8) -> Option<usize> {
        if self.is_out_of_bounds(x, y) {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }

    /// Get width of the board
    pub fn width(&self) -> u8 {
        self.width
    }

    /// Total height including buffer rows
    pub fn height(&self) -> u8 {
        self.visible_height + self.buffer_height
    }

    pub fn visible_height(&self) -> u8 {
        self.visible_height
    }

    pub fn buffer_height(&self) -> u8 {
        self.buffer_height
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        self.index(x, y).map(|idx| self.cells[idx])
    }

    /// Store a block at (x, y)
    /// Returns false (and does nothing) if out of bounds
    pub fn set_cell(&mut self, x: i8, y: i8, color: Color) -> bool {
        match self.index(x, y) {
            Some(idx) => {
                self.cells[idx] = Some(color);
                true
            }
            None => false,
        }
    }

    /// Check if position is blocked: filled, or outside the grid
    pub fn is_occupied(&self, x: i8, y: i8) -> bool {
        !matches!(self.get(x, y), Some(None))
    }

    /// Check if position is out of bounds
    pub fn is_out_of_bounds(&self, x: i8, y: i8) -> bool {
        x < 0 || x >= self.width as i8 || y < 0 || y >= self.height() as i8
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        self.row(y)
            .map(|row| row.iter().all(|cell| cell.is_some()))
            .unwrap_or(false)
    }

    /// Cells of a single row, or None past the bottom
    pub fn row(&self, y: usize) -> Option<&[Cell]> {
        if y >= self.height() as usize {
            return None;
        }
        let width = self.width as usize;
        let start = y * width;
        Some(&self.cells[start..start + width])
    }

    /// Remove row `y`, shift every row above it down by one, empty the top row
    fn remove_row(&mut self, y: usize) {
        let width = self.width as usize;

        // copy_within handles the overlapping ranges
        for row in (1..=y).rev() {
            let src_start = (row - 1) * width;
            self.cells
                .copy_within(src_start..src_start + width, row * width);
        }

        for cell in &mut self.cells[..width] {
            *cell = None;
        }
    }

    /// Clear all full rows and return how many were removed
    ///
    /// Rows are scanned bottom to top. After a removal the same index is
    /// examined again, because the row that slid into it may be full too.
    /// This handles stacked and non-contiguous clears in one pass.
    pub fn clear_complete_lines(&mut self) -> u32 {
        let mut cleared = 0;
        let mut y = self.height() as usize;

        while y > 0 {
            let row = y - 1;
            if self.is_row_full(row) {
                self.remove_row(row);
                cleared += 1;
            } else {
                y -= 1;
            }
        }

        cleared
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = None;
        }
    }

    /// Fill a whole row (test helper)
    #[cfg(test)]
    pub(crate) fn fill_row(&mut self, y: i8, color: Color) {
        for x in 0..self.width as i8 {
            self.set_cell(x, y, color);
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
