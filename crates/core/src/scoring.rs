//! Scoring module - classic line-clear scoring and level speed table
//!
//! - Line clears: 40 / 100 / 300 / 1200 points for 1-4 lines, times the level
//! - Soft drop: 1 point per row
//! - Hard drop: 2 points per row
//! - Level: one level per 10 lines, starting at 1
//!
//! Inputs are signed so callers can pass raw deltas; negative values score 0.

use crate::types::{
    HARD_DROP_POINTS_PER_CELL, LEVEL_SPEEDS_MS, LINES_PER_LEVEL, LINE_SCORES,
    SOFT_DROP_POINTS_PER_CELL,
};

/// Calculate line clear score
/// lines: number of lines cleared (1-4 score, anything else is 0)
/// level: current level (1-based multiplier)
pub fn calculate_lines_cleared(lines: i32, level: u32) -> u32 {
    if !(1..=4).contains(&lines) {
        return 0;
    }
    LINE_SCORES[lines as usize].saturating_mul(level)
}

/// Soft drop score: +1 per cell
pub fn calculate_soft_drop(cells: i32) -> u32 {
    (cells.max(0) as u32).saturating_mul(SOFT_DROP_POINTS_PER_CELL)
}

/// Hard drop score: +2 per cell
pub fn calculate_hard_drop(cells: i32) -> u32 {
    (cells.max(0) as u32).saturating_mul(HARD_DROP_POINTS_PER_CELL)
}

/// Level management
/// Level increases every 10 lines cleared, starting at 1
pub fn calculate_level(total_lines: u32) -> u32 {
    total_lines / LINES_PER_LEVEL + 1
}

/// Whether going from `old_lines` to `new_lines` crosses a level boundary
pub fn leveled_up(old_lines: u32, new_lines: u32) -> bool {
    calculate_level(new_lines) > calculate_level(old_lines)
}

/// Get gravity interval for a level (in milliseconds)
///
/// Levels below 1 use the level 1 speed; levels past the table use the
/// last entry.
pub fn get_speed_for_level(level: i32) -> u32 {
    let idx = (level.max(1) as usize - 1).min(LEVEL_SPEEDS_MS.len() - 1);
    LEVEL_SPEEDS_MS[idx]
}
