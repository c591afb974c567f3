//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are plain data with no behavior beyond parsing and lookup, making
//! them usable in any context (rules engine, drivers, persistence, display).
//!
//! # Board Dimensions
//!
//! Standard playfield dimensions:
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Visible height**: 20 rows
//! - **Buffer height**: 2 hidden rows above the visible field (spawn headroom)
//! - **Spawn position**: (4, 0), top-left of the piece matrix
//!
//! Row 0 is the top buffer row; rows `BUFFER_HEIGHT..BUFFER_HEIGHT + VISIBLE_HEIGHT`
//! are the visible field.
//!
//! # Drop Speed by Level
//!
//! Gravity interval in milliseconds per row, level 1 first:
//!
//! | Level | Interval |
//! |-------|----------|
//! | 1 | 500ms |
//! | 2 | 475ms |
//! | ... | -25ms per level |
//! | 19 | 50ms |
//! | 20+ | 30ms |
//!
//! # Examples
//!
//! ```
//! use blockfall_types::{GameAction, PieceKind, BOARD_WIDTH, VISIBLE_HEIGHT};
//!
//! let piece = PieceKind::T;
//! let parsed = PieceKind::from_str("t").unwrap();
//! assert_eq!(piece, parsed);
//!
//! let action = GameAction::from_str("hardDrop").unwrap();
//! assert_eq!(action, GameAction::HardDrop);
//!
//! assert_eq!(BOARD_WIDTH, 10);
//! assert_eq!(VISIBLE_HEIGHT, 20);
//! ```

use serde::{Deserialize, Serialize};

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Visible board height in cells (20 rows)
pub const VISIBLE_HEIGHT: u8 = 20;

/// Hidden rows above the visible field
pub const BUFFER_HEIGHT: u8 = 2;

/// Number of upcoming pieces kept in the preview queue
pub const NEXT_QUEUE_LEN: usize = 3;

/// Spawn anchor on the standard board (top-left of the piece matrix)
pub const SPAWN_POSITION: (i8, i8) = (4, 0);

/// Lines needed to advance one level
pub const LINES_PER_LEVEL: u32 = 10;

/// Gravity interval per level in milliseconds.
///
/// Index 0 = level 1, index 19 = level 20 and beyond.
pub const LEVEL_SPEEDS_MS: [u32; 20] = [
    500, 475, 450, 425, 400, 375, 350, 325, 300, 275, 250, 225, 200, 175, 150, 125, 100, 75, 50,
    30,
];

/// Line clear base scores (multiplied by the current level)
///
/// - 1 line: 40 points
/// - 2 lines: 100 points
/// - 3 lines: 300 points
/// - 4 lines: 1200 points
pub const LINE_SCORES: [u32; 5] = [0, 40, 100, 300, 1200];

/// Points per row for a soft drop
pub const SOFT_DROP_POINTS_PER_CELL: u32 = 1;

/// Points per row for a hard drop
pub const HARD_DROP_POINTS_PER_CELL: u32 = 2;

/// Default display polling interval in milliseconds (~60 FPS)
pub const SNAPSHOT_INTERVAL_MS: u32 = 16;

/// An opaque RGB color tag carried by locked cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const CYAN: Color = Color::rgb(0, 255, 255);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
    pub const PURPLE: Color = Color::rgb(128, 0, 255);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const ORANGE: Color = Color::rgb(255, 165, 0);
}

/// The seven piece kinds
///
/// Each kind has a fixed base shape and color:
/// - **I**: Cyan, horizontal bar
/// - **O**: Yellow, 2x2 square
/// - **T**: Purple, T-shaped
/// - **S**: Green, S-shaped
/// - **Z**: Red, Z-shaped (mirror of S)
/// - **J**: Blue, J-shaped
/// - **L**: Orange, L-shaped (mirror of J)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    /// All kinds in declaration order
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Parse piece kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("O"), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_str("unknown"), None);
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "o" => Some(PieceKind::O),
            "t" => Some(PieceKind::T),
            "s" => Some(PieceKind::S),
            "z" => Some(PieceKind::Z),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "i",
            PieceKind::O => "o",
            PieceKind::T => "t",
            PieceKind::S => "s",
            PieceKind::Z => "z",
            PieceKind::J => "j",
            PieceKind::L => "l",
        }
    }

    /// The kind's fixed display color
    pub fn color(&self) -> Color {
        match self {
            PieceKind::I => Color::CYAN,
            PieceKind::O => Color::YELLOW,
            PieceKind::T => Color::PURPLE,
            PieceKind::S => Color::GREEN,
            PieceKind::Z => Color::RED,
            PieceKind::J => Color::BLUE,
            PieceKind::L => Color::ORANGE,
        }
    }
}

/// Session lifecycle status
///
/// `NotStarted -> Playing <-> Paused`, `Playing -> GameOver`.
/// `GameOver` is terminal until a new game is started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    NotStarted,
    Playing,
    Paused,
    GameOver,
}

impl GameStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameStatus::NotStarted => "notStarted",
            GameStatus::Playing => "playing",
            GameStatus::Paused => "paused",
            GameStatus::GameOver => "gameOver",
        }
    }
}

/// Commands accepted by the engine
///
/// These are used by both the autoplay driver and any external input layer.
/// Each command maps to one engine operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameAction {
    /// Start (or restart) a game
    Start,
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Drop piece one cell down (with soft drop scoring), lock if blocked
    SoftDrop,
    /// Instantly drop piece to lowest valid position and lock
    HardDrop,
    /// Rotate piece 90° clockwise
    Rotate,
    /// Hold current piece (once per spawn)
    Hold,
    /// Toggle pause state
    Pause,
    /// Gravity tick: move down one row or lock
    Tick,
}

impl GameAction {
    /// Parse action from string (case-insensitive camelCase)
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_types::GameAction;
    ///
    /// assert_eq!(GameAction::from_str("moveLeft"), Some(GameAction::MoveLeft));
    /// assert_eq!(GameAction::from_str("rotate"), Some(GameAction::Rotate));
    /// assert_eq!(GameAction::from_str("unknown"), None);
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "start" => Some(GameAction::Start),
            "moveleft" => Some(GameAction::MoveLeft),
            "moveright" => Some(GameAction::MoveRight),
            "softdrop" => Some(GameAction::SoftDrop),
            "harddrop" => Some(GameAction::HardDrop),
            "rotate" => Some(GameAction::Rotate),
            "hold" => Some(GameAction::Hold),
            "pause" => Some(GameAction::Pause),
            "tick" => Some(GameAction::Tick),
            _ => None,
        }
    }

    /// Convert to camelCase string
    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::Start => "start",
            GameAction::MoveLeft => "moveLeft",
            GameAction::MoveRight => "moveRight",
            GameAction::SoftDrop => "softDrop",
            GameAction::HardDrop => "hardDrop",
            GameAction::Rotate => "rotate",
            GameAction::Hold => "hold",
            GameAction::Pause => "pause",
            GameAction::Tick => "tick",
        }
    }
}

/// A cell on the game board
///
/// - `None`: Empty cell
/// - `Some(Color)`: Locked block with its color tag
pub type Cell = Option<Color>;
