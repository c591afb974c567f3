//! Core game logic - pure, deterministic, and testable
//!
//! This crate contains the game rules, state management and simulation logic
//! of a falling-block puzzle. It has no dependencies on rendering, input or
//! I/O, so the same engine runs behind a terminal, a GUI or a headless driver.
//!
//! # Module Structure
//!
//! - [`board`]: row-major grid with buffer rows and line clearing
//! - [`pieces`]: shape matrices, clockwise rotation, spawn placement
//! - [`collision`]: placement test, hard-drop projection, spawn-blocked check
//! - [`scoring`]: line/drop points, level progression, gravity speeds
//! - [`rng`]: seeded uniform piece generation
//! - [`clock`]: time source for pause-aware elapsed time
//! - [`events`]: listener registration and event values
//! - [`game_state`]: the engine state machine
//! - [`snapshot`]: owned read-only view for renderers
//! - [`config`] / [`error`]: board geometry and its validation errors
//!
//! # Game Rules
//!
//! - Pieces are drawn uniformly at random, with a three-piece preview queue
//! - Rotation is clockwise only, with no wall kicks
//! - Hold swaps the active piece once per spawn
//! - Scoring: 40/100/300/1200 x level, +1 per soft-drop row, +2 per hard-drop row
//! - Level rises every 10 lines; gravity speeds up from 500ms to 30ms
//!
//! # Example
//!
//! ```
//! use blockfall_core::GameState;
//! use blockfall_core::types::GameAction;
//!
//! let mut game = GameState::new(12345);
//! game.start_game();
//!
//! game.apply_action(GameAction::MoveRight);
//! game.apply_action(GameAction::Rotate);
//! game.apply_action(GameAction::HardDrop);
//!
//! // Hard drop awards points
//! assert!(game.score() > 0);
//! ```
//!
//! # Timing
//!
//! The engine does not own a timer. A driver calls
//! [`GameState::update`](game_state::GameState::update) every
//! [`drop_interval_ms`](game_state::GameState::drop_interval_ms) and reads
//! [`snapshot`](game_state::GameState::snapshot) to render.

pub mod board;
pub mod clock;
pub mod collision;
pub mod config;
pub mod error;
pub mod events;
pub mod game_state;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use blockfall_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use clock::{Clock, ManualClock, SystemClock};
pub use collision::{can_place, hard_drop_row, is_spawn_blocked};
pub use config::GameConfig;
pub use error::ConfigError;
pub use events::{EventRecorder, GameEvent, GameEventListener, ListenerId};
pub use game_state::GameState;
pub use pieces::{Piece, Shape};
pub use rng::{PieceGenerator, SimpleRng};
pub use snapshot::GameSnapshot;
