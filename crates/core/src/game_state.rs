//! Game state module - the piece lifecycle state machine
//!
//! This module ties together the board, pieces, collision rules, RNG and
//! scoring. It owns the session state (active piece, preview queue, hold slot,
//! score/level/lines, status) and the pause-aware play clock, and notifies
//! registered listeners as events happen.
//!
//! Commands are fire-and-forget: anything that does not apply to the current
//! status (moving while paused, holding twice, ...) is silently ignored.

use arrayvec::ArrayVec;
use tracing::{debug, info};

use crate::board::Board;
use crate::clock::{Clock, SystemClock};
use crate::collision::{can_place, hard_drop_row, is_spawn_blocked};
use crate::config::GameConfig;
use crate::error::ConfigError;
use crate::events::{GameEvent, GameEventListener, ListenerId, Listeners};
use crate::pieces::{validate_piece_table, Piece};
use crate::rng::PieceGenerator;
use crate::scoring::{
    calculate_hard_drop, calculate_level, calculate_lines_cleared, calculate_soft_drop,
    get_speed_for_level,
};
use crate::snapshot::GameSnapshot;
use crate::types::{GameAction, GameStatus, NEXT_QUEUE_LEN};

/// Complete game state
pub struct GameState {
    config: GameConfig,
    board: Board,
    current: Option<Piece>,
    next_queue: ArrayVec<Piece, NEXT_QUEUE_LEN>,
    hold: Option<Piece>,
    /// Reset to true on every spawn, cleared by a hold
    can_hold: bool,
    score: u32,
    level: u32,
    total_lines: u32,
    total_pieces: u32,
    status: GameStatus,
    generator: PieceGenerator,
    clock: Box<dyn Clock>,
    game_start_ms: u64,
    pause_start_ms: u64,
    total_paused_ms: u64,
    game_over_ms: u64,
    listeners: Listeners,
}

impl GameState {
    /// Create a standard 10x20 game with the given RNG seed on the wall clock
    pub fn new(seed: u32) -> Self {
        Self::build(
            GameConfig::with_seed(seed),
            Board::new(),
            Box::new(SystemClock::new()),
        )
    }

    /// Create a game from an explicit configuration and clock
    pub fn with_config(
        config: GameConfig,
        clock: impl Clock + 'static,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        validate_piece_table(config.width)?;
        let board =
            Board::with_dimensions(config.width, config.visible_height, config.buffer_height)?;
        Ok(Self::build(config, board, Box::new(clock)))
    }

    fn build(config: GameConfig, board: Board, clock: Box<dyn Clock>) -> Self {
        let mut state = Self {
            config,
            board,
            current: None,
            next_queue: ArrayVec::new(),
            hold: None,
            can_hold: true,
            score: 0,
            level: 1,
            total_lines: 0,
            total_pieces: 0,
            status: GameStatus::NotStarted,
            generator: PieceGenerator::new(config.seed),
            clock,
            game_start_ms: 0,
            pause_start_ms: 0,
            total_paused_ms: 0,
            game_over_ms: 0,
            listeners: Listeners::default(),
        };
        state.refill_queue();
        state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lines(&self) -> u32 {
        self.total_lines
    }

    pub fn total_pieces(&self) -> u32 {
        self.total_pieces
    }

    pub fn can_hold(&self) -> bool {
        self.can_hold
    }

    pub fn current(&self) -> Option<Piece> {
        self.current
    }

    pub fn hold_piece(&self) -> Option<Piece> {
        self.hold
    }

    pub fn next_queue(&self) -> &[Piece] {
        &self.next_queue
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Final score once the game is over
    pub fn final_score(&self) -> Option<u32> {
        (self.status == GameStatus::GameOver).then_some(self.score)
    }

    /// Gravity interval for the current level
    pub fn drop_interval_ms(&self) -> u32 {
        get_speed_for_level(self.level as i32)
    }

    /// Play time in milliseconds, excluding paused intervals
    ///
    /// Frozen while paused and once the game is over.
    pub fn elapsed_ms(&self) -> u64 {
        let end = match self.status {
            GameStatus::NotStarted => return 0,
            GameStatus::Paused => self.pause_start_ms,
            GameStatus::GameOver => self.game_over_ms,
            GameStatus::Playing => self.clock.now_ms(),
        };
        end.saturating_sub(self.game_start_ms)
            .saturating_sub(self.total_paused_ms)
    }

    /// Register a listener; it is called synchronously and must not re-enter
    /// the engine
    pub fn add_listener(&mut self, listener: impl GameEventListener + 'static) -> ListenerId {
        self.listeners.add(Box::new(listener))
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    /// Start (or restart) a game and spawn the first piece
    pub fn start_game(&mut self) {
        self.board.clear();
        self.current = None;
        self.hold = None;
        self.score = 0;
        self.level = 1;
        self.total_lines = 0;
        self.total_pieces = 0;
        self.game_start_ms = self.clock.now_ms();
        self.pause_start_ms = 0;
        self.total_paused_ms = 0;
        self.game_over_ms = 0;
        self.status = GameStatus::Playing;
        info!(seed = self.config.seed, "game started");

        self.spawn_next();
    }

    fn fresh_piece(&mut self) -> Piece {
        let kind = self.generator.next_kind();
        Piece::spawn_on(kind, &self.board)
    }

    fn refill_queue(&mut self) {
        while !self.next_queue.is_full() {
            let piece = self.fresh_piece();
            self.next_queue.push(piece);
        }
    }

    /// Promote the queue head to the active piece and top the queue back up
    fn spawn_next(&mut self) {
        let piece = match self.next_queue.pop_at(0) {
            Some(piece) => piece,
            None => self.fresh_piece(),
        };
        self.refill_queue();

        self.current = Some(piece);
        self.can_hold = true;
        self.total_pieces = self.total_pieces.wrapping_add(1);

        if is_spawn_blocked(&piece, &self.board) {
            self.end_game("spawn blocked");
            return;
        }

        debug!(kind = piece.kind.as_str(), total = self.total_pieces, "piece spawned");
        self.listeners
            .emit(&GameEvent::PieceSpawned { piece });
    }

    fn end_game(&mut self, reason: &str) {
        self.status = GameStatus::GameOver;
        self.game_over_ms = self.clock.now_ms();
        info!(score = self.score, lines = self.total_lines, reason, "game over");
        self.listeners.emit(&GameEvent::GameOver {
            final_score: self.score,
        });
    }

    fn is_playing(&self) -> bool {
        self.status == GameStatus::Playing
    }

    /// Try to move the active piece
    fn try_move(&mut self, dx: i8, dy: i8) -> bool {
        let Some(piece) = self.current else {
            return false;
        };

        let (x, y) = (piece.x + dx, piece.y + dy);
        if can_place(&piece.shape, x, y, &self.board) {
            self.current = Some(piece.move_to(x, y));
            return true;
        }

        false
    }

    pub fn move_left(&mut self) {
        if self.is_playing() {
            self.try_move(-1, 0);
        }
    }

    pub fn move_right(&mut self) {
        if self.is_playing() {
            self.try_move(1, 0);
        }
    }

    /// Move down one row for 1 point, or lock if the piece cannot descend
    pub fn soft_drop(&mut self) {
        if !self.is_playing() {
            return;
        }
        if self.try_move(0, 1) {
            self.score = self.score.saturating_add(calculate_soft_drop(1));
        } else {
            self.lock_piece();
        }
    }

    /// Gravity tick: move down one row, or lock if the piece cannot descend
    pub fn update(&mut self) {
        if !self.is_playing() {
            return;
        }
        if !self.try_move(0, 1) {
            self.lock_piece();
        }
    }

    /// Drop to the lowest reachable row for 2 points per row, then lock
    pub fn hard_drop(&mut self) {
        if !self.is_playing() {
            return;
        }
        let Some(piece) = self.current else {
            return;
        };

        let row = hard_drop_row(&piece, &self.board);
        let distance = i32::from(row) - i32::from(piece.y);
        self.current = Some(piece.move_to(piece.x, row));
        self.score = self.score.saturating_add(calculate_hard_drop(distance));

        self.lock_piece();
    }

    /// Rotate clockwise in place; a colliding rotation is discarded
    pub fn rotate(&mut self) {
        if !self.is_playing() {
            return;
        }
        let Some(piece) = self.current else {
            return;
        };

        let rotated = piece.rotated_clockwise();
        if can_place(&rotated.shape, rotated.x, rotated.y, &self.board) {
            self.current = Some(rotated);
        }
    }

    /// Swap the active piece with the hold slot (once per spawn)
    ///
    /// With an empty slot the next queued piece is spawned instead. A piece
    /// coming back out of hold is rebuilt from its kind: spawn shape, spawn
    /// position, any rotation discarded.
    pub fn hold(&mut self) {
        if !self.is_playing() || !self.can_hold {
            return;
        }
        let Some(piece) = self.current else {
            return;
        };

        match self.hold.replace(piece) {
            Some(held) => {
                self.current = Some(Piece::spawn_on(held.kind, &self.board));
            }
            None => self.spawn_next(),
        }

        self.can_hold = false;
    }

    /// Toggle between Playing and Paused; ignored in any other status
    pub fn pause(&mut self) {
        match self.status {
            GameStatus::Playing => {
                self.status = GameStatus::Paused;
                self.pause_start_ms = self.clock.now_ms();
                debug!("paused");
            }
            GameStatus::Paused => {
                let paused_for = self.clock.now_ms().saturating_sub(self.pause_start_ms);
                self.total_paused_ms = self.total_paused_ms.saturating_add(paused_for);
                self.status = GameStatus::Playing;
                debug!(paused_for, "resumed");
            }
            GameStatus::NotStarted | GameStatus::GameOver => {}
        }
    }

    /// Lock the active piece onto the board, clear lines, score, spawn next
    ///
    /// A piece that locks with every cell above the visible field ends the
    /// game instead of spawning another piece.
    fn lock_piece(&mut self) {
        let Some(piece) = self.current.take() else {
            return;
        };

        let first_visible = self.board.buffer_height() as i8;
        let mut locked_out = true;
        for (x, y) in piece.cells() {
            if y >= 0 {
                self.board.set_cell(x, y, piece.color);
            }
            if y >= first_visible {
                locked_out = false;
            }
        }

        let cleared = self.board.clear_complete_lines();
        let mut points = 0;
        let mut new_level = self.level;
        if cleared > 0 {
            self.total_lines = self.total_lines.saturating_add(cleared);
            // Scored at the level the clear happened on
            points = calculate_lines_cleared(cleared as i32, self.level);
            self.score = self.score.saturating_add(points);
            new_level = calculate_level(self.total_lines);
            debug!(cleared, points, total = self.total_lines, "lines cleared");
        }

        self.listeners.emit(&GameEvent::LineCleared {
            count: cleared,
            points,
        });

        if new_level > self.level {
            self.level = new_level;
            info!(level = self.level, "level up");
            self.listeners
                .emit(&GameEvent::LevelUp { level: self.level });
        }

        if locked_out {
            self.end_game("locked out above visible field");
            return;
        }

        self.spawn_next();
    }

    /// Apply a command
    pub fn apply_action(&mut self, action: GameAction) {
        match action {
            GameAction::Start => self.start_game(),
            GameAction::MoveLeft => self.move_left(),
            GameAction::MoveRight => self.move_right(),
            GameAction::SoftDrop => self.soft_drop(),
            GameAction::HardDrop => self.hard_drop(),
            GameAction::Rotate => self.rotate(),
            GameAction::Hold => self.hold(),
            GameAction::Pause => self.pause(),
            GameAction::Tick => self.update(),
        }
    }

    /// Owned copy of the current state, including the shadow piece
    pub fn snapshot(&self) -> GameSnapshot {
        let shadow = self
            .current
            .map(|piece| piece.move_to(piece.x, hard_drop_row(&piece, &self.board)));

        GameSnapshot {
            width: self.board.width(),
            height: self.board.height(),
            buffer_height: self.board.buffer_height(),
            cells: self.board.cells().to_vec(),
            current: self.current,
            shadow,
            next_queue: self.next_queue.to_vec(),
            hold: self.hold,
            can_hold: self.can_hold,
            score: self.score,
            level: self.level,
            lines: self.total_lines,
            elapsed_ms: self.elapsed_ms(),
            total_pieces: self.total_pieces,
            status: self.status,
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(1)
    }
}

impl std::fmt::Debug for GameState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameState")
            .field("status", &self.status)
            .field("current", &self.current)
            .field("next_queue", &self.next_queue)
            .field("hold", &self.hold)
            .field("can_hold", &self.can_hold)
            .field("score", &self.score)
            .field("level", &self.level)
            .field("lines", &self.total_lines)
            .field("total_pieces", &self.total_pieces)
            .field("listeners", &self.listeners)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::events::EventRecorder;
    use crate::pieces::Shape;
    use crate::types::{Color, PieceKind};

    fn manual_game(seed: u32) -> (GameState, ManualClock) {
        let clock = ManualClock::new();
        let state = GameState::with_config(GameConfig::with_seed(seed), clock.clone()).unwrap();
        (state, clock)
    }

    /// Fill row `y` except columns `gap_start..gap_start + gap_len`
    fn fill_row_with_gap(board: &mut Board, y: i8, gap_start: i8, gap_len: i8) {
        for x in 0..board.width() as i8 {
            if x < gap_start || x >= gap_start + gap_len {
                board.set_cell(x, y, Color::RED);
            }
        }
    }

    #[test]
    fn test_new_game_state() {
        let state = GameState::new(12345);

        assert_eq!(state.status, GameStatus::NotStarted);
        assert_eq!(state.score, 0);
        assert_eq!(state.level, 1);
        assert_eq!(state.total_lines, 0);
        assert!(state.current.is_none());
        assert!(state.hold.is_none());
        assert_eq!(state.next_queue.len(), NEXT_QUEUE_LEN);
        assert_eq!(state.elapsed_ms(), 0);
    }

    #[test]
    fn test_commands_ignored_before_start() {
        let mut state = GameState::new(12345);
        state.move_left();
        state.hard_drop();
        state.hold();
        state.pause();
        state.update();
        assert_eq!(state.status, GameStatus::NotStarted);
        assert_eq!(state.total_pieces, 0);
        assert!(state.board.cells().iter().all(|c| c.is_none()));
    }

    #[test]
    fn test_start_spawns_queue_head() {
        let mut state = GameState::new(12345);
        let head = state.next_queue[0];

        state.start_game();

        assert_eq!(state.status, GameStatus::Playing);
        assert_eq!(state.current, Some(head));
        assert_eq!(state.total_pieces, 1);
        assert!(state.can_hold);
        assert_eq!(state.next_queue.len(), NEXT_QUEUE_LEN);
    }

    #[test]
    fn test_spawn_advances_queue_fifo() {
        let mut state = GameState::new(7);
        state.start_game();
        let queued: Vec<PieceKind> = state.next_queue.iter().map(|p| p.kind).collect();

        for expected in queued {
            state.hard_drop();
            assert_eq!(state.current.unwrap().kind, expected);
        }
    }

    #[test]
    fn test_move_and_rotate_keep_rotated_shape() {
        let mut state = GameState::new(3);
        state.start_game();
        state.current = Some(Piece::spawn(PieceKind::T));

        state.rotate();
        let rotated = state.current.unwrap().shape;
        assert_eq!(rotated, Shape::base(PieceKind::T).rotated_cw());

        state.move_left();
        state.soft_drop();
        assert_eq!(state.current.unwrap().shape, rotated);
        assert_eq!(state.score, 1);
    }

    #[test]
    fn test_blocked_rotation_is_discarded() {
        let mut state = GameState::new(3);
        state.start_game();
        // Horizontal I resting on the floor cannot turn vertical in place
        state.current = Some(Piece::at(PieceKind::I, 3, 21));

        state.rotate();

        let piece = state.current.unwrap();
        assert_eq!(piece.shape, Shape::base(PieceKind::I));
        assert_eq!((piece.x, piece.y), (3, 21));
    }

    #[test]
    fn test_soft_drop_locks_when_blocked() {
        let mut state = GameState::new(3);
        state.start_game();
        state.current = Some(Piece::at(PieceKind::O, 0, 20));

        state.soft_drop();

        assert_eq!(state.board.get(0, 21), Some(Some(Color::YELLOW)));
        assert_eq!(state.total_pieces, 2);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_hard_drop_single_line_clear() {
        let mut state = GameState::new(5);
        let recorder = EventRecorder::new();
        state.add_listener(recorder.clone());
        state.start_game();
        recorder.drain();

        fill_row_with_gap(&mut state.board, 21, 4, 4);
        state.current = Some(Piece::spawn(PieceKind::I));
        state.hard_drop();

        // 21 rows at 2 points, plus a single at level 1
        assert_eq!(state.score, 42 + 40);
        assert_eq!(state.total_lines, 1);
        assert!(state.board.cells().iter().all(|c| c.is_none()));

        let events = recorder.events();
        assert_eq!(events[0], GameEvent::LineCleared { count: 1, points: 40 });
        assert!(matches!(events[1], GameEvent::PieceSpawned { .. }));
    }

    #[test]
    fn test_level_up_scores_at_previous_level() {
        let mut state = GameState::new(5);
        let recorder = EventRecorder::new();
        state.add_listener(recorder.clone());
        state.start_game();
        state.total_lines = 9;
        recorder.drain();

        fill_row_with_gap(&mut state.board, 21, 4, 4);
        state.current = Some(Piece::at(PieceKind::I, 4, 21));
        state.hard_drop();

        assert_eq!(state.level, 2);
        assert_eq!(state.total_lines, 10);
        assert_eq!(state.score, 40);
        assert_eq!(state.drop_interval_ms(), 475);

        let events = recorder.events();
        assert_eq!(events[0], GameEvent::LineCleared { count: 1, points: 40 });
        assert_eq!(events[1], GameEvent::LevelUp { level: 2 });
        assert!(matches!(events[2], GameEvent::PieceSpawned { .. }));
    }

    #[test]
    fn test_lock_without_clear_still_notifies() {
        let mut state = GameState::new(5);
        let recorder = EventRecorder::new();
        state.add_listener(recorder.clone());
        state.start_game();
        recorder.drain();

        state.hard_drop();

        let events = recorder.events();
        assert_eq!(events[0], GameEvent::LineCleared { count: 0, points: 0 });
        assert!(matches!(events[1], GameEvent::PieceSpawned { .. }));
    }

    #[test]
    fn test_hold_with_empty_slot_spawns_next() {
        let mut state = GameState::new(12345);
        state.start_game();

        let initial = state.current.unwrap();
        let next = state.next_queue[0];

        state.hold();

        assert_eq!(state.hold, Some(initial));
        assert_eq!(state.current, Some(next));
        assert_eq!(state.total_pieces, 2);
        assert!(!state.can_hold);
    }

    #[test]
    fn test_hold_once_per_spawn() {
        let mut state = GameState::new(12345);
        state.start_game();

        state.hold();
        let active = state.current;
        state.hold();
        assert_eq!(state.current, active);

        state.hard_drop();
        assert!(state.can_hold);
    }

    #[test]
    fn test_hold_swap_discards_rotation() {
        let mut state = GameState::new(12345);
        state.start_game();
        state.current = Some(Piece::spawn(PieceKind::L));
        state.rotate();
        state.move_right();
        state.hold();
        state.hard_drop();

        let before = state.total_pieces;
        state.hold();

        let back = state.current.unwrap();
        assert_eq!(back.kind, PieceKind::L);
        assert_eq!(back.shape, Shape::base(PieceKind::L));
        assert_eq!((back.x, back.y), (4, 0));
        assert_eq!(state.total_pieces, before);
        assert!(!state.can_hold);
    }

    #[test]
    fn test_spawn_blocked_in_visible_rows_ends_game() {
        let clock = ManualClock::new();
        let config = GameConfig {
            buffer_height: 0,
            ..GameConfig::with_seed(9)
        };
        let mut state = GameState::with_config(config, clock).unwrap();
        let recorder = EventRecorder::new();
        state.add_listener(recorder.clone());
        state.start_game();

        for x in 3..=7 {
            state.board.set_cell(x, 0, Color::RED);
            state.board.set_cell(x, 1, Color::RED);
        }
        state.spawn_next();

        assert_eq!(state.status, GameStatus::GameOver);
        assert_eq!(state.final_score(), Some(0));
        assert_eq!(
            recorder.events().last(),
            Some(&GameEvent::GameOver { final_score: 0 })
        );

        // Terminal: nothing moves any more
        let current = state.current;
        state.move_left();
        state.update();
        assert_eq!(state.current, current);
    }

    #[test]
    fn test_lock_out_above_visible_field_ends_game() {
        let mut state = GameState::new(11);
        state.start_game();
        // First visible row blocked everywhere except column 0
        fill_row_with_gap(&mut state.board, 2, 0, 1);

        let before = state.total_pieces;
        state.update();
        state.update();

        assert_eq!(state.status, GameStatus::GameOver);
        assert_eq!(state.total_pieces, before);
        assert!(state.current.is_none());
    }

    #[test]
    fn test_pause_excludes_paused_time() {
        let (mut state, clock) = manual_game(1);
        clock.set(10_000);
        state.start_game();

        clock.advance(1_000);
        assert_eq!(state.elapsed_ms(), 1_000);

        state.pause();
        assert_eq!(state.status, GameStatus::Paused);
        clock.advance(5_000);
        assert_eq!(state.elapsed_ms(), 1_000);

        let y = state.current.unwrap().y;
        state.update();
        state.soft_drop();
        assert_eq!(state.current.unwrap().y, y);

        state.pause();
        assert_eq!(state.status, GameStatus::Playing);
        clock.advance(500);
        assert_eq!(state.elapsed_ms(), 1_500);
    }

    #[test]
    fn test_elapsed_freezes_at_game_over() {
        let (mut state, clock) = manual_game(11);
        state.start_game();
        fill_row_with_gap(&mut state.board, 2, 0, 1);
        clock.advance(2_000);
        state.update();
        state.update();
        assert_eq!(state.status, GameStatus::GameOver);

        clock.advance(10_000);
        assert_eq!(state.elapsed_ms(), 2_000);
    }

    #[test]
    fn test_restart_resets_session() {
        let mut state = GameState::new(12345);
        state.start_game();
        state.hold();
        for _ in 0..5 {
            state.hard_drop();
        }

        state.apply_action(GameAction::Start);

        assert_eq!(state.status, GameStatus::Playing);
        assert_eq!(state.score, 0);
        assert_eq!(state.level, 1);
        assert_eq!(state.total_lines, 0);
        assert_eq!(state.total_pieces, 1);
        assert!(state.hold.is_none());
        assert!(state.can_hold);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut state = GameState::new(12345);
        state.start_game();
        let snap = state.snapshot();

        state.hard_drop();

        assert_eq!(snap.total_pieces, 1);
        assert!(snap.cells.iter().all(|c| c.is_none()));
        assert_ne!(state.snapshot().cells, snap.cells);
    }

    #[test]
    fn test_snapshot_shadow_projects_current() {
        let mut state = GameState::new(12345);
        state.start_game();
        state.current = Some(Piece::spawn(PieceKind::O));

        let snap = state.snapshot();
        let shadow = snap.shadow.unwrap();
        assert_eq!(shadow.x, 4);
        assert_eq!(shadow.y, 20);
        assert_eq!(shadow.shape, snap.current.unwrap().shape);
        assert_eq!(snap.next_queue.len(), NEXT_QUEUE_LEN);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = GameConfig {
            width: 0,
            ..GameConfig::default()
        };
        assert!(GameState::with_config(config, ManualClock::new()).is_err());
    }
}
