//! Engine event notifications.
//!
//! Listeners are called synchronously, in registration order, at the point
//! each event happens. A lock produces `line_cleared`, then `level_up` if the
//! level rose, then `piece_spawned` or `game_over` from the following spawn.
//!
//! Handlers receive plain values and have no access to the engine. They must
//! not try to reach it through shared state (for example a mutex the caller
//! already holds) and issue commands; re-entrant calls are unsupported.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::pieces::Piece;

/// Observer of engine events; every method defaults to a no-op
pub trait GameEventListener: Send {
    fn on_line_cleared(&mut self, _count: u32, _points: u32) {}

    fn on_level_up(&mut self, _new_level: u32) {}

    fn on_game_over(&mut self, _final_score: u32) {}

    fn on_piece_spawned(&mut self, _piece: &Piece) {}
}

/// Handle returned by `add_listener`, used to remove the listener again
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub(crate) u32);

/// An engine event as a value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    LineCleared { count: u32, points: u32 },
    LevelUp { level: u32 },
    GameOver { final_score: u32 },
    PieceSpawned { piece: Piece },
}

/// Listener that appends every event to a shared log
///
/// Clones share the same log, so one clone can be registered with the
/// engine while another is kept for inspection.
#[derive(Debug, Clone, Default)]
pub struct EventRecorder {
    events: Arc<Mutex<Vec<GameEvent>>>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, event: GameEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }

    /// Copy of everything recorded so far
    pub fn events(&self) -> Vec<GameEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Take and clear the recorded events
    pub fn drain(&self) -> Vec<GameEvent> {
        self.events
            .lock()
            .map(|mut events| std::mem::take(&mut *events))
            .unwrap_or_default()
    }
}

impl GameEventListener for EventRecorder {
    fn on_line_cleared(&mut self, count: u32, points: u32) {
        self.push(GameEvent::LineCleared { count, points });
    }

    fn on_level_up(&mut self, new_level: u32) {
        self.push(GameEvent::LevelUp { level: new_level });
    }

    fn on_game_over(&mut self, final_score: u32) {
        self.push(GameEvent::GameOver { final_score });
    }

    fn on_piece_spawned(&mut self, piece: &Piece) {
        self.push(GameEvent::PieceSpawned { piece: *piece });
    }
}

/// Registered listeners, in registration order
#[derive(Default)]
pub(crate) struct Listeners {
    entries: Vec<(ListenerId, Box<dyn GameEventListener>)>,
    next_id: u32,
}

impl Listeners {
    pub(crate) fn add(&mut self, listener: Box<dyn GameEventListener>) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.entries.push((id, listener));
        id
    }

    pub(crate) fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn emit(&mut self, event: &GameEvent) {
        for (_, listener) in &mut self.entries {
            match event {
                GameEvent::LineCleared { count, points } => {
                    listener.on_line_cleared(*count, *points)
                }
                GameEvent::LevelUp { level } => listener.on_level_up(*level),
                GameEvent::GameOver { final_score } => listener.on_game_over(*final_score),
                GameEvent::PieceSpawned { piece } => listener.on_piece_spawned(piece),
            }
        }
    }
}

impl std::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.entries.len())
            .finish()
    }
}
