//! Tokio drivers around a shared engine.
//!
//! The engine has no timer of its own. [`run_gravity`] ticks it at the
//! current level's speed and [`run_polling`] samples snapshots at a fixed
//! display rate. Both run until the game is over or the shutdown channel
//! changes (or its sender is dropped).

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Mutex};
use tokio::time::{self, MissedTickBehavior};
use tracing::debug;

use crate::core::{GameSnapshot, GameState};
use crate::store::HighScoreStore;
use crate::types::GameStatus;

/// Engine shared between drivers
pub type SharedGame = Arc<Mutex<GameState>>;

pub fn shared(game: GameState) -> SharedGame {
    Arc::new(Mutex::new(game))
}

/// Shutdown sender plus a receiver to clone into each driver
pub fn shutdown_channel() -> (watch::Sender<bool>, watch::Receiver<bool>) {
    watch::channel(false)
}

/// Gravity loop: sleep for the level's drop interval, then `update()`
///
/// The interval is re-read before every sleep so a level-up applies on the
/// next tick. Returns the number of ticks delivered.
pub async fn run_gravity(game: SharedGame, mut shutdown: watch::Receiver<bool>) -> u64 {
    let mut ticks = 0u64;

    loop {
        if *shutdown.borrow() {
            break;
        }

        let interval_ms = {
            let game = game.lock().await;
            if game.status() == GameStatus::GameOver {
                break;
            }
            game.drop_interval_ms()
        };

        tokio::select! {
            _ = time::sleep(Duration::from_millis(u64::from(interval_ms))) => {}
            _ = shutdown.changed() => break,
        }

        game.lock().await.update();
        ticks += 1;
    }

    debug!(ticks, "gravity driver stopped");
    ticks
}

/// Polling loop: hand a fresh snapshot to `sink` every `period`
///
/// The final GameOver snapshot is delivered before the loop exits. Returns
/// the number of snapshots delivered.
pub async fn run_polling<F>(
    game: SharedGame,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
    mut sink: F,
) -> u64
where
    F: FnMut(GameSnapshot) + Send,
{
    let mut interval = time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut frames = 0u64;

    loop {
        if *shutdown.borrow() {
            break;
        }

        tokio::select! {
            _ = interval.tick() => {}
            _ = shutdown.changed() => break,
        }

        let snapshot = game.lock().await.snapshot();
        let over = snapshot.status == GameStatus::GameOver;
        sink(snapshot);
        frames += 1;

        if over {
            break;
        }
    }

    debug!(frames, "polling driver stopped");
    frames
}

/// Record the final score of a finished game if it beats the stored best
///
/// A run stopped before game over records nothing. Returns whether a new
/// best was written.
pub fn save_final_score(game: &GameState, store: &HighScoreStore) -> bool {
    game.final_score()
        .is_some_and(|score| store.save_if_higher(score))
}
