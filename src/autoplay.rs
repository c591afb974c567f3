//! Random input stand-in for headless runs.
//!
//! For each piece the player picks a rotation count and a target column
//! from its own seeded RNG, walks the piece over, and hard drops it.

use std::time::Duration;

use tokio::sync::watch;
use tokio::time;
use tracing::debug;

use crate::core::{GameState, SimpleRng};
use crate::driver::SharedGame;
use crate::types::GameStatus;

/// Chosen placement for one piece
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub rotations: u8,
    pub column: i8,
}

#[derive(Debug, Clone)]
pub struct Autoplayer {
    rng: SimpleRng,
}

impl Autoplayer {
    pub fn new(seed: u32) -> Self {
        Self {
            rng: SimpleRng::new(seed),
        }
    }

    pub fn plan(&mut self, width: u8) -> Placement {
        Placement {
            rotations: self.rng.next_range(4) as u8,
            column: self.rng.next_range(u32::from(width)) as i8,
        }
    }

    /// Place the active piece; does nothing unless the game is Playing
    pub fn play_piece(&mut self, game: &mut GameState) {
        if game.status() != GameStatus::Playing || game.current().is_none() {
            return;
        }

        let width = game.board().width();
        let placement = self.plan(width);
        debug!(
            rotations = placement.rotations,
            column = placement.column,
            "autoplay placement"
        );

        for _ in 0..placement.rotations {
            game.rotate();
        }

        // Blocked moves are no-ops, so stop as soon as x stops changing
        for _ in 0..width {
            let Some(piece) = game.current() else {
                return;
            };
            if piece.x < placement.column {
                game.move_right();
            } else if piece.x > placement.column {
                game.move_left();
            } else {
                break;
            }
            if game.current().map(|p| p.x) == Some(piece.x) {
                break;
            }
        }

        game.hard_drop();
    }
}

/// Autoplay loop: place one piece every `period`
///
/// Stops at game over, after `max_pieces` placements, or on shutdown.
/// Returns the number of pieces placed.
pub async fn run_autoplay(
    game: SharedGame,
    mut player: Autoplayer,
    period: Duration,
    max_pieces: Option<u32>,
    mut shutdown: watch::Receiver<bool>,
) -> u32 {
    let mut placed = 0u32;

    loop {
        if *shutdown.borrow() || max_pieces.is_some_and(|max| placed >= max) {
            break;
        }

        tokio::select! {
            _ = time::sleep(period) => {}
            _ = shutdown.changed() => break,
        }

        let mut game = game.lock().await;
        match game.status() {
            GameStatus::GameOver => break,
            GameStatus::Playing => {
                player.play_piece(&mut game);
                placed += 1;
            }
            GameStatus::NotStarted | GameStatus::Paused => {}
        }
    }

    debug!(placed, "autoplay stopped");
    placed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GameConfig, ManualClock};
    use crate::driver::{shared, shutdown_channel};

    fn manual_game(seed: u32) -> GameState {
        let mut game = GameState::with_config(GameConfig::with_seed(seed), ManualClock::new())
            .unwrap();
        game.start_game();
        game
    }

    #[test]
    fn test_plan_in_range() {
        let mut player = Autoplayer::new(5);
        for _ in 0..200 {
            let placement = player.plan(10);
            assert!(placement.rotations < 4);
            assert!((0..10).contains(&placement.column));
        }
    }

    #[test]
    fn test_play_piece_places_one_piece() {
        let mut game = manual_game(21);
        let mut player = Autoplayer::new(21);

        player.play_piece(&mut game);

        assert_eq!(game.total_pieces(), 2);
        assert!(game.score() > 0);
        assert_eq!(game.board().cells().iter().filter(|c| c.is_some()).count(), 4);
    }

    #[test]
    fn test_autoplay_is_reproducible() {
        let mut a = manual_game(77);
        let mut b = manual_game(77);
        let mut pa = Autoplayer::new(4);
        let mut pb = Autoplayer::new(4);

        for _ in 0..40 {
            pa.play_piece(&mut a);
            pb.play_piece(&mut b);
        }

        assert_eq!(a.snapshot(), b.snapshot());
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_autoplay_respects_max_pieces() {
        let game = shared(manual_game(9));
        let (_tx, rx) = shutdown_channel();

        let placed = run_autoplay(
            std::sync::Arc::clone(&game),
            Autoplayer::new(9),
            Duration::from_millis(10),
            Some(5),
            rx,
        )
        .await;

        let pieces = game.lock().await.total_pieces();
        assert!(placed <= 5);
        if game.lock().await.status() == GameStatus::Playing {
            assert_eq!(placed, 5);
            assert_eq!(pieces, 6);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_autoplay_until_game_over() {
        let game = shared(manual_game(13));
        let (_tx, rx) = shutdown_channel();

        let placed = run_autoplay(
            std::sync::Arc::clone(&game),
            Autoplayer::new(13),
            Duration::from_millis(1),
            None,
            rx,
        )
        .await;

        assert!(placed > 0);
        assert_eq!(game.lock().await.status(), GameStatus::GameOver);
    }
}
