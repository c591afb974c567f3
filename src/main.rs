//! Headless blockfall runner (default binary).
//!
//! Starts a seeded game, lets the autoplayer place pieces while the gravity
//! and polling drivers run alongside, then records the best score and prints
//! a one-line JSON summary of the final state to stdout. Logs go to stderr.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use blockfall::autoplay::{run_autoplay, Autoplayer};
use blockfall::config::Settings;
use blockfall::core::{GameSnapshot, GameState};
use blockfall::driver::{
    run_gravity, run_polling, save_final_score, shared, shutdown_channel,
};
use blockfall::store::HighScoreStore;
use blockfall::types::GameStatus;

/// Final state as printed on stdout
#[derive(Debug, Serialize)]
struct RunSummary {
    seed: u32,
    status: GameStatus,
    score: u32,
    level: u32,
    lines: u32,
    pieces: u32,
    time: String,
    pieces_per_second: f64,
    high_score: u32,
    new_high_score: bool,
}

fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::from_env();
    init_tracing(&settings.log_filter);

    let store = HighScoreStore::locate(settings.scores_file.clone());
    let previous_best = store.load();
    info!(seed = settings.seed, best = previous_best, path = %store.path().display(), "starting");

    let mut game = GameState::new(settings.seed);
    game.start_game();
    let game = shared(game);

    let (shutdown_tx, shutdown_rx) = shutdown_channel();
    let gravity = tokio::spawn(run_gravity(game.clone(), shutdown_rx.clone()));
    let polling = tokio::spawn(run_polling(
        game.clone(),
        Duration::from_millis(settings.poll_ms),
        shutdown_rx.clone(),
        |snapshot: GameSnapshot| {
            debug!(
                score = snapshot.score,
                level = snapshot.level,
                lines = snapshot.lines,
                time = %snapshot.formatted_time(),
                "frame"
            );
        },
    ));

    let placed = run_autoplay(
        game.clone(),
        Autoplayer::new(settings.seed),
        Duration::from_millis(settings.autoplay_ms),
        settings.max_pieces,
        shutdown_rx,
    )
    .await;

    // Receivers may already be gone once the game is over
    let _ = shutdown_tx.send(true);
    let ticks = gravity.await.context("gravity driver failed")?;
    let frames = polling.await.context("polling driver failed")?;
    debug!(placed, ticks, frames, "drivers finished");

    let (snapshot, new_high_score) = {
        let game = game.lock().await;
        (game.snapshot(), save_final_score(&game, &store))
    };

    let summary = RunSummary {
        seed: settings.seed,
        status: snapshot.status,
        score: snapshot.score,
        level: snapshot.level,
        lines: snapshot.lines,
        pieces: snapshot.total_pieces,
        time: snapshot.formatted_time(),
        pieces_per_second: snapshot.pieces_per_second(),
        high_score: if new_high_score {
            snapshot.score
        } else {
            previous_best
        },
        new_high_score,
    };
    println!(
        "{}",
        serde_json::to_string(&summary).context("failed to serialize run summary")?
    );

    Ok(())
}
