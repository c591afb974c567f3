//! Runtime settings for the headless runner.
//!
//! Every value comes from a `BLOCKFALL_*` environment variable. Missing or
//! unparsable values fall back to the defaults.

use std::env;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::types::SNAPSHOT_INTERVAL_MS;

pub const DEFAULT_LOG_FILTER: &str = "info";
pub const DEFAULT_AUTOPLAY_MS: u64 = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// RNG seed (`BLOCKFALL_SEED`, defaults to the current unix time)
    pub seed: u32,
    /// `tracing` filter directive (`BLOCKFALL_LOG`)
    pub log_filter: String,
    /// High score file override (`BLOCKFALL_SCORES_FILE`)
    pub scores_file: Option<PathBuf>,
    /// Stop after this many pieces (`BLOCKFALL_MAX_PIECES`, 0 or unset = until game over)
    pub max_pieces: Option<u32>,
    /// Snapshot polling period (`BLOCKFALL_POLL_MS`)
    pub poll_ms: u64,
    /// Delay between autoplay moves (`BLOCKFALL_AUTOPLAY_MS`)
    pub autoplay_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: time_seed(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            scores_file: None,
            max_pieces: None,
            poll_ms: u64::from(SNAPSHOT_INTERVAL_MS),
            autoplay_ms: DEFAULT_AUTOPLAY_MS,
        }
    }
}

impl Settings {
    /// Create from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Create from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let seed = lookup("BLOCKFALL_SEED")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.seed);

        let log_filter = lookup("BLOCKFALL_LOG")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.log_filter);

        let scores_file = lookup("BLOCKFALL_SCORES_FILE")
            .map(|s| s.trim().to_string())
            .and_then(|s| if s.is_empty() { None } else { Some(PathBuf::from(s)) });

        let max_pieces = lookup("BLOCKFALL_MAX_PIECES")
            .and_then(|s| s.trim().parse::<u32>().ok())
            .filter(|n| *n > 0);

        let poll_ms = positive_ms(lookup("BLOCKFALL_POLL_MS")).unwrap_or(defaults.poll_ms);
        let autoplay_ms =
            positive_ms(lookup("BLOCKFALL_AUTOPLAY_MS")).unwrap_or(defaults.autoplay_ms);

        Self {
            seed,
            log_filter,
            scores_file,
            max_pieces,
            poll_ms,
            autoplay_ms,
        }
    }
}

fn positive_ms(value: Option<String>) -> Option<u64> {
    value
        .and_then(|s| s.trim().parse::<u64>().ok())
        .filter(|ms| *ms > 0)
}

fn time_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as u32)
        .unwrap_or(1)
}
