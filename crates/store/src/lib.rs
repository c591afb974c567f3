//! Best-score persistence
//!
//! A single best score is kept in a small text file with one line,
//! `high_score=<n>`. Storage problems never reach the game: a missing or
//! unreadable file reads as 0 and a failed write is logged and skipped.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

const HIGH_SCORE_KEY: &str = "high_score=";
const SCORES_FILE_NAME: &str = "high_score.txt";
const LOCAL_SCORES_FILE: &str = "blockfall_scores.txt";

/// File-backed best score
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighScoreStore {
    path: PathBuf,
}

impl HighScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Resolve the file location
    ///
    /// An explicit path wins, then the user data directory, then a file in
    /// the working directory.
    pub fn locate(override_path: Option<PathBuf>) -> Self {
        if let Some(path) = override_path {
            return Self::new(path);
        }

        match dirs::data_dir() {
            Some(data_dir) => Self::new(data_dir.join("blockfall").join(SCORES_FILE_NAME)),
            None => Self::new(LOCAL_SCORES_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored best score, 0 if there is none or it cannot be read
    pub fn load(&self) -> u32 {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return 0,
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "failed to read high score");
                return 0;
            }
        };

        match parse_high_score(&content) {
            Some(score) => score,
            None => {
                warn!(path = %self.path.display(), "malformed high score file");
                0
            }
        }
    }

    /// Persist `score` if it beats the stored one; returns whether it was written
    pub fn save_if_higher(&self, score: u32) -> bool {
        let current = self.load();
        if score <= current {
            return false;
        }

        match self.write(score) {
            Ok(()) => {
                info!(score, previous = current, "new high score saved");
                true
            }
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "failed to save high score");
                false
            }
        }
    }

    fn write(&self, score: u32) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, format!("{HIGH_SCORE_KEY}{score}\n"))
    }

    /// Remove the stored score
    pub fn clear(&self) {
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "failed to clear high score");
            }
        }
    }
}

fn parse_high_score(content: &str) -> Option<u32> {
    content.strip_prefix(HIGH_SCORE_KEY)?.trim().parse().ok()
}
