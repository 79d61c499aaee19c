//! Best-rounds board
//!
//! Keeps the ten lowest round scores (relative to par). Stored as a JSON
//! file next to the save.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::persistence::PersistError;

/// Maximum number of rounds to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// One finished round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Strokes minus par over the round
    pub score: i32,
    pub strokes: u32,
    pub holes: usize,
    /// Unix timestamp (seconds) when played
    pub timestamp: u64,
}

/// Best rounds, lowest score first
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Would a round with this score make the board?
    pub fn qualifies(&self, score: i32) -> bool {
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().is_none_or(|e| score < e.score)
    }

    /// 1-based rank a score would take, None if it doesn't qualify
    pub fn potential_rank(&self, score: i32) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score < e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Record a round. Ties rank behind earlier rounds. Returns the rank taken.
    pub fn add_score(&mut self, entry: HighScoreEntry) -> Option<usize> {
        let rank = self.potential_rank(entry.score)?;
        self.entries.insert(rank - 1, entry);
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lowest score on the board
    pub fn best(&self) -> Option<i32> {
        self.entries.first().map(|e| e.score)
    }

    /// Read the board; a missing or corrupt file starts a fresh one
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(_) => {
                log::info!("No high scores found, starting fresh");
                return Self::new();
            }
        };
        match serde_json::from_str::<HighScores>(&json) {
            Ok(mut scores) => {
                scores.entries.sort_by_key(|e| e.score);
                scores.entries.truncate(MAX_HIGH_SCORES);
                log::info!("Loaded {} high scores", scores.entries.len());
                scores
            }
            Err(err) => {
                log::warn!("High score file {} unreadable ({err}), starting fresh", path.display());
                Self::new()
            }
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        fs::write(path.as_ref(), serde_json::to_string_pretty(self)?)?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }
}
