//! High score leaderboard
//!
//! Ordered by score (highest first), ties broken by who got there first.
//! Persisted to LocalStorage, keeps the top 10.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{MAX_NAME_LEN, MAX_SUBMITTED_SCORE};
use crate::platform::storage;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// Reasons a score submission is rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("invalid name: must be 1-{max} characters, got {len}", max = MAX_NAME_LEN)]
    InvalidName { len: usize },
    #[error("score {0} out of range (0-{max})", max = MAX_SUBMITTED_SCORE)]
    ScoreOutOfRange(u64),
}

/// A single leaderboard entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub name: String,
    pub score: u64,
    /// Unix timestamp (ms) when submitted
    pub timestamp: f64,
}

impl HighScoreEntry {
    /// True if this entry ranks above `other`
    fn outranks(&self, other: &HighScoreEntry) -> bool {
        self.score > other.score || (self.score == other.score && self.timestamp < other.timestamp)
    }
}

/// High score leaderboard
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "lumen_maze_highscores";

    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Validate a submission; returns the trimmed name
    pub fn validate(name: &str, score: u64) -> Result<String, SubmitError> {
        let name = name.trim();
        let len = name.chars().count();
        if len == 0 || len > MAX_NAME_LEN {
            return Err(SubmitError::InvalidName { len });
        }
        if score > MAX_SUBMITTED_SCORE {
            return Err(SubmitError::ScoreOutOfRange(score));
        }
        Ok(name.to_string())
    }

    /// Rank a score would get right now (1-indexed). Ties rank below existing entries.
    pub fn potential_rank(&self, score: u64) -> usize {
        self.entries.iter().filter(|e| score <= e.score).count() + 1
    }

    /// Submit a score. Returns the rank achieved, or None if it fell outside the top 10.
    pub fn submit(
        &mut self,
        name: &str,
        score: u64,
        timestamp: f64,
    ) -> Result<Option<usize>, SubmitError> {
        let name = Self::validate(name, score)?;
        let entry = HighScoreEntry {
            name,
            score,
            timestamp,
        };

        let pos = self
            .entries
            .iter()
            .position(|e| entry.outranks(e))
            .unwrap_or(self.entries.len());
        if pos >= MAX_HIGH_SCORES {
            return Ok(None);
        }

        log::info!("Score submitted: {} - {} (rank {})", entry.name, score, pos + 1);
        self.entries.insert(pos, entry);
        self.entries.truncate(MAX_HIGH_SCORES);
        Ok(Some(pos + 1))
    }

    /// Top entries, best first
    pub fn top(&self) -> &[HighScoreEntry] {
        &self.entries
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Load high scores from LocalStorage; empty on any failure
    pub fn load() -> Self {
        match storage::load_json::<HighScores>(Self::STORAGE_KEY) {
            Some(mut scores) => {
                scores.entries.truncate(MAX_HIGH_SCORES);
                log::info!("Loaded {} high scores", scores.entries.len());
                scores
            }
            None => {
                log::info!("No high scores found, starting fresh");
                Self::new()
            }
        }
    }

    /// Save high scores to LocalStorage
    pub fn save(&self) {
        if storage::save_json(Self::STORAGE_KEY, self) {
            log::info!("High scores saved ({} entries)", self.entries.len());
        }
    }
}
