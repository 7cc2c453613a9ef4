//! High score leaderboard
//!
//! Session-only: tracks the top 10 finished runs.

use serde::{Deserialize, Serialize};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single finished run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub score: u64,
    /// Boss beaten
    pub cleared: bool,
    /// Seconds of play in the run
    pub elapsed_secs: f64,
}

/// High score leaderboard, best first
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Rank a score would achieve (1-indexed, None if it doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Record a finished run. Returns the rank achieved, or None if it
    /// didn't make the board.
    pub fn add_score(&mut self, score: u64, cleared: bool, elapsed_secs: f64) -> Option<usize> {
        let rank = self.potential_rank(score)?;

        self.entries.insert(
            rank - 1,
            HighScoreEntry {
                score,
                cleared,
                elapsed_secs,
            },
        );
        self.entries.truncate(MAX_HIGH_SCORES);

        log::debug!("Score {} entered the board at #{}", score, rank);
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_never_qualifies() {
        let mut scores = HighScores::new();
        assert!(!scores.qualifies(0));
        assert_eq!(scores.add_score(0, false, 3.0), None);
        assert!(scores.is_empty());
    }

    #[test]
    fn test_entries_sorted_best_first() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_score(5, false, 20.0), Some(1));
        assert_eq!(scores.add_score(15, true, 60.0), Some(1));
        assert_eq!(scores.add_score(8, false, 30.0), Some(2));
        // Ties rank below the existing entry
        assert_eq!(scores.add_score(8, false, 31.0), Some(3));

        let ordered: Vec<u64> = scores.entries.iter().map(|e| e.score).collect();
        assert_eq!(ordered, vec![15, 8, 8, 5]);
        assert_eq!(scores.top_score(), Some(15));
        assert!(scores.entries[0].cleared);
    }

    #[test]
    fn test_truncates_to_max() {
        let mut scores = HighScores::new();
        for s in 1..=12 {
            scores.add_score(s, false, s as f64);
        }
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.entries.last().map(|e| e.score), Some(3));

        // A full board only takes scores beating the lowest entry
        assert!(!scores.qualifies(3));
        assert_eq!(scores.potential_rank(4), Some(10));
        assert_eq!(scores.potential_rank(100), Some(1));
    }
}
