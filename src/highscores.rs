//! Local best runs
//!
//! Keeps the ten best finished runs in LocalStorage. The leaderboard server
//! holds one high score per user; the last value it reported is cached in
//! `remote_best` so the UI can show whichever is higher.

use serde::{Deserialize, Serialize};

use crate::sim::RunSnapshot;

/// Maximum number of runs to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// One finished run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighScoreEntry {
    pub score: u64,
    /// Coin points (not pickup count)
    pub coins: u64,
    pub distance: f32,
    /// Unix timestamp (ms)
    pub timestamp: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
    pub remote_best: Option<u64>,
}

impl HighScores {
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "dash_runner_highscores";

    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a run with this score would make the list
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().is_none_or(|e| score > e.score)
    }

    /// 1-indexed rank the score would take, None if it doesn't qualify
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Insert a run, keeping entries sorted best first.
    /// Returns the rank achieved or None.
    pub fn add_score(&mut self, entry: HighScoreEntry) -> Option<usize> {
        let rank = self.potential_rank(entry.score)?;
        self.entries.insert(rank - 1, entry);
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(rank)
    }

    /// Record a finished run from its snapshot
    pub fn record_run(&mut self, run: &RunSnapshot, timestamp: f64) -> Option<usize> {
        self.add_score(HighScoreEntry {
            score: run.score,
            coins: run.coins,
            distance: run.distance,
            timestamp,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Best local score
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Remember the score the server reported; it only ever goes up
    pub fn set_remote_best(&mut self, score: u64) {
        self.remote_best = Some(self.remote_best.map_or(score, |best| best.max(score)));
    }

    /// Highest of the local and server bests
    pub fn best(&self) -> u64 {
        self.top_score()
            .unwrap_or(0)
            .max(self.remote_best.unwrap_or(0))
    }

    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str::<HighScores>(&json) {
                    Ok(scores) => {
                        log::info!("Loaded {} high scores", scores.entries.len());
                        return scores;
                    }
                    Err(e) => log::warn!("Discarding unreadable high scores: {}", e),
                }
            }
        }

        log::info!("No high scores found, starting fresh");
        Self::new()
    }

    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                if storage.set_item(Self::STORAGE_KEY, &json).is_err() {
                    log::warn!("Failed to save high scores");
                }
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(score: u64) -> HighScoreEntry {
        HighScoreEntry {
            score,
            coins: 0,
            distance: score as f32 * 10.0,
            timestamp: 0.0,
        }
    }

    #[test]
    fn test_sorted_and_ranked() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_score(entry(50)), Some(1));
        assert_eq!(scores.add_score(entry(80)), Some(1));
        assert_eq!(scores.add_score(entry(60)), Some(2));
        let order: Vec<u64> = scores.entries.iter().map(|e| e.score).collect();
        assert_eq!(order, vec![80, 60, 50]);
        assert_eq!(scores.top_score(), Some(80));
    }

    #[test]
    fn test_zero_never_qualifies() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_score(entry(0)), None);
        assert!(scores.is_empty());
    }

    #[test]
    fn test_full_list_drops_lowest() {
        let mut scores = HighScores::new();
        for s in 1..=MAX_HIGH_SCORES as u64 {
            scores.add_score(entry(s * 10));
        }
        assert!(!scores.qualifies(10));
        assert_eq!(scores.potential_rank(55), Some(6));
        assert_eq!(scores.add_score(entry(55)), Some(6));
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.entries.last().map(|e| e.score), Some(20));
    }

    #[test]
    fn test_best_includes_remote() {
        let mut scores = HighScores::new();
        assert_eq!(scores.best(), 0);
        scores.add_score(entry(120));
        scores.set_remote_best(300);
        scores.set_remote_best(200);
        assert_eq!(scores.remote_best, Some(300));
        assert_eq!(scores.best(), 300);
    }

    #[test]
    fn test_json_shape() {
        let mut scores = HighScores::new();
        scores.add_score(entry(42));
        let json = serde_json::to_string(&scores).unwrap();
        assert!(json.contains("\"remoteBest\":null"));
        let back: HighScores = serde_json::from_str(&json).unwrap();
        assert_eq!(back.entries, scores.entries);

        let legacy: HighScores = serde_json::from_str("{}").unwrap();
        assert!(legacy.is_empty());
    }
}
