//! Score, level and best-score tracking
//!
//! The best score is persisted to the key/value store whenever it is beaten.

use serde::{Deserialize, Serialize};

use crate::level_for_score;
use crate::persistence::KeyValueStore;

/// Score tracker for one session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBoard {
    /// Score in the current round
    pub score: u32,
    /// Best score across rounds and sessions
    pub best: u32,
}

impl ScoreBoard {
    /// Store key
    pub const STORAGE_KEY: &'static str = "stick_bridge_best";

    pub fn new() -> Self {
        Self::default()
    }

    /// Create a board seeded with the persisted best score
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let best = match store.get(Self::STORAGE_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<u32>(raw.trim()) {
                Ok(best) => {
                    log::info!("Loaded best score {}", best);
                    best
                }
                Err(e) => {
                    log::warn!("Ignoring unreadable best score {:?}: {}", raw, e);
                    0
                }
            },
            Ok(None) => {
                log::info!("No best score found, starting fresh");
                0
            }
            Err(e) => {
                log::warn!("Best score store unavailable: {}", e);
                0
            }
        };
        Self { score: 0, best }
    }

    /// Current level (1-based)
    pub fn level(&self) -> u32 {
        level_for_score(self.score)
    }

    /// Set the score, persisting a new best.
    /// Returns true if the best score was beaten.
    pub fn set_score(&mut self, score: u32, store: &mut dyn KeyValueStore) -> bool {
        self.score = score;
        if score <= self.best {
            return false;
        }

        self.best = score;
        match serde_json::to_string(&score) {
            Ok(raw) => {
                if let Err(e) = store.set(Self::STORAGE_KEY, &raw) {
                    log::warn!("Failed to persist best score {}: {}", score, e);
                }
            }
            Err(e) => log::warn!("Failed to encode best score {}: {}", score, e),
        }
        true
    }

    /// Add points for a landing
    pub fn award(&mut self, points: u32, store: &mut dyn KeyValueStore) -> bool {
        self.set_score(self.score.saturating_add(points), store)
    }

    /// Round restart: score back to zero, best untouched
    pub fn reset(&mut self, store: &mut dyn KeyValueStore) {
        self.set_score(0, store);
    }
}
