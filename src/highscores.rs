//! Persistent best score
//!
//! A single integer under one key of a [`KeyValueStore`]. Storage problems
//! are logged and swallowed: the game keeps running with the in-memory value.

use crate::persistence::KeyValueStore;

/// Storage key for the best score
pub const HIGH_SCORE_KEY: &str = "dino-high-score";

/// Parse a stored high score; anything missing or malformed counts as 0
pub fn parse_high_score(raw: Option<&str>) -> u64 {
    match raw {
        None => 0,
        Some(text) => text.trim().parse::<u64>().unwrap_or_else(|_| {
            log::warn!("Ignoring malformed stored high score {:?}", text);
            0
        }),
    }
}

/// Best score backed by an injected store
pub struct HighScoreRecord {
    store: Box<dyn KeyValueStore>,
}

impl HighScoreRecord {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Read the stored best score (0 when absent, malformed or unreadable)
    pub fn load(&self) -> u64 {
        match self.store.get(HIGH_SCORE_KEY) {
            Ok(raw) => {
                let score = parse_high_score(raw.as_deref());
                log::info!("Loaded high score {}", score);
                score
            }
            Err(e) => {
                log::warn!("Could not read high score: {}", e);
                0
            }
        }
    }

    /// Write a new best score
    pub fn save(&mut self, score: u64) {
        match self.store.set(HIGH_SCORE_KEY, &score.to_string()) {
            Ok(()) => log::info!("High score {} saved", score),
            Err(e) => log::warn!("Could not save high score {}: {}", score, e),
        }
    }
}
