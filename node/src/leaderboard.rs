// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Where validated submissions go: accepted ones to the leaderboard,
//! suspicious ones to manual review. Storage and listing belong to the
//! collaborators behind these traits; the memory versions back the default
//! node and the tests.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use fairplay_kernel::GameType;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub game_id: String,
    pub game_type: GameType,
    pub player: String,
    pub score: u64,
    pub risk_score: u8,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewItem {
    pub game_id: String,
    pub game_type: GameType,
    pub player: String,
    pub score: u64,
    pub risk_score: u8,
    pub flags: Vec<String>,
    pub queued_at: DateTime<Utc>,
}

pub trait Leaderboard: Send + Sync {
    /// Records an accepted score. Re-recording a game id replaces it.
    fn record(&self, entry: LeaderboardEntry);

    /// Best score of `player` in `game_type`, ignoring `exclude_game_id`.
    fn best_score(&self, player: &str, game_type: GameType, exclude_game_id: &str) -> Option<u64>;

    /// Entries for `game_type`, best first.
    fn top(&self, game_type: GameType, limit: usize) -> Vec<LeaderboardEntry>;
}

pub trait ReviewQueue: Send + Sync {
    fn enqueue(&self, item: ReviewItem);

    fn pending(&self) -> Vec<ReviewItem>;
}

#[derive(Debug, Default)]
pub struct MemoryLeaderboard {
    entries: Mutex<HashMap<String, LeaderboardEntry>>,
}

impl MemoryLeaderboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Leaderboard for MemoryLeaderboard {
    fn record(&self, entry: LeaderboardEntry) {
        self.entries.lock().insert(entry.game_id.clone(), entry);
    }

    fn best_score(&self, player: &str, game_type: GameType, exclude_game_id: &str) -> Option<u64> {
        self.entries
            .lock()
            .values()
            .filter(|e| e.player == player && e.game_type == game_type && e.game_id != exclude_game_id)
            .map(|e| e.score)
            .max()
    }

    fn top(&self, game_type: GameType, limit: usize) -> Vec<LeaderboardEntry> {
        let mut entries: Vec<LeaderboardEntry> = self
            .entries
            .lock()
            .values()
            .filter(|e| e.game_type == game_type)
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.recorded_at.cmp(&b.recorded_at)));
        entries.truncate(limit);
        entries
    }
}

#[derive(Debug, Default)]
pub struct MemoryReviewQueue {
    items: Mutex<Vec<ReviewItem>>,
}

impl MemoryReviewQueue {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReviewQueue for MemoryReviewQueue {
    fn enqueue(&self, item: ReviewItem) {
        let mut items = self.items.lock();
        // One pending review per game id.
        items.retain(|i| i.game_id != item.game_id);
        items.push(item);
    }

    fn pending(&self) -> Vec<ReviewItem> {
        self.items.lock().clone()
    }
}
