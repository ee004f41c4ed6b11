// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Request and response bodies. Everything is camelCase on the wire.

use chrono::{DateTime, Utc};
use fairplay_kernel::rng::TileSpawn;
use fairplay_kernel::GameType;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartSessionRequest {
    /// Kept loose so a missing or unknown type maps to 400 with a message.
    #[serde(default)]
    pub game_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartSessionResponse {
    pub session_id: String,
    pub game_type: GameType,
    pub secret_hash: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_height: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndSessionRequest {
    pub session_id: String,
    #[serde(default)]
    pub game_data: Value,
}

/// Everything a third party needs to check the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevealPayload {
    pub session_id: String,
    pub server_secret: String,
    pub secret_hash: String,
    pub block_hash: Option<String>,
    pub block_height: Option<u64>,
    pub tx_hash: Option<String>,
    pub tx_index: Option<u32>,
    pub timestamp: Option<i64>,
    pub ended_at: DateTime<Utc>,
    pub already_ended: bool,
}

/// Public view of a session. The secret appears only once it has ended.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub session_id: String,
    pub game_type: GameType,
    pub secret_hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_secret: Option<String>,
    pub anchor: Option<fairplay_kernel::BlockAnchor>,
    pub created_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum Draw {
    /// A permutation of `0..n`.
    Shuffle { n: usize },
    Die { roll_index: u64 },
    Tile { move_index: u64, empty_cells: usize },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RandomRequest {
    pub session_id: String,
    pub purpose: String,
    pub draw: Draw,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DrawValue {
    Permutation(Vec<usize>),
    Die(u8),
    Tile(TileSpawn),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RandomResponse {
    pub session_id: String,
    pub purpose: String,
    pub values: DrawValue,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}
