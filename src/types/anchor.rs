// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Blockchain anchor and reveal payloads.

use serde::{Deserialize, Serialize};

/// The block a session's seeds are bound to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockAnchor {
    pub block_hash: String,
    pub block_height: u64,
    #[serde(default)]
    pub tx_hash: Option<String>,
    #[serde(default)]
    pub tx_index: Option<u32>,
    /// Block timestamp, seconds since the epoch.
    pub timestamp: i64,
}

/// A disclosed secret and the commitment it must match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reveal {
    pub server_secret: String,
    pub secret_hash: String,
}
