// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use fairplay_kernel::{BlockAnchor, Reveal};
use serde::{Deserialize, Serialize};

/// The reveal document returned when a session ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevealFile {
    pub server_secret: String,
    pub secret_hash: String,
    #[serde(default)]
    pub block_hash: Option<String>,
    #[serde(default)]
    pub block_height: Option<u64>,
    #[serde(default)]
    pub tx_hash: Option<String>,
    #[serde(default)]
    pub tx_index: Option<u32>,
    #[serde(default)]
    pub timestamp: Option<i64>,
}

impl RevealFile {
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).with_context(|| format!("Failed to read reveal file {}", path.display()))?;
        serde_json::from_slice(&bytes).with_context(|| format!("{} is not a reveal document", path.display()))
    }

    pub fn reveal(&self) -> Reveal {
        Reveal {
            server_secret: self.server_secret.clone(),
            secret_hash: self.secret_hash.clone(),
        }
    }

    /// `None` for sessions that started without a block.
    pub fn anchor(&self) -> Option<BlockAnchor> {
        Some(BlockAnchor {
            block_hash: self.block_hash.clone()?,
            block_height: self.block_height?,
            tx_hash: self.tx_hash.clone(),
            tx_index: self.tx_index,
            timestamp: self.timestamp?,
        })
    }

    pub fn require_anchor(&self) -> Result<BlockAnchor> {
        self.anchor()
            .context("reveal has no block anchor; this session's values were never seeded")
    }
}
