// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Deterministic seed derivation.
//!
//! `Seed = SHA256(secret ‖ blockHash ‖ decimal(timestamp) ‖ purpose)`
//!
//! The four inputs are concatenated as UTF-8 text with no separators. The
//! function has no hidden state, so the server (validating) and any third
//! party (verifying after the reveal) always arrive at the same bytes.

use core::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::types::anchor::BlockAnchor;

/// Purpose string for the solitaire deal.
pub const PURPOSE_DECK_SHUFFLE: &str = "deck-shuffle";
/// Purpose string for 2048 tile spawns.
pub const PURPOSE_TILE_SPAWN: &str = "tile-spawn";
/// Purpose string for dice drawn during a session.
pub const PURPOSE_DICE: &str = "dice";

/// 32 byte SHA-256 output.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Seed(pub [u8; 32]);

impl Seed {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hex, the canonical textual form.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(s: &str) -> Option<Self> {
        let mut out = [0u8; 32];
        hex::decode_to_slice(s, &mut out).ok()?;
        Some(Seed(out))
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Seed({})", self.to_hex())
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Derives the seed for one purpose within a session.
pub fn derive_seed(secret: &str, block_hash: &str, timestamp: i64, purpose: &str) -> Seed {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hasher.update(block_hash.as_bytes());
    hasher.update(timestamp.to_string().as_bytes());
    hasher.update(purpose.as_bytes());
    Seed(hasher.finalize().into())
}

/// Same as [`derive_seed`], taking block hash and timestamp from an anchor.
pub fn derive_anchored(secret: &str, anchor: &BlockAnchor, purpose: &str) -> Seed {
    derive_seed(secret, &anchor.block_hash, anchor.timestamp, purpose)
}
