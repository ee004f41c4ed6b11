// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Deterministic RNG primitives consumed by the games.
//!
//! Every primitive first narrows the seed to a labelled sub-seed
//! (`SHA256(hex(seed) ‖ label)`) and then draws integers with
//! [`hash_to_int`]. Draws are addressed by index rather than by a running
//! stream position, so they can be recomputed in any order and any
//! individual draw can be checked without replaying the ones before it.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{Result, ValidationError};
use crate::seed::Seed;

pub const LABEL_SHUFFLE: &str = "shuffle";
pub const LABEL_DIE: &str = "die";
pub const LABEL_TILE: &str = "tile";

/// Percentage of spawned tiles that are a 2 (the rest are 4).
pub const TILE_TWO_PERCENT: u64 = 90;

/// `SHA256(hex(seed) ‖ label)`.
pub fn sub_seed(seed: &Seed, label: &str) -> Seed {
    let mut hasher = Sha256::new();
    hasher.update(seed.to_hex().as_bytes());
    hasher.update(label.as_bytes());
    Seed(hasher.finalize().into())
}

/// Hashes `hex(sub)` followed by `":" ‖ part` for each part and returns the
/// first 8 digest bytes as a big-endian `u64`.
pub fn hash_to_int(sub: &Seed, parts: &[&str]) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(sub.to_hex().as_bytes());
    for part in parts {
        hasher.update(b":");
        hasher.update(part.as_bytes());
    }
    let digest = hasher.finalize();
    let mut word = [0u8; 8];
    word.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(word)
}

/// Fisher-Yates permutation of `0..n`.
pub fn shuffle(seed: &Seed, n: usize) -> Vec<usize> {
    let mut items: Vec<usize> = (0..n).collect();
    shuffle_slice(seed, &mut items);
    items
}

/// Permutes `items` in place exactly as [`shuffle`] permutes `0..n`.
pub fn shuffle_slice<T>(seed: &Seed, items: &mut [T]) {
    let sub = sub_seed(seed, LABEL_SHUFFLE);
    for i in (1..items.len()).rev() {
        let draw = hash_to_int(&sub, &[&i.to_string()]);
        let j = (draw % (i as u64 + 1)) as usize;
        items.swap(i, j);
    }
}

/// A six sided die: `1 + HashToInt(sub, rollIndex) mod 6`.
pub fn die_roll(seed: &Seed, roll_index: u64) -> u8 {
    let sub = sub_seed(seed, LABEL_DIE);
    let draw = hash_to_int(&sub, &[&roll_index.to_string()]);
    1 + (draw % 6) as u8
}

/// Where a new tile lands and what it is worth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileSpawn {
    /// Index into the list of empty cells (row-major order).
    pub position: usize,
    pub value: u32,
}

/// Chooses the spawn for `move_index` among `empty_cells` free cells.
pub fn tile_spawn(seed: &Seed, move_index: u64, empty_cells: usize) -> Result<TileSpawn> {
    if empty_cells == 0 {
        return Err(ValidationError::invalid_argument("tile spawn requires at least one empty cell")
            .with("moveIndex", move_index));
    }
    let sub = sub_seed(seed, LABEL_TILE);
    let index = move_index.to_string();
    let position = (hash_to_int(&sub, &[&index, "position"]) % empty_cells as u64) as usize;
    let roll = hash_to_int(&sub, &[&index, "value"]) % 100;
    let value = if roll < TILE_TWO_PERCENT { 2 } else { 4 };
    Ok(TileSpawn { position, value })
}
