// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Re-derives the values a session handed out while it was running.

use std::path::Path;

use anyhow::{bail, Result};
use fairplay_kernel::commitment::verify_commitment;
use fairplay_kernel::rng::{die_roll, shuffle, tile_spawn, TileSpawn};
use fairplay_kernel::seed::{derive_anchored, Seed, PURPOSE_DECK_SHUFFLE, PURPOSE_DICE, PURPOSE_TILE_SPAWN};

use crate::reveal::RevealFile;

/// Seed for `purpose`. The reveal must match its commitment first.
pub fn seed_for(file: &RevealFile, purpose: &str) -> Result<Seed> {
    verify_commitment(&file.server_secret, &file.secret_hash)?;
    let anchor = file.require_anchor()?;
    Ok(derive_anchored(&file.server_secret.trim().to_ascii_lowercase(), &anchor, purpose))
}

pub fn deck(file: &RevealFile, n: usize) -> Result<Vec<usize>> {
    if n == 0 {
        bail!("deck size must be positive");
    }
    Ok(shuffle(&seed_for(file, PURPOSE_DECK_SHUFFLE)?, n))
}

pub fn dice(file: &RevealFile, rolls: u64) -> Result<Vec<u8>> {
    let seed = seed_for(file, PURPOSE_DICE)?;
    Ok((0..rolls).map(|i| die_roll(&seed, i)).collect())
}

pub fn tile(file: &RevealFile, move_index: u64, empty_cells: usize) -> Result<TileSpawn> {
    let seed = seed_for(file, PURPOSE_TILE_SPAWN)?;
    Ok(tile_spawn(&seed, move_index, empty_cells)?)
}

pub fn run_seed(reveal_path: &Path, purpose: &str) -> Result<()> {
    let seed = seed_for(&RevealFile::load(reveal_path)?, purpose)?;
    println!("{}", seed.to_hex());
    Ok(())
}

pub fn run_deck(reveal_path: &Path, n: usize) -> Result<()> {
    let order = deck(&RevealFile::load(reveal_path)?, n)?;
    println!("{}", serde_json::to_string(&order)?);
    Ok(())
}

pub fn run_dice(reveal_path: &Path, rolls: u64) -> Result<()> {
    let values = dice(&RevealFile::load(reveal_path)?, rolls)?;
    println!("{}", serde_json::to_string(&values)?);
    Ok(())
}

pub fn run_tile(reveal_path: &Path, move_index: u64, empty_cells: usize) -> Result<()> {
    let spawn = tile(&RevealFile::load(reveal_path)?, move_index, empty_cells)?;
    println!("{}", serde_json::to_string(&spawn)?);
    Ok(())
}
