// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! 2048: seeded full replay.
//!
//! With the secret revealed every spawn is known, so the whole game is
//! recomputed: two opening spawns (indices 0 and 1), then one spawn after
//! each move at index `move + 2`. A move that leaves the board unchanged is
//! illegal.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};
use crate::games::{GameReplay, ReplayContext, ReplayReport};
use crate::rng::tile_spawn;
use crate::rules::{GameRules, TILES_BOARD_SIDE};
use crate::seed::{Seed, PURPOSE_TILE_SPAWN};
use crate::submission::SubmissionMeta;
use crate::types::enums::GameType;

const N: usize = TILES_BOARD_SIDE;
pub const OPENING_SPAWNS: u64 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    fn letter(&self) -> char {
        match self {
            Direction::Up => 'U',
            Direction::Down => 'D',
            Direction::Left => 'L',
            Direction::Right => 'R',
        }
    }
}

/// Row-major 4x4 grid, 0 for empty.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Board(pub [[u32; N]; N]);

impl Board {
    pub fn empty_cells(&self) -> Vec<(usize, usize)> {
        let mut cells = Vec::with_capacity(N * N);
        for r in 0..N {
            for c in 0..N {
                if self.0[r][c] == 0 {
                    cells.push((r, c));
                }
            }
        }
        cells
    }

    pub fn max_tile(&self) -> u32 {
        self.0.iter().flatten().copied().max().unwrap_or(0)
    }

    /// Places the seeded spawn number `index`.
    pub fn spawn(&mut self, seed: &Seed, index: u64) -> Result<()> {
        let empty = self.empty_cells();
        let spawn = tile_spawn(seed, index, empty.len())?;
        let (r, c) = empty[spawn.position];
        self.0[r][c] = spawn.value;
        Ok(())
    }

    /// Slides and merges toward `dir`. Returns the points gained and whether
    /// anything moved.
    pub fn slide(&mut self, dir: Direction) -> (u64, bool) {
        let mut gained = 0;
        let before = *self;
        for lane in 0..N {
            let cells: [(usize, usize); N] = core::array::from_fn(|k| match dir {
                Direction::Left => (lane, k),
                Direction::Right => (lane, N - 1 - k),
                Direction::Up => (k, lane),
                Direction::Down => (N - 1 - k, lane),
            });
            let line: [u32; N] = core::array::from_fn(|k| self.0[cells[k].0][cells[k].1]);
            let (merged, points) = merge_line(line);
            gained += points;
            for (k, &(r, c)) in cells.iter().enumerate() {
                self.0[r][c] = merged[k];
            }
        }
        (gained, *self != before)
    }
}

/// Compacts a line toward index 0, merging equal neighbours once each.
fn merge_line(line: [u32; N]) -> ([u32; N], u64) {
    let mut out = [0u32; N];
    let mut points = 0u64;
    let mut write = 0;
    let mut pending: Option<u32> = None;
    for value in line.into_iter().filter(|&v| v != 0) {
        match pending {
            Some(p) if p == value => {
                out[write] = p * 2;
                points += (p * 2) as u64;
                write += 1;
                pending = None;
            }
            Some(p) => {
                out[write] = p;
                write += 1;
                pending = Some(value);
            }
            None => pending = Some(value),
        }
    }
    if let Some(p) = pending {
        out[write] = p;
    }
    (out, points)
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TilesSubmission {
    #[serde(flatten)]
    pub meta: SubmissionMeta,
    pub moves: Vec<Direction>,
    #[serde(default)]
    pub max_tile: Option<u32>,
}

/// Replays `moves` from the seeded opening. Returns the final board and
/// score, or the index of the first illegal move.
pub fn replay_moves(seed: &Seed, moves: &[Direction]) -> Result<(Board, u64)> {
    let mut board = Board::default();
    for index in 0..OPENING_SPAWNS {
        board.spawn(seed, index)?;
    }
    let mut score = 0u64;
    for (i, &dir) in moves.iter().enumerate() {
        let (gained, changed) = board.slide(dir);
        if !changed {
            return Err(ValidationError::replay_mismatch(format!(
                "move {i} ({dir:?}) does not change the board"
            ))
            .with("moveIndex", i)
            .with("move", format!("{dir:?}").to_lowercase()));
        }
        score += gained;
        board.spawn(seed, i as u64 + OPENING_SPAWNS)?;
    }
    Ok((board, score))
}

impl GameReplay for TilesSubmission {
    fn game_type(&self) -> GameType {
        GameType::Tiles2048
    }

    fn meta(&self) -> &SubmissionMeta {
        &self.meta
    }

    fn move_count(&self) -> u64 {
        self.moves.len() as u64
    }

    fn history_text(&self) -> Option<String> {
        Some(self.moves.iter().map(Direction::letter).collect())
    }

    fn check_bounds(&self, _rules: &GameRules) -> Result<()> {
        if let Some(tile) = self.max_tile {
            if tile < 2 || !tile.is_power_of_two() {
                return Err(ValidationError::out_of_range(format!(
                    "maxTile {tile} is not a power of two"
                ))
                .with("maxTile", tile));
            }
        }
        Ok(())
    }

    fn replay(&self, ctx: &ReplayContext) -> Result<ReplayReport> {
        let seed = ctx.require_seed(GameType::Tiles2048, PURPOSE_TILE_SPAWN)?;
        let (board, score) = replay_moves(&seed, &self.moves)?;

        if let Some(claimed) = self.max_tile {
            if claimed != board.max_tile() {
                return Err(ValidationError::replay_mismatch(format!(
                    "claimed max tile {claimed} but replay reaches {}",
                    board.max_tile()
                ))
                .expected_actual(board.max_tile(), claimed));
            }
        }

        Ok(ReplayReport::verified(score)
            .detail("maxTile", board.max_tile())
            .detail("emptyCells", board.empty_cells().len()))
    }
}
