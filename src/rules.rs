// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Per-game constants.
//!
//! Every bound a validator enforces comes from this table. Move bounds are
//! derived from each game's structural size rather than shared.

use crate::types::enums::GameType;

/// Structural limits for one game.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameRules {
    pub game_type: GameType,
    pub id_prefix: &'static str,
    pub score_min: u64,
    pub score_max: u64,
    pub moves_min: u64,
    pub moves_max: u64,
    /// Fastest plausible human pace. Anything quicker is rejected outright.
    pub min_ms_per_move: u64,
    /// Shortest plausible wall clock for reaching `score_max`.
    pub min_duration_for_max_ms: u64,
    /// Ceiling used by the fraud scorer, well above typical play.
    pub max_moves_per_sec: f64,
    pub max_score_per_min: f64,
}

// Chess: result points x difficulty, plies bounded by the 75-move rule
// horizon many times over.
pub const CHESS_MAX_PLIES: u64 = 1200;
pub const CHESS_MAX_SCORE: u64 = 3 * 3;

// Solitaire: one foundation move per card, generous cap per card.
pub const DECK_SIZE: u64 = 52;
pub const SOLITAIRE_MOVES_PER_CARD_MAX: u64 = 40;

// Yahtzee: 13 boxes, up to 3 rolls each.
pub const YAHTZEE_CATEGORIES: u64 = 13;
pub const YAHTZEE_ROLLS_PER_TURN: u64 = 3;
pub const YAHTZEE_MAX_SCORE: u64 = 375;

// Backgammon: 167 pips to bear off, at most 24 pips per turn (double sixes).
pub const BACKGAMMON_PIPS: u64 = 167;
pub const BACKGAMMON_MAX_PIPS_PER_TURN: u64 = 24;
pub const BACKGAMMON_CHECKERS: u64 = 15;
pub const BACKGAMMON_TURNS_PER_CHECKER_MAX: u64 = 60;
pub const BACKGAMMON_MAX_SCORE: u64 = 3 * 64 * 3;

// 2048: 4x4 board, theoretical maximum score.
pub const TILES_BOARD_SIDE: usize = 4;
pub const TILES_MAX_SCORE: u64 = 3_932_100;
pub const TILES_MAX_MOVES: u64 = 100_000;

pub const CHESS: GameRules = GameRules {
    game_type: GameType::Chess,
    id_prefix: "CHESS",
    score_min: 0,
    score_max: CHESS_MAX_SCORE,
    moves_min: 1,
    moves_max: CHESS_MAX_PLIES,
    min_ms_per_move: 100,
    min_duration_for_max_ms: 30_000,
    max_moves_per_sec: 2.0,
    max_score_per_min: 9.0,
};

pub const SOLITAIRE: GameRules = GameRules {
    game_type: GameType::Solitaire,
    id_prefix: "SOL",
    score_min: 0,
    score_max: DECK_SIZE,
    moves_min: 0,
    moves_max: DECK_SIZE * SOLITAIRE_MOVES_PER_CARD_MAX,
    min_ms_per_move: 150,
    min_duration_for_max_ms: 60_000,
    max_moves_per_sec: 3.0,
    max_score_per_min: 40.0,
};

pub const YAHTZEE: GameRules = GameRules {
    game_type: GameType::Yahtzee,
    id_prefix: "YAHTZEE",
    score_min: 0,
    score_max: YAHTZEE_MAX_SCORE,
    moves_min: YAHTZEE_CATEGORIES,
    moves_max: YAHTZEE_CATEGORIES * YAHTZEE_ROLLS_PER_TURN,
    min_ms_per_move: 300,
    min_duration_for_max_ms: 90_000,
    max_moves_per_sec: 1.0,
    max_score_per_min: 250.0,
};

pub const BACKGAMMON: GameRules = GameRules {
    game_type: GameType::Backgammon,
    id_prefix: "BG",
    score_min: 0,
    score_max: BACKGAMMON_MAX_SCORE,
    moves_min: BACKGAMMON_PIPS.div_ceil(BACKGAMMON_MAX_PIPS_PER_TURN),
    moves_max: BACKGAMMON_CHECKERS * BACKGAMMON_TURNS_PER_CHECKER_MAX,
    min_ms_per_move: 250,
    min_duration_for_max_ms: 120_000,
    max_moves_per_sec: 1.5,
    max_score_per_min: 120.0,
};

pub const TILES_2048: GameRules = GameRules {
    game_type: GameType::Tiles2048,
    id_prefix: "2048",
    score_min: 0,
    score_max: TILES_MAX_SCORE,
    moves_min: 1,
    moves_max: TILES_MAX_MOVES,
    min_ms_per_move: 40,
    min_duration_for_max_ms: 3_600_000,
    max_moves_per_sec: 8.0,
    max_score_per_min: 20_000.0,
};

impl GameRules {
    pub fn for_game(game_type: GameType) -> &'static GameRules {
        match game_type {
            GameType::Chess => &CHESS,
            GameType::Solitaire => &SOLITAIRE,
            GameType::Yahtzee => &YAHTZEE,
            GameType::Backgammon => &BACKGAMMON,
            GameType::Tiles2048 => &TILES_2048,
        }
    }
}
