// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Backgammon: formula and bounds.
//!
//! Dice are not replayed. The score is recomputed from the declared outcome
//! as `winType x cubeValue x difficulty` when the player won, zero otherwise.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};
use crate::games::{GameReplay, ReplayContext, ReplayReport};
use crate::rules::GameRules;
use crate::submission::SubmissionMeta;
use crate::types::enums::{Difficulty, GameType};

/// Legal doubling cube faces.
pub const CUBE_VALUES: [u64; 7] = [1, 2, 4, 8, 16, 32, 64];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Winner {
    Player,
    Opponent,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WinType {
    Normal,
    Gammon,
    Backgammon,
}

impl WinType {
    pub fn value(&self) -> u64 {
        match self {
            WinType::Normal => 1,
            WinType::Gammon => 2,
            WinType::Backgammon => 3,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackgammonSubmission {
    #[serde(flatten)]
    pub meta: SubmissionMeta,
    pub winner: Winner,
    pub win_type: WinType,
    pub cube_value: u64,
    pub difficulty: Difficulty,
    /// Turns taken by the player.
    pub moves: u64,
}

/// Expected score for a declared outcome.
pub fn expected_score(winner: Winner, win_type: WinType, cube_value: u64, difficulty: Difficulty) -> u64 {
    match winner {
        Winner::Player => win_type.value() * cube_value * difficulty.value(),
        Winner::Opponent => 0,
    }
}

impl GameReplay for BackgammonSubmission {
    fn game_type(&self) -> GameType {
        GameType::Backgammon
    }

    fn meta(&self) -> &SubmissionMeta {
        &self.meta
    }

    fn move_count(&self) -> u64 {
        self.moves
    }

    fn history_text(&self) -> Option<String> {
        None
    }

    fn check_bounds(&self, _rules: &GameRules) -> Result<()> {
        if !CUBE_VALUES.contains(&self.cube_value) {
            return Err(ValidationError::out_of_range(format!(
                "cube value {} is not a power of two in 1..=64",
                self.cube_value
            ))
            .with("cubeValue", self.cube_value));
        }
        Ok(())
    }

    fn replay(&self, _ctx: &ReplayContext) -> Result<ReplayReport> {
        let score = expected_score(self.winner, self.win_type, self.cube_value, self.difficulty);
        Ok(ReplayReport::verified(score)
            .detail("winTypeValue", self.win_type.value())
            .detail("cubeValue", self.cube_value)
            .detail("difficultyValue", self.difficulty.value())
            .detail("formula", "winType x cubeValue x difficulty"))
    }
}
