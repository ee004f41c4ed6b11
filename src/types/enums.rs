// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Closed enumerations used across the protocol.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// The supported games. Adding a variant forces every dispatch `match` to
/// handle it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GameType {
    #[serde(rename = "chess")]
    Chess,
    #[serde(rename = "solitaire")]
    Solitaire,
    #[serde(rename = "yahtzee")]
    Yahtzee,
    #[serde(rename = "backgammon")]
    Backgammon,
    #[serde(rename = "2048")]
    Tiles2048,
}

impl GameType {
    pub const ALL: [GameType; 5] = [
        GameType::Chess,
        GameType::Solitaire,
        GameType::Yahtzee,
        GameType::Backgammon,
        GameType::Tiles2048,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameType::Chess => "chess",
            GameType::Solitaire => "solitaire",
            GameType::Yahtzee => "yahtzee",
            GameType::Backgammon => "backgammon",
            GameType::Tiles2048 => "2048",
        }
    }

    /// How submissions for this game are checked.
    pub fn strategy(&self) -> ReplayStrategy {
        match self {
            GameType::Chess | GameType::Tiles2048 => ReplayStrategy::FullReplay,
            GameType::Solitaire | GameType::Yahtzee | GameType::Backgammon => {
                ReplayStrategy::FormulaBounds
            }
        }
    }
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GameType::ALL
            .iter()
            .copied()
            .find(|g| g.as_str() == s)
            .ok_or_else(|| {
                ValidationError::invalid_argument(format!("unsupported gameType '{s}'"))
                    .with("gameType", s)
            })
    }
}

/// The two validator shapes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplayStrategy {
    /// Every move is replayed against the game's legality rules.
    FullReplay,
    /// Structural bounds plus score recomputation from declared facts.
    FormulaBounds,
}

impl ReplayStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReplayStrategy::FullReplay => "full_replay",
            ReplayStrategy::FormulaBounds => "formula_bounds",
        }
    }
}

/// How much work the dispatcher does per submission. Each level includes the
/// ones before it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ValidationLevel {
    Basic,
    Logic,
    Blockchain,
    Full,
}

impl Default for ValidationLevel {
    fn default() -> Self {
        ValidationLevel::Full
    }
}

impl FromStr for ValidationLevel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BASIC" => Ok(ValidationLevel::Basic),
            "LOGIC" => Ok(ValidationLevel::Logic),
            "BLOCKCHAIN" => Ok(ValidationLevel::Blockchain),
            "FULL" => Ok(ValidationLevel::Full),
            other => Err(ValidationError::invalid_argument(format!(
                "unknown validation level '{other}'"
            ))),
        }
    }
}

/// AI opponent strength, shared by the games played against the house.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Score multiplier.
    pub fn value(&self) -> u64 {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Medium => 2,
            Difficulty::Hard => 3,
        }
    }
}
