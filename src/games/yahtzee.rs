// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Yahtzee: formula and bounds.
//!
//! A finished card declares the five dice kept for each of the 13 boxes and
//! the score written in it. Each box is rescored from its dice; the total is
//! the sum plus the upper section bonus.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};
use crate::games::{GameReplay, ReplayContext, ReplayReport};
use crate::rules::{GameRules, YAHTZEE_CATEGORIES, YAHTZEE_ROLLS_PER_TURN};
use crate::submission::SubmissionMeta;
use crate::types::enums::GameType;

pub const UPPER_BONUS_THRESHOLD: u64 = 63;
pub const UPPER_BONUS: u64 = 35;
pub const FULL_HOUSE_SCORE: u64 = 25;
pub const SMALL_STRAIGHT_SCORE: u64 = 30;
pub const LARGE_STRAIGHT_SCORE: u64 = 40;
pub const YAHTZEE_SCORE: u64 = 50;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Ones,
    Twos,
    Threes,
    Fours,
    Fives,
    Sixes,
    ThreeOfAKind,
    FourOfAKind,
    FullHouse,
    SmallStraight,
    LargeStraight,
    Yahtzee,
    Chance,
}

impl Category {
    /// Face counted by an upper section box.
    pub fn upper_face(&self) -> Option<u8> {
        match self {
            Category::Ones => Some(1),
            Category::Twos => Some(2),
            Category::Threes => Some(3),
            Category::Fours => Some(4),
            Category::Fives => Some(5),
            Category::Sixes => Some(6),
            _ => None,
        }
    }

    /// Score of `dice` in this box. Faces outside 1-6 are out of range.
    pub fn score(&self, dice: &[u8; 5]) -> Result<u64> {
        let mut counts = [0u8; 7];
        for &d in dice {
            if !(1..=6).contains(&d) {
                return Err(ValidationError::out_of_range(format!(
                    "{self:?} holds die value {d}, dice show 1-6"
                ))
                .with("category", format!("{self:?}")));
            }
            counts[d as usize] += 1;
        }
        let total: u64 = dice.iter().map(|&d| d as u64).sum();
        let max_count = counts.iter().copied().max().unwrap_or(0);
        let has_run = |start: usize, len: usize| (start..start + len).all(|f| counts[f] > 0);

        if let Some(face) = self.upper_face() {
            return Ok(counts[face as usize] as u64 * face as u64);
        }
        let score = match self {
            Category::ThreeOfAKind if max_count >= 3 => total,
            Category::FourOfAKind if max_count >= 4 => total,
            Category::FullHouse => {
                let mut shape: Vec<u8> = counts.iter().copied().filter(|&c| c > 0).collect();
                shape.sort_unstable();
                if shape == [2, 3] {
                    FULL_HOUSE_SCORE
                } else {
                    0
                }
            }
            Category::SmallStraight if (1..=3).any(|s| has_run(s, 4)) => SMALL_STRAIGHT_SCORE,
            Category::LargeStraight if (1..=2).any(|s| has_run(s, 5)) => LARGE_STRAIGHT_SCORE,
            Category::Yahtzee if max_count == 5 => YAHTZEE_SCORE,
            Category::Chance => total,
            _ => 0,
        };
        Ok(score)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxEntry {
    pub dice: [u8; 5],
    pub score: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahtzeeSubmission {
    #[serde(flatten)]
    pub meta: SubmissionMeta,
    pub categories: BTreeMap<Category, BoxEntry>,
    /// Total dice rolls over the game.
    pub rolls: u64,
}

/// Card total: every box plus the upper bonus when earned.
pub fn card_total(categories: &BTreeMap<Category, BoxEntry>) -> (u64, u64, bool) {
    let upper: u64 = categories
        .iter()
        .filter(|(c, _)| c.upper_face().is_some())
        .map(|(_, e)| e.score)
        .sum();
    let all: u64 = categories.values().map(|e| e.score).sum();
    let bonus = upper >= UPPER_BONUS_THRESHOLD;
    (all + if bonus { UPPER_BONUS } else { 0 }, upper, bonus)
}

impl GameReplay for YahtzeeSubmission {
    fn game_type(&self) -> GameType {
        GameType::Yahtzee
    }

    fn meta(&self) -> &SubmissionMeta {
        &self.meta
    }

    fn move_count(&self) -> u64 {
        self.rolls
    }

    fn history_text(&self) -> Option<String> {
        let text = self
            .categories
            .iter()
            .map(|(c, e)| {
                let dice: Vec<String> = e.dice.iter().map(u8::to_string).collect();
                format!("{:?}={}/{}", c, dice.join(""), e.score)
            })
            .collect::<Vec<_>>()
            .join(";");
        Some(text)
    }

    fn check_bounds(&self, _rules: &GameRules) -> Result<()> {
        let filled = self.categories.len() as u64;
        if filled != YAHTZEE_CATEGORIES {
            return Err(ValidationError::out_of_range(format!(
                "a finished card fills all {YAHTZEE_CATEGORIES} boxes, got {filled}"
            ))
            .with("filled", filled));
        }
        for (category, entry) in &self.categories {
            category.score(&entry.dice)?;
        }
        if self.rolls < filled || self.rolls > filled * YAHTZEE_ROLLS_PER_TURN {
            return Err(ValidationError::out_of_range(format!(
                "{} rolls cannot fill {filled} boxes (1-{} rolls per box)",
                self.rolls, YAHTZEE_ROLLS_PER_TURN
            ))
            .with("rolls", self.rolls));
        }
        Ok(())
    }

    fn replay(&self, _ctx: &ReplayContext) -> Result<ReplayReport> {
        for (category, entry) in &self.categories {
            let expected = category.score(&entry.dice)?;
            if expected != entry.score {
                return Err(ValidationError::replay_mismatch(format!(
                    "{category:?} with dice {:?} scores {expected}, card says {}",
                    entry.dice, entry.score
                ))
                .with("category", format!("{category:?}"))
                .expected_actual(expected, entry.score));
            }
        }
        let (total, upper, bonus) = card_total(&self.categories);
        Ok(ReplayReport::verified(total)
            .detail("upperSection", upper)
            .detail("upperBonus", bonus))
    }
}
