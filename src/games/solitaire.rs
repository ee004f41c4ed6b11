// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Klondike solitaire: formula and bounds.
//!
//! The score is the number of cards on the foundations. Every one of those
//! cards needed at least one move to get there. When the reveal is available
//! and the client reports the deal it played, the deal must be the seeded
//! shuffle for `deck-shuffle`.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};
use crate::games::{GameReplay, ReplayContext, ReplayReport};
use crate::rng::shuffle;
use crate::rules::{GameRules, DECK_SIZE};
use crate::seed::PURPOSE_DECK_SHUFFLE;
use crate::submission::SubmissionMeta;
use crate::types::enums::GameType;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolitaireSubmission {
    #[serde(flatten)]
    pub meta: SubmissionMeta,
    pub foundation_cards: u64,
    pub moves: u64,
    /// Card indices 0..52 in dealt order.
    #[serde(default)]
    pub deck_order: Option<Vec<u8>>,
}

impl GameReplay for SolitaireSubmission {
    fn game_type(&self) -> GameType {
        GameType::Solitaire
    }

    fn meta(&self) -> &SubmissionMeta {
        &self.meta
    }

    fn move_count(&self) -> u64 {
        self.moves
    }

    /// Only the reported deal identifies a game; counts alone are shared
    /// by many honest players.
    fn history_text(&self) -> Option<String> {
        let deck = self.deck_order.as_ref()?;
        let deck: Vec<String> = deck.iter().map(u8::to_string).collect();
        Some(format!("{}:{}:{}", self.foundation_cards, self.moves, deck.join(",")))
    }

    fn check_bounds(&self, _rules: &GameRules) -> Result<()> {
        if self.foundation_cards > DECK_SIZE {
            return Err(ValidationError::out_of_range(format!(
                "{} foundation cards exceeds a {DECK_SIZE} card deck",
                self.foundation_cards
            ))
            .with("foundationCards", self.foundation_cards));
        }
        if self.moves < self.foundation_cards {
            return Err(ValidationError::out_of_range(format!(
                "{} cards on the foundations need at least {} moves, got {}",
                self.foundation_cards, self.foundation_cards, self.moves
            ))
            .with("foundationCards", self.foundation_cards)
            .with("moves", self.moves));
        }
        if let Some(deck) = &self.deck_order {
            let mut seen = [false; DECK_SIZE as usize];
            if deck.len() != DECK_SIZE as usize {
                return Err(ValidationError::invalid_argument(format!(
                    "deckOrder must list {DECK_SIZE} cards, got {}",
                    deck.len()
                )));
            }
            for (i, &card) in deck.iter().enumerate() {
                let slot = seen.get_mut(card as usize).ok_or_else(|| {
                    ValidationError::invalid_argument(format!("deckOrder[{i}] = {card} is not a card index"))
                        .with("index", i)
                })?;
                if *slot {
                    return Err(ValidationError::invalid_argument(format!(
                        "deckOrder[{i}] repeats card {card}"
                    ))
                    .with("index", i));
                }
                *slot = true;
            }
        }
        Ok(())
    }

    fn replay(&self, ctx: &ReplayContext) -> Result<ReplayReport> {
        let mut report = ReplayReport::verified(self.foundation_cards)
            .detail("foundationCards", self.foundation_cards)
            .detail("moves", self.moves);

        match (&self.deck_order, ctx.seed(PURPOSE_DECK_SHUFFLE)) {
            (Some(deck), Some(seed)) => {
                let expected = shuffle(&seed, DECK_SIZE as usize);
                if let Some(index) = expected
                    .iter()
                    .zip(deck.iter())
                    .position(|(&want, &got)| want != got as usize)
                {
                    return Err(ValidationError::replay_mismatch(format!(
                        "deal differs from the seeded shuffle at position {index}"
                    ))
                    .with("index", index)
                    .expected_actual(expected[index], deck[index]));
                }
                report = report.detail("deckVerified", true);
            }
            (Some(_), None) => {
                report
                    .warnings
                    .push("deck order not verified: reveal or anchor missing".to_string());
                report = report.detail("deckVerified", false);
            }
            (None, _) => {}
        }
        Ok(report)
    }
}
