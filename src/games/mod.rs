// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Game replay validators.
//!
//! Each supported game implements [`GameReplay`]. [`crate::submission::Submission`]
//! owns the only dispatch over the variants.

pub mod backgammon;
pub mod chess;
pub mod solitaire;
pub mod tiles;
pub mod yahtzee;

use serde_json::{Map, Value};

use crate::error::{Result, ValidationError};
use crate::rules::GameRules;
use crate::seed::{derive_anchored, Seed};
use crate::submission::SubmissionMeta;
use crate::types::anchor::{BlockAnchor, Reveal};
use crate::types::enums::GameType;

/// Everything a validator may consume besides the submission itself.
///
/// The dispatcher fills this from the submission and, when a session id is
/// given, from the stored reveal. The reveal has already been checked
/// against its commitment when a validator sees it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplayContext {
    pub reveal: Option<Reveal>,
    pub anchor: Option<BlockAnchor>,
}

impl ReplayContext {
    pub fn new(reveal: Option<Reveal>, anchor: Option<BlockAnchor>) -> Self {
        Self { reveal, anchor }
    }

    /// Seed for `purpose`, or `None` when reveal or anchor is missing.
    pub fn seed(&self, purpose: &str) -> Option<Seed> {
        let reveal = self.reveal.as_ref()?;
        let anchor = self.anchor.as_ref()?;
        let secret = reveal.server_secret.trim().to_ascii_lowercase();
        Some(derive_anchored(&secret, anchor, purpose))
    }

    /// Like [`ReplayContext::seed`] but a missing input is a hard failure.
    pub fn require_seed(&self, game: GameType, purpose: &str) -> Result<Seed> {
        self.seed(purpose).ok_or_else(|| {
            ValidationError::invalid_argument(format!(
                "{game} replay needs the revealed secret and block anchor"
            ))
            .with("purpose", purpose)
        })
    }
}

/// What a successful replay established.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplayReport {
    pub calculated_score: u64,
    /// False when the outcome rests on a claim the replay cannot check.
    pub verified: bool,
    pub warnings: Vec<String>,
    pub details: Map<String, Value>,
}

impl ReplayReport {
    pub fn verified(calculated_score: u64) -> Self {
        Self {
            calculated_score,
            verified: true,
            ..Default::default()
        }
    }

    pub fn detail(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.details.insert(key.to_string(), value.into());
        self
    }
}

/// Common contract of the per-game validators.
pub trait GameReplay {
    fn game_type(&self) -> GameType;

    fn meta(&self) -> &SubmissionMeta;

    /// Moves, plies, rolls or turns, in the unit the rules table uses.
    fn move_count(&self) -> u64;

    /// Canonical text of the move history, used for duplicate detection.
    /// `None` when the submission carries only a declared outcome.
    fn history_text(&self) -> Option<String>;

    /// Game specific structural checks that need no reveal.
    fn check_bounds(&self, rules: &GameRules) -> Result<()>;

    /// Recomputes the outcome. The caller compares the score.
    fn replay(&self, ctx: &ReplayContext) -> Result<ReplayReport>;
}
