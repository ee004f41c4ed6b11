// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Strictly typed score submissions.
//!
//! Incoming JSON is parsed into one variant per game before any validator
//! runs. A shape that does not deserialize is an `InvalidArgument`; nothing
//! loosely typed ever reaches scoring arithmetic.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::error::{Result, ValidationError};
use crate::games::backgammon::BackgammonSubmission;
use crate::games::chess::ChessSubmission;
use crate::games::solitaire::SolitaireSubmission;
use crate::games::tiles::TilesSubmission;
use crate::games::yahtzee::YahtzeeSubmission;
use crate::games::{GameReplay, ReplayContext, ReplayReport};
use crate::rules::GameRules;
use crate::types::anchor::{BlockAnchor, Reveal};
use crate::types::enums::GameType;
use crate::types::id::GameId;

pub const PLAYER_MAX_LEN: usize = 64;

/// Fields shared by every game's submission.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionMeta {
    pub game_id: String,
    pub player: String,
    pub score: u64,
    pub duration_ms: u64,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub anchor: Option<BlockAnchor>,
    #[serde(default)]
    pub reveal: Option<Reveal>,
    #[serde(default)]
    pub move_times_ms: Option<Vec<u64>>,
}

/// A parsed submission, one variant per supported game.
#[derive(Clone, Debug, PartialEq)]
pub enum Submission {
    Chess(ChessSubmission),
    Solitaire(SolitaireSubmission),
    Yahtzee(YahtzeeSubmission),
    Backgammon(BackgammonSubmission),
    Tiles2048(TilesSubmission),
}

impl Submission {
    /// Reads `gameType` first so unknown games are rejected before any
    /// game specific parsing, then deserializes the matching variant.
    pub fn parse(value: &Value) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| ValidationError::invalid_argument("submission must be a JSON object"))?;
        let game_type: GameType = object
            .get("gameType")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                ValidationError::invalid_argument("missing gameType").with("field", "gameType")
            })?
            .parse()?;

        let malformed = |e: serde_json::Error| {
            ValidationError::invalid_argument(format!("malformed {game_type} submission: {e}"))
                .with("gameType", game_type.as_str())
        };

        let parsed = match game_type {
            GameType::Chess => Submission::Chess(serde_json::from_value(value.clone()).map_err(malformed)?),
            GameType::Solitaire => {
                Submission::Solitaire(serde_json::from_value(value.clone()).map_err(malformed)?)
            }
            GameType::Yahtzee => Submission::Yahtzee(serde_json::from_value(value.clone()).map_err(malformed)?),
            GameType::Backgammon => {
                Submission::Backgammon(serde_json::from_value(value.clone()).map_err(malformed)?)
            }
            GameType::Tiles2048 => {
                Submission::Tiles2048(serde_json::from_value(value.clone()).map_err(malformed)?)
            }
        };
        Ok(parsed)
    }

    /// The single dispatch point over the game variants.
    fn game(&self) -> &dyn GameReplay {
        match self {
            Submission::Chess(s) => s,
            Submission::Solitaire(s) => s,
            Submission::Yahtzee(s) => s,
            Submission::Backgammon(s) => s,
            Submission::Tiles2048(s) => s,
        }
    }

    pub fn game_type(&self) -> GameType {
        self.game().game_type()
    }

    pub fn rules(&self) -> &'static GameRules {
        GameRules::for_game(self.game_type())
    }

    pub fn meta(&self) -> &SubmissionMeta {
        self.game().meta()
    }

    pub fn move_count(&self) -> u64 {
        self.game().move_count()
    }

    /// SHA-256 over the game type and its canonical move history, or
    /// `None` for games that submit no history.
    pub fn history_fingerprint(&self) -> Option<String> {
        let history = self.game().history_text()?;
        let mut hasher = Sha256::new();
        hasher.update(self.game_type().as_str().as_bytes());
        hasher.update(b"|");
        hasher.update(history.as_bytes());
        Some(hex::encode(hasher.finalize()))
    }

    /// Format and range checks. Cheap, needs no reveal.
    pub fn check_format(&self) -> Result<GameId> {
        let meta = self.meta();
        let rules = self.rules();

        let game_id = GameId::parse(self.game_type(), &meta.game_id)?;

        let player = meta.player.trim();
        if player.is_empty() || player.len() > PLAYER_MAX_LEN {
            return Err(ValidationError::invalid_argument(format!(
                "player must be 1-{PLAYER_MAX_LEN} characters"
            ))
            .with("field", "player"));
        }
        if meta.duration_ms == 0 {
            return Err(ValidationError::invalid_argument("durationMs must be positive")
                .with("field", "durationMs"));
        }

        if meta.score < rules.score_min || meta.score > rules.score_max {
            return Err(ValidationError::out_of_range(format!(
                "score {} outside {}..={} for {}",
                meta.score,
                rules.score_min,
                rules.score_max,
                self.game_type()
            ))
            .with("score", meta.score)
            .with("min", rules.score_min)
            .with("max", rules.score_max));
        }

        self.game().check_bounds(rules)?;

        let moves = self.move_count();
        if moves < rules.moves_min || moves > rules.moves_max {
            return Err(ValidationError::out_of_range(format!(
                "move count {moves} outside {}..={} for {}",
                rules.moves_min,
                rules.moves_max,
                self.game_type()
            ))
            .with("moves", moves)
            .with("min", rules.moves_min)
            .with("max", rules.moves_max));
        }

        if moves > 0 && meta.duration_ms / moves < rules.min_ms_per_move {
            return Err(ValidationError::out_of_range(format!(
                "{moves} moves in {}ms is faster than {}ms per move",
                meta.duration_ms, rules.min_ms_per_move
            ))
            .with("moves", moves)
            .with("durationMs", meta.duration_ms)
            .with("minMsPerMove", rules.min_ms_per_move));
        }

        Ok(game_id)
    }

    /// Runs the game's replay validator. A reveal, when present, is checked
    /// against its commitment before anything is derived from it.
    pub fn replay(&self, ctx: &ReplayContext) -> Result<ReplayReport> {
        if let Some(reveal) = &ctx.reveal {
            crate::commitment::verify_commitment(&reveal.server_secret, &reveal.secret_hash)?;
        }
        let mut report = self.game().replay(ctx)?;
        report
            .details
            .insert("strategy".into(), self.game_type().strategy().as_str().into());

        let claimed = self.meta().score;
        if report.calculated_score != claimed {
            return Err(ValidationError::replay_mismatch(format!(
                "claimed score {claimed} but replay computes {}",
                report.calculated_score
            ))
            .expected_actual(report.calculated_score, claimed)
            .with("calculatedScore", report.calculated_score));
        }
        Ok(report)
    }
}
