// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Chess: full replay.
//!
//! Every move is resolved against the legal moves of the replayed position.
//! The claimed result is then compared with the final position. Terminal
//! reasons the board proves (checkmate, stalemate, dead position,
//! repetition, fifty moves) are checked; reasons it cannot prove
//! (resignation, timeout, agreement) are accepted but marked unverified.

pub mod notation;
pub mod position;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};
use crate::games::{GameReplay, ReplayContext, ReplayReport};
use crate::rules::GameRules;
use crate::submission::SubmissionMeta;
use crate::types::enums::{Difficulty, GameType};

use self::notation::{resolve, NotationError};
pub use self::position::{Color, Position};

/// Points per outcome before the difficulty multiplier.
pub const WIN_POINTS: u64 = 3;
pub const DRAW_POINTS: u64 = 1;
pub const LOSS_POINTS: u64 = 0;

pub const FIFTY_MOVE_PLIES: u32 = 100;
pub const REPETITIONS_FOR_DRAW: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalReason {
    Checkmate,
    Stalemate,
    InsufficientMaterial,
    ThreefoldRepetition,
    FiftyMoveRule,
    Resignation,
    Timeout,
    Agreement,
    InProgress,
}

impl TerminalReason {
    /// Whether the final position alone proves this reason.
    pub fn verifiable(&self) -> bool {
        matches!(
            self,
            TerminalReason::Checkmate
                | TerminalReason::Stalemate
                | TerminalReason::InsufficientMaterial
                | TerminalReason::ThreefoldRepetition
                | TerminalReason::FiftyMoveRule
        )
    }

    pub fn is_draw(&self) -> bool {
        matches!(
            self,
            TerminalReason::Stalemate
                | TerminalReason::InsufficientMaterial
                | TerminalReason::ThreefoldRepetition
                | TerminalReason::FiftyMoveRule
                | TerminalReason::Agreement
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChessResult {
    #[serde(default)]
    pub winner: Option<Color>,
    pub reason: TerminalReason,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChessSubmission {
    #[serde(flatten)]
    pub meta: SubmissionMeta,
    pub moves: Vec<String>,
    pub result: ChessResult,
    pub player_color: Color,
    pub difficulty: Difficulty,
}

/// Where a replay ended.
#[derive(Debug, Clone)]
pub struct ReplayedGame {
    pub position: Position,
    /// How many times the final position occurred.
    pub final_repetitions: usize,
}

/// Replays `moves` from the initial position. Stops at the first move that
/// cannot be parsed or is not legal, reporting its index.
pub fn replay_moves(moves: &[String]) -> Result<ReplayedGame> {
    let mut position = Position::start();
    let mut seen: HashMap<position::PositionKey, usize> = HashMap::new();
    seen.insert(position.key(), 1);

    for (i, text) in moves.iter().enumerate() {
        let mv = resolve(&position, text).map_err(|e| {
            let err = match e {
                NotationError::Unparseable => {
                    ValidationError::format_mismatch(format!("move {i} '{text}' is not SAN or UCI notation"))
                }
                NotationError::Illegal => {
                    ValidationError::replay_mismatch(format!("move {i} '{text}' is illegal in the replayed position"))
                }
                NotationError::Ambiguous => {
                    ValidationError::format_mismatch(format!("move {i} '{text}' is ambiguous"))
                }
            };
            err.with("moveIndex", i).with("move", text.as_str())
        })?;
        position = position.apply(&mv);
        *seen.entry(position.key()).or_insert(0) += 1;
    }

    let final_repetitions = seen.get(&position.key()).copied().unwrap_or(1);
    Ok(ReplayedGame { position, final_repetitions })
}

impl ChessSubmission {
    fn points(&self) -> u64 {
        let base = match self.result.winner {
            Some(c) if c == self.player_color => WIN_POINTS,
            Some(_) => LOSS_POINTS,
            None => DRAW_POINTS,
        };
        base * self.difficulty.value()
    }

    /// Compares the claim with what the final position proves.
    fn check_claim(&self, game: &ReplayedGame) -> Result<()> {
        let pos = &game.position;
        let to_move = pos.side_to_move();
        let no_moves = pos.legal_moves().is_empty();
        let mated = no_moves && pos.in_check(to_move);
        let stalemated = no_moves && !mated;
        let claim = self.result;

        let mismatch = |why: String| {
            ValidationError::replay_mismatch(why)
                .with("claimedReason", format!("{:?}", claim.reason))
                .with("moveCount", self.moves.len())
        };

        if claim.reason.is_draw() && claim.winner.is_some() {
            return Err(mismatch(format!("{:?} is a draw and cannot have a winner", claim.reason)));
        }
        if mated && claim.reason != TerminalReason::Checkmate {
            return Err(mismatch("final position is checkmate".to_string()));
        }
        if stalemated && claim.reason != TerminalReason::Stalemate {
            return Err(mismatch("final position is stalemate".to_string()));
        }

        match claim.reason {
            TerminalReason::Checkmate => {
                if !mated {
                    return Err(mismatch("claimed checkmate but the final position is not mate".into()));
                }
                let winner = to_move.opponent();
                if claim.winner != Some(winner) {
                    return Err(mismatch(format!("checkmate was delivered by {winner:?}"))
                        .with("expectedWinner", format!("{winner:?}").to_lowercase()));
                }
            }
            TerminalReason::Stalemate => {
                if !stalemated {
                    return Err(mismatch("claimed stalemate but the side to move has legal moves".into()));
                }
            }
            TerminalReason::InsufficientMaterial => {
                if !pos.insufficient_material() {
                    return Err(mismatch("mating material remains on the board".into()));
                }
            }
            TerminalReason::ThreefoldRepetition => {
                if game.final_repetitions < REPETITIONS_FOR_DRAW {
                    return Err(mismatch(format!(
                        "final position occurred {} time(s)",
                        game.final_repetitions
                    )));
                }
            }
            TerminalReason::FiftyMoveRule => {
                if pos.halfmove_clock < FIFTY_MOVE_PLIES {
                    return Err(mismatch(format!(
                        "only {} plies since the last capture or pawn move",
                        pos.halfmove_clock
                    )));
                }
            }
            TerminalReason::Resignation | TerminalReason::Timeout => {
                if claim.winner.is_none() {
                    return Err(mismatch(format!("{:?} needs a winner", claim.reason)));
                }
            }
            TerminalReason::Agreement => {}
            TerminalReason::InProgress => {
                return Err(ValidationError::invalid_argument("game still in progress"));
            }
        }
        Ok(())
    }
}

impl GameReplay for ChessSubmission {
    fn game_type(&self) -> GameType {
        GameType::Chess
    }

    fn meta(&self) -> &SubmissionMeta {
        &self.meta
    }

    fn move_count(&self) -> u64 {
        self.moves.len() as u64
    }

    fn history_text(&self) -> Option<String> {
        Some(self.moves.join(" "))
    }

    fn check_bounds(&self, _rules: &GameRules) -> Result<()> {
        if self.result.reason == TerminalReason::InProgress {
            return Err(ValidationError::invalid_argument("game still in progress")
                .with("moveCount", self.moves.len()));
        }
        Ok(())
    }

    fn replay(&self, _ctx: &ReplayContext) -> Result<ReplayReport> {
        let game = replay_moves(&self.moves)?;
        self.check_claim(&game)?;

        let mut report = ReplayReport::verified(self.points())
            .detail("reason", format!("{:?}", self.result.reason))
            .detail("plies", self.moves.len())
            .detail("fullmove", game.position.fullmove);

        if !self.result.reason.verifiable() {
            report.verified = false;
            report
                .warnings
                .push(format!("{:?}: unverifiable terminal reason, trusted", self.result.reason));
        }
        let verified = report.verified;
        report = report.detail("verified", verified);
        Ok(report)
    }
}
