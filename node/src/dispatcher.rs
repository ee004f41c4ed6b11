// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Validation pipeline.
//!
//! Stages run cheapest first: rate limit, parse, format, replay, anchor
//! re-verification, fraud scoring. A hard failure ends the run. An
//! unreachable oracle only skips its stage. The level decides how far the
//! pipeline goes.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use fairplay_kernel::{
    BlockAnchor, CheckOutcome, ErrorKind, ReplayContext, Reveal, Status, Submission, ValidationError,
    ValidationLevel, ValidationResult,
};
use serde_json::Value;

use crate::config::FraudConfig;
use crate::errors::OracleError;
use crate::fraud::{self, FraudContext, HistoryRegistry};
use crate::leaderboard::{Leaderboard, LeaderboardEntry, ReviewItem, ReviewQueue};
use crate::oracle::{bounded, BlockInfo, BlockchainOracle};
use crate::rate_limit::RateLimiter;
use crate::sessions::SessionService;
use crate::telemetry::{SUBMISSIONS, VALIDATION_DURATION};

pub const FLAG_ORACLE_UNVERIFIED: &str = "oracle_unverified";

/// Shared collaborators. Each is internally synchronised, so the
/// dispatcher itself holds no mutable state.
pub struct Dispatcher {
    pub level: ValidationLevel,
    pub fraud: FraudConfig,
    pub oracle_timeout: Duration,
    pub limiter: Arc<RateLimiter>,
    pub history: Arc<HistoryRegistry>,
    pub sessions: Arc<SessionService>,
    pub oracle: Arc<dyn BlockchainOracle>,
    pub leaderboard: Arc<dyn Leaderboard>,
    pub reviews: Arc<dyn ReviewQueue>,
}

impl Dispatcher {
    /// Validates one submission body and routes the outcome.
    pub async fn submit(&self, body: &Value) -> ValidationResult {
        let started = Instant::now();
        let (result, submission) = self.validate(body).await;

        if let Some(submission) = &submission {
            self.route(submission, &result);
        }

        metrics::counter!(SUBMISSIONS, 1, "status" => result.status.as_str());
        metrics::histogram!(VALIDATION_DURATION, started.elapsed().as_secs_f64());
        let game_id = body.get("gameId").and_then(serde_json::Value::as_str).unwrap_or("?");
        tracing::info!(
            "submission {} -> {} (risk {})",
            game_id,
            result.status.as_str(),
            result.risk_score
        );
        result
    }

    /// Runs the pipeline without side effects on the leaderboard.
    pub async fn validate(&self, body: &Value) -> (ValidationResult, Option<Submission>) {
        let level = self.level;
        let mut result = ValidationResult::new(level);

        // Rate limit
        let identity = body
            .get("player")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|p| !p.is_empty());
        if level < ValidationLevel::Full {
            result.skip("rate_limit", "validation level below FULL");
        } else if !self.limiter.enabled() {
            result.skip("rate_limit", "rate limiting disabled");
        } else if let Some(identity) = identity {
            if !self.limiter.allow(identity) {
                result.fail(
                    "rate_limit",
                    ValidationError::new(ErrorKind::RateLimited, "too many submissions, retry later")
                        .with("player", identity),
                );
                return (result, None);
            }
            result.pass("rate_limit");
        } else {
            // Nothing to bucket by; the submission is rejected below.
            result.skip("rate_limit", "no player identity");
        }

        // Parse
        let submission = match Submission::parse(body) {
            Ok(s) => s,
            Err(e) => {
                result.fail("parse", e);
                return (result, None);
            }
        };
        result.pass("parse");
        result.details.insert("gameType".into(), submission.game_type().as_str().into());

        // Format
        if let Err(e) = submission.check_format() {
            result.fail("format", e);
            return (result, Some(submission));
        }
        result.pass("format");

        // Replay
        let mut anchor = submission.meta().anchor.clone();
        if level >= ValidationLevel::Logic {
            let ctx = match self.replay_context(&submission) {
                Ok(ctx) => ctx,
                Err(e) => {
                    result.fail("replay", e);
                    return (result, Some(submission));
                }
            };
            anchor = ctx.anchor.clone();
            match submission.replay(&ctx) {
                Ok(report) => {
                    result.calculated_score = Some(report.calculated_score);
                    result.details.extend(report.details);
                    result.warnings.extend(report.warnings);
                    result.pass("replay");
                }
                Err(e) => {
                    result.fail("replay", e);
                    return (result, Some(submission));
                }
            }
        } else {
            result.skip("replay", "validation level BASIC");
        }

        // Anchor
        if level >= ValidationLevel::Blockchain {
            if let Err(e) = self.check_anchor(anchor.as_ref(), &mut result).await {
                result.fail("blockchain", e);
                return (result, Some(submission));
            }
        } else {
            result.skip("blockchain", "validation level below BLOCKCHAIN");
        }

        // Fraud
        if level >= ValidationLevel::Full && self.fraud.enabled {
            let meta = submission.meta();
            let ctx = FraudContext {
                previous_best: self
                    .leaderboard
                    .best_score(&meta.player, submission.game_type(), &meta.game_id),
                duplicate_of: submission
                    .history_fingerprint()
                    .and_then(|fp| self.history.observe(&fp, &meta.game_id)),
            };
            let risk = fraud::score(&submission, &ctx);
            result.risk_score = risk.risk_score;
            result.flags.extend(risk.flags);
            if let Some(other) = ctx.duplicate_of {
                result.details.insert("duplicateOf".into(), other.into());
            }

            if risk.risk_score >= self.fraud.review_threshold {
                let flags: Vec<&str> = result.flags.iter().map(String::as_str).collect();
                let err = ValidationError::new(
                    ErrorKind::SuspiciousRisk,
                    format!("risk score {} needs manual review", risk.risk_score),
                )
                .with("riskScore", risk.risk_score)
                .with("threshold", self.fraud.review_threshold)
                .with("signals", flags.join(","));
                result.fail("fraud", err);
            } else {
                result.pass("fraud");
            }
        } else if level < ValidationLevel::Full {
            result.skip("fraud", "validation level below FULL");
        } else {
            result.skip("fraud", "fraud detection disabled");
        }

        (result, Some(submission))
    }

    /// Reveal and anchor from the submission, merged with the stored
    /// session when one is named. Disagreement between the two is a
    /// commitment failure. A reveal is only trusted when it belongs to a
    /// session this node issued.
    fn replay_context(&self, submission: &Submission) -> Result<ReplayContext, ValidationError> {
        let meta = submission.meta();
        let mut reveal: Option<Reveal> = meta.reveal.clone();
        let mut anchor: Option<BlockAnchor> = meta.anchor.clone();

        if meta.session_id.is_none() && reveal.is_some() {
            return Err(ValidationError::commitment_mismatch(
                "reveal is not bound to a server-issued session; submit its sessionId",
            ));
        }

        if let Some(id) = &meta.session_id {
            let session = self
                .sessions
                .ended(id)
                .map_err(|e| ValidationError::invalid_argument(e.to_string()))?
                .ok_or_else(|| {
                    ValidationError::invalid_argument("sessionId does not name an ended session")
                        .with("sessionId", id.as_str())
                })?;
            if session.game_type != submission.game_type() {
                return Err(ValidationError::invalid_argument(format!(
                    "session {} was started for {}",
                    id, session.game_type
                ))
                .with("sessionId", id.as_str()));
            }

            let stored = session.reveal().ok_or_else(|| {
                ValidationError::invalid_argument("session has no reveal").with("sessionId", id.as_str())
            })?;
            if let Some(given) = &reveal {
                let same = given.server_secret.eq_ignore_ascii_case(&stored.server_secret)
                    && given.secret_hash.eq_ignore_ascii_case(&stored.secret_hash);
                if !same {
                    return Err(ValidationError::commitment_mismatch(
                        "submitted reveal differs from the session's reveal",
                    )
                    .with("sessionId", id.as_str()));
                }
            }
            reveal = Some(stored);

            match (&anchor, &session.anchor) {
                (Some(given), Some(stored)) if given != stored => {
                    return Err(ValidationError::commitment_mismatch(
                        "submitted anchor differs from the session's anchor",
                    )
                    .with("sessionId", id.as_str()));
                }
                (None, Some(stored)) => anchor = Some(stored.clone()),
                _ => {}
            }
        }

        Ok(ReplayContext::new(reveal, anchor))
    }

    /// Re-reads the anchored block. Contradicting data is a hard failure;
    /// an unreachable oracle or a missing anchor marks the check skipped.
    async fn check_anchor(
        &self,
        anchor: Option<&BlockAnchor>,
        result: &mut ValidationResult,
    ) -> Result<(), ValidationError> {
        let Some(anchor) = anchor else {
            result.skip("blockchain", "no anchor");
            result.warn("blockchain check skipped: submission has no anchor");
            result.flags.insert(FLAG_ORACLE_UNVERIFIED.to_string());
            return Ok(());
        };

        match bounded(self.oracle_timeout, self.oracle.get_block(&anchor.block_hash)).await {
            Ok(block) => {
                verify_anchor(anchor, &block)?;
                result.pass("blockchain");
                Ok(())
            }
            Err(OracleError::NotFound(_)) => Err(ValidationError::new(
                ErrorKind::AnchorMismatch,
                "anchored block is unknown to the oracle",
            )
            .with("blockHash", anchor.block_hash.as_str())),
            Err(e) => {
                result.skip("blockchain", e.to_string());
                result.warn(format!("blockchain check skipped: {e}"));
                result.flags.insert(FLAG_ORACLE_UNVERIFIED.to_string());
                Ok(())
            }
        }
    }

    fn route(&self, submission: &Submission, result: &ValidationResult) {
        let meta = submission.meta();
        match result.status {
            Status::Accepted => self.leaderboard.record(LeaderboardEntry {
                game_id: meta.game_id.clone(),
                game_type: submission.game_type(),
                player: meta.player.clone(),
                score: meta.score,
                risk_score: result.risk_score,
                recorded_at: Utc::now(),
            }),
            Status::Review => self.reviews.enqueue(ReviewItem {
                game_id: meta.game_id.clone(),
                game_type: submission.game_type(),
                player: meta.player.clone(),
                score: meta.score,
                risk_score: result.risk_score,
                flags: result.flags.iter().cloned().collect(),
                queued_at: Utc::now(),
            }),
            Status::Rejected | Status::RateLimited => {}
        }
    }
}

/// Compares a submitted anchor with the block the oracle returned.
pub fn verify_anchor(anchor: &BlockAnchor, block: &BlockInfo) -> Result<(), ValidationError> {
    let mismatch = |field: &str, expected: Value, actual: Value| {
        ValidationError::new(ErrorKind::AnchorMismatch, format!("anchor {field} does not match the block"))
            .with("field", field)
            .expected_actual(expected, actual)
    };

    if !anchor.block_hash.eq_ignore_ascii_case(&block.hash) {
        return Err(mismatch("blockHash", block.hash.clone().into(), anchor.block_hash.clone().into()));
    }
    if anchor.block_height != block.height {
        return Err(mismatch("blockHeight", block.height.into(), anchor.block_height.into()));
    }
    if anchor.timestamp != block.timestamp {
        return Err(mismatch("timestamp", block.timestamp.into(), anchor.timestamp.into()));
    }
    if let Some(tx) = &anchor.tx_hash {
        let position = block.transactions.iter().position(|t| t == tx);
        match (position, anchor.tx_index) {
            (None, _) => return Err(mismatch("txHash", Value::Null, tx.clone().into())),
            (Some(found), Some(claimed)) if found != claimed as usize => {
                return Err(mismatch("txIndex", found.into(), claimed.into()));
            }
            _ => {}
        }
    }
    Ok(())
}

/// HTTP status for a finished validation.
pub fn http_status(result: &ValidationResult) -> axum::http::StatusCode {
    use axum::http::StatusCode;
    match result.status {
        Status::Accepted => StatusCode::OK,
        Status::Review => StatusCode::ACCEPTED,
        Status::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        Status::Rejected => {
            let unparseable = result
                .checks
                .iter()
                .any(|c| c.name == "parse" && c.outcome == CheckOutcome::Failed);
            if unparseable {
                StatusCode::BAD_REQUEST
            } else {
                StatusCode::UNPROCESSABLE_ENTITY
            }
        }
    }
}
