// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Heuristic fraud scoring.
//!
//! Each signal adds a fixed weight when it fires and the sum is clamped to
//! 100. Scoring reports; it never rejects. The dispatcher compares the
//! score with the review threshold.

use std::collections::{BTreeSet, HashMap, VecDeque};

use fairplay_kernel::Submission;
use parking_lot::Mutex;

pub const FAST_PLAY: (&str, u8) = ("fast_play", 30);
pub const SCORE_RATE_ANOMALY: (&str, u8) = ("score_rate_anomaly", 25);
pub const DUPLICATE_HISTORY: (&str, u8) = ("duplicate_history", 40);
pub const ROBOTIC_TIMING: (&str, u8) = ("robotic_timing", 20);
pub const SCORE_JUMP: (&str, u8) = ("score_jump", 15);
pub const MAX_SCORE_SPEEDRUN: (&str, u8) = ("max_score_speedrun", 15);

pub const MAX_RISK: u8 = 100;
/// Think-time samples needed before timing regularity means anything.
pub const ROBOTIC_MIN_SAMPLES: usize = 10;
/// Coefficient of variation below which think times look scripted.
pub const ROBOTIC_MAX_CV: f64 = 0.1;
/// A new score above this multiple of the player's best is a jump.
pub const SCORE_JUMP_FACTOR: u64 = 3;

/// Optional context gathered by the dispatcher. Anything missing simply
/// does not contribute.
#[derive(Debug, Clone, Default)]
pub struct FraudContext {
    /// Player's best accepted score for this game type, excluding this game id.
    pub previous_best: Option<u64>,
    /// Another game id that submitted the same move history.
    pub duplicate_of: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RiskAssessment {
    pub risk_score: u8,
    pub flags: BTreeSet<String>,
}

impl RiskAssessment {
    fn raise(&mut self, (flag, weight): (&str, u8)) {
        if self.flags.insert(flag.to_string()) {
            self.risk_score = self.risk_score.saturating_add(weight).min(MAX_RISK);
        }
    }
}

pub fn score(submission: &Submission, ctx: &FraudContext) -> RiskAssessment {
    let mut risk = RiskAssessment::default();
    let meta = submission.meta();
    let rules = submission.rules();
    let secs = meta.duration_ms as f64 / 1000.0;

    if secs > 0.0 {
        let moves_per_sec = submission.move_count() as f64 / secs;
        if moves_per_sec > rules.max_moves_per_sec {
            risk.raise(FAST_PLAY);
        }
        let score_per_min = meta.score as f64 / (secs / 60.0);
        if score_per_min > rules.max_score_per_min {
            risk.raise(SCORE_RATE_ANOMALY);
        }
    }

    if ctx.duplicate_of.is_some() {
        risk.raise(DUPLICATE_HISTORY);
    }

    if let Some(times) = &meta.move_times_ms {
        if is_robotic(times) {
            risk.raise(ROBOTIC_TIMING);
        }
    }

    if let Some(best) = ctx.previous_best.filter(|&b| b > 0) {
        if meta.score > best.saturating_mul(SCORE_JUMP_FACTOR) {
            risk.raise(SCORE_JUMP);
        }
    }

    if meta.score >= rules.score_max && meta.duration_ms < rules.min_duration_for_max_ms {
        risk.raise(MAX_SCORE_SPEEDRUN);
    }

    risk
}

/// Think times too regular to be human.
pub fn is_robotic(times: &[u64]) -> bool {
    if times.len() < ROBOTIC_MIN_SAMPLES {
        return false;
    }
    let n = times.len() as f64;
    let mean = times.iter().map(|&t| t as f64).sum::<f64>() / n;
    if mean <= 0.0 {
        return false;
    }
    let variance = times.iter().map(|&t| (t as f64 - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt() / mean < ROBOTIC_MAX_CV
}

/// Bounded map from move-history fingerprint to the game id that first
/// submitted it. Oldest entries are forgotten first.
#[derive(Debug)]
pub struct HistoryRegistry {
    capacity: usize,
    inner: Mutex<Registry>,
}

#[derive(Debug, Default)]
struct Registry {
    owners: HashMap<String, String>,
    order: VecDeque<String>,
}

impl HistoryRegistry {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            inner: Mutex::new(Registry::default()),
        }
    }

    /// Records `fingerprint` for `game_id`. Returns the earlier owner when a
    /// different game id already submitted the same history; resubmitting
    /// the same game id is not a duplicate.
    pub fn observe(&self, fingerprint: &str, game_id: &str) -> Option<String> {
        let mut reg = self.inner.lock();
        if let Some(owner) = reg.owners.get(fingerprint) {
            return (owner != game_id).then(|| owner.clone());
        }
        if reg.order.len() >= self.capacity {
            if let Some(old) = reg.order.pop_front() {
                reg.owners.remove(&old);
            }
        }
        reg.owners.insert(fingerprint.to_string(), game_id.to_string());
        reg.order.push_back(fingerprint.to_string());
        None
    }

    pub fn len(&self) -> usize {
        self.inner.lock().order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
