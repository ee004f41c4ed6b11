// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Error types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Stable classification of every way a submission can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Missing or malformed field.
    InvalidArgument,
    /// Score or move count outside the game's bounds.
    OutOfRange,
    /// Game id pattern or move notation does not match.
    FormatMismatch,
    /// Recomputed outcome differs from the claimed outcome.
    ReplayMismatch,
    /// `SHA256(secret) != hash`.
    CommitmentMismatch,
    /// Block data from the oracle contradicts the submitted anchor.
    AnchorMismatch,
    /// Blockchain fetch failed or timed out.
    OracleUnavailable,
    RateLimited,
    /// Risk score at or above the review threshold.
    SuspiciousRisk,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidArgument => "InvalidArgument",
            ErrorKind::OutOfRange => "OutOfRange",
            ErrorKind::FormatMismatch => "FormatMismatch",
            ErrorKind::ReplayMismatch => "ReplayMismatch",
            ErrorKind::CommitmentMismatch => "CommitmentMismatch",
            ErrorKind::AnchorMismatch => "AnchorMismatch",
            ErrorKind::OracleUnavailable => "OracleUnavailable",
            ErrorKind::RateLimited => "RateLimited",
            ErrorKind::SuspiciousRisk => "SuspiciousRisk",
        }
    }
}

/// A validation failure: one human readable reason plus enough structured
/// detail (offending index, expected vs actual) to reproduce it.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{kind:?}: {reason}")]
pub struct ValidationError {
    pub kind: ErrorKind,
    pub reason: String,
    pub detail: Map<String, Value>,
}

impl ValidationError {
    pub fn new(kind: ErrorKind, reason: impl Into<String>) -> Self {
        Self {
            kind,
            reason: reason.into(),
            detail: Map::new(),
        }
    }

    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument, reason)
    }

    pub fn out_of_range(reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::OutOfRange, reason)
    }

    pub fn format_mismatch(reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::FormatMismatch, reason)
    }

    pub fn replay_mismatch(reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::ReplayMismatch, reason)
    }

    pub fn commitment_mismatch(reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::CommitmentMismatch, reason)
    }

    /// Attach a structured detail entry.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.detail.insert(key.to_string(), value.into());
        self
    }

    /// Shorthand for the common expected-vs-actual pair.
    pub fn expected_actual(self, expected: impl Into<Value>, actual: impl Into<Value>) -> Self {
        self.with("expected", expected).with("actual", actual)
    }
}

pub type Result<T> = core::result::Result<T, ValidationError>;
