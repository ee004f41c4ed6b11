// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! The outcome of validating one submission.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ErrorKind, ValidationError};
use crate::types::enums::ValidationLevel;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Accepted,
    Rejected,
    /// Structurally valid but routed to manual review.
    Review,
    RateLimited,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Accepted => "accepted",
            Status::Rejected => "rejected",
            Status::Review => "review",
            Status::RateLimited => "rate_limited",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckOutcome {
    Passed,
    Failed,
    Skipped,
}

/// One pipeline stage as it was run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Check {
    pub name: String,
    pub outcome: CheckOutcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub valid: bool,
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
    pub calculated_score: Option<u64>,
    pub risk_score: u8,
    pub flags: BTreeSet<String>,
    pub details: Map<String, Value>,
    pub checks: Vec<Check>,
    pub warnings: Vec<String>,
    pub level: ValidationLevel,
}

impl ValidationResult {
    /// An accepted result at `level` with nothing recorded yet.
    pub fn new(level: ValidationLevel) -> Self {
        Self {
            valid: true,
            status: Status::Accepted,
            reason: None,
            error_kind: None,
            calculated_score: None,
            risk_score: 0,
            flags: BTreeSet::new(),
            details: Map::new(),
            checks: Vec::new(),
            warnings: Vec::new(),
            level,
        }
    }

    pub fn pass(&mut self, name: &str) {
        self.push_check(name, CheckOutcome::Passed, None);
    }

    pub fn skip(&mut self, name: &str, note: impl Into<String>) {
        self.push_check(name, CheckOutcome::Skipped, Some(note.into()));
    }

    fn push_check(&mut self, name: &str, outcome: CheckOutcome, note: Option<String>) {
        self.checks.push(Check {
            name: name.to_string(),
            outcome,
            note,
        });
    }

    /// Records a hard failure of check `name`. The error's detail is merged
    /// into `details`.
    pub fn fail(&mut self, name: &str, err: ValidationError) {
        self.push_check(name, CheckOutcome::Failed, Some(err.reason.clone()));
        self.valid = false;
        self.status = match err.kind {
            ErrorKind::RateLimited => Status::RateLimited,
            ErrorKind::SuspiciousRisk => Status::Review,
            _ => Status::Rejected,
        };
        self.error_kind = Some(err.kind);
        self.reason = Some(err.reason);
        for (k, v) in err.detail {
            self.details.insert(k, v);
        }
    }

    pub fn warn(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }
}
