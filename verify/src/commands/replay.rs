// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! LOGIC level validation of a submission, offline.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use fairplay_kernel::{ReplayContext, Submission, ValidationError, ValidationLevel, ValidationResult};
use serde_json::Value;

use crate::reveal::RevealFile;

/// Parse, format check and replay. Values from a reveal file take the place
/// of the submission's own reveal and anchor; if both are given they must
/// agree.
pub fn verify(body: &Value, reveal: Option<&RevealFile>) -> ValidationResult {
    let mut result = ValidationResult::new(ValidationLevel::Logic);

    let submission = match Submission::parse(body) {
        Ok(s) => s,
        Err(e) => {
            result.fail("parse", e);
            return result;
        }
    };
    result.pass("parse");

    if let Err(e) = submission.check_format() {
        result.fail("format", e);
        return result;
    }
    result.pass("format");

    let ctx = match context(&submission, reveal) {
        Ok(ctx) => ctx,
        Err(e) => {
            result.fail("replay", e);
            return result;
        }
    };
    match submission.replay(&ctx) {
        Ok(report) => {
            result.calculated_score = Some(report.calculated_score);
            result.details.extend(report.details);
            result.warnings.extend(report.warnings);
            result.pass("replay");
        }
        Err(e) => {
            result.fail("replay", e);
            return result;
        }
    }

    result.skip("blockchain", "offline verification");
    result
}

fn context(submission: &Submission, file: Option<&RevealFile>) -> Result<ReplayContext, ValidationError> {
    let meta = submission.meta();
    let Some(file) = file else {
        return Ok(ReplayContext::new(meta.reveal.clone(), meta.anchor.clone()));
    };

    let reveal = file.reveal();
    if let Some(given) = &meta.reveal {
        if !given.server_secret.eq_ignore_ascii_case(&reveal.server_secret) {
            return Err(ValidationError::commitment_mismatch(
                "submission reveal differs from the reveal file",
            ));
        }
    }
    let anchor = match (file.anchor(), &meta.anchor) {
        (Some(from_file), Some(given)) if &from_file != given => {
            return Err(ValidationError::commitment_mismatch(
                "submission anchor differs from the reveal file",
            ));
        }
        (Some(from_file), _) => Some(from_file),
        (None, given) => given.clone(),
    };
    Ok(ReplayContext::new(Some(reveal), anchor))
}

pub fn run(submission_path: &Path, reveal_path: Option<&Path>) -> Result<()> {
    let bytes = fs::read(submission_path)
        .with_context(|| format!("Failed to read submission {}", submission_path.display()))?;
    let body: Value = serde_json::from_slice(&bytes).context("submission is not JSON")?;
    let reveal = reveal_path.map(RevealFile::load).transpose()?;

    let result = verify(&body, reveal.as_ref());
    println!("{}", serde_json::to_string_pretty(&result)?);

    if !result.valid {
        bail!(
            "submission rejected: {}",
            result.reason.as_deref().unwrap_or("unknown reason")
        );
    }
    Ok(())
}
