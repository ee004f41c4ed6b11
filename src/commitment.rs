// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Commit-reveal primitives.
//!
//! The server publishes `SHA256(secret)` before any entropy is fetched and
//! only discloses the secret once the game is over. Anyone holding the reveal
//! can recompute the hash with [`verify_commitment`].
//!
//! Both the secret and the hash travel as lowercase hex. The commitment is
//! taken over the secret's hex text (UTF-8), the same representation that is
//! fed into seed derivation.

use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::error::{Result, ValidationError};

/// Secret length in bytes (256 bits).
pub const SECRET_BYTES: usize = 32;
/// Hex length of a secret or a SHA-256 digest.
pub const HEX_LEN: usize = SECRET_BYTES * 2;

/// A secret together with its published commitment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitmentPair {
    pub secret: String,
    pub hash: String,
}

/// Draws a fresh secret from the OS CSPRNG and commits to it.
pub fn generate() -> CommitmentPair {
    let mut bytes = [0u8; SECRET_BYTES];
    OsRng.fill_bytes(&mut bytes);
    let secret = hex::encode(bytes);
    let hash = commit(&secret);
    CommitmentPair { secret, hash }
}

/// `SHA256(secret)` as lowercase hex.
pub fn commit(secret: &str) -> String {
    sha256_hex(secret.as_bytes())
}

/// Checks a revealed secret against its commitment.
///
/// Both values are normalised to lowercase first. Malformed hex is an
/// `InvalidArgument`, a well-formed pair that does not match is a
/// `CommitmentMismatch`.
pub fn verify_commitment(secret: &str, hash: &str) -> Result<()> {
    let secret = normalize_hex(secret, "serverSecret")?;
    let hash = normalize_hex(hash, "secretHash")?;

    let computed = commit(&secret);
    if computed != hash {
        return Err(ValidationError::commitment_mismatch(
            "revealed secret does not hash to the committed value",
        )
        .expected_actual(hash, computed));
    }
    Ok(())
}

/// Lowercases and checks a 64 character hex field.
pub fn normalize_hex(value: &str, field: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.len() != HEX_LEN {
        return Err(ValidationError::invalid_argument(format!(
            "{field} must be {HEX_LEN} hex characters, got {}",
            trimmed.len()
        ))
        .with("field", field));
    }
    if !trimmed.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ValidationError::invalid_argument(format!("{field} is not valid hex"))
            .with("field", field));
    }
    Ok(trimmed.to_ascii_lowercase())
}

pub(crate) fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}
