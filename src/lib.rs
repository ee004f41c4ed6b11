// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.

//! fairplay-kernel: deterministic core of a provably fair game service.
//!
//! Commitment hashing, seed derivation, seeded RNG primitives and per-game
//! replay validators. Nothing here touches the clock, the network or disk;
//! the same inputs give the same answers on the server and for any third
//! party holding the revealed secret.

pub mod error;
pub mod commitment;
pub mod seed;
pub mod rng;
pub mod types;
pub mod rules;
pub mod submission;
pub mod games;
pub mod result;

pub use error::{ErrorKind, Result, ValidationError};
pub use games::{ReplayContext, ReplayReport};
pub use result::{Check, CheckOutcome, Status, ValidationResult};
pub use submission::{Submission, SubmissionMeta};
pub use types::{BlockAnchor, GameId, GameType, ReplayStrategy, Reveal, ValidationLevel};

#[cfg(test)]
pub mod tests;
