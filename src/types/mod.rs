// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Shared protocol types.

pub mod id;
pub mod enums;
pub mod anchor;

pub use anchor::{BlockAnchor, Reveal};
pub use enums::{Difficulty, GameType, ReplayStrategy, ValidationLevel};
pub use id::GameId;
