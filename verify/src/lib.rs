// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Offline verification of a finished session.
//!
//! Everything here works from the reveal a player receives when a session
//! ends. No server, no network: the same kernel functions the node uses.

pub mod commands;
pub mod reveal;
