// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
pub mod api;
pub mod config;
pub mod dispatcher;
pub mod errors;
pub mod fraud;
pub mod leaderboard;
pub mod oracle;
pub mod rate_limit;
pub mod server;
pub mod sessions;
pub mod telemetry;
