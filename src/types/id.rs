// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Identity types.
//!
//! Game ids follow `<PREFIX>-<blockHeight>-<random>`, where the prefix is
//! fixed per game type, the block height is 1 to 12 decimal digits and the
//! random part is 6 to 32 ASCII alphanumerics.

use serde::Serialize;

use crate::error::{Result, ValidationError};
use crate::rules::GameRules;
use crate::types::enums::GameType;

pub const HEIGHT_DIGITS_MAX: usize = 12;
pub const NONCE_MIN: usize = 6;
pub const NONCE_MAX: usize = 32;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameId {
    pub game_type: GameType,
    pub block_height: u64,
    pub nonce: String,
}

impl GameId {
    /// Parses `raw` against the pattern for `game_type`.
    pub fn parse(game_type: GameType, raw: &str) -> Result<Self> {
        let prefix = GameRules::for_game(game_type).id_prefix;
        let mismatch = |why: &str| {
            ValidationError::format_mismatch(format!(
                "gameId '{raw}' does not match {prefix}-<blockHeight>-<random>: {why}"
            ))
            .with("gameId", raw)
        };

        let mut parts = raw.splitn(3, '-');
        let (Some(head), Some(height), Some(nonce)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(mismatch("expected three '-' separated parts"));
        };

        if head != prefix {
            return Err(mismatch("wrong prefix"));
        }
        if height.is_empty()
            || height.len() > HEIGHT_DIGITS_MAX
            || !height.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(mismatch("block height must be 1-12 digits"));
        }
        if nonce.len() < NONCE_MIN
            || nonce.len() > NONCE_MAX
            || !nonce.bytes().all(|b| b.is_ascii_alphanumeric())
        {
            return Err(mismatch("random part must be 6-32 alphanumerics"));
        }

        let block_height = height.parse::<u64>().map_err(|_| mismatch("block height overflow"))?;
        Ok(GameId {
            game_type,
            block_height,
            nonce: nonce.to_string(),
        })
    }
}
