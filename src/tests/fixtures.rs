// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Shared submission builders for the kernel tests.

use serde_json::{json, Value};

use crate::commitment::commit;
use crate::error::Result;
use crate::games::{ReplayContext, ReplayReport};
use crate::submission::Submission;
use crate::types::anchor::{BlockAnchor, Reveal};

pub const SECRET: &str = "0f1e2d3c4b5a69788796a5b4c3d2e1f00112233445566778899aabbccddeeff0";

pub fn reveal() -> Reveal {
    Reveal {
        server_secret: SECRET.to_string(),
        secret_hash: commit(SECRET),
    }
}

pub fn anchor() -> BlockAnchor {
    BlockAnchor {
        block_hash: "00000000000000000002a7c4c1e48d76c5a37902165a270156b7a8d72728a054".to_string(),
        block_height: 840_000,
        tx_hash: None,
        tx_index: None,
        timestamp: 1_713_571_767,
    }
}

pub fn chess(moves: &[&str], winner: Option<&str>, reason: &str, color: &str, score: u64) -> Value {
    json!({
        "gameType": "chess",
        "gameId": "CHESS-840000-abc123",
        "player": "alice",
        "score": score,
        "durationMs": 120_000,
        "moves": moves,
        "result": { "winner": winner, "reason": reason },
        "playerColor": color,
        "difficulty": "medium",
    })
}

pub fn backgammon(win_type: &str, cube: u64, difficulty: &str, score: u64) -> Value {
    json!({
        "gameType": "backgammon",
        "gameId": "BG-840000-k9x2m4",
        "player": "bob",
        "score": score,
        "durationMs": 600_000,
        "winner": "player",
        "winType": win_type,
        "cubeValue": cube,
        "difficulty": difficulty,
        "moves": 40,
    })
}

pub fn solitaire(foundation: u64, moves: u64) -> Value {
    json!({
        "gameType": "solitaire",
        "gameId": "SOL-840000-deal01",
        "player": "carol",
        "score": foundation,
        "durationMs": 900_000,
        "foundationCards": foundation,
        "moves": moves,
    })
}

/// A complete card worth 290 (63 upper + 35 bonus + 192 lower).
pub fn yahtzee_card() -> Value {
    json!({
        "ones": { "dice": [1, 1, 1, 2, 3], "score": 3 },
        "twos": { "dice": [2, 2, 2, 4, 5], "score": 6 },
        "threes": { "dice": [3, 3, 3, 1, 2], "score": 9 },
        "fours": { "dice": [4, 4, 4, 1, 2], "score": 12 },
        "fives": { "dice": [5, 5, 5, 1, 2], "score": 15 },
        "sixes": { "dice": [6, 6, 6, 1, 2], "score": 18 },
        "three_of_a_kind": { "dice": [3, 3, 3, 4, 5], "score": 18 },
        "four_of_a_kind": { "dice": [2, 2, 2, 2, 6], "score": 14 },
        "full_house": { "dice": [2, 2, 3, 3, 3], "score": 25 },
        "small_straight": { "dice": [1, 2, 3, 4, 6], "score": 30 },
        "large_straight": { "dice": [1, 2, 3, 4, 5], "score": 40 },
        "yahtzee": { "dice": [6, 6, 6, 6, 6], "score": 50 },
        "chance": { "dice": [1, 2, 3, 4, 5], "score": 15 },
    })
}

pub fn yahtzee(categories: Value, score: u64) -> Value {
    json!({
        "gameType": "yahtzee",
        "gameId": "YAHTZEE-840000-r0ll5x",
        "player": "dave",
        "score": score,
        "durationMs": 600_000,
        "categories": categories,
        "rolls": 26,
    })
}

/// Parse, format check and replay, the way the LOGIC level runs them.
pub fn validate(value: &Value, ctx: &ReplayContext) -> Result<ReplayReport> {
    let submission = Submission::parse(value)?;
    submission.check_format()?;
    submission.replay(ctx)
}
