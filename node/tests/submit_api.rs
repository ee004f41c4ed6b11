// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::*;
use fairplay_kernel::games::tiles::{replay_moves, Board, Direction};
use fairplay_kernel::seed::{derive_anchored, Seed, PURPOSE_TILE_SPAWN};
use fairplay_kernel::{GameType, ValidationLevel};
use fairplay_node::config::NodeConfig;
use fairplay_node::dispatcher::FLAG_ORACLE_UNVERIFIED;
use serde_json::{json, Value};
use tower::util::ServiceExt;

fn anchor_json(height: u64) -> Value {
    json!({
        "blockHash": BLOCK_HASH,
        "blockHeight": height,
        "txHash": TX_HASH,
        "txIndex": 0,
        "timestamp": 1_713_571_767,
    })
}

fn check<'a>(body: &'a Value, name: &str) -> &'a Value {
    body["checks"]
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["name"] == name)
        .unwrap_or_else(|| panic!("no check named {name}"))
}

#[tokio::test]
async fn honest_submission_is_accepted_and_recorded() {
    let (app, state) = app(offline());
    let (status, body) = post(&app, "/submit-score", backgammon("BG-840000-k9x2m4", "bob", 600_000)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["valid"], true);
    assert_eq!(body["status"], "accepted");
    assert_eq!(body["calculatedScore"], 4);
    assert_eq!(body["level"], "FULL");
    assert_eq!(check(&body, "replay")["outcome"], "passed");
    // No anchor: the blockchain stage is skipped, not failed.
    assert_eq!(check(&body, "blockchain")["outcome"], "skipped");
    assert!(body["flags"].as_array().unwrap().contains(&json!(FLAG_ORACLE_UNVERIFIED)));

    let top = state.dispatcher.leaderboard.top(GameType::Backgammon, 10);
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].player, "bob");
    assert_eq!(top[0].score, 4);
}

#[tokio::test]
async fn inflated_score_is_rejected_with_detail() {
    let (app, state) = app(offline());
    let mut value = backgammon("BG-840000-k9x2m4", "bob", 600_000);
    value["score"] = json!(5);

    let (status, body) = post(&app, "/submit-score", value).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["status"], "rejected");
    assert_eq!(body["errorKind"], "ReplayMismatch");
    assert_eq!(body["details"]["expected"], 4);
    assert_eq!(body["details"]["actual"], 5);
    assert!(state.dispatcher.leaderboard.top(GameType::Backgammon, 10).is_empty());
}

#[tokio::test]
async fn unknown_game_is_rejected_before_any_validator() {
    let (app, _) = app(offline());
    let (status, body) = post(
        &app,
        "/submit-score",
        json!({ "gameType": "poker", "gameId": "POKER-1-abcdef", "player": "eve", "score": 1, "durationMs": 1000 }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errorKind"], "InvalidArgument");
    assert_eq!(check(&body, "parse")["outcome"], "failed");
    assert!(body["checks"].as_array().unwrap().iter().all(|c| c["name"] != "replay"));
}

#[tokio::test]
async fn non_json_body_is_400() {
    let (app, _) = app(offline());
    let req = Request::builder()
        .method("POST")
        .uri("/submit-score")
        .body(Body::from("score=9000"))
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn bad_game_id_is_format_mismatch() {
    let (app, _) = app(offline());
    let (status, body) = post(&app, "/submit-score", backgammon("CHESS-840000-k9x2m4", "bob", 600_000)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["errorKind"], "FormatMismatch");
}

#[tokio::test]
async fn rate_limit_denies_the_request_past_the_window_budget() {
    let mut cfg = test_config();
    cfg.rate_limit.max_requests = 2;
    let (app, _) = app_with(&cfg, offline());

    for i in 0..2 {
        let id = format!("BG-840000-rate0{i}");
        let (status, _) = post(&app, "/submit-score", backgammon(&id, "mallory", 600_000)).await;
        assert_eq!(status, StatusCode::OK);
    }
    let (status, body) = post(&app, "/submit-score", backgammon("BG-840000-rate02", "mallory", 600_000)).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["status"], "rate_limited");
    assert_eq!(body["errorKind"], "RateLimited");

    // Other players have their own window.
    let (status, _) = post(&app, "/submit-score", backgammon("BG-840000-rate03", "trent", 600_000)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn anchor_is_reverified_against_the_oracle() {
    let (app, _) = app(mock_oracle());
    let mut value = backgammon("BG-840000-k9x2m4", "bob", 600_000);
    value["anchor"] = anchor_json(840_000);

    let (status, body) = post(&app, "/submit-score", value).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(check(&body, "blockchain")["outcome"], "passed");
    assert!(!body["flags"].as_array().unwrap().contains(&json!(FLAG_ORACLE_UNVERIFIED)));
}

#[tokio::test]
async fn contradicting_anchor_is_rejected() {
    let (app, _) = app(mock_oracle());
    let mut value = backgammon("BG-840000-k9x2m4", "bob", 600_000);
    value["anchor"] = anchor_json(839_999);

    let (status, body) = post(&app, "/submit-score", value).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["errorKind"], "AnchorMismatch");
    assert_eq!(body["details"]["field"], "blockHeight");

    let mut value = backgammon("BG-840000-k9x2m4", "bob", 600_000);
    value["anchor"] = anchor_json(840_000);
    value["anchor"]["blockHash"] = json!("00000000000000000000000000000000000000000000000000000000deadbeef");
    let (status, body) = post(&app, "/submit-score", value).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["errorKind"], "AnchorMismatch");
}

#[tokio::test]
async fn oracle_timeout_degrades_to_skipped() {
    let (app, _) = app(Arc::new(SlowOracle));
    let mut value = backgammon("BG-840000-k9x2m4", "bob", 600_000);
    value["anchor"] = anchor_json(840_000);

    let (status, body) = post(&app, "/submit-score", value).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "accepted");
    assert_eq!(check(&body, "blockchain")["outcome"], "skipped");
    assert!(body["flags"].as_array().unwrap().contains(&json!(FLAG_ORACLE_UNVERIFIED)));
    assert!(body["warnings"].as_array().unwrap().iter().any(|w| w.as_str().unwrap().contains("timed out")));
}

/// Solitaire with a reported deal and no session, so the deal is unverified
/// but still fingerprinted.
fn unseeded_solitaire(game_id: &str, duration_ms: u64) -> Value {
    json!({
        "gameType": "solitaire",
        "gameId": game_id,
        "player": "bob",
        "score": 20,
        "durationMs": duration_ms,
        "foundationCards": 20,
        "moves": 200,
        "deckOrder": (0..52).collect::<Vec<u64>>(),
    })
}

#[tokio::test]
async fn suspicious_submission_goes_to_review() {
    let (app, state) = app(offline());
    let (status, _) = post(&app, "/submit-score", unseeded_solitaire("SOL-840000-first1", 900_000)).await;
    assert_eq!(status, StatusCode::OK);

    // Same deal and history under another id, played at 5 moves a second.
    let (status, body) = post(&app, "/submit-score", unseeded_solitaire("SOL-840000-copy02", 40_000)).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["status"], "review");
    assert_eq!(body["errorKind"], "SuspiciousRisk");
    assert_eq!(body["riskScore"], 70);
    assert_eq!(body["details"]["duplicateOf"], "SOL-840000-first1");
    let flags = body["flags"].as_array().unwrap();
    assert!(flags.contains(&json!("duplicate_history")));
    assert!(flags.contains(&json!("fast_play")));

    let pending = state.dispatcher.reviews.pending();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].game_id, "SOL-840000-copy02");
    assert_eq!(state.dispatcher.leaderboard.top(GameType::Solitaire, 10).len(), 1);
}

#[tokio::test]
async fn identical_backgammon_outcomes_are_not_duplicates() {
    let (app, state) = app(offline());
    let (status, _) = post(&app, "/submit-score", backgammon("BG-840000-aaaaaa", "alice", 600_000)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = post(&app, "/submit-score", backgammon("BG-840001-bbbbbb", "bob", 600_000)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["riskScore"], 0);
    assert!(!body["flags"].as_array().unwrap().contains(&json!("duplicate_history")));
    assert!(body["details"].get("duplicateOf").is_none());
    assert_eq!(state.dispatcher.leaderboard.top(GameType::Backgammon, 10).len(), 2);
}

#[tokio::test]
async fn resubmitting_the_same_game_is_not_a_duplicate() {
    let (app, _) = app(offline());
    let value = backgammon("BG-840000-k9x2m4", "bob", 600_000);
    post(&app, "/submit-score", value.clone()).await;
    let (status, body) = post(&app, "/submit-score", value).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["riskScore"], 0);
}

#[tokio::test]
async fn basic_level_skips_replay() {
    let cfg = NodeConfig {
        validation_level: ValidationLevel::Basic,
        ..test_config()
    };
    let (app, _) = app_with(&cfg, offline());
    let mut value = backgammon("BG-840000-k9x2m4", "bob", 600_000);
    value["score"] = json!(5);

    let (status, body) = post(&app, "/submit-score", value).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["level"], "BASIC");
    assert!(body["calculatedScore"].is_null());
    assert_eq!(check(&body, "replay")["outcome"], "skipped");
    assert_eq!(check(&body, "fraud")["outcome"], "skipped");
}

async fn ended_solitaire_session(app: &axum::Router) -> (String, Value, Vec<u64>) {
    let (_, started) = post(app, "/session/start", json!({ "gameType": "solitaire" })).await;
    let id = started["sessionId"].as_str().unwrap().to_string();
    let (_, dealt) = post(
        app,
        "/session/random",
        json!({ "sessionId": id, "purpose": "deck-shuffle", "draw": { "kind": "shuffle", "n": 52 } }),
    )
    .await;
    let deck = dealt["values"].as_array().unwrap().iter().map(|v| v.as_u64().unwrap()).collect();
    let (_, reveal) = post(app, "/session/end", json!({ "sessionId": id, "gameData": {} })).await;
    (id, reveal, deck)
}

fn solitaire(session_id: &str, deck: &[u64]) -> Value {
    json!({
        "gameType": "solitaire",
        "gameId": "SOL-840000-deal01",
        "player": "carol",
        "score": 52,
        "durationMs": 900_000,
        "foundationCards": 52,
        "moves": 200,
        "deckOrder": deck,
        "sessionId": session_id,
    })
}

#[tokio::test]
async fn session_backed_submission_verifies_the_deal() {
    let (app, _) = app(mock_oracle());
    let (id, _, deck) = ended_solitaire_session(&app).await;

    let (status, body) = post(&app, "/submit-score", solitaire(&id, &deck)).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["details"]["deckVerified"], true);
    assert_eq!(check(&body, "blockchain")["outcome"], "passed");
}

#[tokio::test]
async fn swapped_deal_is_rejected() {
    let (app, _) = app(mock_oracle());
    let (id, _, mut deck) = ended_solitaire_session(&app).await;
    deck.swap(0, 1);

    let (status, body) = post(&app, "/submit-score", solitaire(&id, &deck)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["errorKind"], "ReplayMismatch");
    assert_eq!(body["details"]["index"], 0);
}

#[tokio::test]
async fn reveal_conflicting_with_session_is_commitment_mismatch() {
    let (app, _) = app(mock_oracle());
    let (id, reveal, deck) = ended_solitaire_session(&app).await;

    let forged = "11".repeat(32);
    let mut value = solitaire(&id, &deck);
    value["reveal"] = json!({
        "serverSecret": forged,
        "secretHash": fairplay_kernel::commitment::commit(&forged),
    });
    assert_ne!(value["reveal"]["serverSecret"], reveal["serverSecret"]);

    let (status, body) = post(&app, "/submit-score", value).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["errorKind"], "CommitmentMismatch");
}

#[tokio::test]
async fn session_must_be_ended_and_for_the_same_game() {
    let (app, _) = app(mock_oracle());
    let (_, started) = post(&app, "/session/start", json!({ "gameType": "solitaire" })).await;
    let active = started["sessionId"].as_str().unwrap();

    let (status, body) = post(&app, "/submit-score", solitaire(active, &(0..52).collect::<Vec<u64>>())).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["errorKind"], "InvalidArgument");

    let (_, started) = post(&app, "/session/start", json!({ "gameType": "chess" })).await;
    let chess = started["sessionId"].as_str().unwrap();
    post(&app, "/session/end", json!({ "sessionId": chess, "gameData": {} })).await;
    let (status, body) = post(&app, "/submit-score", solitaire(chess, &(0..52).collect::<Vec<u64>>())).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["reason"].as_str().unwrap().contains("chess"));
}

/// First-changing-direction play under `seed`; returns the moves and score.
fn play_tiles(seed: &Seed, n: usize) -> (Vec<Direction>, u64) {
    const ORDER: [Direction; 4] = [Direction::Left, Direction::Down, Direction::Right, Direction::Up];
    let mut board = Board::default();
    board.spawn(seed, 0).unwrap();
    board.spawn(seed, 1).unwrap();
    let mut moves = Vec::new();
    for i in 0..n {
        let Some(dir) = ORDER.into_iter().find(|&d| {
            let mut copy = board;
            copy.slide(d).1
        }) else {
            break;
        };
        board.slide(dir);
        board.spawn(seed, i as u64 + 2).unwrap();
        moves.push(dir);
    }
    let (_, score) = replay_moves(seed, &moves).unwrap();
    (moves, score)
}

fn tiles(moves: &[Direction], score: u64) -> Value {
    json!({
        "gameType": "2048",
        "gameId": "2048-840000-t1les0",
        "player": "erin",
        "score": score,
        "durationMs": 300_000,
        "moves": moves,
    })
}

#[tokio::test]
async fn self_chosen_reveal_is_not_trusted() {
    let (app, state) = app(mock_oracle());
    let secret = "ab".repeat(32);
    let anchor = block().anchor();
    let seed = derive_anchored(&secret, &anchor, PURPOSE_TILE_SPAWN);
    let (moves, score) = play_tiles(&seed, 30);

    let mut value = tiles(&moves, score);
    value["anchor"] = serde_json::to_value(&anchor).unwrap();
    value["reveal"] = json!({
        "serverSecret": secret,
        "secretHash": fairplay_kernel::commitment::commit(&secret),
    });

    let (status, body) = post(&app, "/submit-score", value).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["status"], "rejected");
    assert_eq!(body["errorKind"], "CommitmentMismatch");
    assert_eq!(check(&body, "replay")["outcome"], "failed");
    assert!(state.dispatcher.leaderboard.top(GameType::Tiles2048, 10).is_empty());
}

#[tokio::test]
async fn session_backed_tiles_game_is_replayed() {
    let (app, _) = app(mock_oracle());
    let (_, started) = post(&app, "/session/start", json!({ "gameType": "2048" })).await;
    let id = started["sessionId"].as_str().unwrap().to_string();
    let (_, reveal) = post(&app, "/session/end", json!({ "sessionId": id, "gameData": {} })).await;

    let seed = derive_anchored(reveal["serverSecret"].as_str().unwrap(), &block().anchor(), PURPOSE_TILE_SPAWN);
    let (moves, score) = play_tiles(&seed, 30);
    let mut value = tiles(&moves, score);
    value["sessionId"] = json!(id);

    let (status, body) = post(&app, "/submit-score", value).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["calculatedScore"], score);
    assert_eq!(check(&body, "blockchain")["outcome"], "passed");
}

#[tokio::test]
async fn missing_player_does_not_share_a_rate_limit_bucket() {
    let mut cfg = test_config();
    cfg.rate_limit.max_requests = 1;
    let (app, _) = app_with(&cfg, offline());

    for id in ["BG-840000-anon01", "BG-840000-anon02"] {
        let mut value = backgammon(id, "x", 600_000);
        value.as_object_mut().unwrap().remove("player");
        let (status, body) = post(&app, "/submit-score", value).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errorKind"], "InvalidArgument");
        assert_eq!(check(&body, "rate_limit")["outcome"], "skipped");
    }
}
