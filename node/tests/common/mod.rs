// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use fairplay_node::config::NodeConfig;
use fairplay_node::errors::OracleError;
use fairplay_node::oracle::{BlockInfo, BlockchainOracle, OfflineOracle};
use fairplay_node::server::{build_router, AppState, Collaborators};
use serde_json::{json, Value};
use tower::util::ServiceExt;

pub const BLOCK_HASH: &str = "00000000000000000002a7c4c1e48d76c5a37902165a270156b7a8d72728a054";
pub const TX_HASH: &str = "b6f6991d03df0e2e04dafffcd6bc418aac66049e2cd74b80f14ac86db1e3f0da";

pub fn block() -> BlockInfo {
    BlockInfo {
        hash: BLOCK_HASH.to_string(),
        height: 840_000,
        timestamp: 1_713_571_767,
        transactions: vec![TX_HASH.to_string()],
    }
}

/// Serves a single known block; every other hash is missing.
pub struct MockOracle {
    pub block: BlockInfo,
}

#[async_trait]
impl BlockchainOracle for MockOracle {
    async fn get_block(&self, hash: &str) -> Result<BlockInfo, OracleError> {
        if hash == self.block.hash {
            Ok(self.block.clone())
        } else {
            Err(OracleError::NotFound(hash.to_string()))
        }
    }

    async fn get_latest_block(&self) -> Result<BlockInfo, OracleError> {
        Ok(self.block.clone())
    }
}

/// Answers the latest block, then hangs on lookups by hash.
pub struct SlowOracle;

#[async_trait]
impl BlockchainOracle for SlowOracle {
    async fn get_block(&self, _hash: &str) -> Result<BlockInfo, OracleError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(block())
    }

    async fn get_latest_block(&self) -> Result<BlockInfo, OracleError> {
        Ok(block())
    }
}

pub fn mock_oracle() -> Arc<dyn BlockchainOracle> {
    Arc::new(MockOracle { block: block() })
}

pub fn offline() -> Arc<dyn BlockchainOracle> {
    Arc::new(OfflineOracle)
}

pub fn test_config() -> NodeConfig {
    NodeConfig {
        oracle_timeout: Duration::from_millis(200),
        ..Default::default()
    }
}

pub fn app_with(cfg: &NodeConfig, oracle: Arc<dyn BlockchainOracle>) -> (Router, AppState) {
    let state = AppState::new(cfg, Collaborators::in_memory(oracle));
    (build_router(state.clone(), cfg.auth_token.clone()), state)
}

pub fn app(oracle: Arc<dyn BlockchainOracle>) -> (Router, AppState) {
    app_with(&test_config(), oracle)
}

pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), 1_000_000).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

pub async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, "POST", uri, Some(body)).await
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, "GET", uri, None).await
}

pub fn backgammon(game_id: &str, player: &str, duration_ms: u64) -> Value {
    json!({
        "gameType": "backgammon",
        "gameId": game_id,
        "player": player,
        "score": 4,
        "durationMs": duration_ms,
        "winner": "player",
        "winType": "normal",
        "cubeValue": 2,
        "difficulty": "medium",
        "moves": 40,
    })
}
