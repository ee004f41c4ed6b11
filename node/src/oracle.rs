// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Read-only blockchain oracle.
//!
//! Block data is the public entropy a session is anchored to. The service
//! only reads it: once at session start (latest block) and again when a
//! submission's anchor is re-verified (block by hash).

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use fairplay_kernel::BlockAnchor;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::errors::OracleError;
use crate::telemetry::ORACLE_FAILURES;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockInfo {
    pub hash: String,
    pub height: u64,
    pub timestamp: i64,
    #[serde(default)]
    pub transactions: Vec<String>,
}

impl BlockInfo {
    /// Anchor to this block, bound to its first transaction when it has one.
    pub fn anchor(&self) -> BlockAnchor {
        let tx_hash = self.transactions.first().cloned();
        BlockAnchor {
            block_hash: self.hash.clone(),
            block_height: self.height,
            tx_index: tx_hash.as_ref().map(|_| 0),
            tx_hash,
            timestamp: self.timestamp,
        }
    }
}

#[async_trait]
pub trait BlockchainOracle: Send + Sync {
    async fn get_block(&self, hash: &str) -> Result<BlockInfo, OracleError>;

    async fn get_latest_block(&self) -> Result<BlockInfo, OracleError>;
}

/// Oracle used when no `ORACLE_URL` is configured.
#[derive(Debug, Clone, Default)]
pub struct OfflineOracle;

#[async_trait]
impl BlockchainOracle for OfflineOracle {
    async fn get_block(&self, _hash: &str) -> Result<BlockInfo, OracleError> {
        Err(OracleError::Offline)
    }

    async fn get_latest_block(&self) -> Result<BlockInfo, OracleError> {
        Err(OracleError::Offline)
    }
}

/// `GET {base}/block/{hash}` and `GET {base}/blocks/latest`.
#[derive(Debug, Clone)]
pub struct HttpOracle {
    base_url: String,
    client: Client,
}

impl HttpOracle {
    pub fn new(url: &str, timeout: Duration) -> Result<Self, OracleError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| OracleError::Transport(e.to_string()))?;
        Ok(Self {
            base_url: url.trim_end_matches('/').to_string(),
            client,
        })
    }

    async fn fetch(&self, url: String, what: &str) -> Result<BlockInfo, OracleError> {
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| OracleError::Transport(e.to_string()))?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Err(OracleError::NotFound(what.to_string()));
        }
        if !resp.status().is_success() {
            return Err(OracleError::Transport(format!("{what}: {}", resp.status())));
        }
        resp.json().await.map_err(|e| OracleError::Decode(e.to_string()))
    }
}

#[async_trait]
impl BlockchainOracle for HttpOracle {
    async fn get_block(&self, hash: &str) -> Result<BlockInfo, OracleError> {
        if hash.is_empty() || !hash.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(OracleError::NotFound(hash.to_string()));
        }
        self.fetch(format!("{}/block/{}", self.base_url, hash), hash).await
    }

    async fn get_latest_block(&self) -> Result<BlockInfo, OracleError> {
        self.fetch(format!("{}/blocks/latest", self.base_url), "latest").await
    }
}

/// Runs an oracle call under `timeout`. Failures other than a missing block
/// are counted in the oracle failure metric.
pub async fn bounded<F>(timeout: Duration, call: F) -> Result<BlockInfo, OracleError>
where
    F: Future<Output = Result<BlockInfo, OracleError>>,
{
    let outcome = match tokio::time::timeout(timeout, call).await {
        Ok(result) => result,
        Err(_) => Err(OracleError::Timeout(timeout.as_millis() as u64)),
    };
    if let Err(e) = &outcome {
        if !matches!(e, OracleError::NotFound(_) | OracleError::Offline) {
            tracing::warn!("oracle call failed: {}", e);
            metrics::counter!(ORACLE_FAILURES, 1);
        }
    }
    outcome
}
