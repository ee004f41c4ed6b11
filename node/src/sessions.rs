// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Session store and the commitment service built on it.
//!
//! A session's secret is generated at start and only the hash leaves the
//! server. Ending the session reveals the secret; the end runs entirely
//! under the store lock so concurrent ends observe a single reveal.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use fairplay_kernel::commitment::{self, CommitmentPair};
use fairplay_kernel::rng::{die_roll, shuffle, tile_spawn};
use fairplay_kernel::rules::DECK_SIZE;
use fairplay_kernel::seed::derive_anchored;
use fairplay_kernel::{BlockAnchor, GameType, Reveal};
use parking_lot::Mutex;
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::{Draw, DrawValue, RandomResponse, RevealPayload, SessionView, StartSessionResponse};
use crate::errors::ServiceError;
use crate::oracle::{bounded, BlockchainOracle};
use crate::telemetry::{SESSIONS_ENDED, SESSIONS_STARTED};

/// Bytes of OS randomness in a session id.
pub const SESSION_ID_BYTES: usize = 16;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSession {
    pub session_id: String,
    pub game_type: GameType,
    pub server_secret: String,
    pub secret_hash: String,
    pub anchor: Option<BlockAnchor>,
    pub created_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub game_data: Option<Value>,
}

impl GameSession {
    pub fn new(game_type: GameType, pair: CommitmentPair, anchor: Option<BlockAnchor>, now: DateTime<Utc>) -> Self {
        Self {
            session_id: new_session_id(),
            game_type,
            server_secret: pair.secret,
            secret_hash: pair.hash,
            anchor,
            created_at: now,
            ended_at: None,
            game_data: None,
        }
    }

    pub fn is_ended(&self) -> bool {
        self.ended_at.is_some()
    }

    /// The revealed secret, available only once the session has ended.
    pub fn reveal(&self) -> Option<Reveal> {
        self.ended_at.map(|_| Reveal {
            server_secret: self.server_secret.clone(),
            secret_hash: self.secret_hash.clone(),
        })
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            session_id: self.session_id.clone(),
            game_type: self.game_type,
            secret_hash: self.secret_hash.clone(),
            server_secret: self.reveal().map(|r| r.server_secret),
            anchor: self.anchor.clone(),
            created_at: self.created_at,
            ended_at: self.ended_at,
        }
    }

    fn reveal_payload(&self, ended_at: DateTime<Utc>, already_ended: bool) -> RevealPayload {
        let anchor = self.anchor.as_ref();
        RevealPayload {
            session_id: self.session_id.clone(),
            server_secret: self.server_secret.clone(),
            secret_hash: self.secret_hash.clone(),
            block_hash: anchor.map(|a| a.block_hash.clone()),
            block_height: anchor.map(|a| a.block_height),
            tx_hash: anchor.and_then(|a| a.tx_hash.clone()),
            tx_index: anchor.and_then(|a| a.tx_index),
            timestamp: anchor.map(|a| a.timestamp),
            ended_at,
            already_ended,
        }
    }
}

pub fn new_session_id() -> String {
    let mut bytes = [0u8; SESSION_ID_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Session ids are lowercase hex. Anything else can't name a session and,
/// for the file store, must never reach a path.
fn is_session_id(id: &str) -> bool {
    id.len() == SESSION_ID_BYTES * 2 && id.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

/// Outcome of an end call.
#[derive(Debug, Clone)]
pub struct Ended {
    pub session: GameSession,
    /// False when this call performed the end.
    pub already_ended: bool,
}

pub trait SessionStore: Send + Sync {
    fn insert(&self, session: GameSession) -> Result<(), ServiceError>;

    fn get(&self, id: &str) -> Result<Option<GameSession>, ServiceError>;

    /// Ends the session at most once. Read, check and write happen under one
    /// lock; later calls get the stored session back unchanged.
    fn end(&self, id: &str, game_data: Value, now: DateTime<Utc>) -> Result<Ended, ServiceError>;
}

fn end_in_place(session: &mut GameSession, game_data: Value, now: DateTime<Utc>) -> bool {
    if session.is_ended() {
        return false;
    }
    session.ended_at = Some(now);
    session.game_data = Some(game_data);
    true
}

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: Mutex<HashMap<String, GameSession>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SessionStore for MemorySessionStore {
    fn insert(&self, session: GameSession) -> Result<(), ServiceError> {
        self.sessions.lock().insert(session.session_id.clone(), session);
        Ok(())
    }

    fn get(&self, id: &str) -> Result<Option<GameSession>, ServiceError> {
        Ok(self.sessions.lock().get(id).cloned())
    }

    fn end(&self, id: &str, game_data: Value, now: DateTime<Utc>) -> Result<Ended, ServiceError> {
        let mut sessions = self.sessions.lock();
        let session = sessions
            .get_mut(id)
            .ok_or_else(|| ServiceError::NotFound(id.to_string()))?;
        let changed = end_in_place(session, game_data, now);
        Ok(Ended {
            session: session.clone(),
            already_ended: !changed,
        })
    }
}

/// One JSON document per session under `dir`, replaced via temp file and
/// rename so a crash never leaves a half-written session.
#[derive(Debug)]
pub struct FileSessionStore {
    dir: PathBuf,
    lock: Mutex<()>,
}

impl FileSessionStore {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, ServiceError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            lock: Mutex::new(()),
        })
    }

    fn path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }

    fn read(&self, id: &str) -> Result<Option<GameSession>, ServiceError> {
        if !is_session_id(id) {
            return Ok(None);
        }
        match fs::read(self.path(id)) {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, session: &GameSession) -> Result<(), ServiceError> {
        if !is_session_id(&session.session_id) {
            return Err(ServiceError::InvalidArgument(format!(
                "malformed session id {}",
                session.session_id
            )));
        }
        let path = self.path(&session.session_id);
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, serde_json::to_vec_pretty(session)?)?;
        fs::rename(tmp_path, path)?;
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn insert(&self, session: GameSession) -> Result<(), ServiceError> {
        let _guard = self.lock.lock();
        self.write(&session)
    }

    fn get(&self, id: &str) -> Result<Option<GameSession>, ServiceError> {
        let _guard = self.lock.lock();
        self.read(id)
    }

    fn end(&self, id: &str, game_data: Value, now: DateTime<Utc>) -> Result<Ended, ServiceError> {
        let _guard = self.lock.lock();
        let mut session = self.read(id)?.ok_or_else(|| ServiceError::NotFound(id.to_string()))?;
        let changed = end_in_place(&mut session, game_data, now);
        if changed {
            self.write(&session)?;
        }
        Ok(Ended {
            session,
            already_ended: !changed,
        })
    }
}

/// Commitment service: issues, reveals and serves sessions.
pub struct SessionService {
    store: Arc<dyn SessionStore>,
    oracle: Arc<dyn BlockchainOracle>,
    oracle_timeout: Duration,
}

impl SessionService {
    pub fn new(store: Arc<dyn SessionStore>, oracle: Arc<dyn BlockchainOracle>, oracle_timeout: Duration) -> Self {
        Self {
            store,
            oracle,
            oracle_timeout,
        }
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// Commits to a fresh secret, then anchors to the latest block. The
    /// commitment exists before the block is fetched; an unreachable oracle
    /// leaves the session unanchored rather than failing the start.
    pub async fn start(&self, game_type: Option<&str>) -> Result<StartSessionResponse, ServiceError> {
        let game_type: GameType = game_type
            .ok_or_else(|| ServiceError::InvalidArgument("missing gameType".to_string()))?
            .parse()?;

        let pair = commitment::generate();
        let anchor = match bounded(self.oracle_timeout, self.oracle.get_latest_block()).await {
            Ok(block) => Some(block.anchor()),
            Err(e) => {
                tracing::warn!("starting {} session unanchored: {}", game_type, e);
                None
            }
        };

        let session = GameSession::new(game_type, pair, anchor, Utc::now());
        let response = StartSessionResponse {
            session_id: session.session_id.clone(),
            game_type,
            secret_hash: session.secret_hash.clone(),
            created_at: session.created_at,
            block_hash: session.anchor.as_ref().map(|a| a.block_hash.clone()),
            block_height: session.anchor.as_ref().map(|a| a.block_height),
            timestamp: session.anchor.as_ref().map(|a| a.timestamp),
        };
        self.store.insert(session)?;

        metrics::counter!(SESSIONS_STARTED, 1, "game" => game_type.as_str());
        tracing::info!("session {} started for {}", response.session_id, game_type);
        Ok(response)
    }

    pub fn end(&self, id: &str, game_data: Value) -> Result<RevealPayload, ServiceError> {
        let ended = self.store.end(id, game_data, Utc::now())?;
        let session = &ended.session;
        let ended_at = session.ended_at.ok_or(ServiceError::Internal)?;

        if !ended.already_ended {
            metrics::counter!(SESSIONS_ENDED, 1, "game" => session.game_type.as_str());
            tracing::info!("session {} ended, secret revealed", id);
        } else {
            tracing::debug!("session {} already ended, returning stored reveal", id);
        }
        Ok(session.reveal_payload(ended_at, ended.already_ended))
    }

    pub fn view(&self, id: &str) -> Result<SessionView, ServiceError> {
        self.store
            .get(id)?
            .map(|s| s.view())
            .ok_or_else(|| ServiceError::NotFound(id.to_string()))
    }

    /// Ended session by id, for validation against its reveal.
    pub fn ended(&self, id: &str) -> Result<Option<GameSession>, ServiceError> {
        Ok(self.store.get(id)?.filter(GameSession::is_ended))
    }

    /// Values the game needs while it is still being played. Derived from
    /// the hidden secret, so they are only served for active sessions.
    pub fn random(&self, id: &str, purpose: &str, draw: Draw) -> Result<RandomResponse, ServiceError> {
        let session = self
            .store
            .get(id)?
            .ok_or_else(|| ServiceError::NotFound(id.to_string()))?;
        if session.is_ended() {
            return Err(ServiceError::Conflict(
                "session has ended; derive values from the reveal".to_string(),
            ));
        }
        let anchor = session
            .anchor
            .as_ref()
            .ok_or_else(|| ServiceError::Conflict("session has no block anchor".to_string()))?;
        if purpose.trim().is_empty() {
            return Err(ServiceError::InvalidArgument("purpose must not be empty".to_string()));
        }

        let seed = derive_anchored(&session.server_secret, anchor, purpose);
        let values = match draw {
            Draw::Shuffle { n } => {
                if n == 0 || n as u64 > DECK_SIZE {
                    return Err(ServiceError::InvalidArgument(format!(
                        "shuffle size must be 1-{DECK_SIZE}"
                    )));
                }
                DrawValue::Permutation(shuffle(&seed, n))
            }
            Draw::Die { roll_index } => DrawValue::Die(die_roll(&seed, roll_index)),
            Draw::Tile { move_index, empty_cells } => DrawValue::Tile(tile_spawn(&seed, move_index, empty_cells)?),
        };

        Ok(RandomResponse {
            session_id: session.session_id,
            purpose: purpose.to_string(),
            values,
        })
    }
}
