// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, Request as AxumRequest, State};
use axum::http::header::AUTHORIZATION;
use axum::http::StatusCode;
use axum::middleware::{from_fn_with_state, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api::*;
use crate::config::NodeConfig;
use crate::dispatcher::{http_status, Dispatcher};
use crate::errors::ServiceError;
use crate::fraud::HistoryRegistry;
use crate::leaderboard::{Leaderboard, MemoryLeaderboard, MemoryReviewQueue, ReviewQueue};
use crate::oracle::{BlockchainOracle, HttpOracle, OfflineOracle};
use crate::rate_limit::RateLimiter;
use crate::sessions::{FileSessionStore, MemorySessionStore, SessionService, SessionStore};

/// The pluggable parts of a node. Everything else is built from config.
pub struct Collaborators {
    pub store: Arc<dyn SessionStore>,
    pub oracle: Arc<dyn BlockchainOracle>,
    pub leaderboard: Arc<dyn Leaderboard>,
    pub reviews: Arc<dyn ReviewQueue>,
}

impl Collaborators {
    pub fn in_memory(oracle: Arc<dyn BlockchainOracle>) -> Self {
        Self {
            store: Arc::new(MemorySessionStore::new()),
            oracle,
            leaderboard: Arc::new(MemoryLeaderboard::new()),
            reviews: Arc::new(MemoryReviewQueue::new()),
        }
    }

    /// File store when `session_dir` is set, HTTP oracle when `oracle_url`
    /// is set; memory and offline otherwise.
    pub fn from_config(cfg: &NodeConfig) -> Result<Self, ServiceError> {
        let oracle: Arc<dyn BlockchainOracle> = match &cfg.oracle_url {
            Some(url) => Arc::new(
                HttpOracle::new(url, cfg.oracle_timeout)
                    .map_err(|e| ServiceError::InvalidArgument(format!("ORACLE_URL: {e}")))?,
            ),
            None => {
                tracing::warn!("No ORACLE_URL configured: sessions start unanchored");
                Arc::new(OfflineOracle)
            }
        };
        let mut collab = Self::in_memory(oracle);
        if let Some(dir) = &cfg.session_dir {
            collab.store = Arc::new(FileSessionStore::open(dir)?);
        }
        Ok(collab)
    }
}

#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionService>,
    pub dispatcher: Arc<Dispatcher>,
}

impl AppState {
    pub fn new(cfg: &NodeConfig, collab: Collaborators) -> Self {
        let sessions = Arc::new(SessionService::new(
            collab.store,
            collab.oracle.clone(),
            cfg.oracle_timeout,
        ));
        let dispatcher = Dispatcher {
            level: cfg.validation_level,
            fraud: cfg.fraud.clone(),
            oracle_timeout: cfg.oracle_timeout,
            limiter: Arc::new(RateLimiter::new(cfg.rate_limit.clone())),
            history: Arc::new(HistoryRegistry::new(cfg.fraud.max_fingerprints)),
            sessions: sessions.clone(),
            oracle: collab.oracle,
            leaderboard: collab.leaderboard,
            reviews: collab.reviews,
        };
        Self {
            sessions,
            dispatcher: Arc::new(dispatcher),
        }
    }

    pub fn from_config(cfg: &NodeConfig) -> Result<Self, ServiceError> {
        Ok(Self::new(cfg, Collaborators::from_config(cfg)?))
    }
}

async fn auth_guard(
    State(token): State<Arc<Option<String>>>,
    req: AxumRequest,
    next: Next,
) -> Result<Response, StatusCode> {
    if let Some(token_str) = &*token {
        let provided = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|val| val.to_str().ok())
            .and_then(|val| val.strip_prefix("Bearer "));
        if provided == Some(token_str.as_str()) {
            return Ok(next.run(req).await);
        }
        return Err(StatusCode::UNAUTHORIZED);
    }
    Ok(next.run(req).await)
}

pub fn build_router(state: AppState, auth_token: Option<String>) -> Router {
    let mut app = Router::new()
        .route("/session/start", post(start_session))
        .route("/session/end", post(end_session))
        .route("/session/random", post(random_values))
        .route("/session/:id", get(get_session))
        .route("/submit-score", post(submit_score))
        .route("/health", get(health))
        .route("/metrics", get(metrics_handler))
        .with_state(state);

    if let Some(token) = auth_token {
        tracing::info!("Auth Enabled: Bearer token required");
        let auth_state = Arc::new(Some(token));
        app = app.layer(from_fn_with_state(auth_state, auth_guard));
    } else {
        tracing::warn!("Auth Disabled: No token configured");
    }

    app.layer(CorsLayer::permissive()).layer(TraceLayer::new_for_http())
}

/// Bodies are taken raw so a malformed request becomes a 400 with our own
/// error shape instead of the extractor's rejection.
fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, ServiceError> {
    serde_json::from_slice(body).map_err(|e| ServiceError::InvalidArgument(format!("malformed request body: {e}")))
}

async fn start_session(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<StartSessionResponse>, ServiceError> {
    let req: StartSessionRequest = parse_body(&body)?;
    let resp = state.sessions.start(req.game_type.as_deref()).await?;
    Ok(Json(resp))
}

async fn end_session(
    State(state): State<AppState>,
    Json(req): Json<EndSessionRequest>,
) -> Result<Json<RevealPayload>, ServiceError> {
    Ok(Json(state.sessions.end(&req.session_id, req.game_data)?))
}

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, ServiceError> {
    Ok(Json(state.sessions.view(&id)?))
}

async fn random_values(
    State(state): State<AppState>,
    Json(req): Json<RandomRequest>,
) -> Result<Json<RandomResponse>, ServiceError> {
    Ok(Json(state.sessions.random(&req.session_id, &req.purpose, req.draw)?))
}

async fn submit_score(State(state): State<AppState>, body: Bytes) -> Result<Response, ServiceError> {
    let value: Value = parse_body(&body)?;
    let result = state.dispatcher.submit(&value).await;
    Ok((http_status(&result), Json(result)).into_response())
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

async fn metrics_handler() -> String {
    crate::telemetry::get_metrics()
}
