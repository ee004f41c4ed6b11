// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("session not found: {0}")]
    NotFound(String),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// The request is well formed but the resource is in the wrong state.
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("internal error")]
    Internal,
}

impl ServiceError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            ServiceError::Conflict(_) => StatusCode::CONFLICT,
            ServiceError::Storage(_) | ServiceError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("request failed: {}", self);
        }
        let body = Json(json!({
            "error": self.to_string()
        }));
        (status, body).into_response()
    }
}

impl From<std::io::Error> for ServiceError {
    fn from(e: std::io::Error) -> Self {
        ServiceError::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(e: serde_json::Error) -> Self {
        ServiceError::Storage(e.to_string())
    }
}

impl From<fairplay_kernel::ValidationError> for ServiceError {
    fn from(e: fairplay_kernel::ValidationError) -> Self {
        ServiceError::InvalidArgument(e.reason)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum OracleError {
    #[error("oracle timed out after {0}ms")]
    Timeout(u64),
    #[error("oracle transport: {0}")]
    Transport(String),
    #[error("block not found: {0}")]
    NotFound(String),
    #[error("oracle response malformed: {0}")]
    Decode(String),
    /// No oracle is configured.
    #[error("oracle offline")]
    Offline,
}
