// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use fairplay_kernel::ValidationLevel;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{key}: invalid value '{value}' ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub enabled: bool,
    pub window: Duration,
    pub max_requests: u32,
    /// Upper bound on tracked identities.
    pub max_identities: usize,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            window: Duration::from_secs(60),
            max_requests: 10,
            max_identities: 10_000,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FraudConfig {
    pub enabled: bool,
    /// Risk score at or above which a submission goes to review.
    pub review_threshold: u8,
    /// History fingerprints remembered for duplicate detection.
    pub max_fingerprints: usize,
}

impl Default for FraudConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            review_threshold: 70,
            max_fingerprints: 50_000,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub bind_addr: SocketAddr,
    pub validation_level: ValidationLevel,
    pub rate_limit: RateLimitConfig,
    pub fraud: FraudConfig,
    /// Unset means no oracle: sessions start unanchored.
    pub oracle_url: Option<String>,
    pub oracle_timeout: Duration,
    /// Unset keeps sessions in memory.
    pub session_dir: Option<PathBuf>,
    pub auth_token: Option<String>,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            validation_level: ValidationLevel::Full,
            rate_limit: RateLimitConfig::default(),
            fraud: FraudConfig::default(),
            oracle_url: None,
            oracle_timeout: Duration::from_millis(2000),
            session_dir: None,
            auth_token: None,
        }
    }
}

impl NodeConfig {
    /// Reads the process environment on top of the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`NodeConfig::from_env`] with an explicit source, so tests
    /// don't have to touch process-wide state.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut cfg = Self::default();

        if let Some(v) = get("FAIRPLAY_BIND_ADDR") {
            cfg.bind_addr = parse("FAIRPLAY_BIND_ADDR", &v)?;
        }
        if let Some(v) = get("VALIDATION_LEVEL") {
            cfg.validation_level = v.parse().map_err(|e: fairplay_kernel::ValidationError| ConfigError::Invalid {
                key: "VALIDATION_LEVEL",
                value: v.clone(),
                reason: e.reason,
            })?;
        }
        if let Some(v) = get("RATE_LIMIT_ENABLED") {
            cfg.rate_limit.enabled = parse_bool("RATE_LIMIT_ENABLED", &v)?;
        }
        if let Some(v) = get("RATE_LIMIT_WINDOW_SECS") {
            let secs: u64 = parse("RATE_LIMIT_WINDOW_SECS", &v)?;
            if secs == 0 {
                return Err(invalid("RATE_LIMIT_WINDOW_SECS", &v, "must be positive"));
            }
            cfg.rate_limit.window = Duration::from_secs(secs);
        }
        if let Some(v) = get("RATE_LIMIT_MAX_REQUESTS") {
            cfg.rate_limit.max_requests = parse("RATE_LIMIT_MAX_REQUESTS", &v)?;
        }
        if let Some(v) = get("RATE_LIMIT_MAX_IDENTITIES") {
            let n: usize = parse("RATE_LIMIT_MAX_IDENTITIES", &v)?;
            if n == 0 {
                return Err(invalid("RATE_LIMIT_MAX_IDENTITIES", &v, "must be positive"));
            }
            cfg.rate_limit.max_identities = n;
        }
        if let Some(v) = get("FRAUD_DETECTION_ENABLED") {
            cfg.fraud.enabled = parse_bool("FRAUD_DETECTION_ENABLED", &v)?;
        }
        if let Some(v) = get("FRAUD_REVIEW_THRESHOLD") {
            let t: u8 = parse("FRAUD_REVIEW_THRESHOLD", &v)?;
            if t > 100 {
                return Err(invalid("FRAUD_REVIEW_THRESHOLD", &v, "must be 0-100"));
            }
            cfg.fraud.review_threshold = t;
        }
        cfg.oracle_url = get("ORACLE_URL");
        if let Some(v) = get("ORACLE_TIMEOUT_MS") {
            cfg.oracle_timeout = Duration::from_millis(parse("ORACLE_TIMEOUT_MS", &v)?);
        }
        cfg.session_dir = get("SESSION_DIR").map(PathBuf::from);
        cfg.auth_token = get("FAIRPLAY_AUTH_TOKEN");

        Ok(cfg)
    }
}

fn invalid(key: &'static str, value: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        key,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse<T>(key: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|e: T::Err| invalid(key, value, &e.to_string()))
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(invalid(key, value, "expected true or false")),
    }
}
