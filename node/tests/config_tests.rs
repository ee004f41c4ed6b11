// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::collections::HashMap;
use std::time::Duration;

use fairplay_kernel::ValidationLevel;
use fairplay_node::config::{ConfigError, NodeConfig};

fn from_pairs(pairs: &[(&str, &str)]) -> Result<NodeConfig, ConfigError> {
    let env: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    NodeConfig::from_lookup(|key| env.get(key).cloned())
}

#[test]
fn defaults_when_nothing_is_set() {
    let cfg = from_pairs(&[]).unwrap();
    assert_eq!(cfg.bind_addr.to_string(), "127.0.0.1:3000");
    assert_eq!(cfg.validation_level, ValidationLevel::Full);
    assert!(cfg.rate_limit.enabled);
    assert_eq!(cfg.rate_limit.window, Duration::from_secs(60));
    assert_eq!(cfg.rate_limit.max_requests, 10);
    assert!(cfg.fraud.enabled);
    assert_eq!(cfg.fraud.review_threshold, 70);
    assert_eq!(cfg.oracle_timeout, Duration::from_millis(2000));
    assert!(cfg.oracle_url.is_none());
    assert!(cfg.session_dir.is_none());
    assert!(cfg.auth_token.is_none());
}

#[test]
fn reads_every_key() {
    let cfg = from_pairs(&[
        ("FAIRPLAY_BIND_ADDR", "0.0.0.0:8080"),
        ("VALIDATION_LEVEL", "logic"),
        ("RATE_LIMIT_ENABLED", "false"),
        ("RATE_LIMIT_WINDOW_SECS", "30"),
        ("RATE_LIMIT_MAX_REQUESTS", "5"),
        ("RATE_LIMIT_MAX_IDENTITIES", "100"),
        ("FRAUD_DETECTION_ENABLED", "0"),
        ("FRAUD_REVIEW_THRESHOLD", "55"),
        ("ORACLE_URL", "http://oracle.local/"),
        ("ORACLE_TIMEOUT_MS", "750"),
        ("SESSION_DIR", "/var/lib/fairplay"),
        ("FAIRPLAY_AUTH_TOKEN", "token"),
    ])
    .unwrap();

    assert_eq!(cfg.bind_addr.port(), 8080);
    assert_eq!(cfg.validation_level, ValidationLevel::Logic);
    assert!(!cfg.rate_limit.enabled);
    assert_eq!(cfg.rate_limit.window, Duration::from_secs(30));
    assert_eq!(cfg.rate_limit.max_requests, 5);
    assert_eq!(cfg.rate_limit.max_identities, 100);
    assert!(!cfg.fraud.enabled);
    assert_eq!(cfg.fraud.review_threshold, 55);
    assert_eq!(cfg.oracle_url.as_deref(), Some("http://oracle.local/"));
    assert_eq!(cfg.oracle_timeout, Duration::from_millis(750));
    assert_eq!(cfg.session_dir.unwrap().to_str(), Some("/var/lib/fairplay"));
    assert_eq!(cfg.auth_token.as_deref(), Some("token"));
}

#[test]
fn blank_values_fall_back_to_defaults() {
    let cfg = from_pairs(&[("ORACLE_URL", "  "), ("VALIDATION_LEVEL", "")]).unwrap();
    assert!(cfg.oracle_url.is_none());
    assert_eq!(cfg.validation_level, ValidationLevel::Full);
}

#[test]
fn invalid_values_name_the_key() {
    for (key, value) in [
        ("VALIDATION_LEVEL", "PARANOID"),
        ("RATE_LIMIT_ENABLED", "maybe"),
        ("RATE_LIMIT_WINDOW_SECS", "0"),
        ("RATE_LIMIT_MAX_REQUESTS", "-1"),
        ("FRAUD_REVIEW_THRESHOLD", "101"),
        ("ORACLE_TIMEOUT_MS", "soon"),
        ("FAIRPLAY_BIND_ADDR", "localhost"),
    ] {
        match from_pairs(&[(key, value)]) {
            Err(ConfigError::Invalid { key: k, .. }) => assert_eq!(k, key),
            other => panic!("{key}={value} gave {other:?}"),
        }
    }
}
