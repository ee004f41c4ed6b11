// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

static PROM_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

pub const SESSIONS_STARTED: &str = "fairplay_sessions_started_total";
pub const SESSIONS_ENDED: &str = "fairplay_sessions_ended_total";
pub const SUBMISSIONS: &str = "fairplay_submissions_total";
pub const VALIDATION_DURATION: &str = "fairplay_validation_duration_seconds";
pub const ORACLE_FAILURES: &str = "fairplay_oracle_failures_total";

/// Initialize telemetry (logs + metrics)
pub fn init_telemetry() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "fairplay_node=debug,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .try_init()?;

    let handle = PrometheusBuilder::new().install_recorder()?;
    if PROM_HANDLE.set(handle).is_err() {
        tracing::warn!("Prometheus handle already set. Telemetry re-initialized?");
    }

    metrics::describe_counter!(SESSIONS_STARTED, "Sessions started (commitments issued)");
    metrics::describe_counter!(SESSIONS_ENDED, "Sessions ended for the first time (secrets revealed)");
    metrics::describe_counter!(SUBMISSIONS, "Score submissions by outcome status");
    metrics::describe_histogram!(VALIDATION_DURATION, "Time spent validating one submission");
    metrics::describe_counter!(ORACLE_FAILURES, "Oracle calls that failed or timed out");

    metrics::gauge!("fairplay_node_up", 1.0);
    Ok(())
}

/// Get the Prometheus handle to render metrics
pub fn get_metrics() -> String {
    if let Some(handle) = PROM_HANDLE.get() {
        handle.render()
    } else {
        "# metrics not initialized".to_string()
    }
}
