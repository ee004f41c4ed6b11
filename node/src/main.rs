// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use anyhow::Context;
use fairplay_node::config::NodeConfig;
use fairplay_node::server::{build_router, AppState};
use fairplay_node::telemetry::init_telemetry;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_telemetry()?;

    let cfg = NodeConfig::from_env()?;
    tracing::info!(
        "Initializing Fairplay Node: level {:?}, rate limit {:?}, fraud {:?}",
        cfg.validation_level,
        cfg.rate_limit,
        cfg.fraud
    );

    let state = AppState::from_config(&cfg).context("building node state")?;
    let app = build_router(state, cfg.auth_token.clone());

    let addr = cfg.bind_addr;
    tracing::info!("Listening on {}", addr);
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    axum::serve(listener, app).await?;
    Ok(())
}
