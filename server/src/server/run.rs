//! Router assembly and the serve loop.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::{routing::get, Json, Router};

use super::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/health",
            get(|| async { Json(serde_json::json!({ "status": "ok" })) }),
        )
        .route("/ws", get(super::ws::ws_handler))
        .with_state(state)
}

pub async fn run_server(addr: SocketAddr, state: AppState) -> Result<()> {
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;
    tracing::info!(%addr, "holdem server listening");
    axum::serve(listener, app)
        .await
        .context("server terminated")?;
    Ok(())
}
