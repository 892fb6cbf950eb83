//! Diabetes Decision Trainer · Backend
//!
//! - Axum HTTP + WebSocket API (Study and Versus sessions, shuffles, reasoning feedback)
//! - Durable key-value store for currency, player names and theme
//! - Static SPA fallback (./static/index.html)
//!
//! Important env variables:
//!   PORT                : u16 (default 3000)
//!   TRAINER_CONFIG_PATH : path to TOML config (tunables, storage path, optional case bank)
//!   LOG_LEVEL           : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT          : "pretty" (default) or "json"

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::info;

use dxtrainer_backend::routes::build_router;
use dxtrainer_backend::state::AppState;
use dxtrainer_backend::telemetry;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  let state = Arc::new(AppState::new());
  let app = build_router(state.clone());

  let addr: SocketAddr = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "trainer_backend", %addr, cases = state.repo.len(), "HTTP server listening");
  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(target: "trainer_backend", error = %e, "Failed to listen for shutdown signal");
    return;
  }
  info!(target: "trainer_backend", "Shutdown signal received");
}
