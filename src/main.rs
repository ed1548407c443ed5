//! Scramble Match · WCIF scramble assignment backend
//!
//! - Axum HTTP API: import generator output, auto-assign scramble sheets to
//!   rounds, clear assignments, export WCIF and results files
//! - Static front-end fallback (configurable directory)
//!
//! Important env variables:
//!   PORT                   : u16 (default 3000)
//!   SCRAMBLES_CONFIG_PATH  : path to TOML config (see `config.rs`)
//!   LOG_LEVEL              : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT             : "pretty" (default) or "json"

mod telemetry;
mod config;
mod domain;
mod error;
mod export;
mod ids;
mod import;
mod matching;
mod protocol;
mod routes;
mod state;

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::info;

use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  // Shared state: id allocator + config.
  let state = Arc::new(AppState::new());

  let app = build_router(state.clone());

  let addr: SocketAddr = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "scramble_match_backend", %addr, "HTTP server listening");
  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(target: "scramble_match_backend", error = %e, "Failed to listen for shutdown signal");
    std::future::pending::<()>().await;
  }
  info!(target: "scramble_match_backend", "Shutdown signal received");
}
