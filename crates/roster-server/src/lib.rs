//! HTTP server for the educator portal's roster store.
//!
//! Wraps the [`roster_api`] router with a health probe and request tracing,
//! and defines the [`ServerConfig`] the binary reads from `config.toml`.

use std::{path::PathBuf, sync::Arc};

use axum::{Json, Router, routing::get};
use roster_api::ApiOptions;
use roster_core::store::RosterStore;
use roster_store_memory::{FixtureError, LatencyProfile, MemoryStore};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `ROSTER_*` environment variables. Every field has a default.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
  pub host:                        String,
  pub port:                        u16,
  /// Seed document; the bundled roster when unset.
  pub fixture_path:                Option<PathBuf>,
  /// Sleep for each operation's nominal delay.
  pub latency:                     bool,
  pub latency_scale:               f64,
  pub enforce_verification_window: bool,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:                        "127.0.0.1".to_string(),
      port:                        3000,
      fixture_path:                None,
      latency:                     false,
      latency_scale:               1.0,
      enforce_verification_window: false,
    }
  }
}

impl ServerConfig {
  pub fn latency_profile(&self) -> LatencyProfile {
    if self.latency {
      LatencyProfile::Simulated { scale: self.latency_scale }
    } else {
      LatencyProfile::Disabled
    }
  }

  pub fn api_options(&self) -> ApiOptions {
    ApiOptions { enforce_verification_window: self.enforce_verification_window }
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  /// Seed a store from the configured fixture, or the bundled one.
  pub async fn open_store(&self) -> Result<MemoryStore, FixtureError> {
    let store = match &self.fixture_path {
      Some(path) => MemoryStore::open(path).await?,
      None => MemoryStore::with_default_fixture()?,
    };
    Ok(store.with_latency(self.latency_profile()))
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// The full application: the API under `/api`, `GET /health`, and request
/// tracing.
pub fn app<S>(store: Arc<S>, config: &ServerConfig) -> Router
where
  S: RosterStore + 'static,
{
  Router::new()
    .route("/health", get(health))
    .nest("/api", roster_api::api_router(store, config.api_options()))
    .layer(TraceLayer::new_for_http())
}

async fn health() -> Json<Value> { Json(json!({ "status": "ok" })) }
