use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use cryptorank_core::constants::{SCHEDULE_INTERVAL, SNAPSHOT_KEY};
use serde::Serialize;

use crate::main_lib::AppState;

#[derive(Serialize)]
struct ServiceStatus {
    status: &'static str,
    service: &'static str,
    version: &'static str,
    metrics: usize,
    update_freq: String,
    redis_key: &'static str,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    store: &'static str,
    store_available: bool,
}

/// Service banner.
async fn service_status(State(state): State<Arc<AppState>>) -> Json<ServiceStatus> {
    Json(ServiceStatus {
        status: "healthy",
        service: "cryptorank-server",
        version: env!("CARGO_PKG_VERSION"),
        metrics: state.registry.len(),
        update_freq: format!("Every {} minutes", SCHEDULE_INTERVAL.as_secs() / 60),
        redis_key: SNAPSHOT_KEY,
    })
}

/// Liveness plus snapshot store reachability.
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let store_available = match state.store.ping().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("Snapshot store ping failed: {}", e);
            false
        }
    };

    Json(HealthResponse {
        status: "healthy",
        store: state.store.backend(),
        store_available,
    })
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(service_status))
        .route("/health", get(health))
}
