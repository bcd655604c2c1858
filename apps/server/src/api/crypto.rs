use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use cryptorank_core::constants::{MAX_METRIC_LIMIT, SCHEDULE_INTERVAL};
use cryptorank_core::{PriorityTier, RankedEntry, SemanticType};
use serde::Serialize;
use serde_json::json;

use crate::main_lib::AppState;

fn update_cadence() -> String {
    format!("Every {} minutes", SCHEDULE_INTERVAL.as_secs() / 60)
}

/// Current snapshot, or 404 until the first run has published one.
async fn get_crypto_data(State(state): State<Arc<AppState>>) -> Response {
    match state.reader.get_current().await {
        Some(snapshot) => Json(snapshot).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "No crypto data available yet",
                "message": format!("Data is updated {}", update_cadence().to_lowercase()),
                "manual_trigger": "POST /dev/trigger",
            })),
        )
            .into_response(),
    }
}

#[derive(Serialize)]
struct MetricInfo {
    name: String,
    priority: PriorityTier,
    description: String,
    value_type: SemanticType,
}

#[derive(Serialize)]
struct CryptoInfo {
    metrics: BTreeMap<String, MetricInfo>,
    total: usize,
    high_priority: Vec<String>,
    medium_priority: Vec<String>,
    update_schedule: String,
    data_endpoint: &'static str,
}

/// Describe the metric registry.
async fn get_crypto_info(State(state): State<Arc<AppState>>) -> Json<CryptoInfo> {
    let registry = &state.registry;
    let metrics = registry
        .list_metrics()
        .iter()
        .map(|d| {
            (
                d.key.clone(),
                MetricInfo {
                    name: d.display_name.clone(),
                    priority: d.priority,
                    description: d.description.clone(),
                    value_type: d.semantic_type,
                },
            )
        })
        .collect();

    let owned = |keys: Vec<&str>| -> Vec<String> { keys.into_iter().map(str::to_string).collect() };

    Json(CryptoInfo {
        metrics,
        total: registry.len(),
        high_priority: owned(registry.keys_by_tier(PriorityTier::High)),
        medium_priority: owned(registry.keys_by_tier(PriorityTier::Medium)),
        update_schedule: update_cadence(),
        data_endpoint: "/api/crypto/data",
    })
}

#[derive(Serialize)]
struct LegacyListResponse {
    message: &'static str,
    sort: String,
    limit: usize,
    data: Vec<RankedEntry>,
    count: usize,
    timestamp: chrono::DateTime<chrono::Utc>,
    source: &'static str,
    status: &'static str,
}

/// Single-metric view of the current snapshot, kept for older clients.
async fn list_cryptocurrencies(
    State(state): State<Arc<AppState>>,
    Path((sort, limit)): Path<(String, String)>,
) -> Response {
    if !state.registry.contains(&sort) {
        let valid: Vec<&str> = state.registry.keys().collect();
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "Invalid sort parameter",
                "valid": valid,
                "suggestion": "Use /api/crypto/data for all metrics",
            })),
        )
            .into_response();
    }

    let limit = match limit.parse::<usize>() {
        Ok(limit) if (1..=MAX_METRIC_LIMIT).contains(&limit) => limit,
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": format!("Limit must be between 1 and {}", MAX_METRIC_LIMIT),
                })),
            )
                .into_response();
        }
    };

    let Some(snapshot) = state.reader.get_current().await else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "No data available",
                "suggestion": "Use /api/crypto/data",
            })),
        )
            .into_response();
    };

    let Some(outcome) = snapshot.outcome(&sort) else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": format!("Metric '{}' not found", sort),
                "suggestion": "Use /api/crypto/data for all metrics",
            })),
        )
            .into_response();
    };

    let data: Vec<RankedEntry> = outcome.all_entries().iter().take(limit).cloned().collect();

    Json(LegacyListResponse {
        message: "Crypto data from unified API",
        sort,
        limit,
        count: data.len(),
        data,
        timestamp: snapshot.captured_at,
        source: "unified-api",
        status: "completed",
    })
    .into_response()
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/crypto/data", get(get_crypto_data))
        .route("/api/crypto/info", get(get_crypto_info))
        .route(
            "/list/cryptocurrencies/{sort}/{limit}",
            get(list_cryptocurrencies),
        )
}
