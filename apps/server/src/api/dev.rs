use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use cryptorank_core::TriggerSource;
use serde::Serialize;

use crate::{error::ApiResult, main_lib::AppState};

#[derive(Serialize)]
struct TriggerResponse {
    message: &'static str,
    status: &'static str,
    data_url: &'static str,
}

/// Start a manual pipeline run in the background.
///
/// Responds immediately; 409 when a run is already in flight.
async fn trigger_run(
    State(state): State<Arc<AppState>>,
) -> ApiResult<(StatusCode, Json<TriggerResponse>)> {
    let guard = state.pipeline.try_acquire()?;

    tracing::info!("Manual snapshot run triggered");
    let pipeline = state.pipeline.clone();
    tokio::spawn(async move {
        match pipeline.run_with(guard, TriggerSource::Manual).await {
            Ok(report) => tracing::info!(
                "Manual snapshot run: {} ok, {} failed, published={}",
                report.successful_fetches,
                report.failed_fetches,
                report.published
            ),
            Err(e) => tracing::warn!("Manual snapshot run failed: {}", e),
        }
    });

    Ok((
        StatusCode::ACCEPTED,
        Json(TriggerResponse {
            message: "Manual crypto fetch triggered",
            status: "processing",
            data_url: "/api/crypto/data",
        }),
    ))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/dev/trigger", post(trigger_run))
}
