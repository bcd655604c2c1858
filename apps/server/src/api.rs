use std::sync::Arc;

use axum::{
    http::{HeaderValue, Method},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{config::Config, main_lib::AppState};

pub mod crypto;
pub mod dev;
pub mod health;

fn cors_layer(config: &Config) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    if config.cors_allow_origins.iter().any(|origin| origin == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_allow_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}

pub fn app_router(state: Arc<AppState>, config: &Config) -> Router {
    Router::new()
        .merge(health::router())
        .merge(crypto::router())
        .merge(dev::router())
        .with_state(state)
        .layer(cors_layer(config))
        .layer(TraceLayer::new_for_http())
}
