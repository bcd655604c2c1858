use std::sync::Arc;

use cryptorank_core::constants::PROVIDER_REQUEST_TIMEOUT;
use cryptorank_core::snapshot::{InMemorySnapshotStore, RedisSnapshotStore, SnapshotStore};
use cryptorank_core::{MetricRegistry, SnapshotPipeline, SnapshotReader};
use cryptorank_market_data::{LunarCrushProvider, RankingsProvider};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{Config, StoreBackend};

pub struct AppState {
    pub pipeline: Arc<SnapshotPipeline>,
    pub reader: SnapshotReader,
    pub registry: Arc<MetricRegistry>,
    pub store: Arc<dyn SnapshotStore>,
}

pub fn init_tracing() {
    let log_format = std::env::var("CR_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

/// Pick the snapshot store. An unreachable Redis degrades to memory.
async fn build_store(config: &Config) -> Arc<dyn SnapshotStore> {
    match config.store_backend {
        StoreBackend::Memory => {
            tracing::info!("Using in-memory snapshot store");
            Arc::new(InMemorySnapshotStore::new())
        }
        StoreBackend::Redis => match RedisSnapshotStore::connect(&config.redis_url).await {
            Ok(store) => {
                tracing::info!("Using Redis snapshot store");
                Arc::new(store)
            }
            Err(e) => {
                tracing::warn!(
                    "Redis unavailable ({}); falling back to in-memory snapshot store",
                    e
                );
                Arc::new(InMemorySnapshotStore::new())
            }
        },
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let provider: Arc<dyn RankingsProvider> = Arc::new(LunarCrushProvider::with_config(
        config.api_key.clone(),
        config.provider_base_url.clone(),
        PROVIDER_REQUEST_TIMEOUT,
    ));
    tracing::info!("Provider base URL: {}", config.provider_base_url);

    let registry = Arc::new(MetricRegistry::standard());
    let store = build_store(config).await;
    let pipeline = Arc::new(SnapshotPipeline::new(
        provider,
        registry.clone(),
        store.clone(),
        config.metric_limit,
    )?);

    Ok(Arc::new(AppState {
        reader: pipeline.reader(),
        pipeline,
        registry,
        store,
    }))
}
