use std::net::SocketAddr;

use anyhow::{anyhow, bail, Context};
use cryptorank_core::constants::{DEFAULT_METRIC_LIMIT, MAX_METRIC_LIMIT};
use cryptorank_market_data::provider::lunarcrush::DEFAULT_BASE_URL;

/// Which snapshot store backs the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// Redis, falling back to memory when unreachable at startup
    Redis,
    Memory,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub cors_allow_origins: Vec<String>,
    pub api_key: String,
    pub provider_base_url: String,
    pub redis_url: String,
    pub store_backend: StoreBackend,
    pub metric_limit: usize,
    pub schedule_enabled: bool,
}

impl Config {
    /// Read configuration from the environment (and `.env`, if present).
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let api_key = std::env::var("LUNARCRUSH_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| anyhow!("LUNARCRUSH_API_KEY environment variable is required"))?;

        let port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());
        let listen_addr = std::env::var("CR_LISTEN_ADDR")
            .unwrap_or_else(|_| format!("0.0.0.0:{}", port))
            .parse()
            .context("Invalid CR_LISTEN_ADDR")?;

        let cors_allow_origins = std::env::var("CR_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let store_backend = match std::env::var("CR_STORE")
            .unwrap_or_else(|_| "redis".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "redis" => StoreBackend::Redis,
            "memory" => StoreBackend::Memory,
            other => bail!("Invalid CR_STORE '{}': expected 'redis' or 'memory'", other),
        };

        let metric_limit = match std::env::var("CR_METRIC_LIMIT") {
            Ok(raw) => parse_metric_limit(&raw)?,
            Err(_) => DEFAULT_METRIC_LIMIT,
        };

        let schedule_enabled = std::env::var("CR_SCHEDULE_ENABLED")
            .map(|v| !matches!(v.to_ascii_lowercase().as_str(), "false" | "0" | "no" | "off"))
            .unwrap_or(true);

        Ok(Self {
            listen_addr,
            cors_allow_origins,
            api_key,
            provider_base_url: std::env::var("LUNARCRUSH_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            redis_url: std::env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6379".to_string()),
            store_backend,
            metric_limit,
            schedule_enabled,
        })
    }
}

fn parse_metric_limit(raw: &str) -> anyhow::Result<usize> {
    let limit: usize = raw
        .trim()
        .parse()
        .with_context(|| format!("Invalid CR_METRIC_LIMIT '{}'", raw))?;
    if limit == 0 || limit > MAX_METRIC_LIMIT {
        bail!(
            "CR_METRIC_LIMIT must be between 1 and {}, got {}",
            MAX_METRIC_LIMIT,
            limit
        );
    }
    Ok(limit)
}
