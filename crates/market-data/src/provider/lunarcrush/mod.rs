//! LunarCrush rankings provider implementation.
//!
//! Fetches ranked coin lists from the public v4 API:
//! `GET /coins/list/v2?sort={sort}&limit={limit}` with a bearer API key.
//!
//! API documentation: https://lunarcrush.com/developers/api/endpoints

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, info, warn};

use crate::errors::MarketDataError;
use crate::models::{CoinListResponse, ProviderCoin, RankingRequest};
use crate::provider::RankingsProvider;

/// Public API root.
pub const DEFAULT_BASE_URL: &str = "https://lunarcrush.com/api4/public";

const PROVIDER_ID: &str = "LUNARCRUSH";

/// Default HTTP request timeout
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// LunarCrush rankings provider.
///
/// One instance holds a pooled HTTP client and is shared across concurrent
/// fetches.
pub struct LunarCrushProvider {
    client: Client,
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl LunarCrushProvider {
    /// Create a new provider against the public API.
    pub fn new(api_key: String) -> Self {
        Self::with_config(api_key, DEFAULT_BASE_URL.to_string(), REQUEST_TIMEOUT)
    }

    /// Create a provider with a custom base URL and per-request timeout.
    pub fn with_config(api_key: String, base_url: String, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn list_url(&self) -> String {
        format!("{}/coins/list/v2", self.base_url)
    }

    fn map_send_error(&self, e: reqwest::Error) -> MarketDataError {
        if e.is_timeout() {
            MarketDataError::Timeout {
                provider: PROVIDER_ID.to_string(),
                timeout_secs: self.timeout.as_secs(),
            }
        } else if e.is_builder() {
            MarketDataError::InvalidRequest(e.to_string())
        } else {
            MarketDataError::Request(e.to_string())
        }
    }

    /// Make the GET request and return the raw body of a successful response.
    async fn fetch(&self, request: &RankingRequest) -> Result<String, MarketDataError> {
        let url = self.list_url();
        let limit = request.limit.to_string();

        debug!(
            "LunarCrush request: {}?sort={}&limit={}",
            url, request.sort, limit
        );

        let response = self
            .client
            .get(&url)
            .query(&[("sort", request.sort.as_str()), ("limit", limit.as_str())])
            .bearer_auth(&self.api_key)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            return Err(MarketDataError::Unauthorized {
                provider: PROVIDER_ID.to_string(),
            });
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(MarketDataError::RateLimited {
                provider: PROVIDER_ID.to_string(),
            });
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                self.map_send_error(e)
            } else {
                MarketDataError::ReadBody(e.to_string())
            }
        })?;

        if !status.is_success() {
            return Err(MarketDataError::http_status(status.as_u16(), &body));
        }

        Ok(body)
    }
}

#[async_trait]
impl RankingsProvider for LunarCrushProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn list_coins(
        &self,
        request: &RankingRequest,
    ) -> Result<Vec<ProviderCoin>, MarketDataError> {
        let started = Instant::now();

        let body = match self.fetch(request).await {
            Ok(body) => body,
            Err(e) => {
                warn!("LunarCrush {} failed: {}", request.sort, e);
                return Err(e);
            }
        };

        let response: CoinListResponse = serde_json::from_str(&body)?;
        let mut coins = response.data;

        if coins.is_empty() {
            return Err(MarketDataError::NoData);
        }

        coins.truncate(request.limit);

        info!(
            "LunarCrush {}: {} coins in {}ms",
            request.sort,
            coins.len(),
            started.elapsed().as_millis()
        );

        Ok(coins)
    }
}
