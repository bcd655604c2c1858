//! Rankings provider trait definition.

use async_trait::async_trait;

use crate::errors::MarketDataError;
use crate::models::{ProviderCoin, RankingRequest};

/// Trait for sources of ranked coin lists.
///
/// Implementations perform exactly one attempt per call; callers decide what
/// to do with failures.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use cryptorank_market_data::provider::RankingsProvider;
///
/// struct FixedProvider(Vec<ProviderCoin>);
///
/// #[async_trait]
/// impl RankingsProvider for FixedProvider {
///     fn id(&self) -> &'static str {
///         "FIXED"
///     }
///
///     async fn list_coins(&self, request: &RankingRequest) -> Result<Vec<ProviderCoin>, MarketDataError> {
///         Ok(self.0.iter().take(request.limit).cloned().collect())
///     }
/// }
/// ```
#[async_trait]
pub trait RankingsProvider: Send + Sync {
    /// Unique identifier for this provider, used in logs and error messages.
    fn id(&self) -> &'static str;

    /// Fetch the provider's list sorted by `request.sort`, truncated to
    /// `request.limit` items, in provider rank order.
    ///
    /// An empty list is reported as [`MarketDataError::NoData`].
    async fn list_coins(
        &self,
        request: &RankingRequest,
    ) -> Result<Vec<ProviderCoin>, MarketDataError>;
}
