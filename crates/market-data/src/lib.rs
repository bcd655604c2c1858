//! Crypto Rankings Market Data Crate
//!
//! Provider access for the rankings pipeline: a provider-agnostic trait for
//! fetching ranked coin lists and the LunarCrush implementation of it.
//!
//! # Core Types
//!
//! - [`RankingsProvider`] - Source of ranked coin lists
//! - [`RankingRequest`] - Sort key and item limit for one request
//! - [`ProviderCoin`] - One coin record as returned by a provider
//! - [`MarketDataError`] - Why a request failed

pub mod errors;
pub mod models;
pub mod provider;

pub use errors::MarketDataError;
pub use models::{CoinListResponse, ProviderCoin, RankingRequest};
pub use provider::lunarcrush::LunarCrushProvider;
pub use provider::RankingsProvider;
