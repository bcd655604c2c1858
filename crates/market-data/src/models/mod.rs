//! Market data models
//!
//! - `coin` - Provider coin records and the list envelope
//! - `request` - Ranked-list request parameters

mod coin;
mod request;

pub use coin::{CoinListResponse, ProviderCoin};
pub use request::RankingRequest;
