//! Rankings provider abstractions and implementations.
//!
//! This module contains:
//! - The `RankingsProvider` trait that all providers implement
//! - Concrete provider implementations (LunarCrush)

mod traits;

pub mod lunarcrush;

// Re-exports
pub use traits::RankingsProvider;
