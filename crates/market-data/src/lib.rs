// In crates/market-data/src/lib.rs

//! The data-source side of the dashboard: a provider abstraction, the Yahoo
//! chart implementation, and [`DataSource`], which turns raw provider rows
//! into a clean [`Series`](core_types::Series).

pub mod error;
pub mod provider;
pub mod source;
pub mod types;
pub mod yahoo;

// Re-export public types
pub use error::{FetchError, ProviderError, Result};
pub use provider::{MarketDataProvider, ProviderRow};
pub use source::{DataSource, lookback_for};
pub use yahoo::YahooProvider;
