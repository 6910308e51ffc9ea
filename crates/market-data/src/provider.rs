// In crates/market-data/src/provider.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use core_types::{Interval, Lookback, Symbol};

use crate::error::Result;

/// One row as a provider hands it over, with every price field nullable.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRow {
    pub datetime: DateTime<Utc>,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<f64>,
}

/// An opaque source of raw OHLCV rows.
///
/// Implementations return the rows exactly as the vendor sent them; cleaning
/// and trimming belong to [`DataSource`](crate::DataSource).
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Short provider name used in logs.
    fn name(&self) -> &'static str;

    async fn download(
        &self,
        symbol: &Symbol,
        lookback: Lookback,
        interval: Interval,
    ) -> Result<Vec<ProviderRow>>;
}
