// In crates/market-data/src/source.rs

use core_types::{Bar, Interval, Lookback, Series, Symbol};

use crate::error::FetchError;
use crate::provider::{MarketDataProvider, ProviderRow};

/// Request window for a raw interval string. Unknown intervals get 60 days.
pub fn lookback_for(interval: &str) -> Lookback {
    Lookback::for_interval(interval)
}

/// Fetches a clean, bounded [`Series`] from a provider.
pub struct DataSource {
    provider: Box<dyn MarketDataProvider>,
}

impl DataSource {
    pub fn new(provider: Box<dyn MarketDataProvider>) -> Self {
        Self { provider }
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Returns at most the last `limit` well-formed bars for `symbol`.
    ///
    /// Zero usable rows is `NoDataAvailable`; any provider failure is
    /// `FetchFailure`. Neither panics or propagates past this boundary as
    /// anything other than a value.
    pub async fn fetch(
        &self,
        symbol: &Symbol,
        interval: Interval,
        limit: usize,
    ) -> Result<Series, FetchError> {
        if limit == 0 {
            return Err(FetchError::FetchFailure("limit must be positive".into()));
        }

        let lookback = interval.lookback();
        tracing::info!(
            provider = self.provider.name(),
            symbol = %symbol,
            interval = %interval,
            lookback = %lookback,
            limit,
            "Fetching price history"
        );

        let rows = self
            .provider
            .download(symbol, lookback, interval)
            .await
            .map_err(|e| {
                tracing::warn!(symbol = %symbol, error = %e, "Provider request failed");
                FetchError::from(e)
            })?;

        if rows.is_empty() {
            tracing::warn!(symbol = %symbol, interval = %interval, "Provider returned no rows");
            return Err(FetchError::NoDataAvailable);
        }

        let received = rows.len();
        let bars = normalize(rows);
        if bars.len() < received {
            tracing::debug!(
                received,
                kept = bars.len(),
                "Dropped incomplete, malformed or duplicate rows"
            );
        }
        if bars.is_empty() {
            return Err(FetchError::NoDataAvailable);
        }

        let start = bars.len().saturating_sub(limit);
        let bars = bars[start..].to_vec();
        tracing::info!(symbol = %symbol, bars = bars.len(), "Price history ready");

        Ok(Series::from_sorted(bars))
    }
}

/// Maps provider columns onto canonical bars, drops incomplete or malformed
/// rows, and orders the result by timestamp. When the provider repeats a
/// timestamp the later row wins.
fn normalize(rows: Vec<ProviderRow>) -> Vec<Bar> {
    let mut bars: Vec<Bar> = rows
        .into_iter()
        .filter_map(|row| {
            let bar = Bar {
                timestamp: row.datetime,
                open: row.open?,
                high: row.high?,
                low: row.low?,
                close: row.close?,
                volume: row.volume?,
            };
            bar.is_well_formed().then_some(bar)
        })
        .collect();

    // Stable, so rows sharing a timestamp keep provider order.
    bars.sort_by_key(|bar| bar.timestamp);

    let mut deduped: Vec<Bar> = Vec::with_capacity(bars.len());
    for bar in bars {
        match deduped.last_mut() {
            Some(last) if last.timestamp == bar.timestamp => *last = bar,
            _ => deduped.push(bar),
        }
    }
    deduped
}
