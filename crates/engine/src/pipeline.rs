// In crates/engine/src/pipeline.rs

use anyhow::Result;
use app_config::Settings;
use core_types::{AugmentedSeries, Interval, Series, Signal, Symbol};
use indicators::{IndicatorEngine, SignalClassifier};
use market_data::{DataSource, FetchError, YahooProvider};

use crate::snapshot::{NO_DATA_WARNING, Snapshot};

/// Wires the data source, indicator engine and classifier together.
///
/// Holds no per-pass state; the same pipeline can serve any number of
/// passes, each of which recomputes everything from a fresh fetch.
pub struct Pipeline {
    source: DataSource,
    indicators: IndicatorEngine,
    classifier: SignalClassifier,
    limit: usize,
}

impl Pipeline {
    pub fn new(
        source: DataSource,
        indicators: IndicatorEngine,
        classifier: SignalClassifier,
        limit: usize,
    ) -> Self {
        Self {
            source,
            indicators,
            classifier,
            limit,
        }
    }

    /// Builds the production pipeline (Yahoo provider) from loaded settings.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let provider = YahooProvider::new(&settings.provider)?;
        Ok(Self::new(
            DataSource::new(Box::new(provider)),
            IndicatorEngine::new(settings.indicators)?,
            SignalClassifier::new(settings.signal)?,
            settings.dashboard.bar_limit,
        ))
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Runs one pass with the configured bar limit.
    pub async fn run(&self, symbol: &Symbol, interval: Interval) -> Snapshot {
        self.run_with_limit(symbol, interval, self.limit).await
    }

    /// Runs one fetch → apply → classify pass.
    ///
    /// Never fails: a fetch error becomes an empty series, a warning for the
    /// user, and a `NO_DATA` signal.
    pub async fn run_with_limit(
        &self,
        symbol: &Symbol,
        interval: Interval,
        limit: usize,
    ) -> Snapshot {
        let (series, warning) = match self.source.fetch(symbol, interval, limit).await {
            Ok(series) => (series, None),
            Err(FetchError::NoDataAvailable) => {
                (Series::empty(), Some(NO_DATA_WARNING.to_string()))
            }
            Err(err) => {
                tracing::error!(
                    symbol = %symbol,
                    interval = %interval,
                    error = %err,
                    "Error fetching data"
                );
                (Series::empty(), Some(format!("Error fetching data: {err}")))
            }
        };

        let augmented: AugmentedSeries = self.indicators.apply(series);
        let signal = self.classifier.classify(&augmented);

        match (signal, augmented.latest()) {
            (Signal::NoData, _) | (_, None) => {
                tracing::info!(
                    symbol = %symbol,
                    interval = %interval,
                    %signal,
                    "Pass finished without data"
                );
            }
            (_, Some(latest)) => tracing::info!(
                symbol = %symbol,
                interval = %interval,
                bars = augmented.len(),
                close = latest.bar.close,
                rsi = ?latest.rsi,
                %signal,
                "Signal computed"
            ),
        }

        Snapshot {
            symbol: symbol.clone(),
            interval,
            lookback: interval.lookback(),
            signal,
            series: augmented,
            warning,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use core_types::Lookback;
    use market_data::{MarketDataProvider, ProviderError, ProviderRow};

    enum Canned {
        Rows(Vec<ProviderRow>),
        Empty,
        Fail,
    }

    struct CannedProvider(Canned);

    #[async_trait]
    impl MarketDataProvider for CannedProvider {
        fn name(&self) -> &'static str {
            "canned"
        }

        async fn download(
            &self,
            _symbol: &Symbol,
            _lookback: Lookback,
            _interval: Interval,
        ) -> market_data::Result<Vec<ProviderRow>> {
            match &self.0 {
                Canned::Rows(rows) => Ok(rows.clone()),
                Canned::Empty => Ok(Vec::new()),
                Canned::Fail => Err(ProviderError::ApiError {
                    code: "Not Found".into(),
                    description: "No data found".into(),
                }),
            }
        }
    }

    fn pipeline(canned: Canned, limit: usize) -> Pipeline {
        Pipeline::new(
            DataSource::new(Box::new(CannedProvider(canned))),
            IndicatorEngine::default(),
            SignalClassifier::default(),
            limit,
        )
    }

    fn rows(closes: &[f64]) -> Vec<ProviderRow> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| ProviderRow {
                datetime: Utc.timestamp_opt(1_700_000_000 + i as i64 * 3600, 0).unwrap(),
                open: Some(c),
                high: Some(c + 1.0),
                low: Some(c - 1.0),
                close: Some(c),
                volume: Some(100.0),
            })
            .collect()
    }

    fn btc() -> Symbol {
        Symbol("BTC-USD".into())
    }

    #[tokio::test]
    async fn empty_provider_degrades_to_no_data() {
        let snapshot = pipeline(Canned::Empty, 300).run(&btc(), Interval::OneHour).await;

        assert_eq!(snapshot.signal, Signal::NoData);
        assert!(!snapshot.has_data());
        assert_eq!(snapshot.warning.as_deref(), Some(NO_DATA_WARNING));
        assert!(snapshot.table_tail(10).is_empty());
    }

    #[tokio::test]
    async fn provider_error_degrades_to_no_data_with_message() {
        let snapshot = pipeline(Canned::Fail, 300).run(&btc(), Interval::OneMinute).await;

        assert_eq!(snapshot.signal, Signal::NoData);
        let warning = snapshot.warning.unwrap();
        assert!(warning.starts_with("Error fetching data:"), "{warning}");
        assert!(warning.contains("No data found"));
        assert_eq!(snapshot.lookback, Lookback { days: 7 });
    }

    #[tokio::test]
    async fn full_pass_produces_signal_and_table() {
        let mut closes: Vec<f64> = (0..200).map(|i| 100.0 + i as f64).collect();
        closes.extend((1..=10).map(|j| 299.0 - 3.0 * j as f64));

        let snapshot = pipeline(Canned::Rows(rows(&closes)), 300)
            .run(&btc(), Interval::OneHour)
            .await;

        assert_eq!(snapshot.signal, Signal::Buy);
        assert!(snapshot.warning.is_none());
        assert_eq!(snapshot.series.len(), 210);

        let table = snapshot.table_tail(10);
        assert_eq!(table.len(), 10);
        assert_eq!(table.last().unwrap().close, 269.0);
        assert!(table.iter().all(|r| r.sma_200.is_some() && r.macd.is_some()));
    }

    #[tokio::test]
    async fn limit_below_slow_window_leaves_long_average_missing() {
        let closes: Vec<f64> = (0..250).map(|i| 100.0 + i as f64).collect();
        let snapshot = pipeline(Canned::Rows(rows(&closes)), 100)
            .run(&btc(), Interval::OneDay)
            .await;

        assert_eq!(snapshot.series.len(), 100);
        let latest = snapshot.series.latest().unwrap();
        assert!(latest.sma_200.is_none());
        assert!(latest.sma_50.is_some());
        assert_eq!(snapshot.signal, Signal::Hold);
    }

    #[tokio::test]
    async fn explicit_limit_overrides_configured_one() {
        let closes: Vec<f64> = (0..40).map(|i| 10.0 + i as f64).collect();
        let p = pipeline(Canned::Rows(rows(&closes)), 300);
        let snapshot = p.run_with_limit(&btc(), Interval::OneHour, 5).await;
        assert_eq!(snapshot.series.len(), 5);
        assert_eq!(p.limit(), 300);
    }

    #[test]
    fn table_rows_serialize_missing_values_as_null() {
        let closes = [10.0, 11.0];
        let series = IndicatorEngine::default().apply(Series::from_sorted(
            rows(&closes)
                .into_iter()
                .map(|r| core_types::Bar {
                    timestamp: r.datetime,
                    open: r.open.unwrap(),
                    high: r.high.unwrap(),
                    low: r.low.unwrap(),
                    close: r.close.unwrap(),
                    volume: r.volume.unwrap(),
                })
                .collect(),
        ));
        let snapshot = Snapshot {
            symbol: btc(),
            interval: Interval::OneHour,
            lookback: Interval::OneHour.lookback(),
            signal: Signal::Hold,
            series,
            warning: None,
        };
        let json = serde_json::to_value(snapshot.table_tail(10)).unwrap();
        assert_eq!(json[1]["close"], 11.0);
        assert!(json[1]["rsi"].is_null());
    }
}
