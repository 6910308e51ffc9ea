// In crates/engine/src/snapshot.rs

use chrono::{DateTime, Utc};
use core_types::{AugmentedSeries, Interval, Lookback, Signal, Symbol};
use serde::Serialize;

/// Message shown when a pass ends with an empty series.
pub const NO_DATA_WARNING: &str = "No data available.";

/// Everything a presenter needs to render one pass.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub symbol: Symbol,
    pub interval: Interval,
    pub lookback: Lookback,
    pub signal: Signal,
    pub series: AugmentedSeries,
    /// User-facing warning when the pass produced no bars.
    pub warning: Option<String>,
}

/// One line of the indicator table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IndicatorRow {
    pub timestamp: DateTime<Utc>,
    pub close: f64,
    pub sma_50: Option<f64>,
    pub sma_200: Option<f64>,
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
}

impl Snapshot {
    pub fn has_data(&self) -> bool {
        !self.series.is_empty()
    }

    /// The last `rows` bars as table rows, oldest first.
    pub fn table_tail(&self, rows: usize) -> Vec<IndicatorRow> {
        self.series
            .tail(rows)
            .iter()
            .map(|b| IndicatorRow {
                timestamp: b.bar.timestamp,
                close: b.bar.close,
                sma_50: b.sma_50,
                sma_200: b.sma_200,
                rsi: b.rsi,
                macd: b.macd,
            })
            .collect()
    }
}
