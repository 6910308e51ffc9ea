// In crates/web-server/src/types.rs

use core_types::{AugmentedBar, Interval, Lookback, Signal};
use engine::{IndicatorRow, Snapshot};
use serde::{Deserialize, Serialize};

/// Query string of `GET /api/dashboard` (e.g. `?symbol=ETH-USD&interval=15m`).
/// Missing parameters fall back to the configured defaults.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub symbol: Option<String>,
    pub interval: Option<String>,
}

/// Body of `GET /api/options`: what the selectors should offer.
#[derive(Debug, Serialize)]
pub struct OptionsResponse {
    pub symbols: Vec<String>,
    pub intervals: Vec<&'static str>,
    pub default_symbol: String,
    pub default_interval: String,
    pub table_rows: usize,
}

/// Body of `GET /api/dashboard`: one rendered pass.
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub symbol: String,
    pub interval: Interval,
    pub lookback: Lookback,
    pub signal: Signal,
    /// Human label for the banner, e.g. "NO DATA".
    pub signal_label: String,
    pub warning: Option<String>,
    /// Every bar with indicators, for the chart.
    pub bars: Vec<AugmentedBar>,
    /// The indicator table tail.
    pub table: Vec<IndicatorRow>,
}

impl DashboardResponse {
    pub fn from_snapshot(snapshot: Snapshot, table_rows: usize) -> Self {
        let table = snapshot.table_tail(table_rows);
        Self {
            symbol: snapshot.symbol.0,
            interval: snapshot.interval,
            lookback: snapshot.lookback,
            signal: snapshot.signal,
            signal_label: snapshot.signal.to_string(),
            warning: snapshot.warning,
            bars: snapshot.series.bars().to_vec(),
            table,
        }
    }
}
