// In crates/core-types/src/types.rs

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A provider ticker, e.g. "BTC-USD".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol(pub String);

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Bar granularity supported by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interval {
    #[serde(rename = "1m")]
    OneMinute,
    #[serde(rename = "5m")]
    FiveMinutes,
    #[serde(rename = "15m")]
    FifteenMinutes,
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "1d")]
    OneDay,
}

impl Interval {
    pub const ALL: [Interval; 5] = [
        Interval::OneMinute,
        Interval::FiveMinutes,
        Interval::FifteenMinutes,
        Interval::OneHour,
        Interval::OneDay,
    ];

    /// The wire name used by the provider and the UI.
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::OneMinute => "1m",
            Interval::FiveMinutes => "5m",
            Interval::FifteenMinutes => "15m",
            Interval::OneHour => "1h",
            Interval::OneDay => "1d",
        }
    }

    /// How far back to request data for this granularity.
    pub fn lookback(&self) -> Lookback {
        Lookback::for_interval(self.as_str())
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interval {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Interval::ALL
            .into_iter()
            .find(|interval| interval.as_str() == s.trim())
            .ok_or_else(|| Error::UnknownInterval(s.to_string()))
    }
}

/// A request window expressed in whole days ("7d", "30d", "60d").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Lookback {
    pub days: u32,
}

impl Lookback {
    /// Maps a raw interval string to the window the provider will serve at that
    /// granularity. Fine-grained data is capped upstream, so the window shrinks
    /// with the interval. Anything unrecognised gets the widest window.
    pub fn for_interval(interval: &str) -> Self {
        let days = match interval {
            "1m" => 7,
            "5m" | "15m" => 30,
            "1h" | "1d" => 60,
            _ => 60,
        };
        Self { days }
    }
}

impl fmt::Display for Lookback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d", self.days)
    }
}

/// One OHLCV observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    /// True when every field is finite, prices are positive, volume is
    /// non-negative and the high/low envelope contains open and close.
    pub fn is_well_formed(&self) -> bool {
        let prices = [self.open, self.high, self.low, self.close];
        prices.iter().all(|p| p.is_finite() && *p > 0.0)
            && self.volume.is_finite()
            && self.volume >= 0.0
            && self.high >= self.open.max(self.close)
            && self.low <= self.open.min(self.close)
    }
}

/// Bars in strictly increasing timestamp order. Empty means "no data".
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Series {
    bars: Vec<Bar>,
}

impl Series {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a series from bars the caller has already ordered.
    ///
    /// Ordering is checked in debug builds only; `market-data` is the
    /// component that establishes it.
    pub fn from_sorted(bars: Vec<Bar>) -> Self {
        debug_assert!(
            bars.windows(2).all(|w| w[0].timestamp < w[1].timestamp),
            "series bars must be strictly increasing by timestamp"
        );
        Self { bars }
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn into_bars(self) -> Vec<Bar> {
        self.bars
    }

    pub fn closes(&self) -> impl Iterator<Item = f64> + '_ {
        self.bars.iter().map(|b| b.close)
    }
}

/// A bar plus its derived indicator values. `None` means the indicator's
/// window is not yet full at this bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AugmentedBar {
    #[serde(flatten)]
    pub bar: Bar,
    pub sma_50: Option<f64>,
    pub sma_200: Option<f64>,
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
}

impl AugmentedBar {
    pub fn new(bar: Bar) -> Self {
        Self {
            bar,
            sma_50: None,
            sma_200: None,
            rsi: None,
            macd: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AugmentedSeries {
    bars: Vec<AugmentedBar>,
}

impl AugmentedSeries {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(bars: Vec<AugmentedBar>) -> Self {
        Self { bars }
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn bars(&self) -> &[AugmentedBar] {
        &self.bars
    }

    pub fn latest(&self) -> Option<&AugmentedBar> {
        self.bars.last()
    }

    /// The last `n` bars (or all of them when shorter).
    pub fn tail(&self, n: usize) -> &[AugmentedBar] {
        let start = self.bars.len().saturating_sub(n);
        &self.bars[start..]
    }
}

/// The categorical recommendation derived from the latest bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Signal {
    Buy,
    Sell,
    Hold,
    NoData,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Signal::Buy => "BUY",
            Signal::Sell => "SELL",
            Signal::Hold => "HOLD",
            Signal::NoData => "NO DATA",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn bar(ts: i64, close: f64) -> Bar {
        Bar {
            timestamp: Utc.timestamp_opt(ts, 0).unwrap(),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 10.0,
        }
    }

    #[test]
    fn lookback_table() {
        let cases = [
            ("1m", 7),
            ("5m", 30),
            ("15m", 30),
            ("1h", 60),
            ("1d", 60),
            ("1wk", 60),
            ("", 60),
        ];
        for (interval, days) in cases {
            assert_eq!(Lookback::for_interval(interval).days, days, "interval {interval}");
        }
        assert_eq!(Lookback::for_interval("1m").to_string(), "7d");
    }

    #[test]
    fn interval_round_trips_through_its_wire_name() {
        for interval in Interval::ALL {
            assert_eq!(interval.as_str().parse::<Interval>().unwrap(), interval);
        }
        assert_eq!(Interval::FifteenMinutes.lookback().days, 30);
    }

    #[test]
    fn unknown_interval_is_rejected() {
        let err = "2h".parse::<Interval>().unwrap_err();
        assert_eq!(err, Error::UnknownInterval("2h".into()));
    }

    #[test]
    fn signal_labels() {
        assert_eq!(Signal::NoData.to_string(), "NO DATA");
        assert_eq!(Signal::Buy.to_string(), "BUY");
        assert_eq!(serde_json::to_string(&Signal::NoData).unwrap(), "\"NO_DATA\"");
        assert_eq!(serde_json::to_string(&Interval::OneHour).unwrap(), "\"1h\"");
    }

    #[test]
    fn malformed_bars_are_detected() {
        assert!(bar(0, 100.0).is_well_formed());

        let mut b = bar(0, 100.0);
        b.high = 99.0;
        assert!(!b.is_well_formed());

        let mut b = bar(0, 100.0);
        b.volume = -1.0;
        assert!(!b.is_well_formed());

        let mut b = bar(0, 100.0);
        b.close = f64::NAN;
        assert!(!b.is_well_formed());
    }

    #[test]
    fn augmented_tail_is_clamped_to_length() {
        let series = AugmentedSeries::new(
            (0..3).map(|i| AugmentedBar::new(bar(i, 100.0 + i as f64))).collect(),
        );
        assert_eq!(series.tail(10).len(), 3);
        assert_eq!(series.tail(2)[0].bar.close, 101.0);
        assert_eq!(series.latest().unwrap().bar.close, 102.0);
        assert!(AugmentedSeries::empty().tail(5).is_empty());
    }

    #[test]
    fn augmented_bar_serializes_flat() {
        let value = serde_json::to_value(AugmentedBar::new(bar(0, 5.0))).unwrap();
        assert_eq!(value["close"], 5.0);
        assert!(value["rsi"].is_null());
    }
}
