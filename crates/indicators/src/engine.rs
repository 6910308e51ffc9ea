// In crates/indicators/src/engine.rs

use core_types::{AugmentedBar, AugmentedSeries, Series};
use ta::indicators::{MovingAverageConvergenceDivergence as Macd, SimpleMovingAverage as Sma};
use ta::Next;

use crate::error::{Error, Result};
use crate::rsi::wilder_rsi;
use crate::types::IndicatorSettings;

/// Computes the derived columns for a price series.
///
/// Holds freshly constructed `ta` indicators as templates; every call to
/// [`IndicatorEngine::apply`] works on clones, so the engine itself never
/// accumulates state between passes.
#[derive(Debug, Clone)]
pub struct IndicatorEngine {
    settings: IndicatorSettings,
    sma_fast: Sma,
    sma_slow: Sma,
    macd: Macd,
}

impl IndicatorEngine {
    pub fn new(settings: IndicatorSettings) -> Result<Self> {
        settings.validate()?;

        let ta_err = |e: ta::errors::TaError| Error::InvalidSettings(format!("{e:?}"));
        Ok(Self {
            sma_fast: Sma::new(settings.sma_fast_period).map_err(ta_err)?,
            sma_slow: Sma::new(settings.sma_slow_period).map_err(ta_err)?,
            macd: Macd::new(
                settings.macd_fast_period,
                settings.macd_slow_period,
                settings.macd_signal_period,
            )
            .map_err(ta_err)?,
            settings,
        })
    }

    pub fn settings(&self) -> &IndicatorSettings {
        &self.settings
    }

    /// Attaches SMA fast/slow, RSI and MACD to every bar.
    ///
    /// Length and original bar fields are preserved. A value is `None` until
    /// its window has enough history: SMA at `i >= period - 1`, RSI at
    /// `i >= period`, MACD at `i >= slow_period - 1`.
    pub fn apply(&self, series: Series) -> AugmentedSeries {
        if series.is_empty() {
            return AugmentedSeries::empty();
        }

        let closes: Vec<f64> = series.closes().collect();
        let rsi_values = wilder_rsi(&closes, self.settings.rsi_period);

        let mut sma_fast = self.sma_fast.clone();
        let mut sma_slow = self.sma_slow.clone();
        let mut macd = self.macd.clone();

        let fast_ready = self.settings.sma_fast_period - 1;
        let slow_ready = self.settings.sma_slow_period - 1;
        let macd_ready = self.settings.macd_slow_period - 1;

        let bars = series
            .into_bars()
            .into_iter()
            .zip(rsi_values)
            .enumerate()
            .map(|(i, (bar, rsi))| {
                // The `ta` indicators must see every close, even before they
                // are reported, so they are stepped unconditionally.
                let fast = sma_fast.next(bar.close);
                let slow = sma_slow.next(bar.close);
                let macd_line = macd.next(bar.close).macd;

                AugmentedBar {
                    bar,
                    sma_50: (i >= fast_ready).then_some(fast),
                    sma_200: (i >= slow_ready).then_some(slow),
                    rsi,
                    macd: (i >= macd_ready).then_some(macd_line),
                }
            })
            .collect();

        AugmentedSeries::new(bars)
    }
}

impl Default for IndicatorEngine {
    fn default() -> Self {
        // The default periods are non-zero and ordered, so construction
        // cannot fail.
        Self::new(IndicatorSettings::default()).expect("default indicator settings are valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use core_types::Bar;

    fn series_from_closes(closes: &[f64]) -> Series {
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Bar {
                timestamp: Utc.timestamp_opt(1_700_000_000 + i as i64 * 3600, 0).unwrap(),
                open: close,
                high: close + 0.5,
                low: close - 0.5,
                close,
                volume: 1_000.0 + i as f64,
            })
            .collect();
        Series::from_sorted(bars)
    }

    fn ramp(n: usize) -> Vec<f64> {
        (0..n).map(|i| 100.0 + (i as f64 * 0.37).sin() * 5.0 + i as f64 * 0.1).collect()
    }

    #[test]
    fn empty_series_stays_empty() {
        let engine = IndicatorEngine::default();
        assert!(engine.apply(Series::empty()).is_empty());
    }

    #[test]
    fn preserves_length_and_original_fields() {
        let engine = IndicatorEngine::default();
        let series = series_from_closes(&ramp(250));
        let original = series.bars().to_vec();

        let augmented = engine.apply(series);

        assert_eq!(augmented.len(), original.len());
        for (aug, bar) in augmented.bars().iter().zip(&original) {
            assert_eq!(&aug.bar, bar);
        }
    }

    #[test]
    fn availability_follows_window_lengths() {
        let engine = IndicatorEngine::default();
        let augmented = engine.apply(series_from_closes(&ramp(250)));

        for (i, bar) in augmented.bars().iter().enumerate() {
            assert_eq!(bar.sma_50.is_some(), i >= 49, "sma_50 at {i}");
            assert_eq!(bar.sma_200.is_some(), i >= 199, "sma_200 at {i}");
            assert_eq!(bar.rsi.is_some(), i >= 14, "rsi at {i}");
            assert_eq!(bar.macd.is_some(), i >= 25, "macd at {i}");
        }
    }

    #[test]
    fn short_history_yields_missing_values_without_panicking() {
        let engine = IndicatorEngine::default();
        let augmented = engine.apply(series_from_closes(&[101.0, 102.0, 100.5]));
        assert_eq!(augmented.len(), 3);
        assert!(augmented.bars().iter().all(|b| b.sma_50.is_none()
            && b.sma_200.is_none()
            && b.rsi.is_none()
            && b.macd.is_none()));
    }

    #[test]
    fn simple_moving_averages_are_arithmetic_means() {
        let engine = IndicatorEngine::default();
        let closes = ramp(220);
        let augmented = engine.apply(series_from_closes(&closes));

        let mean = |window: &[f64]| window.iter().sum::<f64>() / window.len() as f64;
        let fast = augmented.bars()[60].sma_50.unwrap();
        let slow = augmented.bars()[210].sma_200.unwrap();
        assert!((fast - mean(&closes[11..=60])).abs() < 1e-9);
        assert!((slow - mean(&closes[11..=210])).abs() < 1e-9);
    }

    #[test]
    fn macd_is_difference_of_emas() {
        let engine = IndicatorEngine::default();
        let closes = ramp(60);
        let augmented = engine.apply(series_from_closes(&closes));

        let ema = |period: usize| {
            let k = 2.0 / (period as f64 + 1.0);
            let mut current = closes[0];
            let mut out = vec![current];
            for &c in &closes[1..] {
                current = k * c + (1.0 - k) * current;
                out.push(current);
            }
            out
        };
        let (fast, slow) = (ema(12), ema(26));
        for i in 25..closes.len() {
            let expected = fast[i] - slow[i];
            let actual = augmented.bars()[i].macd.unwrap();
            assert!((actual - expected).abs() < 1e-9, "macd mismatch at {i}");
        }
    }

    #[test]
    fn constant_prices_give_flat_indicators() {
        let engine = IndicatorEngine::default();
        let augmented = engine.apply(series_from_closes(&vec![250.0; 210]));
        let last = augmented.latest().unwrap();
        assert_eq!(last.sma_50, Some(250.0));
        assert_eq!(last.sma_200, Some(250.0));
        assert_eq!(last.rsi, Some(50.0));
        assert!(last.macd.unwrap().abs() < 1e-9);
    }

    #[test]
    fn invalid_settings_are_rejected() {
        let zero = IndicatorSettings { rsi_period: 0, ..Default::default() };
        assert!(matches!(IndicatorEngine::new(zero), Err(Error::InvalidSettings(_))));

        let inverted = IndicatorSettings {
            macd_fast_period: 30,
            macd_slow_period: 26,
            ..Default::default()
        };
        assert!(IndicatorEngine::new(inverted).is_err());
    }
}
