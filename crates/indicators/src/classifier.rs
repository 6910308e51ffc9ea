// In crates/indicators/src/classifier.rs

use core_types::{AugmentedSeries, Signal};

use crate::error::Result;
use crate::types::SignalSettings;

/// Maps the most recent augmented bar to a [`Signal`].
///
/// - BUY: RSI below the oversold threshold while close is above the slow SMA.
/// - SELL: RSI above the overbought threshold while close is below the fast SMA.
/// - HOLD: anything else, including any comparison against a missing value.
/// - NO_DATA: the series is empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignalClassifier {
    settings: SignalSettings,
}

impl SignalClassifier {
    pub fn new(settings: SignalSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self { settings })
    }

    pub fn settings(&self) -> &SignalSettings {
        &self.settings
    }

    pub fn classify(&self, series: &AugmentedSeries) -> Signal {
        let Some(latest) = series.latest() else {
            return Signal::NoData;
        };
        let close = latest.bar.close;

        let oversold = below(latest.rsi, self.settings.rsi_oversold);
        let above_slow_trend = latest.sma_200.is_some_and(|sma| close > sma);
        let overbought = above(latest.rsi, self.settings.rsi_overbought);
        let below_fast_trend = latest.sma_50.is_some_and(|sma| close < sma);

        let signal = if oversold && above_slow_trend {
            Signal::Buy
        } else if overbought && below_fast_trend {
            Signal::Sell
        } else {
            Signal::Hold
        };

        tracing::debug!(
            close,
            rsi = ?latest.rsi,
            sma_50 = ?latest.sma_50,
            sma_200 = ?latest.sma_200,
            %signal,
            "Classified latest bar"
        );
        signal
    }
}

fn below(value: Option<f64>, threshold: f64) -> bool {
    value.is_some_and(|v| v < threshold)
}

fn above(value: Option<f64>, threshold: f64) -> bool {
    value.is_some_and(|v| v > threshold)
}
