// In crates/indicators/src/types.rs

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Window lengths for every derived column.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct IndicatorSettings {
    pub sma_fast_period: usize,
    pub sma_slow_period: usize,
    pub rsi_period: usize,
    pub macd_fast_period: usize,
    pub macd_slow_period: usize,
    // Only used to build the `ta` MACD; the signal line itself is not reported.
    pub macd_signal_period: usize,
}

impl Default for IndicatorSettings {
    fn default() -> Self {
        Self {
            sma_fast_period: 50,
            sma_slow_period: 200,
            rsi_period: 14,
            macd_fast_period: 12,
            macd_slow_period: 26,
            macd_signal_period: 9,
        }
    }
}

impl IndicatorSettings {
    pub fn validate(&self) -> Result<()> {
        let periods = [
            ("sma_fast_period", self.sma_fast_period),
            ("sma_slow_period", self.sma_slow_period),
            ("rsi_period", self.rsi_period),
            ("macd_fast_period", self.macd_fast_period),
            ("macd_slow_period", self.macd_slow_period),
            ("macd_signal_period", self.macd_signal_period),
        ];
        if let Some((name, _)) = periods.iter().find(|(_, p)| *p == 0) {
            return Err(Error::InvalidSettings(format!("{name} must be greater than 0")));
        }
        if self.macd_fast_period >= self.macd_slow_period {
            return Err(Error::InvalidSettings(
                "macd_fast_period must be shorter than macd_slow_period".into(),
            ));
        }
        Ok(())
    }
}

/// RSI thresholds for the latest-bar classifier.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct SignalSettings {
    pub rsi_oversold: f64,
    pub rsi_overbought: f64,
}

impl Default for SignalSettings {
    fn default() -> Self {
        Self {
            rsi_oversold: 30.0,
            rsi_overbought: 70.0,
        }
    }
}

impl SignalSettings {
    pub fn validate(&self) -> Result<()> {
        let in_range = |v: f64| (0.0..=100.0).contains(&v);
        if !in_range(self.rsi_oversold) || !in_range(self.rsi_overbought) {
            return Err(Error::InvalidSettings(
                "RSI thresholds must lie within [0, 100]".into(),
            ));
        }
        if self.rsi_oversold >= self.rsi_overbought {
            return Err(Error::InvalidSettings(
                "rsi_oversold must be below rsi_overbought".into(),
            ));
        }
        Ok(())
    }
}
