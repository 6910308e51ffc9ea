// In crates/indicators/src/lib.rs

//! Indicator computation and latest-bar signal classification.
//!
//! [`IndicatorEngine`] turns a [`Series`](core_types::Series) into an
//! [`AugmentedSeries`](core_types::AugmentedSeries) carrying SMA, RSI and MACD
//! columns. [`SignalClassifier`] reads only the final augmented bar.

pub mod classifier;
pub mod engine;
pub mod error;
pub mod rsi;
pub mod types;

pub use classifier::SignalClassifier;
pub use engine::IndicatorEngine;
pub use error::{Error, Result};
pub use types::{IndicatorSettings, SignalSettings};
