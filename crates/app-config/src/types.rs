// In crates/app-config/src/types.rs

use serde::Deserialize;

use core_types::{Interval, Symbol};
use indicators::{IndicatorSettings, SignalSettings};

use crate::error::{Error, Result};

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Settings {
    /// The application's general settings.
    pub app: AppSettings,
    /// Settings for the market-data provider.
    pub provider: ProviderSettings,
    /// What the dashboard offers and how much it shows.
    pub dashboard: DashboardSettings,
    pub indicators: IndicatorSettings,
    pub signal: SignalSettings,
    pub server: ServerSettings,
}

impl Settings {
    /// Checks cross-field constraints the type system can't express.
    pub fn validate(&self) -> Result<()> {
        self.dashboard.validate()?;
        if self.provider.timeout_secs == 0 {
            return Err(Error::Invalid("provider.timeout_secs must be positive".into()));
        }
        self.indicators
            .validate()
            .map_err(|e| Error::Invalid(e.to_string()))?;
        self.signal
            .validate()
            .map_err(|e| Error::Invalid(e.to_string()))?;
        Ok(())
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct AppSettings {
    /// The environment the application is running in (e.g., "development", "production").
    pub environment: String,
    /// The log level for the application.
    pub log_level: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            environment: "development".into(),
            log_level: "info".into(),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ProviderSettings {
    /// Base URL of the Yahoo Finance chart API.
    pub base_url: String,
    /// Yahoo rejects requests without a browser-like agent.
    pub user_agent: String,
    /// Per-request timeout. The only timeout anywhere in a pass.
    pub timeout_secs: u64,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            base_url: "https://query1.finance.yahoo.com".into(),
            user_agent: "Mozilla/5.0 (compatible; crypto-dashboard/0.1)".into(),
            timeout_secs: 30,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct DashboardSettings {
    /// Symbols offered in the selector.
    pub symbols: Vec<String>,
    pub default_symbol: String,
    pub default_interval: String,
    /// Maximum number of bars kept per pass. Needs to exceed the slow SMA
    /// window for SMA 200 to ever be defined.
    pub bar_limit: usize,
    /// Rows shown in the indicator table.
    pub table_rows: usize,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            symbols: vec!["BTC-USD".into(), "ETH-USD".into(), "BNB-USD".into()],
            default_symbol: "BTC-USD".into(),
            default_interval: "1h".into(),
            bar_limit: 300,
            table_rows: 10,
        }
    }
}

impl DashboardSettings {
    pub fn interval(&self) -> Result<Interval> {
        self.default_interval
            .parse()
            .map_err(|e: core_types::Error| Error::Invalid(e.to_string()))
    }

    pub fn default_symbol(&self) -> Symbol {
        Symbol(self.default_symbol.clone())
    }

    /// True if `symbol` is one of the configured choices.
    pub fn offers(&self, symbol: &str) -> bool {
        self.symbols.iter().any(|s| s == symbol)
    }

    fn validate(&self) -> Result<()> {
        if self.symbols.is_empty() {
            return Err(Error::Invalid("dashboard.symbols must not be empty".into()));
        }
        if !self.offers(&self.default_symbol) {
            return Err(Error::Invalid(format!(
                "dashboard.default_symbol '{}' is not in dashboard.symbols",
                self.default_symbol
            )));
        }
        self.interval()?;
        if self.bar_limit == 0 {
            return Err(Error::Invalid("dashboard.bar_limit must be positive".into()));
        }
        if self.table_rows == 0 {
            return Err(Error::Invalid("dashboard.table_rows must be positive".into()));
        }
        Ok(())
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8080,
        }
    }
}
