// In crates/market-data/src/yahoo.rs

use std::time::Duration;

use app_config::types::ProviderSettings;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use core_types::{Interval, Lookback, Symbol};
use reqwest::{Client, StatusCode};

use crate::error::{ProviderError, Result};
use crate::provider::{MarketDataProvider, ProviderRow};
use crate::types::{ChartResponse, Quote};

// Upper bound on how much of an error body ends up in a log line.
const MAX_ERROR_BODY: usize = 256;

/// Client for Yahoo Finance's public chart endpoint.
#[derive(Debug, Clone)]
pub struct YahooProvider {
    /// The persistent HTTP client.
    http_client: Client,
    /// e.g. `https://query1.finance.yahoo.com`
    base_url: String,
}

impl YahooProvider {
    /// Constructs a new provider from `ProviderSettings`.
    pub fn new(settings: &ProviderSettings) -> Result<Self> {
        let http_client = Client::builder()
            .user_agent(settings.user_agent.clone())
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| ProviderError::ClientBuildError(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn chart_url(&self, symbol: &Symbol) -> String {
        format!("{}/v8/finance/chart/{}", self.base_url, symbol.0)
    }
}

#[async_trait]
impl MarketDataProvider for YahooProvider {
    fn name(&self) -> &'static str {
        "yahoo"
    }

    /// Fetches the raw chart for `symbol` over `lookback` at `interval`.
    ///
    /// This corresponds to `GET /v8/finance/chart/{symbol}?range=..&interval=..`.
    async fn download(
        &self,
        symbol: &Symbol,
        lookback: Lookback,
        interval: Interval,
    ) -> Result<Vec<ProviderRow>> {
        let url = self.chart_url(symbol);
        let range = lookback.to_string();
        tracing::debug!(url = %url, range = %range, interval = %interval, "Requesting chart");

        let response = self
            .http_client
            .get(&url)
            .query(&[("range", range.as_str()), ("interval", interval.as_str())])
            .send()
            .await
            .map_err(ProviderError::RequestFailed)?;

        let status = response.status();
        let body = response.text().await.map_err(ProviderError::RequestFailed)?;

        interpret(status, &body)
    }
}

/// Turns a chart response into rows or an error.
///
/// A chart `error` in the body wins over the HTTP status: Yahoo reports
/// unknown symbols as a 404 carrying one, which says more than the bare code.
fn interpret(status: StatusCode, body: &str) -> Result<Vec<ProviderRow>> {
    match parse_chart(body) {
        Err(err @ ProviderError::ApiError { .. }) => Err(err),
        _ if !status.is_success() => Err(ProviderError::Status {
            status: status.as_u16(),
            body: truncate(body, MAX_ERROR_BODY),
        }),
        other => other,
    }
}

/// Decodes a chart body into provider rows.
///
/// A body with no result, no timestamps or no quote block decodes to zero
/// rows; deciding what "no rows" means is left to the caller.
pub fn parse_chart(body: &str) -> Result<Vec<ProviderRow>> {
    let response: ChartResponse = serde_json::from_str(body)?;

    if let Some(error) = response.chart.error {
        return Err(ProviderError::ApiError {
            code: error.code,
            description: error.description,
        });
    }

    let Some(result) = response.chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(Vec::new());
    };
    let Some(timestamps) = result.timestamp else {
        return Ok(Vec::new());
    };
    let Some(quote) = result.indicators.quote.into_iter().next() else {
        return Ok(Vec::new());
    };

    Ok(rows_from_columns(&timestamps, &quote))
}

fn rows_from_columns(timestamps: &[i64], quote: &Quote) -> Vec<ProviderRow> {
    let at = |column: &[Option<f64>], i: usize| column.get(i).copied().flatten();

    timestamps
        .iter()
        .enumerate()
        .filter_map(|(i, &ts)| {
            let datetime = Utc.timestamp_opt(ts, 0).single()?;
            Some(ProviderRow {
                datetime,
                open: at(&quote.open, i),
                high: at(&quote.high, i),
                low: at(&quote.low, i),
                close: at(&quote.close, i),
                volume: at(&quote.volume, i),
            })
        })
        .collect()
}

fn truncate(body: &str, max: usize) -> String {
    match body.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
