// =============================================================================
// Market Data Provider Client — Yahoo Finance v8 chart endpoint
// =============================================================================
//
// Fetches daily OHLCV history for a symbol over a trailing range. The chart
// endpoint is public and unsigned; one GET per symbol per computation, no
// internal retry (provider unavailability is an error condition for the
// caller to isolate per symbol, not to paper over).
// =============================================================================

use chrono::DateTime;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::series::{DailyBar, DailySeries};

/// Errors raised while fetching or decoding provider data. Every variant is
/// scoped to a single symbol's fetch, so one failure never has to abort the
/// other symbols.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("market data request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("provider returned HTTP {status} for {symbol}")]
    Status {
        symbol: String,
        status: reqwest::StatusCode,
    },

    #[error("provider error for {symbol}: {code}: {description}")]
    Api {
        symbol: String,
        code: String,
        description: String,
    },

    #[error("no market data returned for {symbol}")]
    NoData { symbol: String },

    #[error("malformed provider payload for {symbol}: {reason}")]
    Malformed { symbol: String, reason: String },
}

/// HTTP client for the chart endpoint.
#[derive(Debug, Clone)]
pub struct MarketDataClient {
    base_url: String,
    client: reqwest::Client,
}

impl Default for MarketDataClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MarketDataClient {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent("vantage-timing/1.0")
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .expect("failed to build reqwest client");

        Self {
            base_url: "https://query1.finance.yahoo.com".to_string(),
            client,
        }
    }

    /// GET /v8/finance/chart/{symbol} — daily bars over the trailing `range`
    /// (e.g. "1y").
    #[instrument(skip(self), name = "provider::fetch_daily_history")]
    pub async fn fetch_daily_history(
        &self,
        symbol: &str,
        range: &str,
    ) -> Result<DailySeries, ProviderError> {
        let url = format!(
            "{}/v8/finance/chart/{}?range={}&interval=1d",
            self.base_url, symbol, range
        );

        let resp = self.client.get(&url).send().await?;
        let status = resp.status();
        let body: serde_json::Value = resp.json().await?;

        // A provider-reported error carries more detail than the bare HTTP
        // status, so check it first (unknown symbols come back as 404 with
        // an error object in the body).
        if let Some(err) = body.pointer("/chart/error").filter(|e| !e.is_null()) {
            return Err(ProviderError::Api {
                symbol: symbol.to_string(),
                code: err["code"].as_str().unwrap_or("unknown").to_string(),
                description: err["description"].as_str().unwrap_or("").to_string(),
            });
        }
        if !status.is_success() {
            return Err(ProviderError::Status {
                symbol: symbol.to_string(),
                status,
            });
        }

        let series = parse_chart_response(symbol, &body)?;
        debug!(symbol, bars = series.len(), "daily history fetched");
        Ok(series)
    }
}

/// Decode a chart response body into a [`DailySeries`].
///
/// Rows with missing fields (the provider nulls out halted or still-open
/// sessions) are skipped with a warning rather than failing the whole fetch.
fn parse_chart_response(
    symbol: &str,
    body: &serde_json::Value,
) -> Result<DailySeries, ProviderError> {
    let no_data = || ProviderError::NoData {
        symbol: symbol.to_string(),
    };
    let malformed = |reason: &str| ProviderError::Malformed {
        symbol: symbol.to_string(),
        reason: reason.to_string(),
    };

    let result = body.pointer("/chart/result/0").ok_or_else(no_data)?;

    let timestamps = result
        .get("timestamp")
        .and_then(|t| t.as_array())
        .ok_or_else(no_data)?;

    let quote = result
        .pointer("/indicators/quote/0")
        .ok_or_else(|| malformed("missing indicators.quote"))?;

    let opens = quote_column(quote, "open", symbol)?;
    let highs = quote_column(quote, "high", symbol)?;
    let lows = quote_column(quote, "low", symbol)?;
    let closes = quote_column(quote, "close", symbol)?;
    let volumes = quote_column(quote, "volume", symbol)?;

    let mut bars = Vec::with_capacity(timestamps.len());
    let mut skipped = 0usize;

    for (i, ts) in timestamps.iter().enumerate() {
        let bar = (|| {
            let ts = ts.as_i64()?;
            let date = DateTime::from_timestamp(ts, 0)?.date_naive();
            Some(DailyBar {
                date,
                open: opens.get(i)?.as_f64()?,
                high: highs.get(i)?.as_f64()?,
                low: lows.get(i)?.as_f64()?,
                close: closes.get(i)?.as_f64()?,
                volume: volumes.get(i)?.as_u64()?,
            })
        })();

        match bar {
            Some(bar) => bars.push(bar),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        warn!(symbol, skipped, "dropped bars with missing fields");
    }
    if bars.is_empty() {
        return Err(no_data());
    }

    DailySeries::new(bars).map_err(|e| malformed(&e.to_string()))
}

fn quote_column<'a>(
    quote: &'a serde_json::Value,
    name: &str,
    symbol: &str,
) -> Result<&'a Vec<serde_json::Value>, ProviderError> {
    quote
        .get(name)
        .and_then(|c| c.as_array())
        .ok_or_else(|| ProviderError::Malformed {
            symbol: symbol.to_string(),
            reason: format!("missing quote column '{name}'"),
        })
}
