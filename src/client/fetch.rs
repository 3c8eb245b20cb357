//! Kalshi API fetch client.
//!
//! Single point of contact with the remote API. Enforces request pacing and
//! the bounded rate-limit retry policy, paginates list endpoints through the
//! opaque server cursor, and normalizes every failure to "no data": the
//! public accessors log errors at this boundary and return `None` or an
//! empty vec rather than propagating.

use std::time::{Duration, Instant};

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, error, instrument, warn};
use url::Url;

use crate::config::Config;
use crate::error::ClientError;
use crate::metrics;

use super::types::{
    Market, MarketEnvelope, MarketStatus, MarketsPage, Orderbook, OrderbookEnvelope, Series,
    SeriesEnvelope, SeriesListEnvelope, Trade, TradesPage,
};

/// Kalshi trade API client.
///
/// Owns the HTTP session and the pacing timestamp; everything else is
/// stateless request/response. Wrap in an `Arc` to share.
#[derive(Debug)]
pub struct KalshiClient {
    /// HTTP client for API requests.
    http: reqwest::Client,
    /// Base URL without trailing slash.
    base_url: String,
    /// Optional bearer token.
    api_key: Option<String>,
    /// Minimum spacing between outbound requests.
    min_interval: Duration,
    /// Fixed delay before retrying a 429.
    backoff: Duration,
    /// Retry budget for rate-limited requests.
    max_retries: u32,
    /// Dispatch time of the most recent request.
    last_request: Mutex<Option<Instant>>,
}

impl KalshiClient {
    /// Create a new client from config.
    pub fn new(config: &Config) -> Result<Self, ClientError> {
        Url::parse(&config.kalshi_base_url)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", config.kalshi_base_url, e)))?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.http_timeout_ms))
            .connect_timeout(Duration::from_millis(config.http_timeout_ms.min(5_000)))
            .tcp_keepalive(Duration::from_secs(30))
            .pool_idle_timeout(Duration::from_secs(90))
            .user_agent("kalshi-markets/0.1")
            .build()?;

        Ok(Self {
            http,
            base_url: config.kalshi_base_url.trim_end_matches('/').to_string(),
            api_key: config.kalshi_api_key.clone().filter(|k| !k.is_empty()),
            min_interval: Duration::from_millis(config.min_request_interval_ms),
            backoff: Duration::from_millis(config.rate_limit_backoff_ms),
            max_retries: config.rate_limit_retries,
            last_request: Mutex::new(None),
        })
    }

    /// Issue a GET request and return the raw JSON body.
    ///
    /// Any failure is logged here exactly once and collapsed to `None`;
    /// callers must treat `None` as "no data".
    pub async fn get(&self, endpoint: &str, params: &[(&str, String)]) -> Option<Value> {
        match self.request(endpoint, params).await {
            Ok(value) => Some(value),
            Err(e) => {
                metrics::inc_requests_failed();
                error!(endpoint, error = %e, "API request failed");
                None
            }
        }
    }

    /// List markets, transparently following the pagination cursor.
    ///
    /// Accumulates pages until the server returns no cursor or a page
    /// shorter than `limit`. Eagerly materialized; a fresh call re-fetches
    /// from page 1.
    #[instrument(skip(self))]
    pub async fn list_markets(
        &self,
        limit: u32,
        status: Option<MarketStatus>,
        series_ticker: Option<&str>,
    ) -> Vec<Market> {
        let mut all_markets = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut params: Vec<(&str, String)> = vec![("limit", limit.to_string())];
            if let Some(status) = status {
                params.push(("status", status.to_string()));
            }
            if let Some(series) = series_ticker {
                params.push(("series_ticker", series.to_string()));
            }
            if let Some(c) = &cursor {
                params.push(("cursor", c.clone()));
            }

            let Some(page) = self.get_decoded::<MarketsPage>("/markets", &params).await else {
                break;
            };
            metrics::inc_pages_fetched();

            let page_len = page.markets.len();
            all_markets.extend(page.markets);
            debug!(page_len, total = all_markets.len(), "fetched markets page");

            cursor = page.cursor.filter(|c| !c.is_empty());
            if cursor.is_none() || (page_len as u32) < limit {
                break;
            }
        }

        all_markets
    }

    /// Fetch a single page of markets, never following the cursor.
    ///
    /// Polling surfaces use this so one poll maps to one upstream request;
    /// exhaustive pagination stays with [`Self::list_markets`].
    #[instrument(skip(self))]
    pub async fn list_markets_page(
        &self,
        limit: u32,
        status: Option<MarketStatus>,
        series_ticker: Option<&str>,
    ) -> Vec<Market> {
        let mut params: Vec<(&str, String)> = vec![("limit", limit.to_string())];
        if let Some(status) = status {
            params.push(("status", status.to_string()));
        }
        if let Some(series) = series_ticker {
            params.push(("series_ticker", series.to_string()));
        }

        let Some(page) = self.get_decoded::<MarketsPage>("/markets", &params).await else {
            return Vec::new();
        };
        metrics::inc_pages_fetched();
        page.markets
    }

    /// Fetch a single market.
    #[instrument(skip(self))]
    pub async fn get_market(&self, ticker: &str) -> Option<Market> {
        self.get_decoded::<MarketEnvelope>(&format!("/markets/{ticker}"), &[])
            .await
            .map(|e| e.market)
    }

    /// Fetch a market's orderbook. `depth` caps the number of levels
    /// server-side; short responses are returned as-is.
    #[instrument(skip(self))]
    pub async fn get_orderbook(&self, ticker: &str, depth: u32) -> Option<Orderbook> {
        let params = [("depth", depth.to_string())];
        self.get_decoded::<OrderbookEnvelope>(&format!("/markets/{ticker}/orderbook"), &params)
            .await
            .map(|e| e.orderbook)
    }

    /// Fetch recent trades, optionally filtered to one market.
    ///
    /// Single page only; a server-imposed cap is accepted silently.
    #[instrument(skip(self))]
    pub async fn list_trades(&self, ticker: Option<&str>, limit: u32) -> Vec<Trade> {
        let mut params: Vec<(&str, String)> = vec![("limit", limit.to_string())];
        if let Some(ticker) = ticker {
            params.push(("ticker", ticker.to_string()));
        }

        self.get_decoded::<TradesPage>("/markets/trades", &params)
            .await
            .map(|page| page.trades)
            .unwrap_or_default()
    }

    /// Fetch one series by ticker.
    #[instrument(skip(self))]
    pub async fn get_series(&self, ticker: &str) -> Option<Series> {
        self.get_decoded::<SeriesEnvelope>(&format!("/series/{ticker}"), &[])
            .await
            .map(|e| e.series)
    }

    /// Fetch all series.
    #[instrument(skip(self))]
    pub async fn list_series(&self) -> Vec<Series> {
        self.get_decoded::<SeriesListEnvelope>("/series", &[])
            .await
            .map(|e| e.series)
            .unwrap_or_default()
    }

    /// GET and decode into a typed response, degrading to `None` on any
    /// failure. Decode failures are logged here; transport and status
    /// failures are logged in [`Self::get`].
    async fn get_decoded<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Option<T> {
        let value = self.get(endpoint, params).await?;
        match serde_json::from_value(value) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                metrics::inc_requests_failed();
                let err = ClientError::Decode {
                    endpoint: endpoint.to_string(),
                    reason: e.to_string(),
                };
                error!(endpoint, error = %err, "API response decode failed");
                None
            }
        }
    }

    /// Dispatch one GET, retrying rate-limited responses with a fixed
    /// backoff up to the configured budget.
    async fn request(&self, endpoint: &str, params: &[(&str, String)]) -> Result<Value, ClientError> {
        let url = self.build_url(endpoint, params)?;
        let mut attempts = 0u32;

        loop {
            self.pace().await;
            attempts += 1;
            metrics::inc_requests();

            let start = Instant::now();
            let mut request = self.http.get(url.clone());
            if let Some(key) = &self.api_key {
                request = request.header("Authorization", format!("Bearer {key}"));
            }

            let response = request.send().await?;
            metrics::record_http_latency(start, endpoint);

            if response.status() == StatusCode::TOO_MANY_REQUESTS {
                metrics::inc_rate_limited();
                if attempts > self.max_retries {
                    return Err(ClientError::RateLimited {
                        endpoint: endpoint.to_string(),
                        attempts,
                    });
                }
                warn!(
                    endpoint,
                    attempt = attempts,
                    backoff_ms = self.backoff.as_millis() as u64,
                    "rate limited, backing off"
                );
                tokio::time::sleep(self.backoff).await;
                metrics::inc_retries();
                continue;
            }

            if !response.status().is_success() {
                return Err(ClientError::Status {
                    endpoint: endpoint.to_string(),
                    status: response.status(),
                });
            }

            return Ok(response.json::<Value>().await?);
        }
    }

    /// Sleep out the remainder of the pacing window, then stamp this
    /// dispatch as the most recent request.
    async fn pace(&self) {
        if self.min_interval.is_zero() {
            return;
        }

        let mut last = self.last_request.lock().await;
        if let Some(prev) = *last {
            let elapsed = prev.elapsed();
            if elapsed < self.min_interval {
                tokio::time::sleep(self.min_interval - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }

    fn build_url(&self, endpoint: &str, params: &[(&str, String)]) -> Result<Url, ClientError> {
        let raw = format!("{}{}", self.base_url, endpoint);
        if params.is_empty() {
            Url::parse(&raw).map_err(|e| ClientError::InvalidUrl(format!("{raw}: {e}")))
        } else {
            Url::parse_with_params(&raw, params)
                .map_err(|e| ClientError::InvalidUrl(format!("{raw}: {e}")))
        }
    }
}
