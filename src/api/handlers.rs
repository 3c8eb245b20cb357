//! HTTP API handlers for the dashboard.
//!
//! Every endpoint is a pass-through over [`KalshiClient`]; responses are
//! plain serializable records so any front end can consume them.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use axum::Json;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::{Deserialize, Serialize};

use crate::client::{KalshiClient, Market, MarketStatus, Orderbook, Series, Trade};

/// Largest market page a dashboard request may ask for.
const MAX_DASHBOARD_LIMIT: u32 = 100;

/// Application state shared with handlers.
#[derive(Clone)]
pub struct AppState {
    /// Shared fetch client; pacing lives inside it.
    pub client: Arc<KalshiClient>,
    /// Prometheus render handle, present when the recorder is installed.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create new app state around a client.
    pub fn new(client: Arc<KalshiClient>) -> Self {
        Self {
            client,
            metrics: None,
        }
    }

    /// Attach a Prometheus handle for the `/metrics` endpoint.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status: "ok".
    pub status: &'static str,
}

/// Error envelope for 4xx responses.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable reason.
    pub error: String,
}

/// Query parameters for the market list endpoint.
#[derive(Debug, Deserialize)]
pub struct MarketsQuery {
    /// Page size, capped at [`MAX_DASHBOARD_LIMIT`].
    pub limit: Option<u32>,
    /// Optional status filter.
    pub status: Option<MarketStatus>,
    /// Optional series filter.
    pub series_ticker: Option<String>,
}

/// Query parameters for the orderbook endpoint.
#[derive(Debug, Deserialize)]
pub struct OrderbookQuery {
    /// Levels requested from the server.
    pub depth: Option<u32>,
}

/// Query parameters for the trades endpoint.
#[derive(Debug, Deserialize)]
pub struct TradesQuery {
    /// Optional market filter.
    pub ticker: Option<String>,
    /// Page size.
    pub limit: Option<u32>,
}

/// Market list response.
#[derive(Debug, Serialize)]
pub struct MarketListResponse {
    /// Number of markets returned.
    pub count: usize,
    /// The markets.
    pub markets: Vec<Market>,
}

/// Trade list response.
#[derive(Debug, Serialize)]
pub struct TradeListResponse {
    /// Number of trades returned.
    pub count: usize,
    /// The trades.
    pub trades: Vec<Trade>,
}

/// Series list response.
#[derive(Debug, Serialize)]
pub struct SeriesListResponse {
    /// Number of series returned.
    pub count: usize,
    /// The series.
    pub series: Vec<Series>,
}

fn not_found(what: &str) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: format!("{what} not found"),
        }),
    )
}

/// Serve the embedded dashboard page.
pub async fn dashboard() -> impl IntoResponse {
    Html(include_str!("../../assets/dashboard.html"))
}

/// Health check handler - always returns 200.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

/// Prometheus exposition handler.
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (StatusCode::NOT_FOUND, String::new()),
    }
}

/// List markets with optional status/series filters.
///
/// Single-page fetch: the browser polls this endpoint, so one request here
/// must map to exactly one upstream request regardless of how many pages the
/// upstream could serve.
pub async fn markets(
    State(state): State<AppState>,
    Query(query): Query<MarketsQuery>,
) -> impl IntoResponse {
    let limit = query.limit.unwrap_or(25).clamp(1, MAX_DASHBOARD_LIMIT);
    let markets = state
        .client
        .list_markets_page(limit, query.status, query.series_ticker.as_deref())
        .await;

    Json(MarketListResponse {
        count: markets.len(),
        markets,
    })
}

/// Fetch a single market, 404 when the upstream has nothing.
pub async fn market(
    State(state): State<AppState>,
    Path(ticker): Path<String>,
) -> Result<Json<Market>, (StatusCode, Json<ErrorResponse>)> {
    state
        .client
        .get_market(&ticker)
        .await
        .map(Json)
        .ok_or_else(|| not_found(&format!("market {ticker}")))
}

/// Fetch a market's orderbook.
pub async fn orderbook(
    State(state): State<AppState>,
    Path(ticker): Path<String>,
    Query(query): Query<OrderbookQuery>,
) -> Result<Json<Orderbook>, (StatusCode, Json<ErrorResponse>)> {
    let depth = query.depth.unwrap_or(10);
    state
        .client
        .get_orderbook(&ticker, depth)
        .await
        .map(Json)
        .ok_or_else(|| not_found(&format!("orderbook for {ticker}")))
}

/// List recent trades, optionally filtered to one market.
pub async fn trades(
    State(state): State<AppState>,
    Query(query): Query<TradesQuery>,
) -> impl IntoResponse {
    let limit = query.limit.unwrap_or(10).clamp(1, 50);
    let trades = state.client.list_trades(query.ticker.as_deref(), limit).await;

    Json(TradeListResponse {
        count: trades.len(),
        trades,
    })
}

/// List all series.
pub async fn series_list(State(state): State<AppState>) -> impl IntoResponse {
    let series = state.client.list_series().await;
    Json(SeriesListResponse {
        count: series.len(),
        series,
    })
}

/// Fetch a single series.
pub async fn series(
    State(state): State<AppState>,
    Path(ticker): Path<String>,
) -> Result<Json<Series>, (StatusCode, Json<ErrorResponse>)> {
    state
        .client
        .get_series(&ticker)
        .await
        .map(Json)
        .ok_or_else(|| not_found(&format!("series {ticker}")))
}
