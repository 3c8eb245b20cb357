//! HTTP API route definitions.

use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;

use super::handlers::{
    dashboard, health, market, markets, metrics, orderbook, series, series_list, trades, AppState,
};

/// Create the dashboard router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Dashboard page
        .route("/", get(dashboard))
        // Health and observability
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        // Data endpoints
        .route("/api/v1/markets", get(markets))
        .route("/api/v1/markets/:ticker", get(market))
        .route("/api/v1/markets/:ticker/orderbook", get(orderbook))
        .route("/api/v1/trades", get(trades))
        .route("/api/v1/series", get(series_list))
        .route("/api/v1/series/:ticker", get(series))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
