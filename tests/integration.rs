//! Integration tests for the Kalshi market explorer.
//!
//! Most tests run against a local scripted upstream so no network access is
//! needed. Tests marked `#[ignore]` hit the real Kalshi API; run them with:
//! cargo test --test integration -- --ignored

use std::sync::Arc;

use axum::extract::{Path, Query};
use axum::routing::get;
use axum::{Json, Router};
use std::collections::HashMap;
use tower::ServiceExt;

use kalshi_markets::api::{create_router, AppState};
use kalshi_markets::client::{KalshiClient, MarketStatus, TakerSide};
use kalshi_markets::config::Config;

fn market_json(ticker: &str, yes_price: u32) -> serde_json::Value {
    serde_json::json!({
        "ticker": ticker,
        "title": format!("Will {ticker} resolve yes?"),
        "yes_price": yes_price,
        "no_price": 100 - yes_price,
        "volume": 12_345,
        "status": "open"
    })
}

/// A scripted upstream covering every endpoint the client touches.
fn scripted_upstream() -> Router {
    Router::new()
        .route(
            "/markets",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                // Two pages chained by one cursor.
                let body = match params.get("cursor").map(String::as_str) {
                    None => serde_json::json!({
                        "markets": [market_json("KXA", 63), market_json("KXB", 41)],
                        "cursor": "page-2"
                    }),
                    Some("page-2") => serde_json::json!({
                        "markets": [market_json("KXC", 88)],
                        "cursor": null
                    }),
                    Some(other) => panic!("unexpected cursor {other}"),
                };
                Json(body)
            }),
        )
        .route(
            "/markets/trades",
            get(|| async {
                Json(serde_json::json!({
                    "trades": [
                        {
                            "ticker": "KXA",
                            "created_time": "2026-08-26T15:00:00Z",
                            "taker_side": "yes",
                            "price": 63,
                            "count": 20
                        },
                        {
                            "ticker": "KXA",
                            "created_time": "2026-08-26T14:59:30Z",
                            "taker_side": "no",
                            "price": 38,
                            "count": 5
                        }
                    ]
                }))
            }),
        )
        .route(
            "/markets/:ticker",
            get(|Path(ticker): Path<String>| async move {
                Json(serde_json::json!({ "market": market_json(&ticker, 63) }))
            }),
        )
        .route(
            "/markets/:ticker/orderbook",
            get(|Path(_): Path<String>| async {
                Json(serde_json::json!({
                    "orderbook": {
                        "yes_bid": 62,
                        "no_bid": 36,
                        "bids": [
                            { "price": 62, "count": 150 },
                            { "price": 61, "count": 75 },
                            { "price": 60, "count": 10 }
                        ]
                    }
                }))
            }),
        )
        .route(
            "/series",
            get(|| async {
                Json(serde_json::json!({
                    "series": [
                        { "ticker": "KXSERIES", "title": "Example series", "category": "Politics" },
                        { "ticker": "KXOTHER", "title": "Uncategorized series" }
                    ]
                }))
            }),
        )
        .route(
            "/series/:ticker",
            get(|Path(ticker): Path<String>| async move {
                Json(serde_json::json!({
                    "series": { "ticker": ticker, "title": "Example series", "category": "Politics" }
                }))
            }),
        )
}

async fn upstream_config() -> Config {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, scripted_upstream()).await.unwrap();
    });

    Config {
        kalshi_base_url: format!("http://{addr}"),
        min_request_interval_ms: 0,
        rate_limit_backoff_ms: 5,
        ..Config::default()
    }
}

#[tokio::test]
async fn client_walks_every_endpoint() {
    let config = upstream_config().await;
    let client = KalshiClient::new(&config).unwrap();

    let markets = client.list_markets(2, Some(MarketStatus::Open), None).await;
    let tickers: Vec<&str> = markets.iter().map(|m| m.ticker.as_str()).collect();
    assert_eq!(tickers, vec!["KXA", "KXB", "KXC"]);

    let market = client.get_market("KXA").await.expect("market");
    assert_eq!(market.yes_price, 63);
    assert_eq!(market.no_price, 37);

    let book = client.get_orderbook("KXA", 3).await.expect("orderbook");
    assert_eq!(book.yes_bid, Some(62));
    assert_eq!(book.bids.len(), 3);

    let trades = client.list_trades(Some("KXA"), 10).await;
    assert_eq!(trades.len(), 2);
    assert_eq!(trades[0].taker_side, TakerSide::Yes);

    let all_series = client.list_series().await;
    assert_eq!(all_series.len(), 2);
    assert_eq!(all_series[1].category_label(), "Uncategorized");

    let one = client.get_series("KXSERIES").await.expect("series");
    assert_eq!(one.category_label(), "Politics");
}

#[tokio::test]
async fn dashboard_serves_upstream_data_end_to_end() {
    let config = upstream_config().await;
    let state = AppState::new(Arc::new(KalshiClient::new(&config).unwrap()));
    let app = create_router(state);

    let response = app
        .clone()
        .oneshot(
            axum::http::Request::builder()
                .uri("/api/v1/markets?limit=2&status=open")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), axum::http::StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    // The dashboard serves a single page; the cursor is left unfollowed.
    assert_eq!(json["count"], 2);
    assert_eq!(json["markets"][0]["ticker"], "KXA");
    assert_eq!(json["markets"][1]["ticker"], "KXB");

    let response = app
        .clone()
        .oneshot(
            axum::http::Request::builder()
                .uri("/api/v1/markets/KXA/orderbook?depth=3")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), axum::http::StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["yes_bid"], 62);

    let response = app
        .oneshot(
            axum::http::Request::builder()
                .uri("/api/v1/series/KXSERIES")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), axum::http::StatusCode::OK);
}

/// Sanity check against the live API.
#[tokio::test]
#[ignore = "requires network access"]
async fn live_list_markets() {
    let config = Config::default();
    let client = KalshiClient::new(&config).unwrap();

    let markets = client.list_markets(5, Some(MarketStatus::Open), None).await;
    println!("Found {} live markets", markets.len());
    for market in markets.iter().take(5) {
        println!("  {} YES {}c", market.ticker, market.yes_price);
        assert!(market.yes_price <= 100);
    }
}

/// Sanity check the live series endpoint.
#[tokio::test]
#[ignore = "requires network access"]
async fn live_list_series() {
    let config = Config::default();
    let client = KalshiClient::new(&config).unwrap();

    let series = client.list_series().await;
    println!("Found {} live series", series.len());
}
