//! Data types returned by the Kalshi trade API.
//!
//! All entities are plain serde records: transient request/response values
//! the client never caches, friendly to any presentation layer.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use time::OffsetDateTime;

/// Lifecycle status of a market.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, Default,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum MarketStatus {
    /// Trading is open.
    Open,
    /// Trading has ended, awaiting settlement.
    Closed,
    /// Outcome determined and paid out.
    Settled,
    /// Any status this client does not model.
    #[serde(other)]
    #[default]
    Unknown,
}

/// Which side of a trade initiated at execution.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TakerSide {
    /// Taker bought the YES side.
    Yes,
    /// Taker bought the NO side.
    No,
}

/// Immutable snapshot of one market as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Market {
    /// Unique market identifier.
    pub ticker: String,
    /// Display title.
    pub title: String,
    /// YES price in cents (0-100); market-implied probability.
    pub yes_price: u32,
    /// NO price in cents, conventionally `100 - yes_price`.
    pub no_price: u32,
    /// Contracts traded.
    #[serde(default)]
    pub volume: u64,
    /// Market status.
    #[serde(default)]
    pub status: MarketStatus,
}

impl Market {
    /// Whether the market is open for trading.
    pub fn is_open(&self) -> bool {
        self.status == MarketStatus::Open
    }
}

/// Single bid level: price in cents and resting contract count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidLevel {
    /// Price in cents.
    pub price: u32,
    /// Contracts resting at this price.
    pub count: u32,
}

/// Orderbook snapshot for one market.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Orderbook {
    /// Best YES bid in cents, if any.
    #[serde(default)]
    pub yes_bid: Option<u32>,
    /// Best NO bid in cents, if any.
    #[serde(default)]
    pub no_bid: Option<u32>,
    /// Bid levels ordered by price. Length is bounded server-side by the
    /// requested depth; short books are returned as-is.
    #[serde(default)]
    pub bids: Vec<BidLevel>,
}

/// One executed trade from the time-ordered feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    /// Market the trade belongs to.
    pub ticker: String,
    /// Execution timestamp.
    #[serde(with = "time::serde::rfc3339")]
    pub created_time: OffsetDateTime,
    /// Which side initiated.
    pub taker_side: TakerSide,
    /// Execution price in cents.
    pub price: u32,
    /// Contracts traded.
    pub count: u32,
}

/// A series groups markets under one category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Series {
    /// Series ticker.
    pub ticker: String,
    /// Display title.
    pub title: String,
    /// Category label, absent for uncategorized series.
    #[serde(default)]
    pub category: Option<String>,
}

impl Series {
    /// Category label with a fallback for uncategorized series.
    pub fn category_label(&self) -> &str {
        self.category.as_deref().unwrap_or("Uncategorized")
    }
}

// === Response envelopes ===

/// One page of `/markets`, with the continuation cursor.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketsPage {
    /// Markets on this page.
    #[serde(default)]
    pub markets: Vec<Market>,
    /// Opaque cursor for the next page; absent or empty on the last page.
    #[serde(default)]
    pub cursor: Option<String>,
}

/// Envelope of `/markets/{ticker}`.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketEnvelope {
    /// The requested market.
    pub market: Market,
}

/// Envelope of `/markets/{ticker}/orderbook`.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderbookEnvelope {
    /// The requested orderbook.
    pub orderbook: Orderbook,
}

/// One page of `/markets/trades`.
#[derive(Debug, Clone, Deserialize)]
pub struct TradesPage {
    /// Trades on this page.
    #[serde(default)]
    pub trades: Vec<Trade>,
}

/// Envelope of `/series/{ticker}`.
#[derive(Debug, Clone, Deserialize)]
pub struct SeriesEnvelope {
    /// The requested series.
    pub series: Series,
}

/// Envelope of `/series`.
#[derive(Debug, Clone, Deserialize)]
pub struct SeriesListEnvelope {
    /// All series.
    #[serde(default)]
    pub series: Vec<Series>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn markets_page_deserializes_single_market() {
        let json = r#"{
            "markets": [{
                "ticker": "ABC",
                "title": "Will X happen?",
                "yes_price": 63,
                "no_price": 37,
                "volume": 1000,
                "status": "open"
            }],
            "cursor": null
        }"#;

        let page: MarketsPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.markets.len(), 1);
        assert_eq!(page.cursor, None);

        let market = &page.markets[0];
        assert_eq!(market.ticker, "ABC");
        assert_eq!(market.yes_price, 63);
        assert_eq!(market.no_price, 37);
        assert_eq!(market.volume, 1000);
        assert!(market.is_open());
    }

    #[test]
    fn unknown_status_is_tolerated() {
        let json = r#"{
            "ticker": "XYZ",
            "title": "t",
            "yes_price": 50,
            "no_price": 50,
            "volume": 0,
            "status": "finalized"
        }"#;

        let market: Market = serde_json::from_str(json).unwrap();
        assert_eq!(market.status, MarketStatus::Unknown);
        assert!(!market.is_open());
    }

    #[test]
    fn status_round_trips_through_strum() {
        use std::str::FromStr;
        assert_eq!(MarketStatus::from_str("open").unwrap(), MarketStatus::Open);
        assert_eq!(MarketStatus::from_str("SETTLED").unwrap(), MarketStatus::Settled);
        assert_eq!(MarketStatus::Closed.to_string(), "closed");
    }

    #[test]
    fn trade_deserializes_with_rfc3339_timestamp() {
        let json = r#"{
            "ticker": "ABC",
            "created_time": "2026-08-26T14:03:22Z",
            "taker_side": "yes",
            "price": 63,
            "count": 10
        }"#;

        let trade: Trade = serde_json::from_str(json).unwrap();
        assert_eq!(trade.taker_side, TakerSide::Yes);
        assert_eq!(trade.created_time.hour(), 14);
        assert_eq!(trade.price, 63);
    }

    #[test]
    fn orderbook_defaults_when_fields_missing() {
        let book: Orderbook = serde_json::from_str("{}").unwrap();
        assert_eq!(book.yes_bid, None);
        assert!(book.bids.is_empty());
    }

    #[test]
    fn series_category_label_fallback() {
        let series = Series {
            ticker: "S-1".to_string(),
            title: "Weather".to_string(),
            category: None,
        };
        assert_eq!(series.category_label(), "Uncategorized");
    }

    #[test]
    fn cursor_survives_round_trip() {
        let json = r#"{"markets": [], "cursor": "abc123"}"#;
        let page: MarketsPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.cursor.as_deref(), Some("abc123"));
    }
}
