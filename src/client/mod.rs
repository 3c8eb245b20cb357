//! Kalshi API client module.
//!
//! This module handles:
//! - Market, orderbook, trade, and series data types
//! - The paginated, rate-limited fetch client

pub mod fetch;
pub mod types;

pub use fetch::KalshiClient;
pub use types::{BidLevel, Market, MarketStatus, Orderbook, Series, TakerSide, Trade};
