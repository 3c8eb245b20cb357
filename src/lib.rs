//! Kalshi prediction-market explorer.
//!
//! A thin client over the Kalshi trade API with two front ends: a CLI demo
//! that walks markets, orderbooks, trades, and series and renders a static
//! probability chart, and a web dashboard serving the same data as JSON plus
//! an embedded HTML page.
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`client`]: Kalshi API fetch client and data model
//! - [`api`]: HTTP API and dashboard server
//! - [`chart`]: Static SVG chart rendering for the CLI demo
//! - [`metrics`]: Prometheus metrics

pub mod api;
pub mod chart;
pub mod client;
pub mod config;
pub mod error;
pub mod metrics;
pub mod utils;

pub use client::KalshiClient;
pub use config::Config;
pub use error::{AppError, Result};
