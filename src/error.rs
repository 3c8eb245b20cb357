//! Unified error types for the market explorer.

use thiserror::Error;

/// Top-level application error.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Configuration validation error.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Fetch client error.
    #[error("client error: {0}")]
    Client(#[from] ClientError),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while talking to the Kalshi API.
///
/// These never escape the public accessors of [`crate::KalshiClient`]; they
/// are logged once at the client boundary and collapsed to `None`/empty.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Transport-level failure (connect, timeout, body read).
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status.
    #[error("{endpoint} returned HTTP {status}")]
    Status {
        /// Endpoint path that failed.
        endpoint: String,
        /// Status code returned.
        status: reqwest::StatusCode,
    },

    /// Rate-limit retry budget exhausted.
    #[error("{endpoint} still rate limited after {attempts} attempts")]
    RateLimited {
        /// Endpoint path that was throttled.
        endpoint: String,
        /// Total attempts made, including the first request.
        attempts: u32,
    },

    /// Response body did not match the expected shape.
    #[error("failed to decode {endpoint} response: {reason}")]
    Decode {
        /// Endpoint path whose payload failed to decode.
        endpoint: String,
        /// Decoder error text.
        reason: String,
    },

    /// Base URL or endpoint path could not be parsed.
    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, AppError>;
