//! Application configuration loaded from environment variables.

use serde::Deserialize;
use url::Url;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Kalshi API ===
    /// Optional API key for authenticated calls. Public endpoints work
    /// without it; the CLI demo refuses to start when it is absent.
    #[serde(default)]
    pub kalshi_api_key: Option<String>,

    /// Trade API base URL.
    #[serde(default = "default_base_url")]
    pub kalshi_base_url: String,

    // === HTTP behavior ===
    /// Per-request timeout in milliseconds.
    #[serde(default = "default_http_timeout_ms")]
    pub http_timeout_ms: u64,

    /// Minimum spacing between outbound requests in milliseconds.
    /// Zero disables pacing.
    #[serde(default = "default_min_request_interval_ms")]
    pub min_request_interval_ms: u64,

    /// Fixed delay before retrying a rate-limited request, in milliseconds.
    #[serde(default = "default_rate_limit_backoff_ms")]
    pub rate_limit_backoff_ms: u64,

    /// How many times a 429 response is retried before giving up.
    #[serde(default = "default_rate_limit_retries")]
    pub rate_limit_retries: u32,

    /// Page size requested from list endpoints (1..=1000).
    #[serde(default = "default_page_limit")]
    pub page_limit: u32,

    // === Server Configuration ===
    /// HTTP server port for the dashboard.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,

    /// Enable verbose logging.
    #[serde(default)]
    pub verbose: bool,
}

fn default_base_url() -> String {
    "https://api.elections.kalshi.com/trade-api/v2".to_string()
}

fn default_http_timeout_ms() -> u64 {
    30_000
}

fn default_min_request_interval_ms() -> u64 {
    500
}

fn default_rate_limit_backoff_ms() -> u64 {
    3_000
}

fn default_rate_limit_retries() -> u32 {
    1
}

fn default_page_limit() -> u32 {
    100
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), String> {
        if Url::parse(&self.kalshi_base_url).is_err() {
            return Err(format!(
                "KALSHI_BASE_URL is not a valid URL: {}",
                self.kalshi_base_url
            ));
        }

        if self.http_timeout_ms == 0 {
            return Err("HTTP_TIMEOUT_MS must be greater than 0".to_string());
        }

        if self.page_limit == 0 || self.page_limit > 1000 {
            return Err("PAGE_LIMIT must be between 1 and 1000".to_string());
        }

        Ok(())
    }

    /// Check if an API key is configured.
    pub fn has_api_key(&self) -> bool {
        self.kalshi_api_key
            .as_deref()
            .map(|k| !k.is_empty())
            .unwrap_or(false)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            kalshi_api_key: None,
            kalshi_base_url: default_base_url(),
            http_timeout_ms: default_http_timeout_ms(),
            min_request_interval_ms: default_min_request_interval_ms(),
            rate_limit_backoff_ms: default_rate_limit_backoff_ms(),
            rate_limit_retries: default_rate_limit_retries(),
            page_limit: default_page_limit(),
            port: default_port(),
            rust_log: default_log_level(),
            verbose: false,
        }
    }
}
