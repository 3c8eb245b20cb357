//! Kalshi market explorer entry point.

use std::net::SocketAddr;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use metrics_exporter_prometheus::PrometheusBuilder;
use time::macros::format_description;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use kalshi_markets::api::{create_router, AppState};
use kalshi_markets::chart;
use kalshi_markets::client::{KalshiClient, MarketStatus};
use kalshi_markets::config::Config;
use kalshi_markets::error::AppError;
use kalshi_markets::metrics;
use kalshi_markets::utils::shutdown_signal;

/// Kalshi prediction-market explorer.
#[derive(Parser, Debug)]
#[command(name = "kalshi-markets")]
#[command(about = "Explore Kalshi markets, orderbooks, trades, and series")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the full demo sequence (default).
    Demo,

    /// Check configuration validity.
    CheckConfig,

    /// List markets.
    Markets {
        /// Page size per request.
        #[arg(short, long, default_value = "25")]
        limit: u32,

        /// Status filter (open, closed, settled).
        #[arg(short, long)]
        status: Option<String>,

        /// Series ticker filter.
        #[arg(long)]
        series: Option<String>,
    },

    /// Show one market.
    Market {
        /// Market ticker.
        ticker: String,
    },

    /// Show a market's orderbook.
    Orderbook {
        /// Market ticker.
        ticker: String,

        /// Levels requested from the server.
        #[arg(short, long, default_value = "10")]
        depth: u32,
    },

    /// Show recent trades.
    Trades {
        /// Market ticker filter.
        #[arg(short, long)]
        ticker: Option<String>,

        /// Number of trades.
        #[arg(short, long, default_value = "10")]
        limit: u32,
    },

    /// Show series, all or one.
    Series {
        /// Series ticker.
        ticker: Option<String>,
    },

    /// Run the web dashboard.
    Serve {
        /// HTTP server port.
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = if args.verbose {
        EnvFilter::new("kalshi_markets=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    metrics::init_metrics();

    match args.command {
        None | Some(Command::Demo) => cmd_demo().await,
        Some(Command::CheckConfig) => cmd_check_config().await,
        Some(Command::Markets { limit, status, series }) => {
            cmd_markets(limit, status, series).await
        }
        Some(Command::Market { ticker }) => cmd_market(&ticker).await,
        Some(Command::Orderbook { ticker, depth }) => cmd_orderbook(&ticker, depth).await,
        Some(Command::Trades { ticker, limit }) => cmd_trades(ticker, limit).await,
        Some(Command::Series { ticker }) => cmd_series(ticker).await,
        Some(Command::Serve { port }) => cmd_serve(port).await,
    }
}

/// Load config for one-shot CLI commands.
///
/// Pacing exists to protect the upstream from a polling dashboard; the CLI
/// issues a handful of sequential requests and runs unpaced.
fn cli_config() -> Result<Config, AppError> {
    let mut config = Config::load()?;
    config.min_request_interval_ms = 0;
    config.validate().map_err(AppError::InvalidConfig)?;
    Ok(config)
}

fn cli_client(config: &Config) -> Result<KalshiClient, AppError> {
    Ok(KalshiClient::new(config)?)
}

/// Run the fixed demo sequence.
async fn cmd_demo() -> anyhow::Result<()> {
    let config = cli_config()?;

    println!("Kalshi Market Explorer");
    println!("======================================================================");
    println!("API Key:  {}", if config.has_api_key() { "loaded" } else { "MISSING" });
    println!("Base URL: {}", config.kalshi_base_url);
    println!("======================================================================");

    if !config.has_api_key() {
        println!();
        println!("Please add your KALSHI_API_KEY to the .env file");
        println!("Example: KALSHI_API_KEY=your_api_key_here");
        return Ok(());
    }

    let client = cli_client(&config)?;

    // Every fetch degrades to empty on failure; the guard here only catches
    // local errors such as the chart file write.
    if let Err(e) = run_demo(&client).await {
        error!(error = %e, "demo sequence failed");
        println!();
        println!("Error running demo: {e}");
        println!("Make sure your API key is valid and you have an internet connection");
    }

    Ok(())
}

async fn run_demo(client: &KalshiClient) -> anyhow::Result<()> {
    run_quick_start(client).await;
    run_market_analysis(client).await;
    run_series_explorer(client).await;
    run_visualization(client).await?;

    println!();
    println!("All demo steps completed");
    Ok(())
}

/// Demo step 1: fetch and print a handful of markets.
async fn run_quick_start(client: &KalshiClient) {
    println!();
    println!("QUICK START - Fetching markets...");

    let markets = client.list_markets(5, Some(MarketStatus::Open), None).await;

    if markets.is_empty() {
        println!("No markets found");
        return;
    }

    println!("Found {} markets:", markets.len());
    for (i, market) in markets.iter().enumerate() {
        println!();
        println!("{}. {}", i + 1, market.title);
        println!("   Ticker: {}", market.ticker);
        println!("   YES: {}c | NO: {}c", market.yes_price, market.no_price);
        println!("   Volume: {}", market.volume);
    }
}

/// Demo step 2: deep dive into the first market.
async fn run_market_analysis(client: &KalshiClient) {
    println!();
    println!("MARKET ANALYSIS - Deep dive...");

    let markets = client.list_markets(10, Some(MarketStatus::Open), None).await;
    let Some(market) = markets.first() else {
        println!("No markets available for analysis");
        return;
    };

    println!();
    println!("Analyzing: {}", market.title);
    println!("Ticker: {}", market.ticker);

    if let Some(orderbook) = client.get_orderbook(&market.ticker, 5).await {
        println!();
        println!("Orderbook:");
        match orderbook.yes_bid {
            Some(bid) => println!("YES Bid: {bid}c"),
            None => println!("YES Bid: none"),
        }
        match orderbook.no_bid {
            Some(bid) => println!("NO Bid: {bid}c"),
            None => println!("NO Bid: none"),
        }

        if !orderbook.bids.is_empty() {
            println!();
            println!("Top Bids:");
            for bid in orderbook.bids.iter().take(3) {
                println!("  {}c - {} contracts", bid.price, bid.count);
            }
        }
    }

    let trades = client.list_trades(Some(&market.ticker), 10).await;
    if !trades.is_empty() {
        let hms = format_description!("[hour]:[minute]:[second]");
        println!();
        println!("Recent Trades:");
        for trade in trades.iter().take(5) {
            let time_str = trade
                .created_time
                .format(&hms)
                .unwrap_or_else(|_| trade.created_time.to_string());
            println!(
                "  {}: {} {} @ {}c",
                time_str,
                trade.taker_side.to_string().to_uppercase(),
                trade.count,
                trade.price
            );
        }
    }
}

/// Demo step 3: list series grouped by category.
async fn run_series_explorer(client: &KalshiClient) {
    println!();
    println!("SERIES EXPLORER...");

    let series = client.list_series().await;
    if series.is_empty() {
        println!("No series found");
        return;
    }

    println!("Found {} series:", series.len());

    let mut categories: std::collections::BTreeMap<&str, Vec<&str>> = Default::default();
    for s in series.iter().take(10) {
        categories.entry(s.category_label()).or_default().push(&s.title);
    }

    for (category, titles) in categories {
        println!();
        println!("{category}:");
        for title in titles {
            println!("  - {title}");
        }
    }
}

/// Demo step 4: write the probability chart.
async fn run_visualization(client: &KalshiClient) -> anyhow::Result<()> {
    println!();
    println!("CREATING VISUALIZATION...");

    let markets = client.list_markets(15, Some(MarketStatus::Open), None).await;
    if markets.len() < 3 {
        println!("Not enough markets for visualization");
        return Ok(());
    }

    chart::write_probability_chart(&markets, Path::new(chart::CHART_FILE))?;
    println!("Visualization saved as '{}'", chart::CHART_FILE);
    Ok(())
}

/// Check configuration validity.
async fn cmd_check_config() -> anyhow::Result<()> {
    println!("======================================================================");
    println!("KALSHI MARKETS - CONFIGURATION CHECK");
    println!("======================================================================");

    print!("Loading configuration... ");
    let config = match Config::load() {
        Ok(c) => {
            println!("OK");
            c
        }
        Err(e) => {
            println!("FAILED");
            println!("  Error: {e}");
            return Err(anyhow::anyhow!("Configuration load failed"));
        }
    };

    print!("Validating configuration... ");
    match config.validate() {
        Ok(()) => println!("OK"),
        Err(e) => {
            println!("FAILED");
            println!("  Error: {e}");
            return Err(anyhow::anyhow!("Configuration validation failed"));
        }
    }

    println!("----------------------------------------------------------------------");
    println!("Configuration Summary:");
    println!("  Base URL: {}", config.kalshi_base_url);
    println!("  API Key: {}", if config.has_api_key() { "present" } else { "absent" });
    println!("  Timeout: {}ms", config.http_timeout_ms);
    println!("  Pacing Interval: {}ms", config.min_request_interval_ms);
    println!(
        "  Rate-Limit Policy: {} retr{} after {}ms backoff",
        config.rate_limit_retries,
        if config.rate_limit_retries == 1 { "y" } else { "ies" },
        config.rate_limit_backoff_ms
    );
    println!("  Page Limit: {}", config.page_limit);
    println!("  Dashboard Port: {}", config.port);
    println!("======================================================================");
    println!("CONFIGURATION CHECK PASSED");
    println!("======================================================================");

    Ok(())
}

/// List markets.
async fn cmd_markets(
    limit: u32,
    status: Option<String>,
    series: Option<String>,
) -> anyhow::Result<()> {
    let status = status
        .map(|s| MarketStatus::from_str(&s).map_err(|_| anyhow::anyhow!("unknown status: {s}")))
        .transpose()?;

    let config = cli_config()?;
    let client = cli_client(&config)?;

    let markets = client.list_markets(limit, status, series.as_deref()).await;
    println!("Found {} markets", markets.len());
    for market in &markets {
        println!(
            "{:<30} YES {:>3}c  NO {:>3}c  vol {:>8}  [{}]  {}",
            market.ticker, market.yes_price, market.no_price, market.volume, market.status,
            chart::truncate_title(&market.title, 50)
        );
    }

    Ok(())
}

/// Show one market.
async fn cmd_market(ticker: &str) -> anyhow::Result<()> {
    let config = cli_config()?;
    let client = cli_client(&config)?;

    match client.get_market(ticker).await {
        Some(market) => {
            println!("{}", market.title);
            println!("  Ticker: {}", market.ticker);
            println!("  Status: {}", market.status);
            println!("  YES: {}c | NO: {}c", market.yes_price, market.no_price);
            println!("  Volume: {}", market.volume);
        }
        None => println!("No data for market {ticker}"),
    }

    Ok(())
}

/// Show a market's orderbook.
async fn cmd_orderbook(ticker: &str, depth: u32) -> anyhow::Result<()> {
    let config = cli_config()?;
    let client = cli_client(&config)?;

    match client.get_orderbook(ticker, depth).await {
        Some(book) => {
            println!("Orderbook for {ticker} (depth {depth}):");
            println!("  YES Bid: {}", book.yes_bid.map_or("none".to_string(), |b| format!("{b}c")));
            println!("  NO Bid:  {}", book.no_bid.map_or("none".to_string(), |b| format!("{b}c")));
            for bid in &book.bids {
                println!("  {:>3}c - {} contracts", bid.price, bid.count);
            }
        }
        None => println!("No orderbook data for {ticker}"),
    }

    Ok(())
}

/// Show recent trades.
async fn cmd_trades(ticker: Option<String>, limit: u32) -> anyhow::Result<()> {
    let config = cli_config()?;
    let client = cli_client(&config)?;

    let trades = client.list_trades(ticker.as_deref(), limit).await;
    if trades.is_empty() {
        println!("No trades found");
        return Ok(());
    }

    let hms = format_description!("[hour]:[minute]:[second]");
    for trade in &trades {
        let time_str = trade
            .created_time
            .format(&hms)
            .unwrap_or_else(|_| trade.created_time.to_string());
        println!(
            "{} {:<30} {} {} @ {}c",
            time_str,
            trade.ticker,
            trade.taker_side.to_string().to_uppercase(),
            trade.count,
            trade.price
        );
    }

    Ok(())
}

/// Show series, all or one.
async fn cmd_series(ticker: Option<String>) -> anyhow::Result<()> {
    let config = cli_config()?;
    let client = cli_client(&config)?;

    match ticker {
        Some(ticker) => match client.get_series(&ticker).await {
            Some(series) => {
                println!("{}", series.title);
                println!("  Ticker: {}", series.ticker);
                println!("  Category: {}", series.category_label());
            }
            None => println!("No data for series {ticker}"),
        },
        None => {
            let series = client.list_series().await;
            println!("Found {} series", series.len());
            for s in &series {
                println!("{:<20} [{}] {}", s.ticker, s.category_label(), s.title);
            }
        }
    }

    Ok(())
}

/// Run the web dashboard.
async fn cmd_serve(port_override: Option<u16>) -> anyhow::Result<()> {
    info!("Loading configuration...");
    let mut config = Config::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    if let Some(port) = port_override {
        config.port = port;
    }

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return Err(AppError::InvalidConfig(e).into());
    }

    info!("Configuration loaded successfully");
    info!("Upstream: {}", config.kalshi_base_url);
    info!(
        "Pacing: {}ms between requests, {} retries after {}ms on 429",
        config.min_request_interval_ms, config.rate_limit_retries, config.rate_limit_backoff_ms
    );

    let prometheus = PrometheusBuilder::new().install_recorder()?;

    let client = Arc::new(KalshiClient::new(&config)?);
    let state = AppState::new(client).with_metrics(prometheus);
    let router = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;
    info!("Dashboard listening on http://{}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Dashboard stopped");
    Ok(())
}
