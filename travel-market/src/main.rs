use std::error::Error;
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;

use tracing::{info, level_filters::LevelFilter, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use travel_market::catalog::load_catalog;
use travel_market::market::{
    AggregatorConfig, HttpSeller, HttpSellerConfig, SellerAgent, StaticDirectory, TRAVEL_AGENCY,
};
use travel_market::planner::SearchConfig;
use travel_market::session::Buyer;
use travel_market::web::{BuyerState, SellerState, buyer_router, seller_router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    init_logger();

    match env_or("MARKET_ROLE", "buyer").as_str() {
        "buyer" => run_buyer().await,
        "seller" => run_seller().await,
        other => Err(format!("MARKET_ROLE must be buyer or seller, got {other:?}").into()),
    }
}

/// Serve journey planning over every seller listed in `SELLER_URLS`.
async fn run_buyer() -> Result<(), Box<dyn Error>> {
    let directory = StaticDirectory::new();
    for config in HttpSellerConfig::parse_list(&env_or("SELLER_URLS", ""))? {
        directory.register(TRAVEL_AGENCY, Arc::new(HttpSeller::new(config)?));
    }
    if directory.len(TRAVEL_AGENCY) == 0 {
        warn!("SELLER_URLS is empty; every search will come back empty");
    }

    let mut aggregator_config = AggregatorConfig::default();
    aggregator_config.window_ms = env_parse("AGGREGATION_WINDOW_MS", aggregator_config.window_ms)?;

    let defaults = SearchConfig::default();
    let buffer_mins = env_parse("CONNECTION_BUFFER_MINS", defaults.connection_buffer_mins)?;
    let search_config = defaults
        .with_connection_buffer_mins(buffer_mins)
        .with_sort_mode_name(&env_or("SORT_MODE", "cost"))
        .map_err(|e| format!("SORT_MODE: {e}"))?;

    info!(
        sellers = directory.len(TRAVEL_AGENCY),
        window_ms = aggregator_config.window_ms,
        buffer_mins = search_config.connection_buffer_mins,
        sort = %search_config.sort_mode,
        "Starting buyer"
    );

    let buyer = Buyer::new(Arc::new(directory), aggregator_config, search_config);
    let app = buyer_router(BuyerState::new(buyer));

    let addr: SocketAddr = env_parse("MARKET_ADDR", SocketAddr::from(([127, 0, 0, 1], 3000)))?;
    info!(%addr, "Buyer listening");
    info!("  GET  /health        - Health check");
    info!("  POST /journey/plan  - Plan a journey");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// Serve the catalog read from `SELLER_CATALOG`.
async fn run_seller() -> Result<(), Box<dyn Error>> {
    let id = env_or("SELLER_ID", "travel-agency");
    let path = std::env::var("SELLER_CATALOG").map_err(|_| "SELLER_CATALOG must be set")?;

    let report = load_catalog(&path)?;
    for skipped in &report.errors {
        warn!(path = %path, %skipped, "Skipped catalog record");
    }

    info!(
        seller = %id,
        journeys = report.catalog.len(),
        locations = report.catalog.location_count(),
        skipped = report.errors.len(),
        "Catalog loaded"
    );

    let agent = SellerAgent::new(id.as_str(), report.catalog);
    let app = seller_router(SellerState::new(agent));

    let addr: SocketAddr = env_parse("MARKET_ADDR", SocketAddr::from(([127, 0, 0, 1], 4001)))?;
    info!(seller = %id, %addr, "Seller listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn init_logger() {
    let default_level = LevelFilter::INFO;
    let rust_log =
        std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_else(|_| default_level.to_string());
    let env_filter = EnvFilter::try_new(rust_log).unwrap_or_else(|err| {
        eprintln!(
            "invalid {}, falling back to level '{}' - {}",
            EnvFilter::DEFAULT_ENV,
            default_level,
            err,
        );
        EnvFilter::new(default_level.to_string())
    });
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(env_filter)
        .init();
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse `key` from the environment, or fall back to `default` when unset.
fn env_parse<T>(key: &str, default: T) -> Result<T, Box<dyn Error>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| format!("invalid {key} {raw:?}: {e}").into()),
        Err(_) => Ok(default),
    }
}
