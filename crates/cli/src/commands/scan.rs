//! CLI command for a live scan.
//!
//! Fetches Polymarket political markets and bookmaker outrights
//! concurrently, then runs the engine once over both snapshots.

use super::{execute_scan, print_output, FilterArgs};
use anyhow::{Context, Result};
use clap::Args;
use edge_scanner_odds::{OddsApiClient, OddsApiClientConfig};
use edge_scanner_polymarket::GammaClient;
use std::num::NonZeroU32;
use tracing::{info, warn};

/// Arguments for the live scan command.
#[derive(Args, Debug)]
pub struct ScanArgs {
    #[command(flatten)]
    pub filters: FilterArgs,

    /// Maximum Polymarket markets to fetch (default from config: 200)
    #[arg(long)]
    pub limit: Option<u32>,
}

/// Runs a live scan.
pub async fn run(args: ScanArgs) -> Result<()> {
    let config = args.filters.load_config()?;
    let filter = args.filters.signal_filter(&config.filter);
    let limit = args.limit.unwrap_or(config.polymarket.limit);

    let gamma = GammaClient::with_rate_limit(
        NonZeroU32::new(config.polymarket.requests_per_minute)
            .context("polymarket.requests_per_minute must be positive")?,
    )
    .with_base_url(&config.polymarket.base_url)
    .with_timeout_secs(config.polymarket.timeout_secs);

    let odds = OddsApiClient::new(OddsApiClientConfig {
        base_url: config.odds_api.base_url.clone(),
        api_key: config.odds_api.api_key.clone(),
        regions: config.odds_api.regions.clone(),
        requests_per_minute: NonZeroU32::new(config.odds_api.requests_per_minute)
            .context("odds_api.requests_per_minute must be positive")?,
        timeout_secs: config.odds_api.timeout_secs,
    })?;

    if !odds.has_api_key() {
        warn!("No ODDS_API_KEY set: bookmaker odds unavailable, no edges can be found");
    }

    info!(limit, "Fetching markets and odds");
    let (records, events) = tokio::join!(
        gamma.fetch_political_markets(limit),
        odds.fetch_all_political()
    );

    let output = execute_scan(&records, &events, config.scan.to_match_config(), &filter);
    print_output(&output, args.filters.json)
}
