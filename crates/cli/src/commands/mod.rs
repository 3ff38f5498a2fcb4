//! CLI commands for the edge scanner.

pub mod output;
pub mod scan;
pub mod scan_snapshot;

pub use scan::ScanArgs;
pub use scan_snapshot::ScanSnapshotArgs;

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Args;
use edge_scanner_core::{AppConfig, ConfigLoader, FilterSettings};
use edge_scanner_engine::{
    DirectionFilter, EdgeScanner, EdgeSignal, MarketRecord, MatchConfig, OddsEvent, ScanSummary,
    SignalFilter,
};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

/// Filter and output flags shared by every scan command.
///
/// Unset flags fall back to the `[filter]` section of the config file.
#[derive(Args, Debug)]
pub struct FilterArgs {
    /// Config file path
    #[arg(short, long, default_value = "config/Config.toml")]
    pub config: String,

    /// Config profile; loads config/Config.{profile}.toml over the defaults
    #[arg(long, env = "EDGE_PROFILE")]
    pub profile: Option<String>,

    /// Minimum edge in percentage points (e.g., 5 for 5pp)
    #[arg(long)]
    pub min_delta: Option<f64>,

    /// Minimum Polymarket liquidity in USD
    #[arg(long)]
    pub min_liquidity: Option<Decimal>,

    /// Only markets resolving within this many days
    #[arg(long, conflicts_with = "any_days")]
    pub max_days: Option<i64>,

    /// Accept markets with any (or unknown) resolution date
    #[arg(long)]
    pub any_days: bool,

    /// Edge direction to keep: both, poly or bookie
    #[arg(long)]
    pub direction: Option<DirectionFilter>,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

impl FilterArgs {
    /// Loads configuration from the selected file or profile.
    pub fn load_config(&self) -> Result<AppConfig> {
        match &self.profile {
            Some(profile) => ConfigLoader::load_with_profile(profile),
            None => ConfigLoader::load_from(&self.config),
        }
    }

    /// Applies command-line overrides to the configured filter.
    #[must_use]
    pub fn signal_filter(&self, settings: &FilterSettings) -> SignalFilter {
        let mut filter = settings.to_signal_filter();

        if let Some(pp) = self.min_delta {
            filter.min_abs_delta = pp / 100.0;
        }
        if let Some(liquidity) = self.min_liquidity {
            filter.min_liquidity = liquidity;
        }
        if self.any_days {
            filter.max_days_to_end = None;
        } else if let Some(days) = self.max_days {
            filter.max_days_to_end = Some(days);
        }
        if let Some(direction) = self.direction {
            filter.direction = direction;
        }

        filter
    }
}

/// Result of one filtered scan, as printed by every command.
#[derive(Debug, Clone, Serialize)]
pub struct ScanOutput {
    pub generated_at: DateTime<Utc>,
    pub markets_fetched: usize,
    pub markets_eligible: usize,
    pub events_fetched: usize,
    pub duplicates_dropped: usize,
    pub summary: ScanSummary,
    pub filter: SignalFilter,
    pub signals: Vec<EdgeSignal>,
}

/// Pre-filters records, scans, then filters and returns the ranked signals.
#[must_use]
pub fn execute_scan(
    records: &[MarketRecord],
    events: &[OddsEvent],
    match_config: MatchConfig,
    filter: &SignalFilter,
) -> ScanOutput {
    let eligible = filter.eligible_records(records);
    let report = EdgeScanner::with_config(match_config).run_scan(&eligible, events);
    let summary = report.summary();
    let duplicates_dropped = report.duplicates_dropped;

    let signals = filter.apply(report.signals);

    info!(
        markets = records.len(),
        eligible = eligible.len(),
        events = events.len(),
        edges = signals.len(),
        "Scan finished"
    );

    ScanOutput {
        generated_at: Utc::now(),
        markets_fetched: records.len(),
        markets_eligible: eligible.len(),
        events_fetched: events.len(),
        duplicates_dropped,
        summary,
        filter: filter.clone(),
        signals,
    }
}

/// Prints the output as a table or JSON.
pub fn print_output(output: &ScanOutput, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(output)?);
    } else {
        output::print_report(output);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use edge_scanner_engine::{Bookmaker, BookmakerMarket, Outcome};
    use rust_decimal_macros::dec;

    fn args() -> FilterArgs {
        FilterArgs {
            config: "config/Config.toml".to_string(),
            profile: None,
            min_delta: None,
            min_liquidity: None,
            max_days: None,
            any_days: false,
            direction: None,
            json: false,
        }
    }

    #[test]
    fn test_signal_filter_uses_settings_by_default() {
        let filter = args().signal_filter(&FilterSettings::default());
        assert_eq!(filter, SignalFilter::default());
    }

    #[test]
    fn test_signal_filter_overrides() {
        let mut args = args();
        args.min_delta = Some(2.5);
        args.min_liquidity = Some(dec!(1000));
        args.max_days = Some(7);
        args.direction = Some(DirectionFilter::BookieHigher);

        let filter = args.signal_filter(&FilterSettings::default());
        assert!((filter.min_abs_delta - 0.025).abs() < 1e-12);
        assert_eq!(filter.min_liquidity, dec!(1000));
        assert_eq!(filter.max_days_to_end, Some(7));
        assert_eq!(filter.direction, DirectionFilter::BookieHigher);
    }

    #[test]
    fn test_any_days_clears_horizon() {
        let mut args = args();
        args.any_days = true;

        let filter = args.signal_filter(&FilterSettings::default());
        assert!(filter.max_days_to_end.is_none());
    }

    #[test]
    fn test_execute_scan_counts() {
        let records = vec![
            MarketRecord::new(
                "US Presidential Election Winner",
                vec!["Donald Trump".to_string(), "Kamala Harris".to_string()],
                vec![0.61, 0.39],
            )
            .with_liquidity(dec!(500000))
            .with_days_to_end(10),
            MarketRecord::binary("Thin market", 0.5).with_liquidity(dec!(10)),
        ];
        let events = vec![OddsEvent::new("US Presidential Election Winner", "", None)
            .with_bookmaker(Bookmaker::new(
                "Bet365",
                vec![BookmakerMarket::new(
                    "h2h",
                    vec![
                        Outcome::new("Donald Trump", 1.8),
                        Outcome::new("Kamala Harris", 2.1),
                    ],
                )],
            ))];

        let output = execute_scan(
            &records,
            &events,
            MatchConfig::default(),
            &SignalFilter::default(),
        );

        assert_eq!(output.markets_fetched, 2);
        assert_eq!(output.markets_eligible, 1);
        assert_eq!(output.events_fetched, 1);
        assert_eq!(output.signals.len(), 2);
        assert!(output.signals.iter().all(|s| s.abs_delta() >= 0.05));
    }
}
