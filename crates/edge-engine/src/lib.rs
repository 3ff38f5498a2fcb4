//! Cross-source edge detection between prediction markets and bookmakers.
//!
//! This crate compares prediction-market probabilities with bookmaker odds
//! for the same political outcomes and reports the gaps ("edges").
//!
//! # Overview
//!
//! The two sources share no identifiers, so pairings are found by fuzzy text
//! matching. Bookmaker odds are converted to fair probabilities before
//! comparison:
//!
//! ```text
//! Bookmaker (h2h):  Trump @ 1.80, Harris @ 2.10
//!   raw implied:    0.5556 + 0.4762 = 1.0317 (3.2% overround)
//!   fair:           Trump 0.5385, Harris 0.4615
//!
//! Polymarket:       Trump 0.60
//!   delta:          0.60 - 0.5385 = +6.15pp (POLY > BOOKIE)
//! ```
//!
//! # Modules
//!
//! - [`types`]: Records, events and signals
//! - [`odds`]: Decimal odds to fair probabilities
//! - [`similarity`]: Text similarity scoring
//! - [`matcher`]: Event, outcome and outright-runner matching
//! - [`scanner`]: Both matching passes, ranking and deduplication
//! - [`filter`]: Caller-side record and signal filters
//!
//! # Example
//!
//! ```
//! use edge_scanner_engine::{EdgeScanner, MarketRecord, OddsEvent, SignalFilter};
//!
//! let records: Vec<MarketRecord> = Vec::new();
//! let events: Vec<OddsEvent> = Vec::new();
//!
//! let filter = SignalFilter::default();
//! let eligible = filter.eligible_records(&records);
//! let report = EdgeScanner::new().run_scan(&eligible, &events);
//! let signals = filter.apply(report.signals);
//! assert!(signals.is_empty());
//! ```
//!
//! The engine is synchronous and never fails: degenerate odds imply zero
//! probability and unmatched inputs are skipped.

pub mod filter;
pub mod matcher;
pub mod odds;
pub mod scanner;
pub mod similarity;
pub mod types;

// Re-export main types for convenience
pub use filter::{DirectionFilter, SignalFilter};
pub use matcher::{CandidateMatch, EventMatch, MarketMatcher, MatchConfig, OutcomeMatch};
pub use odds::{fair_probabilities, implied_probability, overround};
pub use scanner::{rank_and_dedup, EdgeScanner, ScanReport, ScanSummary, SignalSummary};
pub use similarity::similarity;
pub use types::{
    Bookmaker, BookmakerMarket, EdgeDirection, EdgeSignal, MarketKey, MarketRecord, MatchPass,
    OddsEvent, Outcome, YES_OUTCOME,
};

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_public_api_exports() {
        let _ = EdgeScanner::new();
        let _ = MarketMatcher::new();
        let _ = MatchConfig::default();
        let _ = SignalFilter::default();
        let _ = DirectionFilter::default();
    }

    #[test]
    fn test_types_accessible() {
        let _ = MatchPass::Moneyline;
        let _ = MatchPass::Outright;
        let _ = EdgeDirection::PolyHigher;
        let _ = MarketKey::Outrights;
        assert_eq!(YES_OUTCOME, "Yes");
    }

    #[test]
    fn test_overview_example_numbers() {
        let fair = fair_probabilities(&[
            Outcome::new("Donald Trump", 1.8),
            Outcome::new("Kamala Harris", 2.1),
        ]);
        assert!((fair["Donald Trump"] - 0.5385).abs() < 1e-4);
        assert!((fair["Kamala Harris"] - 0.4615).abs() < 1e-4);
    }

    #[test]
    fn test_integration_scan_and_filter() {
        let records = vec![MarketRecord::new(
            "US Presidential Election Winner",
            vec!["Donald Trump".to_string(), "Kamala Harris".to_string()],
            vec![0.60, 0.40],
        )
        .with_liquidity(dec!(1000000))
        .with_days_to_end(20)];
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

        let filter = SignalFilter::default();
        let eligible = filter.eligible_records(&records);
        let report = EdgeScanner::new().run_scan(&eligible, &events);
        let signals = filter.apply(report.signals);

        assert_eq!(signals.len(), 2);
        assert!((signals[0].delta_pp().abs() - 6.15).abs() < 0.01);
    }
}
