//! Edge aggregation across both matching passes.
//!
//! A scan runs two independent passes over immutable inputs:
//!
//! ```text
//! Pass 1 (moneyline): record --find_best_event--> event
//!                     --h2h markets--> fair probabilities
//!                     --find_matching_outcome--> EdgeSignal per outcome
//!
//! Pass 2 (outrights): event --outrights markets--> fair probabilities
//!                     --find_poly_for_candidate--> EdgeSignal per runner
//! ```
//!
//! All signals are then ranked by |delta| and deduplicated on
//! `(question, outcome, bookmaker)`, keeping the largest.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::matcher::{MarketMatcher, MatchConfig};
use crate::odds::{fair_probabilities, overround};
use crate::types::{EdgeSignal, MarketKey, MarketRecord, MatchPass, OddsEvent, YES_OUTCOME};

// =============================================================================
// Scan Report
// =============================================================================

/// Result of one scan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanReport {
    /// Ranked, deduplicated signals.
    pub signals: Vec<EdgeSignal>,
    /// Records offered to the scan.
    pub records_scanned: usize,
    /// Events offered to the scan.
    pub events_scanned: usize,
    /// Records with no event above the match threshold.
    pub unmatched: usize,
    /// Signals dropped as lower-|delta| duplicates.
    pub duplicates_dropped: usize,
}

impl ScanReport {
    /// Returns a summary for logging and display.
    #[must_use]
    pub fn summary(&self) -> ScanSummary {
        ScanSummary {
            records_scanned: self.records_scanned,
            events_scanned: self.events_scanned,
            unmatched: self.unmatched,
            moneyline_signals: self
                .signals
                .iter()
                .filter(|s| s.pass == MatchPass::Moneyline)
                .count(),
            outright_signals: self
                .signals
                .iter()
                .filter(|s| s.pass == MatchPass::Outright)
                .count(),
            best_signal: self.signals.first().map(SignalSummary::from),
        }
    }
}

/// Counts and best signal of a scan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanSummary {
    /// Records offered to the scan.
    pub records_scanned: usize,
    /// Events offered to the scan.
    pub events_scanned: usize,
    /// Records with no matching event.
    pub unmatched: usize,
    /// Signals from the moneyline pass.
    pub moneyline_signals: usize,
    /// Signals from the outright pass.
    pub outright_signals: usize,
    /// Largest |delta| signal, if any.
    pub best_signal: Option<SignalSummary>,
}

/// Summary of a single signal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalSummary {
    /// Prediction-market question.
    pub question: String,
    /// Outcome label.
    pub outcome: String,
    /// Bookmaker name.
    pub bookmaker: String,
    /// Edge in percentage points.
    pub delta_pp: f64,
}

impl From<&EdgeSignal> for SignalSummary {
    fn from(signal: &EdgeSignal) -> Self {
        Self {
            question: signal.question.clone(),
            outcome: signal.outcome.clone(),
            bookmaker: signal.bookmaker.clone(),
            delta_pp: signal.delta_pp(),
        }
    }
}

// =============================================================================
// Edge Scanner
// =============================================================================

/// Runs both matching passes and ranks the resulting edges.
#[derive(Debug, Clone, Default)]
pub struct EdgeScanner {
    matcher: MarketMatcher,
}

impl EdgeScanner {
    /// Creates a scanner with default match thresholds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a scanner with custom match thresholds.
    #[must_use]
    pub fn with_config(config: MatchConfig) -> Self {
        Self {
            matcher: MarketMatcher::with_config(config),
        }
    }

    /// Returns the matcher.
    #[must_use]
    pub fn matcher(&self) -> &MarketMatcher {
        &self.matcher
    }

    /// Scans already-fetched records and events for edges.
    ///
    /// Records are expected to be pre-filtered by the caller; no liquidity,
    /// delta or direction filter is applied here. Identical inputs always
    /// produce identical, identically ordered output.
    #[must_use]
    pub fn run_scan(&self, records: &[MarketRecord], events: &[OddsEvent]) -> ScanReport {
        let mut signals = Vec::new();

        let unmatched = self.moneyline_pass(records, events, &mut signals);
        let moneyline_count = signals.len();
        self.outright_pass(records, events, &mut signals);

        debug!(
            moneyline = moneyline_count,
            outright = signals.len() - moneyline_count,
            "Matching passes complete"
        );

        let (signals, duplicates_dropped) = rank_and_dedup(signals);

        info!(
            records = records.len(),
            events = events.len(),
            unmatched,
            signals = signals.len(),
            duplicates_dropped,
            "Edge scan complete"
        );

        ScanReport {
            signals,
            records_scanned: records.len(),
            events_scanned: events.len(),
            unmatched,
            duplicates_dropped,
        }
    }

    /// Pass 1: event match, then outcome match inside every "h2h" market.
    ///
    /// Returns the number of records with no matching event.
    fn moneyline_pass(
        &self,
        records: &[MarketRecord],
        events: &[OddsEvent],
        signals: &mut Vec<EdgeSignal>,
    ) -> usize {
        let mut unmatched = 0;

        for record in records {
            let Some(matched) = self.matcher.find_best_event(record, events) else {
                unmatched += 1;
                continue;
            };
            if !record.is_aligned() {
                trace!(
                    question = %record.question,
                    outcomes = record.outcomes.len(),
                    probabilities = record.probabilities.len(),
                    "Misaligned record, pricing paired outcomes only"
                );
            }

            for bookmaker in &matched.event.bookmakers {
                for market in bookmaker.markets_of(&MarketKey::H2h) {
                    let fair = fair_probabilities(&market.outcomes);
                    trace!(
                        bookmaker = %bookmaker.title,
                        overround = overround(&market.outcomes),
                        "Normalized h2h market"
                    );

                    for (label, poly_probability) in record.priced_outcomes() {
                        let Some(quote) =
                            self.matcher.find_matching_outcome(label, &market.outcomes)
                        else {
                            continue;
                        };
                        if quote.price == 0.0 {
                            continue;
                        }

                        let bookie_probability = fair.get(quote.name).copied().unwrap_or(0.0);
                        signals.push(EdgeSignal {
                            question: record.question.clone(),
                            outcome: label.to_string(),
                            bookmaker: bookmaker.title.clone(),
                            poly_probability,
                            bookie_probability,
                            decimal_odds: quote.price,
                            delta: poly_probability - bookie_probability,
                            match_score: matched.score,
                            pass: MatchPass::Moneyline,
                            liquidity: record.liquidity,
                            volume: record.volume,
                            days_to_end: record.days_to_end,
                            url: record.url.clone(),
                        });
                    }
                }
            }
        }

        unmatched
    }

    /// Pass 2: every runner of every "outrights" market against binary records.
    fn outright_pass(
        &self,
        records: &[MarketRecord],
        events: &[OddsEvent],
        signals: &mut Vec<EdgeSignal>,
    ) {
        let confidence = self.matcher.config().outright_confidence;

        for event in events {
            for bookmaker in &event.bookmakers {
                for market in bookmaker.markets_of(&MarketKey::Outrights) {
                    let fair = fair_probabilities(&market.outcomes);

                    for runner in &market.outcomes {
                        let bookie_probability = fair.get(&runner.name).copied().unwrap_or(0.0);
                        let Some(matched) =
                            self.matcher.find_poly_for_candidate(&runner.name, records)
                        else {
                            continue;
                        };

                        let record = matched.record;
                        signals.push(EdgeSignal {
                            question: record.question.clone(),
                            outcome: YES_OUTCOME.to_string(),
                            bookmaker: bookmaker.title.clone(),
                            poly_probability: matched.probability,
                            bookie_probability,
                            decimal_odds: runner.price,
                            delta: matched.probability - bookie_probability,
                            match_score: confidence,
                            pass: MatchPass::Outright,
                            liquidity: record.liquidity,
                            volume: record.volume,
                            days_to_end: record.days_to_end,
                            url: record.url.clone(),
                        });
                    }
                }
            }
        }
    }
}

/// Sorts by descending |delta| (stable) and keeps the first signal per key.
///
/// Returns the surviving signals and the number dropped.
#[must_use]
pub fn rank_and_dedup(mut signals: Vec<EdgeSignal>) -> (Vec<EdgeSignal>, usize) {
    signals.sort_by(|a, b| b.abs_delta().total_cmp(&a.abs_delta()));

    let before = signals.len();
    let mut seen = HashSet::new();
    signals.retain(|s| {
        seen.insert((
            s.question.clone(),
            s.outcome.clone(),
            s.bookmaker.clone(),
        ))
    });

    let dropped = before - signals.len();
    (signals, dropped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Bookmaker, BookmakerMarket, Outcome};
    use rust_decimal_macros::dec;

    // ==================== Helper Functions ====================

    fn signal(question: &str, outcome: &str, bookmaker: &str, delta: f64) -> EdgeSignal {
        EdgeSignal {
            question: question.to_string(),
            outcome: outcome.to_string(),
            bookmaker: bookmaker.to_string(),
            poly_probability: 0.5 + delta,
            bookie_probability: 0.5,
            decimal_odds: 2.0,
            delta,
            match_score: 0.5,
            pass: MatchPass::Moneyline,
            liquidity: dec!(1000),
            volume: dec!(1000),
            days_to_end: None,
            url: String::new(),
        }
    }

    fn h2h_event() -> OddsEvent {
        OddsEvent::new(
            "US Presidential Election Winner",
            "Donald Trump",
            Some("Kamala Harris".to_string()),
        )
        .with_bookmaker(Bookmaker::new(
            "Bet365",
            vec![BookmakerMarket::new(
                "h2h",
                vec![
                    Outcome::new("Donald Trump", 1.8),
                    Outcome::new("Kamala Harris", 2.1),
                ],
            )],
        ))
    }

    fn outright_event() -> OddsEvent {
        OddsEvent::new("Politics", "Next UK Prime Minister", None).with_bookmaker(
            Bookmaker::new(
                "William Hill",
                vec![BookmakerMarket::new(
                    "outrights",
                    vec![
                        Outcome::new("Keir Starmer", 1.5),
                        Outcome::new("Kemi Badenoch", 4.0),
                        Outcome::new("Nigel Farage", 8.0),
                    ],
                )],
            ),
        )
    }

    // ==================== Ranking / Dedup Tests ====================

    #[test]
    fn test_rank_sorts_by_abs_delta() {
        let (ranked, dropped) = rank_and_dedup(vec![
            signal("A", "Yes", "B1", 0.02),
            signal("B", "Yes", "B1", -0.10),
            signal("C", "Yes", "B1", 0.05),
        ]);

        assert_eq!(dropped, 0);
        let questions: Vec<_> = ranked.iter().map(|s| s.question.as_str()).collect();
        assert_eq!(questions, vec!["B", "C", "A"]);
    }

    #[test]
    fn test_dedup_keeps_highest_abs_delta() {
        let (ranked, dropped) = rank_and_dedup(vec![
            signal("Q", "Yes", "Bet365", 0.03),
            signal("Q", "Yes", "Bet365", -0.09),
            signal("Q", "Yes", "Betfair", 0.01),
        ]);

        assert_eq!(dropped, 1);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].bookmaker, "Bet365");
        assert!((ranked[0].delta + 0.09).abs() < 1e-12);
        assert_eq!(ranked[1].bookmaker, "Betfair");
    }

    #[test]
    fn test_rank_is_stable_for_equal_magnitudes() {
        let (ranked, _) = rank_and_dedup(vec![
            signal("first", "Yes", "B", 0.05),
            signal("second", "Yes", "B", -0.05),
        ]);

        assert_eq!(ranked[0].question, "first");
        assert_eq!(ranked[1].question, "second");
    }

    // ==================== Pass 1 Tests ====================

    #[test]
    fn test_moneyline_pass_emits_signal_per_outcome() {
        let scanner = EdgeScanner::new();
        let records = vec![MarketRecord::new(
            "US Presidential Election Winner",
            vec!["Donald Trump".to_string(), "Kamala Harris".to_string()],
            vec![0.60, 0.40],
        )
        .with_liquidity(dec!(250000))];
        let events = vec![h2h_event()];

        let report = scanner.run_scan(&records, &events);

        assert_eq!(report.unmatched, 0);
        assert_eq!(report.signals.len(), 2);

        let trump = report
            .signals
            .iter()
            .find(|s| s.outcome == "Donald Trump")
            .unwrap();
        let fair = (1.0 / 1.8) / (1.0 / 1.8 + 1.0 / 2.1);
        assert!((trump.bookie_probability - fair).abs() < 1e-9);
        assert!((trump.delta - (0.60 - fair)).abs() < 1e-9);
        assert_eq!(trump.decimal_odds, 1.8);
        assert_eq!(trump.bookmaker, "Bet365");
        assert_eq!(trump.pass, MatchPass::Moneyline);
        assert_eq!(trump.liquidity, dec!(250000));
        assert!(trump.match_score >= 0.28);
    }

    #[test]
    fn test_unmatched_records_are_counted() {
        let scanner = EdgeScanner::new();
        let records = vec![MarketRecord::binary("zzzz qqqq", 0.5)];
        let events = vec![h2h_event()];

        let report = scanner.run_scan(&records, &events);
        assert_eq!(report.unmatched, 1);
        assert!(report.signals.is_empty());
    }

    #[test]
    fn test_moneyline_skips_zero_odds() {
        let scanner = EdgeScanner::new();
        let event = OddsEvent::new("US Presidential Election Winner", "", None).with_bookmaker(
            Bookmaker::new(
                "Bet365",
                vec![BookmakerMarket::new(
                    "h2h",
                    vec![Outcome::new("Donald Trump", 0.0)],
                )],
            ),
        );
        let records = vec![MarketRecord::new(
            "US Presidential Election Winner",
            vec!["Donald Trump".to_string()],
            vec![0.6],
        )];

        let report = scanner.run_scan(&records, &[event]);
        assert!(report.signals.is_empty());
    }

    #[test]
    fn test_mismatched_lengths_do_not_crash() {
        let scanner = EdgeScanner::new();
        let records = vec![MarketRecord::new(
            "US Presidential Election Winner",
            vec![
                "Donald Trump".to_string(),
                "Kamala Harris".to_string(),
                "Other".to_string(),
            ],
            vec![0.6],
        )];

        let report = scanner.run_scan(&records, &[h2h_event()]);
        assert_eq!(report.signals.len(), 1);
        assert_eq!(report.signals[0].outcome, "Donald Trump");
    }

    // ==================== Pass 2 Tests ====================

    #[test]
    fn test_outright_pass_matches_binary_markets() {
        let scanner = EdgeScanner::new();
        let records = vec![
            MarketRecord::binary("Will Keir Starmer be the next Prime Minister?", 0.62)
                .with_days_to_end(20),
            MarketRecord::binary("Will Kemi Badenoch be the next Prime Minister?", 0.15),
        ];
        let events = vec![outright_event()];

        let report = scanner.run_scan(&records, &events);
        let outrights: Vec<_> = report
            .signals
            .iter()
            .filter(|s| s.pass == MatchPass::Outright)
            .collect();
        assert_eq!(outrights.len(), 2);

        let starmer = outrights
            .iter()
            .find(|s| s.question.contains("Starmer"))
            .unwrap();
        let total = 1.0 / 1.5 + 1.0 / 4.0 + 1.0 / 8.0;
        let fair = (1.0 / 1.5) / total;
        assert_eq!(starmer.outcome, "Yes");
        assert!((starmer.bookie_probability - fair).abs() < 1e-9);
        assert!((starmer.delta - (0.62 - fair)).abs() < 1e-9);
        assert_eq!(starmer.decimal_odds, 1.5);
        assert!((starmer.match_score - 0.9).abs() < 1e-12);
        assert_eq!(starmer.days_to_end, Some(20));
    }

    #[test]
    fn test_outright_pass_ignores_h2h_markets() {
        let scanner = EdgeScanner::new();
        let records = vec![MarketRecord::binary(
            "Will Donald Trump win the election?",
            0.55,
        )];
        // Event text shares nothing with the question, so pass 1 cannot match it.
        let event = OddsEvent::new("zz", "qq", None).with_bookmaker(Bookmaker::new(
            "Bet365",
            vec![BookmakerMarket::new(
                "h2h",
                vec![Outcome::new("Donald Trump", 1.8)],
            )],
        ));

        let report = scanner.run_scan(&records, &[event]);
        assert!(report.signals.is_empty());
    }

    // ==================== Whole-Scan Tests ====================

    #[test]
    fn test_run_scan_is_idempotent() {
        let scanner = EdgeScanner::new();
        let records = vec![
            MarketRecord::new(
                "US Presidential Election Winner",
                vec!["Donald Trump".to_string(), "Kamala Harris".to_string()],
                vec![0.60, 0.40],
            ),
            MarketRecord::binary("Will Keir Starmer be the next Prime Minister?", 0.62),
        ];
        let events = vec![h2h_event(), outright_event()];

        let first = scanner.run_scan(&records, &events);
        let second = scanner.run_scan(&records, &events);

        assert_eq!(first.signals, second.signals);
        assert_eq!(first.unmatched, second.unmatched);
    }

    #[test]
    fn test_run_scan_stable_over_many_runner_market() {
        let scanner = EdgeScanner::new();
        let records = vec![MarketRecord::new(
            "2028 Republican Presidential Nominee",
            vec![
                "JD Vance".to_string(),
                "Marco Rubio".to_string(),
                "Donald Trump Jr.".to_string(),
                "Ron DeSantis".to_string(),
            ],
            vec![0.52, 0.11, 0.07, 0.04],
        )];
        let events = vec![OddsEvent::new(
            "2028 Republican Presidential Nominee",
            "JD Vance",
            Some("Marco Rubio".to_string()),
        )
        .with_bookmaker(Bookmaker::new(
            "Paddy Power",
            vec![BookmakerMarket::new(
                "h2h",
                vec![
                    Outcome::new("JD Vance", 1.37),
                    Outcome::new("Marco Rubio", 7.3),
                    Outcome::new("Donald Trump Jr.", 13.0),
                    Outcome::new("Ron DeSantis", 26.0),
                    Outcome::new("Tucker Carlson", 51.0),
                    Outcome::new("Vivek Ramaswamy", 101.0),
                    Outcome::new("Glenn Youngkin", 2.9),
                ],
            )],
        ))];

        let first = scanner.run_scan(&records, &events);
        assert_eq!(first.signals.len(), 4);

        for _ in 0..300 {
            let again = scanner.run_scan(&records, &events);
            assert_eq!(again.signals, first.signals);
            for (a, b) in again.signals.iter().zip(&first.signals) {
                assert_eq!(a.delta.to_bits(), b.delta.to_bits());
                assert_eq!(a.bookie_probability.to_bits(), b.bookie_probability.to_bits());
            }
        }
    }

    #[test]
    fn test_run_scan_output_has_unique_keys() {
        let scanner = EdgeScanner::new();
        let records = vec![MarketRecord::binary(
            "Will Keir Starmer be the next Prime Minister?",
            0.62,
        )];
        // The same bookmaker quoting the field twice yields duplicate keys.
        let events = vec![outright_event(), outright_event()];

        let report = scanner.run_scan(&records, &events);
        let mut keys: Vec<_> = report.signals.iter().map(EdgeSignal::key).collect();
        let total = keys.len();
        keys.sort();
        keys.dedup();

        assert_eq!(keys.len(), total);
        assert!(report.duplicates_dropped > 0);
    }

    #[test]
    fn test_run_scan_empty_inputs() {
        let report = EdgeScanner::new().run_scan(&[], &[]);
        assert!(report.signals.is_empty());
        assert_eq!(report.unmatched, 0);
        assert!(report.summary().best_signal.is_none());
    }

    #[test]
    fn test_summary_counts_passes() {
        let scanner = EdgeScanner::new();
        let records = vec![
            MarketRecord::new(
                "US Presidential Election Winner",
                vec!["Donald Trump".to_string(), "Kamala Harris".to_string()],
                vec![0.60, 0.40],
            ),
            MarketRecord::binary("Will Keir Starmer be the next Prime Minister?", 0.62),
        ];
        let events = vec![h2h_event(), outright_event()];

        let report = scanner.run_scan(&records, &events);
        let summary = report.summary();

        assert_eq!(
            summary.moneyline_signals + summary.outright_signals,
            report.signals.len()
        );
        assert!(summary.outright_signals >= 1);
        let best = summary.best_signal.unwrap();
        assert!((best.delta_pp - report.signals[0].delta_pp()).abs() < 1e-12);
    }
}
