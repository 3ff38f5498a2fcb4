//! Cross-source market matching.
//!
//! The two sources share no identifiers, so every pairing here is a
//! best-of-N linear scan over free-text similarity:
//!
//! - [`MarketMatcher::find_best_event`] pairs a prediction-market question
//!   with a bookmaker event.
//! - [`MarketMatcher::find_matching_outcome`] pairs an outcome label with a
//!   bookmaker quote inside a matched event.
//! - [`MarketMatcher::find_poly_for_candidate`] pairs an outright runner
//!   with a binary Yes/No question.
//!
//! Ties always keep the first candidate found, so results depend on input order.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::similarity::{name_tokens, normalize_name, similarity};
use crate::types::{MarketRecord, OddsEvent, Outcome};

// =============================================================================
// Match Configuration
// =============================================================================

/// Thresholds and weights for market matching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Minimum score for an event pairing.
    pub event_threshold: f64,

    /// Bonus added when a record outcome label appears inside the event text.
    pub candidate_bonus: f64,

    /// Outcome labels must be longer than this (in characters) to earn the bonus.
    pub bonus_min_label_chars: usize,

    /// Minimum score for an outcome pairing (Yes/No labels bypass it).
    pub outcome_threshold: f64,

    /// Minimum score for an outright-runner pairing.
    pub outright_threshold: f64,

    /// Confidence attached to every outright pairing.
    pub outright_confidence: f64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            event_threshold: 0.28,
            candidate_bonus: 0.12,
            bonus_min_label_chars: 3,
            outcome_threshold: 0.38,
            outright_threshold: 0.40,
            outright_confidence: 0.9,
        }
    }
}

impl MatchConfig {
    /// Sets the event threshold.
    #[must_use]
    pub fn with_event_threshold(mut self, threshold: f64) -> Self {
        self.event_threshold = threshold;
        self
    }

    /// Sets the outcome threshold.
    #[must_use]
    pub fn with_outcome_threshold(mut self, threshold: f64) -> Self {
        self.outcome_threshold = threshold;
        self
    }

    /// Sets the outright threshold.
    #[must_use]
    pub fn with_outright_threshold(mut self, threshold: f64) -> Self {
        self.outright_threshold = threshold;
        self
    }
}

// =============================================================================
// Match Results
// =============================================================================

/// A bookmaker event paired with a prediction-market record.
#[derive(Debug, Clone, Copy)]
pub struct EventMatch<'a> {
    /// The best-scoring event.
    pub event: &'a OddsEvent,
    /// Its score, including any candidate bonus.
    pub score: f64,
}

/// A bookmaker quote paired with a prediction-market outcome label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutcomeMatch<'a> {
    /// Bookmaker outcome name.
    pub name: &'a str,
    /// Decimal odds of that outcome.
    pub price: f64,
}

/// A binary prediction market paired with an outright runner.
#[derive(Debug, Clone, Copy)]
pub struct CandidateMatch<'a> {
    /// The matched binary market.
    pub record: &'a MarketRecord,
    /// Its "Yes" probability.
    pub probability: f64,
    /// Token-overlap or fuzzy score, whichever is higher.
    pub score: f64,
}

// =============================================================================
// Market Matcher
// =============================================================================

/// Matches prediction-market records against bookmaker events.
#[derive(Debug, Clone, Default)]
pub struct MarketMatcher {
    config: MatchConfig,
}

impl MarketMatcher {
    /// Creates a matcher with default thresholds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a matcher with custom thresholds.
    #[must_use]
    pub fn with_config(config: MatchConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Scores one event against a record.
    ///
    /// The best of question-vs-composite, -home, -away and -title similarity,
    /// plus the candidate bonus when an outcome label longer than the minimum
    /// appears inside the composite text.
    #[must_use]
    pub fn score_event(&self, record: &MarketRecord, event: &OddsEvent) -> f64 {
        let question = record.question.as_str();
        let text = event.composite_text();

        let mut score = similarity(question, &text)
            .max(similarity(question, &event.home))
            .max(similarity(question, event.away_label()))
            .max(similarity(question, &event.title));

        let text_lower = text.to_lowercase();
        let named = record.outcomes.iter().any(|o| {
            o.chars().count() > self.config.bonus_min_label_chars
                && text_lower.contains(&o.to_lowercase())
        });
        if named {
            score += self.config.candidate_bonus;
        }

        score
    }

    /// Finds the bookmaker event that best matches a record.
    ///
    /// Returns `None` when the best score is below the event threshold. The
    /// same event may be returned for any number of records.
    #[must_use]
    pub fn find_best_event<'a>(
        &self,
        record: &MarketRecord,
        events: &'a [OddsEvent],
    ) -> Option<EventMatch<'a>> {
        let mut best: Option<&OddsEvent> = None;
        let mut best_score = 0.0;

        for event in events {
            let score = self.score_event(record, event);
            if score > best_score {
                best_score = score;
                best = Some(event);
            }
        }

        match best {
            Some(event) if best_score >= self.config.event_threshold => {
                debug!(
                    question = %record.question,
                    event = %event.composite_text(),
                    score = best_score,
                    "Event match found"
                );
                Some(EventMatch {
                    event,
                    score: best_score,
                })
            }
            _ => {
                trace!(
                    question = %record.question,
                    best_score,
                    threshold = self.config.event_threshold,
                    "No event above threshold"
                );
                None
            }
        }
    }

    /// Pairs a prediction-market outcome label with a bookmaker quote.
    ///
    /// "Yes"/"No" labels bypass the outcome threshold but still need a
    /// non-zero best match.
    #[must_use]
    pub fn find_matching_outcome<'a>(
        &self,
        label: &str,
        outcomes: &'a [Outcome],
    ) -> Option<OutcomeMatch<'a>> {
        let mut best_name: Option<&str> = None;
        let mut best_score = 0.0;

        for outcome in outcomes {
            let score = similarity(label, &outcome.name);
            if score > best_score {
                best_score = score;
                best_name = Some(outcome.name.as_str());
            }
        }

        let binary = label.eq_ignore_ascii_case("yes") || label.eq_ignore_ascii_case("no");
        if best_score < self.config.outcome_threshold && !binary {
            return None;
        }

        let name = best_name.filter(|n| !n.is_empty())?;
        let price = outcomes.iter().find(|o| o.name == name)?.price;

        Some(OutcomeMatch { name, price })
    }

    /// Finds the binary Yes/No record that best matches an outright runner.
    ///
    /// Each record scores the higher of (a) the share of the runner's name
    /// tokens found in its normalized question and (b) fuzzy similarity of the
    /// normalized strings. Only records with a priced "Yes" outcome compete.
    #[must_use]
    pub fn find_poly_for_candidate<'a>(
        &self,
        candidate: &str,
        records: &'a [MarketRecord],
    ) -> Option<CandidateMatch<'a>> {
        let candidate_clean = normalize_name(candidate);
        let tokens = name_tokens(&candidate_clean);

        let mut best: Option<CandidateMatch<'a>> = None;

        for record in records {
            let question_clean = normalize_name(&record.question);

            let part_ratio = if tokens.is_empty() {
                0.0
            } else {
                let hits = tokens
                    .iter()
                    .filter(|t| question_clean.contains(**t))
                    .count();
                hits as f64 / tokens.len() as f64
            };
            let fuzz = similarity(&candidate_clean, &question_clean);
            let score = part_ratio.max(fuzz);

            let best_score = best.map_or(0.0, |b| b.score);
            if score <= best_score {
                continue;
            }
            if let Some(probability) = record.yes_probability() {
                best = Some(CandidateMatch {
                    record,
                    probability,
                    score,
                });
            }
        }

        let matched = best.filter(|b| b.score >= self.config.outright_threshold)?;
        debug!(
            candidate,
            question = %matched.record.question,
            score = matched.score,
            "Outright candidate matched"
        );
        Some(matched)
    }
}
