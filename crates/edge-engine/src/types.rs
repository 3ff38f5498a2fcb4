//! Shared types for cross-source edge detection.
//!
//! This module defines the records the engine consumes from both sources
//! (prediction-market questions and bookmaker events) and the edge signals
//! it produces.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// =============================================================================
// Prediction Market Records
// =============================================================================

/// Outcome label that marks a binary Yes/No market.
pub const YES_OUTCOME: &str = "Yes";

/// A prediction-market proposition (source A).
///
/// Outcomes and probabilities are parallel sequences. Probabilities need not
/// sum to one: multi-outcome markets may price each outcome independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketRecord {
    /// Source identifier, when the upstream API provides one.
    #[serde(default)]
    pub id: Option<String>,

    /// Free-text question (e.g., "Will Keir Starmer be the next Prime Minister?").
    pub question: String,

    /// Ordered outcome labels, unique within the record.
    pub outcomes: Vec<String>,

    /// Ordered probabilities in [0, 1], one per outcome.
    pub probabilities: Vec<f64>,

    /// Market liquidity in USD.
    #[serde(default)]
    pub liquidity: Decimal,

    /// Lifetime traded volume in USD.
    #[serde(default)]
    pub volume: Decimal,

    /// Resolution date, when known.
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,

    /// Whole days until resolution, derived from `end_date` at parse time.
    #[serde(default)]
    pub days_to_end: Option<i64>,

    /// Canonical reference URL.
    #[serde(default)]
    pub url: String,
}

impl MarketRecord {
    /// Creates a record with zero liquidity and no resolution metadata.
    #[must_use]
    pub fn new(
        question: impl Into<String>,
        outcomes: Vec<String>,
        probabilities: Vec<f64>,
    ) -> Self {
        Self {
            id: None,
            question: question.into(),
            outcomes,
            probabilities,
            liquidity: Decimal::ZERO,
            volume: Decimal::ZERO,
            end_date: None,
            days_to_end: None,
            url: String::new(),
        }
    }

    /// Creates a binary Yes/No record from the Yes probability.
    #[must_use]
    pub fn binary(question: impl Into<String>, yes_probability: f64) -> Self {
        Self::new(
            question,
            vec![YES_OUTCOME.to_string(), "No".to_string()],
            vec![yes_probability, 1.0 - yes_probability],
        )
    }

    /// Sets the liquidity.
    #[must_use]
    pub fn with_liquidity(mut self, liquidity: Decimal) -> Self {
        self.liquidity = liquidity;
        self
    }

    /// Sets the volume.
    #[must_use]
    pub fn with_volume(mut self, volume: Decimal) -> Self {
        self.volume = volume;
        self
    }

    /// Sets the days until resolution.
    #[must_use]
    pub fn with_days_to_end(mut self, days: i64) -> Self {
        self.days_to_end = Some(days);
        self
    }

    /// Sets the resolution date and derives days-to-end relative to `now`.
    #[must_use]
    pub fn with_end_date(mut self, end_date: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        self.end_date = Some(end_date);
        self.days_to_end = Some((end_date - now).num_days());
        self
    }

    /// Sets the reference URL.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Iterates `(outcome, probability)` pairs.
    ///
    /// Indices without a counterpart in the other sequence are skipped.
    pub fn priced_outcomes(&self) -> impl Iterator<Item = (&str, f64)> {
        self.outcomes
            .iter()
            .zip(self.probabilities.iter())
            .map(|(outcome, prob)| (outcome.as_str(), *prob))
    }

    /// Returns the probability of the literal "Yes" outcome, if priced.
    #[must_use]
    pub fn yes_probability(&self) -> Option<f64> {
        let idx = self.outcomes.iter().position(|o| o == YES_OUTCOME)?;
        self.probabilities.get(idx).copied()
    }

    /// Returns true if outcome and probability sequences line up.
    #[must_use]
    pub fn is_aligned(&self) -> bool {
        self.outcomes.len() == self.probabilities.len()
    }
}

// =============================================================================
// Bookmaker Events
// =============================================================================

/// Bookmaker market type tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MarketKey {
    /// Two-way or multi-way moneyline ("h2h").
    H2h,
    /// Multi-candidate field ("outrights").
    Outrights,
    /// Any other market type; carried but ignored by the scanner.
    Other(String),
}

impl MarketKey {
    /// Returns the wire tag.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::H2h => "h2h",
            Self::Outrights => "outrights",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for MarketKey {
    fn from(s: String) -> Self {
        match s.as_str() {
            "h2h" => Self::H2h,
            "outrights" => Self::Outrights,
            _ => Self::Other(s),
        }
    }
}

impl From<&str> for MarketKey {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<MarketKey> for String {
    fn from(key: MarketKey) -> Self {
        key.as_str().to_string()
    }
}

impl std::fmt::Display for MarketKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single bookmaker quote: outcome name and decimal odds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    /// Runner, candidate, or side name.
    pub name: String,
    /// Decimal odds (> 1.0 for a valid quote).
    pub price: f64,
}

impl Outcome {
    /// Creates a new outcome quote.
    #[must_use]
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            price,
        }
    }
}

/// One market offered by a bookmaker for an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookmakerMarket {
    /// Market type tag.
    pub key: MarketKey,
    /// Ordered quotes.
    pub outcomes: Vec<Outcome>,
}

impl BookmakerMarket {
    /// Creates a new market.
    #[must_use]
    pub fn new(key: impl Into<MarketKey>, outcomes: Vec<Outcome>) -> Self {
        Self {
            key: key.into(),
            outcomes,
        }
    }
}

/// A bookmaker and the markets it quotes for one event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bookmaker {
    /// Machine key (e.g., "williamhill").
    #[serde(default)]
    pub key: String,
    /// Display name used in signals (e.g., "William Hill").
    pub title: String,
    /// Quoted markets.
    #[serde(default)]
    pub markets: Vec<BookmakerMarket>,
}

impl Bookmaker {
    /// Creates a bookmaker with the given display name.
    #[must_use]
    pub fn new(title: impl Into<String>, markets: Vec<BookmakerMarket>) -> Self {
        let title = title.into();
        Self {
            key: title.to_lowercase().replace(' ', "_"),
            title,
            markets,
        }
    }

    /// Iterates markets with the given tag.
    pub fn markets_of<'a>(&'a self, key: &'a MarketKey) -> impl Iterator<Item = &'a BookmakerMarket> {
        self.markets.iter().filter(move |m| &m.key == key)
    }
}

/// A bookmaker event (source B), identified only by free text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OddsEvent {
    /// Source identifier, when present.
    #[serde(default)]
    pub id: Option<String>,
    /// Market-type title (e.g., "UK General Election 2026 Winner").
    #[serde(default)]
    pub title: String,
    /// "Home" label (team, event, or market name).
    #[serde(default)]
    pub home: String,
    /// Optional "away" label.
    #[serde(default)]
    pub away: Option<String>,
    /// Bookmakers quoting this event.
    #[serde(default)]
    pub bookmakers: Vec<Bookmaker>,
}

impl OddsEvent {
    /// Creates an event with no bookmakers.
    #[must_use]
    pub fn new(title: impl Into<String>, home: impl Into<String>, away: Option<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            home: home.into(),
            away,
            bookmakers: Vec::new(),
        }
    }

    /// Adds a bookmaker.
    #[must_use]
    pub fn with_bookmaker(mut self, bookmaker: Bookmaker) -> Self {
        self.bookmakers.push(bookmaker);
        self
    }

    /// Returns the away label, or "" when absent.
    #[must_use]
    pub fn away_label(&self) -> &str {
        self.away.as_deref().unwrap_or("")
    }

    /// Title, home, and away joined by spaces, skipping empty fields.
    #[must_use]
    pub fn composite_text(&self) -> String {
        [self.title.as_str(), self.home.as_str(), self.away_label()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

// =============================================================================
// Edge Signals
// =============================================================================

/// Which matching pass produced a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPass {
    /// Event match followed by outcome match on "h2h" markets.
    Moneyline,
    /// Outright runner matched to a binary market.
    Outright,
}

impl MatchPass {
    /// Returns the display string.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Moneyline => "h2h",
            Self::Outright => "outright",
        }
    }
}

impl std::fmt::Display for MatchPass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Sign of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeDirection {
    /// Prediction market prices the outcome higher than the bookmaker.
    PolyHigher,
    /// Bookmaker prices the outcome higher than the prediction market.
    BookieHigher,
    /// No difference.
    Flat,
}

impl EdgeDirection {
    /// Returns the display string.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PolyHigher => "POLY > BOOKIE",
            Self::BookieHigher => "BOOKIE > POLY",
            Self::Flat => "FLAT",
        }
    }
}

impl std::fmt::Display for EdgeDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A probability gap between a prediction market and a bookmaker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeSignal {
    /// Prediction-market question.
    pub question: String,
    /// Prediction-market outcome label.
    pub outcome: String,
    /// Bookmaker display name.
    pub bookmaker: String,

    /// Prediction-market probability.
    pub poly_probability: f64,
    /// Bookmaker fair (margin-free) probability.
    pub bookie_probability: f64,
    /// Decimal odds the fair probability was derived from.
    pub decimal_odds: f64,
    /// `poly_probability - bookie_probability`, sign preserved.
    pub delta: f64,
    /// Match confidence for the pairing.
    pub match_score: f64,
    /// Pass that produced the signal.
    pub pass: MatchPass,

    // Pass-through metadata
    /// Prediction-market liquidity.
    pub liquidity: Decimal,
    /// Prediction-market volume.
    pub volume: Decimal,
    /// Days until resolution.
    pub days_to_end: Option<i64>,
    /// Prediction-market URL.
    pub url: String,
}

impl EdgeSignal {
    /// Returns the deduplication key `(question, outcome, bookmaker)`.
    #[must_use]
    pub fn key(&self) -> (&str, &str, &str) {
        (&self.question, &self.outcome, &self.bookmaker)
    }

    /// Returns the absolute edge.
    #[must_use]
    pub fn abs_delta(&self) -> f64 {
        self.delta.abs()
    }

    /// Returns the edge in percentage points.
    #[must_use]
    pub fn delta_pp(&self) -> f64 {
        self.delta * 100.0
    }

    /// Returns the sign of the edge.
    #[must_use]
    pub fn direction(&self) -> EdgeDirection {
        if self.delta > 0.0 {
            EdgeDirection::PolyHigher
        } else if self.delta < 0.0 {
            EdgeDirection::BookieHigher
        } else {
            EdgeDirection::Flat
        }
    }
}
