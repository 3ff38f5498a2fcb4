//! The Odds API response types.

use chrono::{DateTime, Utc};
use edge_scanner_engine::{Bookmaker, BookmakerMarket, OddsEvent, Outcome};
use serde::{Deserialize, Serialize};

/// A "sport" (market category) from `/sports`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sport {
    /// Sport key used in odds requests.
    pub key: String,
    /// Category group (e.g., "Politics").
    #[serde(default)]
    pub group: String,
    /// Display title.
    #[serde(default)]
    pub title: String,
    /// Whether the sport currently has markets.
    #[serde(default)]
    pub active: bool,
    /// Whether the sport offers outright markets.
    #[serde(default)]
    pub has_outrights: bool,
}

impl Sport {
    /// Returns true if this is an active political sport.
    #[must_use]
    pub fn is_active_politics(&self) -> bool {
        self.active && self.group == "Politics"
    }
}

/// Raw event from `/sports/{key}/odds`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawEvent {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub sport_key: Option<String>,
    #[serde(default)]
    pub sport_title: Option<String>,
    #[serde(default)]
    pub commence_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub home_team: Option<String>,
    #[serde(default)]
    pub away_team: Option<String>,
    #[serde(default)]
    pub bookmakers: Vec<RawBookmaker>,
}

/// Raw bookmaker entry.
#[derive(Debug, Clone, Deserialize)]
pub struct RawBookmaker {
    #[serde(default)]
    pub key: String,
    pub title: String,
    #[serde(default)]
    pub markets: Vec<RawMarket>,
}

/// Raw bookmaker market.
#[derive(Debug, Clone, Deserialize)]
pub struct RawMarket {
    pub key: String,
    #[serde(default)]
    pub outcomes: Vec<RawOutcome>,
}

/// Raw outcome quote.
#[derive(Debug, Clone, Deserialize)]
pub struct RawOutcome {
    pub name: String,
    /// Decimal odds; absent prices become 0.0 and imply zero probability.
    #[serde(default)]
    pub price: f64,
}

impl From<RawEvent> for OddsEvent {
    fn from(raw: RawEvent) -> Self {
        let mut event = OddsEvent::new(
            raw.sport_title.unwrap_or_default(),
            raw.home_team.unwrap_or_default(),
            raw.away_team.filter(|a| !a.is_empty()),
        );
        event.id = raw.id;
        event.bookmakers = raw.bookmakers.into_iter().map(Bookmaker::from).collect();
        event
    }
}

impl From<RawBookmaker> for Bookmaker {
    fn from(raw: RawBookmaker) -> Self {
        let mut bookmaker = Bookmaker::new(
            raw.title,
            raw.markets.into_iter().map(BookmakerMarket::from).collect(),
        );
        if !raw.key.is_empty() {
            bookmaker.key = raw.key;
        }
        bookmaker
    }
}

impl From<RawMarket> for BookmakerMarket {
    fn from(raw: RawMarket) -> Self {
        BookmakerMarket::new(
            raw.key,
            raw.outcomes
                .into_iter()
                .map(|o| Outcome::new(o.name, o.price))
                .collect(),
        )
    }
}
