//! Caller-side filters applied around a scan.
//!
//! Records are narrowed before matching ([`SignalFilter::eligible_records`])
//! and signals after ranking ([`SignalFilter::apply`]). Both preserve input
//! order, so a filtered scan stays ranked.

use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::{EdgeSignal, MarketRecord};

/// Which sign of edge to keep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectionFilter {
    /// Keep every signal.
    #[default]
    Both,
    /// Keep signals where the prediction market prices higher (delta > 0).
    PolyHigher,
    /// Keep signals where the bookmaker prices higher (delta < 0).
    BookieHigher,
}

impl DirectionFilter {
    /// Returns true if a delta passes this filter.
    #[must_use]
    pub fn accepts(self, delta: f64) -> bool {
        match self {
            Self::Both => true,
            Self::PolyHigher => delta > 0.0,
            Self::BookieHigher => delta < 0.0,
        }
    }
}

impl FromStr for DirectionFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "both" => Ok(Self::Both),
            "poly" | "poly_higher" => Ok(Self::PolyHigher),
            "bookie" | "bookie_higher" => Ok(Self::BookieHigher),
            other => Err(format!(
                "unknown direction '{other}' (expected both, poly or bookie)"
            )),
        }
    }
}

/// Liquidity, horizon, magnitude and direction filters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalFilter {
    /// Minimum record liquidity in USD.
    pub min_liquidity: Decimal,

    /// Maximum days until resolution; `None` accepts any horizon.
    pub max_days_to_end: Option<i64>,

    /// Minimum |delta| as a probability (0.05 = 5pp).
    pub min_abs_delta: f64,

    /// Edge direction to keep.
    pub direction: DirectionFilter,
}

impl Default for SignalFilter {
    fn default() -> Self {
        Self {
            min_liquidity: dec!(50000),
            max_days_to_end: Some(30),
            min_abs_delta: 0.05,
            direction: DirectionFilter::Both,
        }
    }
}

impl SignalFilter {
    /// A filter that keeps everything.
    #[must_use]
    pub fn permissive() -> Self {
        Self {
            min_liquidity: Decimal::ZERO,
            max_days_to_end: None,
            min_abs_delta: 0.0,
            direction: DirectionFilter::Both,
        }
    }

    /// Sets the minimum liquidity.
    #[must_use]
    pub fn with_min_liquidity(mut self, min_liquidity: Decimal) -> Self {
        self.min_liquidity = min_liquidity;
        self
    }

    /// Sets the maximum days to resolution.
    #[must_use]
    pub fn with_max_days_to_end(mut self, max_days: Option<i64>) -> Self {
        self.max_days_to_end = max_days;
        self
    }

    /// Sets the minimum |delta|.
    #[must_use]
    pub fn with_min_abs_delta(mut self, min_abs_delta: f64) -> Self {
        self.min_abs_delta = min_abs_delta;
        self
    }

    /// Sets the direction.
    #[must_use]
    pub fn with_direction(mut self, direction: DirectionFilter) -> Self {
        self.direction = direction;
        self
    }

    /// Returns true if a record passes the liquidity and horizon checks.
    ///
    /// With a horizon set, records without a resolution date are rejected,
    /// as are records that have already passed it.
    #[must_use]
    pub fn is_eligible(&self, record: &MarketRecord) -> bool {
        if record.liquidity < self.min_liquidity {
            return false;
        }
        match self.max_days_to_end {
            None => true,
            Some(max) => matches!(record.days_to_end, Some(d) if (0..=max).contains(&d)),
        }
    }

    /// Records that pass [`Self::is_eligible`], in input order.
    #[must_use]
    pub fn eligible_records(&self, records: &[MarketRecord]) -> Vec<MarketRecord> {
        let eligible: Vec<MarketRecord> = records
            .iter()
            .filter(|r| self.is_eligible(r))
            .cloned()
            .collect();

        debug!(
            total = records.len(),
            eligible = eligible.len(),
            min_liquidity = %self.min_liquidity,
            max_days = ?self.max_days_to_end,
            "Filtered records"
        );
        eligible
    }

    /// Returns true if a signal passes the magnitude and direction checks.
    #[must_use]
    pub fn accepts(&self, signal: &EdgeSignal) -> bool {
        signal.abs_delta() >= self.min_abs_delta && self.direction.accepts(signal.delta)
    }

    /// Signals that pass [`Self::accepts`], in input order.
    #[must_use]
    pub fn apply(&self, signals: Vec<EdgeSignal>) -> Vec<EdgeSignal> {
        signals.into_iter().filter(|s| self.accepts(s)).collect()
    }
}
