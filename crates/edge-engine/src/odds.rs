//! Bookmaker odds conversion.
//!
//! Converts decimal odds into implied probabilities and strips the bookmaker
//! margin (overround) so that a market's probabilities sum to one.

use std::collections::HashMap;

use crate::types::Outcome;

/// Raw implied probability of decimal odds.
///
/// Prices at or below 1.0 are not valid quotes and imply zero.
#[must_use]
pub fn implied_probability(price: f64) -> f64 {
    if price > 1.0 {
        1.0 / price
    } else {
        0.0
    }
}

/// Implied probabilities in first-seen name order; a repeated name
/// overwrites the earlier quote in place.
fn raw_probabilities(outcomes: &[Outcome]) -> Vec<(String, f64)> {
    let mut raw: Vec<(String, f64)> = Vec::with_capacity(outcomes.len());
    for outcome in outcomes {
        let p = implied_probability(outcome.price);
        match raw.iter_mut().find(|(name, _)| *name == outcome.name) {
            Some(entry) => entry.1 = p,
            None => raw.push((outcome.name.clone(), p)),
        }
    }
    raw
}

fn raw_total(raw: &[(String, f64)]) -> f64 {
    raw.iter().map(|(_, p)| p).sum()
}

/// Fair (margin-free) probabilities for one bookmaker market.
///
/// Each raw implied probability is divided by the market total. When no
/// outcome carries a valid price the all-zero raw mapping is returned as is.
/// Repeated names keep the last quote.
#[must_use]
pub fn fair_probabilities(outcomes: &[Outcome]) -> HashMap<String, f64> {
    let raw = raw_probabilities(outcomes);
    let total = raw_total(&raw);

    if total > 0.0 {
        raw.into_iter().map(|(name, p)| (name, p / total)).collect()
    } else {
        raw.into_iter().collect()
    }
}

/// Bookmaker margin: sum of raw implied probabilities minus one.
///
/// Negative when the market is under-round or has invalid prices.
#[must_use]
pub fn overround(outcomes: &[Outcome]) -> f64 {
    raw_total(&raw_probabilities(outcomes)) - 1.0
}
