//! Gamma API response models.
//!
//! Gamma encodes several list and number fields inconsistently: `outcomes`
//! and `outcomePrices` arrive either as JSON arrays or as strings holding a
//! JSON array, and prices, liquidity and volume as strings or numbers. The
//! raw types accept every variant and [`RawGammaMarket::into_record`]
//! normalizes them into an engine [`MarketRecord`].

use crate::error::{GammaError, Result};
use chrono::{DateTime, Utc};
use edge_scanner_engine::MarketRecord;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use std::str::FromStr;

/// Public event page prefix; the market slug is appended.
pub const EVENT_URL_PREFIX: &str = "https://polymarket.com/event/";

/// A list field that may arrive as an array or as a JSON-encoded string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum EncodedList {
    /// Plain JSON array.
    List(Vec<Value>),
    /// String holding a JSON array (e.g., `"[\"Yes\", \"No\"]"`).
    Encoded(String),
}

impl Default for EncodedList {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

impl EncodedList {
    /// Decodes into a list of raw values.
    ///
    /// # Errors
    /// Returns error if an encoded string is not a JSON array.
    pub fn decode(self) -> Result<Vec<Value>> {
        match self {
            Self::List(values) => Ok(values),
            Self::Encoded(text) if text.trim().is_empty() => Ok(Vec::new()),
            Self::Encoded(text) => Ok(serde_json::from_str(&text)?),
        }
    }
}

/// Raw market data from the Gamma `/markets` endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawGammaMarket {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub outcomes: EncodedList,
    #[serde(default)]
    pub outcome_prices: EncodedList,
    #[serde(default)]
    pub liquidity: Option<Value>,
    #[serde(default)]
    pub volume: Option<Value>,
    #[serde(default)]
    pub end_date: Option<String>,
}

impl RawGammaMarket {
    /// Returns the market id as text, whether sent as a string or a number.
    #[must_use]
    pub fn id_text(&self) -> Option<String> {
        match &self.id {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Converts into an engine record, deriving days-to-end relative to `now`.
    ///
    /// # Errors
    /// Returns [`GammaError::InvalidMarket`] if outcomes or prices are empty,
    /// differ in length, or fail to parse.
    pub fn into_record(self, now: DateTime<Utc>) -> Result<MarketRecord> {
        let id = self.id_text();
        let label = id.clone().unwrap_or_else(|| "?".to_string());

        let outcomes: Vec<String> = self
            .outcomes
            .decode()?
            .into_iter()
            .map(|v| match v {
                Value::String(s) => s,
                other => other.to_string(),
            })
            .collect();
        let probabilities = self
            .outcome_prices
            .decode()?
            .iter()
            .map(parse_f64)
            .collect::<Option<Vec<f64>>>()
            .ok_or_else(|| GammaError::invalid_market(&label, "unparseable outcome price"))?;

        if outcomes.is_empty() || probabilities.is_empty() {
            return Err(GammaError::invalid_market(&label, "missing outcomes or prices"));
        }
        if outcomes.len() != probabilities.len() {
            return Err(GammaError::invalid_market(
                &label,
                format!(
                    "{} outcomes but {} prices",
                    outcomes.len(),
                    probabilities.len()
                ),
            ));
        }

        let liquidity = parse_amount(self.liquidity.as_ref())
            .ok_or_else(|| GammaError::invalid_market(&label, "unparseable liquidity"))?;
        let volume = parse_amount(self.volume.as_ref())
            .ok_or_else(|| GammaError::invalid_market(&label, "unparseable volume"))?;

        let question = self.question.unwrap_or_default().trim().to_string();
        let url = format!("{EVENT_URL_PREFIX}{}", self.slug.unwrap_or_default());

        let mut record = MarketRecord::new(question, outcomes, probabilities)
            .with_liquidity(liquidity)
            .with_volume(volume)
            .with_url(url);
        record.id = id;

        if let Some(end) = self.end_date.as_deref().and_then(parse_end_date) {
            record = record.with_end_date(end, now);
        }

        Ok(record)
    }
}

fn parse_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Null, absent and empty amounts count as zero.
fn parse_amount(value: Option<&Value>) -> Option<Decimal> {
    match value {
        None | Some(Value::Null) => Some(Decimal::ZERO),
        Some(Value::String(s)) if s.trim().is_empty() => Some(Decimal::ZERO),
        Some(Value::String(s)) => Decimal::from_str(s.trim())
            .or_else(|_| Decimal::from_scientific(s.trim()))
            .ok(),
        Some(Value::Number(n)) => n.as_f64().and_then(|f| Decimal::try_from(f).ok()),
        Some(_) => None,
    }
}

fn parse_end_date(text: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}
