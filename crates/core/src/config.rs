use edge_scanner_engine::{DirectionFilter, MatchConfig, SignalFilter};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub scan: MatchSettings,
    pub filter: FilterSettings,
    pub polymarket: PolymarketSettings,
    pub odds_api: OddsApiSettings,
}

/// Matching thresholds, mirrored into [`MatchConfig`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchSettings {
    pub event_threshold: f64,
    pub candidate_bonus: f64,
    pub outcome_threshold: f64,
    pub outright_threshold: f64,
    pub outright_confidence: f64,
}

impl Default for MatchSettings {
    fn default() -> Self {
        let defaults = MatchConfig::default();
        Self {
            event_threshold: defaults.event_threshold,
            candidate_bonus: defaults.candidate_bonus,
            outcome_threshold: defaults.outcome_threshold,
            outright_threshold: defaults.outright_threshold,
            outright_confidence: defaults.outright_confidence,
        }
    }
}

impl MatchSettings {
    #[must_use]
    pub fn to_match_config(&self) -> MatchConfig {
        MatchConfig {
            event_threshold: self.event_threshold,
            candidate_bonus: self.candidate_bonus,
            outcome_threshold: self.outcome_threshold,
            outright_threshold: self.outright_threshold,
            outright_confidence: self.outright_confidence,
            ..MatchConfig::default()
        }
    }
}

/// Record and signal filters. Edges are configured in percentage points.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSettings {
    pub min_delta_pp: f64,
    pub min_liquidity: Decimal,
    /// `None` accepts any resolution horizon.
    pub max_days: Option<i64>,
    pub direction: DirectionFilter,
}

impl Default for FilterSettings {
    fn default() -> Self {
        let defaults = SignalFilter::default();
        Self {
            min_delta_pp: defaults.min_abs_delta * 100.0,
            min_liquidity: defaults.min_liquidity,
            max_days: defaults.max_days_to_end,
            direction: defaults.direction,
        }
    }
}

impl FilterSettings {
    #[must_use]
    pub fn to_signal_filter(&self) -> SignalFilter {
        SignalFilter {
            min_liquidity: self.min_liquidity,
            max_days_to_end: self.max_days,
            min_abs_delta: self.min_delta_pp / 100.0,
            direction: self.direction,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PolymarketSettings {
    pub base_url: String,
    /// Markets requested per scan.
    pub limit: u32,
    pub requests_per_minute: u32,
    pub timeout_secs: u64,
}

impl Default for PolymarketSettings {
    fn default() -> Self {
        Self {
            base_url: "https://gamma-api.polymarket.com".to_string(),
            limit: 200,
            requests_per_minute: 30,
            timeout_secs: 15,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OddsApiSettings {
    pub base_url: String,
    /// Read from `EDGE_ODDS_API__API_KEY` or `ODDS_API_KEY` when not in a file.
    pub api_key: Option<String>,
    pub regions: String,
    pub requests_per_minute: u32,
    pub timeout_secs: u64,
}

impl Default for OddsApiSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.the-odds-api.com/v4".to_string(),
            api_key: None,
            regions: "uk,us,eu".to_string(),
            requests_per_minute: 30,
            timeout_secs: 15,
        }
    }
}
