//! The Odds API REST client with rate limiting.
//!
//! Provides typed access to the `/sports` and `/sports/{key}/odds` endpoints.
//! The free tier allows only a few hundred requests per month, so every
//! request goes through a governor rate limiter and discovery falls back to
//! a single well-known sport key.

use crate::error::{OddsApiError, Result};
use crate::types::{RawEvent, Sport};
use edge_scanner_engine::{MarketKey, OddsEvent};
use governor::{Quota, RateLimiter};
use nonzero_ext::nonzero;
use reqwest::Client;
use std::num::NonZeroU32;
use std::sync::Arc;

// =============================================================================
// Constants
// =============================================================================

/// The Odds API v4 base URL.
pub const ODDS_API_URL: &str = "https://api.the-odds-api.com/v4";

/// Sport key used when discovery returns no active political sports.
pub const FALLBACK_SPORT_KEY: &str = "politics_us_presidential_election_winner";

/// Bookmaker regions requested by default.
pub const DEFAULT_REGIONS: &str = "uk,us,eu";

/// Environment variables checked for the API key, in priority order.
pub const API_KEY_VARS: [&str; 2] = ["EDGE_ODDS_API__API_KEY", "ODDS_API_KEY"];

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for the Odds API client.
#[derive(Debug, Clone)]
pub struct OddsApiClientConfig {
    /// Base URL for the API.
    pub base_url: String,

    /// API key; requests are skipped without one.
    pub api_key: Option<String>,

    /// Comma-separated bookmaker regions.
    pub regions: String,

    /// Requests per minute limit.
    pub requests_per_minute: NonZeroU32,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for OddsApiClientConfig {
    fn default() -> Self {
        Self {
            base_url: ODDS_API_URL.to_string(),
            api_key: None,
            regions: DEFAULT_REGIONS.to_string(),
            requests_per_minute: nonzero!(30u32),
            timeout_secs: 15,
        }
    }
}

impl OddsApiClientConfig {
    /// Creates a configuration with the API key taken from the environment.
    #[must_use]
    pub fn from_env() -> Self {
        let api_key = API_KEY_VARS
            .iter()
            .find_map(|var| std::env::var(var).ok())
            .filter(|key| !key.trim().is_empty());

        Self {
            api_key,
            ..Default::default()
        }
    }

    /// Sets the base URL.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the API key.
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the bookmaker regions.
    #[must_use]
    pub fn with_regions(mut self, regions: impl Into<String>) -> Self {
        self.regions = regions.into();
        self
    }

    /// Sets the rate limit.
    #[must_use]
    pub fn with_rate_limit(mut self, requests_per_minute: NonZeroU32) -> Self {
        self.requests_per_minute = requests_per_minute;
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

// =============================================================================
// Client
// =============================================================================

/// The Odds API client.
pub struct OddsApiClient {
    config: OddsApiClientConfig,
    http: Client,
    rate_limiter: Arc<
        RateLimiter<
            governor::state::NotKeyed,
            governor::state::InMemoryState,
            governor::clock::DefaultClock,
        >,
    >,
}

impl OddsApiClient {
    /// Creates a new client.
    ///
    /// A missing API key is not an error here; fetches log a warning and
    /// return nothing instead.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built.
    pub fn new(config: OddsApiClientConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| OddsApiError::Configuration(format!("failed to build HTTP client: {e}")))?;

        let quota = Quota::per_minute(config.requests_per_minute);
        let rate_limiter = Arc::new(RateLimiter::direct(quota));

        Ok(Self {
            config,
            http,
            rate_limiter,
        })
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &OddsApiClientConfig {
        &self.config
    }

    /// Returns true if an API key is configured.
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.config.api_key.is_some()
    }

    // =========================================================================
    // HTTP Helpers
    // =========================================================================

    /// Waits for rate limiter and makes a keyed GET request.
    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(OddsApiError::MissingApiKey)?;

        self.rate_limiter.until_ready().await;

        let url = format!("{}{}", self.config.base_url, path);
        tracing::debug!(path, "GET");

        let response = self
            .http
            .get(&url)
            .header("Accept", "application/json")
            .query(&[("apiKey", api_key)])
            .query(query)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Handles API response, checking for errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();

        if let Some(remaining) = response
            .headers()
            .get("x-requests-remaining")
            .and_then(|v| v.to_str().ok())
        {
            tracing::debug!(remaining, "Odds API quota");
        }

        if status.as_u16() == 429 {
            return Err(OddsApiError::RateLimit);
        }

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(OddsApiError::api(status.as_u16(), text));
        }

        let body = response.json::<T>().await?;
        Ok(body)
    }

    // =========================================================================
    // Endpoints
    // =========================================================================

    /// Gets every sport, including inactive ones.
    ///
    /// # Errors
    /// Returns error if no key is configured or the API call fails.
    pub async fn get_sports(&self) -> Result<Vec<Sport>> {
        self.get("/sports", &[("all", "true")]).await
    }

    /// Gets bookmaker odds for one sport and market type.
    ///
    /// # Errors
    /// Returns error if no key is configured or the API call fails.
    pub async fn get_odds(&self, sport_key: &str, market: &MarketKey) -> Result<Vec<OddsEvent>> {
        let path = format!("/sports/{sport_key}/odds");
        let raw: Vec<RawEvent> = self
            .get(
                &path,
                &[
                    ("regions", self.config.regions.as_str()),
                    ("markets", market.as_str()),
                    ("oddsFormat", "decimal"),
                ],
            )
            .await?;

        Ok(raw.into_iter().map(OddsEvent::from).collect())
    }

    /// Gets every sport, logging failures as an empty result.
    pub async fn fetch_sports(&self) -> Vec<Sport> {
        match self.get_sports().await {
            Ok(sports) => sports,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch sports");
                Vec::new()
            }
        }
    }

    /// Gets odds for one sport, logging failures as an empty result.
    ///
    /// "No data" statuses (400, 404, 422) are expected for sports without
    /// the requested market and are not logged as warnings.
    pub async fn fetch_odds(&self, sport_key: &str, market: &MarketKey) -> Vec<OddsEvent> {
        match self.get_odds(sport_key, market).await {
            Ok(events) => {
                tracing::debug!(sport_key, count = events.len(), "Fetched odds");
                events
            }
            Err(e) if e.is_no_data() => {
                tracing::debug!(sport_key, error = %e, "No odds for sport");
                Vec::new()
            }
            Err(e) => {
                tracing::warn!(sport_key, error = %e, "Failed to fetch odds");
                Vec::new()
            }
        }
    }

    /// Fetches outright odds for every active political sport.
    ///
    /// Falls back to [`FALLBACK_SPORT_KEY`] when discovery finds nothing.
    pub async fn fetch_all_political(&self) -> Vec<OddsEvent> {
        if !self.has_api_key() {
            tracing::warn!("No Odds API key configured, skipping bookmaker odds");
            return Vec::new();
        }

        let keys = political_sport_keys(&self.fetch_sports().await);
        tracing::info!(sports = keys.len(), "Fetching political odds");

        let mut events = Vec::new();
        for key in &keys {
            events.extend(self.fetch_odds(key, &MarketKey::Outrights).await);
        }

        tracing::info!(count = events.len(), "Fetched bookmaker events");
        events
    }
}

/// Keys of active political sports, or the fallback key when there are none.
#[must_use]
pub fn political_sport_keys(sports: &[Sport]) -> Vec<String> {
    let keys: Vec<String> = sports
        .iter()
        .filter(|s| s.is_active_politics())
        .map(|s| s.key.clone())
        .collect();

    if keys.is_empty() {
        vec![FALLBACK_SPORT_KEY.to_string()]
    } else {
        keys
    }
}
