//! Gamma API client for political market discovery.
//!
//! Uses the public Gamma API (no key required) to list active political
//! markets and convert them into engine records.

use crate::error::{GammaError, Result};
use crate::models::RawGammaMarket;
use chrono::{DateTime, Utc};
use edge_scanner_engine::MarketRecord;
use governor::{Quota, RateLimiter};
use nonzero_ext::nonzero;
use reqwest::Client;
use serde_json::Value;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

/// Gamma API base URL.
pub const GAMMA_API_URL: &str = "https://gamma-api.polymarket.com";

/// Tag slug for political markets.
pub const POLITICS_TAG: &str = "politics";

/// Default number of markets per scan.
pub const DEFAULT_MARKET_LIMIT: u32 = 200;

/// Default request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Gamma API client for political market discovery.
pub struct GammaClient {
    /// HTTP client
    http: Client,
    /// Base URL for API
    base_url: String,
    /// Rate limiter (requests per minute)
    rate_limiter: Arc<
        RateLimiter<
            governor::state::NotKeyed,
            governor::state::InMemoryState,
            governor::clock::DefaultClock,
        >,
    >,
}

impl Default for GammaClient {
    fn default() -> Self {
        Self::new()
    }
}

impl GammaClient {
    /// Creates a new client with default settings.
    ///
    /// Rate limited to 30 requests per minute by default.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rate_limit(nonzero!(30u32))
    }

    /// Creates a new client with custom rate limit.
    #[must_use]
    pub fn with_rate_limit(requests_per_minute: NonZeroU32) -> Self {
        let quota = Quota::per_minute(requests_per_minute);
        let rate_limiter = Arc::new(RateLimiter::direct(quota));

        Self {
            http: build_http(DEFAULT_TIMEOUT_SECS),
            base_url: GAMMA_API_URL.to_string(),
            rate_limiter,
        }
    }

    /// Sets a custom base URL (useful for testing).
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.http = build_http(secs);
        self
    }

    /// Returns the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Waits for rate limit and makes a GET request.
    async fn get<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.rate_limiter.until_ready().await;

        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("GET {}", url);

        let response = self
            .http
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(GammaError::api(status.as_u16(), text));
        }

        let body = response.json::<T>().await?;
        Ok(body)
    }

    /// Gets active, open political markets.
    ///
    /// Markets that cannot become records (missing or misaligned outcome
    /// lists, unparseable prices) are logged and skipped.
    ///
    /// # Errors
    /// Returns error if the request fails or the body is not a JSON array.
    pub async fn get_political_markets(&self, limit: u32) -> Result<Vec<MarketRecord>> {
        let path = format!(
            "/markets?active=true&closed=false&limit={limit}&tag_slug={POLITICS_TAG}"
        );
        let raw: Vec<Value> = self.get(&path).await?;

        Ok(Self::parse_markets(raw, Utc::now()))
    }

    /// Gets active political markets, logging failures as an empty result.
    pub async fn fetch_political_markets(&self, limit: u32) -> Vec<MarketRecord> {
        match self.get_political_markets(limit).await {
            Ok(records) => {
                tracing::info!(count = records.len(), "Fetched Polymarket markets");
                records
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch Polymarket markets");
                Vec::new()
            }
        }
    }

    /// Converts raw market values into records, skipping invalid entries.
    #[must_use]
    pub fn parse_markets(raw: Vec<Value>, now: DateTime<Utc>) -> Vec<MarketRecord> {
        let total = raw.len();
        let records: Vec<MarketRecord> = raw
            .into_iter()
            .filter_map(|value| {
                let market = match serde_json::from_value::<RawGammaMarket>(value) {
                    Ok(m) => m,
                    Err(e) => {
                        tracing::debug!(error = %e, "Skipping undecodable market");
                        return None;
                    }
                };
                match market.into_record(now) {
                    Ok(record) => Some(record),
                    Err(e) => {
                        tracing::debug!(error = %e, "Skipping market");
                        None
                    }
                }
            })
            .collect();

        tracing::debug!(total, kept = records.len(), "Parsed Gamma markets");
        records
    }
}

fn build_http(timeout_secs: u64) -> Client {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Falling back to default HTTP client");
            Client::new()
        })
}
