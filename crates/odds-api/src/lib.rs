//! The Odds API integration for the edge scanner.
//!
//! Discovers active political "sports" (markets such as election winners),
//! fetches their bookmaker odds in decimal format and converts them into
//! engine [`OddsEvent`](edge_scanner_engine::OddsEvent)s.
//!
//! # Example
//!
//! ```no_run
//! use edge_scanner_odds::{OddsApiClient, OddsApiClientConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), edge_scanner_odds::OddsApiError> {
//!     let client = OddsApiClient::new(OddsApiClientConfig::from_env())?;
//!     let events = client.fetch_all_political().await;
//!     println!("Fetched {} bookmaker events", events.len());
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod types;

pub use client::{OddsApiClient, OddsApiClientConfig, FALLBACK_SPORT_KEY, ODDS_API_URL};
pub use error::OddsApiError;
pub use types::{RawBookmaker, RawEvent, RawMarket, RawOutcome, Sport};
