//! Polymarket Gamma API integration for the edge scanner.
//!
//! This crate provides:
//! - Rate-limited REST client for the public Gamma API
//! - Raw market models tolerant of Gamma's mixed field encodings
//! - Conversion into engine [`MarketRecord`](edge_scanner_engine::MarketRecord)s
//!
//! # Example
//!
//! ```no_run
//! use edge_scanner_polymarket::{GammaClient, DEFAULT_MARKET_LIMIT};
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = GammaClient::new();
//!     let records = client.fetch_political_markets(DEFAULT_MARKET_LIMIT).await;
//!     println!("Fetched {} political markets", records.len());
//! }
//! ```

pub mod error;
pub mod gamma;
pub mod models;

// Re-export main types
pub use error::GammaError;
pub use gamma::{GammaClient, DEFAULT_MARKET_LIMIT, GAMMA_API_URL};
pub use models::{EncodedList, RawGammaMarket};
