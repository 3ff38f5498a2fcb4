pub mod config;
pub mod config_loader;

pub use config::{AppConfig, FilterSettings, MatchSettings, OddsApiSettings, PolymarketSettings};
pub use config_loader::ConfigLoader;
