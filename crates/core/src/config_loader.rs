use crate::config::AppConfig;
use anyhow::Result;
use figment::{
    providers::{Env, Format, Json, Toml},
    Figment,
};
use std::path::Path;

/// Default configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/Config.toml";

/// Prefix for environment overrides; `__` separates nested keys.
pub const ENV_PREFIX: &str = "EDGE_";

/// Conventional variable for the Odds API key.
pub const ODDS_API_KEY_VAR: &str = "ODDS_API_KEY";

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads application configuration by merging TOML, environment variables, and JSON.
    ///
    /// Missing files contribute nothing, so a bare checkout runs on defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration files cannot be read or parsed.
    pub fn load() -> Result<AppConfig> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Loads application configuration from an explicit TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be parsed.
    pub fn load_from(path: impl AsRef<Path>) -> Result<AppConfig> {
        let config: AppConfig = Self::base(Figment::new().merge(Toml::file(path.as_ref())))
            .extract()?;

        tracing::debug!(path = %path.as_ref().display(), "Loaded configuration");
        Ok(config)
    }

    /// Loads application configuration with a specific profile.
    ///
    /// `config/Config.{profile}.toml` overrides the default file.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration files cannot be read or parsed.
    pub fn load_with_profile(profile: &str) -> Result<AppConfig> {
        let config: AppConfig = Self::base(
            Figment::new()
                .merge(Toml::file(DEFAULT_CONFIG_PATH))
                .merge(Toml::file(format!("config/Config.{profile}.toml"))),
        )
        .extract()?;

        tracing::debug!(profile, "Loaded configuration profile");
        Ok(config)
    }

    /// Layers environment overrides and the JSON fallback over file providers.
    fn base(files: Figment) -> Figment {
        files
            .merge(
                Env::raw()
                    .only(&[ODDS_API_KEY_VAR])
                    .map(|_| "odds_api.api_key".into()),
            )
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .join(Json::file("config/Config.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edge_scanner_engine::DirectionFilter;
    use figment::Jail;
    use rust_decimal_macros::dec;

    #[test]
    fn test_load_defaults_without_files() {
        Jail::expect_with(|_jail| {
            let config = ConfigLoader::load().map_err(|e| e.to_string())?;

            assert_eq!(config.polymarket.limit, 200);
            assert_eq!(config.filter.max_days, Some(30));
            assert!(config.odds_api.api_key.is_none());
            Ok(())
        });
    }

    #[test]
    fn test_load_toml_file() {
        Jail::expect_with(|jail| {
            jail.create_dir("config")?;
            jail.create_file(
                "config/Config.toml",
                r#"
                [scan]
                event_threshold = 0.35

                [filter]
                min_delta_pp = 3.0
                min_liquidity = 10000
                direction = "poly_higher"

                [polymarket]
                limit = 50
                "#,
            )?;

            let config = ConfigLoader::load().map_err(|e| e.to_string())?;

            assert!((config.scan.event_threshold - 0.35).abs() < 1e-12);
            assert!((config.scan.outcome_threshold - 0.38).abs() < 1e-12);
            assert!((config.filter.min_delta_pp - 3.0).abs() < 1e-12);
            assert_eq!(config.filter.min_liquidity, dec!(10000));
            assert_eq!(config.filter.direction, DirectionFilter::PolyHigher);
            assert_eq!(config.polymarket.limit, 50);
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_dir("config")?;
            jail.create_file("config/Config.toml", "[polymarket]\nlimit = 50\n")?;
            jail.set_env("EDGE_POLYMARKET__LIMIT", "75");
            jail.set_env("EDGE_ODDS_API__REGIONS", "uk");

            let config = ConfigLoader::load().map_err(|e| e.to_string())?;

            assert_eq!(config.polymarket.limit, 75);
            assert_eq!(config.odds_api.regions, "uk");
            Ok(())
        });
    }

    #[test]
    fn test_odds_api_key_from_conventional_var() {
        Jail::expect_with(|jail| {
            jail.set_env("ODDS_API_KEY", "plain-key");

            let config = ConfigLoader::load().map_err(|e| e.to_string())?;
            assert_eq!(config.odds_api.api_key.as_deref(), Some("plain-key"));
            Ok(())
        });
    }

    #[test]
    fn test_prefixed_api_key_wins() {
        Jail::expect_with(|jail| {
            jail.set_env("ODDS_API_KEY", "plain-key");
            jail.set_env("EDGE_ODDS_API__API_KEY", "prefixed-key");

            let config = ConfigLoader::load().map_err(|e| e.to_string())?;
            assert_eq!(config.odds_api.api_key.as_deref(), Some("prefixed-key"));
            Ok(())
        });
    }

    #[test]
    fn test_profile_overrides_default_file() {
        Jail::expect_with(|jail| {
            jail.create_dir("config")?;
            jail.create_file("config/Config.toml", "[filter]\nmin_delta_pp = 5.0\n")?;
            jail.create_file("config/Config.live.toml", "[filter]\nmin_delta_pp = 2.5\n")?;

            let config = ConfigLoader::load_with_profile("live").map_err(|e| e.to_string())?;
            assert!((config.filter.min_delta_pp - 2.5).abs() < 1e-12);
            Ok(())
        });
    }

    #[test]
    fn test_load_from_invalid_file_errors() {
        Jail::expect_with(|jail| {
            jail.create_file("broken.toml", "[filter]\nmin_delta_pp = \"lots\"\n")?;

            assert!(ConfigLoader::load_from("broken.toml").is_err());
            Ok(())
        });
    }
}
