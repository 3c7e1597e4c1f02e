//! # Engine Configuration
//!
//! The engine's tunable constants: the VAT rate and the words used when the
//! net payable is written out.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     WORKSHOP_VAT_RATE=15                                               │
//! │     WORKSHOP_CURRENCY_MAJOR=Birr                                       │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/workshop-billing/engine.toml (Linux)                     │
//! │     ~/Library/Application Support/com.workshop.billing/engine.toml     │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     15% VAT, Birr / Cents                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # engine.toml
//! [tax]
//! vat_rate_bps = 1500
//!
//! [words]
//! major = "Birr"
//! minor = "Cents"
//! joiner = "And"
//! suffix = "Only"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};
use workshop_core::{BillingPolicy, CoreError, TaxRate, WordsStyle, DEFAULT_VAT_RATE};

use crate::error::{SessionError, SessionResult};

const CONFIG_FILE_NAME: &str = "engine.toml";

// =============================================================================
// Tax Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxSettings {
    /// Flat VAT rate in basis points (1500 = 15%).
    #[serde(default = "default_vat_rate_bps")]
    pub vat_rate_bps: u32,
}

fn default_vat_rate_bps() -> u32 {
    DEFAULT_VAT_RATE.bps()
}

impl Default for TaxSettings {
    fn default() -> Self {
        TaxSettings {
            vat_rate_bps: default_vat_rate_bps(),
        }
    }
}

// =============================================================================
// Engine Config
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub tax: TaxSettings,

    #[serde(default)]
    pub words: WordsStyle,
}

impl EngineConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (engine.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> SessionResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading engine config from file");
                let contents = std::fs::read_to_string(&path)
                    .map_err(|e| SessionError::ConfigLoad(format!("{}: {}", path.display(), e)))?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load engine config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> SessionResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| SessionError::ConfigSave("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Engine config saved");
        Ok(())
    }

    /// Validates the rate bounds and the currency words.
    pub fn validate(&self) -> SessionResult<()> {
        self.policy().validate().map_err(CoreError::from)?;
        Ok(())
    }

    /// The policy handed to every draft opened with this configuration.
    pub fn policy(&self) -> BillingPolicy {
        BillingPolicy {
            vat_rate: TaxRate::from_bps(self.tax.vat_rate_bps),
            words: self.words.clone(),
        }
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from `lookup`. `WORKSHOP_VAT_RATE_BPS` wins over
    /// `WORKSHOP_VAT_RATE` when both are set.
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(rate) = lookup("WORKSHOP_VAT_RATE") {
            match rate.trim().parse::<f64>() {
                Ok(pct) if pct >= 0.0 => {
                    debug!(rate = %rate, "Overriding VAT rate from environment");
                    self.tax.vat_rate_bps = TaxRate::from_percentage(pct).bps();
                }
                _ => warn!(rate = %rate, "Ignoring invalid WORKSHOP_VAT_RATE"),
            }
        }

        if let Some(bps) = lookup("WORKSHOP_VAT_RATE_BPS") {
            match bps.trim().parse::<u32>() {
                Ok(b) => {
                    debug!(bps = b, "Overriding VAT rate (bps) from environment");
                    self.tax.vat_rate_bps = b;
                }
                Err(_) => warn!(bps = %bps, "Ignoring invalid WORKSHOP_VAT_RATE_BPS"),
            }
        }

        if let Some(major) = lookup("WORKSHOP_CURRENCY_MAJOR") {
            self.words.major = major;
        }

        if let Some(minor) = lookup("WORKSHOP_CURRENCY_MINOR") {
            self.words.minor = minor;
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "workshop", "billing")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use uuid::Uuid;

    fn temp_config_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("workshop-config-{}", Uuid::new_v4()))
            .join(CONFIG_FILE_NAME)
    }

    fn overrides(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.tax.vat_rate_bps, 1500);
        assert_eq!(config.words.major, "Birr");
        assert!(config.validate().is_ok());
        assert_eq!(config.policy(), BillingPolicy::default());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let path = temp_config_path();
        let mut config = EngineConfig::default();
        config.tax.vat_rate_bps = 1000;
        config.words.major = "Dollars".to_string();

        config.save(Some(path.clone())).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("vat_rate_bps = 1000"));

        let mut loaded: EngineConfig = toml::from_str(&contents).unwrap();
        loaded.validate().unwrap();
        assert_eq!(loaded, config);

        loaded.apply_overrides(overrides(&[]));
        assert_eq!(loaded, config);

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: EngineConfig = toml::from_str("[words]\nmajor = \"Shillings\"\n").unwrap();
        assert_eq!(config.tax.vat_rate_bps, 1500);
        assert_eq!(config.words.major, "Shillings");
        assert_eq!(config.words.minor, "Cents");
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = EngineConfig::load_or_default(Some(temp_config_path()));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_rate_rejected() {
        let mut config = EngineConfig::default();
        config.tax.vat_rate_bps = 10_001;
        assert!(matches!(
            config.validate(),
            Err(SessionError::Core(CoreError::Validation(_)))
        ));

        let mut config = EngineConfig::default();
        config.words.major = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_percentage_override() {
        let mut config = EngineConfig::default();
        config.apply_overrides(overrides(&[("WORKSHOP_VAT_RATE", "7.5")]));
        assert_eq!(config.tax.vat_rate_bps, 750);
    }

    #[test]
    fn test_env_bps_wins_over_percentage() {
        let mut config = EngineConfig::default();
        config.apply_overrides(overrides(&[
            ("WORKSHOP_VAT_RATE", "10"),
            ("WORKSHOP_VAT_RATE_BPS", "1200"),
        ]));
        assert_eq!(config.tax.vat_rate_bps, 1200);
    }

    #[test]
    fn test_env_invalid_values_ignored() {
        let mut config = EngineConfig::default();
        config.apply_overrides(overrides(&[
            ("WORKSHOP_VAT_RATE", "fifteen"),
            ("WORKSHOP_VAT_RATE_BPS", "-3"),
        ]));
        assert_eq!(config.tax.vat_rate_bps, 1500);
    }

    #[test]
    fn test_env_currency_words() {
        let mut config = EngineConfig::default();
        config.apply_overrides(overrides(&[
            ("WORKSHOP_CURRENCY_MAJOR", "Dollars"),
            ("WORKSHOP_CURRENCY_MINOR", "Cents"),
        ]));
        assert_eq!(config.policy().words.major, "Dollars");
    }
}
