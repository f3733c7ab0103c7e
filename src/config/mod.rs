//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::pairing::{PairingOptions, PairingSystem};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Pairing defaults applied when the CLI does not override them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairingConfig {
    #[serde(default = "default_system")]
    pub default_system: PairingSystem,

    /// Fixed RNG seed. Unset means a fresh seed per invocation.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Lagged Australian ranks on results through round `N - lag_rounds`.
    #[serde(default = "default_lag_rounds")]
    pub lag_rounds: u32,

    /// Lagged Australian pairs randomly while the round is below this.
    #[serde(default = "default_lagged_random_until")]
    pub lagged_random_until: u32,
}

fn default_system() -> PairingSystem {
    PairingSystem::RoundRobin
}

fn default_lag_rounds() -> u32 {
    1
}

fn default_lagged_random_until() -> u32 {
    3
}

impl Default for PairingConfig {
    fn default() -> Self {
        Self {
            default_system: default_system(),
            seed: None,
            lag_rounds: default_lag_rounds(),
            lagged_random_until: default_lagged_random_until(),
        }
    }
}

impl PairingConfig {
    pub fn to_options(&self) -> PairingOptions {
        PairingOptions {
            round_robin_rounds: None,
            lag_rounds: self.lag_rounds,
            lagged_random_until: self.lagged_random_until,
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub pairing: PairingConfig,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            pairing: PairingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Like `from_file`, but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::from_file(path)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pairing.lag_rounds == 0 {
            return Err(ConfigError::ValidationError(
                "pairing.lag_rounds must be at least 1".to_string(),
            ));
        }

        if self.pairing.lagged_random_until == 0 {
            return Err(ConfigError::ValidationError(
                "pairing.lagged_random_until must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.data_dir, PathBuf::from("./data"));
        assert_eq!(config.log_level, "info");
        assert_eq!(config.pairing.default_system, PairingSystem::RoundRobin);
        assert_eq!(config.pairing.seed, None);
    }

    #[test]
    fn test_pairing_options_from_config() {
        let options = PairingConfig::default().to_options();
        assert_eq!(options, PairingOptions::default());
    }

    #[test]
    fn test_config_validation_ok() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_zero_lag() {
        let mut config = AppConfig::default();
        config.pairing.lag_rounds = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let parsed: AppConfig = toml::from_str(
            r#"
            data_dir = "/tmp/club"

            [pairing]
            default_system = "lagged-australian"
            seed = 42
            "#,
        )
        .unwrap();

        assert_eq!(parsed.data_dir, PathBuf::from("/tmp/club"));
        assert_eq!(parsed.log_level, "info");
        assert_eq!(parsed.pairing.default_system, PairingSystem::LaggedAustralian);
        assert_eq!(parsed.pairing.seed, Some(42));
        assert_eq!(parsed.pairing.lag_rounds, 1);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_or_default(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.pairing.lagged_random_until, 3);
    }

    #[test]
    fn test_invalid_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[pairing]\nlag_rounds = 0\n").unwrap();

        assert!(matches!(
            AppConfig::from_file(&path),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string(&config).unwrap();

        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.data_dir, parsed.data_dir);
        assert_eq!(config.pairing.default_system, parsed.pairing.default_system);
    }
}
