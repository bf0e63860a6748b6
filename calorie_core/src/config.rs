//! Configuration file support for kcal.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/kcal/config.toml`.

use crate::policy::ScoringPolicy;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub defaults: DefaultsConfig,

    #[serde(default)]
    pub scoring: ScoringPolicy,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Values a new profile starts with
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Target used until biometrics are entered
    #[serde(default = "default_daily_target_kcal")]
    pub daily_target_kcal: u32,

    #[serde(default = "default_water_target_ml")]
    pub water_target_ml: u32,

    #[serde(default = "default_steps_target")]
    pub steps_target: u32,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            daily_target_kcal: default_daily_target_kcal(),
            water_target_ml: default_water_target_ml(),
            steps_target: default_steps_target(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));
    base.join("kcal")
}

fn default_daily_target_kcal() -> u32 {
    2000
}

fn default_water_target_ml() -> u32 {
    2000
}

fn default_steps_target() -> u32 {
    10000
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Reject configurations the computations cannot work with
    pub fn validate(&self) -> Result<()> {
        let mut errors = self.scoring.validate();
        if self.defaults.daily_target_kcal == 0 {
            errors.push("defaults.daily_target_kcal must be positive".into());
        }
        if self.defaults.water_target_ml == 0 {
            errors.push("defaults.water_target_ml must be positive".into());
        }
        if self.defaults.steps_target == 0 {
            errors.push("defaults.steps_target must be positive".into());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(Error::Config(errors.join("; ")))
        }
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."));
        base.join("kcal").join("config.toml")
    }

    /// Save the current configuration to the default path
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path();
        self.save_to(&config_path)
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}
