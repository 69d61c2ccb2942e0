//! Configuration file support.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/coach/config.toml`.

use crate::nutrition::ActivityStrategy;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub equipment: EquipmentConfig,

    #[serde(default)]
    pub nutrition: NutritionConfig,
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

/// Equipment assumed available when a caller declares none
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EquipmentConfig {
    #[serde(default = "default_equipment")]
    pub available: Vec<String>,
}

impl Default for EquipmentConfig {
    fn default() -> Self {
        Self {
            available: default_equipment(),
        }
    }
}

/// Nutrition calculator configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct NutritionConfig {
    /// Which activity-multiplier table the calculator serves
    #[serde(default)]
    pub activity_strategy: ActivityStrategy,
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        let home = std::env::var("HOME").expect("HOME environment variable not set");
        PathBuf::from(home).join(".local/share")
    });
    base.join("coach")
}

fn default_equipment() -> Vec<String> {
    vec![
        "barbell".into(),
        "dumbbell".into(),
        "cable".into(),
        "machine".into(),
    ]
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            let home = std::env::var("HOME").expect("HOME environment variable not set");
            PathBuf::from(home).join(".config")
        });
        base.join("coach").join("config.toml")
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
