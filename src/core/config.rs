use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::model::SafetyConfig;

/// Engine tuning, persisted in engine.json.
/// The caregiver's geofence (`SafetyConfig`) is not stored here.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct EngineSettings {
    /// Minimum gap between two alert triggers
    #[serde(default = "default_alert_cooldown_seconds")]
    pub alert_cooldown_seconds: u64,
    /// Samples worse than this are ignored once tracking has started
    #[serde(default = "default_noise_accuracy_meters")]
    pub noise_accuracy_meters: f64,
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
    /// Refresh the safety tip every N accepted samples
    #[serde(default = "default_tip_interval")]
    pub tip_interval: u64,
    /// How many recent samples the tip advisor sees
    #[serde(default = "default_tip_window")]
    pub tip_window: usize,
    /// Name used for the monitored person in alert text
    #[serde(default = "default_subject_name")]
    pub subject_name: String,
}

fn default_alert_cooldown_seconds() -> u64 {
    60
}

fn default_noise_accuracy_meters() -> f64 {
    100.0
}

fn default_history_capacity() -> usize {
    50
}

fn default_tip_interval() -> u64 {
    8
}

fn default_tip_window() -> usize {
    5
}

fn default_subject_name() -> String {
    "Patient".to_string()
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            alert_cooldown_seconds: default_alert_cooldown_seconds(),
            noise_accuracy_meters: default_noise_accuracy_meters(),
            history_capacity: default_history_capacity(),
            tip_interval: default_tip_interval(),
            tip_window: default_tip_window(),
            subject_name: default_subject_name(),
        }
    }
}

impl EngineSettings {
    pub fn alert_cooldown(&self) -> Duration {
        Duration::from_secs(self.alert_cooldown_seconds)
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("safety radius must be a positive number of meters, got {0}")]
    InvalidRadius(f64),
}

/// The engine only assumes `radius_meters > 0`; the 20-1000 m slider range
/// belongs to the settings form.
pub fn validate(config: &SafetyConfig) -> Result<(), ConfigError> {
    if config.radius_meters.is_finite() && config.radius_meters > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidRadius(config.radius_meters))
    }
}

pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    pub fn new(config_dir: PathBuf) -> Self {
        Self {
            config_path: config_dir.join("engine.json"),
        }
    }

    pub fn load(&self) -> EngineSettings {
        if self.config_path.exists() {
            match fs::read_to_string(&self.config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(settings) => return settings,
                    Err(e) => log::warn!("Ignoring malformed {:?}: {}", self.config_path, e),
                },
                Err(e) => log::warn!("Failed to read {:?}: {}", self.config_path, e),
            }
        }
        EngineSettings::default()
    }

    pub fn save(&self, settings: &EngineSettings) -> io::Result<()> {
        // Ensure directory exists
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(settings)?;
        fs::write(&self.config_path, content)
    }
}
