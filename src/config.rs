//! On-disk configuration for the CLI: where the rover lives and where
//! programs are stored. Lives at `<config dir>/umgpp/config.toml` and is
//! created with defaults on first run. A corrupted file is backed up and
//! replaced rather than aborting the tool.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::{log_error, log_warn};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    #[serde(default)]
    pub rover: RoverConfig,

    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RoverConfig {
    /// Base URL of the rover's HTTP interface.
    #[serde(default = "default_rover_url")]
    pub url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct StorageConfig {
    /// Directory holding saved programs, one subdirectory per user.
    #[serde(default = "default_programs_dir")]
    pub programs_dir: PathBuf,
}

fn default_rover_url() -> String {
    "http://192.168.1.100".to_string()
}

fn default_timeout_secs() -> u64 {
    5
}

fn default_programs_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("umgpp")
        .join("programas")
}

impl Default for RoverConfig {
    fn default() -> Self {
        Self {
            url: "http://192.168.1.100".to_string(),
            timeout_secs: 5,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            programs_dir: default_programs_dir(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rover: RoverConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

pub trait Validate {
    fn validate(&mut self);
}

impl Validate for RoverConfig {
    fn validate(&mut self) {
        if !self.url.starts_with("http://") {
            log_warn!(
                "Invalid rover url: {:?}. Using default: {}",
                self.url,
                default_rover_url()
            );
            self.url = default_rover_url();
        }

        if self.timeout_secs == 0 || self.timeout_secs > 120 {
            log_warn!(
                "Invalid timeout_secs: {}. Using default: 5",
                self.timeout_secs
            );
            self.timeout_secs = 5;
        }
    }
}

impl Validate for StorageConfig {
    fn validate(&mut self) {
        if self.programs_dir.as_os_str().is_empty() {
            log_warn!("Empty programs_dir. Using default");
            self.programs_dir = default_programs_dir();
        }
    }
}

impl Validate for Config {
    fn validate(&mut self) {
        self.rover.validate();
        self.storage.validate();
    }
}

pub struct ConfigLoader {
    config_path: PathBuf,
}

impl ConfigLoader {
    pub fn new() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .context("Failed to determine config directory")?
            .join("umgpp");

        fs::create_dir_all(&config_dir).context("Failed to create config directory")?;

        let config_path = config_dir.join("config.toml");

        Ok(Self { config_path })
    }

    pub fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    pub fn load_or_create(&self) -> Result<Config> {
        if !self.config_path.exists() {
            let default_config = Config::default();
            self.save(&default_config)?;
            Ok(default_config)
        } else {
            self.load_and_normalize()
        }
    }

    fn load_and_normalize(&self) -> Result<Config> {
        let content =
            fs::read_to_string(&self.config_path).context("Failed to read config file")?;

        let mut config: Config = match toml::from_str(&content) {
            Ok(c) => c,
            Err(e) => {
                let backup_path = self.config_path.with_extension("toml.backup");
                fs::write(&backup_path, &content).context("Failed to write backup")?;

                log_error!(
                    "Config file corrupted: {}. Backup saved to {:?}. Using defaults.",
                    e,
                    backup_path
                );

                let default = Config::default();
                self.save(&default)?;
                return Ok(default);
            }
        };

        config.validate();

        let current_toml = toml::to_string_pretty(&config).context("Failed to serialize config")?;

        if content.trim() != current_toml.trim() {
            self.save(&config)?;
        }

        Ok(config)
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        let toml_string = toml::to_string_pretty(config).context("Failed to serialize config")?;

        fs::write(&self.config_path, toml_string).context("Failed to write config file")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_is_all_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.rover.url, "http://192.168.1.100");
        assert_eq!(config.rover.timeout_secs, 5);
        assert!(config.storage.programs_dir.ends_with("programas"));
    }

    #[test]
    fn partial_toml_fills_the_rest() {
        let config: Config = toml::from_str("[rover]\nurl = \"http://10.0.0.7\"\n").unwrap();
        assert_eq!(config.rover.url, "http://10.0.0.7");
        assert_eq!(config.rover.timeout_secs, 5);
    }

    #[test]
    fn toml_round_trip() {
        let config = Config::default();
        let rendered = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed.rover.url, config.rover.url);
        assert_eq!(parsed.storage.programs_dir, config.storage.programs_dir);
    }

    #[test]
    fn validation_resets_bad_values() {
        let mut config = Config::default();
        config.rover.url = "ftp://rover".to_string();
        config.rover.timeout_secs = 0;
        config.validate();
        assert_eq!(config.rover.url, "http://192.168.1.100");
        assert_eq!(config.rover.timeout_secs, 5);
    }
}
