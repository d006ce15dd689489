use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use super::errors::CoachError;

/// Global SwimCoach configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Upper bound for any single external command, in seconds
    #[serde(default = "default_command_timeout_secs")]
    pub command_timeout_secs: u64,

    /// Shell startup time above which a recommendation is emitted
    #[serde(default = "default_startup_threshold_ms")]
    pub shell_startup_threshold_ms: u64,

    /// Directory under $HOME that receives config backups
    #[serde(default = "default_backup_dir_name")]
    pub backup_dir_name: String,

    /// Whether `clean` and `organize` run as dry runs unless `--apply` is given
    #[serde(default = "default_dry_run")]
    pub default_dry_run: bool,

    /// Additional cache directories to measure during `clean --caches`
    #[serde(default)]
    pub extra_cache_dirs: Vec<String>,

    /// Also write logs to ~/.swimcoach/logs
    #[serde(default)]
    pub log_to_file: bool,

    /// Output format preference
    #[serde(default)]
    pub output_format: OutputFormat,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
    Quiet,
}

fn default_command_timeout_secs() -> u64 {
    30
}
fn default_startup_threshold_ms() -> u64 {
    500
}
fn default_backup_dir_name() -> String {
    "terminal_coach_backup".to_string()
}
fn default_dry_run() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            command_timeout_secs: default_command_timeout_secs(),
            shell_startup_threshold_ms: default_startup_threshold_ms(),
            backup_dir_name: default_backup_dir_name(),
            default_dry_run: default_dry_run(),
            extra_cache_dirs: Vec::new(),
            log_to_file: false,
            output_format: OutputFormat::Human,
        }
    }
}

impl Config {
    /// Get the SwimCoach data directory (~/.swimcoach)
    pub fn data_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join(".swimcoach")
    }

    /// Get the config file path
    pub fn config_path() -> PathBuf {
        Self::data_dir().join("config.toml")
    }

    /// Get the logs directory
    pub fn logs_dir() -> PathBuf {
        Self::data_dir().join("logs")
    }

    /// Load config from file, or fall back to defaults if not exists
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            let config: Config = toml::from_str(&contents).map_err(|e| CoachError::ConfigError {
                path: path.clone(),
                message: e.to_string(),
            })?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        let dir = Self::data_dir();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create config dir: {}", dir.display()))?;
        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    /// Initialize all SwimCoach directories
    pub fn init_dirs() -> Result<()> {
        for dir in &[Self::data_dir(), Self::logs_dir()] {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        }
        Ok(())
    }

    /// Set a single key from its string form (used by `config set`)
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), CoachError> {
        let invalid = || CoachError::InvalidConfigValue {
            key: key.to_string(),
            value: value.to_string(),
        };

        match key {
            "command_timeout_secs" => {
                self.command_timeout_secs = value.parse().map_err(|_| invalid())?;
            }
            "shell_startup_threshold_ms" => {
                self.shell_startup_threshold_ms = value.parse().map_err(|_| invalid())?;
            }
            "backup_dir_name" => {
                if value.trim().is_empty() || value.contains('/') {
                    return Err(invalid());
                }
                self.backup_dir_name = value.to_string();
            }
            "default_dry_run" => {
                self.default_dry_run = value.parse().map_err(|_| invalid())?;
            }
            "log_to_file" => {
                self.log_to_file = value.parse().map_err(|_| invalid())?;
            }
            "extra_cache_dirs" => {
                self.extra_cache_dirs = value
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect();
            }
            "output_format" => {
                self.output_format = match value {
                    "human" => OutputFormat::Human,
                    "json" => OutputFormat::Json,
                    "quiet" => OutputFormat::Quiet,
                    _ => return Err(invalid()),
                };
            }
            _ => {
                return Err(CoachError::UnknownConfigKey {
                    key: key.to_string(),
                })
            }
        }
        Ok(())
    }

    /// Per-command timeout as a `Duration`
    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }
}
