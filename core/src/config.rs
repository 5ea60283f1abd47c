//! Configuration management for watched ports and notifications.
//!
//! Stores configuration in JSON format at `~/.port-assassin/config.json`:
//!
//! ```json
//! { "watched_ports": [3000, 8080], "notifications_enabled": true }
//! ```

use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::domain::WatchConfig;
use crate::error::ConfigError;
use crate::ports::ConfigProvider;

/// Directory under the home directory holding the config file.
const CONFIG_DIR: &str = ".port-assassin";
const CONFIG_FILE: &str = "config.json";

/// Configuration store backed by a JSON file.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    /// Path to the configuration file.
    config_path: PathBuf,
}

impl ConfigStore {
    /// Create a new config store with the default path.
    ///
    /// Default path: `~/.port-assassin/config.json`
    pub fn new() -> Result<Self, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDirectory)?;
        Ok(Self::with_path(home.join(CONFIG_DIR).join(CONFIG_FILE)))
    }

    /// Create a config store with a custom path.
    pub fn with_path(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Load configuration from disk.
    ///
    /// Returns the default config if the file doesn't exist.
    pub async fn load(&self) -> Result<WatchConfig, ConfigError> {
        let content = match fs::read_to_string(&self.config_path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(WatchConfig::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    action: "read",
                    source,
                })
            }
        };

        let config: WatchConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to disk.
    ///
    /// Creates the config directory if it doesn't exist.
    pub async fn save(&self, config: &WatchConfig) -> Result<(), ConfigError> {
        config.validate()?;

        if let Some(config_dir) = self.config_path.parent() {
            fs::create_dir_all(config_dir)
                .await
                .map_err(|source| ConfigError::Io {
                    action: "create directory for",
                    source,
                })?;
        }

        let content = serde_json::to_string_pretty(config)?;

        // Write atomically by writing to temp file then renaming
        let temp_path = self.config_path.with_extension("json.tmp");
        let write_err = |source| ConfigError::Io {
            action: "write",
            source,
        };

        let mut file = fs::File::create(&temp_path).await.map_err(write_err)?;
        file.write_all(content.as_bytes())
            .await
            .map_err(write_err)?;
        file.sync_all().await.map_err(write_err)?;
        fs::rename(&temp_path, &self.config_path)
            .await
            .map_err(write_err)?;

        debug!(path = %self.config_path.display(), "Saved config");
        Ok(())
    }

    /// Add a watched port. Returns false if it was already watched.
    pub async fn add_watched_port(&self, port: u16) -> Result<bool, ConfigError> {
        let mut config = self.load().await?;
        if !config.watch(port)? {
            return Ok(false);
        }
        self.save(&config).await?;
        Ok(true)
    }

    /// Remove a watched port. Returns false if it was not watched.
    pub async fn remove_watched_port(&self, port: u16) -> Result<bool, ConfigError> {
        let mut config = self.load().await?;
        if !config.unwatch(port) {
            return Ok(false);
        }
        self.save(&config).await?;
        Ok(true)
    }

    /// Turn watch notifications on or off.
    pub async fn set_notifications_enabled(&self, enabled: bool) -> Result<(), ConfigError> {
        let mut config = self.load().await?;
        config.notifications_enabled = enabled;
        self.save(&config).await
    }
}

impl ConfigProvider for ConfigStore {
    async fn load(&self) -> Result<WatchConfig, ConfigError> {
        ConfigStore::load(self).await
    }

    async fn save(&self, config: &WatchConfig) -> Result<(), ConfigError> {
        ConfigStore::save(self, config).await
    }
}
