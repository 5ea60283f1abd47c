//! Watch configuration domain model.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// User settings that drive the watch loop.
///
/// Reloaded by the loop on every cycle, so edits take effect within one tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Ports monitored for transitions, in the order events are reported.
    #[serde(default)]
    pub watched_ports: Vec<u16>,
    /// When false the loop skips enumeration entirely.
    #[serde(default = "default_true")]
    pub notifications_enabled: bool,
}

fn default_true() -> bool {
    true
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            watched_ports: Vec::new(),
            notifications_enabled: true,
        }
    }
}

impl WatchConfig {
    /// Create a config watching the given ports with notifications on.
    pub fn watching(ports: impl IntoIterator<Item = u16>) -> Self {
        Self {
            watched_ports: ports.into_iter().collect(),
            notifications_enabled: true,
        }
    }

    /// Check that every watched port is a real port number.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.watched_ports.iter().find(|&&p| p == 0) {
            Some(&port) => Err(ConfigError::InvalidPort(port)),
            None => Ok(()),
        }
    }

    pub fn is_watched(&self, port: u16) -> bool {
        self.watched_ports.contains(&port)
    }

    /// Add a port to the watch list. Returns false if it was already watched.
    pub fn watch(&mut self, port: u16) -> Result<bool, ConfigError> {
        if port == 0 {
            return Err(ConfigError::InvalidPort(port));
        }
        if self.is_watched(port) {
            return Ok(false);
        }
        self.watched_ports.push(port);
        Ok(true)
    }

    /// Remove a port from the watch list. Returns false if it was not watched.
    pub fn unwatch(&mut self, port: u16) -> bool {
        let before = self.watched_ports.len();
        self.watched_ports.retain(|&p| p != port);
        self.watched_ports.len() != before
    }
}

impl std::fmt::Display for WatchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ports = self
            .watched_ports
            .iter()
            .map(u16::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        let state = if self.notifications_enabled { "on" } else { "off" };

        if ports.is_empty() {
            write!(f, "No watched ports (notifications {})", state)
        } else {
            write!(f, "Watching {} (notifications {})", ports, state)
        }
    }
}
