//! Configuration provider port (interface).

use crate::domain::WatchConfig;
use crate::error::ConfigError;

/// Port for configuration persistence.
///
/// The watch loop calls `load` once per cycle; user-facing surfaces call
/// `save` after editing the watch list or the notification switch.
pub trait ConfigProvider: Send + Sync {
    /// Load the current configuration.
    fn load(&self) -> impl std::future::Future<Output = Result<WatchConfig, ConfigError>> + Send;

    /// Persist a configuration, replacing the stored one.
    fn save(
        &self,
        config: &WatchConfig,
    ) -> impl std::future::Future<Output = Result<(), ConfigError>> + Send;
}
