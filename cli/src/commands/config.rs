//! Config commands - show and edit the persisted configuration.

use anyhow::Result;
use port_assassin_core::ConfigStore;

pub async fn show(json: bool) -> Result<()> {
    let store = ConfigStore::new()?;
    let config = store.load().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    println!("Config file: {}", store.path().display());
    println!("{}", config);
    Ok(())
}

pub async fn set_notifications(enabled: bool) -> Result<()> {
    let store = ConfigStore::new()?;
    store.set_notifications_enabled(enabled).await?;

    let state = if enabled { "on" } else { "off" };
    println!("Notifications turned {}", state);
    Ok(())
}
