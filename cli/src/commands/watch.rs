//! Watch commands - manage the watch list and run the watch loop.

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;
use port_assassin_core::{
    ChannelSink, ConfigStore, LsofEnumerator, PortObservation, TransitionEvent, WatchLoop,
};
use serde_json::json;
use tracing::{info, warn};

pub async fn run(interval_secs: u64, json: bool) -> Result<()> {
    anyhow::ensure!(interval_secs > 0, "Interval must be at least one second");

    let store = ConfigStore::new()?;
    let config = store.load().await?;
    if config.watched_ports.is_empty() {
        eprintln!("No watched ports yet. Add one with `port-assassin watch add <PORT>`.");
    } else if !config.notifications_enabled {
        eprintln!("Notifications are off. Enable them with `port-assassin notifications on`.");
    }

    let (sink, mut events) = ChannelSink::new();
    let handle = WatchLoop::new(LsofEnumerator::new(), store, sink)
        .with_interval(Duration::from_secs(interval_secs))
        .spawn();

    info!(interval_secs, "Watching ports, press Ctrl-C to stop");

    loop {
        tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                signal.context("Failed to listen for Ctrl-C")?;
                break;
            }
            event = events.recv() => match event {
                Some(event) => print_event(&event, json)?,
                None => break,
            },
        }
    }

    handle.stop().await;
    Ok(())
}

fn print_event(event: &TransitionEvent, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(event)?);
    } else {
        println!("[{}] {}", Local::now().format("%H:%M:%S"), event);
    }
    Ok(())
}

pub async fn add(port: u16) -> Result<()> {
    let store = ConfigStore::new()?;
    if store.add_watched_port(port).await? {
        println!("Watching port {}", port);
    } else {
        println!("Port {} is already watched", port);
    }
    Ok(())
}

pub async fn remove(port: u16) -> Result<()> {
    let store = ConfigStore::new()?;
    if store.remove_watched_port(port).await? {
        println!("Stopped watching port {}", port);
    } else {
        println!("Port {} was not watched", port);
    }
    Ok(())
}

pub async fn list(json: bool) -> Result<()> {
    let config = ConfigStore::new()?.load().await?;

    if config.watched_ports.is_empty() {
        if json {
            println!("[]");
        } else {
            println!("No watched ports.");
        }
        return Ok(());
    }

    // one snapshot for every port, so the listing is consistent
    let owners = match super::port_service().owners_of(&config.watched_ports).await {
        Ok(owners) => owners,
        Err(e) => {
            warn!(error = %e, "Failed to read port owners");
            eprintln!("Could not check who owns the watched ports: {}", e);
            for port in &config.watched_ports {
                println!("{}", port);
            }
            return Ok(());
        }
    };

    if json {
        let entries: Vec<_> = owners
            .iter()
            .map(|(port, owner)| json!({ "port": port, "owner": owner }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    for (port, owner) in &owners {
        println!("{}", describe_owner(*port, owner.as_ref()));
    }
    Ok(())
}

fn describe_owner(port: u16, owner: Option<&PortObservation>) -> String {
    match owner {
        Some(owner) => format!(
            "{:<6} taken by {} (PID {})",
            port, owner.process_name, owner.pid
        ),
        None => format!("{:<6} free", port),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_owner() {
        let node = PortObservation::new(3000, 100, "node");
        assert_eq!(
            describe_owner(3000, Some(&node)),
            "3000   taken by node (PID 100)"
        );
        assert_eq!(describe_owner(8080, None), "8080   free");
    }
}
