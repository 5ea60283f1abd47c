//! Example: Watch the ports given on the command line for 30 seconds.
//!
//! ```text
//! cargo run -p port-assassin-core --example watch_ports -- 3000 8080
//! ```

use std::time::Duration;

use port_assassin_core::{
    ChannelSink, ConfigError, ConfigProvider, LsofEnumerator, WatchConfig, WatchLoop,
};

/// Config that never changes and is never persisted.
struct FixedConfig(WatchConfig);

impl ConfigProvider for FixedConfig {
    async fn load(&self) -> Result<WatchConfig, ConfigError> {
        Ok(self.0.clone())
    }

    async fn save(&self, _config: &WatchConfig) -> Result<(), ConfigError> {
        Ok(())
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let ports: Vec<u16> = std::env::args().skip(1).filter_map(|a| a.parse().ok()).collect();
    if ports.is_empty() {
        eprintln!("usage: watch_ports <PORT>...");
        return;
    }

    println!("Watching {:?} for 30 seconds...\n", ports);

    let (sink, mut events) = ChannelSink::new();
    let handle = WatchLoop::new(
        LsofEnumerator::new(),
        FixedConfig(WatchConfig::watching(ports)),
        sink,
    )
    .spawn();

    let deadline = tokio::time::sleep(Duration::from_secs(30));
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            _ = &mut deadline => break,
            event = events.recv() => match event {
                Some(event) => println!("{}", event),
                None => break,
            },
        }
    }

    handle.stop().await;
}
