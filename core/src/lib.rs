//! Port Assassin Core Library
//!
//! Watches TCP listening ports and reports when processes take, free, or
//! change hands on a configured set of ports. Provides functionality to:
//! - List listening TCP ports and their owning processes
//! - Detect transitions (taken, freed, changed) on watched ports
//! - Run a periodic, cancellable watch loop feeding a notification sink
//! - Kill processes by PID, optionally through `sudo`
//! - Persist the watch list and notification switch
//!
//! # Architecture
//! This library follows hexagonal architecture (ports & adapters):
//! - `domain`: Pure business logic and data models
//! - `ports`: Trait definitions (interfaces)
//! - `adapters`: External system implementations
//! - `application`: Use case services
//!
//! # Platform Support
//! Unix hosts with `lsof` available (macOS, Linux).

// Hexagonal architecture layers
pub mod adapters;
pub mod application;
pub mod domain;
pub mod ports;

pub mod config;
pub mod error;

// Re-export domain types (primary API)
pub use domain::{PortObservation, Snapshot, TransitionDetector, TransitionEvent, WatchConfig};

// Re-export other commonly used types
pub use adapters::{ChannelSink, LogSink, LsofEnumerator};
#[cfg(unix)]
pub use adapters::SignalTerminator;
pub use application::{
    CycleOutcome, PortService, WatchHandle, WatchLoop, DEFAULT_WATCH_INTERVAL, MIN_WATCH_INTERVAL,
};
pub use config::ConfigStore;
pub use error::{ConfigError, EnumerationError, Error, KillError, Result};
pub use ports::{ConfigProvider, Credential, NotificationSink, PortEnumerator, ProcessTerminator};
