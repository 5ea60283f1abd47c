//! Application layer - Use case services.
//!
//! This module contains application services that orchestrate
//! domain logic and adapter interactions.
//!
//! Services are designed to be thin orchestrators that:
//! - Accept domain types as inputs
//! - Use ports (traits) for external dependencies
//! - Return domain types as outputs

mod port_service;
mod watch_loop;

pub use port_service::PortService;
pub use watch_loop::{
    CycleOutcome, WatchHandle, WatchLoop, DEFAULT_WATCH_INTERVAL, MIN_WATCH_INTERVAL,
};
