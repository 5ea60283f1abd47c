//! Ports layer - Trait definitions (interfaces).
//!
//! This module defines the interfaces that the application layer uses
//! to interact with external systems. Implementations live in `adapters`.

mod config;
mod enumerator;
mod killer;
mod sink;

pub use config::ConfigProvider;
pub use enumerator::PortEnumerator;
pub use killer::{Credential, ProcessTerminator};
pub use sink::NotificationSink;
