//! Adapters layer - External system implementations.
//!
//! This module contains implementations of the port traits defined in `ports`.
//! Each adapter handles communication with external systems.

pub mod enumerator;
#[cfg(unix)]
pub mod killer;
pub mod sink;

// Re-export main types for convenience
pub use enumerator::LsofEnumerator;
#[cfg(unix)]
pub use killer::SignalTerminator;
pub use sink::{ChannelSink, LogSink};
