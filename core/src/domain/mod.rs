//! Domain layer - Pure business logic and data models.
//!
//! This module contains domain entities that represent core business concepts.
//! These types have no I/O dependencies and can be tested in isolation.

mod detector;
mod event;
mod observation;
mod watched;

// Re-export all domain types
pub use detector::TransitionDetector;
pub use event::TransitionEvent;
pub use observation::{PortObservation, Snapshot};
pub use watched::WatchConfig;
