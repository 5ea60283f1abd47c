//! Subcommand implementations.

pub mod config;
pub mod kill;
pub mod list;
pub mod watch;

use port_assassin_core::{LsofEnumerator, PortService};

/// Listing and kill service over lsof and Unix signals.
#[cfg(unix)]
pub fn port_service() -> PortService<LsofEnumerator, port_assassin_core::SignalTerminator> {
    PortService::new(LsofEnumerator::new(), port_assassin_core::SignalTerminator::new())
}

/// Listing-only service; killing needs Unix signals.
#[cfg(not(unix))]
pub fn port_service() -> PortService<LsofEnumerator, ()> {
    PortService::new(LsofEnumerator::new(), ())
}
