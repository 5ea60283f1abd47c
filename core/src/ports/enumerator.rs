//! Port enumerator port (interface).

use crate::domain::Snapshot;
use crate::error::EnumerationError;

/// Port for listing the host's listening TCP sockets.
///
/// Implementations shell out to OS tooling; tests substitute a scripted fake.
pub trait PortEnumerator: Send + Sync {
    /// Take a fresh snapshot of every listening TCP socket.
    ///
    /// No listening sockets at all is an empty snapshot, not an error.
    fn snapshot(
        &self,
    ) -> impl std::future::Future<Output = Result<Snapshot, EnumerationError>> + Send;
}
