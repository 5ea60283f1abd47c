//! Process terminator port (interface).

use crate::error::KillError;

/// A secret handed to the privilege elevation helper.
///
/// Never printed: `Debug` is redacted and there is no `Display`.
#[derive(Clone)]
pub struct Credential(String);

impl Credential {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub(crate) fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Port for killing processes.
///
/// Runs independently of the watch loop and never touches its state.
pub trait ProcessTerminator: Send + Sync {
    /// Kill a process immediately (SIGKILL).
    fn terminate(&self, pid: u32) -> impl std::future::Future<Output = Result<(), KillError>> + Send;

    /// Kill a process gracefully (SIGTERM, then SIGKILL after a grace period).
    fn terminate_gracefully(
        &self,
        pid: u32,
    ) -> impl std::future::Future<Output = Result<(), KillError>> + Send;

    /// Kill a process with elevated privileges, authenticating with `credential`.
    fn terminate_with_elevation(
        &self,
        pid: u32,
        credential: &Credential,
    ) -> impl std::future::Future<Output = Result<(), KillError>> + Send;

    /// Check if a process is still running.
    fn is_running(&self, pid: u32) -> bool;
}
