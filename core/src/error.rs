//! Error types for the port-assassin-core library.

use thiserror::Error;

/// Result type alias for port-assassin operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while listing the host's listening sockets.
///
/// Inside the watch loop these are transient: the cycle is skipped and the
/// next tick tries again.
#[derive(Error, Debug)]
pub enum EnumerationError {
    /// The listing command could not be started (missing binary, no permission).
    #[error("Failed to run {program}: {source}")]
    Unavailable {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The listing command exited with an unexpected status.
    #[error("{program} exited with status {code:?}: {stderr}")]
    UnexpectedExit {
        program: String,
        code: Option<i32>,
        stderr: String,
    },

    /// The command output was not valid text.
    #[error("Failed to parse output: {0}")]
    InvalidOutput(String),
}

/// Errors raised while reading or writing the persisted configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The home directory could not be determined.
    #[error("Could not determine home directory")]
    NoHomeDirectory,

    /// Reading or writing the config file failed.
    #[error("Failed to {action} config: {source}")]
    Io {
        action: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid JSON for the expected shape.
    #[error("Failed to parse config: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The config holds a value outside its allowed range.
    #[error("Invalid port {0}: ports must be in 1..=65535")]
    InvalidPort(u16),
}

/// Errors raised when terminating a process.
///
/// Unlike the other error kinds these are always reported back to the caller.
#[derive(Error, Debug)]
pub enum KillError {
    /// The pid cannot name a single process (0, or beyond the platform range).
    #[error("Invalid process id {0}")]
    InvalidPid(u32),

    /// The specified process was not found.
    #[error("Process with PID {0} not found")]
    ProcessNotFound(u32),

    /// Permission denied to kill the process.
    #[error("Permission denied to kill process {0}")]
    PermissionDenied(u32),

    /// The elevation helper refused the supplied credential.
    #[error("Credential rejected while elevating to kill process {0}")]
    CredentialRejected(u32),

    /// Failed to execute the kill command or signal.
    #[error("Failed to execute kill command: {0}")]
    CommandFailed(String),

    /// An I/O error occurred talking to the elevation helper.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Umbrella error for callers that touch several subsystems.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Enumeration(#[from] EnumerationError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Kill(#[from] KillError),
}
