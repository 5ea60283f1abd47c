//! Unix process termination using signals, with an optional `sudo` path.
//!
//! - SIGKILL for immediate termination
//! - SIGTERM followed by SIGKILL after a grace period for graceful termination
//! - `sudo -S -p "" kill -9 PID` for processes owned by other users, with the
//!   password written to sudo's stdin rather than interpolated into a shell

use std::ffi::OsString;
use std::process::Stdio;

use nix::errno::Errno;
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::{sleep, Duration};
use tracing::{debug, warn};

use crate::error::KillError;
use crate::ports::{Credential, ProcessTerminator};

/// Grace period to wait between SIGTERM and SIGKILL (500ms).
const GRACEFUL_KILL_TIMEOUT: Duration = Duration::from_millis(500);

/// Terminates processes by signalling them directly.
#[derive(Debug)]
pub struct SignalTerminator {
    elevation_program: OsString,
    elevation_args: Vec<OsString>,
    grace_period: Duration,
}

impl SignalTerminator {
    /// Create a terminator that elevates through `sudo`.
    pub fn new() -> Self {
        Self {
            elevation_program: OsString::from("sudo"),
            elevation_args: ["-S", "-p", ""].into_iter().map(OsString::from).collect(),
            grace_period: GRACEFUL_KILL_TIMEOUT,
        }
    }

    /// Use a different elevation helper.
    ///
    /// The helper receives `args` followed by `kill -9 <pid>`, and the
    /// credential plus a newline on stdin.
    pub fn with_elevation_helper<P, I, A>(mut self, program: P, args: I) -> Self
    where
        P: Into<OsString>,
        I: IntoIterator<Item = A>,
        A: Into<OsString>,
    {
        self.elevation_program = program.into();
        self.elevation_args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Change the time allowed between SIGTERM and SIGKILL.
    pub fn with_grace_period(mut self, grace_period: Duration) -> Self {
        self.grace_period = grace_period;
        self
    }

    fn send_signal(&self, pid: u32, signal: Option<Signal>) -> Result<(), KillError> {
        let target = to_nix_pid(pid)?;
        debug!(pid, signal = ?signal, "Sending signal to process");

        kill(target, signal).map_err(|errno| match errno {
            Errno::ESRCH => KillError::ProcessNotFound(pid),
            Errno::EPERM => {
                warn!(pid, "Permission denied to kill process");
                KillError::PermissionDenied(pid)
            }
            other => KillError::CommandFailed(format!("kill {}: {}", pid, other)),
        })
    }
}

impl Default for SignalTerminator {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessTerminator for SignalTerminator {
    async fn terminate(&self, pid: u32) -> Result<(), KillError> {
        self.send_signal(pid, Some(Signal::SIGKILL))
    }

    async fn terminate_gracefully(&self, pid: u32) -> Result<(), KillError> {
        self.send_signal(pid, Some(Signal::SIGTERM))?;
        sleep(self.grace_period).await;

        if !self.is_running(pid) {
            return Ok(());
        }

        debug!(pid, "Process survived SIGTERM, sending SIGKILL");
        match self.send_signal(pid, Some(Signal::SIGKILL)) {
            // exited between the check and the signal
            Err(KillError::ProcessNotFound(_)) => Ok(()),
            other => other,
        }
    }

    async fn terminate_with_elevation(
        &self,
        pid: u32,
        credential: &Credential,
    ) -> Result<(), KillError> {
        to_nix_pid(pid)?;
        debug!(pid, helper = ?self.elevation_program, "Killing process with elevation");

        let mut child = Command::new(&self.elevation_program)
            .args(&self.elevation_args)
            .args(["kill", "-9"])
            .arg(pid.to_string())
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                KillError::CommandFailed(format!(
                    "Failed to run {}: {}",
                    self.elevation_program.to_string_lossy(),
                    e
                ))
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            let mut line = credential.expose().as_bytes().to_vec();
            line.push(b'\n');
            // the helper may not read stdin at all (cached credentials)
            if let Err(e) = stdin.write_all(&line).await {
                if e.kind() != std::io::ErrorKind::BrokenPipe {
                    return Err(e.into());
                }
            }
        }

        let output = child.wait_with_output().await?;
        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(classify_elevation_failure(pid, stderr.trim()))
    }

    fn is_running(&self, pid: u32) -> bool {
        match self.send_signal(pid, None) {
            Ok(()) => true,
            // exists, but belongs to someone else
            Err(KillError::PermissionDenied(_)) => true,
            Err(_) => false,
        }
    }
}

fn to_nix_pid(pid: u32) -> Result<Pid, KillError> {
    // 0 and negative values address process groups
    match i32::try_from(pid) {
        Ok(raw) if raw > 0 => Ok(Pid::from_raw(raw)),
        _ => Err(KillError::InvalidPid(pid)),
    }
}

fn classify_elevation_failure(pid: u32, stderr: &str) -> KillError {
    const REJECTED: [&str; 3] = [
        "Sorry, try again",
        "incorrect password",
        "a password is required",
    ];

    if REJECTED.iter().any(|marker| stderr.contains(marker)) {
        warn!(pid, "Elevation credential rejected");
        KillError::CredentialRejected(pid)
    } else if stderr.contains("No such process") {
        KillError::ProcessNotFound(pid)
    } else if stderr.contains("Operation not permitted") {
        KillError::PermissionDenied(pid)
    } else {
        KillError::CommandFailed(format!("elevated kill of {} failed: {}", pid, stderr))
    }
}
