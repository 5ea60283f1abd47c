//! Port enumerator adapters.
//!
//! Lists listening sockets by running `lsof` in field-output mode.

mod parser;

use std::ffi::OsString;
use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

use crate::domain::Snapshot;
use crate::error::EnumerationError;
use crate::ports::PortEnumerator;

pub use parser::parse_lsof_fields;

/// Exit status lsof uses when nothing matched the selection.
const NO_MATCHES_EXIT_CODE: i32 = 1;

/// Arguments for listing listening TCP sockets.
///
/// Flags explained:
/// - -iTCP: Show only TCP sockets
/// - -sTCP:LISTEN: Show only listening sockets
/// - -P: Show port numbers (don't resolve to service names)
/// - -n: Show IP addresses (don't resolve to hostnames)
/// - -F pcn: Emit pid, command and name fields, one per line
const LSOF_ARGS: [&str; 6] = ["-iTCP", "-sTCP:LISTEN", "-P", "-n", "-F", "pcn"];

/// Enumerates listening sockets with `lsof`.
pub struct LsofEnumerator {
    program: OsString,
    args: Vec<OsString>,
}

impl LsofEnumerator {
    /// Create an enumerator running `lsof` from `PATH`.
    pub fn new() -> Self {
        Self::with_command("lsof", LSOF_ARGS)
    }

    /// Create an enumerator running an arbitrary command that prints lsof
    /// field output.
    pub fn with_command<P, I, A>(program: P, args: I) -> Self
    where
        P: Into<OsString>,
        I: IntoIterator<Item = A>,
        A: Into<OsString>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    fn program_name(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }
}

impl Default for LsofEnumerator {
    fn default() -> Self {
        Self::new()
    }
}

impl PortEnumerator for LsofEnumerator {
    async fn snapshot(&self) -> Result<Snapshot, EnumerationError> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|source| EnumerationError::Unavailable {
                program: self.program_name(),
                source,
            })?;

        let snapshot = interpret_output(
            &self.program_name(),
            output.status.code(),
            &output.stdout,
            &output.stderr,
        )?;
        debug!(sockets = snapshot.len(), "Enumerated listening sockets");
        Ok(snapshot)
    }
}

/// Turn the raw result of an lsof run into a snapshot.
///
/// The "no matches" status is not a failure: whatever lsof printed (nothing,
/// when no socket listens) is parsed as usual.
fn interpret_output(
    program: &str,
    code: Option<i32>,
    stdout: &[u8],
    stderr: &[u8],
) -> Result<Snapshot, EnumerationError> {
    if !matches!(code, Some(0) | Some(NO_MATCHES_EXIT_CODE)) {
        return Err(EnumerationError::UnexpectedExit {
            program: program.to_string(),
            code,
            stderr: String::from_utf8_lossy(stderr).trim().to_string(),
        });
    }

    let stdout = std::str::from_utf8(stdout).map_err(|e| {
        EnumerationError::InvalidOutput(format!("Invalid UTF-8 in {} output: {}", program, e))
    })?;

    Ok(parse_lsof_fields(stdout).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_matches_is_empty_snapshot() {
        let snapshot = interpret_output("lsof", Some(1), b"", b"").unwrap();
        assert!(snapshot.is_empty());
    }

    #[test]
    fn test_success_is_parsed() {
        let snapshot = interpret_output("lsof", Some(0), b"p100\ncnode\nn*:3000\n", b"").unwrap();
        assert_eq!(snapshot.get(3000).unwrap().pid, 100);
    }

    #[test]
    fn test_unexpected_exit_is_error() {
        let err = interpret_output("lsof", Some(2), b"", b"lsof: bad option\n").unwrap_err();
        match err {
            EnumerationError::UnexpectedExit { code, stderr, .. } => {
                assert_eq!(code, Some(2));
                assert_eq!(stderr, "lsof: bad option");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_killed_by_signal_is_error() {
        let result = interpret_output("lsof", None, b"", b"");
        assert!(matches!(
            result,
            Err(EnumerationError::UnexpectedExit { code: None, .. })
        ));
    }

    #[test]
    fn test_invalid_utf8_is_error() {
        let result = interpret_output("lsof", Some(0), &[b'p', 0xff, 0xfe], b"");
        assert!(matches!(result, Err(EnumerationError::InvalidOutput(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_snapshot_runs_command() {
        let enumerator =
            LsofEnumerator::with_command("sh", ["-c", "printf 'p100\\ncnode\\nn*:3000\\nn*:3001\\n'"]);
        let snapshot = enumerator.snapshot().await.unwrap();

        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.get(3001).unwrap().process_name, "node");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_snapshot_no_matches_exit() {
        let enumerator = LsofEnumerator::with_command("sh", ["-c", "exit 1"]);
        let snapshot = enumerator.snapshot().await;
        tokio_test::assert_ok!(&snapshot);
        assert!(snapshot.unwrap().is_empty());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_snapshot_failure_exit() {
        let enumerator = LsofEnumerator::with_command("sh", ["-c", "echo broken >&2; exit 3"]);
        let result = enumerator.snapshot().await;
        assert!(matches!(
            result,
            Err(EnumerationError::UnexpectedExit { code: Some(3), .. })
        ));
    }

    #[tokio::test]
    async fn test_missing_program_is_unavailable() {
        let enumerator =
            LsofEnumerator::with_command("/nonexistent/port-assassin/lsof", Vec::<String>::new());
        let result = enumerator.snapshot().await;
        assert!(matches!(result, Err(EnumerationError::Unavailable { .. })));
    }
}
