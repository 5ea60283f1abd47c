//! Parser for `lsof -F pcn` field output.
//!
//! Each line starts with a one-character field tag:
//! ```text
//! p34805        <- process id, opens a new process set
//! cnode         <- command name of that process
//! f19           <- file descriptor (ignored)
//! n*:3000       <- socket name, one per listening socket
//! n[::1]:3000
//! ```

use tracing::trace;

use crate::domain::PortObservation;

/// Parse lsof field output into observations.
///
/// Name lines seen before any valid pid are dropped since they cannot be
/// attributed to a process. Lines whose port is missing or not a number are
/// skipped without aborting the rest of the parse.
pub fn parse_lsof_fields(output: &str) -> Vec<PortObservation> {
    let mut observations = Vec::new();
    let mut current_pid: Option<u32> = None;
    let mut current_command = String::new();

    for line in output.lines() {
        let mut chars = line.chars();
        let Some(tag) = chars.next() else {
            continue;
        };
        let value = chars.as_str();

        match tag {
            'p' => {
                // new process set: drop the old command, and an unparseable pid clears the owner
                current_pid = value.trim().parse().ok().filter(|&pid| pid != 0);
                current_command.clear();
            }
            'c' => current_command = value.to_string(),
            'n' => {
                let Some(pid) = current_pid else {
                    trace!(line, "Skipping socket without owning pid");
                    continue;
                };
                let Some(port) = port_from_address(value) else {
                    trace!(line, "Skipping socket with unparseable port");
                    continue;
                };
                observations.push(PortObservation::new(port, pid, current_command.clone()));
            }
            _ => {}
        }
    }

    observations
}

/// Extract the port after the last colon of an address.
///
/// Handles `*:8080`, `127.0.0.1:3000` and `[::1]:3000`.
fn port_from_address(address: &str) -> Option<u16> {
    let (_, port) = address.rsplit_once(':')?;
    port.trim().parse().ok().filter(|&port| port != 0)
}
