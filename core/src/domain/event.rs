//! Transition events emitted for watched ports.

use serde::{Deserialize, Serialize};

/// A change in a watched port's occupancy between two consecutive cycles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum TransitionEvent {
    /// A process started listening on a previously free port.
    #[serde(rename = "port-taken")]
    Taken {
        port: u16,
        pid: u32,
        #[serde(rename = "process")]
        process_name: String,
    },
    /// The port is no longer listened on.
    #[serde(rename = "port-freed")]
    Freed {
        port: u16,
        #[serde(rename = "lastPid")]
        last_pid: u32,
    },
    /// A different process now owns the port, with no free cycle in between.
    #[serde(rename = "port-changed")]
    Changed {
        port: u16,
        #[serde(rename = "pid")]
        new_pid: u32,
        #[serde(rename = "process")]
        process_name: String,
    },
}

impl TransitionEvent {
    /// The port this event is about.
    pub fn port(&self) -> u16 {
        match self {
            TransitionEvent::Taken { port, .. }
            | TransitionEvent::Freed { port, .. }
            | TransitionEvent::Changed { port, .. } => *port,
        }
    }

    /// Stable event name, matching the serialized `event` tag.
    pub fn name(&self) -> &'static str {
        match self {
            TransitionEvent::Taken { .. } => "port-taken",
            TransitionEvent::Freed { .. } => "port-freed",
            TransitionEvent::Changed { .. } => "port-changed",
        }
    }
}

impl std::fmt::Display for TransitionEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransitionEvent::Taken {
                port,
                pid,
                process_name,
            } => write!(f, "Port {port} taken by {process_name} (PID {pid})"),
            TransitionEvent::Freed { port, last_pid } => {
                write!(f, "Port {port} freed (was PID {last_pid})")
            }
            TransitionEvent::Changed {
                port,
                new_pid,
                process_name,
            } => write!(f, "Port {port} now owned by {process_name} (PID {new_pid})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_tags() {
        let freed = TransitionEvent::Freed {
            port: 8080,
            last_pid: 42,
        };
        let json = serde_json::to_value(&freed).unwrap();
        assert_eq!(json["event"], "port-freed");
        assert_eq!(json["lastPid"], 42);
        assert_eq!(freed.name(), "port-freed");
    }

    #[test]
    fn test_display() {
        let taken = TransitionEvent::Taken {
            port: 3000,
            pid: 100,
            process_name: "node".to_string(),
        };
        assert_eq!(taken.to_string(), "Port 3000 taken by node (PID 100)");
        assert_eq!(taken.port(), 3000);
    }
}
