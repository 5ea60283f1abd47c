//! Transition detection for watched ports.

use std::collections::{HashMap, HashSet};

use super::{PortObservation, Snapshot, TransitionEvent};

/// Diffs consecutive snapshots of the watched ports.
///
/// Holds the last known owner of every watched port that was taken in the most
/// recently processed cycle. A port without an entry was last seen free, or has
/// never been seen at all: the first cycle that observes an occupied port emits
/// `Taken` for it even if the process was already running.
#[derive(Debug, Default)]
pub struct TransitionDetector {
    last_owner: HashMap<u16, u32>,
}

impl TransitionDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compare `current` against the previous cycle for every port in `watched`.
    ///
    /// Events come out in the order of `watched`. Once all ports are processed
    /// the new owners become the baseline, and state for ports that are no
    /// longer watched is dropped.
    pub fn diff(&mut self, current: &Snapshot, watched: &[u16]) -> Vec<TransitionEvent> {
        let mut events = Vec::new();
        let mut seen = HashSet::with_capacity(watched.len());

        for &port in watched {
            if !seen.insert(port) {
                continue;
            }

            // pid 0 cannot own a port
            let owner = current.get(port).filter(|obs| obs.has_owner());
            let previous = self.last_owner.get(&port).copied();

            if let Some(event) = transition(port, owner, previous) {
                events.push(event);
            }

            match owner {
                Some(obs) => {
                    self.last_owner.insert(port, obs.pid);
                }
                None => {
                    self.last_owner.remove(&port);
                }
            }
        }

        self.last_owner.retain(|port, _| seen.contains(port));
        events
    }

    /// Last known owner of a watched port, if it was taken last cycle.
    pub fn owner_of(&self, port: u16) -> Option<u32> {
        self.last_owner.get(&port).copied()
    }

    /// Number of watched ports currently tracked as taken.
    pub fn tracked(&self) -> usize {
        self.last_owner.len()
    }
}

fn transition(
    port: u16,
    owner: Option<&PortObservation>,
    previous: Option<u32>,
) -> Option<TransitionEvent> {
    match (owner, previous) {
        (Some(obs), None) => Some(TransitionEvent::Taken {
            port,
            pid: obs.pid,
            process_name: obs.process_name.clone(),
        }),
        (None, Some(last_pid)) => Some(TransitionEvent::Freed { port, last_pid }),
        (Some(obs), Some(last_pid)) if obs.pid != last_pid => Some(TransitionEvent::Changed {
            port,
            new_pid: obs.pid,
            process_name: obs.process_name.clone(),
        }),
        _ => None,
    }
}
