//! Listening socket observations and per-cycle snapshots.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One listening TCP socket and the process that owns it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortObservation {
    /// The port number (1..=65535).
    pub port: u16,
    /// Process ID of the owner. 0 means no owner could be attributed.
    pub pid: u32,
    /// Command name reported for the owner.
    #[serde(rename = "process")]
    pub process_name: String,
}

impl PortObservation {
    pub fn new(port: u16, pid: u32, process_name: impl Into<String>) -> Self {
        Self {
            port,
            pid,
            process_name: process_name.into(),
        }
    }

    /// Whether this observation names an actual owner.
    pub fn has_owner(&self) -> bool {
        self.pid != 0
    }
}

impl std::fmt::Display for PortObservation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (PID {}) on port {}", self.process_name, self.pid, self.port)
    }
}

/// Every listening socket seen during one enumeration.
///
/// Observations keep the order the OS reported them in. Port lookups resolve
/// to the first observation reported for that port, so a process listening on
/// both IPv4 and IPv6 (or several processes sharing a port) map to one owner.
/// First-wins is deliberate: a later entry for the same port never replaces
/// the owner reported first, even when it names another pid.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    observations: Vec<PortObservation>,
    by_port: HashMap<u16, usize>,
}

impl Snapshot {
    /// An empty snapshot: nothing is listening.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Look up the owner of a port.
    pub fn get(&self, port: u16) -> Option<&PortObservation> {
        self.by_port.get(&port).map(|&idx| &self.observations[idx])
    }

    /// Whether anything listens on the port.
    pub fn contains(&self, port: u16) -> bool {
        self.by_port.contains_key(&port)
    }

    /// All observations in reporting order.
    pub fn iter(&self) -> impl Iterator<Item = &PortObservation> {
        self.observations.iter()
    }

    /// Number of observations (not distinct ports).
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Distinct listening ports, in no particular order.
    pub fn ports(&self) -> impl Iterator<Item = u16> + '_ {
        self.by_port.keys().copied()
    }

    pub fn into_observations(self) -> Vec<PortObservation> {
        self.observations
    }
}

impl FromIterator<PortObservation> for Snapshot {
    fn from_iter<I: IntoIterator<Item = PortObservation>>(iter: I) -> Self {
        let mut snapshot = Snapshot::default();
        for observation in iter {
            let idx = snapshot.observations.len();
            snapshot.by_port.entry(observation.port).or_insert(idx);
            snapshot.observations.push(observation);
        }
        snapshot
    }
}

impl From<Vec<PortObservation>> for Snapshot {
    fn from(observations: Vec<PortObservation>) -> Self {
        observations.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_port() {
        let snapshot: Snapshot = vec![
            PortObservation::new(3000, 100, "node"),
            PortObservation::new(5432, 200, "postgres"),
        ]
        .into();

        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.get(5432).unwrap().process_name, "postgres");
        assert!(snapshot.get(8080).is_none());
        assert!(snapshot.contains(3000));
    }

    #[test]
    fn test_first_observation_owns_shared_port() {
        let snapshot: Snapshot = vec![
            PortObservation::new(8080, 10, "nginx"),
            PortObservation::new(8080, 11, "nginx-worker"),
        ]
        .into();

        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.ports().count(), 1);
        assert_eq!(snapshot.get(8080).unwrap().pid, 10);
    }

    #[test]
    fn test_serialized_field_names() {
        let json = serde_json::to_value(PortObservation::new(3000, 1, "node")).unwrap();
        assert_eq!(json["port"], 3000);
        assert_eq!(json["pid"], 1);
        assert_eq!(json["process"], "node");
    }
}
