//! Port listing and process termination application service.

use parking_lot::RwLock;
use tracing::info;

use crate::domain::PortObservation;
use crate::error::Result;
use crate::ports::{Credential, PortEnumerator, ProcessTerminator};

/// Application service for on-demand port listing and kills.
///
/// Independent of the watch loop: it takes its own snapshots and never
/// touches the loop's detector state. Listing only needs the enumerator, so
/// the terminator is only bound where a kill happens.
pub struct PortService<E, K> {
    enumerator: E,
    terminator: K,
    ports_cache: RwLock<Vec<PortObservation>>,
}

impl<E, K> PortService<E, K> {
    /// Create a new port service.
    pub fn new(enumerator: E, terminator: K) -> Self {
        Self {
            enumerator,
            terminator,
            ports_cache: RwLock::new(Vec::new()),
        }
    }

    /// Get all cached ports.
    pub fn get_ports(&self) -> Vec<PortObservation> {
        self.ports_cache.read().clone()
    }

    /// Find the first cached owner of a port.
    pub fn find_by_port(&self, port: u16) -> Option<PortObservation> {
        self.ports_cache
            .read()
            .iter()
            .find(|p| p.port == port)
            .cloned()
    }
}

impl<E: PortEnumerator, K> PortService<E, K> {
    /// Refresh the port cache by enumerating, sorted by port then pid.
    pub async fn refresh(&self) -> Result<()> {
        let mut ports = self.enumerator.snapshot().await?.into_observations();
        ports.sort_by_key(|p| (p.port, p.pid));
        ports.dedup();
        *self.ports_cache.write() = ports;
        Ok(())
    }

    /// Refresh and return every listening socket.
    pub async fn active_ports(&self) -> Result<Vec<PortObservation>> {
        self.refresh().await?;
        Ok(self.get_ports())
    }

    /// Current owner of each of `ports`, all taken from one snapshot.
    ///
    /// A port resolves to the first observation reported for it, the same
    /// owner the watch loop would report. Free ports map to `None`.
    pub async fn owners_of(&self, ports: &[u16]) -> Result<Vec<(u16, Option<PortObservation>)>> {
        let snapshot = self.enumerator.snapshot().await?;
        Ok(ports
            .iter()
            .map(|&port| {
                let owner = snapshot.get(port).filter(|o| o.has_owner()).cloned();
                (port, owner)
            })
            .collect())
    }
}

impl<E: PortEnumerator, K: ProcessTerminator> PortService<E, K> {
    /// Kill a process by PID, immediately or gracefully.
    pub async fn kill(&self, pid: u32, graceful: bool) -> Result<()> {
        if graceful {
            self.terminator.terminate_gracefully(pid).await?;
        } else {
            self.terminator.terminate(pid).await?;
        }
        info!(pid, graceful, "Killed process");
        Ok(())
    }

    /// Kill a process by PID with elevated privileges.
    pub async fn kill_with_password(&self, pid: u32, credential: &Credential) -> Result<()> {
        self.terminator
            .terminate_with_elevation(pid, credential)
            .await?;
        info!(pid, "Killed process with elevation");
        Ok(())
    }

    /// Kill whatever owns `port` and return it, or `None` if nothing listens.
    pub async fn kill_port(&self, port: u16, graceful: bool) -> Result<Option<PortObservation>> {
        self.refresh().await?;
        let Some(owner) = self.find_by_port(port) else {
            return Ok(None);
        };
        self.kill(owner.pid, graceful).await?;
        Ok(Some(owner))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use parking_lot::Mutex;

    use crate::domain::Snapshot;
    use crate::error::{EnumerationError, Error, KillError};

    /// Mock enumerator for testing.
    struct MockEnumerator {
        ports: Vec<PortObservation>,
    }

    impl PortEnumerator for MockEnumerator {
        async fn snapshot(&self) -> std::result::Result<Snapshot, EnumerationError> {
            Ok(self.ports.clone().into())
        }
    }

    /// Mock terminator recording what it was asked to kill.
    #[derive(Default, Clone)]
    struct MockTerminator {
        killed: Arc<Mutex<Vec<(u32, &'static str)>>>,
    }

    impl ProcessTerminator for MockTerminator {
        async fn terminate(&self, pid: u32) -> std::result::Result<(), KillError> {
            if pid == 1 {
                return Err(KillError::PermissionDenied(pid));
            }
            self.killed.lock().push((pid, "force"));
            Ok(())
        }

        async fn terminate_gracefully(&self, pid: u32) -> std::result::Result<(), KillError> {
            self.killed.lock().push((pid, "graceful"));
            Ok(())
        }

        async fn terminate_with_elevation(
            &self,
            pid: u32,
            credential: &Credential,
        ) -> std::result::Result<(), KillError> {
            if credential.expose() != "secret" {
                return Err(KillError::CredentialRejected(pid));
            }
            self.killed.lock().push((pid, "elevated"));
            Ok(())
        }

        fn is_running(&self, pid: u32) -> bool {
            !self.killed.lock().iter().any(|(killed, _)| *killed == pid)
        }
    }

    fn service(terminator: MockTerminator) -> PortService<MockEnumerator, MockTerminator> {
        let ports = vec![
            PortObservation::new(8080, 5678, "nginx"),
            PortObservation::new(3000, 1234, "node"),
            PortObservation::new(3001, 1234, "node"),
            PortObservation::new(3000, 1234, "node"),
            PortObservation::new(22, 1, "launchd"),
        ];
        PortService::new(MockEnumerator { ports }, terminator)
    }

    #[tokio::test]
    async fn test_active_ports_sorted_and_deduplicated() {
        let service = service(MockTerminator::default());
        assert!(service.get_ports().is_empty());

        let ports = service.active_ports().await.unwrap();
        let listed: Vec<u16> = ports.iter().map(|p| p.port).collect();
        assert_eq!(listed, vec![22, 3000, 3001, 8080]);
    }

    #[tokio::test]
    async fn test_find_by_port() {
        let service = service(MockTerminator::default());
        assert!(service.find_by_port(8080).is_none());
        service.refresh().await.unwrap();

        assert_eq!(service.find_by_port(8080).unwrap().process_name, "nginx");
        assert!(service.find_by_port(9999).is_none());
    }

    #[tokio::test]
    async fn test_owners_of_uses_reported_order() {
        let ports = vec![
            PortObservation::new(8080, 900, "nginx"),
            PortObservation::new(8080, 5, "nginx-worker"),
            PortObservation::new(3000, 0, ""),
        ];
        let service = PortService::new(MockEnumerator { ports }, ());

        let owners = service.owners_of(&[8080, 3000, 5432]).await.unwrap();
        assert_eq!(
            owners,
            vec![
                (8080, Some(PortObservation::new(8080, 900, "nginx"))),
                (3000, None),
                (5432, None),
            ]
        );
        assert!(service.get_ports().is_empty());
    }

    #[tokio::test]
    async fn test_kill_variants() {
        let terminator = MockTerminator::default();
        let service = service(terminator.clone());

        service.kill(5678, false).await.unwrap();
        service.kill(42, true).await.unwrap();
        service
            .kill_with_password(77, &Credential::new("secret"))
            .await
            .unwrap();

        assert_eq!(
            *terminator.killed.lock(),
            vec![(5678, "force"), (42, "graceful"), (77, "elevated")]
        );
    }

    #[tokio::test]
    async fn test_kill_errors_are_surfaced() {
        let service = service(MockTerminator::default());

        let denied = service.kill(1, false).await;
        assert!(matches!(
            denied,
            Err(Error::Kill(KillError::PermissionDenied(1)))
        ));

        let rejected = service
            .kill_with_password(77, &Credential::new("wrong"))
            .await;
        assert!(matches!(
            rejected,
            Err(Error::Kill(KillError::CredentialRejected(77)))
        ));
    }

    #[tokio::test]
    async fn test_kill_port() {
        let terminator = MockTerminator::default();
        let service = service(terminator.clone());

        let killed = service.kill_port(3001, false).await.unwrap();
        assert_eq!(killed, Some(PortObservation::new(3001, 1234, "node")));
        assert_eq!(service.kill_port(9999, true).await.unwrap(), None);
        assert_eq!(*terminator.killed.lock(), vec![(1234, "force")]);
    }
}
