//! Periodic watch loop driving enumeration and transition detection.

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Duration, MissedTickBehavior};
use tracing::{debug, info, trace, warn};

use crate::domain::TransitionDetector;
use crate::ports::{ConfigProvider, NotificationSink, PortEnumerator};

/// Time between two cycles unless configured otherwise.
pub const DEFAULT_WATCH_INTERVAL: Duration = Duration::from_secs(2);

/// Shortest time allowed between two cycles.
pub const MIN_WATCH_INTERVAL: Duration = Duration::from_millis(1);

/// How a single cycle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The configuration could not be loaded; nothing else ran.
    ConfigUnavailable,
    /// Notifications are switched off; nothing else ran.
    Disabled,
    /// Listing sockets failed; the detector baseline is unchanged.
    EnumerationFailed,
    /// The snapshot was diffed and `events` events were delivered.
    Completed { events: usize },
}

/// Watches the configured ports and reports their transitions to a sink.
///
/// Each cycle reloads the configuration, takes a snapshot and diffs it
/// against the previous one. Cycles run one after another and never overlap;
/// a failed cycle is skipped and retried on the next tick.
///
/// ```ignore
/// let (sink, mut events) = ChannelSink::new();
/// let handle = WatchLoop::new(LsofEnumerator::new(), ConfigStore::new()?, sink).spawn();
///
/// while let Some(event) = events.recv().await {
///     println!("{event}");
/// }
/// handle.stop().await;
/// ```
pub struct WatchLoop<E, C, S> {
    enumerator: E,
    config: C,
    sink: S,
    detector: TransitionDetector,
    interval: Duration,
}

impl<E, C, S> WatchLoop<E, C, S>
where
    E: PortEnumerator,
    C: ConfigProvider,
    S: NotificationSink,
{
    pub fn new(enumerator: E, config: C, sink: S) -> Self {
        Self {
            enumerator,
            config,
            sink,
            detector: TransitionDetector::new(),
            interval: DEFAULT_WATCH_INTERVAL,
        }
    }

    /// Change the time between cycles.
    ///
    /// Intervals shorter than [`MIN_WATCH_INTERVAL`], including zero, are
    /// raised to it.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        if interval < MIN_WATCH_INTERVAL {
            warn!(
                interval_ms = interval.as_millis() as u64,
                "Watch interval too short, using the minimum"
            );
        }
        self.interval = interval.max(MIN_WATCH_INTERVAL);
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// The detector holding the baseline for the next cycle.
    pub fn detector(&self) -> &TransitionDetector {
        &self.detector
    }

    /// Run one cycle: load config, enumerate, diff, notify.
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        let config = match self.config.load().await {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %e, "Failed to load config, skipping cycle");
                return CycleOutcome::ConfigUnavailable;
            }
        };

        if !config.notifications_enabled {
            trace!("Notifications disabled, skipping cycle");
            return CycleOutcome::Disabled;
        }

        let snapshot = match self.enumerator.snapshot().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                debug!(error = %e, "Port enumeration failed, skipping cycle");
                return CycleOutcome::EnumerationFailed;
            }
        };

        let events = self.detector.diff(&snapshot, &config.watched_ports);
        for event in &events {
            debug!(event = event.name(), port = event.port(), "Port transition");
            self.sink.notify(event);
        }

        CycleOutcome::Completed {
            events: events.len(),
        }
    }

    /// Run cycles until the shutdown signal is received.
    ///
    /// Shutdown is checked before every tick, so a pending shutdown always
    /// wins over a due cycle. A cycle that has already started is allowed to
    /// finish. Dropping the shutdown sender also stops the loop.
    pub async fn run(mut self, mut shutdown_rx: watch::Receiver<bool>) {
        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(interval_ms = self.interval.as_millis() as u64, "Watch loop started");

        loop {
            if *shutdown_rx.borrow() {
                break;
            }

            tokio::select! {
                biased;

                changed = shutdown_rx.changed() => {
                    if changed.is_err() {
                        debug!("Shutdown sender dropped");
                        break;
                    }
                }
                _ = interval.tick() => {
                    let outcome = self.run_cycle().await;
                    trace!(?outcome, "Cycle finished");
                }
            }
        }

        info!("Watch loop stopped");
    }

    /// Spawn the loop onto the current tokio runtime.
    pub fn spawn(self) -> WatchHandle
    where
        E: 'static,
        C: 'static,
        S: 'static,
    {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(self.run(shutdown_rx));
        WatchHandle { shutdown_tx, task }
    }
}

/// Handle to a spawned watch loop.
///
/// Dropping the handle also stops the loop at its next await point. A cycle
/// already in progress finishes first.
pub struct WatchHandle {
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl WatchHandle {
    /// Ask the loop to stop without waiting for it.
    pub fn cancel(&self) {
        // only fails if the loop is already gone
        let _ = self.shutdown_tx.send(true);
    }

    /// Stop the loop and wait until it has exited.
    pub async fn stop(self) {
        self.cancel();
        if let Err(e) = self.task.await {
            warn!(error = %e, "Watch loop task failed");
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}
