//! Notification sink adapters.

use tokio::sync::mpsc;
use tracing::{info, trace};

use crate::domain::TransitionEvent;
use crate::ports::NotificationSink;

/// Hands events to another task over an unbounded channel.
///
/// Once the receiver is dropped events are silently discarded.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<TransitionEvent>,
}

impl ChannelSink {
    /// Create a sink and the receiver its events arrive on.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<TransitionEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl NotificationSink for ChannelSink {
    fn notify(&self, event: &TransitionEvent) {
        if self.tx.send(event.clone()).is_err() {
            trace!(port = event.port(), "Event receiver dropped, discarding event");
        }
    }
}

/// Writes every event to the log at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl NotificationSink for LogSink {
    fn notify(&self, event: &TransitionEvent) {
        info!(event = event.name(), port = event.port(), "{}", event);
    }
}
