//! Notification sink port (interface).

use crate::domain::TransitionEvent;

/// Port for delivering transition events to a UI or log.
///
/// Fire-and-forget: delivery failures are not reported back to the loop.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, event: &TransitionEvent);
}

impl<F> NotificationSink for F
where
    F: Fn(&TransitionEvent) + Send + Sync,
{
    fn notify(&self, event: &TransitionEvent) {
        self(event)
    }
}
