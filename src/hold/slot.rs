use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, signal::Signal};

use super::types::ReleaseEvent;

/// Single-slot, latest-wins hand-off between the point a release is computed
/// and the tick that delivers it.
pub struct ReleaseSlot {
    inner: Signal<CriticalSectionRawMutex, ReleaseEvent>,
}

impl ReleaseSlot {
    pub const fn new() -> Self {
        Self {
            inner: Signal::new(),
        }
    }

    /// Replaces any release still waiting to be delivered.
    pub fn publish(&self, event: ReleaseEvent) {
        self.inner.signal(event);
    }

    pub fn take(&self) -> Option<ReleaseEvent> {
        self.inner.try_take()
    }

    pub fn is_pending(&self) -> bool {
        self.inner.signaled()
    }
}

impl Default for ReleaseSlot {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use embassy_time::Duration;

    use super::super::types::{Position, ReleaseReason};
    use super::*;

    fn release(normalized_hold_time: f64) -> ReleaseEvent {
        ReleaseEvent {
            normalized_hold_time,
            held: Duration::from_millis(0),
            position: Position::ZERO,
            reason: ReleaseReason::Explicit,
        }
    }

    #[test]
    fn take_drains_exactly_once() {
        let slot = ReleaseSlot::new();
        slot.publish(release(0.4));
        assert!(slot.is_pending());
        assert_eq!(slot.take().map(|e| e.normalized_hold_time), Some(0.4));
        assert!(slot.take().is_none());
        assert!(!slot.is_pending());
    }

    #[test]
    fn latest_publish_wins() {
        let slot = ReleaseSlot::new();
        slot.publish(release(0.2));
        slot.publish(release(0.9));
        assert_eq!(slot.take().map(|e| e.normalized_hold_time), Some(0.9));
    }
}
