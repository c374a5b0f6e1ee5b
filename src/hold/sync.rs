use embassy_time::Instant;
use log::{debug, trace};

use super::{
    observer::ObserverList,
    tracker::SessionTracker,
    types::{HoldTraceSample, Position, ReleaseEvent, StartEvent},
};

/// Once-per-tick driver for a [`SessionTracker`].
///
/// Owns the subscriber list and is the only place notifications leave the
/// crate. Releases computed between ticks wait in the tracker's slot until
/// the next call to [`TickSynchronizer::tick`].
#[derive(Default)]
pub struct TickSynchronizer {
    observers: ObserverList,
    last_trace: HoldTraceSample,
}

impl TickSynchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observers(&self) -> &ObserverList {
        &self.observers
    }

    pub fn observers_mut(&mut self) -> &mut ObserverList {
        &mut self.observers
    }

    pub fn last_trace(&self) -> HoldTraceSample {
        self.last_trace
    }

    pub fn announce_start(&mut self, event: &StartEvent) {
        self.observers.notify_start(event);
    }

    /// Applies the latest position sample, runs the expiry watchdog, then
    /// delivers at most one pending release.
    pub fn tick(
        &mut self,
        tracker: &mut SessionTracker,
        now: Instant,
        sample: Option<Position>,
    ) -> Option<ReleaseEvent> {
        if tracker.is_holding() {
            if let Some(position) = sample {
                tracker.update_position(position);
            }
            tracker.force_end_if_expired(now);
        }

        let phase = tracker.phase();
        let released = match tracker.take_release() {
            Some(event) => {
                debug!(
                    "hold: deliver t_ms={} normalized={} subscribers={}",
                    now.as_millis(),
                    event.normalized_hold_time,
                    self.observers.len()
                );
                self.observers.notify_release(&event);
                Some(event)
            }
            None => None,
        };

        self.last_trace = HoldTraceSample {
            now,
            phase,
            held: tracker.hold_duration(now),
            normalized: tracker.normalized_hold_time(now),
            released,
            outcome: tracker.last_outcome(),
        };
        trace!(
            "hold: tick t_ms={} phase={} outcome={}",
            now.as_millis(),
            phase.as_u8(),
            self.last_trace.outcome.label()
        );

        released
    }
}
