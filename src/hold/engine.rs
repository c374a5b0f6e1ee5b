use embassy_time::{Duration, Instant};

use super::{
    config::TimingPolicy,
    observer::{HoldObserver, SubscriptionId},
    sync::TickSynchronizer,
    tracker::SessionTracker,
    types::{HoldTraceSample, Position, ReleaseEvent, SessionOutcome, SessionPhase, StartEvent},
};

/// Tracker, tick synchronizer and subscribers behind one owner.
///
/// Input callbacks and the tick loop both need `&mut self`, so they can
/// never interleave. Use [`super::SharedHoldEngine`] when input arrives
/// from another context.
#[derive(Default)]
pub struct HoldEngine {
    tracker: SessionTracker,
    sync: TickSynchronizer,
    latest_sample: Option<Position>,
}

impl HoldEngine {
    pub fn new(policy: TimingPolicy) -> Self {
        Self {
            tracker: SessionTracker::new(policy),
            sync: TickSynchronizer::new(),
            latest_sample: None,
        }
    }

    pub fn subscribe(&mut self, observer: Box<dyn HoldObserver>) -> SubscriptionId {
        self.sync.observers_mut().subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.sync.observers_mut().unsubscribe(id)
    }

    /// Subscribers hear about the start before this returns.
    pub fn begin_press(&mut self, position: Position, now: Instant) -> Option<StartEvent> {
        let start = self.tracker.begin_press(position, now)?;
        self.latest_sample = Some(position);
        self.sync.announce_start(&start);
        Some(start)
    }

    pub fn update_position(&mut self, position: Position) {
        if !self.tracker.is_holding() {
            return;
        }
        self.latest_sample = Some(position);
        self.tracker.update_position(position);
    }

    pub fn end_press(&mut self, now: Instant) {
        self.tracker.end_press(now);
    }

    pub fn disable(&mut self) {
        self.tracker.disable();
        self.latest_sample = None;
    }

    pub fn tick(&mut self, now: Instant) -> Option<ReleaseEvent> {
        self.sync
            .tick(&mut self.tracker, now, self.latest_sample.take())
    }

    pub fn tracker(&self) -> &SessionTracker {
        &self.tracker
    }

    pub fn policy(&self) -> TimingPolicy {
        self.tracker.policy()
    }

    pub fn is_holding(&self) -> bool {
        self.tracker.is_holding()
    }

    pub fn phase(&self) -> SessionPhase {
        self.tracker.phase()
    }

    pub fn hold_duration(&self, now: Instant) -> Duration {
        self.tracker.hold_duration(now)
    }

    pub fn normalized_hold_time(&self, now: Instant) -> f64 {
        self.tracker.normalized_hold_time(now)
    }

    pub fn current_position(&self) -> Position {
        self.tracker.current_position()
    }

    pub fn last_outcome(&self) -> SessionOutcome {
        self.tracker.last_outcome()
    }

    pub fn last_trace(&self) -> HoldTraceSample {
        self.sync.last_trace()
    }
}
