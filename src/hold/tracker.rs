use embassy_time::{Duration, Instant};
use log::{debug, trace};
use statig::{blocking::IntoStateMachineExt as _, prelude::*};

use super::{
    config::TimingPolicy,
    slot::ReleaseSlot,
    types::{Position, ReleaseEvent, ReleaseReason, SessionOutcome, SessionPhase, StartEvent},
};

#[derive(Clone, Copy, Debug)]
enum TrackerEvent {
    Press { position: Position, now: Instant },
    Move { position: Position },
    Release { now: Instant },
    Expire { now: Instant },
    Disable,
}

#[derive(Clone, Copy, Debug, Default)]
struct DispatchContext {
    started: Option<StartEvent>,
}

/// Single-touch hold session: debounce on release, watchdog on expiry.
///
/// Redundant signals (a press while holding, a release while idle) are
/// dropped without effect.
pub struct SessionTracker {
    machine: statig::blocking::StateMachine<TrackerHsm>,
}

impl Default for SessionTracker {
    fn default() -> Self {
        Self::new(TimingPolicy::default())
    }
}

impl SessionTracker {
    pub fn new(policy: TimingPolicy) -> Self {
        Self {
            machine: TrackerHsm::new(policy).state_machine(),
        }
    }

    pub fn policy(&self) -> TimingPolicy {
        self.machine.inner().policy
    }

    /// Starts a session unless one is already active. The returned start
    /// event is the immediate start notification.
    pub fn begin_press(&mut self, position: Position, now: Instant) -> Option<StartEvent> {
        self.dispatch(TrackerEvent::Press { position, now }).started
    }

    pub fn update_position(&mut self, position: Position) {
        let _ = self.dispatch(TrackerEvent::Move { position });
    }

    pub fn end_press(&mut self, now: Instant) {
        let _ = self.dispatch(TrackerEvent::Release { now });
    }

    pub fn force_end_if_expired(&mut self, now: Instant) {
        let _ = self.dispatch(TrackerEvent::Expire { now });
    }

    /// Leaves the live session without computing a hold time. A release
    /// from an already-ended session is still delivered by the next tick.
    pub fn disable(&mut self) {
        let _ = self.dispatch(TrackerEvent::Disable);
    }

    pub fn is_holding(&self) -> bool {
        self.machine.inner().holding
    }

    pub fn phase(&self) -> SessionPhase {
        let hsm = self.machine.inner();
        if hsm.holding {
            SessionPhase::Holding
        } else if hsm.release_slot.is_pending() {
            SessionPhase::JustEnded
        } else {
            SessionPhase::Idle
        }
    }

    pub fn hold_duration(&self, now: Instant) -> Duration {
        self.machine.inner().held_at(now)
    }

    pub fn normalized_hold_time(&self, now: Instant) -> f64 {
        let hsm = self.machine.inner();
        if !hsm.holding {
            return 0.0;
        }
        hsm.policy.normalize(hsm.held_at(now))
    }

    pub fn current_position(&self) -> Position {
        self.machine.inner().current_position
    }

    pub fn start_position(&self) -> Position {
        self.machine.inner().start_position
    }

    pub fn start_time(&self) -> Option<Instant> {
        let hsm = self.machine.inner();
        hsm.holding.then_some(hsm.start_time)
    }

    /// Normalized time of the last valid session; `None` after a debounce
    /// rejection or once a new press has begun.
    pub fn last_normalized_hold_time(&self) -> Option<f64> {
        self.machine.inner().last_normalized_hold_time
    }

    pub fn last_outcome(&self) -> SessionOutcome {
        self.machine.inner().last_outcome
    }

    pub(crate) fn take_release(&self) -> Option<ReleaseEvent> {
        self.machine.inner().release_slot.take()
    }

    fn dispatch(&mut self, event: TrackerEvent) -> DispatchContext {
        let mut context = DispatchContext::default();
        self.machine.handle_with_context(&event, &mut context);
        context
    }
}

struct TrackerHsm {
    policy: TimingPolicy,
    holding: bool,
    start_time: Instant,
    start_position: Position,
    current_position: Position,
    last_normalized_hold_time: Option<f64>,
    last_outcome: SessionOutcome,
    release_slot: ReleaseSlot,
}

impl TrackerHsm {
    fn new(policy: TimingPolicy) -> Self {
        Self {
            policy,
            holding: false,
            start_time: Instant::from_ticks(0),
            start_position: Position::ZERO,
            current_position: Position::ZERO,
            last_normalized_hold_time: None,
            last_outcome: SessionOutcome::None,
            release_slot: ReleaseSlot::new(),
        }
    }

    fn held_at(&self, now: Instant) -> Duration {
        if !self.holding {
            return Duration::from_ticks(0);
        }
        now.saturating_duration_since(self.start_time)
    }

    fn begin_session(&mut self, context: &mut DispatchContext, position: Position, now: Instant) {
        self.holding = true;
        self.start_time = now;
        self.start_position = position;
        self.current_position = position;
        self.last_normalized_hold_time = None;

        debug!(
            "hold: start t_ms={} x={} y={}",
            now.as_millis(),
            position.x,
            position.y
        );
        context.started = Some(StartEvent {
            at: now,
            position,
            normalized_hold_time: 0.0,
        });
    }

    fn finish_session(&mut self, now: Instant, reason: ReleaseReason) {
        let held = self.held_at(now);
        self.holding = false;

        let outcome = if reason == ReleaseReason::Explicit && self.policy.is_debounced(held) {
            debug!("hold: reject held_ms={}", held.as_millis());
            self.last_normalized_hold_time = None;
            SessionOutcome::Rejected { held }
        } else {
            let normalized_hold_time = match reason {
                ReleaseReason::AutoRelease => 1.0,
                ReleaseReason::Explicit => self.policy.normalize(held),
            };
            let event = ReleaseEvent {
                normalized_hold_time,
                held,
                position: self.current_position,
                reason,
            };
            debug!(
                "hold: end reason={:?} held_ms={} normalized={}",
                reason,
                held.as_millis(),
                normalized_hold_time
            );
            self.last_normalized_hold_time = Some(normalized_hold_time);
            self.release_slot.publish(event);
            SessionOutcome::Released(event)
        };

        self.last_outcome = outcome;
    }

    /// Ends the live session only. A release already published by an
    /// earlier session stays in the slot for the next tick.
    fn cancel(&mut self) {
        debug!("hold: disabled mid-hold");
        self.holding = false;
        self.last_outcome = SessionOutcome::Cancelled;
    }
}

#[state_machine(initial = "State::idle()")]
impl TrackerHsm {
    #[state]
    fn idle(&mut self, context: &mut DispatchContext, event: &TrackerEvent) -> Outcome<State> {
        match event {
            TrackerEvent::Press { position, now } => {
                self.begin_session(context, *position, *now);
                Transition(State::holding())
            }
            TrackerEvent::Release { .. } => {
                trace!("hold: stray release ignored");
                Handled
            }
            TrackerEvent::Move { .. }
            | TrackerEvent::Expire { .. }
            | TrackerEvent::Disable => Handled,
        }
    }

    #[state]
    fn holding(&mut self, context: &mut DispatchContext, event: &TrackerEvent) -> Outcome<State> {
        let _ = context;
        match event {
            TrackerEvent::Press { .. } => {
                trace!("hold: press while holding ignored");
                Handled
            }
            TrackerEvent::Move { position } => {
                self.current_position = *position;
                Handled
            }
            TrackerEvent::Release { now } => {
                self.finish_session(*now, ReleaseReason::Explicit);
                Transition(State::idle())
            }
            TrackerEvent::Expire { now } => {
                if !self.policy.is_expired(self.held_at(*now)) {
                    return Handled;
                }
                self.finish_session(*now, ReleaseReason::AutoRelease);
                Transition(State::idle())
            }
            TrackerEvent::Disable => {
                self.cancel();
                Transition(State::idle())
            }
        }
    }
}
