use core::cell::RefCell;

use embassy_sync::blocking_mutex::{raw::CriticalSectionRawMutex, Mutex};
use embassy_time::{Duration, Instant};

use super::{
    engine::HoldEngine,
    observer::{HoldObserver, SubscriptionId},
    types::{Position, ReleaseEvent, SessionPhase, StartEvent},
};

/// [`HoldEngine`] behind a critical-section lock, for input callbacks that
/// run outside the tick loop's context.
///
/// Every call holds the lock for its whole duration, so a callback and a
/// tick never overlap. Observers run under the lock and must not call back
/// into the same engine.
pub struct SharedHoldEngine {
    inner: Mutex<CriticalSectionRawMutex, RefCell<HoldEngine>>,
}

impl SharedHoldEngine {
    pub fn new(engine: HoldEngine) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(engine)),
        }
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut HoldEngine) -> R) -> R {
        self.inner.lock(|cell| f(&mut cell.borrow_mut()))
    }

    pub fn subscribe(&self, observer: Box<dyn HoldObserver>) -> SubscriptionId {
        self.with(|engine| engine.subscribe(observer))
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.with(|engine| engine.unsubscribe(id))
    }

    pub fn begin_press(&self, position: Position, now: Instant) -> Option<StartEvent> {
        self.with(|engine| engine.begin_press(position, now))
    }

    pub fn update_position(&self, position: Position) {
        self.with(|engine| engine.update_position(position));
    }

    pub fn end_press(&self, now: Instant) {
        self.with(|engine| engine.end_press(now));
    }

    pub fn disable(&self) {
        self.with(HoldEngine::disable);
    }

    pub fn tick(&self, now: Instant) -> Option<ReleaseEvent> {
        self.with(|engine| engine.tick(now))
    }

    pub fn is_holding(&self) -> bool {
        self.with(|engine| engine.is_holding())
    }

    pub fn phase(&self) -> SessionPhase {
        self.with(|engine| engine.phase())
    }

    pub fn hold_duration(&self, now: Instant) -> Duration {
        self.with(|engine| engine.hold_duration(now))
    }

    pub fn normalized_hold_time(&self, now: Instant) -> f64 {
        self.with(|engine| engine.normalized_hold_time(now))
    }

    pub fn current_position(&self) -> Position {
        self.with(|engine| engine.current_position())
    }

    pub fn into_inner(self) -> HoldEngine {
        self.inner.into_inner().into_inner()
    }
}

impl Default for SharedHoldEngine {
    fn default() -> Self {
        Self::new(HoldEngine::default())
    }
}
