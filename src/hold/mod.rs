pub mod config;
pub mod engine;
pub mod error;
pub mod observer;
pub mod shared;
pub mod slot;
pub mod sync;
pub mod tracker;
pub mod types;

pub use config::{
    load_timing_config, parse_timing_config, TimingConfig, TimingPolicy, DEFAULT_MAX_HOLD_MS,
    DEFAULT_MIN_HOLD_MS,
};
pub use engine::HoldEngine;
pub use error::{ConfigLoadError, ConfigurationError};
pub use observer::{HoldNotification, HoldObserver, ObserverList, SubscriptionId};
pub use shared::SharedHoldEngine;
pub use slot::ReleaseSlot;
pub use sync::TickSynchronizer;
pub use tracker::SessionTracker;
pub use types::{
    HoldTraceSample, Position, ReleaseEvent, ReleaseReason, SessionOutcome, SessionPhase,
    StartEvent,
};
