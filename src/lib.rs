//! Touch-hold input state machine.
//!
//! A [`SessionTracker`] turns press/release signals into hold sessions with a
//! debounce floor and a watchdog ceiling. A [`TickSynchronizer`] drains the
//! result once per tick and notifies subscribers. [`HoldEngine`] bundles both
//! for a single owner; [`SharedHoldEngine`] puts that behind a lock.

pub mod hold;

pub use embassy_time::{Duration, Instant};
pub use hold::*;
