use embassy_time::{Duration, Instant};

/// A sample in the input source's native coordinate space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StartEvent {
    pub at: Instant,
    pub position: Position,
    /// Always 0 on start.
    pub normalized_hold_time: f64,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum ReleaseReason {
    Explicit = 1,
    AutoRelease = 2,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReleaseEvent {
    pub normalized_hold_time: f64,
    pub held: Duration,
    pub position: Position,
    pub reason: ReleaseReason,
}

/// How the most recent session ended.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum SessionOutcome {
    #[default]
    None,
    Released(ReleaseEvent),
    Rejected {
        held: Duration,
    },
    Cancelled,
}

impl SessionOutcome {
    pub fn normalized_hold_time(&self) -> Option<f64> {
        match self {
            Self::Released(event) => Some(event.normalized_hold_time),
            _ => None,
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Released(_) => "released",
            Self::Rejected { .. } => "rejected",
            Self::Cancelled => "cancelled",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[repr(u8)]
pub enum SessionPhase {
    #[default]
    Idle = 0,
    Holding = 1,
    /// Not holding, with a release waiting for the next tick.
    JustEnded = 2,
}

impl SessionPhase {
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HoldTraceSample {
    pub now: Instant,
    pub phase: SessionPhase,
    pub held: Duration,
    pub normalized: f64,
    pub released: Option<ReleaseEvent>,
    pub outcome: SessionOutcome,
}

impl HoldTraceSample {
    pub const fn empty() -> Self {
        Self {
            now: Instant::from_ticks(0),
            phase: SessionPhase::Idle,
            held: Duration::from_ticks(0),
            normalized: 0.0,
            released: None,
            outcome: SessionOutcome::None,
        }
    }
}

impl Default for HoldTraceSample {
    fn default() -> Self {
        Self::empty()
    }
}
