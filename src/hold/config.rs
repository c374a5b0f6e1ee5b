use std::{fs, path::Path};

use embassy_time::Duration;
use serde::Deserialize;

use super::error::{ConfigLoadError, ConfigurationError};

pub const DEFAULT_MIN_HOLD_MS: u64 = 100;
pub const DEFAULT_MAX_HOLD_MS: u64 = 1_000;

/// Debounce floor and watchdog ceiling for one hold session.
///
/// Only obtainable through [`TimingPolicy::new`], so every live policy
/// satisfies `max_hold_duration > min_hold_duration > 0`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimingPolicy {
    min_hold_duration: Duration,
    max_hold_duration: Duration,
}

impl TimingPolicy {
    pub fn new(
        min_hold_duration: Duration,
        max_hold_duration: Duration,
    ) -> Result<Self, ConfigurationError> {
        if min_hold_duration.as_ticks() == 0 {
            return Err(ConfigurationError::MinHoldNotPositive);
        }
        if max_hold_duration <= min_hold_duration {
            return Err(ConfigurationError::MaxNotAboveMin {
                min_ms: min_hold_duration.as_millis(),
                max_ms: max_hold_duration.as_millis(),
            });
        }
        Ok(Self {
            min_hold_duration,
            max_hold_duration,
        })
    }

    pub fn from_millis(min_hold_ms: u64, max_hold_ms: u64) -> Result<Self, ConfigurationError> {
        Self::new(
            Duration::from_millis(min_hold_ms),
            Duration::from_millis(max_hold_ms),
        )
    }

    pub const fn min_hold_duration(&self) -> Duration {
        self.min_hold_duration
    }

    pub const fn max_hold_duration(&self) -> Duration {
        self.max_hold_duration
    }

    pub(crate) fn is_debounced(&self, held: Duration) -> bool {
        held < self.min_hold_duration
    }

    pub(crate) fn is_expired(&self, held: Duration) -> bool {
        held >= self.max_hold_duration
    }

    /// `held / max_hold_duration`, clamped to `[0, 1]`.
    pub fn normalize(&self, held: Duration) -> f64 {
        let ratio = held.as_micros() as f64 / self.max_hold_duration.as_micros() as f64;
        ratio.clamp(0.0, 1.0)
    }
}

impl Default for TimingPolicy {
    fn default() -> Self {
        Self {
            min_hold_duration: Duration::from_millis(DEFAULT_MIN_HOLD_MS),
            max_hold_duration: Duration::from_millis(DEFAULT_MAX_HOLD_MS),
        }
    }
}

impl TryFrom<TimingConfig> for TimingPolicy {
    type Error = ConfigurationError;

    fn try_from(config: TimingConfig) -> Result<Self, Self::Error> {
        config.into_policy()
    }
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct HoldSection {
    pub min_hold_ms: i64,
    pub max_hold_ms: i64,
}

/// On-disk form of the timing policy (`config/touch_hold.toml`).
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TimingConfig {
    pub hold: HoldSection,
}

impl TimingConfig {
    pub fn into_policy(self) -> Result<TimingPolicy, ConfigurationError> {
        let min_hold_ms = non_negative_ms(self.hold.min_hold_ms, "min_hold_ms")?;
        let max_hold_ms = non_negative_ms(self.hold.max_hold_ms, "max_hold_ms")?;
        TimingPolicy::from_millis(min_hold_ms, max_hold_ms)
    }
}

fn non_negative_ms(value: i64, field: &'static str) -> Result<u64, ConfigurationError> {
    u64::try_from(value).map_err(|_| ConfigurationError::NegativeDuration { field })
}

pub fn parse_timing_config(source: &str) -> Result<TimingPolicy, ConfigLoadError> {
    let config: TimingConfig =
        toml::from_str(source).map_err(|e| ConfigLoadError::Parse(e.to_string()))?;
    Ok(config.into_policy()?)
}

pub fn load_timing_config(path: &Path) -> Result<TimingPolicy, ConfigLoadError> {
    let source = fs::read_to_string(path).map_err(|e| ConfigLoadError::Io {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    parse_timing_config(&source)
}

#[cfg(test)]
mod tests;
