//! Playback speed presets and timing configuration.

use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// The three recognized speed settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeedPreset {
    /// 10 ms per step
    Fast,
    /// 50 ms per step
    #[default]
    Medium,
    /// 150 ms per step
    Slow,
}

impl SpeedPreset {
    /// Delay between consecutive primary events at this speed.
    pub fn step_delay(&self) -> Duration {
        Duration::from_millis(match self {
            SpeedPreset::Fast => 10,
            SpeedPreset::Medium => 50,
            SpeedPreset::Slow => 150,
        })
    }
}

impl FromStr for SpeedPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fast" => Ok(SpeedPreset::Fast),
            "medium" => Ok(SpeedPreset::Medium),
            "slow" => Ok(SpeedPreset::Slow),
            other => Err(format!("unknown speed preset: {other}")),
        }
    }
}

impl std::fmt::Display for SpeedPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fast => write!(f, "fast"),
            Self::Medium => write!(f, "medium"),
            Self::Slow => write!(f, "slow"),
        }
    }
}

/// Timing knobs shared by every run of a scheduler.
#[derive(Debug, Clone, Copy)]
pub struct PlaybackConfig {
    /// Step delay used when a run does not name one.
    pub step_delay: Duration,

    /// How long before the next primary event a highlight is reverted.
    pub revert_lead: Duration,

    /// Pause between finishing a run and reporting it finished.
    pub finish_grace: Duration,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            step_delay: SpeedPreset::default().step_delay(),
            revert_lead: Duration::from_millis(5),
            finish_grace: Duration::from_millis(500),
        }
    }
}

impl PlaybackConfig {
    #[must_use]
    pub fn with_step_delay(mut self, step_delay: Duration) -> Self {
        self.step_delay = step_delay;
        self
    }

    #[must_use]
    pub fn with_speed(self, speed: SpeedPreset) -> Self {
        self.with_step_delay(speed.step_delay())
    }

    #[must_use]
    pub fn with_revert_lead(mut self, revert_lead: Duration) -> Self {
        self.revert_lead = revert_lead;
        self
    }

    #[must_use]
    pub fn with_finish_grace(mut self, finish_grace: Duration) -> Self {
        self.finish_grace = finish_grace;
        self
    }

    /// Offset from a primary event to its revert, always below `step_delay`
    /// when `step_delay` is non-zero.
    pub fn revert_offset(&self, step_delay: Duration) -> Duration {
        if step_delay > self.revert_lead {
            step_delay - self.revert_lead
        } else {
            step_delay / 2
        }
    }
}
