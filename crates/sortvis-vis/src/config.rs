//! Server configuration.

use std::net::SocketAddr;
use std::str::FromStr;

use sortvis_playback::SpeedPreset;

use crate::error::{Error, Result};

/// Visualizer configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisConfig {
    /// Address the HTTP server binds to.
    pub addr: SocketAddr,
    /// Size of the array generated at startup.
    pub size: usize,
    /// Smallest array the size control accepts.
    pub min_size: usize,
    /// Largest array the size control accepts.
    pub max_size: usize,
    /// Speed preselected in the control panel.
    pub speed: SpeedPreset,
    /// Seed for reproducible arrays; fresh entropy when unset.
    pub seed: Option<u64>,
}

impl Default for VisConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            size: 30,
            min_size: 5,
            max_size: 100,
            speed: SpeedPreset::default(),
            seed: None,
        }
    }
}

impl VisConfig {
    /// Create config from environment variables with sensible defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup; unset keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let addr = parse_var(&lookup, "SORTVIS_ADDR")?.unwrap_or(defaults.addr);
        let min_size = parse_var(&lookup, "SORTVIS_MIN_SIZE")?.unwrap_or(defaults.min_size);
        let max_size = parse_var(&lookup, "SORTVIS_MAX_SIZE")?.unwrap_or(defaults.max_size);
        let size = parse_var(&lookup, "SORTVIS_SIZE")?.unwrap_or(defaults.size);
        let speed = parse_var(&lookup, "SORTVIS_SPEED")?.unwrap_or(defaults.speed);
        let seed = parse_var(&lookup, "SORTVIS_SEED")?;

        if min_size == 0 || min_size > max_size {
            return Err(Error::InvalidConfig(format!(
                "size bounds {min_size}..={max_size} are empty"
            )));
        }

        Ok(Self {
            addr,
            size,
            min_size,
            max_size,
            speed,
            seed,
        }
        .with_size(size))
    }

    /// Override the startup size, clamped to the configured bounds.
    #[must_use]
    pub fn with_size(mut self, size: usize) -> Self {
        self.size = self.clamp_size(size);
        self
    }

    /// Override the listening port, keeping the bind address.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.addr.set_port(port);
        self
    }

    /// Clamp a requested array size into `min_size..=max_size`.
    pub fn clamp_size(&self, size: usize) -> usize {
        size.clamp(self.min_size, self.max_size)
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| Error::InvalidConfig(format!("{key}={raw}: {e}"))),
    }
}
