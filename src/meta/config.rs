//! Control-loop configuration.

use crate::error::ConfigError;
use std::time::Duration;

/// Configuration for the [`MetaReasoner`](super::MetaReasoner) control loop.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_anytime::meta::MetaConfig;
///
/// let config = MetaConfig::default()
///     .with_poll_interval(Duration::from_millis(20))
///     .with_max_iterations(500);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetaConfig {
    /// Interval `delta_t` between polls. Must be positive.
    pub poll_interval: Duration,

    /// Cap on control-loop decisions. `None` = unbounded.
    pub max_iterations: Option<usize>,
}

impl Default for MetaConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(100),
            max_iterations: None,
        }
    }
}

impl MetaConfig {
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Sets the poll interval from fractional seconds.
    ///
    /// Negative or non-finite values become a zero interval, which
    /// [`validate`](Self::validate) rejects.
    pub fn with_delta_t(mut self, secs: f64) -> Self {
        self.poll_interval = Duration::try_from_secs_f64(secs).unwrap_or(Duration::ZERO);
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = Some(n);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::positive("poll_interval", self.poll_interval.as_secs_f64())?;
        if let Some(cap) = self.max_iterations {
            ConfigError::positive("max_iterations", cap as f64)?;
        }
        Ok(())
    }
}
