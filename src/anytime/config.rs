//! Anytime execution configuration.

use crate::error::ConfigError;
use std::time::Duration;

/// Configuration for an [`AnytimeAlgorithm`](super::AnytimeAlgorithm).
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_anytime::anytime::AnytimeConfig;
///
/// let config = AnytimeConfig::default().with_stop_timeout(Duration::from_millis(250));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnytimeConfig {
    /// Upper bound on how long `stop()` waits for the worker to exit.
    ///
    /// A worker still busy after this long is reported as leaked.
    pub stop_timeout: Duration,
}

impl Default for AnytimeConfig {
    fn default() -> Self {
        Self {
            stop_timeout: Duration::from_secs(1),
        }
    }
}

impl AnytimeConfig {
    pub fn with_stop_timeout(mut self, timeout: Duration) -> Self {
        self.stop_timeout = timeout;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::positive("stop_timeout", self.stop_timeout.as_secs_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnytimeConfig::default();
        assert_eq!(config.stop_timeout, Duration::from_secs(1));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_timeout() {
        let config = AnytimeConfig::default().with_stop_timeout(Duration::ZERO);
        assert!(config.validate().is_err());
    }
}
