//! Threshold stopping rules.

use super::types::{StopReason, StoppingCondition};
use crate::error::ConfigError;
use std::time::Duration;

/// Stops once the predicted next-step gain drops below a minimum rate.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiminishingReturnsStopping {
    min_improvement_rate: f64,
}

impl DiminishingReturnsStopping {
    pub fn new(min_improvement_rate: f64) -> Result<Self, ConfigError> {
        ConfigError::non_negative("min_improvement_rate", min_improvement_rate)?;
        Ok(Self {
            min_improvement_rate,
        })
    }
}

impl Default for DiminishingReturnsStopping {
    fn default() -> Self {
        Self {
            min_improvement_rate: 0.001,
        }
    }
}

impl StoppingCondition for DiminishingReturnsStopping {
    fn name(&self) -> &str {
        "diminishing_returns"
    }

    fn evaluate(
        &self,
        predictions: &[f64],
        current_quality: f64,
        _elapsed: Duration,
    ) -> Option<StopReason> {
        let Some(&next) = predictions.first() else {
            return Some(StopReason::NoPredictions);
        };
        let expected = next - current_quality;
        (expected < self.min_improvement_rate).then_some(StopReason::InsufficientImprovement {
            expected,
            threshold: self.min_improvement_rate,
        })
    }
}

/// Stops once the elapsed time reaches `max_time`.
///
/// A zero budget stops at the first decision.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeoutStopping {
    max_time: Duration,
}

impl TimeoutStopping {
    pub fn new(max_time: Duration) -> Self {
        Self { max_time }
    }

    /// Builds from fractional seconds.
    ///
    /// # Errors
    ///
    /// Negative or non-finite budgets are rejected.
    pub fn from_secs_f64(secs: f64) -> Result<Self, ConfigError> {
        ConfigError::non_negative("max_time", secs)?;
        if !secs.is_finite() {
            return Err(ConfigError::OutOfRange {
                name: "max_time",
                value: secs,
                min: 0.0,
                max: f64::MAX,
            });
        }
        Ok(Self::new(Duration::from_secs_f64(secs)))
    }

    pub fn max_time(&self) -> Duration {
        self.max_time
    }
}

impl Default for TimeoutStopping {
    fn default() -> Self {
        Self::new(Duration::from_secs(10))
    }
}

impl StoppingCondition for TimeoutStopping {
    fn name(&self) -> &str {
        "timeout"
    }

    fn evaluate(
        &self,
        _predictions: &[f64],
        _current_quality: f64,
        elapsed: Duration,
    ) -> Option<StopReason> {
        (elapsed >= self.max_time).then_some(StopReason::Timeout {
            elapsed,
            max_time: self.max_time,
        })
    }
}

/// Stops once the current quality reaches a target.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QualityThresholdStopping {
    target_quality: f64,
}

impl QualityThresholdStopping {
    /// # Errors
    ///
    /// `target_quality` must be in `(0, 1]`.
    pub fn new(target_quality: f64) -> Result<Self, ConfigError> {
        ConfigError::in_range("target_quality", target_quality, 0.0, 1.0, true)?;
        Ok(Self { target_quality })
    }
}

impl Default for QualityThresholdStopping {
    fn default() -> Self {
        Self {
            target_quality: 0.9,
        }
    }
}

impl StoppingCondition for QualityThresholdStopping {
    fn name(&self) -> &str {
        "quality_threshold"
    }

    fn evaluate(
        &self,
        _predictions: &[f64],
        current_quality: f64,
        _elapsed: Duration,
    ) -> Option<StopReason> {
        (current_quality >= self.target_quality).then_some(StopReason::QualityReached {
            quality: current_quality,
            target: self.target_quality,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diminishing_returns() {
        let condition = DiminishingReturnsStopping::new(0.01).unwrap();
        assert!(condition.should_stop(&[0.505], 0.5, Duration::ZERO));
        assert!(!condition.should_stop(&[0.52], 0.5, Duration::ZERO));
        assert!(condition.should_stop(&[0.4], 0.5, Duration::ZERO));
        assert_eq!(
            condition.evaluate(&[], 0.5, Duration::ZERO),
            Some(StopReason::NoPredictions)
        );
        assert!(DiminishingReturnsStopping::new(-1.0).is_err());
    }

    #[test]
    fn test_timeout_boundary_is_inclusive() {
        let condition = TimeoutStopping::new(Duration::from_secs(2));
        assert!(!condition.should_stop(&[], 0.0, Duration::from_millis(1999)));
        assert!(condition.should_stop(&[], 0.0, Duration::from_secs(2)));
    }

    #[test]
    fn test_zero_timeout_stops_immediately() {
        let condition = TimeoutStopping::from_secs_f64(0.0).unwrap();
        assert_eq!(
            condition.evaluate(&[0.9], 0.1, Duration::ZERO),
            Some(StopReason::Timeout {
                elapsed: Duration::ZERO,
                max_time: Duration::ZERO
            })
        );
    }

    #[test]
    fn test_timeout_from_secs_rejects_invalid() {
        assert!(TimeoutStopping::from_secs_f64(-1.0).is_err());
        assert!(TimeoutStopping::from_secs_f64(f64::NAN).is_err());
        assert!(TimeoutStopping::from_secs_f64(f64::INFINITY).is_err());
        assert_eq!(
            TimeoutStopping::from_secs_f64(1.5).unwrap().max_time(),
            Duration::from_millis(1500)
        );
    }

    #[test]
    fn test_quality_threshold() {
        let condition = QualityThresholdStopping::new(0.8).unwrap();
        assert!(!condition.should_stop(&[], 0.79, Duration::ZERO));
        assert!(condition.should_stop(&[], 0.8, Duration::ZERO));
        assert!(QualityThresholdStopping::new(0.0).is_err());
        assert!(QualityThresholdStopping::new(1.1).is_err());
    }
}
