//! Expected-utility stopping.

use super::types::{StopReason, StoppingCondition};
use crate::error::ConfigError;
use std::time::Duration;

/// Compares the utility of stopping now against continuing one more
/// poll interval.
///
/// ```text
/// U_stop     = w * q_now
/// U_continue = w * p_1 - c
/// ```
///
/// where `p_1` is the nearest prediction, `w` the quality weight and `c`
/// the time cost of one decision interval. Stops unconditionally when
/// `p_1 - q_now` is below the improvement threshold, otherwise iff
/// `U_stop >= U_continue`. An empty forecast stops.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_anytime::stopping::{StoppingCondition, UtilityStopping};
///
/// let condition = UtilityStopping::new(0.01, 1.0, 0.001).unwrap();
/// assert!(!condition.should_stop(&[0.7], 0.5, Duration::ZERO));
/// assert!(condition.should_stop(&[0.505], 0.5, Duration::ZERO));
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UtilityStopping {
    time_cost: f64,
    quality_weight: f64,
    improvement_threshold: f64,
}

impl UtilityStopping {
    /// # Errors
    ///
    /// `time_cost` and `improvement_threshold` must be non-negative,
    /// `quality_weight` positive.
    pub fn new(
        time_cost: f64,
        quality_weight: f64,
        improvement_threshold: f64,
    ) -> Result<Self, ConfigError> {
        ConfigError::non_negative("time_cost", time_cost)?;
        ConfigError::positive("quality_weight", quality_weight)?;
        ConfigError::non_negative("improvement_threshold", improvement_threshold)?;
        Ok(Self {
            time_cost,
            quality_weight,
            improvement_threshold,
        })
    }
}

impl Default for UtilityStopping {
    fn default() -> Self {
        Self {
            time_cost: 0.01,
            quality_weight: 1.0,
            improvement_threshold: 0.001,
        }
    }
}

impl StoppingCondition for UtilityStopping {
    fn name(&self) -> &str {
        "utility"
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
        if expected < self.improvement_threshold {
            return Some(StopReason::InsufficientImprovement {
                expected,
                threshold: self.improvement_threshold,
            });
        }

        let stop = self.quality_weight * current_quality;
        let carry_on = self.quality_weight * next - self.time_cost;
        (stop >= carry_on).then_some(StopReason::UtilityExhausted { stop, carry_on })
    }
}
