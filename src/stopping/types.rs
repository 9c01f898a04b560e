//! Core trait for stopping conditions.

use std::time::Duration;

/// Why a stopping decision was made.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StopReason {
    /// The predictor produced no forecast, so continuing has nothing to gain.
    NoPredictions,

    /// The predicted next-step gain is below the required minimum.
    InsufficientImprovement { expected: f64, threshold: f64 },

    /// Stopping now is worth at least as much as continuing.
    UtilityExhausted { stop: f64, carry_on: f64 },

    /// The time budget is spent.
    Timeout { elapsed: Duration, max_time: Duration },

    /// The current quality meets the target.
    QualityReached { quality: f64, target: f64 },

    /// The algorithm exhausted its own budget before any policy fired.
    AlgorithmCompleted,

    /// The control loop reached its poll cap.
    IterationCap { iterations: usize },
}

/// Decides whether an anytime computation should halt.
///
/// Implementations are pure policy objects configured at construction.
/// [`evaluate`](Self::evaluate) reports the reason for stopping, or `None`
/// to continue; [`should_stop`](Self::should_stop) is its boolean view.
pub trait StoppingCondition: Send + Sync {
    /// Returns a human-readable name for this condition.
    fn name(&self) -> &str;

    /// Returns `Some(reason)` if the computation should stop now.
    ///
    /// # Arguments
    /// * `predictions` - Forecast qualities, nearest step first
    /// * `current_quality` - Quality of the latest observed solution
    /// * `elapsed` - Time since the control loop started
    fn evaluate(
        &self,
        predictions: &[f64],
        current_quality: f64,
        elapsed: Duration,
    ) -> Option<StopReason>;

    fn should_stop(&self, predictions: &[f64], current_quality: f64, elapsed: Duration) -> bool {
        self.evaluate(predictions, current_quality, elapsed)
            .is_some()
    }
}

impl<T: StoppingCondition + ?Sized> StoppingCondition for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn evaluate(
        &self,
        predictions: &[f64],
        current_quality: f64,
        elapsed: Duration,
    ) -> Option<StopReason> {
        (**self).evaluate(predictions, current_quality, elapsed)
    }
}
