//! Disjunction of stopping conditions.

use super::types::{StopReason, StoppingCondition};
use crate::error::ConfigError;
use std::time::Duration;

/// Stops iff any member would stop.
///
/// Members are evaluated in order and evaluation short-circuits at the
/// first member that stops; its reason is reported.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_anytime::stopping::{
///     CompositeStopping, QualityThresholdStopping, StoppingCondition, TimeoutStopping,
/// };
///
/// let condition = CompositeStopping::new(vec![
///     Box::new(QualityThresholdStopping::new(0.95).unwrap()),
///     Box::new(TimeoutStopping::new(Duration::from_secs(5))),
/// ])
/// .unwrap();
/// assert!(condition.should_stop(&[], 0.5, Duration::from_secs(6)));
/// ```
pub struct CompositeStopping {
    conditions: Vec<Box<dyn StoppingCondition>>,
}

impl CompositeStopping {
    /// # Errors
    ///
    /// An empty member list is rejected: it could never stop.
    pub fn new(conditions: Vec<Box<dyn StoppingCondition>>) -> Result<Self, ConfigError> {
        if conditions.is_empty() {
            return Err(ConfigError::Empty { name: "conditions" });
        }
        Ok(Self { conditions })
    }

    /// Appends a member after the existing ones.
    pub fn with(mut self, condition: impl StoppingCondition + 'static) -> Self {
        self.conditions.push(Box::new(condition));
        self
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

impl StoppingCondition for CompositeStopping {
    fn name(&self) -> &str {
        "composite"
    }

    fn evaluate(
        &self,
        predictions: &[f64],
        current_quality: f64,
        elapsed: Duration,
    ) -> Option<StopReason> {
        self.conditions
            .iter()
            .find_map(|c| c.evaluate(predictions, current_quality, elapsed))
    }
}
