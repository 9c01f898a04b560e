//! Core trait for performance prediction.

/// Forecasts future solution quality from the observed history.
///
/// Implementations are pure policy objects: their only state is the
/// configuration fixed at construction, so one instance may be reused
/// across runs and threads.
///
/// # Contract
///
/// - `predict` returns exactly [`future_steps`](Self::future_steps) values.
/// - For an empty history every value is `0.0`; for a single observation
///   `q` every value is `q`.
/// - Otherwise every value lies in `[0, 1]`.
///
/// Predictions need not be monotone.
pub trait PerformancePredictor: Send + Sync {
    /// Returns a human-readable name for this predictor.
    fn name(&self) -> &str;

    /// Forecast horizon length.
    fn future_steps(&self) -> usize;

    /// Predicts the next `future_steps` qualities after `history`.
    fn predict(&self, history: &[f64]) -> Vec<f64>;
}

impl<T: PerformancePredictor + ?Sized> PerformancePredictor for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn future_steps(&self) -> usize {
        (**self).future_steps()
    }

    fn predict(&self, history: &[f64]) -> Vec<f64> {
        (**self).predict(history)
    }
}

/// Constant forecast used when fewer than two observations exist.
///
/// Returns `None` when the history is long enough to fit a model.
pub(crate) fn short_history_forecast(history: &[f64], steps: usize) -> Option<Vec<f64>> {
    match history {
        [] => Some(vec![0.0; steps]),
        [only] => Some(vec![*only; steps]),
        _ => None,
    }
}

/// Clips a predicted value into `[0, 1]`; NaN maps to `0.0`.
pub(crate) fn clip(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
