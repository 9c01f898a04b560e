//! Least-squares linear extrapolation.

use super::types::{clip, short_history_forecast, PerformancePredictor};
use crate::error::ConfigError;

/// Fits `q = m * t + b` over the full history by ordinary least squares
/// (`t` = history index) and extrapolates past the last index.
///
/// # Examples
///
/// ```
/// use u_anytime::predict::{LinearPredictor, PerformancePredictor};
///
/// let predictor = LinearPredictor::new(2).unwrap();
/// let forecast = predictor.predict(&[0.1, 0.2, 0.3]);
/// assert!((forecast[0] - 0.4).abs() < 1e-9);
/// assert!((forecast[1] - 0.5).abs() < 1e-9);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinearPredictor {
    future_steps: usize,
}

impl LinearPredictor {
    pub fn new(future_steps: usize) -> Result<Self, ConfigError> {
        ConfigError::positive("future_steps", future_steps as f64)?;
        Ok(Self { future_steps })
    }

    /// Least-squares slope and intercept. `history` must hold at least two points.
    fn fit(history: &[f64]) -> (f64, f64) {
        let n = history.len() as f64;
        let (mut sum_x, mut sum_y, mut sum_xy, mut sum_xx) = (0.0, 0.0, 0.0, 0.0);
        for (i, &y) in history.iter().enumerate() {
            let x = i as f64;
            sum_x += x;
            sum_y += y;
            sum_xy += x * y;
            sum_xx += x * x;
        }
        // Distinct x values guarantee a non-zero denominator for n >= 2.
        let slope = (n * sum_xy - sum_x * sum_y) / (n * sum_xx - sum_x * sum_x);
        let intercept = (sum_y - slope * sum_x) / n;
        (slope, intercept)
    }
}

impl Default for LinearPredictor {
    fn default() -> Self {
        Self { future_steps: 5 }
    }
}

impl PerformancePredictor for LinearPredictor {
    fn name(&self) -> &str {
        "linear"
    }

    fn future_steps(&self) -> usize {
        self.future_steps
    }

    fn predict(&self, history: &[f64]) -> Vec<f64> {
        if let Some(flat) = short_history_forecast(history, self.future_steps) {
            return flat;
        }
        let (slope, intercept) = Self::fit(history);
        let n = history.len();
        (n..n + self.future_steps)
            .map(|x| clip(slope * x as f64 + intercept))
            .collect()
    }
}
