//! Moving average of recent improvements.

use super::types::{clip, short_history_forecast, PerformancePredictor};
use crate::error::ConfigError;

/// Extrapolates by the mean of the last `window_size` successive
/// differences (all of them if fewer exist), added step by step to the
/// last observation.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MovingAveragePredictor {
    window_size: usize,
    future_steps: usize,
}

impl MovingAveragePredictor {
    pub fn new(window_size: usize, future_steps: usize) -> Result<Self, ConfigError> {
        ConfigError::positive("window_size", window_size as f64)?;
        ConfigError::positive("future_steps", future_steps as f64)?;
        Ok(Self {
            window_size,
            future_steps,
        })
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    fn mean_improvement(&self, history: &[f64]) -> f64 {
        let diffs = history.len() - 1;
        let skip = diffs.saturating_sub(self.window_size);
        let window = &history[skip..];
        let count = (window.len() - 1) as f64;
        window.windows(2).map(|w| w[1] - w[0]).sum::<f64>() / count
    }
}

impl Default for MovingAveragePredictor {
    fn default() -> Self {
        Self {
            window_size: 3,
            future_steps: 5,
        }
    }
}

impl PerformancePredictor for MovingAveragePredictor {
    fn name(&self) -> &str {
        "moving_average"
    }

    fn future_steps(&self) -> usize {
        self.future_steps
    }

    fn predict(&self, history: &[f64]) -> Vec<f64> {
        if let Some(flat) = short_history_forecast(history, self.future_steps) {
            return flat;
        }
        let step = self.mean_improvement(history);
        let mut current = history[history.len() - 1];
        (0..self.future_steps)
            .map(|_| {
                current += step;
                clip(current)
            })
            .collect()
    }
}
