//! Saturating-exponential (diminishing returns) forecast.

use super::types::{clip, short_history_forecast, PerformancePredictor};
use crate::error::ConfigError;

/// Distance to the ceiling below which the model is treated as saturated.
const SATURATION_EPS: f64 = 1e-6;

/// Models quality as an exponential approach to a ceiling `S`:
///
/// ```text
/// q(t) = S - (S - q0) * exp(-k * t)
/// ```
///
/// `q0` is the first observation. The rate `k` is solved from the first and
/// last observations alone, taking the last one at `t = n` for a history of
/// length `n`; forecasts are `q(n + 1) ..= q(n + future_steps)`.
///
/// Degenerate cases fall back to a constant forecast of the last value:
/// no net improvement over the history, or a last value at (or past) the
/// ceiling, where the logarithm would be undefined.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SaturationPredictor {
    future_steps: usize,
    saturation_point: f64,
}

impl SaturationPredictor {
    /// # Errors
    ///
    /// `future_steps` must be positive and `saturation_point` in `(0, 1]`.
    pub fn new(future_steps: usize, saturation_point: f64) -> Result<Self, ConfigError> {
        ConfigError::positive("future_steps", future_steps as f64)?;
        ConfigError::in_range("saturation_point", saturation_point, 0.0, 1.0, true)?;
        Ok(Self {
            future_steps,
            saturation_point,
        })
    }

    pub fn saturation_point(&self) -> f64 {
        self.saturation_point
    }
}

impl Default for SaturationPredictor {
    fn default() -> Self {
        Self {
            future_steps: 5,
            saturation_point: 0.95,
        }
    }
}

impl PerformancePredictor for SaturationPredictor {
    fn name(&self) -> &str {
        "saturation"
    }

    fn future_steps(&self) -> usize {
        self.future_steps
    }

    fn predict(&self, history: &[f64]) -> Vec<f64> {
        if let Some(flat) = short_history_forecast(history, self.future_steps) {
            return flat;
        }

        let ceiling = self.saturation_point;
        let first = history[0];
        let last = history[history.len() - 1];

        if last - first <= 0.0 || last >= ceiling - SATURATION_EPS {
            return vec![clip(last); self.future_steps];
        }

        // first < last < ceiling, so the ratio lies in (0, 1) and k > 0.
        let n = history.len() as f64;
        let rate = -((ceiling - last) / (ceiling - first)).ln() / n;

        (1..=self.future_steps)
            .map(|i| {
                let t = n + i as f64;
                clip(ceiling - (ceiling - first) * (-rate * t).exp())
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_improvement_is_constant() {
        let predictor = SaturationPredictor::new(4, 0.9).unwrap();
        assert_eq!(predictor.predict(&[0.5, 0.5]), vec![0.5; 4]);
        assert_eq!(predictor.predict(&[0.6, 0.7, 0.5]), vec![0.5; 4]);
    }

    #[test]
    fn test_at_ceiling_is_constant() {
        let predictor = SaturationPredictor::new(3, 0.9).unwrap();
        assert_eq!(predictor.predict(&[0.5, 0.9]), vec![0.9; 3]);
        assert_eq!(predictor.predict(&[0.5, 0.95]), vec![0.95; 3]);
    }

    #[test]
    fn test_approaches_ceiling_from_below() {
        let predictor = SaturationPredictor::new(10, 0.9).unwrap();
        let history = [0.2, 0.4, 0.55, 0.65];
        let forecast = predictor.predict(&history);

        assert_eq!(forecast.len(), 10);
        assert!(forecast[0] > 0.65);
        for w in forecast.windows(2) {
            assert!(w[1] > w[0]);
        }
        assert!(forecast.iter().all(|&q| q < 0.9));
    }

    #[test]
    fn test_model_matches_closed_form() {
        let predictor = SaturationPredictor::new(1, 1.0).unwrap();
        // 1 - 0.5 * e^{-2k} = 0.75  =>  e^{-k} = sqrt(0.5)
        let forecast = predictor.predict(&[0.5, 0.75]);
        let expected = 1.0 - 0.5 * 0.5f64.sqrt().powi(3);
        assert!((forecast[0] - expected).abs() < 1e-12);
    }

    #[test]
    fn test_short_history() {
        let predictor = SaturationPredictor::default();
        assert_eq!(predictor.predict(&[]), vec![0.0; 5]);
        assert_eq!(predictor.predict(&[0.3]), vec![0.3; 5]);
    }

    #[test]
    fn test_rejects_bad_ceiling() {
        assert!(SaturationPredictor::new(5, 0.0).is_err());
        assert!(SaturationPredictor::new(5, 1.2).is_err());
        assert!(SaturationPredictor::new(0, 0.9).is_err());
        assert!(SaturationPredictor::new(5, 1.0).is_ok());
    }
}
