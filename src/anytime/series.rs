//! Iterative series refinement.
//!
//! Approximates a constant by the partial sums of a convergent alternating
//! series, adding a fixed batch of terms per step. The error of an
//! alternating series with decreasing terms shrinks monotonically, so each
//! step publishes a strictly better estimate.
//!
//! Quality is `1 / (1 + s * |estimate - target|)` for the error scale `s`.

use super::types::{AnytimeProblem, Solution, SolutionSlot};
use crate::error::{AlgorithmError, ConfigError};
use std::f64::consts::{LN_2, PI};
use std::thread;
use std::time::Duration;
use tracing::trace;

/// Convergent alternating series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AlternatingSeries {
    /// `4 * sum (-1)^n / (2n + 1)`, converging to `pi`.
    #[default]
    Leibniz,

    /// `sum (-1)^n / (n + 1)`, converging to `ln 2`.
    AlternatingHarmonic,
}

impl AlternatingSeries {
    /// The `n`-th term (zero-based).
    pub fn term(self, n: usize) -> f64 {
        let sign = if n % 2 == 0 { 1.0 } else { -1.0 };
        match self {
            AlternatingSeries::Leibniz => 4.0 * sign / (2 * n + 1) as f64,
            AlternatingSeries::AlternatingHarmonic => sign / (n + 1) as f64,
        }
    }

    /// Value the partial sums converge to.
    pub fn limit(self) -> f64 {
        match self {
            AlternatingSeries::Leibniz => PI,
            AlternatingSeries::AlternatingHarmonic => LN_2,
        }
    }
}

/// Configuration for [`SeriesRefiner`].
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SeriesConfig {
    pub series: AlternatingSeries,

    /// Step budget.
    pub max_iterations: usize,

    /// Terms added per step. The initial solution uses one batch.
    pub terms_per_step: usize,

    /// Scale `s` of the quality transform.
    pub error_scale: f64,

    /// Simulated work per step.
    pub step_delay: Duration,
}

impl Default for SeriesConfig {
    fn default() -> Self {
        Self {
            series: AlternatingSeries::Leibniz,
            max_iterations: 50,
            terms_per_step: 10,
            error_scale: 10.0,
            step_delay: Duration::from_millis(100),
        }
    }
}

impl SeriesConfig {
    pub fn with_series(mut self, series: AlternatingSeries) -> Self {
        self.series = series;
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_terms_per_step(mut self, n: usize) -> Self {
        self.terms_per_step = n;
        self
    }

    pub fn with_error_scale(mut self, s: f64) -> Self {
        self.error_scale = s;
        self
    }

    pub fn with_step_delay(mut self, delay: Duration) -> Self {
        self.step_delay = delay;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::positive("terms_per_step", self.terms_per_step as f64)?;
        ConfigError::positive("error_scale", self.error_scale)?;
        Ok(())
    }
}

/// Payload of a series [`Solution`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SeriesData {
    pub estimate: f64,
    pub error: f64,
    pub terms: usize,
}

/// Anytime refinement of a series partial sum.
#[derive(Debug, Clone)]
pub struct SeriesRefiner {
    config: SeriesConfig,
    partial_sum: f64,
    terms: usize,
    iteration: usize,
}

impl SeriesRefiner {
    pub fn new(config: SeriesConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            partial_sum: 0.0,
            terms: 0,
            iteration: 0,
        })
    }

    pub fn target(&self) -> f64 {
        self.config.series.limit()
    }

    pub fn iterations(&self) -> usize {
        self.iteration
    }

    fn extend(&mut self) {
        let end = self.terms + self.config.terms_per_step;
        self.partial_sum += (self.terms..end)
            .map(|n| self.config.series.term(n))
            .sum::<f64>();
        self.terms = end;
    }

    fn snapshot(&self) -> Solution<SeriesData> {
        let error = (self.partial_sum - self.target()).abs();
        Solution::new(
            SeriesData {
                estimate: self.partial_sum,
                error,
                terms: self.terms,
            },
            1.0 / (1.0 + self.config.error_scale * error),
        )
    }
}

impl AnytimeProblem for SeriesRefiner {
    type Data = SeriesData;

    fn initial_solution(&mut self) -> Result<Solution<SeriesData>, AlgorithmError> {
        self.iteration = 0;
        self.terms = 0;
        self.partial_sum = 0.0;
        self.extend();
        Ok(self.snapshot())
    }

    fn compute_step(&mut self, slot: &SolutionSlot<SeriesData>) -> Result<bool, AlgorithmError> {
        if self.iteration >= self.config.max_iterations {
            return Ok(false);
        }
        self.iteration += 1;
        self.extend();

        let solution = self.snapshot();
        if self.iteration.is_multiple_of(5) {
            trace!(
                iteration = self.iteration,
                estimate = solution.data().estimate,
                error = solution.data().error,
                "series refined"
            );
        }
        slot.publish(solution);

        if !self.config.step_delay.is_zero() {
            thread::sleep(self.config.step_delay);
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anytime::types::Shared;
    use std::sync::Arc;

    fn fast(series: AlternatingSeries) -> SeriesRefiner {
        SeriesRefiner::new(
            SeriesConfig::default()
                .with_series(series)
                .with_step_delay(Duration::ZERO),
        )
        .unwrap()
    }

    #[test]
    fn test_terms() {
        assert!((AlternatingSeries::Leibniz.term(0) - 4.0).abs() < 1e-12);
        assert!((AlternatingSeries::Leibniz.term(1) + 4.0 / 3.0).abs() < 1e-12);
        assert!((AlternatingSeries::AlternatingHarmonic.term(3) + 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_initial_solution_uses_one_batch() {
        let mut refiner = fast(AlternatingSeries::Leibniz);
        let initial = refiner.initial_solution().unwrap();
        let expected: f64 = (0..10).map(|n| AlternatingSeries::Leibniz.term(n)).sum();

        assert_eq!(initial.data().terms, 10);
        assert!((initial.data().estimate - expected).abs() < 1e-12);
        let quality = 1.0 / (1.0 + 10.0 * (expected - PI).abs());
        assert!((initial.quality() - quality).abs() < 1e-12);
    }

    #[test]
    fn test_quality_strictly_improves() {
        for series in [AlternatingSeries::Leibniz, AlternatingSeries::AlternatingHarmonic] {
            let mut refiner = fast(series);
            let slot = SolutionSlot::new(Arc::new(Shared::new()));
            let mut last = refiner.initial_solution().unwrap().quality();

            while refiner.compute_step(&slot).unwrap() {
                let q = slot.current().unwrap().quality();
                assert!(q > last, "{series:?}: {q} <= {last}");
                last = q;
            }
            assert_eq!(refiner.iterations(), 50);
            assert_eq!(slot.current().unwrap().data().terms, 510);
        }
    }

    #[test]
    fn test_converges_toward_target() {
        let mut refiner = fast(AlternatingSeries::Leibniz);
        let slot = SolutionSlot::new(Arc::new(Shared::new()));
        refiner.initial_solution().unwrap();
        while refiner.compute_step(&slot).unwrap() {}

        let last = slot.current().unwrap();
        assert!(last.data().error < 0.01);
        assert!(last.quality() > 0.9);
    }

    #[test]
    fn test_validate() {
        assert!(SeriesConfig::default().validate().is_ok());
        let base = SeriesConfig::default();
        assert!(base.clone().with_terms_per_step(0).validate().is_err());
        assert!(base.with_error_scale(-1.0).validate().is_err());
    }
}
