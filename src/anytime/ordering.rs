//! Local-search order optimizer.
//!
//! Searches for an ordering of `N` items that minimizes a noisy adjacency
//! cost. Each step swaps two positions within a neighborhood radius that
//! shrinks linearly as the iteration budget is consumed: a linear cooling
//! schedule without the Metropolis criterion, so only strict improvements
//! replace the incumbent.
//!
//! Quality is `1 / (1 + cost / K)` for the configured scale `K`.

use super::types::{AnytimeProblem, Solution, SolutionSlot};
use crate::error::{AlgorithmError, ConfigError};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::thread;
use std::time::Duration;
use tracing::trace;

/// Configuration for [`OrderingProblem`].
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_anytime::anytime::OrderingConfig;
///
/// let config = OrderingConfig::default()
///     .with_items(8)
///     .with_max_iterations(200)
///     .with_step_delay(Duration::ZERO)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrderingConfig {
    /// Number of items to order.
    pub items: usize,

    /// Edge length of each item; adjacency cost scales with its square.
    pub item_size: usize,

    /// Step budget. `compute_step` reports exhaustion once reached.
    pub max_iterations: usize,

    /// Scale `K` of the quality transform `1 / (1 + cost / K)`.
    pub cost_scale: f64,

    /// Upper bound of the uniform evaluation noise. 0 = deterministic cost.
    pub noise: f64,

    /// Simulated work per step.
    pub step_delay: Duration,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for OrderingConfig {
    fn default() -> Self {
        Self {
            items: 5,
            item_size: 10,
            max_iterations: 100,
            cost_scale: 1000.0,
            noise: 100.0,
            step_delay: Duration::from_millis(50),
            seed: None,
        }
    }
}

impl OrderingConfig {
    pub fn with_items(mut self, n: usize) -> Self {
        self.items = n;
        self
    }

    pub fn with_item_size(mut self, size: usize) -> Self {
        self.item_size = size;
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_cost_scale(mut self, k: f64) -> Self {
        self.cost_scale = k;
        self
    }

    pub fn with_noise(mut self, noise: f64) -> Self {
        self.noise = noise;
        self
    }

    pub fn with_step_delay(mut self, delay: Duration) -> Self {
        self.step_delay = delay;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.items == 0 {
            return Err(ConfigError::Empty { name: "items" });
        }
        ConfigError::positive("item_size", self.item_size as f64)?;
        ConfigError::positive("cost_scale", self.cost_scale)?;
        ConfigError::non_negative("noise", self.noise)?;
        Ok(())
    }
}

/// Payload of an ordering [`Solution`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrderingData {
    pub order: Vec<usize>,
    pub cost: f64,
}

/// Anytime local search over item orderings.
pub struct OrderingProblem {
    config: OrderingConfig,
    rng: StdRng,
    best_order: Vec<usize>,
    best_cost: f64,
    iteration: usize,
}

impl OrderingProblem {
    pub fn new(config: OrderingConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };
        Ok(Self {
            best_order: (0..config.items).collect(),
            best_cost: f64::INFINITY,
            iteration: 0,
            config,
            rng,
        })
    }

    /// Steps taken in the current run.
    pub fn iterations(&self) -> usize {
        self.iteration
    }

    pub fn best_cost(&self) -> f64 {
        self.best_cost
    }

    /// Neighborhood radius for the current iteration count.
    fn swap_radius(&self) -> usize {
        (self.config.max_iterations.saturating_sub(self.iteration) / 20).max(1)
    }

    fn evaluate(&mut self, order: &[usize]) -> f64 {
        let area = (self.config.item_size * self.config.item_size) as f64;
        let adjacency: f64 = order
            .windows(2)
            .map(|w| w[0].abs_diff(w[1]) as f64 * area)
            .sum();
        let noise = if self.config.noise > 0.0 {
            self.rng.random_range(0.0..self.config.noise)
        } else {
            0.0
        };
        adjacency + noise
    }

    fn quality(&self, cost: f64) -> f64 {
        1.0 / (1.0 + cost / self.config.cost_scale)
    }

    fn snapshot(&self) -> Solution<OrderingData> {
        Solution::new(
            OrderingData {
                order: self.best_order.clone(),
                cost: self.best_cost,
            },
            self.quality(self.best_cost),
        )
    }
}

impl AnytimeProblem for OrderingProblem {
    type Data = OrderingData;

    fn initial_solution(&mut self) -> Result<Solution<OrderingData>, AlgorithmError> {
        self.iteration = 0;
        let mut order: Vec<usize> = (0..self.config.items).collect();
        order.shuffle(&mut self.rng);
        self.best_cost = self.evaluate(&order);
        self.best_order = order;
        Ok(self.snapshot())
    }

    fn compute_step(&mut self, slot: &SolutionSlot<OrderingData>) -> Result<bool, AlgorithmError> {
        if self.iteration >= self.config.max_iterations {
            return Ok(false);
        }

        self.iteration += 1;
        let radius = self.swap_radius();

        let n = self.best_order.len();
        let i = self.rng.random_range(0..n);
        let j = self
            .rng
            .random_range(i.saturating_sub(radius)..=(i + radius).min(n - 1));

        let mut candidate = self.best_order.clone();
        candidate.swap(i, j);
        let candidate_cost = self.evaluate(&candidate);

        if candidate_cost < self.best_cost {
            self.best_order = candidate;
            self.best_cost = candidate_cost;
            trace!(iteration = self.iteration, cost = self.best_cost, "ordering improved");
            slot.publish(self.snapshot());
        }

        if !self.config.step_delay.is_zero() {
            thread::sleep(self.config.step_delay);
        }
        Ok(true)
    }
}
