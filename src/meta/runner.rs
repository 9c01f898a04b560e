//! Meta-level control loop.
//!
//! # Algorithm
//!
//! 1. Start the anytime algorithm; its initial solution is the first observation
//! 2. At each decision:
//!    a. Append the observed quality to the history
//!    b. Forecast future quality from the history
//!    c. Ask the stopping condition for a verdict
//!    d. Stop the algorithm and return, or sleep `delta_t` and sample the
//!    current solution
//! 3. Also return once the algorithm exhausts its own budget
//!
//! # Reference
//!
//! Svegliato, Wray & Zilberstein (2018), "Meta-Level Control of Anytime
//! Algorithms with Online Performance Prediction", Algorithm 1.

use super::config::MetaConfig;
use super::events::{ControlEvent, EventSink, TracingSink};
use crate::anytime::{AlgorithmState, AnytimeAlgorithm, AnytimeProblem, Solution, StopOutcome};
use crate::error::{ConfigError, Result};
use crate::predict::PerformancePredictor;
use crate::stopping::{StopReason, StoppingCondition};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Result of a control-loop run.
#[derive(Debug, Clone)]
pub struct ControlOutcome<D> {
    /// The last observed solution.
    pub solution: Arc<Solution<D>>,

    /// Observed quality at each decision, in poll order.
    pub history: Vec<f64>,

    /// Number of decisions made.
    pub iterations: usize,

    /// Time from loop start to the stop decision.
    pub elapsed: Duration,

    /// Why the loop ended.
    pub reason: StopReason,

    /// Result of stopping the algorithm.
    pub stop_outcome: StopOutcome,

    /// Algorithm state after the stop.
    pub final_state: AlgorithmState,
}

/// Supervises one anytime algorithm with one predictor and one stopping
/// condition.
///
/// The loop is single-threaded: it sleeps between polls and touches the
/// algorithm only through `start`, `stop`, `running` and
/// `current_solution`.
///
/// # Examples
///
/// ```no_run
/// use u_anytime::anytime::{AnytimeAlgorithm, SeriesConfig, SeriesRefiner};
/// use u_anytime::meta::{MetaConfig, MetaReasoner};
/// use u_anytime::predict::SaturationPredictor;
/// use u_anytime::stopping::UtilityStopping;
///
/// let refiner = SeriesRefiner::new(SeriesConfig::default()).unwrap();
/// let mut algorithm = AnytimeAlgorithm::new(refiner);
/// let reasoner = MetaReasoner::new(MetaConfig::default()).unwrap();
///
/// let outcome = reasoner
///     .run_control_loop(
///         &mut algorithm,
///         &SaturationPredictor::default(),
///         &UtilityStopping::default(),
///     )
///     .unwrap();
/// println!("stopped after {} decisions: {:?}", outcome.iterations, outcome.reason);
/// ```
pub struct MetaReasoner {
    config: MetaConfig,
    sink: Arc<dyn EventSink>,
}

impl MetaReasoner {
    /// Creates a reasoner reporting to [`TracingSink`].
    pub fn new(config: MetaConfig) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            sink: Arc::new(TracingSink),
        })
    }

    /// Replaces the event sink.
    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn config(&self) -> &MetaConfig {
        &self.config
    }

    /// Runs the algorithm until the stopping condition fires or the
    /// algorithm completes on its own.
    ///
    /// # Errors
    ///
    /// Propagates start failures and failures surfaced by the worker. The
    /// algorithm is stopped before an error is returned.
    pub fn run_control_loop<P, F, C>(
        &self,
        algorithm: &mut AnytimeAlgorithm<P>,
        predictor: &F,
        stopping: &C,
    ) -> Result<ControlOutcome<P::Data>>
    where
        P: AnytimeProblem,
        F: PerformancePredictor + ?Sized,
        C: StoppingCondition + ?Sized,
    {
        let started = Instant::now();
        let mut observed = algorithm.start()?;
        let mut history = Vec::new();
        let mut iteration = 0usize;

        loop {
            // Checked before sampling: the worker publishes before it clears
            // the running flag, so the sample below includes its final result.
            let finished = iteration > 0 && !algorithm.running();
            if iteration > 0 {
                match algorithm.current_solution() {
                    Ok(Some(current)) => observed = current,
                    Ok(None) => {}
                    Err(err) => {
                        algorithm.stop();
                        return Err(err);
                    }
                }
            }

            let quality = observed.quality();
            history.push(quality);
            let elapsed = started.elapsed();
            let predictions = predictor.predict(&history);

            let decision = stopping
                .evaluate(&predictions, quality, elapsed)
                .or_else(|| finished.then_some(StopReason::AlgorithmCompleted))
                .or_else(|| {
                    self.config
                        .max_iterations
                        .filter(|&cap| iteration + 1 >= cap)
                        .map(|cap| StopReason::IterationCap { iterations: cap })
                });

            self.sink.on_event(&ControlEvent {
                iteration,
                elapsed,
                quality,
                prediction_head: predictions.first().copied(),
                decision: decision.clone(),
            });

            if let Some(reason) = decision {
                let stop_outcome = algorithm.stop();
                return Ok(ControlOutcome {
                    solution: observed,
                    history,
                    iterations: iteration + 1,
                    elapsed,
                    reason,
                    stop_outcome,
                    final_state: algorithm.state(),
                });
            }

            iteration += 1;
            thread::sleep(self.config.poll_interval);
        }
    }
}
