//! Worker lifecycle for anytime computations.
//!
//! [`AnytimeAlgorithm`] owns an [`AnytimeProblem`] and runs its steps on a
//! dedicated thread:
//!
//! 1. `start()` computes the initial solution synchronously and publishes it
//! 2. the worker checks the running flag, then runs one `compute_step`
//! 3. repeat until the problem reports exhaustion, fails, or the flag clears
//! 4. the worker hands the problem back through a channel and exits
//!
//! Cancellation is cooperative: a step already in flight always completes
//! before the worker observes `stop()`.

use super::config::AnytimeConfig;
use super::types::{AlgorithmState, AnytimeProblem, Shared, Solution, SolutionSlot};
use crate::error::{AlgorithmError, ConfigError, MetaError, Result};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::Ordering;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Result of a [`AnytimeAlgorithm::stop`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StopOutcome {
    /// Nothing was running; the call had no effect.
    NotRunning,
    /// The worker observed the request and exited.
    Stopped,
    /// The worker did not exit within the stop timeout and was left behind.
    ///
    /// It exits on its own once its current step finishes; the problem
    /// is reclaimed by the next `start()`.
    Leaked,
}

struct Worker<P> {
    returned: Receiver<P>,
    handle: JoinHandle<()>,
}

/// Interruptible execution of an [`AnytimeProblem`] on a background worker.
///
/// The meta-level interacts only through `start`, `stop`, `running`,
/// `state` and `current_solution`; the problem itself is never touched
/// while a run is active.
///
/// # Examples
///
/// ```no_run
/// use u_anytime::anytime::{AnytimeAlgorithm, SeriesConfig, SeriesRefiner};
///
/// let refiner = SeriesRefiner::new(SeriesConfig::default()).unwrap();
/// let mut algorithm = AnytimeAlgorithm::new(refiner);
/// let initial = algorithm.start().unwrap();
/// println!("initial quality {:.3}", initial.quality());
/// algorithm.stop();
/// ```
pub struct AnytimeAlgorithm<P: AnytimeProblem> {
    problem: Option<P>,
    shared: Arc<Shared<P::Data>>,
    worker: Option<Worker<P>>,
    config: AnytimeConfig,
}

impl<P: AnytimeProblem> AnytimeAlgorithm<P> {
    /// Wraps `problem` with the default [`AnytimeConfig`].
    pub fn new(problem: P) -> Self {
        Self {
            problem: Some(problem),
            shared: Arc::new(Shared::new()),
            worker: None,
            config: AnytimeConfig::default(),
        }
    }

    /// Wraps `problem` with an explicit configuration.
    pub fn with_config(
        problem: P,
        config: AnytimeConfig,
    ) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        let mut algorithm = Self::new(problem);
        algorithm.config = config;
        Ok(algorithm)
    }

    /// Starts a run and returns the initial solution.
    ///
    /// A no-op returning the current solution if a run is already active.
    /// Restarting after a terminal state begins a fresh run.
    ///
    /// # Errors
    ///
    /// - [`MetaError::Algorithm`] if `initial_solution` fails
    /// - [`MetaError::WorkerUnavailable`] if a previously leaked worker has
    ///   still not exited
    pub fn start(&mut self) -> Result<Arc<Solution<P::Data>>> {
        if self.shared.is_running() {
            debug!("start ignored, algorithm already running");
            return self
                .shared
                .lock()
                .solution
                .clone()
                .ok_or(MetaError::AlreadyRunning);
        }

        if !self.reclaim(self.config.stop_timeout) {
            return Err(MetaError::WorkerUnavailable);
        }
        let mut problem = self.problem.take().ok_or(MetaError::WorkerUnavailable)?;

        let initial = match problem.initial_solution() {
            Ok(solution) => Arc::new(solution),
            Err(err) => {
                self.problem = Some(problem);
                record_failure(&self.shared, err.clone(), 0);
                return Err(err.into());
            }
        };

        {
            let mut cell = self.shared.lock();
            cell.solution = Some(Arc::clone(&initial));
            cell.state = AlgorithmState::Running;
            cell.failure = None;
        }
        self.shared.running.store(true, Ordering::Release);

        let (sender, returned) = mpsc::channel();
        let slot = SolutionSlot::new(Arc::clone(&self.shared));
        let spawned = thread::Builder::new()
            .name("anytime-worker".into())
            .spawn(move || {
                let mut problem = problem;
                run_steps(&mut problem, &slot);
                // The receiver is gone only if the algorithm was dropped.
                let _ = sender.send(problem);
            });

        match spawned {
            Ok(handle) => {
                self.worker = Some(Worker { returned, handle });
                debug!(quality = initial.quality(), "anytime algorithm started");
                Ok(initial)
            }
            Err(err) => {
                let err = AlgorithmError::Initialization(format!("failed to spawn worker: {err}"));
                self.shared.running.store(false, Ordering::Release);
                record_failure(&self.shared, err.clone(), 0);
                Err(err.into())
            }
        }
    }

    /// Requests the worker to stop and waits for it, bounded by
    /// [`AnytimeConfig::stop_timeout`].
    ///
    /// Idempotent: calling it when nothing runs returns
    /// [`StopOutcome::NotRunning`] and changes nothing.
    pub fn stop(&mut self) -> StopOutcome {
        if !self.shared.running.swap(false, Ordering::AcqRel) {
            // Finished on its own (or never started); collect the problem if it is back.
            self.reclaim(Duration::ZERO);
            return StopOutcome::NotRunning;
        }

        if self.reclaim(self.config.stop_timeout) {
            info!(state = ?self.state(), "anytime algorithm stopped by meta-level");
            StopOutcome::Stopped
        } else {
            warn!(
                timeout_ms = self.config.stop_timeout.as_millis() as u64,
                "anytime worker did not exit within stop timeout, leaving it behind"
            );
            StopOutcome::Leaked
        }
    }

    /// Whether the run is still wanted. Never blocks.
    ///
    /// Reflects the cancellation flag, not thread liveness: it turns `false`
    /// as soon as `stop()` is called, even if the worker is still inside a
    /// step (see [`StopOutcome::Leaked`]). [`state`](Self::state) stays
    /// [`AlgorithmState::Running`] until the worker has actually exited.
    pub fn running(&self) -> bool {
        self.shared.is_running()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> AlgorithmState {
        self.shared.lock().state
    }

    /// Most recently published solution, or `None` before the first `start()`.
    ///
    /// # Errors
    ///
    /// Returns the worker's failure once the run has ended in
    /// [`AlgorithmState::FailedAbnormally`].
    pub fn current_solution(&self) -> Result<Option<Arc<Solution<P::Data>>>> {
        let cell = self.shared.lock();
        match &cell.failure {
            Some(err) => Err(err.clone().into()),
            None => Ok(cell.solution.clone()),
        }
    }

    /// The problem, when no worker holds it.
    pub fn problem(&self) -> Option<&P> {
        self.problem.as_ref()
    }

    pub fn config(&self) -> &AnytimeConfig {
        &self.config
    }

    /// Takes the problem back from an exited worker.
    ///
    /// Waits up to `wait`. Returns `false` if a worker is still outstanding.
    fn reclaim(&mut self, wait: Duration) -> bool {
        let Some(worker) = self.worker.take() else {
            return true;
        };
        match worker.returned.recv_timeout(wait) {
            Ok(problem) => {
                // The worker has already sent its last message; joining is immediate.
                let _ = worker.handle.join();
                self.problem = Some(problem);
                true
            }
            Err(RecvTimeoutError::Timeout) => {
                self.worker = Some(worker);
                false
            }
            Err(RecvTimeoutError::Disconnected) => {
                let _ = worker.handle.join();
                false
            }
        }
    }
}

impl<P: AnytimeProblem> Drop for AnytimeAlgorithm<P> {
    fn drop(&mut self) {
        // Detach: the worker exits after its current step.
        self.shared.running.store(false, Ordering::Release);
    }
}

/// Worker body. Runs until exhaustion, failure, or a cleared running flag.
fn run_steps<P: AnytimeProblem>(problem: &mut P, slot: &SolutionSlot<P::Data>) {
    let shared = slot.shared();
    let mut steps = 0usize;

    loop {
        if !shared.is_running() {
            shared.lock().state = AlgorithmState::StoppedExternally;
            debug!(steps, "anytime worker observed stop request");
            return;
        }

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| problem.compute_step(slot)));
        steps += 1;

        match outcome {
            Ok(Ok(true)) => {}
            Ok(Ok(false)) => {
                let mut cell = shared.lock();
                // A stop that raced with completion keeps its claim on the run.
                cell.state = if shared.running.swap(false, Ordering::AcqRel) {
                    AlgorithmState::CompletedNaturally
                } else {
                    AlgorithmState::StoppedExternally
                };
                info!(steps, state = ?cell.state, "anytime algorithm finished");
                return;
            }
            Ok(Err(err)) => {
                record_failure(shared, err, steps);
                return;
            }
            Err(payload) => {
                record_failure(shared, AlgorithmError::Panicked(panic_message(&*payload)), steps);
                return;
            }
        }
    }
}

fn record_failure<D>(shared: &Shared<D>, err: AlgorithmError, steps: usize) {
    let mut cell = shared.lock();
    error!(steps, error = %err, "anytime algorithm failed");
    cell.state = AlgorithmState::FailedAbnormally;
    cell.failure = Some(err);
    shared.running.store(false, Ordering::Release);
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
