//! Core types for anytime computations.

use crate::error::AlgorithmError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Immutable snapshot of a computation's best result.
///
/// Quality is always in `[0, 1]`: [`Solution::new`] clamps out-of-range
/// values and maps NaN to `0.0`. A new snapshot is built for every
/// improvement; published snapshots are shared read-only behind an [`Arc`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Solution<D> {
    data: D,
    quality: f64,
}

impl<D> Solution<D> {
    /// Creates a snapshot, clamping `quality` into `[0, 1]`.
    pub fn new(data: D, quality: f64) -> Self {
        let quality = if quality.is_nan() {
            0.0
        } else {
            quality.clamp(0.0, 1.0)
        };
        Self { data, quality }
    }

    /// The result payload.
    pub fn data(&self) -> &D {
        &self.data
    }

    /// Quality in `[0, 1]`. Higher is better.
    pub fn quality(&self) -> f64 {
        self.quality
    }

    /// Consumes the snapshot, returning the payload.
    pub fn into_data(self) -> D {
        self.data
    }
}

/// Lifecycle of an [`AnytimeAlgorithm`](super::AnytimeAlgorithm).
///
/// `Running` is entered only through `start()`. Every other state except
/// `NotStarted` is terminal for the current run; a fresh `start()` begins a
/// new run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AlgorithmState {
    NotStarted,
    Running,
    CompletedNaturally,
    StoppedExternally,
    FailedAbnormally,
}

impl AlgorithmState {
    /// Returns `true` for the states a run ends in.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            AlgorithmState::CompletedNaturally
                | AlgorithmState::StoppedExternally
                | AlgorithmState::FailedAbnormally
        )
    }
}

/// Contents of the lock-guarded cell shared by worker and meta-level.
#[derive(Debug)]
pub(crate) struct Published<D> {
    pub(crate) solution: Option<Arc<Solution<D>>>,
    pub(crate) state: AlgorithmState,
    pub(crate) failure: Option<AlgorithmError>,
}

#[derive(Debug)]
pub(crate) struct Shared<D> {
    pub(crate) running: AtomicBool,
    cell: Mutex<Published<D>>,
}

impl<D> Shared<D> {
    pub(crate) fn new() -> Self {
        Self {
            running: AtomicBool::new(false),
            cell: Mutex::new(Published {
                solution: None,
                state: AlgorithmState::NotStarted,
                failure: None,
            }),
        }
    }

    /// Locks the cell. The cell only ever holds complete values, so a
    /// poisoned lock is still safe to read.
    pub(crate) fn lock(&self) -> MutexGuard<'_, Published<D>> {
        self.cell.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}

/// Thread-safe publication handle handed to [`AnytimeProblem::compute_step`].
///
/// This is the only path by which a worker makes results visible to the
/// meta-level.
#[derive(Debug)]
pub struct SolutionSlot<D> {
    shared: Arc<Shared<D>>,
}

impl<D> SolutionSlot<D> {
    pub(crate) fn new(shared: Arc<Shared<D>>) -> Self {
        Self { shared }
    }

    pub(crate) fn shared(&self) -> &Shared<D> {
        &self.shared
    }

    /// Replaces the current solution.
    pub fn publish(&self, solution: Solution<D>) {
        self.shared.lock().solution = Some(Arc::new(solution));
    }

    /// Most recently published solution.
    pub fn current(&self) -> Option<Arc<Solution<D>>> {
        self.shared.lock().solution.clone()
    }

    /// Whether the meta-level still wants the computation to run.
    ///
    /// Long steps may poll this to finish early; the worker checks it
    /// before every step regardless.
    pub fn keep_running(&self) -> bool {
        self.shared.is_running()
    }
}

/// An interruptible computation that produces progressively better results.
///
/// The implementor owns all optimization state (permutations, estimates,
/// counters). It is moved into a dedicated worker thread for the duration of
/// a run and handed back when the run ends.
///
/// # Examples
///
/// ```
/// use u_anytime::anytime::{AnytimeProblem, Solution, SolutionSlot};
/// use u_anytime::error::AlgorithmError;
///
/// struct Countdown { left: u32 }
///
/// impl AnytimeProblem for Countdown {
///     type Data = u32;
///
///     fn initial_solution(&mut self) -> Result<Solution<u32>, AlgorithmError> {
///         self.left = 10;
///         Ok(Solution::new(0, 0.0))
///     }
///
///     fn compute_step(&mut self, slot: &SolutionSlot<u32>) -> Result<bool, AlgorithmError> {
///         if self.left == 0 {
///             return Ok(false);
///         }
///         self.left -= 1;
///         let done = 10 - self.left;
///         slot.publish(Solution::new(done, f64::from(done) / 10.0));
///         Ok(true)
///     }
/// }
/// ```
pub trait AnytimeProblem: Send + 'static {
    /// Payload carried by each [`Solution`].
    type Data: Send + Sync + 'static;

    /// Builds the starting (typically low-quality) solution.
    ///
    /// Called synchronously by `start()`; also resets any per-run state
    /// such as iteration counters.
    fn initial_solution(&mut self) -> Result<Solution<Self::Data>, AlgorithmError>;

    /// Performs one unit of work.
    ///
    /// Publishes through `slot` whenever an improvement is found. Returns
    /// `Ok(true)` while more work remains and `Ok(false)` once the budget is
    /// exhausted. An `Err` ends the run in
    /// [`AlgorithmState::FailedAbnormally`].
    fn compute_step(&mut self, slot: &SolutionSlot<Self::Data>) -> Result<bool, AlgorithmError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solution_clamps_quality() {
        assert_eq!(Solution::new((), 1.5).quality(), 1.0);
        assert_eq!(Solution::new((), -0.2).quality(), 0.0);
        assert_eq!(Solution::new((), f64::NAN).quality(), 0.0);
        assert_eq!(Solution::new((), 0.42).quality(), 0.42);
    }

    #[test]
    fn test_terminal_states() {
        assert!(!AlgorithmState::NotStarted.is_terminal());
        assert!(!AlgorithmState::Running.is_terminal());
        assert!(AlgorithmState::CompletedNaturally.is_terminal());
        assert!(AlgorithmState::StoppedExternally.is_terminal());
        assert!(AlgorithmState::FailedAbnormally.is_terminal());
    }

    #[test]
    fn test_slot_publish_replaces_snapshot() {
        let shared = Arc::new(Shared::new());
        let slot = SolutionSlot::new(Arc::clone(&shared));
        assert!(slot.current().is_none());

        slot.publish(Solution::new("a", 0.1));
        let first = slot.current().unwrap();
        slot.publish(Solution::new("b", 0.2));

        // Earlier snapshots are unaffected by later publications.
        assert_eq!(*first.data(), "a");
        assert_eq!(*slot.current().unwrap().data(), "b");
    }
}
