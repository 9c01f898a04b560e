//! Error types.
//!
//! Predictors and stopping conditions never fail on valid input; every
//! degenerate numeric case is a policy-defined fallback. What remains is
//! configuration validation, failures raised by the object-level
//! computation, and lifecycle misuse of an [`AnytimeAlgorithm`].
//!
//! [`AnytimeAlgorithm`]: crate::anytime::AnytimeAlgorithm

use thiserror::Error;

/// Invalid construction option.
///
/// Raised eagerly by `validate()` and by every policy constructor, never at
/// first use.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    #[error("{name} must be non-negative, got {value}")]
    Negative { name: &'static str, value: f64 },

    #[error("{name} must be in [{min}, {max}], got {value}")]
    OutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{name} must not be empty")]
    Empty { name: &'static str },
}

impl ConfigError {
    /// Checks `value > 0` (NaN fails).
    pub(crate) fn positive(
        name: &'static str,
        value: f64,
    ) -> std::result::Result<(), ConfigError> {
        if value > 0.0 {
            Ok(())
        } else {
            Err(ConfigError::NonPositive { name, value })
        }
    }

    /// Checks `value >= 0` (NaN fails).
    pub(crate) fn non_negative(
        name: &'static str,
        value: f64,
    ) -> std::result::Result<(), ConfigError> {
        if value >= 0.0 {
            Ok(())
        } else {
            Err(ConfigError::Negative { name, value })
        }
    }

    /// Checks `min < value <= max` when `open_min`, otherwise `min <= value <= max`.
    pub(crate) fn in_range(
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
        open_min: bool,
    ) -> std::result::Result<(), ConfigError> {
        let low_ok = if open_min { value > min } else { value >= min };
        if low_ok && value <= max {
            Ok(())
        } else {
            Err(ConfigError::OutOfRange {
                name,
                value,
                min,
                max,
            })
        }
    }
}

/// Failure of the object-level computation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AlgorithmError {
    /// `initial_solution` could not produce a starting point.
    #[error("initialization failed: {0}")]
    Initialization(String),

    /// `compute_step` returned an error.
    #[error("step failed: {0}")]
    Step(String),

    /// The worker panicked inside a step.
    #[error("worker panicked: {0}")]
    Panicked(String),
}

/// Errors propagated to the caller of the control loop.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MetaError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("algorithm failed: {0}")]
    Algorithm(#[from] AlgorithmError),

    /// `start()` called while the worker is active.
    #[error("algorithm is already running")]
    AlreadyRunning,

    /// A previous worker missed its stop timeout and still owns the problem.
    #[error("previous worker has not exited; problem state unavailable")]
    WorkerUnavailable,
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, MetaError>;
