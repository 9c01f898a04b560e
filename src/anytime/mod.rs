//! Anytime computations.
//!
//! An anytime algorithm can be interrupted at any point and returns a
//! result whose quality improves with additional time. This module
//! provides the execution abstraction ([`AnytimeProblem`] driven by an
//! [`AnytimeAlgorithm`] worker) and two reference problems.
//!
//! # References
//!
//! - Dean & Boddy (1988), "An Analysis of Time-Dependent Planning"
//! - Zilberstein (1996), "Using Anytime Algorithms in Intelligent Systems"

mod config;
mod ordering;
mod runner;
mod series;
mod types;

pub use config::AnytimeConfig;
pub use ordering::{OrderingConfig, OrderingData, OrderingProblem};
pub use runner::{AnytimeAlgorithm, StopOutcome};
pub use series::{AlternatingSeries, SeriesConfig, SeriesData, SeriesRefiner};
pub use types::{AlgorithmState, AnytimeProblem, Solution, SolutionSlot};
