//! Meta-level control of anytime algorithms.
//!
//! An anytime algorithm can be interrupted at any time and returns a
//! progressively better result. This crate decides, at runtime and from
//! the observed quality signal alone, **when to stop** so as to balance
//! solution quality against computation time:
//!
//! - **Anytime execution**: [`anytime::AnytimeProblem`] defines one step of
//!   work; [`anytime::AnytimeAlgorithm`] runs it on a dedicated worker with
//!   cooperative cancellation and a lock-guarded current solution.
//! - **Performance prediction**: linear, saturating-exponential and
//!   moving-average forecasts of future quality.
//! - **Stopping conditions**: expected utility, diminishing returns,
//!   timeout, quality threshold, and their disjunction.
//! - **Meta-level control**: [`meta::MetaReasoner`] polls the algorithm,
//!   predicts, decides, and stops it.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use u_anytime::anytime::{AnytimeAlgorithm, OrderingConfig, OrderingProblem};
//! use u_anytime::meta::{MetaConfig, MetaReasoner};
//! use u_anytime::predict::LinearPredictor;
//! use u_anytime::stopping::{CompositeStopping, TimeoutStopping, UtilityStopping};
//!
//! let problem = OrderingProblem::new(OrderingConfig::default().with_seed(42)).unwrap();
//! let mut algorithm = AnytimeAlgorithm::new(problem);
//!
//! let stopping = CompositeStopping::new(vec![
//!     Box::new(UtilityStopping::default()),
//!     Box::new(TimeoutStopping::new(Duration::from_secs(5))),
//! ])
//! .unwrap();
//!
//! let reasoner = MetaReasoner::new(MetaConfig::default()).unwrap();
//! let outcome = reasoner
//!     .run_control_loop(&mut algorithm, &LinearPredictor::default(), &stopping)
//!     .unwrap();
//! println!("quality {:.3}: {:?}", outcome.solution.quality(), outcome.reason);
//! ```

pub mod anytime;
pub mod error;
pub mod meta;
pub mod predict;
pub mod stopping;
