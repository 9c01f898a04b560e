//! Meta-level control.
//!
//! [`MetaReasoner`] wires one [`AnytimeAlgorithm`](crate::anytime::AnytimeAlgorithm),
//! one [`PerformancePredictor`](crate::predict::PerformancePredictor) and one
//! [`StoppingCondition`](crate::stopping::StoppingCondition) into a polling
//! loop, emitting a [`ControlEvent`] per decision.

mod config;
mod events;
mod runner;

pub use config::MetaConfig;
pub use events::{ControlEvent, EventLog, EventSink, TracingSink};
pub use runner::{ControlOutcome, MetaReasoner};
