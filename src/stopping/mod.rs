//! Stopping conditions.
//!
//! A stopping condition looks at the forecast, the current quality and the
//! elapsed time, and decides whether the anytime computation should halt.
//!
//! - [`UtilityStopping`]: expected utility of stopping vs. continuing
//! - [`DiminishingReturnsStopping`]: predicted gain below a minimum rate
//! - [`TimeoutStopping`]: wall-clock budget
//! - [`QualityThresholdStopping`]: target quality reached
//! - [`CompositeStopping`]: stop if any member would

mod composite;
mod rules;
mod types;
mod utility;

pub use composite::CompositeStopping;
pub use rules::{DiminishingReturnsStopping, QualityThresholdStopping, TimeoutStopping};
pub use types::{StopReason, StoppingCondition};
pub use utility::UtilityStopping;
