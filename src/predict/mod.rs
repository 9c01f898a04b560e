//! Online performance prediction.
//!
//! A predictor turns the quality history observed so far into a short
//! forecast of future quality, which stopping conditions weigh against the
//! cost of continuing.
//!
//! - [`LinearPredictor`]: least-squares trend
//! - [`SaturationPredictor`]: exponential approach to a quality ceiling
//! - [`MovingAveragePredictor`]: average of recent improvements
//!
//! # References
//!
//! Svegliato, Wray & Zilberstein (2018), "Meta-Level Control of Anytime
//! Algorithms with Online Performance Prediction"

mod linear;
mod moving_average;
mod saturation;
mod types;

pub use linear::LinearPredictor;
pub use moving_average::MovingAveragePredictor;
pub use saturation::SaturationPredictor;
pub use types::PerformancePredictor;
