//! Structured control-loop events.

use crate::stopping::StopReason;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tracing::{debug, info};

/// One control-loop decision.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControlEvent {
    /// Zero-based decision index.
    pub iteration: usize,

    /// Time since the loop started.
    pub elapsed: Duration,

    /// Quality of the solution observed at this decision.
    pub quality: f64,

    /// Nearest predicted quality, if the predictor produced any.
    pub prediction_head: Option<f64>,

    /// `Some` on the final decision.
    pub decision: Option<StopReason>,
}

/// Receives control-loop events.
///
/// Implemented for closures, so `|event: &ControlEvent| { ... }` can be
/// passed directly.
pub trait EventSink: Send + Sync {
    fn on_event(&self, event: &ControlEvent);
}

impl<F> EventSink for F
where
    F: Fn(&ControlEvent) + Send + Sync,
{
    fn on_event(&self, event: &ControlEvent) {
        self(event)
    }
}

/// Forwards events to `tracing`: decisions to continue at `debug`, the
/// stop decision at `info`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn on_event(&self, event: &ControlEvent) {
        match &event.decision {
            Some(reason) => info!(
                iteration = event.iteration,
                elapsed_ms = event.elapsed.as_millis() as u64,
                quality = event.quality,
                prediction = ?event.prediction_head,
                reason = ?reason,
                "meta-level stopping"
            ),
            None => debug!(
                iteration = event.iteration,
                elapsed_ms = event.elapsed.as_millis() as u64,
                quality = event.quality,
                prediction = ?event.prediction_head,
                "meta-level continuing"
            ),
        }
    }
}

/// Collects events in memory.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Mutex<Vec<ControlEvent>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the events recorded so far, in emission order.
    pub fn events(&self) -> Vec<ControlEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventSink for EventLog {
    fn on_event(&self, event: &ControlEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }
}
