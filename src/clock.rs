//! Pluggable time source for deadline scheduling.
//!
//! The worker never reads the system clock directly; it asks a [`Clock`] so
//! deadline behaviour stays deterministic under test. The default
//! [`TokioClock`] is anchored to the tokio runtime clock, which means
//! paused-time tests advance it together with the worker's sleeps.

use std::sync::Arc;

use tokio::time::Instant;

/// Monotonic time source measured in seconds.
pub trait Clock: Send + Sync {
    /// Current time in seconds. Successive calls never decrease.
    fn now(&self) -> f64;
}

/// Shared clock handle stored by the session.
pub type SharedClock = Arc<dyn Clock>;

/// Default clock reporting seconds elapsed since its construction.
#[derive(Clone, Debug)]
pub struct TokioClock {
    epoch: Instant,
}

impl TokioClock {
    /// Construct a clock anchored at the current instant.
    #[must_use]
    pub fn new() -> Self { Self { epoch: Instant::now() } }
}

impl Default for TokioClock {
    fn default() -> Self { Self::new() }
}

impl Clock for TokioClock {
    fn now(&self) -> f64 { self.epoch.elapsed().as_secs_f64() }
}
