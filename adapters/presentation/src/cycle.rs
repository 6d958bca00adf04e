//! The continuous render cycle and its one-shot lifecycle.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use thiserror::Error;
use trackyard_core::RenderSurface;

use crate::metrics::LoopMetrics;

/// Nominal interval between cycle starts (a ~60 cycles/second target).
pub const CYCLE_PERIOD: Duration = Duration::from_millis(16);

/// Lifecycle states of the presentation loop.
///
/// `Stopped` is terminal: a loop is started at most once and never restarted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    /// Constructed but not yet cycling.
    Idle,
    /// The background cycle is active.
    Running,
    /// The cycle has been shut down for good.
    Stopped,
}

/// Error raised when the loop is driven outside its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("presentation loop cannot start from the {state:?} state")]
pub struct LoopStateError {
    /// State the loop was in when the transition was rejected.
    pub state: LoopState,
}

/// Unbounded periodic cycle that invalidates the registered surfaces.
///
/// Each cycle measures its invalidation pass, records it into the loop's
/// [`LoopMetrics`], then suspends until the next period boundary. Cycles are
/// strictly sequential: an overrunning cycle delays the next one instead of
/// overlapping it. Cancellation is cooperative: [`stop`](Self::stop) raises
/// a flag the worker checks once per cycle, so stop latency is bounded by one
/// period.
#[derive(Debug)]
pub struct PresentationLoop {
    state: LoopState,
    stop_flag: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
    metrics: LoopMetrics,
}

impl Default for PresentationLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl PresentationLoop {
    /// Creates an idle loop with fresh metrics.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: LoopState::Idle,
            stop_flag: Arc::new(AtomicBool::new(false)),
            worker: None,
            metrics: LoopMetrics::new(),
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> LoopState {
        self.state
    }

    /// Handle onto the loop's timing counters.
    #[must_use]
    pub fn metrics(&self) -> LoopMetrics {
        self.metrics.clone()
    }

    /// Begins cycling over the provided surfaces on a background thread.
    ///
    /// Surfaces are invalidated in registration order within every cycle, so
    /// callers fix cross-surface ordering (main view before minimap) simply
    /// by the order of this vector. A surface that reports itself lost does
    /// not abort the cycle: the fault is counted and the remaining surfaces
    /// are still invalidated.
    ///
    /// Fails unless the loop is [`Idle`](LoopState::Idle).
    pub fn start(
        &mut self,
        surfaces: Vec<Arc<dyn RenderSurface + Send + Sync>>,
    ) -> Result<(), LoopStateError> {
        if self.state != LoopState::Idle {
            return Err(LoopStateError { state: self.state });
        }

        let stop_flag = Arc::clone(&self.stop_flag);
        let metrics = self.metrics.clone();
        self.worker = Some(thread::spawn(move || {
            run_cycles(&surfaces, &stop_flag, &metrics);
        }));
        self.state = LoopState::Running;
        Ok(())
    }

    /// Stops the cycle and waits for the in-flight cycle to finish.
    ///
    /// The worker observes the stop flag at its next cycle boundary; no cycle
    /// starts afterwards. Stopping an idle loop moves it straight to
    /// [`Stopped`](LoopState::Stopped); stopping twice is a no-op.
    pub fn stop(&mut self) {
        if self.state == LoopState::Stopped {
            return;
        }

        self.stop_flag.store(true, Ordering::Release);
        if let Some(worker) = self.worker.take() {
            // A panicked worker has already stopped cycling, which is all
            // stop() needs to guarantee.
            let _ = worker.join();
        }
        self.state = LoopState::Stopped;
    }
}

impl Drop for PresentationLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_cycles(
    surfaces: &[Arc<dyn RenderSurface + Send + Sync>],
    stop_flag: &AtomicBool,
    metrics: &LoopMetrics,
) {
    let mut next_deadline = Instant::now() + CYCLE_PERIOD;

    while !stop_flag.load(Ordering::Acquire) {
        let started = Instant::now();
        for surface in surfaces {
            if surface.invalidate().is_err() {
                metrics.record_faulted_invalidation();
            }
        }
        metrics.record_cycle(started.elapsed());

        let now = Instant::now();
        if next_deadline > now {
            thread::sleep(next_deadline - now);
            next_deadline += CYCLE_PERIOD;
        } else {
            // Overrun: start the next cycle immediately and re-anchor the
            // deadline rather than letting cycles pile up.
            next_deadline = now + CYCLE_PERIOD;
        }
    }
}
