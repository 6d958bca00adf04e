//! Explicit timing instrumentation fed by the presentation loop.
//!
//! There is no process-wide metrics registry: the loop controller owns one
//! [`LoopMetrics`] object and hands clones of the handle to whoever wants to
//! observe it. Reads are snapshots and never influence loop timing.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Width of the trailing window used for the cycle rate.
const RATE_WINDOW: Duration = Duration::from_secs(1);

/// Cloneable handle onto the loop's timing counters.
///
/// The handle is shared between the loop thread and observers; every lock is
/// held only for a short bounded section, so recording stays cheap enough to
/// sit inside the render cycle.
#[derive(Clone, Debug, Default)]
pub struct LoopMetrics {
    inner: Arc<Mutex<MetricsInner>>,
}

#[derive(Debug, Default)]
struct MetricsInner {
    cycles: u64,
    faulted_invalidations: u64,
    last_draw_cost: Duration,
    window: VecDeque<(Instant, Duration)>,
}

impl LoopMetrics {
    /// Creates a fresh set of counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one completed cycle and the time its invalidations took.
    pub fn record_cycle(&self, draw_cost: Duration) {
        let now = Instant::now();
        let mut inner = self.lock();
        inner.cycles = inner.cycles.saturating_add(1);
        inner.last_draw_cost = draw_cost;
        inner.window.push_back((now, draw_cost));
        prune_window(&mut inner, now);
    }

    /// Records an invalidation that failed because its surface went away.
    pub fn record_faulted_invalidation(&self) {
        let mut inner = self.lock();
        inner.faulted_invalidations = inner.faulted_invalidations.saturating_add(1);
    }

    /// Captures a read-only view of the counters.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        let now = Instant::now();
        let mut inner = self.lock();
        prune_window(&mut inner, now);

        let window_len = inner.window.len();
        let average_draw_cost = if window_len == 0 {
            Duration::ZERO
        } else {
            let total: Duration = inner.window.iter().map(|(_, cost)| *cost).sum();
            total / window_len as u32
        };

        MetricsSnapshot {
            cycles: inner.cycles,
            faulted_invalidations: inner.faulted_invalidations,
            last_draw_cost: inner.last_draw_cost,
            average_draw_cost,
            cycles_per_second: window_len as f32 / RATE_WINDOW.as_secs_f32(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MetricsInner> {
        // A panic while holding the lock leaves the counters intact; keep
        // serving them instead of propagating the poison.
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

fn prune_window(inner: &mut MetricsInner, now: Instant) {
    while let Some((recorded, _)) = inner.window.front() {
        if now.duration_since(*recorded) > RATE_WINDOW {
            let _ = inner.window.pop_front();
        } else {
            break;
        }
    }
}

/// Point-in-time view of the loop counters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MetricsSnapshot {
    /// Total cycles completed since the loop started.
    pub cycles: u64,
    /// Invalidations that failed because their surface was lost.
    pub faulted_invalidations: u64,
    /// Draw cost recorded for the most recent cycle.
    pub last_draw_cost: Duration,
    /// Mean draw cost over the trailing rate window.
    pub average_draw_cost: Duration,
    /// Cycles completed per wall-clock second over the trailing window.
    pub cycles_per_second: f32,
}
