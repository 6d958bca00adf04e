#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Presentation plumbing for the Trackyard shell.
//!
//! This crate owns the continuous render cycle and everything that hangs off
//! it: the loop controller with its cooperative stop flag, the explicit
//! metrics object it feeds, the one-shot snapshot producer that renders onto
//! an offscreen buffer disjoint from the live surfaces, and the resize
//! hysteresis gate. The simulation itself is reached only through the
//! [`GameView`] capability trait.

mod cycle;
mod metrics;
mod paint;
mod snapshot;

pub use cycle::{LoopState, LoopStateError, PresentationLoop, CYCLE_PERIOD};
pub use metrics::{LoopMetrics, MetricsSnapshot};
pub use paint::{Canvas, Color, PixelBuffer};
pub use snapshot::{capture_snapshot, GameView};

use trackyard_core::SurfaceSize;

/// Minimum per-axis size change that triggers a full layout/redraw.
///
/// Host windowing systems report sub-pixel and rounding jitter on resize;
/// anything below this threshold is dropped to avoid redraw storms.
pub const REDRAW_SIZE_THRESHOLD: u32 = 20;

/// Hysteresis gate deciding whether a size change warrants a full redraw.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RedrawGate {
    accepted: SurfaceSize,
}

impl RedrawGate {
    /// Creates a gate anchored at the provided initial size.
    #[must_use]
    pub const fn new(initial: SurfaceSize) -> Self {
        Self { accepted: initial }
    }

    /// Size of the last accepted change.
    #[must_use]
    pub const fn accepted_size(&self) -> SurfaceSize {
        self.accepted
    }

    /// Observes a host-provided size change.
    ///
    /// Returns `true` and accepts the new size when either dimension moved by
    /// at least [`REDRAW_SIZE_THRESHOLD`] (a closed lower bound). Dropped
    /// changes do not shift the reference size, so drift made of small steps
    /// still triggers once it accumulates past the threshold.
    pub fn observe(&mut self, size: SurfaceSize) -> bool {
        let width_delta = size.width().abs_diff(self.accepted.width());
        let height_delta = size.height().abs_diff(self.accepted.height());

        if width_delta >= REDRAW_SIZE_THRESHOLD || height_delta >= REDRAW_SIZE_THRESHOLD {
            self.accepted = size;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{RedrawGate, REDRAW_SIZE_THRESHOLD};
    use trackyard_core::SurfaceSize;

    #[test]
    fn sub_threshold_jitter_is_dropped() {
        let mut gate = RedrawGate::new(SurfaceSize::new(800, 600));

        assert!(!gate.observe(SurfaceSize::new(819, 600)));
        assert!(!gate.observe(SurfaceSize::new(800, 619)));
        assert_eq!(gate.accepted_size(), SurfaceSize::new(800, 600));
    }

    #[test]
    fn threshold_is_a_closed_lower_bound() {
        let mut gate = RedrawGate::new(SurfaceSize::new(800, 600));

        assert!(gate.observe(SurfaceSize::new(800 + REDRAW_SIZE_THRESHOLD, 600)));
        assert_eq!(gate.accepted_size(), SurfaceSize::new(820, 600));
    }

    #[test]
    fn shrinking_dimensions_also_trigger() {
        let mut gate = RedrawGate::new(SurfaceSize::new(800, 600));

        assert!(gate.observe(SurfaceSize::new(800, 580)));
    }

    #[test]
    fn accumulated_drift_eventually_triggers() {
        let mut gate = RedrawGate::new(SurfaceSize::new(800, 600));

        for width in 801..819 {
            assert!(!gate.observe(SurfaceSize::new(width, 600)));
        }
        assert!(gate.observe(SurfaceSize::new(820, 600)));
    }
}
