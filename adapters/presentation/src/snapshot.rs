//! On-demand capture of the simulation into an offscreen buffer.

use anyhow::Result;
use trackyard_core::SurfaceSize;

use crate::paint::{Canvas, PixelBuffer};

/// Capability surface the shell uses to reach the simulation.
///
/// Rendering is side-effect free with respect to the canvas transform as far
/// as callers are concerned: the snapshot producer brackets every call in a
/// save/restore pair, so a renderer that leaves a translation behind cannot
/// leak it into later captures.
pub trait GameView {
    /// Renders the current simulation state onto the provided canvas.
    fn render(&self, canvas: &mut Canvas<'_>) -> Result<()>;

    /// Current size of the simulation's drawable area.
    fn current_size(&self) -> SurfaceSize;

    /// Adjusts the zoom level by the provided number of steps.
    fn zoom(&mut self, delta: i32);

    /// Releases the simulation's resources.
    ///
    /// Called by the shell after the presentation loop has stopped, never
    /// while surfaces may still be invalidated.
    fn dispose(&mut self);
}

/// Renders the game once into a fresh buffer sized to its current state.
///
/// The buffer is independent of the live loop's surfaces, making capture
/// reentrant-safe with respect to the render cycle, and the call is
/// idempotent: unchanged game state yields bit-identical buffers. Renderer
/// errors propagate to the caller with the save/restore bracket closed; no
/// retry is attempted.
pub fn capture_snapshot(game: &dyn GameView) -> Result<PixelBuffer> {
    let mut buffer = PixelBuffer::new(game.current_size());
    let mut canvas = Canvas::new(&mut buffer);

    canvas.save();
    let rendered = game.render(&mut canvas);
    canvas.restore();
    rendered?;

    Ok(buffer)
}
