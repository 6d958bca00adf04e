#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Orchestration shell wiring the Trackyard systems to their collaborators.
//!
//! The shell owns the simulation handle, the tool selector, the registered
//! commands and layer toggles, and the presentation loop. UI events (mode
//! toggle, tool pick, zoom, resize, snapshot) arrive as synchronous method
//! calls from a single logical owner; the loop thread only ever touches the
//! render surfaces and metrics, so no shared state here needs locking.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use trackyard_core::{
    LayerToggle, Mode, RenderSurface, SurfaceSize, TerrainCell, ToolSpec, UiCommand,
};
use trackyard_presentation::{
    capture_snapshot, GameView, LoopMetrics, PixelBuffer, PresentationLoop, RedrawGate,
};
use trackyard_system_selection::{SelectionError, ToolSelector};
use trackyard_system_terrain::{decode_terrain, encode_terrain, TerrainCodecError};

/// Persistent storage reached by the shell at save time.
///
/// The shell only produces the byte-shaped payloads; where they land (file,
/// clipboard, network) is the implementation's business.
pub trait Storage {
    /// Persists the static track entities of the current layout.
    fn write_static_entities(&mut self, layout: &str) -> Result<()>;

    /// Persists the encoded terrain grid.
    fn write_terrain(&mut self, map: &str) -> Result<()>;
}

/// Run-time shell of the track-building experience.
///
/// Construction starts the presentation loop; [`shutdown`](Self::shutdown)
/// (also run on drop) stops it before the simulation is disposed, so the
/// loop can never invalidate a released surface.
pub struct Shell<G>
where
    G: GameView,
{
    game: G,
    selector: ToolSelector,
    commands: Vec<Box<dyn UiCommand>>,
    layers: Vec<LayerToggle>,
    cycle: PresentationLoop,
    gate: RedrawGate,
    terrain: Vec<TerrainCell>,
    shut_down: bool,
}

impl<G> Shell<G>
where
    G: GameView,
{
    /// Wires the shell and starts the presentation loop.
    ///
    /// The main view is registered ahead of the minimap, which fixes the
    /// per-cycle invalidation order. The selector starts in `mode` with the
    /// default tool (first presentable in catalog order) already applied.
    pub fn new(
        game: G,
        mode: Mode,
        catalog: Vec<ToolSpec>,
        main_view: Arc<dyn RenderSurface + Send + Sync>,
        minimap: Arc<dyn RenderSurface + Send + Sync>,
    ) -> Result<Self> {
        let mut selector = ToolSelector::new(mode, catalog);
        selector.ensure_default_selection();

        let gate = RedrawGate::new(game.current_size());

        let mut cycle = PresentationLoop::new();
        cycle
            .start(vec![main_view, minimap])
            .context("failed to start the presentation loop")?;

        Ok(Self {
            game,
            selector,
            commands: Vec::new(),
            layers: Vec::new(),
            cycle,
            gate,
            terrain: Vec::new(),
            shut_down: false,
        })
    }

    /// Mode the shell currently operates under.
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.selector.mode()
    }

    /// Currently active tool, if any.
    #[must_use]
    pub fn active_tool(&self) -> Option<&ToolSpec> {
        self.selector.active_tool()
    }

    /// Ordered tools presentable under the current mode.
    #[must_use]
    pub fn presentable_tools(&self) -> Vec<&ToolSpec> {
        self.selector.presentable().collect()
    }

    /// Flips between build and play mode, re-deriving the active tool.
    pub fn toggle_mode(&mut self) {
        self.selector.toggle_mode();
    }

    /// Explicitly selects a tool by name.
    pub fn select_tool(&mut self, name: &str) -> Result<(), SelectionError> {
        self.selector.select_tool(name)
    }

    /// Registers a named command for [`run_command`](Self::run_command).
    pub fn register_command(&mut self, command: Box<dyn UiCommand>) {
        self.commands.push(command);
    }

    /// Executes the named command.
    pub fn run_command(&mut self, name: &str) -> Result<()> {
        let Some(command) = self
            .commands
            .iter_mut()
            .find(|command| command.name() == name)
        else {
            bail!("unknown command '{name}'");
        };
        command.execute();
        Ok(())
    }

    /// Registers a toggleable presentation layer.
    pub fn register_layer(&mut self, layer: LayerToggle) {
        self.layers.push(layer);
    }

    /// Registered layers in registration order.
    #[must_use]
    pub fn layers(&self) -> &[LayerToggle] {
        &self.layers
    }

    /// Shows or hides the named layer.
    pub fn set_layer_enabled(&mut self, name: &str, enabled: bool) -> Result<()> {
        let Some(layer) = self.layers.iter_mut().find(|layer| layer.name() == name) else {
            bail!("unknown layer '{name}'");
        };
        layer.set_enabled(enabled);
        Ok(())
    }

    /// Steps the simulation zoom in by one notch.
    pub fn zoom_in(&mut self) {
        self.game.zoom(1);
    }

    /// Steps the simulation zoom out by one notch.
    pub fn zoom_out(&mut self) {
        self.game.zoom(-1);
    }

    /// Feeds a host resize notification through the hysteresis gate.
    ///
    /// Returns `true` when the change is large enough to warrant a full
    /// layout/redraw; sub-threshold jitter is dropped.
    pub fn observe_resize(&mut self, size: SurfaceSize) -> bool {
        self.gate.observe(size)
    }

    /// Captures a one-off high-resolution snapshot of the simulation.
    ///
    /// Independent of the live loop's cadence and surfaces; the returned
    /// buffer is handed to the caller for clipboard/file handoff.
    pub fn capture_snapshot(&self) -> Result<PixelBuffer> {
        capture_snapshot(&self.game)
    }

    /// Terrain cells currently held by the session.
    #[must_use]
    pub fn terrain(&self) -> &[TerrainCell] {
        &self.terrain
    }

    /// Replaces the session terrain wholesale.
    pub fn replace_terrain(&mut self, cells: Vec<TerrainCell>) {
        self.terrain = cells;
    }

    /// Loads terrain from its flat text form.
    ///
    /// A malformed file leaves the previous terrain untouched: the codec
    /// never yields a partial grid, so the session cannot start over stale or
    /// truncated elevation data. Callers should surface the error rather
    /// than substitute a default grid.
    pub fn load_terrain(&mut self, text: &str) -> Result<(), TerrainCodecError> {
        self.terrain = decode_terrain(text)?;
        Ok(())
    }

    /// Persists the current layout and terrain through the storage seam.
    pub fn save(&self, layout: &str, storage: &mut dyn Storage) -> Result<()> {
        storage
            .write_static_entities(layout)
            .context("failed to persist static entities")?;
        storage
            .write_terrain(&encode_terrain(&self.terrain))
            .context("failed to persist terrain")?;
        Ok(())
    }

    /// Handle onto the presentation loop's timing counters.
    #[must_use]
    pub fn metrics(&self) -> LoopMetrics {
        self.cycle.metrics()
    }

    /// Stops the presentation loop, then disposes the simulation.
    ///
    /// The loop is joined before `dispose` runs, so no invalidation can race
    /// the teardown. Safe to call more than once.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;
        self.cycle.stop();
        self.game.dispose();
    }
}

impl<G> Drop for Shell<G>
where
    G: GameView,
{
    fn drop(&mut self) {
        self.shutdown();
    }
}
