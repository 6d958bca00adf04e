use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use anyhow::Result;
use trackyard_core::{
    LayerToggle, Mode, RenderSurface, SurfaceLost, SurfaceSize, TerrainCell, ToolApplicability,
    ToolSpec, UiCommand,
};
use trackyard_presentation::{Canvas, Color, GameView, CYCLE_PERIOD};
use trackyard_shell::{Shell, Storage};
use trackyard_system_selection::SelectionError;

/// Simulation stub whose render output depends only on the zoom level.
struct StubGame {
    size: SurfaceSize,
    zoom_level: i32,
    disposed: Arc<AtomicBool>,
}

impl StubGame {
    fn new(disposed: Arc<AtomicBool>) -> Self {
        Self {
            size: SurfaceSize::new(32, 32),
            zoom_level: 0,
            disposed,
        }
    }
}

impl GameView for StubGame {
    fn render(&self, canvas: &mut Canvas<'_>) -> Result<()> {
        let side = 2.0 + self.zoom_level as f32;
        canvas.fill_rect(
            glam::Vec2::ZERO,
            glam::Vec2::splat(side.max(1.0)),
            Color::from_rgb_u8(200, 100, 0),
        );
        Ok(())
    }

    fn current_size(&self) -> SurfaceSize {
        self.size
    }

    fn zoom(&mut self, delta: i32) {
        self.zoom_level += delta;
    }

    fn dispose(&mut self) {
        self.disposed.store(true, Ordering::SeqCst);
    }
}

/// Surface stub that flags any invalidation arriving after game disposal.
struct GuardedSurface {
    invalidations: AtomicU64,
    disposed: Arc<AtomicBool>,
    violation: Arc<AtomicBool>,
}

impl GuardedSurface {
    fn new(disposed: Arc<AtomicBool>, violation: Arc<AtomicBool>) -> Self {
        Self {
            invalidations: AtomicU64::new(0),
            disposed,
            violation,
        }
    }
}

impl RenderSurface for GuardedSurface {
    fn invalidate(&self) -> Result<(), SurfaceLost> {
        if self.disposed.load(Ordering::SeqCst) {
            self.violation.store(true, Ordering::SeqCst);
            return Err(SurfaceLost::new("disposed surface"));
        }
        let _ = self.invalidations.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[derive(Default)]
struct MemoryStorage {
    static_entities: Vec<String>,
    terrain: Vec<String>,
}

impl Storage for MemoryStorage {
    fn write_static_entities(&mut self, layout: &str) -> Result<()> {
        self.static_entities.push(layout.to_owned());
        Ok(())
    }

    fn write_terrain(&mut self, map: &str) -> Result<()> {
        self.terrain.push(map.to_owned());
        Ok(())
    }
}

struct RecordedCommand {
    name: &'static str,
    executions: Arc<AtomicU64>,
}

impl UiCommand for RecordedCommand {
    fn name(&self) -> &str {
        self.name
    }

    fn execute(&mut self) {
        let _ = self.executions.fetch_add(1, Ordering::SeqCst);
    }
}

fn sample_catalog() -> Vec<ToolSpec> {
    vec![
        ToolSpec::new("Schedule", ToolApplicability::PlayOnly),
        ToolSpec::new("Inspect", ToolApplicability::Always),
        ToolSpec::new("Track", ToolApplicability::BuildOnly),
    ]
}

fn build_shell() -> (Shell<StubGame>, Arc<AtomicBool>, Arc<AtomicBool>) {
    let disposed = Arc::new(AtomicBool::new(false));
    let violation = Arc::new(AtomicBool::new(false));
    let main_view = Arc::new(GuardedSurface::new(
        Arc::clone(&disposed),
        Arc::clone(&violation),
    ));
    let minimap = Arc::new(GuardedSurface::new(
        Arc::clone(&disposed),
        Arc::clone(&violation),
    ));

    let shell = Shell::new(
        StubGame::new(Arc::clone(&disposed)),
        Mode::Building,
        sample_catalog(),
        main_view as _,
        minimap as _,
    )
    .expect("shell construction starts the loop");

    (shell, disposed, violation)
}

#[test]
fn construction_applies_the_default_tool() {
    let (mut shell, _, _) = build_shell();

    assert_eq!(shell.mode(), Mode::Building);
    assert_eq!(shell.active_tool().map(ToolSpec::name), Some("Inspect"));

    shell.shutdown();
}

#[test]
fn mode_toggle_recomputes_the_presentable_set() {
    let (mut shell, _, _) = build_shell();
    shell.select_tool("Track").expect("build-only tool");

    shell.toggle_mode();

    assert_eq!(shell.mode(), Mode::Playing);
    let names: Vec<&str> = shell
        .presentable_tools()
        .into_iter()
        .map(ToolSpec::name)
        .collect();
    assert_eq!(names, ["Schedule", "Inspect"]);
    assert_eq!(
        shell.active_tool().map(ToolSpec::name),
        Some("Schedule"),
        "the hidden build tool is replaced by the first presentable one",
    );

    shell.shutdown();
}

#[test]
fn unknown_tool_selection_is_surfaced() {
    let (mut shell, _, _) = build_shell();

    assert_eq!(
        shell.select_tool("Crane"),
        Err(SelectionError::UnknownTool("Crane".to_owned())),
    );

    shell.shutdown();
}

#[test]
fn save_writes_both_storage_channels() {
    let (mut shell, _, _) = build_shell();
    shell.replace_terrain(vec![
        TerrainCell::new(0, 0, 5),
        TerrainCell::new(1, 1, 9),
    ]);

    let mut storage = MemoryStorage::default();
    shell
        .save("layout-v1", &mut storage)
        .expect("in-memory storage accepts writes");

    assert_eq!(storage.static_entities, ["layout-v1"]);
    assert_eq!(storage.terrain, ["5,0\n0,9\n"], "exact wire format");

    shell.shutdown();
}

#[test]
fn malformed_terrain_load_preserves_previous_terrain() {
    let (mut shell, _, _) = build_shell();
    shell.load_terrain("1,2\n3,4\n").expect("well-formed grid");
    let before = shell.terrain().to_vec();

    let error = shell
        .load_terrain("1,2\n3,oops\n")
        .expect_err("malformed grid must fail");

    assert_eq!(error.to_string(), "invalid height at row 1, column 1");
    assert_eq!(
        shell.terrain(),
        before.as_slice(),
        "a failed load must not leave partial terrain behind",
    );

    shell.shutdown();
}

#[test]
fn zoom_buttons_delegate_to_the_game() {
    let (mut shell, _, _) = build_shell();
    let baseline = shell.capture_snapshot().expect("capture");

    shell.zoom_in();
    let zoomed = shell.capture_snapshot().expect("capture");
    shell.zoom_out();
    let restored = shell.capture_snapshot().expect("capture");

    assert_ne!(baseline, zoomed, "zoom must change the rendered output");
    assert_eq!(baseline, restored);

    shell.shutdown();
}

#[test]
fn resize_gate_filters_jitter() {
    let (mut shell, _, _) = build_shell();

    assert!(!shell.observe_resize(SurfaceSize::new(51, 32)));
    assert!(shell.observe_resize(SurfaceSize::new(52, 32)));

    shell.shutdown();
}

#[test]
fn commands_and_layers_are_reachable_by_name() {
    let (mut shell, _, _) = build_shell();
    let executions = Arc::new(AtomicU64::new(0));
    shell.register_command(Box::new(RecordedCommand {
        name: "Center view",
        executions: Arc::clone(&executions),
    }));
    shell.register_layer(LayerToggle::new("Grid", true));

    shell.run_command("Center view").expect("registered command");
    shell
        .set_layer_enabled("Grid", false)
        .expect("registered layer");

    assert_eq!(executions.load(Ordering::SeqCst), 1);
    assert!(!shell.layers()[0].enabled());
    assert!(shell.run_command("Missing").is_err());
    assert!(shell.set_layer_enabled("Missing", true).is_err());

    shell.shutdown();
}

#[test]
fn shutdown_stops_the_loop_before_disposing_the_game() {
    let (mut shell, disposed, violation) = build_shell();
    thread::sleep(Duration::from_millis(60));

    shell.shutdown();
    shell.shutdown();

    assert!(disposed.load(Ordering::SeqCst), "the game must be disposed");
    thread::sleep(CYCLE_PERIOD * 4);
    assert!(
        !violation.load(Ordering::SeqCst),
        "no surface may be invalidated after the game is disposed",
    );
}

#[test]
fn dropping_the_shell_tears_down_cleanly() {
    let (shell, disposed, violation) = build_shell();
    thread::sleep(Duration::from_millis(40));

    drop(shell);

    assert!(disposed.load(Ordering::SeqCst));
    assert!(!violation.load(Ordering::SeqCst));
}

#[test]
fn metrics_are_observable_through_the_shell() {
    let (mut shell, _, _) = build_shell();
    thread::sleep(Duration::from_millis(100));

    let snapshot = shell.metrics().snapshot();
    assert!(snapshot.cycles > 0, "the loop must be cycling");
    assert_eq!(snapshot.faulted_invalidations, 0);

    shell.shutdown();
}
