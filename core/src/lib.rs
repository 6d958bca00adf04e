#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Trackyard shell.
//!
//! This crate defines the value types and capability seams that connect the
//! pure systems (terrain codec, tool selection) to the adapters (presentation
//! loop, orchestration shell). Adapters own the mutable state and drive the
//! systems through these narrow surfaces; systems never reach back into
//! adapter internals.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Describes whether the player is laying out track or operating trains.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Build mode where the layout can be edited.
    Building,
    /// Play mode where trains run over the finished layout.
    Playing,
}

impl Mode {
    /// Returns the opposite mode.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Building => Self::Playing,
            Self::Playing => Self::Building,
        }
    }

    /// Reports whether the layout is currently editable.
    #[must_use]
    pub const fn is_building(self) -> bool {
        matches!(self, Self::Building)
    }
}

/// Declares the modes under which a tool may be offered to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolApplicability {
    /// The tool is only meaningful while editing the layout.
    BuildOnly,
    /// The tool is only meaningful while operating trains.
    PlayOnly,
    /// The tool is offered in both modes.
    Always,
}

impl ToolApplicability {
    /// Reports whether a tool with this applicability is presentable in `mode`.
    #[must_use]
    pub const fn allows(self, mode: Mode) -> bool {
        match self {
            Self::Always => true,
            Self::BuildOnly => mode.is_building(),
            Self::PlayOnly => !mode.is_building(),
        }
    }
}

/// Immutable description of a tool offered by the shell.
///
/// Tool identity is the name; the catalog supplying these descriptors is
/// ordered and that order drives default-selection tie-breaking.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ToolSpec {
    name: String,
    applicability: ToolApplicability,
}

impl ToolSpec {
    /// Creates a new tool descriptor.
    #[must_use]
    pub fn new<T>(name: T, applicability: ToolApplicability) -> Self
    where
        T: Into<String>,
    {
        Self {
            name: name.into(),
            applicability,
        }
    }

    /// Display name identifying the tool.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Modes under which the tool should be offered.
    #[must_use]
    pub const fn applicability(&self) -> ToolApplicability {
        self.applicability
    }
}

/// Height sample at a single terrain grid coordinate.
///
/// Identity is the `(row, column)` pair; a grid holding two cells at the same
/// coordinate is tolerated by the codec but which height wins is a codec
/// policy, not a property of this type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TerrainCell {
    row: u32,
    column: u32,
    height: i32,
}

impl TerrainCell {
    /// Creates a new terrain cell at the provided coordinate.
    #[must_use]
    pub const fn new(row: u32, column: u32, height: i32) -> Self {
        Self {
            row,
            column,
            height,
        }
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Terrain elevation stored at the coordinate.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.height
    }
}

/// Dimensions of a drawable surface measured in whole pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SurfaceSize {
    width: u32,
    height: u32,
}

impl SurfaceSize {
    /// Creates a new size descriptor with explicit dimensions.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width of the surface in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height of the surface in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Total number of pixels covered by the surface.
    #[must_use]
    pub const fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Error returned when a redraw is requested on a disposed surface.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("surface '{surface}' is no longer available")]
pub struct SurfaceLost {
    surface: String,
}

impl SurfaceLost {
    /// Creates a new error naming the surface that went away.
    #[must_use]
    pub fn new<T>(surface: T) -> Self
    where
        T: Into<String>,
    {
        Self {
            surface: surface.into(),
        }
    }

    /// Name of the surface that could not be invalidated.
    #[must_use]
    pub fn surface(&self) -> &str {
        &self.surface
    }
}

/// Drawable surface that can be asked to repaint itself.
///
/// `invalidate` is a non-blocking request that the surface be redrawn at the
/// next opportunity; it must never render synchronously. Implementations
/// report [`SurfaceLost`] once the underlying surface has been disposed.
pub trait RenderSurface {
    /// Requests a redraw of the surface.
    fn invalidate(&self) -> Result<(), SurfaceLost>;
}

/// Named action exposed by the shell, typically bound to a UI button.
pub trait UiCommand {
    /// Display name identifying the command.
    fn name(&self) -> &str;

    /// Executes the command's action.
    fn execute(&mut self);
}

/// Named presentation layer whose visibility the player can toggle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayerToggle {
    name: String,
    enabled: bool,
}

impl LayerToggle {
    /// Creates a new layer toggle with the provided initial visibility.
    #[must_use]
    pub fn new<T>(name: T, enabled: bool) -> Self
    where
        T: Into<String>,
    {
        Self {
            name: name.into(),
            enabled,
        }
    }

    /// Display name identifying the layer.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Reports whether the layer is currently visible.
    #[must_use]
    pub const fn enabled(&self) -> bool {
        self.enabled
    }

    /// Shows or hides the layer.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}
