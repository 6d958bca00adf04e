#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Mode and tool selection policy for the Trackyard shell.
//!
//! The selector owns the build/play mode flag and decides which subset of the
//! tool catalog is presentable under it, plus which tool is active. All entry
//! points are synchronous and bounded; the shell is the single writer, so the
//! selector carries no internal locking.

use thiserror::Error;
use trackyard_core::{Mode, ToolSpec};

/// Errors raised by explicit tool selection.
#[derive(Debug, PartialEq, Eq, Error)]
pub enum SelectionError {
    /// The requested tool does not exist in the catalog.
    #[error("tool '{0}' is not in the catalog")]
    UnknownTool(String),
    /// The requested tool is hidden under the current mode.
    #[error("tool '{0}' is not presentable in the current mode")]
    NotPresentable(String),
}

/// Stateful policy choosing the active tool from an ordered catalog.
///
/// Presentability is derived from the catalog order and the current mode; the
/// default selection rule always picks the first presentable tool. Toggling
/// the mode re-derives the selection: a tool the new mode hides is cleared
/// and replaced by the default rather than kept as a stale selection.
#[derive(Clone, Debug)]
pub struct ToolSelector {
    mode: Mode,
    catalog: Vec<ToolSpec>,
    active: Option<usize>,
}

impl ToolSelector {
    /// Creates a selector over the provided catalog.
    ///
    /// No tool is active initially; call [`ensure_default_selection`] or
    /// [`select_tool`] to establish one.
    ///
    /// [`ensure_default_selection`]: Self::ensure_default_selection
    /// [`select_tool`]: Self::select_tool
    #[must_use]
    pub fn new(mode: Mode, catalog: Vec<ToolSpec>) -> Self {
        Self {
            mode,
            catalog,
            active: None,
        }
    }

    /// Mode the selector currently operates under.
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// Full ordered catalog the selector was built from.
    #[must_use]
    pub fn catalog(&self) -> &[ToolSpec] {
        &self.catalog
    }

    /// Ordered subset of the catalog presentable under the current mode.
    pub fn presentable(&self) -> impl Iterator<Item = &ToolSpec> {
        let mode = self.mode;
        self.catalog
            .iter()
            .filter(move |tool| tool.applicability().allows(mode))
    }

    /// Currently active tool, if one has been established.
    #[must_use]
    pub fn active_tool(&self) -> Option<&ToolSpec> {
        self.active.map(|index| &self.catalog[index])
    }

    /// Establishes the default selection when no tool is active.
    ///
    /// The default is the first presentable tool in catalog order; the rule
    /// is stable, never random. A selector with an active tool or an empty
    /// presentable subset is left unchanged.
    pub fn ensure_default_selection(&mut self) {
        if self.active.is_some() {
            return;
        }
        self.active = self.first_presentable_index();
    }

    /// Explicitly selects a tool by name, overriding any default.
    pub fn select_tool(&mut self, name: &str) -> Result<(), SelectionError> {
        let Some(index) = self.catalog.iter().position(|tool| tool.name() == name) else {
            return Err(SelectionError::UnknownTool(name.to_owned()));
        };

        if !self.catalog[index].applicability().allows(self.mode) {
            return Err(SelectionError::NotPresentable(name.to_owned()));
        }

        self.active = Some(index);
        Ok(())
    }

    /// Flips the mode and re-derives the active tool.
    ///
    /// An active tool still presentable under the new mode is kept; one the
    /// new mode hides is cleared and replaced by the default selection. With
    /// no active tool the default rule applies directly. This operation has
    /// no failure mode.
    pub fn toggle_mode(&mut self) {
        self.mode = self.mode.toggled();

        if let Some(index) = self.active {
            if !self.catalog[index].applicability().allows(self.mode) {
                self.active = None;
            }
        }

        self.ensure_default_selection();
    }

    fn first_presentable_index(&self) -> Option<usize> {
        self.catalog
            .iter()
            .position(|tool| tool.applicability().allows(self.mode))
    }
}

#[cfg(test)]
mod tests {
    use super::ToolSelector;
    use trackyard_core::{Mode, ToolApplicability, ToolSpec};

    #[test]
    fn empty_catalog_yields_no_selection() {
        let mut selector = ToolSelector::new(Mode::Building, Vec::new());
        selector.ensure_default_selection();
        selector.toggle_mode();

        assert!(selector.active_tool().is_none());
        assert_eq!(selector.presentable().count(), 0);
    }

    #[test]
    fn default_selection_is_idempotent() {
        let catalog = vec![
            ToolSpec::new("Track", ToolApplicability::BuildOnly),
            ToolSpec::new("Eraser", ToolApplicability::BuildOnly),
        ];
        let mut selector = ToolSelector::new(Mode::Building, catalog);

        selector.ensure_default_selection();
        selector.ensure_default_selection();

        assert_eq!(selector.active_tool().map(ToolSpec::name), Some("Track"));
    }
}
