//! Per-window tiling state and its store.
//!
//! A [`TilingState`] records which span of which preset a window occupies:
//! the preset key, the linear index of the span's anchor (top-left) cell,
//! and the row/column extents. The [`StateStore`] keys these records by
//! [`WindowId`] — a plain value, so an entry never keeps a window alive.
//! Entries are pruned when the compositor reports the window closed.

use crate::catalog;
use crate::command::WindowId;
use std::collections::HashMap;

/// Which span of which grid preset a window occupies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TilingState {
    /// Key into the preset catalog.
    pub preset_key: String,
    /// Linear index of the span's anchor cell.
    pub index: usize,
    /// Rows covered by the span (≥ 1).
    pub row_span: usize,
    /// Columns covered by the span (≥ 1).
    pub col_span: usize,
}

impl TilingState {
    /// State for a window seen for the first time: a single cell in the
    /// middle of the given preset (falling back to the default preset for
    /// unknown keys).
    ///
    /// `total_cells / 2` is the center cell of the default 3×3 grid and
    /// stays in range for every preset, unlike a fixed start index.
    pub fn initial(preset_key: &str) -> Self {
        let (key, preset) = catalog::get_or_default(preset_key);
        Self {
            preset_key: key.to_string(),
            index: preset.total_cells() / 2,
            row_span: 1,
            col_span: 1,
        }
    }
}

/// All tracked windows' tiling states.
#[derive(Debug, Default)]
pub struct StateStore {
    states: HashMap<WindowId, TilingState>,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a window's state, creating the initial state (seeded with
    /// `default_preset`) if the window has not been tiled before.
    pub fn get_or_insert(&mut self, window: WindowId, default_preset: &str) -> &TilingState {
        self.states
            .entry(window)
            .or_insert_with(|| TilingState::initial(default_preset))
    }

    /// Current state for a window, if any.
    pub fn get(&self, window: WindowId) -> Option<&TilingState> {
        self.states.get(&window)
    }

    /// Replace a window's state.
    pub fn set(&mut self, window: WindowId, state: TilingState) {
        self.states.insert(window, state);
    }

    /// Drop a window's state (window closed). Returns the removed state.
    pub fn remove(&mut self, window: WindowId) -> Option<TilingState> {
        self.states.remove(&window)
    }

    /// Number of tracked windows.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Whether no window is tracked.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
