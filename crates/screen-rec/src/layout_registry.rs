use screen_rec_core::{ChromeOffsets, GridBounds, LayoutSource, WindowId, WindowLayout};

use std::collections::HashMap;

use tracing::debug;

/// Latest window layouts and grid size reported by the editor.
#[derive(Debug, Default)]
pub struct LayoutRegistry {
    windows: HashMap<WindowId, WindowLayout>,
    chrome: ChromeOffsets,
    grid: Option<GridBounds>,
}

impl LayoutRegistry {
    /// Record the layout of `window`, replacing any earlier report.
    pub fn set_layout(&mut self, window: WindowId, layout: WindowLayout) {
        debug!(window, ?layout, "Window layout updated");
        self.windows.insert(window, layout);
    }

    /// Record the grid size and chrome.
    ///
    /// A grid change invalidates every window layout.
    pub fn set_grid(&mut self, grid: GridBounds, chrome: ChromeOffsets) {
        if self.grid != Some(grid) {
            self.windows.clear();
        }
        debug!(?grid, ?chrome, "Grid updated");
        self.grid = Some(grid);
        self.chrome = chrome;
    }

    /// Grid size, once reported.
    pub fn grid(&self) -> Option<GridBounds> {
        self.grid
    }
}

impl LayoutSource for LayoutRegistry {
    fn window_layout(&self, window: WindowId) -> Option<WindowLayout> {
        self.windows.get(&window).copied()
    }

    fn chrome(&self) -> ChromeOffsets {
        self.chrome
    }
}
