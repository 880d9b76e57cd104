//! Win evaluation. Read-only over the grid and the path store.

use crate::grid::{ColorId, Grid, Tile};
use crate::paths::PathStore;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WinReport {
    /// Required colors without an endpoint-to-endpoint path, ascending.
    pub incomplete: Vec<ColorId>,
    /// Cells occupied by any path.
    pub covered: usize,
    /// Cells on the board.
    pub total: usize,
}

impl WinReport {
    pub fn is_solved(&self) -> bool {
        self.incomplete.is_empty()
    }

    /// Every cell is filled. Informational only; it does not affect `is_solved`.
    pub fn is_perfect(&self) -> bool {
        self.is_solved() && self.covered == self.total
    }
}

/// A color is connected when its path has at least two cells and both ends
/// sit on endpoints of that color.
pub fn is_connected(grid: &Grid, paths: &PathStore, color: ColorId) -> bool {
    let Some(path) = paths.get(color) else {
        return false;
    };
    path.len() >= 2
        && grid.at(path.anchor()) == Tile::Endpoint(color)
        && grid.at(path.head()) == Tile::Endpoint(color)
}

pub fn evaluate(grid: &Grid, paths: &PathStore) -> WinReport {
    let incomplete = grid
        .required_colors()
        .iter()
        .copied()
        .filter(|&color| !is_connected(grid, paths, color))
        .collect();
    WinReport {
        incomplete,
        covered: paths.covered_cells(),
        total: grid.size() * grid.size(),
    }
}
