//! Path store: at most one drawn path per color.

use std::collections::BTreeMap;

use crate::grid::{Cell, ColorId};

/// Ordered, non-empty run of distinct, orthogonally adjacent cells.
/// The first cell is the anchor; the last is the head being extended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Path {
    cells: Vec<Cell>,
}

impl Path {
    pub fn new(anchor: Cell) -> Self {
        Self {
            cells: vec![anchor],
        }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn anchor(&self) -> Cell {
        self.cells[0]
    }

    pub fn head(&self) -> Cell {
        self.cells[self.cells.len() - 1]
    }

    /// Cell immediately behind the head, if the path has one.
    pub fn behind_head(&self) -> Option<Cell> {
        self.cells.len().checked_sub(2).map(|i| self.cells[i])
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }

    pub(crate) fn push(&mut self, cell: Cell) {
        self.cells.push(cell);
    }

    /// Drop the head. The anchor is never removed.
    pub(crate) fn retreat(&mut self) -> Option<Cell> {
        if self.cells.len() > 1 {
            self.cells.pop()
        } else {
            None
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PathStore {
    paths: BTreeMap<ColorId, Path>,
}

impl PathStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, color: ColorId) -> Option<&Path> {
        self.paths.get(&color)
    }

    pub(crate) fn get_mut(&mut self, color: ColorId) -> Option<&mut Path> {
        self.paths.get_mut(&color)
    }

    /// Start `color` over from `anchor`, discarding whatever it had.
    pub(crate) fn restart(&mut self, color: ColorId, anchor: Cell) {
        self.paths.insert(color, Path::new(anchor));
    }

    pub(crate) fn clear(&mut self) {
        self.paths.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ColorId, &Path)> + '_ {
        self.paths.iter().map(|(c, p)| (*c, p))
    }

    /// Color whose path occupies `cell`, ignoring `except`.
    pub fn occupant(&self, cell: Cell, except: Option<ColorId>) -> Option<ColorId> {
        self.iter()
            .find(|(color, path)| Some(*color) != except && path.contains(cell))
            .map(|(color, _)| color)
    }

    /// Color whose path currently ends at `cell`.
    pub fn head_owner(&self, cell: Cell) -> Option<ColorId> {
        self.iter()
            .find(|(_, path)| path.head() == cell)
            .map(|(color, _)| color)
    }

    /// Number of distinct cells covered by any path.
    pub fn covered_cells(&self) -> usize {
        self.paths.values().map(Path::len).sum()
    }
}
