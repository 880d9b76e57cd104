//! Path extension engine.
//!
//! Owns one level's grid, the per-color paths and the transient drag session.
//! Input arrives as cell coordinates (`begin_drag`, `extend_to`, `end_drag`);
//! every call returns a value describing what happened so the caller can react
//! (particles, audio, level advance) without polling.
//!
//! Pointer samples can skip several cells when the player moves fast. The
//! engine therefore walks from the current head toward the target one cell at a
//! time along the dominant axis, treating each step as if it were its own move:
//! stepping back onto the cell behind the head erases the head, stepping onto
//! the own trail or another color's path stops the walk, and reaching the
//! matching endpoint completes the connection and ends the drag.

use crate::grid::{Cell, ColorId, Grid, Tile};
use crate::paths::{Path, PathStore};
use crate::win::{self, WinReport};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DragSession {
    pub color: ColorId,
}

/// Result of `begin_drag`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragStart {
    /// Nothing to grab at that cell.
    Ignored,
    /// A session is already running; overlapping sessions are refused.
    Busy,
    /// Pressed an endpoint: the color's path restarts from it.
    Started(ColorId),
    /// Pressed the loose head of an existing path: drawing continues from it.
    Resumed(ColorId),
}

/// A color reached its matching endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Connection {
    pub color: ColorId,
    pub cell: Cell,
    /// Win evaluation right after the connection.
    pub solved: bool,
}

/// Result of `extend_to`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Move {
    /// No session, target off the board, or target already the head.
    Ignored,
    /// Walk stopped on a collision or a foreign endpoint with no net change.
    Rejected,
    /// At least one cell was appended.
    Extended,
    /// Cells were only removed by retracing the trail.
    Backtracked,
    Completed(Connection),
}

/// Read-only view for renderers.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Snapshot {
    pub size: usize,
    pub endpoints: Vec<(Cell, ColorId)>,
    pub paths: Vec<(ColorId, Vec<Cell>)>,
    pub active: Option<ColorId>,
}

#[derive(Clone, Debug)]
pub struct Engine {
    grid: Grid,
    paths: PathStore,
    session: Option<DragSession>,
}

impl Engine {
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            paths: PathStore::new(),
            session: None,
        }
    }

    /// Swap in a new grid and drop every path and the session.
    pub fn reset(&mut self, grid: Grid) {
        self.grid = grid;
        self.paths.clear();
        self.session = None;
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn paths(&self) -> &PathStore {
        &self.paths
    }

    pub fn path(&self, color: ColorId) -> Option<&Path> {
        self.paths.get(color)
    }

    pub fn session(&self) -> Option<DragSession> {
        self.session
    }

    pub fn begin_drag(&mut self, cell: Cell) -> DragStart {
        if self.session.is_some() {
            return DragStart::Busy;
        }
        if !self.grid.in_bounds(cell) {
            return DragStart::Ignored;
        }
        if let Tile::Endpoint(color) = self.grid.at(cell) {
            // Grabbing either endpoint restarts the color, even a finished one.
            self.paths.restart(color, cell);
            self.session = Some(DragSession { color });
            log::debug!("drag started: color {color} at {cell:?}");
            return DragStart::Started(color);
        }
        match self.paths.head_owner(cell) {
            Some(color) => {
                self.session = Some(DragSession { color });
                log::debug!("drag resumed: color {color} at {cell:?}");
                DragStart::Resumed(color)
            }
            None => DragStart::Ignored,
        }
    }

    pub fn extend_to(&mut self, target: Cell) -> Move {
        let Some(DragSession { color }) = self.session else {
            return Move::Ignored;
        };
        if !self.grid.in_bounds(target) {
            return Move::Ignored;
        }
        let Some(head) = self.paths.get(color).map(Path::head) else {
            self.session = None;
            return Move::Ignored;
        };
        if head == target {
            return Move::Ignored;
        }

        // One axis per gesture sample; rows win ties.
        let d_row = target.row - head.row;
        let d_col = target.col - head.col;
        let (step_row, step_col) = if d_row.abs() >= d_col.abs() {
            (d_row.signum(), 0)
        } else {
            (0, d_col.signum())
        };

        let mut appended = 0usize;
        let mut retreated = 0usize;
        let mut cur = head;
        loop {
            let next = cur.offset(step_row, step_col);
            if !self.grid.in_bounds(next) {
                break;
            }
            let overshoot = (step_row > 0 && next.row > target.row)
                || (step_row < 0 && next.row < target.row)
                || (step_col > 0 && next.col > target.col)
                || (step_col < 0 && next.col < target.col);
            if overshoot {
                break;
            }
            match self.step(color, next) {
                Step::Retreated => retreated += 1,
                Step::Appended => appended += 1,
                Step::Blocked => break,
                Step::Connected => {
                    self.session = None;
                    let solved = self.is_solved();
                    log::debug!("color {color} connected at {next:?}");
                    if solved {
                        log::info!("puzzle solved");
                    }
                    return Move::Completed(Connection {
                        color,
                        cell: next,
                        solved,
                    });
                }
            }
            cur = next;
        }

        if appended > 0 {
            Move::Extended
        } else if retreated > 0 {
            Move::Backtracked
        } else {
            Move::Rejected
        }
    }

    /// Apply a single orthogonal step from the current head onto `next`.
    fn step(&mut self, color: ColorId, next: Cell) -> Step {
        let foreign = self.paths.occupant(next, Some(color)).is_some();
        let tile = self.grid.at(next);
        let Some(path) = self.paths.get_mut(color) else {
            return Step::Blocked;
        };
        if path.behind_head() == Some(next) {
            path.retreat();
            return Step::Retreated;
        }
        if path.contains(next) || foreign {
            return Step::Blocked;
        }
        match tile {
            Tile::Endpoint(other) if other != color => Step::Blocked,
            Tile::Endpoint(_) => {
                path.push(next);
                Step::Connected
            }
            Tile::Empty => {
                path.push(next);
                Step::Appended
            }
        }
    }

    /// Release the pointer. Paths stay as drawn.
    pub fn end_drag(&mut self) {
        self.session = None;
    }

    pub fn report(&self) -> WinReport {
        win::evaluate(&self.grid, &self.paths)
    }

    pub fn is_solved(&self) -> bool {
        self.report().is_solved()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            size: self.grid.size(),
            endpoints: self.grid.endpoints().collect(),
            paths: self
                .paths
                .iter()
                .map(|(color, path)| (color, path.cells().to_vec()))
                .collect(),
            active: self.session.map(|s| s.color),
        }
    }
}

enum Step {
    Appended,
    Retreated,
    Blocked,
    Connected,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn color(raw: u8) -> ColorId {
        ColorId::new(raw).unwrap()
    }

    fn cells(raw: &[(i32, i32)]) -> Vec<Cell> {
        raw.iter().map(|&c| c.into()).collect()
    }

    fn engine(rows: &[[u8; 5]]) -> Engine {
        Engine::new(Grid::from_rows(rows).unwrap())
    }

    const OPEN: [[u8; 5]; 5] = [
        [1, 0, 0, 0, 0],
        [0, 0, 0, 0, 0],
        [0, 0, 0, 0, 0],
        [0, 0, 0, 0, 0],
        [0, 0, 0, 0, 1],
    ];

    #[test]
    fn begin_on_empty_cell_is_ignored() {
        let mut e = engine(&OPEN);
        assert_eq!(e.begin_drag(Cell::new(2, 2)), DragStart::Ignored);
        assert_eq!(e.begin_drag(Cell::new(-1, 0)), DragStart::Ignored);
        assert!(e.session().is_none());
        assert!(e.paths().is_empty());
    }

    #[test]
    fn fast_motion_fills_intermediate_cells() {
        let mut e = engine(&OPEN);
        assert_eq!(e.begin_drag(Cell::new(0, 0)), DragStart::Started(color(1)));
        assert_eq!(e.extend_to(Cell::new(0, 3)), Move::Extended);
        assert_eq!(
            e.path(color(1)).unwrap().cells(),
            cells(&[(0, 0), (0, 1), (0, 2), (0, 3)]).as_slice()
        );
    }

    #[test]
    fn retracing_erases_the_head() {
        let mut e = engine(&OPEN);
        e.begin_drag(Cell::new(0, 0));
        e.extend_to(Cell::new(0, 2));
        assert_eq!(e.extend_to(Cell::new(0, 1)), Move::Backtracked);
        assert_eq!(
            e.path(color(1)).unwrap().cells(),
            cells(&[(0, 0), (0, 1)]).as_slice()
        );
        // Retreating all the way leaves the anchor in place.
        assert_eq!(e.extend_to(Cell::new(0, 0)), Move::Backtracked);
        assert_eq!(e.path(color(1)).unwrap().len(), 1);
    }

    #[test]
    fn diagonal_target_uses_dominant_axis_rows_win_ties() {
        let mut e = engine(&OPEN);
        e.begin_drag(Cell::new(0, 0));
        e.extend_to(Cell::new(1, 1));
        assert_eq!(
            e.path(color(1)).unwrap().cells(),
            cells(&[(0, 0), (1, 0)]).as_slice()
        );
        e.extend_to(Cell::new(2, 4));
        assert_eq!(e.path(color(1)).unwrap().head(), Cell::new(1, 4));
    }

    #[test]
    fn own_trail_blocks_the_walk() {
        let mut e = engine(&OPEN);
        e.begin_drag(Cell::new(0, 0));
        e.extend_to(Cell::new(0, 2));
        e.extend_to(Cell::new(1, 2));
        e.extend_to(Cell::new(1, 1));
        assert_eq!(e.extend_to(Cell::new(0, 1)), Move::Rejected);
        assert_eq!(e.path(color(1)).unwrap().head(), Cell::new(1, 1));
        assert_eq!(e.path(color(1)).unwrap().len(), 5);
    }

    #[test]
    fn foreign_endpoint_blocks_and_matching_endpoint_completes() {
        let mut e = engine(&[
            [1, 0, 2, 0, 1],
            [0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0],
            [2, 0, 0, 0, 0],
        ]);
        e.begin_drag(Cell::new(0, 0));
        assert_eq!(e.extend_to(Cell::new(0, 4)), Move::Extended);
        assert_eq!(e.path(color(1)).unwrap().head(), Cell::new(0, 1));

        e.extend_to(Cell::new(1, 1));
        e.extend_to(Cell::new(1, 4));
        let done = e.extend_to(Cell::new(0, 4));
        assert_eq!(
            done,
            Move::Completed(Connection {
                color: color(1),
                cell: Cell::new(0, 4),
                solved: false,
            })
        );
        assert!(e.session().is_none());
        assert_eq!(e.extend_to(Cell::new(0, 3)), Move::Ignored);
    }

    #[test]
    fn completion_discards_remaining_walk() {
        let mut e = engine(&[
            [1, 0, 1, 0, 0],
            [0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0],
        ]);
        e.begin_drag(Cell::new(0, 0));
        let done = e.extend_to(Cell::new(0, 4));
        assert!(matches!(done, Move::Completed(Connection { solved: true, .. })));
        assert_eq!(e.path(color(1)).unwrap().head(), Cell::new(0, 2));
        assert!(e.is_solved());
    }

    #[test]
    fn other_path_blocks_walk() {
        let mut e = engine(&[
            [0, 1, 0, 0, 0],
            [2, 0, 0, 0, 2],
            [0, 1, 0, 0, 0],
            [0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0],
        ]);
        e.begin_drag(Cell::new(0, 1));
        assert!(matches!(e.extend_to(Cell::new(2, 1)), Move::Completed(_)));

        e.begin_drag(Cell::new(1, 0));
        assert_eq!(e.extend_to(Cell::new(1, 4)), Move::Rejected);
        assert_eq!(e.path(color(2)).unwrap().cells(), cells(&[(1, 0)]).as_slice());
    }

    #[test]
    fn resume_from_loose_head_and_restart_from_endpoint() {
        let mut e = engine(&OPEN);
        e.begin_drag(Cell::new(0, 0));
        e.extend_to(Cell::new(0, 2));
        e.end_drag();
        assert_eq!(e.path(color(1)).unwrap().len(), 3);

        assert_eq!(e.begin_drag(Cell::new(0, 1)), DragStart::Ignored);
        assert_eq!(e.begin_drag(Cell::new(0, 2)), DragStart::Resumed(color(1)));
        assert_eq!(e.path(color(1)).unwrap().len(), 3);
        e.end_drag();

        assert_eq!(e.begin_drag(Cell::new(4, 4)), DragStart::Started(color(1)));
        assert_eq!(e.path(color(1)).unwrap().cells(), cells(&[(4, 4)]).as_slice());
    }

    #[test]
    fn second_press_while_dragging_is_refused() {
        let mut e = engine(&OPEN);
        e.begin_drag(Cell::new(0, 0));
        e.extend_to(Cell::new(0, 1));
        assert_eq!(e.begin_drag(Cell::new(4, 4)), DragStart::Busy);
        assert_eq!(e.path(color(1)).unwrap().len(), 2);
    }

    #[test]
    fn out_of_bounds_and_idle_moves_are_ignored() {
        let mut e = engine(&OPEN);
        assert_eq!(e.extend_to(Cell::new(0, 1)), Move::Ignored);
        e.begin_drag(Cell::new(0, 0));
        assert_eq!(e.extend_to(Cell::new(0, 5)), Move::Ignored);
        assert_eq!(e.extend_to(Cell::new(-1, 0)), Move::Ignored);
        assert_eq!(e.extend_to(Cell::new(0, 0)), Move::Ignored);
        assert_eq!(e.path(color(1)).unwrap().len(), 1);
        e.end_drag();
        e.end_drag();
    }

    #[test]
    fn snapshot_reflects_state() {
        let mut e = engine(&OPEN);
        e.begin_drag(Cell::new(0, 0));
        e.extend_to(Cell::new(1, 0));
        let snap = e.snapshot();
        assert_eq!(snap.size, 5);
        assert_eq!(snap.endpoints.len(), 2);
        assert_eq!(snap.active, Some(color(1)));
        assert_eq!(snap.paths, vec![(color(1), cells(&[(0, 0), (1, 0)]))]);
    }
}
