//! Grid model: the immutable endpoint layout of one level.
//!
//! A grid is a square matrix where each tile is either empty or an endpoint of
//! some color. Every color is expected to appear exactly twice; that pairing is
//! an authoring rule and is not checked here.

use std::collections::BTreeSet;
use std::fmt;
use std::num::NonZeroU8;

use crate::error::LevelError;

/// Color identifier of an endpoint pair. Raw level data uses `0` for empty
/// tiles, so a color is always non-zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColorId(NonZeroU8);

impl ColorId {
    pub fn new(raw: u8) -> Option<Self> {
        NonZeroU8::new(raw).map(ColorId)
    }

    pub fn get(self) -> u8 {
        self.0.get()
    }
}

impl fmt::Display for ColorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Board coordinate. Signed so that pointer positions left of / above the
/// board map to a representable (and out-of-bounds) cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    pub row: i32,
    pub col: i32,
}

impl Cell {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    pub fn offset(self, d_row: i32, d_col: i32) -> Self {
        Self::new(self.row + d_row, self.col + d_col)
    }

    /// Orthogonal neighbours are exactly one Manhattan step apart.
    pub fn is_adjacent(self, other: Cell) -> bool {
        (self.row - other.row).abs() + (self.col - other.col).abs() == 1
    }
}

impl From<(i32, i32)> for Cell {
    fn from((row, col): (i32, i32)) -> Self {
        Cell::new(row, col)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Tile {
    #[default]
    Empty,
    Endpoint(ColorId),
}

impl Tile {
    fn from_raw(raw: u8) -> Self {
        ColorId::new(raw).map_or(Tile::Empty, Tile::Endpoint)
    }

    pub fn color(self) -> Option<ColorId> {
        match self {
            Tile::Empty => None,
            Tile::Endpoint(c) => Some(c),
        }
    }
}

/// Level grid (immutable once built). Tiles are stored flat, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    size: usize,
    tiles: Vec<Tile>,
    required: BTreeSet<ColorId>,
}

impl Grid {
    /// Build a grid from authored rows (`0` = empty, `n` = endpoint of color n).
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self, LevelError> {
        let size = rows.len();
        if size == 0 {
            return Err(LevelError::Empty);
        }
        let mut tiles = Vec::with_capacity(size * size);
        for (row, cols) in rows.iter().enumerate() {
            let cols = cols.as_ref();
            if cols.len() != size {
                return Err(LevelError::NotSquare {
                    row,
                    expected: size,
                    found: cols.len(),
                });
            }
            tiles.extend(cols.iter().map(|&raw| Tile::from_raw(raw)));
        }
        let required = tiles.iter().filter_map(|t| t.color()).collect();
        Ok(Self {
            size,
            tiles,
            required,
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn in_bounds(&self, cell: Cell) -> bool {
        let n = self.size as i32;
        (0..n).contains(&cell.row) && (0..n).contains(&cell.col)
    }

    /// Tile at `cell`; cells outside the board read as empty.
    pub fn at(&self, cell: Cell) -> Tile {
        if !self.in_bounds(cell) {
            return Tile::Empty;
        }
        self.tiles[cell.row as usize * self.size + cell.col as usize]
    }

    /// Every color that appears on the board, in ascending order.
    pub fn required_colors(&self) -> &BTreeSet<ColorId> {
        &self.required
    }

    /// All endpoint tiles with their colors, row-major.
    pub fn endpoints(&self) -> impl Iterator<Item = (Cell, ColorId)> + '_ {
        self.tiles.iter().enumerate().filter_map(|(idx, tile)| {
            let cell = Cell::new((idx / self.size) as i32, (idx % self.size) as i32);
            tile.color().map(|c| (cell, c))
        })
    }
}
