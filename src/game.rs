//! Level loader: the ordered level list, the current index and the engine
//! playing it.

use crate::engine::{DragStart, Engine, Move};
use crate::error::LevelError;
use crate::grid::Cell;
use crate::levels::{self, LevelSpec};

#[derive(Clone, Debug)]
pub struct Game {
    levels: Vec<LevelSpec>,
    current: usize,
    engine: Engine,
}

impl Game {
    /// Start a game on the first level of `levels`.
    pub fn new(levels: Vec<LevelSpec>) -> Result<Self, LevelError> {
        let first = levels.first().ok_or(LevelError::NoSuchLevel { index: 0, count: 0 })?;
        let engine = Engine::new(first.build_grid()?);
        log::info!("loaded level 1/{}: {}", levels.len(), first.name);
        Ok(Self {
            levels,
            current: 0,
            engine,
        })
    }

    pub fn with_builtin_levels() -> Result<Self, LevelError> {
        Self::new(levels::builtin().to_vec())
    }

    /// Load level `index` with a fresh grid and no paths.
    pub fn load(&mut self, index: usize) -> Result<(), LevelError> {
        let count = self.levels.len();
        let level = self
            .levels
            .get(index)
            .ok_or(LevelError::NoSuchLevel { index, count })?;
        self.engine.reset(level.build_grid()?);
        self.current = index;
        log::info!("loaded level {}/{}: {}", index + 1, count, level.name);
        Ok(())
    }

    /// Restart the current level.
    pub fn reload(&mut self) -> Result<(), LevelError> {
        self.load(self.current)
    }

    /// Move on to the next level, wrapping to the first after the last.
    pub fn advance(&mut self) -> Result<(), LevelError> {
        self.load((self.current + 1) % self.levels.len())
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn level(&self) -> &LevelSpec {
        &self.levels[self.current]
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn begin_drag(&mut self, cell: Cell) -> DragStart {
        self.engine.begin_drag(cell)
    }

    pub fn extend_to(&mut self, cell: Cell) -> Move {
        self.engine.extend_to(cell)
    }

    pub fn end_drag(&mut self) {
        self.engine.end_drag();
    }
}
