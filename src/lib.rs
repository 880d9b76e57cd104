//! Gen Gems core crate.
//!
//! A connection puzzle: drag lines across a square grid to join each pair of
//! same-colored dots without crossing, overlapping or leaving the board.
//!
//! The puzzle rules live in plain Rust (`grid`, `paths`, `engine`, `win`,
//! `levels`, `game`) and run natively under `cargo test`. The `board` module is
//! the browser shell that draws the state on a canvas and turns pointer input
//! into engine calls; `start_game()` is its entrypoint from JS.

use wasm_bindgen::prelude::*;

mod board;
pub mod config;
pub mod engine;
pub mod error;
pub mod game;
pub mod grid;
pub mod levels;
pub mod paths;
pub mod win;

pub use config::GameConfig;
pub use engine::{Connection, DragSession, DragStart, Engine, Move, Snapshot};
pub use error::LevelError;
pub use game::Game;
pub use grid::{Cell, ColorId, Grid, Tile};
pub use levels::LevelSpec;
pub use paths::{Path, PathStore};
pub use win::WinReport;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    // A second init (e.g. hot reload) keeps the first logger.
    console_log::init_with_level(log::Level::Info).ok();
}

// -----------------------------------------------------------------------------
// Unified entrypoint
// -----------------------------------------------------------------------------

/// Start the built-in level sequence on `#game-canvas`.
#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    let game = Game::with_builtin_levels().map_err(|e| JsValue::from_str(&e.to_string()))?;
    board::start_board(game, GameConfig::default())
}

/// Like `start_game`, with presentation settings given as JSON.
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn start_game_with_config(config_json: &str) -> Result<(), JsValue> {
    let config =
        GameConfig::from_json(config_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let game = Game::with_builtin_levels().map_err(|e| JsValue::from_str(&e.to_string()))?;
    board::start_board(game, config)
}

pub use board::reset_level;
#[cfg(feature = "serde_json")]
pub use board::{load_levels_json, set_config_json, snapshot_json};
