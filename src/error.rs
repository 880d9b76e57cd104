use thiserror::Error;

/// Problems building or selecting a level. Gameplay itself never errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LevelError {
    #[error("level grid is empty")]
    Empty,
    #[error("level grid is not square: row {row} has {found} cells, expected {expected}")]
    NotSquare {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("level declares size {declared} but its grid has {actual} rows")]
    SizeMismatch { declared: usize, actual: usize },
    #[error("no level {index} (have {count})")]
    NoSuchLevel { index: usize, count: usize },
    #[error("invalid level data: {0}")]
    Json(String),
}

#[cfg(feature = "serde_json")]
impl From<serde_json::Error> for LevelError {
    fn from(err: serde_json::Error) -> Self {
        LevelError::Json(err.to_string())
    }
}
