//! Level definitions.
//!
//! A level is a square matrix of color ids (`0` = empty) in which every color
//! appears exactly twice. Built-in levels live in their own files below and
//! carry a known solution so the pairing can be verified by tests.

use std::collections::BTreeMap;

use crate::error::LevelError;
use crate::grid::Grid;

mod level1;
mod level2;
mod level3;

/// Authored level data. Deserializable so level packs can be supplied as JSON.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LevelSpec {
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,
    pub size: usize,
    pub grid: Vec<Vec<u8>>,
    /// Known solution per color, anchor first. Optional.
    #[cfg_attr(feature = "serde", serde(default))]
    pub solution: Vec<(u8, Vec<(i32, i32)>)>,
}

impl LevelSpec {
    fn from_static<const N: usize>(
        name: &str,
        grid: &[[u8; N]; N],
        solution: &[(u8, &[(i32, i32)])],
    ) -> Self {
        Self {
            name: name.to_string(),
            size: N,
            grid: grid.iter().map(|row| row.to_vec()).collect(),
            solution: solution
                .iter()
                .map(|(color, cells)| (*color, cells.to_vec()))
                .collect(),
        }
    }

    /// Build a fresh grid. Always copies, so play never touches authored data.
    pub fn build_grid(&self) -> Result<Grid, LevelError> {
        if self.grid.len() != self.size {
            return Err(LevelError::SizeMismatch {
                declared: self.size,
                actual: self.grid.len(),
            });
        }
        Grid::from_rows(&self.grid)
    }

    /// Colors that do not appear exactly twice, with their counts.
    /// The loader never rejects these; this is for authoring checks.
    pub fn unpaired_colors(&self) -> Vec<(u8, usize)> {
        let mut counts: BTreeMap<u8, usize> = BTreeMap::new();
        for &raw in self.grid.iter().flatten().filter(|&&raw| raw != 0) {
            *counts.entry(raw).or_default() += 1;
        }
        counts.into_iter().filter(|&(_, n)| n != 2).collect()
    }

    /// Parse a JSON array of levels.
    #[cfg(feature = "serde_json")]
    pub fn list_from_json(json: &str) -> Result<Vec<LevelSpec>, LevelError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// The built-in level list, in play order.
pub fn builtin() -> &'static [LevelSpec] {
    use std::sync::OnceLock;
    static LEVELS: OnceLock<Vec<LevelSpec>> = OnceLock::new();
    LEVELS.get_or_init(|| vec![level1::level1(), level2::level2(), level3::level3()])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_levels_build() {
        assert_eq!(builtin().len(), 3);
        for level in builtin() {
            let grid = level.build_grid().unwrap();
            assert_eq!(grid.size(), level.size);
        }
    }

    #[test]
    fn unpaired_colors_are_reported() {
        let level = LevelSpec {
            name: "lopsided".into(),
            size: 2,
            grid: vec![vec![1, 2], vec![2, 2]],
            solution: Vec::new(),
        };
        assert_eq!(level.unpaired_colors(), vec![(1, 1), (2, 3)]);
        // Still loads: pairing is an authoring rule.
        assert!(level.build_grid().is_ok());
    }

    #[test]
    fn declared_size_must_match_rows() {
        let level = LevelSpec {
            size: 3,
            grid: vec![vec![1, 1], vec![0, 0]],
            ..LevelSpec::default()
        };
        assert_eq!(
            level.build_grid(),
            Err(LevelError::SizeMismatch {
                declared: 3,
                actual: 2
            })
        );
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn parses_json_level_pack() {
        let levels =
            LevelSpec::list_from_json(r#"[{"size": 2, "grid": [[1, 0], [0, 1]]}]"#).unwrap();
        assert_eq!(levels.len(), 1);
        assert!(levels[0].solution.is_empty());
        assert!(LevelSpec::list_from_json("{").is_err());
    }
}
