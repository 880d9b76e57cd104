// Level 1: four colors on a 5x5 board.
use super::LevelSpec;

const GRID: [[u8; 5]; 5] = [
    [1, 0, 0, 0, 2],
    [0, 0, 0, 0, 0],
    [3, 0, 1, 4, 0],
    [3, 0, 0, 0, 2],
    [4, 0, 0, 0, 0],
];

const SOLUTION: [(u8, &[(i32, i32)]); 4] = [
    (1, &[(0, 0), (0, 1), (0, 2), (1, 2), (2, 2)]),
    (2, &[(0, 4), (0, 3), (1, 3), (1, 4), (2, 4), (3, 4)]),
    (3, &[(2, 0), (1, 0), (1, 1), (2, 1), (3, 1), (3, 0)]),
    (4, &[(2, 3), (3, 3), (3, 2), (4, 2), (4, 1), (4, 0)]),
];

pub fn level1() -> LevelSpec {
    LevelSpec::from_static("First Spark", &GRID, &SOLUTION)
}
