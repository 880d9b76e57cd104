// Level 3: four colors; color 3 snakes through the middle rows.
use super::LevelSpec;

const GRID: [[u8; 5]; 5] = [
    [1, 0, 1, 0, 2],
    [0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0],
    [0, 3, 0, 0, 0],
    [3, 4, 0, 4, 2],
];

const SOLUTION: [(u8, &[(i32, i32)]); 4] = [
    (1, &[(0, 0), (1, 0), (1, 1), (1, 2), (0, 2)]),
    (2, &[(0, 4), (0, 3), (1, 3), (1, 4), (2, 4), (3, 4), (4, 4)]),
    (3, &[(4, 0), (3, 0), (2, 0), (2, 1), (2, 2), (2, 3), (3, 3), (3, 2), (3, 1)]),
    (4, &[(4, 1), (4, 2), (4, 3)]),
];

pub fn level3() -> LevelSpec {
    LevelSpec::from_static("Snake Pit", &GRID, &SOLUTION)
}
