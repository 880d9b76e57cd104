// Level 2: five colors, one long detour for color 3.
use super::LevelSpec;

const GRID: [[u8; 5]; 5] = [
    [1, 0, 0, 0, 2],
    [3, 0, 4, 1, 0],
    [0, 4, 2, 0, 0],
    [0, 0, 0, 0, 0],
    [5, 0, 0, 5, 3],
];

const SOLUTION: [(u8, &[(i32, i32)]); 5] = [
    (1, &[(0, 0), (0, 1), (0, 2), (0, 3), (1, 3)]),
    (2, &[(0, 4), (1, 4), (2, 4), (2, 3), (2, 2)]),
    (3, &[(1, 0), (2, 0), (3, 0), (3, 1), (3, 2), (3, 3), (3, 4), (4, 4)]),
    (4, &[(1, 2), (1, 1), (2, 1)]),
    (5, &[(4, 0), (4, 1), (4, 2), (4, 3)]),
];

pub fn level2() -> LevelSpec {
    LevelSpec::from_static("Crossed Wires", &GRID, &SOLUTION)
}
