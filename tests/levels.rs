// Level data invariants. Native-friendly; no wasm/browser APIs.

use std::collections::HashSet;

use gen_gems::levels::builtin;
use gen_gems::{Cell, ColorId, DragStart, Game, Move};

#[test]
fn every_builtin_color_appears_exactly_twice() {
    for level in builtin() {
        assert!(
            level.unpaired_colors().is_empty(),
            "level '{}' has unpaired colors {:?}",
            level.name,
            level.unpaired_colors()
        );
        assert_eq!(level.grid.len(), level.size, "level '{}' row count", level.name);
    }
}

#[test]
fn builtin_level_names_are_unique() {
    let mut seen = HashSet::new();
    for level in builtin() {
        assert!(!level.name.is_empty());
        assert!(seen.insert(level.name.as_str()), "duplicate level name '{}'", level.name);
    }
}

#[test]
fn every_builtin_solution_solves_its_level() {
    let mut game = Game::with_builtin_levels().unwrap();
    for index in 0..game.level_count() {
        game.load(index).unwrap();
        let level = game.level().clone();
        assert_eq!(
            level.solution.len(),
            game.engine().grid().required_colors().len(),
            "level '{}' solution covers every color",
            level.name
        );
        let mut last = Move::Ignored;
        for (raw, cells) in &level.solution {
            let color = ColorId::new(*raw).unwrap();
            let anchor: Cell = cells[0].into();
            assert_eq!(game.begin_drag(anchor), DragStart::Started(color));
            for &c in &cells[1..] {
                last = game.extend_to(c.into());
            }
            assert!(
                matches!(last, Move::Completed(conn) if conn.color == color),
                "level '{}' color {} did not connect: {:?}",
                level.name,
                raw,
                last
            );
            game.end_drag();
        }
        assert!(matches!(last, Move::Completed(conn) if conn.solved));
        assert!(game.engine().is_solved(), "level '{}' not solved", level.name);
    }
}

#[test]
fn solving_then_advancing_wraps_to_first_level() {
    let mut game = Game::with_builtin_levels().unwrap();
    let count = game.level_count();
    game.load(count - 1).unwrap();
    game.advance().unwrap();
    assert_eq!(game.current_index(), 0);
    assert!(game.engine().paths().is_empty());
}
