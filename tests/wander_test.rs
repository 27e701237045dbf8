//! Enemies that cannot see the player only ever wander into open cells.

mod helpers;

use helpers::{position_of, session_with};
use proptest::prelude::*;
use turn_dungeon::dungeon::{CellKind, Direction, MapLegend};
use turn_dungeon::TurnState;

const SEALED: &str = "\
#######
#.....#
#.#.#.#
#.....#
#.#.#.#
#######";

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn blind_enemies_stay_on_open_ground(seed in any::<u64>()) {
        let mut game = session_with(
            SEALED,
            "imp,3,5,1000,1,9,6,0\nelf,4,3,1000,1,9,4,0",
            &MapLegend::default(),
            &helpers::options(seed),
        );
        prop_assert_eq!(game.start(), TurnState::PlayerTurn);
        let enemies = game.enemies().to_vec();
        let mut last: Vec<_> = enemies.iter().map(|&e| position_of(&game, e)).collect();

        for turn in 0..40 {
            let direction = if turn % 2 == 0 { Direction::East } else { Direction::West };
            prop_assert_eq!(game.player_turn(direction), TurnState::PlayerTurn);

            for (i, &enemy) in enemies.iter().enumerate() {
                let at = position_of(&game, enemy);
                prop_assert!(game.grid().in_bounds(at));
                prop_assert_eq!(game.grid().kind(at), Some(CellKind::Open));
                prop_assert_eq!(game.grid().occupant(at), Some(enemy));
                prop_assert!(last[i].manhattan(at) <= 1);
                last[i] = at;
            }
        }
    }
}
