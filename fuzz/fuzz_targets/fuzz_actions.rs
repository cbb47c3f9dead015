#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tunti::config::GameConfig;
use tunti::game::{check_invariants, Action, Building, Coord, GameState, SeededDice, UnitKind};
use tunti::rng::{Mulberry32, Seed};

#[derive(Arbitrary, Debug)]
enum Step {
    Build { x: u8, y: u8, building: u8 },
    Train { x: u8, y: u8, unit: u8 },
    Move { x: u8, y: u8, dx: i8, dy: i8 },
    EndTurn,
}

#[derive(Arbitrary, Debug)]
struct ActionInput {
    seed: u32,
    dice: u32,
    steps: Vec<Step>,
}

fn coord(x: u8, y: u8) -> Coord {
    Coord::new(u16::from(x % 20), u16::from(y % 14))
}

fuzz_target!(|input: ActionInput| {
    let Ok(mut state) = GameState::generate(&Seed::from(input.seed), &GameConfig::default()) else {
        return;
    };
    let mut dice = SeededDice::new(Mulberry32::new(input.dice));

    for step in input.steps.into_iter().take(256) {
        let before = state.clone();
        let result = match step {
            Step::EndTurn => state.end_turn().map(|_| ()),
            Step::Build { x, y, building } => {
                let building = Building::CONSTRUCTIBLE[usize::from(building) % Building::CONSTRUCTIBLE.len()];
                let action = Action::Build { tile: coord(x, y), building };
                state.apply(&action, &mut dice).map(|_| ())
            }
            Step::Train { x, y, unit } => {
                let unit = UnitKind::ALL[usize::from(unit) % UnitKind::ALL.len()];
                let action = Action::Train { tile: coord(x, y), unit };
                state.apply(&action, &mut dice).map(|_| ())
            }
            Step::Move { x, y, dx, dy } => {
                let from = coord(x, y);
                let Some(to) = from.offset(i32::from(dx % 3), i32::from(dy % 3)) else {
                    continue;
                };
                state.apply(&Action::Move { from, to }, &mut dice).map(|_| ())
            }
        };

        // Refused commands leave the state untouched.
        if result.is_err() {
            assert_eq!(state, before);
        }
        let violations = check_invariants(&state);
        assert!(violations.is_empty(), "invariants broken: {violations:?}");
    }
});
