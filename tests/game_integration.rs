//! Multi-turn integration tests for game mechanics.
//!
//! These tests pin the generated default map, walk through the worked rule
//! examples, and play full computer matches end to end.
//!
//! Run with: cargo test --release game_integration

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use tunti::ai::{play_turn, Difficulty, HeuristicPolicy, Policy};
use tunti::config::GameConfig;
use tunti::game::{
    Action, ActionOutcome, Building, CombatResult, Coord, FactionId, FixedDice, GameState,
    RejectReason, SeededDice, Terrain, Unit, UnitKind,
};
use tunti::replay::{render_terrain, Replay};
use tunti::rng::{Mulberry32, Seed};
use tunti::snapshot;
use tunti::tournament::{run_match, MatchConfig};

/// Terrain of the default map, seed "tunti-local".
const GOLDEN_MAP: &str = "\
f.f..^.......f.^.~
f.^.f..^~.^..ff~..
.^f..f~.~ff.f....f
........f...~...^.
.~f.^f..~~~~ff....
..f.~..~.ff.~f...~
~.ff^.~.~~..#~.^ff
f.~~~~f.......~~..
.f^^#...ff.f..^...
.f...f~.....^...^f
..~...^..~.^.~~..f
.ff...^~^....f..f.
";

fn default_game() -> GameState {
    GameState::generate(&Seed::default(), &GameConfig::default()).unwrap()
}

fn place(state: &mut GameState, coord: Coord, kind: UnitKind, owner: FactionId) {
    state.map.get_mut(coord).unwrap().unit = Some(Unit::new(kind, owner));
}

#[test]
fn test_default_map_is_pinned() {
    let state = default_game();
    assert_eq!(render_terrain(&state.map), GOLDEN_MAP);
    assert_eq!(state.map.count_territory(FactionId::FIRST), 18);
    assert_eq!(state.map.count_territory(FactionId::SECOND), 20);

    let capital = state.tile(Coord::new(4, 8)).unwrap();
    assert_eq!(capital.terrain, Terrain::City);
    assert_eq!(capital.building, Some(Building::Pagoda));
    assert!(capital.is_capital);
    let capital = state.tile(Coord::new(12, 6)).unwrap();
    assert_eq!(capital.building, Some(Building::Palace));
    assert_eq!(capital.owner, Some(FactionId::SECOND));
}

#[test]
fn test_generation_depends_only_on_seed() {
    let config = GameConfig::default();
    let a = GameState::generate(&Seed::from("room-a"), &config).unwrap();
    let b = GameState::generate(&Seed::from("room-a"), &config).unwrap();
    let c = GameState::generate(&Seed::from("room-b"), &config).unwrap();
    assert_eq!(a, b);
    assert_ne!(a.map, c.map);
}

#[test]
fn test_farm_production_turn() {
    let mut state = default_game();
    state.map.get_mut(Coord::new(5, 8)).unwrap().building = Some(Building::Farm);

    let report = state.end_turn().unwrap();
    assert_eq!(state.resources[0].rice, 108);
    assert_eq!(state.resources[0].timber, 100);
    assert_eq!(report.turn_number, 1);
    assert_eq!(state.turn_number, 1);
    assert_eq!(state.current_faction, FactionId::SECOND);
}

#[test]
fn test_unaffordable_build_changes_nothing() {
    let mut state = default_game();
    state.resources[0].timber = 10;
    let before = state.clone();
    let result = state.apply(
        &Action::Build {
            tile: Coord::new(5, 8),
            building: Building::Farm,
        },
        &mut FixedDice(0),
    );
    assert!(matches!(result, Err(RejectReason::CannotAfford { .. })));
    assert_eq!(state, before);
}

#[test]
fn test_worked_combat_example() {
    let mut state = default_game();
    place(&mut state, Coord::new(5, 8), UnitKind::Infantry, FactionId::FIRST);
    place(&mut state, Coord::new(6, 8), UnitKind::Archer, FactionId::SECOND);

    let outcome = state
        .apply(
            &Action::Move {
                from: Coord::new(5, 8),
                to: Coord::new(6, 8),
            },
            &mut FixedDice(0),
        )
        .unwrap();
    let ActionOutcome::Combat(report) = outcome else {
        panic!("expected combat, got {outcome:?}");
    };
    assert_eq!(report.damage_to_defender, 1);
    assert_eq!(report.damage_to_attacker, 0);
    assert_eq!(report.result, CombatResult::Repelled);
    assert_eq!(state.tile(Coord::new(6, 8)).unwrap().unit.unwrap().hit_points, 2);
    assert_eq!(state.tile(Coord::new(5, 8)).unwrap().unit.unwrap().hit_points, 3);
}

#[test]
fn test_domain_rules() {
    let mut state = default_game();
    place(&mut state, Coord::new(5, 8), UnitKind::Cavalry, FactionId::FIRST);
    place(&mut state, Coord::new(2, 7), UnitKind::Ship, FactionId::FIRST);

    let land_into_water = Action::Move {
        from: Coord::new(5, 8),
        to: Coord::new(5, 7),
    };
    assert!(matches!(
        state.validate(&land_into_water),
        Err(RejectReason::DomainMismatch { .. })
    ));

    let sea_onto_mountain = Action::Move {
        from: Coord::new(2, 7),
        to: Coord::new(2, 8),
    };
    assert!(matches!(
        state.validate(&sea_onto_mountain),
        Err(RejectReason::DomainMismatch { .. })
    ));
}

#[test]
fn test_siege_ends_the_game() {
    let mut state = default_game();
    state.capital_hit_points[1] = 1;
    place(&mut state, Coord::new(11, 6), UnitKind::Cavalry, FactionId::FIRST);

    let outcome = state
        .apply(
            &Action::Move {
                from: Coord::new(11, 6),
                to: Coord::new(12, 6),
            },
            &mut FixedDice(0),
        )
        .unwrap();
    assert_eq!(outcome.winner(), Some(FactionId::FIRST));
    assert_eq!(state.capital_hit_points[1], 0);
    assert_eq!(state.winner(), Some(FactionId::FIRST));

    // Nothing moves after the capital falls.
    assert_eq!(state.end_turn(), Err(RejectReason::GameOver));
    assert_eq!(
        state.apply(
            &Action::Move {
                from: Coord::new(11, 6),
                to: Coord::new(12, 6),
            },
            &mut FixedDice(0),
        ),
        Err(RejectReason::GameOver)
    );
    assert_eq!(state.capital_hit_points[1], 0);
}

#[test]
fn test_ai_plans_survive_real_dice() {
    for seed in ["alpha", "beta", "gamma"] {
        let mut state = GameState::generate(&Seed::from(seed), &GameConfig::default()).unwrap();
        let mut dice = SeededDice::new(Mulberry32::new(17));
        let mut policies = [Difficulty::Hard, Difficulty::Easy]
            .map(|difficulty| HeuristicPolicy::new(difficulty, Mulberry32::new(5)));

        for _ in 0..80 {
            if state.is_game_over() {
                break;
            }
            let faction = state.current_faction;
            let plan = policies[faction.index()].decide(&state, faction);
            for action in &plan {
                state
                    .apply(action, &mut dice)
                    .unwrap_or_else(|reason| panic!("{seed}: {action:?} rejected: {reason}"));
                if state.is_game_over() {
                    break;
                }
            }
            if !state.is_game_over() {
                state.end_turn().unwrap();
            }
        }
        assert!(tunti::game::check_invariants(&state).is_empty());
    }
}

#[test]
fn test_snapshot_round_trip_mid_game() {
    let mut state = default_game();
    let mut dice = SeededDice::new(Mulberry32::new(1));
    let mut policy = HeuristicPolicy::new(Difficulty::Normal, Mulberry32::new(2));
    for _ in 0..20 {
        if play_turn(&mut policy, &mut state, &mut dice).is_err() {
            break;
        }
    }
    let text = snapshot::encode(&state, 99).unwrap();
    let (decoded, stamp) = snapshot::decode(&text).unwrap();
    assert_eq!(decoded, state);
    assert_eq!(stamp, 99);
}

#[test]
fn test_full_match_replays_exactly() {
    let config = MatchConfig {
        max_turns: 60,
        difficulties: [Difficulty::Hard, Difficulty::Normal],
        ..MatchConfig::default()
    };
    let (result, recording) = run_match(&Seed::from(2024), &config).unwrap();
    assert!(result.turns_played <= 60);

    let mut replay = Replay::new(recording).unwrap();
    replay.goto(replay.len()).unwrap();
    let end = replay.state();
    assert_eq!(end.winner(), result.winner);
    assert_eq!(end.turn_number, result.turns_played);
    for faction in FactionId::ALL {
        assert_eq!(end.stats(faction), result.stats[faction.index()]);
    }
}
