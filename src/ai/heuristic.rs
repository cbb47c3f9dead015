//! Priority-table heuristic policy.
//!
//! Each turn the policy tries, in order:
//!
//! 1. One build: the first building in the difficulty's priority list that
//!    is under its quota, affordable, and has an eligible owned empty tile.
//!    The tile is chosen uniformly at random.
//! 2. One train: the first affordable unit with an empty production tile.
//! 3. An advance: every unit steps toward the enemy capital, trying the
//!    horizontal step, then the vertical one, then the diagonal, and keeping
//!    only the first step that lies inside the map.
//!
//! The build rule refines plain "first affordable building with an eligible
//! tile": each priority entry carries a quota, and an entry whose building
//! the faction already owns that many of is skipped. A quota of
//! `usize::MAX` reduces an entry to the plain rule.
//!
//! Planning runs against a scratch copy of the state so each proposed action
//! is checked against the effects of the ones before it. Fights are not
//! simulated: an attacked tile is treated as contested for the rest of the
//! plan and the attacker is assumed to stay where it was.

use std::collections::HashSet;

use rand::Rng;

use crate::ai::{Difficulty, Policy};
use crate::game::{
    apply_action, can_afford, Action, Building, Coord, FactionId, FixedDice, GameState, Intent,
    UnitKind,
};

/// Build priority entry: a building and how many of it the faction may own.
type BuildPriority = (Building, usize);

const EASY_BUILDS: &[BuildPriority] = &[
    (Building::Farm, 3),
    (Building::Barracks, 1),
    (Building::Lumber, 2),
    (Building::Farm, usize::MAX),
];

const NORMAL_BUILDS: &[BuildPriority] = &[
    (Building::Barracks, 1),
    (Building::Farm, 2),
    (Building::Lumber, 2),
    (Building::Market, 1),
    (Building::Port, 1),
    (Building::Farm, 4),
    (Building::Market, usize::MAX),
];

const HARD_BUILDS: &[BuildPriority] = &[
    (Building::Barracks, 1),
    (Building::Market, 2),
    (Building::Farm, 2),
    (Building::Lumber, 2),
    (Building::Barracks, 2),
    (Building::Port, 1),
    (Building::Market, usize::MAX),
];

const EASY_UNITS: &[UnitKind] = &[UnitKind::Infantry];

const NORMAL_UNITS: &[UnitKind] = &[UnitKind::Infantry, UnitKind::Archer, UnitKind::Ship];

const HARD_UNITS: &[UnitKind] = &[
    UnitKind::Cavalry,
    UnitKind::Archer,
    UnitKind::Infantry,
    UnitKind::Ship,
];

impl Difficulty {
    /// Building priorities with per-building quotas, highest first.
    #[must_use]
    pub const fn build_priorities(self) -> &'static [(Building, usize)] {
        match self {
            Self::Easy => EASY_BUILDS,
            Self::Normal => NORMAL_BUILDS,
            Self::Hard => HARD_BUILDS,
        }
    }

    /// Unit priorities, highest first.
    #[must_use]
    pub const fn unit_priorities(self) -> &'static [UnitKind] {
        match self {
            Self::Easy => EASY_UNITS,
            Self::Normal => NORMAL_UNITS,
            Self::Hard => HARD_UNITS,
        }
    }
}

/// The built-in computer player.
#[derive(Debug, Clone)]
pub struct HeuristicPolicy<R> {
    difficulty: Difficulty,
    rng: R,
}

impl<R: Rng> HeuristicPolicy<R> {
    /// Create a policy drawing its tile choices from `rng`.
    #[must_use]
    pub const fn new(difficulty: Difficulty, rng: R) -> Self {
        Self { difficulty, rng }
    }

    /// Configured difficulty.
    #[must_use]
    pub const fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    fn pick<T: Copy>(&mut self, options: &[T]) -> Option<T> {
        if options.is_empty() {
            None
        } else {
            Some(options[self.rng.gen_range(0..options.len())])
        }
    }

    fn plan_build(&mut self, scratch: &GameState, faction: FactionId) -> Option<Action> {
        let resources = scratch.resources_of(faction);
        for &(building, quota) in self.difficulty.build_priorities() {
            let Some(cost) = building.cost() else {
                continue;
            };
            if !can_afford(resources, &cost) || owned_count(scratch, faction, building) >= quota {
                continue;
            }
            let tiles: Vec<Coord> = scratch
                .map
                .tiles_owned_by(faction)
                .filter(|(_, tile)| tile.building.is_none() && building.allowed_on(tile.terrain))
                .map(|(coord, _)| coord)
                .collect();
            if let Some(tile) = self.pick(&tiles) {
                return Some(Action::Build { tile, building });
            }
        }
        None
    }

    fn plan_train(&mut self, scratch: &GameState, faction: FactionId) -> Option<Action> {
        let resources = scratch.resources_of(faction);
        for &unit in self.difficulty.unit_priorities() {
            if !can_afford(resources, &unit.cost()) {
                continue;
            }
            let required = unit.prerequisite();
            let tiles: Vec<Coord> = scratch
                .map
                .tiles_owned_by(faction)
                .filter(|(_, tile)| tile.building == Some(required) && tile.unit.is_none())
                .map(|(coord, _)| coord)
                .collect();
            if let Some(tile) = self.pick(&tiles) {
                return Some(Action::Train { tile, unit });
            }
        }
        None
    }
}

fn owned_count(state: &GameState, faction: FactionId, building: Building) -> usize {
    state
        .map
        .tiles_owned_by(faction)
        .filter(|(_, tile)| tile.building == Some(building))
        .count()
}

/// Sign of `to - from` on one axis.
fn step(from: u16, to: u16) -> i32 {
    match from.cmp(&to) {
        std::cmp::Ordering::Less => 1,
        std::cmp::Ordering::Equal => 0,
        std::cmp::Ordering::Greater => -1,
    }
}

/// First in-bounds step from `from` toward `target`: horizontal, vertical,
/// then diagonal.
#[must_use]
pub fn advance_step(state: &GameState, from: Coord, target: Coord) -> Option<Coord> {
    let dx = step(from.x, target.x);
    let dy = step(from.y, target.y);
    [(dx, 0), (0, dy), (dx, dy)]
        .into_iter()
        .filter(|&(x, y)| x != 0 || y != 0)
        .filter_map(|(x, y)| from.offset(x, y))
        .find(|coord| state.map.in_bounds(*coord))
}

/// Apply a deterministic plan step to the scratch state.
///
/// Only build, train, relocate and siege reach here; none of them roll dice.
fn simulate(scratch: &mut GameState, action: &Action) -> bool {
    apply_action(scratch, action, &mut FixedDice(0)).is_ok()
}

impl<R: Rng> Policy for HeuristicPolicy<R> {
    fn decide(&mut self, state: &GameState, faction: FactionId) -> Vec<Action> {
        let mut scratch = state.clone();
        scratch.current_faction = faction;
        let mut plan = Vec::new();
        if scratch.is_game_over() {
            return plan;
        }

        if let Some(action) = self.plan_build(&scratch, faction) {
            if simulate(&mut scratch, &action) {
                plan.push(action);
            }
        }
        if let Some(action) = self.plan_train(&scratch, faction) {
            if simulate(&mut scratch, &action) {
                plan.push(action);
            }
        }

        let target = scratch.capital_of(faction.opponent()).coord;
        let origins: Vec<Coord> = scratch.map.units_of(faction).map(|(coord, _)| coord).collect();
        let mut contested: HashSet<Coord> = HashSet::new();

        for from in origins {
            if scratch.is_game_over() {
                break;
            }
            let Some(to) = advance_step(&scratch, from, target) else {
                continue;
            };
            if contested.contains(&to) {
                continue;
            }
            let action = Action::Move { from, to };
            match scratch.validate(&action) {
                Ok(Intent::Attack { .. }) => {
                    contested.insert(to);
                    plan.push(action);
                }
                Ok(_) => {
                    if simulate(&mut scratch, &action) {
                        plan.push(action);
                    }
                }
                Err(_) => {}
            }
        }

        plan
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::game::{Resources, Terrain, Unit};
    use crate::rng::{Mulberry32, Seed};

    fn fresh(seed: &str) -> GameState {
        GameState::generate(&Seed::from(seed), &GameConfig::default()).unwrap()
    }

    #[test]
    fn test_first_turn_builds_top_priority() {
        let state = fresh("heuristic");
        let mut policy = HeuristicPolicy::new(Difficulty::Normal, Mulberry32::new(3));
        let plan = policy.decide(&state, FactionId::FIRST);
        assert!(matches!(
            plan.first(),
            Some(Action::Build {
                building: Building::Barracks,
                ..
            })
        ));
    }

    #[test]
    fn test_filled_quota_moves_to_next_entry() {
        let mut state = fresh("heuristic");
        let (site, _) = state
            .map
            .tiles_owned_by(FactionId::FIRST)
            .find(|(_, tile)| tile.building.is_none() && Building::Barracks.allowed_on(tile.terrain))
            .unwrap();
        state.map.get_mut(site).unwrap().building = Some(Building::Barracks);

        // Normal allows one barracks; the next entry is a farm.
        let mut policy = HeuristicPolicy::new(Difficulty::Normal, Mulberry32::new(3));
        let plan = policy.decide(&state, FactionId::FIRST);
        assert!(matches!(
            plan.first(),
            Some(Action::Build {
                building: Building::Farm,
                ..
            })
        ));
    }

    #[test]
    fn test_poor_faction_plans_nothing() {
        let mut state = fresh("heuristic");
        state.resources[0] = Resources::ZERO;
        let mut policy = HeuristicPolicy::new(Difficulty::Hard, Mulberry32::new(3));
        assert!(policy.decide(&state, FactionId::FIRST).is_empty());
    }

    #[test]
    fn test_plan_is_legal_in_sequence() {
        let mut state = fresh("legal");
        let mut policy = HeuristicPolicy::new(Difficulty::Hard, Mulberry32::new(9));
        for _ in 0..40 {
            if state.is_game_over() {
                break;
            }
            let plan = policy.decide(&state, state.current_faction);
            for action in &plan {
                state
                    .apply(action, &mut FixedDice(2))
                    .unwrap_or_else(|reason| panic!("{action:?} rejected: {reason}"));
            }
            if !state.is_game_over() {
                state.end_turn().unwrap();
            }
        }
    }

    #[test]
    fn test_advance_step_order() {
        let state = fresh("step");
        let from = Coord::new(5, 5);
        assert_eq!(advance_step(&state, from, Coord::new(9, 9)), Some(Coord::new(6, 5)));
        assert_eq!(advance_step(&state, from, Coord::new(5, 1)), Some(Coord::new(5, 4)));
        assert_eq!(advance_step(&state, from, from), None);
        assert_eq!(
            advance_step(&state, Coord::new(0, 3), Coord::new(0, 0)),
            Some(Coord::new(0, 2))
        );
    }

    #[test]
    fn test_units_do_not_pile_onto_one_attack() {
        let mut state = fresh("pile");
        for coord in [Coord::new(11, 8), Coord::new(12, 8), Coord::new(12, 9)] {
            let tile = state.map.get_mut(coord).unwrap();
            tile.terrain = Terrain::Plains;
            tile.building = None;
        }
        let a = FactionId::FIRST;
        let place = |state: &mut GameState, coord: Coord, owner: FactionId| {
            state.map.get_mut(coord).unwrap().unit = Some(Unit::new(UnitKind::Infantry, owner));
        };
        place(&mut state, Coord::new(11, 8), a);
        place(&mut state, Coord::new(12, 9), a);
        place(&mut state, Coord::new(12, 8), FactionId::SECOND);
        state.resources[0] = Resources::ZERO;

        // Both units would step onto (12, 8); only the first attacks it.
        let mut policy = HeuristicPolicy::new(Difficulty::Normal, Mulberry32::new(1));
        let plan = policy.decide(&state, a);
        assert_eq!(
            plan,
            vec![Action::Move {
                from: Coord::new(11, 8),
                to: Coord::new(12, 8)
            }]
        );
    }
}
