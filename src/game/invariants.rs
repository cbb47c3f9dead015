//! Game invariants: structural checks that detect engine bugs.
//!
//! None of these can be violated through the public action surface. A
//! violation means a bug in the engine or a corrupt snapshot, which is why the
//! snapshot decoder runs the same checks before accepting a state.

use crate::game::rules::CAPITAL_STARTING_HIT_POINTS;
use crate::game::{FactionId, GameState, Terrain};

/// A single violated invariant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invariant violation: {message}")]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl InvariantViolation {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Check all game invariants.
///
/// Returns every violation found, or an empty list if the state is sound.
#[must_use]
pub fn check_invariants(state: &GameState) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();

    for (coord, tile) in state.map.iter() {
        if tile.is_capital && (tile.terrain != Terrain::City || tile.owner.is_none()) {
            violations.push(InvariantViolation::new(format!(
                "capital at {coord} must be an owned city, found {:?} owned by {:?}",
                tile.terrain, tile.owner
            )));
        }

        if let Some(building) = tile.building {
            if !building.allowed_on(tile.terrain) {
                violations.push(InvariantViolation::new(format!(
                    "{building} at {coord} is not allowed on {:?}",
                    tile.terrain
                )));
            }
            if building.is_landmark() && !tile.is_capital {
                violations.push(InvariantViolation::new(format!(
                    "landmark {building} at {coord} is not on a capital"
                )));
            }
        }

        if let Some(unit) = tile.unit {
            if !unit.is_alive() {
                violations.push(InvariantViolation::new(format!(
                    "dead {} left at {coord} with {} hit points",
                    unit.kind, unit.hit_points
                )));
            }
            if !unit.stats().domain.can_enter(tile.terrain) {
                violations.push(InvariantViolation::new(format!(
                    "{} at {coord} stands on {:?}",
                    unit.kind, tile.terrain
                )));
            }
        }
    }

    for faction in FactionId::ALL {
        let capital = state.capitals[faction.index()];
        if capital.owner != faction {
            violations.push(InvariantViolation::new(format!(
                "capital slot {faction} belongs to faction {}",
                capital.owner
            )));
        }
        match state.map.get(capital.coord) {
            Some(tile) if tile.is_capital && tile.owner == Some(faction) => {}
            Some(_) => violations.push(InvariantViolation::new(format!(
                "capital of faction {faction} at {} is not an owned capital tile",
                capital.coord
            ))),
            None => violations.push(InvariantViolation::new(format!(
                "capital of faction {faction} at {} is out of bounds",
                capital.coord
            ))),
        }

        let hit_points = state.capital_hit_points[faction.index()];
        if hit_points > CAPITAL_STARTING_HIT_POINTS {
            violations.push(InvariantViolation::new(format!(
                "capital of faction {faction} has {hit_points} hit points, above the maximum"
            )));
        }
    }

    if state.capitals[0].coord == state.capitals[1].coord {
        violations.push(InvariantViolation::new("both capitals share one tile"));
    }

    if state.capital_hit_points.iter().all(|hp| *hp == 0) {
        violations.push(InvariantViolation::new("both capitals have fallen"));
    }

    violations
}

/// Panic with every violation listed. Only active in debug builds.
#[cfg(debug_assertions)]
pub fn assert_invariants(state: &GameState) {
    let violations = check_invariants(state);
    assert!(
        violations.is_empty(),
        "game invariants violated:\n{}",
        violations
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    );
}

/// No-op in release builds.
#[cfg(not(debug_assertions))]
pub fn assert_invariants(_state: &GameState) {}
