//! Action validation and execution.
//!
//! Every action is checked in full by [`validate`] before [`apply_action`]
//! touches the state, so a rejected action always leaves the state exactly as
//! it was. The acting faction is always `state.current_faction`.

use serde::{Deserialize, Serialize};

use crate::game::combat::{self, CombatDice, CombatReport};
use crate::game::economy::{self, can_afford};
use crate::game::invariants::assert_invariants;
use crate::game::{Building, Coord, FactionId, GameState, Resources, Terrain, Unit, UnitKind};

/// A command issued by the faction whose turn it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Action {
    /// Construct a building on an owned tile.
    Build {
        /// Target tile.
        tile: Coord,
        /// Building to construct.
        building: Building,
    },
    /// Train a unit on an owned tile holding the prerequisite building.
    Train {
        /// Target tile.
        tile: Coord,
        /// Unit to train.
        unit: UnitKind,
    },
    /// Move, attack or siege, decided by what stands on `to`.
    Move {
        /// Tile holding the acting unit.
        from: Coord,
        /// Destination tile.
        to: Coord,
    },
}

/// What a legal action will do, decided without mutating anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    /// Construct, paying `cost`.
    Build {
        /// Cost that will be paid.
        cost: Resources,
    },
    /// Train, paying `cost`.
    Train {
        /// Cost that will be paid.
        cost: Resources,
    },
    /// Step onto an empty tile.
    Relocate {
        /// Whether the destination will become the mover's territory.
        claims: bool,
    },
    /// Fight the enemy unit on the destination.
    Attack {
        /// Owner of the defending unit.
        defender: FactionId,
    },
    /// Strike the enemy capital on the destination.
    Siege {
        /// Owner of the besieged capital.
        defender: FactionId,
    },
}

/// Why an action was rejected. The state is unchanged in every case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum RejectReason {
    /// A capital has already fallen.
    #[error("the game is over")]
    GameOver,
    /// A coordinate lies outside the map.
    #[error("{0} is outside the map")]
    OutOfBounds(Coord),
    /// The tile is not owned by the acting faction.
    #[error("{0} is not your territory")]
    NotOwner(Coord),
    /// The building cannot stand on this terrain.
    #[error("{building} cannot be built on {terrain:?}")]
    TerrainNotAllowed {
        /// Requested building.
        building: Building,
        /// Terrain of the target tile.
        terrain: Terrain,
    },
    /// The tile already has a building.
    #[error("{0} already has a building")]
    BuildingPresent(Coord),
    /// The building is a landmark and cannot be constructed.
    #[error("{0} cannot be constructed")]
    NotBuildable(Building),
    /// The acting faction lacks resources.
    #[error("not enough resources, short by {shortfall}")]
    CannotAfford {
        /// Amount still missing per resource.
        shortfall: Resources,
    },
    /// The tile lacks the building the unit trains at.
    #[error("{unit} must be trained at a {required}")]
    MissingPrerequisite {
        /// Requested unit.
        unit: UnitKind,
        /// Building the tile must hold.
        required: Building,
    },
    /// The tile already holds a unit.
    #[error("{0} is already occupied")]
    TileOccupied(Coord),
    /// No unit stands on the origin.
    #[error("no unit at {0}")]
    NoUnit(Coord),
    /// The unit on the origin belongs to the other faction.
    #[error("the unit at {0} is not yours")]
    NotYourUnit(Coord),
    /// Destination is farther than the unit can move.
    #[error("distance {distance} exceeds move range {range}")]
    OutOfRange {
        /// Manhattan distance requested.
        distance: u32,
        /// Unit move range.
        range: u32,
    },
    /// The unit cannot enter the destination terrain.
    #[error("{unit} cannot enter {terrain:?}")]
    DomainMismatch {
        /// Moving unit.
        unit: UnitKind,
        /// Destination terrain.
        terrain: Terrain,
    },
    /// A friendly unit blocks the destination.
    #[error("{0} holds a friendly unit")]
    FriendlyUnit(Coord),
    /// Origin and destination are the same tile.
    #[error("a unit cannot move onto its own tile")]
    SameTile,
}

/// Result of a successful siege.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SiegeReport {
    /// Faction whose capital was struck.
    pub defender: FactionId,
    /// Capital hit points left after the strike.
    pub remaining_hit_points: u32,
    /// Set when the strike took the capital; the game is over.
    pub winner: Option<FactionId>,
}

/// What an executed action did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// A building was constructed.
    Built {
        /// Tile built on.
        tile: Coord,
        /// New building.
        building: Building,
    },
    /// A unit was trained.
    Trained {
        /// Tile trained on.
        tile: Coord,
        /// New unit type.
        unit: UnitKind,
    },
    /// A unit stepped onto an empty tile.
    Moved {
        /// Origin.
        from: Coord,
        /// Destination.
        to: Coord,
        /// Whether the destination became the mover's territory.
        claimed: bool,
    },
    /// A fight was resolved.
    Combat(CombatReport),
    /// An enemy capital was struck.
    Siege(SiegeReport),
}

impl ActionOutcome {
    /// Winner declared by this action, if it ended the game.
    #[must_use]
    pub const fn winner(&self) -> Option<FactionId> {
        match self {
            Self::Siege(report) => report.winner,
            _ => None,
        }
    }
}

/// Check an action for the faction whose turn it is, without mutating.
pub fn validate(state: &GameState, action: &Action) -> Result<Intent, RejectReason> {
    if state.is_game_over() {
        return Err(RejectReason::GameOver);
    }
    let faction = state.current_faction;
    match *action {
        Action::Build { tile, building } => validate_build(state, faction, tile, building),
        Action::Train { tile, unit } => validate_train(state, faction, tile, unit),
        Action::Move { from, to } => validate_move(state, faction, from, to),
    }
}

fn validate_build(
    state: &GameState,
    faction: FactionId,
    coord: Coord,
    building: Building,
) -> Result<Intent, RejectReason> {
    let tile = state.tile(coord).ok_or(RejectReason::OutOfBounds(coord))?;
    if tile.owner != Some(faction) {
        return Err(RejectReason::NotOwner(coord));
    }
    let cost = building.cost().ok_or(RejectReason::NotBuildable(building))?;
    if !building.allowed_on(tile.terrain) {
        return Err(RejectReason::TerrainNotAllowed {
            building,
            terrain: tile.terrain,
        });
    }
    if tile.building.is_some() {
        return Err(RejectReason::BuildingPresent(coord));
    }
    check_affordable(state.resources_of(faction), &cost)?;
    Ok(Intent::Build { cost })
}

fn validate_train(
    state: &GameState,
    faction: FactionId,
    coord: Coord,
    unit: UnitKind,
) -> Result<Intent, RejectReason> {
    let tile = state.tile(coord).ok_or(RejectReason::OutOfBounds(coord))?;
    if tile.owner != Some(faction) {
        return Err(RejectReason::NotOwner(coord));
    }
    let required = unit.prerequisite();
    if tile.building != Some(required) {
        return Err(RejectReason::MissingPrerequisite { unit, required });
    }
    if tile.unit.is_some() {
        return Err(RejectReason::TileOccupied(coord));
    }
    let cost = unit.cost();
    check_affordable(state.resources_of(faction), &cost)?;
    Ok(Intent::Train { cost })
}

fn validate_move(
    state: &GameState,
    faction: FactionId,
    from: Coord,
    to: Coord,
) -> Result<Intent, RejectReason> {
    let origin = state.tile(from).ok_or(RejectReason::OutOfBounds(from))?;
    let target = state.tile(to).ok_or(RejectReason::OutOfBounds(to))?;
    let unit = origin.unit.ok_or(RejectReason::NoUnit(from))?;
    if unit.owner != faction {
        return Err(RejectReason::NotYourUnit(from));
    }
    if from == to {
        return Err(RejectReason::SameTile);
    }

    let stats = unit.stats();
    let distance = from.manhattan(to);
    if distance > stats.move_range {
        return Err(RejectReason::OutOfRange {
            distance,
            range: stats.move_range,
        });
    }
    if !stats.domain.can_enter(target.terrain) {
        return Err(RejectReason::DomainMismatch {
            unit: unit.kind,
            terrain: target.terrain,
        });
    }

    if let Some(occupant) = target.unit {
        if occupant.owner == faction {
            return Err(RejectReason::FriendlyUnit(to));
        }
        return Ok(Intent::Attack {
            defender: occupant.owner,
        });
    }
    if target.is_capital {
        if let Some(owner) = target.owner.filter(|owner| *owner != faction) {
            return Ok(Intent::Siege { defender: owner });
        }
    }
    Ok(Intent::Relocate {
        claims: target.owner.is_none() && !target.terrain.is_water(),
    })
}

fn check_affordable(resources: &Resources, cost: &Resources) -> Result<(), RejectReason> {
    if can_afford(resources, cost) {
        Ok(())
    } else {
        Err(RejectReason::CannotAfford {
            shortfall: resources.shortfall(cost),
        })
    }
}

/// Validate and execute an action for the faction whose turn it is.
///
/// `dice` is only consulted when the action turns into a fight.
pub fn apply_action(
    state: &mut GameState,
    action: &Action,
    dice: &mut dyn CombatDice,
) -> Result<ActionOutcome, RejectReason> {
    let intent = match validate(state, action) {
        Ok(intent) => intent,
        Err(reason) => {
            tracing::debug!(?action, %reason, faction = %state.current_faction, "action rejected");
            return Err(reason);
        }
    };
    let faction = state.current_faction;

    let outcome = match (*action, intent) {
        (Action::Build { tile, building }, Intent::Build { cost }) => {
            economy::pay(&mut state.resources[faction.index()], &cost);
            if let Some(target) = state.map.get_mut(tile) {
                target.building = Some(building);
            }
            ActionOutcome::Built { tile, building }
        }
        (Action::Train { tile, unit }, Intent::Train { cost }) => {
            economy::pay(&mut state.resources[faction.index()], &cost);
            if let Some(target) = state.map.get_mut(tile) {
                target.unit = Some(Unit::new(unit, faction));
            }
            ActionOutcome::Trained { tile, unit }
        }
        (Action::Move { from, to }, Intent::Relocate { claims }) => {
            let unit = state.map.get_mut(from).and_then(|origin| origin.unit.take());
            if let Some(target) = state.map.get_mut(to) {
                target.unit = unit;
                if claims {
                    target.owner = Some(faction);
                }
            }
            ActionOutcome::Moved {
                from,
                to,
                claimed: claims,
            }
        }
        (Action::Move { from, to }, Intent::Attack { .. }) => {
            match combat::process_attack(&mut state.map, from, to, dice) {
                Some(report) => {
                    tracing::debug!(%from, %to, result = ?report.result, "combat resolved");
                    ActionOutcome::Combat(report)
                }
                None => return Err(RejectReason::NoUnit(to)),
            }
        }
        (Action::Move { .. }, Intent::Siege { defender }) => {
            let hit_points = &mut state.capital_hit_points[defender.index()];
            *hit_points = hit_points.saturating_sub(1);
            let remaining_hit_points = *hit_points;
            let winner = (remaining_hit_points == 0).then_some(faction);
            tracing::info!(attacker = %faction, %defender, remaining_hit_points, "capital besieged");
            if let Some(winner) = winner {
                tracing::info!(%winner, turn = state.turn_number, "capital fell, game over");
            }
            ActionOutcome::Siege(SiegeReport {
                defender,
                remaining_hit_points,
                winner,
            })
        }
        (action, intent) => {
            unreachable!("validate returned {intent:?} for {action:?}")
        }
    };

    assert_invariants(state);
    Ok(outcome)
}

impl GameState {
    /// Check an action without executing it. See [`validate`].
    pub fn validate(&self, action: &Action) -> Result<Intent, RejectReason> {
        validate(self, action)
    }

    /// Execute an action. See [`apply_action`].
    pub fn apply(
        &mut self,
        action: &Action,
        dice: &mut dyn CombatDice,
    ) -> Result<ActionOutcome, RejectReason> {
        apply_action(self, action, dice)
    }
}
