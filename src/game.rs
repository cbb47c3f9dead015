//! Game layer for Tunti.
//!
//! Implements the rules of the two-faction territory game:
//! - Map with tiles (terrain, buildings, owners, units, capitals)
//! - Deterministic map generation from a seed
//! - Economy (costs, affordability, production)
//! - Build, train, move, attack and siege actions
//! - Combat resolution
//! - Turn advancement and the win condition
//! - A map editor that preserves every tile invariant

pub mod actions;
pub mod combat;
pub mod economy;
pub mod editor;
mod faction;
pub mod invariants;
mod map;
pub mod mapgen;
pub mod rules;
mod state;
pub mod turn;

pub use actions::{apply_action, validate, Action, ActionOutcome, Intent, RejectReason, SiegeReport};
pub use combat::{CombatDice, CombatReport, CombatResult, FixedDice, RandomDice, SeededDice};
pub use economy::{apply_production, can_afford, pay, Resources};
pub use editor::{PaintError, TilePaint};
pub use faction::{Capital, FactionId, FactionProfile, InvalidFactionId};
pub use invariants::{check_invariants, InvariantViolation};
pub use map::{Coord, Map, Tile, Unit};
pub use mapgen::MapGenError;
pub use rules::{Building, Domain, Terrain, UnitKind, UnitStats};
pub use state::{FactionStats, GameOutcome, GameState};
pub use turn::{end_turn, TurnReport};
