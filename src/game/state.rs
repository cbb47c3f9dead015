//! Game state: the single source of truth for one game.
//!
//! A `GameState` is an owned value. Every engine operation takes it by
//! `&mut` (or `&` for queries); there is no ambient global game.

use crate::config::GameConfig;
use crate::game::mapgen::{self, MapGenError};
use crate::game::rules::{CAPITAL_STARTING_HIT_POINTS, STARTING_RESOURCES};
use crate::game::{Capital, Coord, FactionId, Map, Resources, Tile};
use crate::rng::Seed;

/// Whether the game is still running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameOutcome {
    /// Both capitals stand.
    InProgress,
    /// A capital fell; the other faction won.
    Won {
        /// The faction whose capital still stands.
        winner: FactionId,
    },
}

/// Complete game state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    /// Completed turn count, starting at zero.
    pub turn_number: u32,
    /// Faction whose turn it is.
    pub current_faction: FactionId,
    /// Stockpiles indexed by faction.
    pub resources: [Resources; 2],
    /// The tile grid.
    pub map: Map,
    /// Capitals indexed by faction.
    pub capitals: [Capital; 2],
    /// Remaining capital hit points indexed by faction.
    pub capital_hit_points: [u32; 2],
    /// Selected tile index. UI state only, never part of a snapshot.
    pub selection: Option<usize>,
}

impl GameState {
    /// Create a fresh game around an already generated map.
    ///
    /// Resources and capital hit points take their starting values.
    #[must_use]
    pub fn new(map: Map, capitals: [Capital; 2]) -> Self {
        Self {
            turn_number: 0,
            current_faction: FactionId::FIRST,
            resources: [STARTING_RESOURCES; 2],
            map,
            capitals,
            capital_hit_points: [CAPITAL_STARTING_HIT_POINTS; 2],
            selection: None,
        }
    }

    /// Generate a new game from a seed.
    pub fn generate(seed: &Seed, config: &GameConfig) -> Result<Self, MapGenError> {
        let (map, capitals) = mapgen::generate(seed, config)?;
        Ok(Self::new(map, capitals))
    }

    /// Map width.
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.map.width()
    }

    /// Map height.
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.map.height()
    }

    /// Tile at a coordinate.
    #[must_use]
    pub fn tile(&self, coord: Coord) -> Option<&Tile> {
        self.map.get(coord)
    }

    /// Resources of a faction.
    #[must_use]
    pub const fn resources_of(&self, faction: FactionId) -> &Resources {
        &self.resources[faction.index()]
    }

    /// Capital of a faction.
    #[must_use]
    pub const fn capital_of(&self, faction: FactionId) -> Capital {
        self.capitals[faction.index()]
    }

    /// Remaining capital hit points of a faction.
    #[must_use]
    pub const fn capital_hit_points_of(&self, faction: FactionId) -> u32 {
        self.capital_hit_points[faction.index()]
    }

    /// Current outcome, derived from capital hit points.
    #[must_use]
    pub fn outcome(&self) -> GameOutcome {
        FactionId::ALL
            .into_iter()
            .find(|faction| self.capital_hit_points_of(*faction) == 0)
            .map_or(GameOutcome::InProgress, |fallen| GameOutcome::Won {
                winner: fallen.opponent(),
            })
    }

    /// Winner, if a capital has fallen.
    #[must_use]
    pub fn winner(&self) -> Option<FactionId> {
        match self.outcome() {
            GameOutcome::InProgress => None,
            GameOutcome::Won { winner } => Some(winner),
        }
    }

    /// Check if the game is over.
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.winner().is_some()
    }

    /// Select a tile by linear index; out-of-range indices clear the selection.
    pub fn select(&mut self, index: Option<usize>) {
        self.selection = index.filter(|i| *i < self.map.len());
    }

    /// Summary counts for one faction.
    #[must_use]
    pub fn stats(&self, faction: FactionId) -> FactionStats {
        FactionStats {
            territory: self.map.count_territory(faction),
            units: self.map.count_units(faction),
            buildings: self.map.count_buildings(faction),
            capital_hit_points: self.capital_hit_points_of(faction),
            resources: *self.resources_of(faction),
        }
    }
}

/// Summary counts for one faction, used by reports and the match runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct FactionStats {
    /// Owned tiles.
    pub territory: usize,
    /// Living units.
    pub units: usize,
    /// Buildings on owned tiles, landmarks excluded.
    pub buildings: usize,
    /// Remaining capital hit points.
    pub capital_hit_points: u32,
    /// Current stockpile.
    pub resources: Resources,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_game() -> GameState {
        GameState::generate(&Seed::default(), &GameConfig::default()).unwrap()
    }

    #[test]
    fn test_game_state_creation() {
        let state = create_test_game();
        assert_eq!(state.turn_number, 0);
        assert_eq!(state.current_faction, FactionId::FIRST);
        assert_eq!(state.resources, [STARTING_RESOURCES; 2]);
        assert_eq!(state.capital_hit_points, [5, 5]);
        assert_eq!(state.outcome(), GameOutcome::InProgress);
    }

    #[test]
    fn test_outcome_derived_from_hit_points() {
        let mut state = create_test_game();
        state.capital_hit_points[1] = 0;
        assert_eq!(
            state.outcome(),
            GameOutcome::Won {
                winner: FactionId::FIRST
            }
        );
        assert!(state.is_game_over());
    }

    #[test]
    fn test_select_bounds() {
        let mut state = create_test_game();
        state.select(Some(3));
        assert_eq!(state.selection, Some(3));
        state.select(Some(10_000));
        assert_eq!(state.selection, None);
    }

    #[test]
    fn test_stats_counts_starting_territory() {
        let state = create_test_game();
        let stats = state.stats(FactionId::FIRST);
        assert!(stats.territory >= 1);
        assert_eq!(stats.units, 0);
        assert_eq!(stats.buildings, 0);
        assert_eq!(stats.capital_hit_points, 5);
    }
}
