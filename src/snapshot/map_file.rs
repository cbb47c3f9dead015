//! Map-only export used by the editor.
//!
//! Carries terrain, ownership, buildings and capitals. Units, resources, the
//! turn counter and capital hit points are not part of a map; loading one
//! starts a fresh game on it.

use serde::{Deserialize, Serialize};

use crate::game::{Building, FactionId, GameState, Map, Terrain, Tile};
use crate::snapshot::codec::{capitals_from_records, verify};
use crate::snapshot::{CapitalRecord, SnapshotError};

/// A map without any game progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapFile {
    /// Grid width.
    pub width: u16,
    /// Grid height.
    pub height: u16,
    /// Row-major tiles.
    pub tiles: Vec<MapTile>,
    /// Capitals indexed by faction.
    pub capitals: [CapitalRecord; 2],
}

/// One tile of a map file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapTile {
    /// Terrain.
    pub terrain: Terrain,
    /// Owner, if any.
    pub owner: Option<FactionId>,
    /// Building, if any.
    pub building: Option<Building>,
    /// Capital flag.
    pub is_capital: bool,
}

impl MapFile {
    /// Export the map of a state.
    #[must_use]
    pub fn from_state(state: &GameState) -> Self {
        Self {
            width: state.width(),
            height: state.height(),
            tiles: state
                .map
                .tiles()
                .iter()
                .map(|tile| MapTile {
                    terrain: tile.terrain,
                    owner: tile.owner,
                    building: tile.building,
                    is_capital: tile.is_capital,
                })
                .collect(),
            capitals: state.capitals.map(|capital| CapitalRecord {
                x: capital.coord.x,
                y: capital.coord.y,
                owner: capital.owner,
            }),
        }
    }

    /// Start a fresh game on this map.
    ///
    /// Turn counter, resources and capital hit points take their starting
    /// values and no units are placed.
    pub fn into_state(self) -> Result<GameState, SnapshotError> {
        let shape_error = SnapshotError::GridShape {
            tiles: self.tiles.len(),
            width: usize::from(self.width),
        };
        if self.tiles.is_empty() {
            return Err(SnapshotError::EmptyGrid);
        }
        let tiles = self
            .tiles
            .iter()
            .map(|tile| Tile {
                terrain: tile.terrain,
                building: tile.building,
                owner: tile.owner,
                unit: None,
                is_capital: tile.is_capital,
            })
            .collect();
        let map = Map::from_tiles(self.width, self.height, tiles).ok_or(shape_error)?;
        verify(GameState::new(map, capitals_from_records(&self.capitals)))
    }

    /// Serialize to indented JSON.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse from JSON without validating; see [`MapFile::into_state`].
    pub fn from_json(text: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(text)?)
    }
}
