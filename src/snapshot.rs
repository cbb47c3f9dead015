//! Snapshot codec: the wire and save format of a game.
//!
//! A snapshot is a complete, self-contained copy of a [`GameState`]. Decoding
//! never partially applies anything: the whole payload is parsed, the grid
//! shape is checked and every game invariant is verified before a state is
//! handed back.
//!
//! ```text
//! {
//!   "turnNumber": 3,
//!   "currentFactionId": 1,
//!   "resources": [{"rice":..,"timber":..,"gold":..,"spices":..}, {..}],
//!   "tiles": [{"x":0,"y":0,"terrain":"plains","building":null,"owner":null,
//!              "unit":null,"isCapital":false}, ..],
//!   "capitals": [{"x":4,"y":8,"owner":0}, {"x":12,"y":6,"owner":1}],
//!   "factionCapitalHitPoints": {"faction0":5,"faction1":5},
//!   "updatedAt": 1700000000000
//! }
//! ```

mod codec;
mod map_file;

use serde::{Deserialize, Serialize};

use crate::game::{Building, FactionId, InvariantViolation, Resources, Terrain, UnitKind};

pub use codec::{decode, encode, encode_pretty};
pub use map_file::{MapFile, MapTile};

/// Serialized game state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Completed turn count.
    pub turn_number: u32,
    /// Faction whose turn it is.
    pub current_faction_id: FactionId,
    /// Stockpiles indexed by faction.
    pub resources: [Resources; 2],
    /// Full grid, row-major.
    pub tiles: Vec<TileRecord>,
    /// Capitals indexed by faction.
    pub capitals: [CapitalRecord; 2],
    /// Remaining capital hit points.
    pub faction_capital_hit_points: CapitalHitPoints,
    /// Publisher timestamp; newer snapshots win.
    pub updated_at: u64,
}

/// One serialized tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileRecord {
    /// Column.
    pub x: u16,
    /// Row.
    pub y: u16,
    /// Terrain.
    pub terrain: Terrain,
    /// Building, if any.
    pub building: Option<Building>,
    /// Owner, if any.
    pub owner: Option<FactionId>,
    /// Unit, if any.
    pub unit: Option<UnitRecord>,
    /// Capital flag.
    pub is_capital: bool,
}

/// One serialized unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitRecord {
    /// Unit type.
    #[serde(rename = "type")]
    pub kind: UnitKind,
    /// Owner.
    pub owner: FactionId,
    /// Remaining hit points.
    pub hit_points: i32,
}

/// One serialized capital.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapitalRecord {
    /// Column.
    pub x: u16,
    /// Row.
    pub y: u16,
    /// Owning faction.
    pub owner: FactionId,
}

/// Capital hit points keyed by faction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapitalHitPoints {
    /// Faction 0.
    pub faction0: u32,
    /// Faction 1.
    pub faction1: u32,
}

/// Why a snapshot or map file was refused.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// Not valid JSON, or a required field is missing or mistyped.
    #[error("malformed snapshot: {0}")]
    Json(#[from] serde_json::Error),
    /// The tile list is empty.
    #[error("snapshot has no tiles")]
    EmptyGrid,
    /// The tile count does not form a rectangle of the inferred width.
    #[error("{tiles} tiles do not form a grid of width {width}")]
    GridShape {
        /// Number of tiles.
        tiles: usize,
        /// Inferred or declared width.
        width: usize,
    },
    /// A tile is not where row-major order puts it.
    #[error("tile {index} is at ({x}, {y}), expected ({expected_x}, {expected_y})")]
    TileOrder {
        /// Position in the list.
        index: usize,
        /// Recorded column.
        x: u16,
        /// Recorded row.
        y: u16,
        /// Column implied by the index.
        expected_x: u16,
        /// Row implied by the index.
        expected_y: u16,
    },
    /// The decoded state breaks a game invariant.
    #[error("snapshot rejected: {0}")]
    Invalid(#[from] InvariantViolation),
}
