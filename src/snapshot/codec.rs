//! Conversion between [`GameState`] and [`Snapshot`].

use crate::game::{check_invariants, Capital, Coord, GameState, Map, Tile, Unit};
use crate::snapshot::{
    CapitalHitPoints, CapitalRecord, Snapshot, SnapshotError, TileRecord, UnitRecord,
};

impl Snapshot {
    /// Capture a state, stamped with `updated_at`.
    #[must_use]
    pub fn capture(state: &GameState, updated_at: u64) -> Self {
        let tiles = state
            .map
            .iter()
            .map(|(coord, tile)| TileRecord {
                x: coord.x,
                y: coord.y,
                terrain: tile.terrain,
                building: tile.building,
                owner: tile.owner,
                unit: tile.unit.map(|unit| UnitRecord {
                    kind: unit.kind,
                    owner: unit.owner,
                    hit_points: unit.hit_points,
                }),
                is_capital: tile.is_capital,
            })
            .collect();

        Self {
            turn_number: state.turn_number,
            current_faction_id: state.current_faction,
            resources: state.resources,
            tiles,
            capitals: state.capitals.map(|capital| CapitalRecord {
                x: capital.coord.x,
                y: capital.coord.y,
                owner: capital.owner,
            }),
            faction_capital_hit_points: CapitalHitPoints {
                faction0: state.capital_hit_points[0],
                faction1: state.capital_hit_points[1],
            },
            updated_at,
        }
    }

    /// Rebuild a state, checking the grid shape and every invariant.
    ///
    /// The width is inferred from the largest `x`; each tile must sit at the
    /// row-major position its coordinates imply.
    pub fn into_state(self) -> Result<GameState, SnapshotError> {
        let width = self
            .tiles
            .iter()
            .map(|tile| usize::from(tile.x) + 1)
            .max()
            .ok_or(SnapshotError::EmptyGrid)?;
        let map = grid_from_records(width, &self.tiles, |record| Tile {
            terrain: record.terrain,
            building: record.building,
            owner: record.owner,
            unit: record.unit.map(|unit| Unit {
                kind: unit.kind,
                owner: unit.owner,
                hit_points: unit.hit_points,
            }),
            is_capital: record.is_capital,
        })?;

        let state = GameState {
            turn_number: self.turn_number,
            current_faction: self.current_faction_id,
            resources: self.resources,
            map,
            capitals: capitals_from_records(&self.capitals),
            capital_hit_points: [
                self.faction_capital_hit_points.faction0,
                self.faction_capital_hit_points.faction1,
            ],
            selection: None,
        };
        verify(state)
    }
}

/// Lay `records` out as a row-major grid of the given width.
fn grid_from_records(
    width: usize,
    records: &[TileRecord],
    tile: impl Fn(&TileRecord) -> Tile,
) -> Result<Map, SnapshotError> {
    let shape_error = || SnapshotError::GridShape {
        tiles: records.len(),
        width,
    };
    if records.is_empty() {
        return Err(SnapshotError::EmptyGrid);
    }
    if width == 0 || records.len() % width != 0 {
        return Err(shape_error());
    }
    let w = u16::try_from(width).map_err(|_| shape_error())?;
    let h = u16::try_from(records.len() / width).map_err(|_| shape_error())?;

    let mut tiles = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        // Quotient and remainder are bounded by `w` and `h`, both u16.
        #[allow(clippy::cast_possible_truncation)]
        let (expected_x, expected_y) = ((index % width) as u16, (index / width) as u16);
        if (record.x, record.y) != (expected_x, expected_y) {
            return Err(SnapshotError::TileOrder {
                index,
                x: record.x,
                y: record.y,
                expected_x,
                expected_y,
            });
        }
        tiles.push(tile(record));
    }
    Map::from_tiles(w, h, tiles).ok_or_else(shape_error)
}

pub(super) fn capitals_from_records(records: &[CapitalRecord; 2]) -> [Capital; 2] {
    records.map(|record| Capital {
        coord: Coord::new(record.x, record.y),
        owner: record.owner,
    })
}

pub(super) fn verify(state: GameState) -> Result<GameState, SnapshotError> {
    match check_invariants(&state).into_iter().next() {
        Some(violation) => Err(SnapshotError::Invalid(violation)),
        None => Ok(state),
    }
}

/// Serialize a state to compact JSON.
pub fn encode(state: &GameState, updated_at: u64) -> Result<String, SnapshotError> {
    Ok(serde_json::to_string(&Snapshot::capture(state, updated_at))?)
}

/// Serialize a state to indented JSON, for files meant to be read by people.
pub fn encode_pretty(state: &GameState, updated_at: u64) -> Result<String, SnapshotError> {
    Ok(serde_json::to_string_pretty(&Snapshot::capture(state, updated_at))?)
}

/// Parse and validate a JSON snapshot. Returns the state and its timestamp.
pub fn decode(text: &str) -> Result<(GameState, u64), SnapshotError> {
    let snapshot: Snapshot = serde_json::from_str(text)?;
    let updated_at = snapshot.updated_at;
    Ok((snapshot.into_state()?, updated_at))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::game::{Action, Building, FactionId, FixedDice, Terrain, UnitKind};
    use crate::rng::Seed;

    fn played() -> GameState {
        let mut state = GameState::generate(&Seed::from("codec"), &GameConfig::default()).unwrap();
        let (coord, _) = state
            .map
            .tiles_owned_by(FactionId::FIRST)
            .find(|(_, t)| t.building.is_none())
            .unwrap();
        state
            .apply(
                &Action::Build {
                    tile: coord,
                    building: Building::Barracks,
                },
                &mut FixedDice(0),
            )
            .unwrap();
        state
            .apply(
                &Action::Train {
                    tile: coord,
                    unit: UnitKind::Cavalry,
                },
                &mut FixedDice(0),
            )
            .unwrap();
        state.map.get_mut(coord).unwrap().unit.as_mut().unwrap().hit_points = 2;
        state.capital_hit_points[1] = 4;
        state.end_turn().unwrap();
        state
    }

    #[test]
    fn test_round_trip() {
        let state = played();
        let text = encode(&state, 42).unwrap();
        let (decoded, updated_at) = decode(&text).unwrap();
        assert_eq!(decoded, state);
        assert_eq!(updated_at, 42);
    }

    #[test]
    fn test_field_names() {
        let value: serde_json::Value =
            serde_json::from_str(&encode(&played(), 7).unwrap()).unwrap();
        assert_eq!(value["turnNumber"], 1);
        assert_eq!(value["currentFactionId"], 1);
        assert_eq!(value["factionCapitalHitPoints"]["faction1"], 4);
        assert_eq!(value["updatedAt"], 7);
        assert_eq!(value["capitals"][0]["owner"], 0);
        let tiles = value["tiles"].as_array().unwrap();
        assert_eq!(tiles.len(), 18 * 12);
        assert!(tiles[0]["building"].is_null());
        let unit = tiles.iter().find(|t| !t["unit"].is_null()).unwrap();
        assert_eq!(unit["unit"]["type"], "cavalry");
        assert_eq!(unit["unit"]["hitPoints"], 2);
        assert!(tiles.iter().any(|t| t["isCapital"] == true));
    }

    #[test]
    fn test_rejects_short_grid() {
        let mut snapshot = Snapshot::capture(&played(), 1);
        snapshot.tiles.pop();
        assert!(matches!(
            snapshot.into_state(),
            Err(SnapshotError::GridShape { .. })
        ));
    }

    #[test]
    fn test_rejects_shuffled_tiles() {
        let mut snapshot = Snapshot::capture(&played(), 1);
        snapshot.tiles.swap(0, 1);
        assert!(matches!(
            snapshot.into_state(),
            Err(SnapshotError::TileOrder { index: 0, .. })
        ));
    }

    #[test]
    fn test_rejects_broken_invariant() {
        let mut snapshot = Snapshot::capture(&played(), 1);
        let capital = snapshot.tiles.iter_mut().find(|t| t.is_capital).unwrap();
        capital.terrain = Terrain::Forest;
        assert!(matches!(snapshot.into_state(), Err(SnapshotError::Invalid(_))));
    }

    #[test]
    fn test_rejects_missing_fields() {
        assert!(matches!(decode("{}"), Err(SnapshotError::Json(_))));
        assert!(matches!(decode("not json"), Err(SnapshotError::Json(_))));
        let mut value: serde_json::Value =
            serde_json::from_str(&encode(&played(), 1).unwrap()).unwrap();
        value.as_object_mut().unwrap().remove("capitals");
        assert!(matches!(decode(&value.to_string()), Err(SnapshotError::Json(_))));
    }

    #[test]
    fn test_rejects_bad_faction_id() {
        let mut value: serde_json::Value =
            serde_json::from_str(&encode(&played(), 1).unwrap()).unwrap();
        value["currentFactionId"] = serde_json::json!(2);
        assert!(matches!(decode(&value.to_string()), Err(SnapshotError::Json(_))));
    }
}
