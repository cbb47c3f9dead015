//! Map editor: a thin setter over tile fields.
//!
//! Each paint changes one field of one tile and is refused if the result
//! would break a tile invariant, so an edited map is always a valid game.

use crate::game::invariants::assert_invariants;
use crate::game::{Building, Capital, Coord, FactionId, GameState, Terrain, Unit};

/// A single-field change to one tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TilePaint {
    /// Replace the terrain.
    Terrain(Terrain),
    /// Place or clear a building. Landmarks come only with capitals.
    Building(Option<Building>),
    /// Claim for a faction or clear ownership.
    Owner(Option<FactionId>),
    /// Place or clear a unit.
    Unit(Option<Unit>),
    /// Move a faction's capital onto this tile.
    Capital(FactionId),
}

/// Why a paint was refused. The map is unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PaintError {
    /// Index outside the grid.
    #[error("tile index {0} is outside the map")]
    OutOfBounds(usize),
    /// Capital tiles only change by moving the capital.
    #[error("{0} is a capital")]
    CapitalLocked(Coord),
    /// The existing building cannot stand on the new terrain.
    #[error("{building} cannot stand on {terrain:?}")]
    BuildingTerrain {
        /// Building on or painted onto the tile.
        building: Building,
        /// Terrain it would stand on.
        terrain: Terrain,
    },
    /// The unit cannot stand on the terrain.
    #[error("{unit} cannot stand on {terrain:?}")]
    UnitTerrain {
        /// Unit type on or painted onto the tile.
        unit: crate::game::UnitKind,
        /// Terrain it would stand on.
        terrain: Terrain,
    },
    /// Landmarks are placed with capitals, never painted directly.
    #[error("{0} is a capital landmark")]
    Landmark(Building),
    /// A painted unit must be alive.
    #[error("a unit needs positive hit points, got {0}")]
    DeadUnit(i32),
}

impl GameState {
    /// Apply one paint to the tile at `index`.
    pub fn paint(&mut self, index: usize, paint: TilePaint) -> Result<(), PaintError> {
        let coord = self.map.coord_of(index).ok_or(PaintError::OutOfBounds(index))?;
        let tile = *self.map.get(coord).ok_or(PaintError::OutOfBounds(index))?;

        if let TilePaint::Capital(faction) = paint {
            return self.move_capital(coord, faction);
        }
        if tile.is_capital && !matches!(paint, TilePaint::Unit(_)) {
            return Err(PaintError::CapitalLocked(coord));
        }

        let mut painted = tile;
        match paint {
            TilePaint::Terrain(terrain) => {
                if let Some(building) = tile.building.filter(|b| !b.allowed_on(terrain)) {
                    return Err(PaintError::BuildingTerrain { building, terrain });
                }
                if let Some(unit) = tile.unit.filter(|u| !u.stats().domain.can_enter(terrain)) {
                    return Err(PaintError::UnitTerrain {
                        unit: unit.kind,
                        terrain,
                    });
                }
                painted.terrain = terrain;
            }
            TilePaint::Building(building) => {
                if let Some(building) = building {
                    if building.is_landmark() {
                        return Err(PaintError::Landmark(building));
                    }
                    if !building.allowed_on(tile.terrain) {
                        return Err(PaintError::BuildingTerrain {
                            building,
                            terrain: tile.terrain,
                        });
                    }
                }
                painted.building = building;
            }
            TilePaint::Owner(owner) => painted.owner = owner,
            TilePaint::Unit(unit) => {
                if let Some(unit) = unit {
                    if !unit.is_alive() {
                        return Err(PaintError::DeadUnit(unit.hit_points));
                    }
                    if !unit.stats().domain.can_enter(tile.terrain) {
                        return Err(PaintError::UnitTerrain {
                            unit: unit.kind,
                            terrain: tile.terrain,
                        });
                    }
                }
                painted.unit = unit;
            }
            TilePaint::Capital(_) => {}
        }

        self.map.set(coord, painted);
        assert_invariants(self);
        Ok(())
    }

    fn move_capital(&mut self, coord: Coord, faction: FactionId) -> Result<(), PaintError> {
        let other = self.capital_of(faction.opponent());
        if other.coord == coord {
            return Err(PaintError::CapitalLocked(coord));
        }
        if let Some(unit) = self.map.get(coord).and_then(|tile| tile.unit) {
            if !unit.stats().domain.can_enter(Terrain::City) {
                return Err(PaintError::UnitTerrain {
                    unit: unit.kind,
                    terrain: Terrain::City,
                });
            }
        }

        let old = self.capital_of(faction).coord;
        if let Some(tile) = self.map.get_mut(old) {
            tile.is_capital = false;
            tile.building = None;
        }
        if let Some(tile) = self.map.get_mut(coord) {
            tile.terrain = Terrain::City;
            tile.is_capital = true;
            tile.owner = Some(faction);
            tile.building = Some(faction.profile().landmark);
        }
        self.capitals[faction.index()] = Capital {
            coord,
            owner: faction,
        };
        assert_invariants(self);
        Ok(())
    }
}
