//! Map, tile and unit types.

use serde::{Deserialize, Serialize};

use crate::game::rules::{self, Building, Terrain, UnitKind, UnitStats};
use crate::game::FactionId;

/// A coordinate on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    /// X coordinate (column).
    pub x: u16,
    /// Y coordinate (row).
    pub y: u16,
}

impl Coord {
    /// Create a new coordinate.
    #[must_use]
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    /// Manhattan distance to another coordinate.
    #[must_use]
    pub fn manhattan(self, other: Coord) -> u32 {
        u32::from(self.x.abs_diff(other.x)) + u32::from(self.y.abs_diff(other.y))
    }

    /// Offset by a signed delta, `None` if the result would be negative.
    #[must_use]
    pub fn offset(self, dx: i32, dy: i32) -> Option<Coord> {
        let x = u16::try_from(i32::from(self.x) + dx).ok()?;
        let y = u16::try_from(i32::from(self.y) + dy).ok()?;
        Some(Coord::new(x, y))
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A military unit standing on a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Unit {
    /// Unit type.
    pub kind: UnitKind,
    /// Owning faction.
    pub owner: FactionId,
    /// Remaining hit points; a unit is removed as soon as this reaches zero.
    pub hit_points: i32,
}

impl Unit {
    /// A freshly trained unit at full hit points.
    #[must_use]
    pub const fn new(kind: UnitKind, owner: FactionId) -> Self {
        Self {
            kind,
            owner,
            hit_points: rules::UNIT_STARTING_HIT_POINTS,
        }
    }

    /// Fixed stats of this unit's type.
    #[must_use]
    pub fn stats(&self) -> UnitStats {
        self.kind.stats()
    }

    /// Whether the unit still has hit points.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.hit_points > 0
    }
}

/// A single tile on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile {
    /// Type of terrain.
    pub terrain: Terrain,
    /// Building on this tile, at most one.
    pub building: Option<Building>,
    /// Owner of this tile (None = unclaimed).
    pub owner: Option<FactionId>,
    /// Unit on this tile, at most one.
    pub unit: Option<Unit>,
    /// Whether this tile is a faction capital.
    pub is_capital: bool,
}

impl Tile {
    /// Create an empty, unowned tile with the given terrain.
    #[must_use]
    pub const fn new(terrain: Terrain) -> Self {
        Self {
            terrain,
            building: None,
            owner: None,
            unit: None,
            is_capital: false,
        }
    }

    /// Create a plains tile.
    #[must_use]
    pub const fn plains() -> Self {
        Self::new(Terrain::Plains)
    }

    /// Create a water tile.
    #[must_use]
    pub const fn water() -> Self {
        Self::new(Terrain::Water)
    }
}

/// The game map.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Map {
    /// Width of the map in tiles.
    width: u16,
    /// Height of the map in tiles.
    height: u16,
    /// Tiles stored in row-major order.
    tiles: Vec<Tile>,
}

impl Map {
    /// Create a new map filled with plains tiles.
    ///
    /// Returns `None` if width or height is zero.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Option<Self> {
        Self::filled(width, height, Tile::plains())
    }

    /// Create a new map with every tile set to `tile`.
    #[must_use]
    pub fn filled(width: u16, height: u16, tile: Tile) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        let size = usize::from(width) * usize::from(height);
        Some(Self {
            width,
            height,
            tiles: vec![tile; size],
        })
    }

    /// Build a map from row-major tiles.
    ///
    /// Returns `None` if the dimensions are zero or do not match the tile count.
    #[must_use]
    pub fn from_tiles(width: u16, height: u16, tiles: Vec<Tile>) -> Option<Self> {
        if width == 0 || height == 0 || tiles.len() != usize::from(width) * usize::from(height) {
            return None;
        }
        Some(Self {
            width,
            height,
            tiles,
        })
    }

    /// Get the width of the map.
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Get the height of the map.
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Number of tiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// A map is never empty; provided for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Get a reference to the raw tiles slice in row-major order.
    #[must_use]
    #[inline]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Get a mutable reference to the raw tiles slice.
    #[must_use]
    #[inline]
    pub fn tiles_mut(&mut self) -> &mut [Tile] {
        &mut self.tiles
    }

    /// Check if a coordinate is within the map bounds.
    #[must_use]
    pub const fn in_bounds(&self, coord: Coord) -> bool {
        coord.x < self.width && coord.y < self.height
    }

    /// Linear index of a coordinate, `y * width + x`.
    #[must_use]
    pub fn index_of(&self, coord: Coord) -> Option<usize> {
        if self.in_bounds(coord) {
            Some(usize::from(coord.y) * usize::from(self.width) + usize::from(coord.x))
        } else {
            None
        }
    }

    /// Coordinate of a linear index.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn coord_of(&self, index: usize) -> Option<Coord> {
        if index >= self.tiles.len() {
            return None;
        }
        let width = usize::from(self.width);
        // Both quotient and remainder fit in u16 because the grid does.
        Some(Coord::new((index % width) as u16, (index / width) as u16))
    }

    /// Get a reference to the tile at the given coordinate.
    #[must_use]
    pub fn get(&self, coord: Coord) -> Option<&Tile> {
        self.index_of(coord).map(|idx| &self.tiles[idx])
    }

    /// Get a mutable reference to the tile at the given coordinate.
    #[must_use]
    pub fn get_mut(&mut self, coord: Coord) -> Option<&mut Tile> {
        self.index_of(coord).map(|idx| &mut self.tiles[idx])
    }

    /// Set the tile at the given coordinate.
    ///
    /// Returns `false` if the coordinate is out of bounds.
    pub fn set(&mut self, coord: Coord, tile: Tile) -> bool {
        if let Some(idx) = self.index_of(coord) {
            self.tiles[idx] = tile;
            true
        } else {
            false
        }
    }

    /// Iterate over all coordinates and tiles.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, &Tile)> {
        let width = usize::from(self.width);
        self.tiles.iter().enumerate().map(move |(idx, tile)| {
            #[allow(clippy::cast_possible_truncation)]
            let coord = Coord::new((idx % width) as u16, (idx / width) as u16);
            (coord, tile)
        })
    }

    /// Iterate over all coordinates and mutable tiles.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Coord, &mut Tile)> {
        let width = usize::from(self.width);
        self.tiles.iter_mut().enumerate().map(move |(idx, tile)| {
            #[allow(clippy::cast_possible_truncation)]
            let coord = Coord::new((idx % width) as u16, (idx / width) as u16);
            (coord, tile)
        })
    }

    /// All tiles owned by a faction.
    pub fn tiles_owned_by(&self, faction: FactionId) -> impl Iterator<Item = (Coord, &Tile)> {
        self.iter().filter(move |(_, tile)| tile.owner == Some(faction))
    }

    /// All units belonging to a faction, with their positions.
    pub fn units_of(&self, faction: FactionId) -> impl Iterator<Item = (Coord, &Unit)> {
        self.iter().filter_map(move |(coord, tile)| {
            tile.unit
                .as_ref()
                .filter(|unit| unit.owner == faction)
                .map(|unit| (coord, unit))
        })
    }

    /// Count tiles owned by a faction.
    #[must_use]
    pub fn count_territory(&self, faction: FactionId) -> usize {
        self.tiles_owned_by(faction).count()
    }

    /// Count units belonging to a faction.
    #[must_use]
    pub fn count_units(&self, faction: FactionId) -> usize {
        self.units_of(faction).count()
    }

    /// Count buildings on tiles owned by a faction, landmarks excluded.
    #[must_use]
    pub fn count_buildings(&self, faction: FactionId) -> usize {
        self.tiles_owned_by(faction)
            .filter(|(_, tile)| tile.building.is_some_and(|b| !b.is_landmark()))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_creation() {
        let map = Map::new(10, 8).unwrap();
        assert_eq!(map.width(), 10);
        assert_eq!(map.height(), 8);
        assert_eq!(map.len(), 80);
        assert!(map.tiles().iter().all(|t| t.terrain == Terrain::Plains));
    }

    #[test]
    fn test_map_zero_size() {
        assert!(Map::new(0, 10).is_none());
        assert!(Map::new(10, 0).is_none());
        assert!(Map::from_tiles(2, 2, vec![Tile::plains(); 3]).is_none());
    }

    #[test]
    fn test_index_is_row_major() {
        let map = Map::new(18, 12).unwrap();
        assert_eq!(map.index_of(Coord::new(4, 8)), Some(8 * 18 + 4));
        assert_eq!(map.coord_of(8 * 18 + 4), Some(Coord::new(4, 8)));
        assert_eq!(map.index_of(Coord::new(18, 0)), None);
        assert_eq!(map.coord_of(18 * 12), None);
    }

    #[test]
    fn test_map_get_set() {
        let mut map = Map::new(10, 10).unwrap();
        let coord = Coord::new(5, 5);
        assert!(map.set(coord, Tile::water()));
        assert_eq!(map.get(coord).unwrap().terrain, Terrain::Water);
        assert!(!map.set(Coord::new(10, 10), Tile::water()));
    }

    #[test]
    fn test_manhattan_and_offset() {
        let a = Coord::new(2, 3);
        assert_eq!(a.manhattan(Coord::new(5, 1)), 5);
        assert_eq!(a.offset(-1, 1), Some(Coord::new(1, 4)));
        assert_eq!(a.offset(-3, 0), None);
    }

    #[test]
    fn test_units_of() {
        let mut map = Map::new(3, 3).unwrap();
        let a = FactionId::FIRST;
        map.get_mut(Coord::new(1, 1)).unwrap().unit = Some(Unit::new(UnitKind::Archer, a));
        map.get_mut(Coord::new(2, 2)).unwrap().unit =
            Some(Unit::new(UnitKind::Infantry, FactionId::SECOND));

        let units: Vec<_> = map.units_of(a).collect();
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].0, Coord::new(1, 1));
        assert_eq!(units[0].1.hit_points, 3);
    }
}
