//! Deterministic map generation.
//!
//! Three passes over a row-major grid:
//!
//! 1. Scatter: one Mulberry32 sample per cell, classified by
//!    [`TerrainThresholds`](crate::config::TerrainThresholds).
//! 2. River: a sinusoid carved east to west without consuming RNG samples,
//!    so every seed gets the same water barrier.
//! 3. Capitals: forced to owned cities carrying the faction landmark, then a
//!    square of surrounding dry land is granted as starting territory.
//!
//! Identical seed and config always give an identical grid.

// Terrain sampling and the river curve convert between floats and grid units
#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]

use crate::config::{GameConfig, RiverShape, TerrainThresholds};
use crate::game::{Capital, Coord, FactionId, Map, Terrain, Tile};
use crate::rng::{Mulberry32, Seed};

/// Smallest width or height the river carve supports.
pub const MIN_DIMENSION: u16 = 3;

/// Error type for map generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MapGenError {
    /// The grid is too small to carve a river.
    #[error("map {width}x{height} is too small, both sides must be at least {MIN_DIMENSION}")]
    TooSmall {
        /// Requested width.
        width: u16,
        /// Requested height.
        height: u16,
    },
    /// A capital lies outside the grid.
    #[error("capital of faction {faction} at {coord} is outside the map")]
    CapitalOutOfBounds {
        /// Faction whose capital is misplaced.
        faction: FactionId,
        /// Requested position.
        coord: Coord,
    },
    /// Both capitals share a tile.
    #[error("both capitals are placed at {0}")]
    CapitalsOverlap(Coord),
}

/// Classify one sample in `[0, 1)`.
#[must_use]
pub fn classify(sample: f64, thresholds: &TerrainThresholds) -> Terrain {
    if sample < thresholds.mountain {
        Terrain::Mountain
    } else if sample < thresholds.forest {
        Terrain::Forest
    } else if sample < thresholds.water {
        Terrain::Water
    } else {
        Terrain::Plains
    }
}

/// Row of the river at column `x`.
#[must_use]
pub fn river_row(x: u16, height: u16, river: &RiverShape) -> u16 {
    let centre = f64::from(height) / 2.0;
    let raw = (centre + (f64::from(x) / river.period).sin() * river.amplitude).floor();
    let max = f64::from(height.saturating_sub(2).max(1));
    raw.clamp(1.0, max) as u16
}

/// Generate the tile grid and capitals for a new game.
pub fn generate(seed: &Seed, config: &GameConfig) -> Result<(Map, [Capital; 2]), MapGenError> {
    let (width, height) = (config.width, config.height);
    if width < MIN_DIMENSION || height < MIN_DIMENSION {
        return Err(MapGenError::TooSmall { width, height });
    }
    let mut map = Map::new(width, height).ok_or(MapGenError::TooSmall { width, height })?;

    for faction in FactionId::ALL {
        let coord = config.capitals[faction.index()];
        if !map.in_bounds(coord) {
            return Err(MapGenError::CapitalOutOfBounds { faction, coord });
        }
    }
    if config.capitals[0] == config.capitals[1] {
        return Err(MapGenError::CapitalsOverlap(config.capitals[0]));
    }

    let mut rng = Mulberry32::from_seed(seed);
    for tile in map.tiles_mut() {
        *tile = Tile::new(classify(rng.next_f64(), &config.terrain));
    }

    carve_river(&mut map, &config.river);

    let capitals = FactionId::ALL.map(|owner| Capital {
        coord: config.capitals[owner.index()],
        owner,
    });
    for capital in &capitals {
        if let Some(tile) = map.get_mut(capital.coord) {
            tile.terrain = Terrain::City;
            tile.is_capital = true;
            tile.owner = Some(capital.owner);
            tile.building = Some(capital.owner.profile().landmark);
        }
    }
    for capital in &capitals {
        grant_territory(&mut map, capital, config.start_radius);
    }

    tracing::debug!(%seed, width, height, "generated map");
    Ok((map, capitals))
}

fn carve_river(map: &mut Map, river: &RiverShape) {
    let (width, height) = (map.width(), map.height());
    for x in river.margin..width.saturating_sub(river.margin) {
        let coord = Coord::new(x, river_row(x, height, river));
        if let Some(tile) = map.get_mut(coord) {
            tile.terrain = Terrain::Water;
        }
    }
}

/// Claim every dry tile within Chebyshev `radius` of the capital.
///
/// Capital tiles are never reassigned, so overlapping squares cannot steal
/// the other faction's capital.
fn grant_territory(map: &mut Map, capital: &Capital, radius: u16) {
    let r = i32::from(radius);
    for dy in -r..=r {
        for dx in -r..=r {
            let Some(coord) = capital.coord.offset(dx, dy) else {
                continue;
            };
            if let Some(tile) = map.get_mut(coord) {
                if !tile.terrain.is_water() && !tile.is_capital {
                    tile.owner = Some(capital.owner);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Building;

    #[test]
    fn test_deterministic() {
        let config = GameConfig::default();
        let a = generate(&Seed::from("room-7"), &config).unwrap();
        let b = generate(&Seed::from("room-7"), &config).unwrap();
        assert_eq!(a, b);

        let c = generate(&Seed::from("room-8"), &config).unwrap();
        assert_ne!(a.0, c.0);
    }

    #[test]
    fn test_river_is_always_water() {
        let config = GameConfig::default();
        for seed in 0..20u32 {
            let (map, capitals) = generate(&Seed::from(seed), &config).unwrap();
            for x in 2..config.width - 2 {
                let coord = Coord::new(x, river_row(x, config.height, &config.river));
                if capitals.iter().any(|c| c.coord == coord) {
                    continue;
                }
                assert_eq!(map.get(coord).unwrap().terrain, Terrain::Water);
            }
        }
    }

    #[test]
    fn test_river_rows_default_grid() {
        let river = RiverShape::default();
        let rows: Vec<u16> = (2..16).map(|x| river_row(x, 12, &river)).collect();
        assert_eq!(rows, vec![7, 7, 7, 7, 6, 5, 4, 4, 4, 4, 5, 6, 7, 7]);
    }

    #[test]
    fn test_capitals_and_landmarks() {
        let config = GameConfig::default();
        let (map, capitals) = generate(&Seed::default(), &config).unwrap();
        let first = map.get(capitals[0].coord).unwrap();
        assert!(first.is_capital);
        assert_eq!(first.terrain, Terrain::City);
        assert_eq!(first.owner, Some(FactionId::FIRST));
        assert_eq!(first.building, Some(Building::Pagoda));
        let second = map.get(capitals[1].coord).unwrap();
        assert_eq!(second.building, Some(Building::Palace));
        assert_eq!(second.owner, Some(FactionId::SECOND));
    }

    #[test]
    fn test_starting_territory_skips_water() {
        let config = GameConfig::default();
        for seed in 0..20u32 {
            let (map, _) = generate(&Seed::from(seed), &config).unwrap();
            for (coord, tile) in map.iter() {
                if tile.terrain.is_water() {
                    assert_eq!(tile.owner, None, "water at {coord} was claimed");
                }
                if let Some(owner) = tile.owner {
                    let capital = config.capitals[owner.index()];
                    assert!(coord.x.abs_diff(capital.x) <= 2 && coord.y.abs_diff(capital.y) <= 2);
                }
            }
        }
    }

    #[test]
    fn test_rejects_bad_configs() {
        let mut config = GameConfig {
            width: 2,
            ..GameConfig::default()
        };
        assert!(matches!(
            generate(&Seed::default(), &config),
            Err(MapGenError::TooSmall { .. })
        ));

        config.width = 18;
        config.capitals[1] = Coord::new(30, 1);
        assert!(matches!(
            generate(&Seed::default(), &config),
            Err(MapGenError::CapitalOutOfBounds { .. })
        ));

        config.capitals[1] = config.capitals[0];
        assert!(matches!(
            generate(&Seed::default(), &config),
            Err(MapGenError::CapitalsOverlap(_))
        ));
    }

    #[test]
    fn test_classify_thresholds() {
        let t = TerrainThresholds::default();
        assert_eq!(classify(0.0, &t), Terrain::Mountain);
        assert_eq!(classify(0.12, &t), Terrain::Forest);
        assert_eq!(classify(0.299, &t), Terrain::Forest);
        assert_eq!(classify(0.30, &t), Terrain::Water);
        assert_eq!(classify(0.36, &t), Terrain::Plains);
    }
}
