//! Game and session configuration.
//!
//! Every tunable number of the simulation lives here or in [`crate::game::rules`].
//! Configs are plain serde structs so a map layout can be loaded from JSON.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ai::Difficulty;
use crate::game::{Coord, FactionId};

/// Seed used when no room code or explicit seed is given.
pub const DEFAULT_SEED: &str = "tunti-local";

/// Default grid width.
pub const DEFAULT_WIDTH: u16 = 18;

/// Default grid height.
pub const DEFAULT_HEIGHT: u16 = 12;

/// Storage key used by the save/load helpers.
pub const DEFAULT_SAVE_KEY: &str = "tunti-save";

/// Cumulative terrain thresholds applied to one RNG sample per cell.
///
/// A sample below `mountain` is a mountain, below `forest` a forest, below
/// `water` water, and plains otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerrainThresholds {
    /// Upper bound for mountains.
    pub mountain: f64,
    /// Upper bound for forests.
    pub forest: f64,
    /// Upper bound for water.
    pub water: f64,
}

impl Default for TerrainThresholds {
    fn default() -> Self {
        Self {
            mountain: 0.12,
            forest: 0.30,
            water: 0.36,
        }
    }
}

/// Shape of the carved east-west river.
///
/// For every `x` in `[margin, width - margin)` the cell at
/// `y = clamp(floor(height / 2 + sin(x / period) * amplitude), 1, height - 2)`
/// becomes water.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiverShape {
    /// Columns skipped at each edge.
    pub margin: u16,
    /// Vertical swing in tiles.
    pub amplitude: f64,
    /// Horizontal stretch of the sine wave.
    pub period: f64,
}

impl Default for RiverShape {
    fn default() -> Self {
        Self {
            margin: 2,
            amplitude: 2.0,
            period: 2.0,
        }
    }
}

/// Parameters for map generation and the initial game state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Grid width in tiles.
    pub width: u16,
    /// Grid height in tiles.
    pub height: u16,
    /// Capital coordinate per faction, indexed by faction id.
    pub capitals: [Coord; 2],
    /// Chebyshev radius of the starting territory around each capital.
    pub start_radius: u16,
    /// Terrain classification thresholds.
    pub terrain: TerrainThresholds,
    /// River carve parameters.
    pub river: RiverShape,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            capitals: [Coord::new(4, 8), Coord::new(12, 6)],
            start_radius: 2,
            terrain: TerrainThresholds::default(),
            river: RiverShape::default(),
        }
    }
}

impl GameConfig {
    /// Load a config from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Error loading a config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not valid config JSON.
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Parameters for a replicated session.
#[derive(Debug, Clone, Copy)]
pub struct SessionConfig {
    /// Minimum spacing between two non-forced publishes.
    pub publish_interval: Duration,
    /// Artificial pause before the AI acts, so a UI can show it thinking.
    pub ai_delay: Duration,
    /// Faction played by the computer in this session, if any.
    pub ai_faction: Option<FactionId>,
    /// Strength of the computer player.
    pub difficulty: Difficulty,
    /// Map layout for hosted games.
    pub game: GameConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            publish_interval: Duration::from_millis(150),
            ai_delay: Duration::from_millis(600),
            ai_faction: None,
            difficulty: Difficulty::Normal,
            game: GameConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let config = GameConfig::default();
        assert_eq!((config.width, config.height), (18, 12));
        assert_eq!(config.capitals[0], Coord::new(4, 8));
        assert_eq!(config.capitals[1], Coord::new(12, 6));
        assert_eq!(config.start_radius, 2);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: GameConfig = serde_json::from_str(r#"{"width": 24}"#).unwrap();
        assert_eq!(config.width, 24);
        assert_eq!(config.height, DEFAULT_HEIGHT);
        assert_eq!(config.terrain, TerrainThresholds::default());
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.json");
        std::fs::write(&path, r#"{"height": 16, "start_radius": 1}"#).unwrap();

        let config = GameConfig::from_json_file(&path).unwrap();
        assert_eq!(config.height, 16);
        assert_eq!(config.start_radius, 1);

        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            GameConfig::from_json_file(&path),
            Err(ConfigError::Parse(_))
        ));
    }
}
