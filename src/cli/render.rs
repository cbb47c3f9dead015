//! Render command implementation.

use std::fs;
use std::path::PathBuf;

use super::{load_game_config, CliError};
use tunti::replay::{render_ascii, render_terrain};
use tunti::snapshot::{self, MapFile};
use tunti::storage::{load_game, FileStore};
use tunti::{GameState, Seed};

/// Where the state to draw comes from.
#[derive(Debug)]
pub(crate) enum Source {
    /// Generate from a seed.
    Seed(Seed),
    /// A snapshot JSON file.
    Snapshot(PathBuf),
    /// A map-only JSON file.
    MapFile(PathBuf),
    /// The default save slot in a store directory, or a named key.
    Store(PathBuf, Option<String>),
}

/// Execute the render command.
///
/// # Errors
///
/// Returns an error if the state cannot be produced.
pub(crate) fn execute(
    source: Source,
    config: Option<PathBuf>,
    terrain_only: bool,
    color: bool,
    export_map: Option<PathBuf>,
) -> Result<(), CliError> {
    let state = load_state(source, config)?;
    if let Some(path) = export_map {
        fs::write(&path, MapFile::from_state(&state).to_json()?)?;
        eprintln!("Map exported to: {}", path.display());
    }
    if terrain_only {
        print!("{}", render_terrain(&state.map));
    } else {
        print!("{}", render_ascii(&state, color));
    }
    Ok(())
}

fn load_state(source: Source, config: Option<PathBuf>) -> Result<GameState, CliError> {
    match source {
        Source::Seed(seed) => {
            let config = load_game_config(config.as_deref())?;
            Ok(GameState::generate(&seed, &config)?)
        }
        Source::Snapshot(path) => {
            let text = fs::read_to_string(&path)?;
            Ok(snapshot::decode(&text)?.0)
        }
        Source::MapFile(path) => {
            let text = fs::read_to_string(&path)?;
            Ok(MapFile::from_json(&text)?.into_state()?)
        }
        Source::Store(dir, key) => load_game(&FileStore::new(&dir), key.as_deref())?
            .map(|(state, _)| state)
            .ok_or_else(|| CliError::new(format!("no saved game in {}", dir.display()))),
    }
}
