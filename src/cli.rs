//! CLI command implementations for Tunti.

pub(crate) mod duel;
pub(crate) mod render;
pub(crate) mod replay;
pub(crate) mod run;
pub(crate) mod tournament;
pub(crate) mod validate;

mod output;

use std::path::Path;

use clap::ValueEnum;
use tunti::config::GameConfig;

/// Output format for the `run` and `replay` commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Output format for the `tournament` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum TournamentFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
    /// CSV format.
    Csv,
}

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    /// An engine error.
    #[error(transparent)]
    Engine(#[from] tunti::Error),
    /// Terminal or file I/O failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// JSON output could not be produced.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
    /// Anything else, already phrased for the user.
    #[error("{0}")]
    Message(String),
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }
}

/// Engine errors convert through the crate-level error.
macro_rules! engine_error {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for CliError {
                fn from(e: $ty) -> Self {
                    Self::Engine(e.into())
                }
            }
        )*
    };
}

engine_error!(
    tunti::config::ConfigError,
    tunti::game::MapGenError,
    tunti::game::RejectReason,
    tunti::net::SessionError,
    tunti::replay::ReplayError,
    tunti::snapshot::SnapshotError,
    tunti::storage::StoreError,
    tunti::tournament::MatchError,
);

/// Load the game config from `path`, or the defaults.
pub(crate) fn load_game_config(path: Option<&Path>) -> Result<GameConfig, CliError> {
    match path {
        Some(path) => Ok(GameConfig::from_json_file(path)?),
        None => Ok(GameConfig::default()),
    }
}
