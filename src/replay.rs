//! Game replay and viewing system.
//!
//! Because a seeded match is fully deterministic, a replay needs only the
//! seed, the match config and the ordered command log. To view position N,
//! regenerate the map and re-apply the first N commands with the same dice
//! stream.
//!
//! # Time Travel
//!
//! - **Forward**: apply the next command
//! - **Backward**: re-run from the start to (`position` - 1)
//! - **Jump to N**: re-run from the start to N

mod render;
mod text;

pub use render::{render_ascii, render_terrain};
pub use text::{describe_command, describe_outcome};

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::game::{Action, GameState, MapGenError, RejectReason, SeededDice};
use crate::rng::Seed;
use crate::tournament::{dice_for, MatchConfig};

/// One entry of a command log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Command {
    /// An action by the faction to move.
    Act(Action),
    /// The faction to move ended its turn.
    EndTurn,
}

/// Seed, config and command log: everything needed to rebuild a match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    /// Map and stream seed.
    pub seed: Seed,
    /// Match parameters.
    pub config: MatchConfig,
    /// Commands in the order they were applied.
    pub commands: Vec<Command>,
}

impl Recording {
    /// Save as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<(), ReplayError> {
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text)?;
        Ok(())
    }

    /// Load from JSON.
    pub fn load(path: &Path) -> Result<Self, ReplayError> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// State after the first `index` commands.
    pub fn replay_to(&self, index: usize) -> Result<GameState, ReplayError> {
        let mut replay = Replay::new(self.clone())?;
        replay.goto(index)?;
        Ok(replay.state)
    }
}

/// Error type for replay operations.
#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    /// Reading or writing the recording failed.
    #[error("recording I/O failed: {0}")]
    Io(#[from] io::Error),
    /// The recording is not valid JSON.
    #[error("invalid recording: {0}")]
    Json(#[from] serde_json::Error),
    /// The recorded seed and config do not produce a map.
    #[error(transparent)]
    MapGen(#[from] MapGenError),
    /// A recorded command no longer applies; the log does not match the rules.
    #[error("command {index} rejected: {reason}")]
    Rejected {
        /// Position in the log.
        index: usize,
        /// Why the engine refused it.
        reason: RejectReason,
    },
    /// Asked for a position past the end of the log.
    #[error("position {index} out of bounds (log has {len} commands)")]
    OutOfBounds {
        /// Requested position.
        index: usize,
        /// Commands in the log.
        len: usize,
    },
}

/// A recording being stepped through.
#[derive(Debug, Clone)]
pub struct Replay {
    recording: Recording,
    state: GameState,
    dice: SeededDice,
    position: usize,
}

impl Replay {
    /// Start at position 0, the freshly generated map.
    pub fn new(recording: Recording) -> Result<Self, ReplayError> {
        let state = GameState::generate(&recording.seed, &recording.config.game)?;
        let dice = dice_for(&recording.seed);
        Ok(Self {
            recording,
            state,
            dice,
            position: 0,
        })
    }

    /// The recording being replayed.
    #[must_use]
    pub fn recording(&self) -> &Recording {
        &self.recording
    }

    /// Number of commands applied so far.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of commands in the log.
    #[must_use]
    pub fn len(&self) -> usize {
        self.recording.commands.len()
    }

    /// Whether the log has no commands.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.recording.commands.is_empty()
    }

    /// Whether every command has been applied.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.position >= self.len()
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Apply the next command.
    pub fn step_forward(&mut self) -> Result<(), ReplayError> {
        let index = self.position;
        let command = *self
            .recording
            .commands
            .get(index)
            .ok_or(ReplayError::OutOfBounds {
                index: index + 1,
                len: self.len(),
            })?;
        let applied = match command {
            Command::Act(action) => self.state.apply(&action, &mut self.dice).map(|_| ()),
            Command::EndTurn => self.state.end_turn().map(|_| ()),
        };
        applied.map_err(|reason| ReplayError::Rejected { index, reason })?;
        self.position += 1;
        Ok(())
    }

    /// Go back one command by re-running from the start.
    pub fn step_backward(&mut self) -> Result<(), ReplayError> {
        let target = self.position.saturating_sub(1);
        self.goto(target)
    }

    /// Move to position `index`.
    pub fn goto(&mut self, index: usize) -> Result<(), ReplayError> {
        if index > self.len() {
            return Err(ReplayError::OutOfBounds {
                index,
                len: self.len(),
            });
        }
        if index < self.position {
            self.state = GameState::generate(&self.recording.seed, &self.recording.config.game)?;
            self.dice = dice_for(&self.recording.seed);
            self.position = 0;
        }
        while self.position < index {
            self.step_forward()?;
        }
        Ok(())
    }
}
