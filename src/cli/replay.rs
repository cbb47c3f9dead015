//! Replay command implementation.

use std::path::PathBuf;

use super::{CliError, OutputFormat};
use tunti::replay::{describe_command, render_ascii, Recording, Replay};
use tunti::snapshot;

/// Execute the replay command.
///
/// # Errors
///
/// Returns an error if the recording cannot be loaded or replayed.
pub(crate) fn execute(
    recording_path: PathBuf,
    format: OutputFormat,
    to: Option<usize>,
    step: bool,
) -> Result<(), CliError> {
    let recording = Recording::load(&recording_path)?;
    let mut replay = Replay::new(recording)?;
    let target = to.unwrap_or(replay.len());

    if step && format == OutputFormat::Text {
        println!("{}", render_ascii(replay.state(), true));
        while replay.position() < target {
            replay.step_forward()?;
            let position = replay.position();
            if let Some(command) = replay.recording().commands.get(position - 1) {
                println!("[{position}] {}", describe_command(command));
            }
            println!("{}", render_ascii(replay.state(), true));
        }
    } else {
        replay.goto(target)?;
    }

    match format {
        OutputFormat::Text => {
            if !step {
                println!("{}", render_ascii(replay.state(), true));
            }
            println!("Position {}/{}", replay.position(), replay.len());
        }
        OutputFormat::Json => println!("{}", snapshot::encode_pretty(replay.state(), 0)?),
    }
    Ok(())
}
