//! Run command implementation.

use std::path::PathBuf;

use super::output::format_match_text;
use super::{load_game_config, CliError, OutputFormat};
use tunti::ai::Difficulty;
use tunti::replay::{describe_command, render_ascii, Replay};
use tunti::storage::{save_game, FileStore};
use tunti::tournament::{run_match, MatchConfig};
use tunti::Seed;

/// Options of the run command.
#[derive(Debug)]
pub(crate) struct RunOptions {
    pub(crate) seed: Seed,
    pub(crate) turns: u32,
    pub(crate) difficulties: [Difficulty; 2],
    pub(crate) config: Option<PathBuf>,
    pub(crate) format: OutputFormat,
    pub(crate) save: Option<PathBuf>,
    pub(crate) store: Option<PathBuf>,
    pub(crate) verbose: bool,
    pub(crate) quiet: bool,
}

/// Execute the run command.
///
/// # Errors
///
/// Returns an error if the match fails to run or an output cannot be written.
pub(crate) fn execute(options: RunOptions) -> Result<(), CliError> {
    let config = MatchConfig {
        game: load_game_config(options.config.as_deref())?,
        max_turns: options.turns,
        difficulties: options.difficulties,
    };

    if !options.quiet && options.format == OutputFormat::Text {
        println!("Running match with seed {}...", options.seed);
        println!();
    }

    let (result, recording) = run_match(&options.seed, &config)?;

    if options.verbose {
        for (index, command) in recording.commands.iter().enumerate() {
            println!("{index:>5}  {}", describe_command(command));
        }
        println!();
    }

    if let Some(path) = &options.save {
        recording.save(path)?;
        if !options.quiet {
            println!("Recording saved to: {}", path.display());
        }
    }

    let needs_final_state = options.store.is_some()
        || (!options.quiet && options.format == OutputFormat::Text);
    if needs_final_state {
        let mut replay = Replay::new(recording)?;
        replay.goto(replay.len())?;
        if let Some(dir) = &options.store {
            save_game(&FileStore::new(dir), None, replay.state(), 0)?;
            if !options.quiet {
                println!("Final state stored in: {}", dir.display());
            }
        }
        if !options.quiet && options.format == OutputFormat::Text {
            println!("{}", render_ascii(replay.state(), true));
        }
    }

    match options.format {
        OutputFormat::Text => print!("{}", format_match_text(&result)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
    }
    Ok(())
}
