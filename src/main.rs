//! Tunti CLI - Command-line interface for running and viewing Tunti games.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod cli;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tunti::ai::Difficulty;
use tunti::config::DEFAULT_SEED;
use tunti::Seed;

/// Tunti - A deterministic two-faction territory-conquest engine
#[derive(Parser, Debug)]
#[command(name = "tunti")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Play one computer-vs-computer match
    Run {
        /// Seed: a number or any text such as a room code
        #[arg(short, long, default_value = DEFAULT_SEED)]
        seed: Seed,

        /// Maximum turns (default: 200)
        #[arg(short, long, default_value = "200")]
        turns: u32,

        /// Strength of faction 0
        #[arg(long, value_enum, default_value_t = Difficulty::Normal)]
        p0: Difficulty,

        /// Strength of faction 1
        #[arg(long, value_enum, default_value_t = Difficulty::Normal)]
        p1: Difficulty,

        /// Map config JSON file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Save recording to file
        #[arg(long)]
        save: Option<PathBuf>,

        /// Store the final state in this save directory
        #[arg(long)]
        store: Option<PathBuf>,

        /// Print every command of the match
        #[arg(short, long)]
        verbose: bool,

        /// Suppress the board and progress lines
        #[arg(short, long)]
        quiet: bool,
    },

    /// Run many matches in parallel and aggregate statistics
    Tournament {
        /// Number of games to run (default: 1000)
        #[arg(short, long, default_value = "1000")]
        games: u32,

        /// Starting seed (increments for each game)
        #[arg(short, long, default_value = "0")]
        seed: u32,

        /// Parallel threads (default: CPU count)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Maximum turns per game (default: 200)
        #[arg(short = 't', long, default_value = "200")]
        max_turns: u32,

        /// Strength of faction 0
        #[arg(long, value_enum, default_value_t = Difficulty::Normal)]
        p0: Difficulty,

        /// Strength of faction 1
        #[arg(long, value_enum, default_value_t = Difficulty::Normal)]
        p1: Difficulty,

        /// Map config JSON file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format: text, json, or csv
        #[arg(short, long, default_value = "text")]
        format: cli::TournamentFormat,

        /// Show progress bar
        #[arg(short, long)]
        progress: bool,
    },

    /// Draw a map or a saved game
    Render {
        /// Seed to generate from
        #[arg(short, long, default_value = DEFAULT_SEED)]
        seed: Seed,

        /// Map config JSON file (with --seed)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Render a snapshot JSON file instead
        #[arg(long, conflicts_with_all = ["map", "store"])]
        snapshot: Option<PathBuf>,

        /// Render a map-only JSON file instead
        #[arg(long, conflicts_with = "store")]
        map: Option<PathBuf>,

        /// Render the game saved in this directory instead
        #[arg(long)]
        store: Option<PathBuf>,

        /// Save key inside --store
        #[arg(long, requires = "store")]
        key: Option<String>,

        /// Terrain glyphs only
        #[arg(long)]
        terrain: bool,

        /// Disable ANSI colors
        #[arg(long)]
        no_color: bool,

        /// Also write the map-only export to this file
        #[arg(long)]
        export_map: Option<PathBuf>,
    },

    /// Check a snapshot or map file
    Validate {
        /// Snapshot or map JSON file
        #[arg(required = true)]
        file: PathBuf,
    },

    /// Replay a recorded match
    Replay {
        /// Recording file (.json)
        #[arg(required = true)]
        recording: PathBuf,

        /// Output format: text or json (final snapshot)
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Stop after this many commands
        #[arg(long)]
        to: Option<usize>,

        /// Print the board after every command
        #[arg(long)]
        step: bool,
    },

    /// Two computer players sharing a game over an in-process channel
    Duel {
        /// Room code, also the map seed
        #[arg(short, long, default_value = DEFAULT_SEED)]
        room: String,

        /// Turns per side
        #[arg(short, long, default_value = "20")]
        turns: u32,

        /// Publish cooldown in milliseconds
        #[arg(long, default_value = "20")]
        interval_ms: u64,

        /// Strength of the host
        #[arg(long, value_enum, default_value_t = Difficulty::Normal)]
        p0: Difficulty,

        /// Strength of the guest
        #[arg(long, value_enum, default_value_t = Difficulty::Normal)]
        p1: Difficulty,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let result = match args.command {
        Commands::Run {
            seed,
            turns,
            p0,
            p1,
            config,
            format,
            save,
            store,
            verbose,
            quiet,
        } => cli::run::execute(cli::run::RunOptions {
            seed,
            turns,
            difficulties: [p0, p1],
            config,
            format,
            save,
            store,
            verbose,
            quiet,
        }),

        Commands::Tournament {
            games,
            seed,
            threads,
            max_turns,
            p0,
            p1,
            config,
            format,
            progress,
        } => cli::tournament::execute(cli::tournament::TournamentOptions {
            games,
            seed,
            threads,
            max_turns,
            difficulties: [p0, p1],
            config,
            format,
            progress,
        }),

        Commands::Render {
            seed,
            config,
            snapshot,
            map,
            store,
            key,
            terrain,
            no_color,
            export_map,
        } => {
            let source = match (snapshot, map, store) {
                (Some(path), _, _) => cli::render::Source::Snapshot(path),
                (_, Some(path), _) => cli::render::Source::MapFile(path),
                (_, _, Some(dir)) => cli::render::Source::Store(dir, key),
                _ => cli::render::Source::Seed(seed),
            };
            cli::render::execute(source, config, terrain, !no_color, export_map)
        }

        Commands::Validate { file } => cli::validate::execute(file),

        Commands::Replay {
            recording,
            format,
            to,
            step,
        } => cli::replay::execute(recording, format, to, step),

        Commands::Duel {
            room,
            turns,
            interval_ms,
            p0,
            p1,
        } => cli::duel::execute(room, turns, interval_ms, [p0, p1]),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
