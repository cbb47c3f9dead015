//! Tournament command implementation.

use std::path::PathBuf;
use std::time::Instant;

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

use super::output::{format_tournament_csv, format_tournament_text, JsonTournamentResult};
use super::{load_game_config, CliError, TournamentFormat};
use tunti::ai::Difficulty;
use tunti::tournament::{run_match, MatchConfig, TournamentStats};
use tunti::Seed;

/// Options of the tournament command.
#[derive(Debug)]
pub(crate) struct TournamentOptions {
    pub(crate) games: u32,
    pub(crate) seed: u32,
    pub(crate) threads: Option<usize>,
    pub(crate) max_turns: u32,
    pub(crate) difficulties: [Difficulty; 2],
    pub(crate) config: Option<PathBuf>,
    pub(crate) format: TournamentFormat,
    pub(crate) progress: bool,
}

/// Execute the tournament command.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded or output fails.
pub(crate) fn execute(options: TournamentOptions) -> Result<(), CliError> {
    let config = MatchConfig {
        game: load_game_config(options.config.as_deref())?,
        max_turns: options.max_turns,
        difficulties: options.difficulties,
    };

    // Set thread pool size if specified
    if let Some(num_threads) = options.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .ok(); // Ignore error if already initialized
    }

    let pb = if options.progress {
        let pb = ProgressBar::new(u64::from(options.games));
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} games ({per_sec})")
                .map_err(|e| CliError::new(format!("invalid progress template: {e}")))?
                .progress_chars("=>-"),
        );
        Some(pb)
    } else {
        None
    };

    let start = Instant::now();

    // Each worker folds into its own stats, merged at the end.
    let stats = (0..options.games)
        .into_par_iter()
        .fold(TournamentStats::default, |mut local, i| {
            let seed = Seed::Number(options.seed.wrapping_add(i));
            match run_match(&seed, &config) {
                Ok((result, _)) => local.add_result(&result),
                Err(err) => {
                    tracing::warn!(%seed, %err, "match failed");
                    local.add_error();
                }
            }
            if let Some(pb) = &pb {
                pb.inc(1);
            }
            local
        })
        .reduce(TournamentStats::default, |mut a, b| {
            a.merge(&b);
            a
        });

    if let Some(pb) = pb {
        pb.finish_with_message("done");
    }

    let duration = start.elapsed();

    match options.format {
        TournamentFormat::Text => {
            println!();
            print!("{}", format_tournament_text(&stats));
            println!();
            println!("Duration: {:.2}s", duration.as_secs_f64());
        }
        TournamentFormat::Json => {
            let json = serde_json::to_string_pretty(&JsonTournamentResult::from_stats(&stats))?;
            println!("{json}");
        }
        TournamentFormat::Csv => print!("{}", format_tournament_csv(&stats)),
    }
    Ok(())
}
