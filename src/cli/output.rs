//! Output formatting utilities for CLI.

use std::fmt::Write as _;

use serde::Serialize;
use tunti::game::FactionId;
use tunti::tournament::{MatchResult, TournamentStats};

/// Format a match result as human-readable text.
pub(super) fn format_match_text(result: &MatchResult) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "Match Result (seed: {})", result.seed);
    match result.winner {
        Some(winner) => {
            let _ = writeln!(
                output,
                "  Winner: {} ({winner})",
                winner.profile().display_name
            );
        }
        None => output.push_str("  Result: Draw (turn limit)\n"),
    }
    let _ = writeln!(output, "  Turns played: {}", result.turns_played);
    output.push('\n');

    for faction in FactionId::ALL {
        let stats = &result.stats[faction.index()];
        let _ = writeln!(
            output,
            "  {:<8} capital {}  territory {:<3} units {:<3} buildings {:<3} {}",
            faction.profile().display_name,
            stats.capital_hit_points,
            stats.territory,
            stats.units,
            stats.buildings,
            stats.resources,
        );
    }
    output
}

/// JSON-serializable tournament result.
#[derive(Debug, Serialize)]
pub(super) struct JsonTournamentResult {
    /// Raw counters.
    #[serde(flatten)]
    pub(super) stats: TournamentStats,
    /// Win rate per faction.
    pub(super) win_rates: [f64; 2],
    /// Mean turns per match.
    pub(super) average_turns: f64,
}

impl JsonTournamentResult {
    /// Create from aggregated stats.
    pub(super) fn from_stats(stats: &TournamentStats) -> Self {
        Self {
            stats: *stats,
            win_rates: FactionId::ALL.map(|faction| stats.win_rate(faction)),
            average_turns: stats.average_turns(),
        }
    }
}

/// Format tournament stats as human-readable text.
pub(super) fn format_tournament_text(stats: &TournamentStats) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "Tournament Results ({} games)", stats.games_played);
    output.push_str("═══════════════════════════════════════\n");
    for faction in FactionId::ALL {
        let _ = writeln!(
            output,
            "  {:<8} wins {:>6}  ({:>5.1}%)",
            faction.profile().display_name,
            stats.wins[faction.index()],
            stats.win_rate(faction) * 100.0,
        );
    }
    let _ = writeln!(output, "  Draws    {:>11}", stats.draws);
    let _ = writeln!(output, "  Avg turns {:>10.1}", stats.average_turns());
    if stats.errors > 0 {
        let _ = writeln!(output, "  Errors   {:>11}", stats.errors);
    }
    output
}

/// Format tournament stats as CSV.
pub(super) fn format_tournament_csv(stats: &TournamentStats) -> String {
    let mut output = String::from("faction,name,wins,win_rate\n");
    for faction in FactionId::ALL {
        let _ = writeln!(
            output,
            "{faction},{},{},{:.4}",
            faction.profile().display_name,
            stats.wins[faction.index()],
            stats.win_rate(faction),
        );
    }
    let _ = writeln!(output, ",draw,{},", stats.draws);
    output
}
