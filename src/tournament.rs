//! Headless computer-vs-computer matches.
//!
//! Provides a pure function interface: `(seed, config) -> (MatchResult, Recording)`.
//! Map, combat dice and both policies draw from streams derived from the
//! seed, so the same inputs always play the same game.

use serde::{Deserialize, Serialize};

use crate::ai::{play_turn, Difficulty, HeuristicPolicy};
use crate::config::GameConfig;
use crate::game::{FactionId, FactionStats, GameState, MapGenError, RejectReason, SeededDice};
use crate::replay::{Command, Recording};
use crate::rng::{Mulberry32, Seed};

/// Salt mixed into the seed state for the combat dice stream.
const DICE_SALT: u32 = 0x9E37_79B9;

/// Salt mixed into the seed state for the policy streams.
const POLICY_SALT: u32 = 0x85EB_CA6B;

/// Parameters of a headless match.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Map layout.
    pub game: GameConfig,
    /// Completed turns after which the match is a draw.
    pub max_turns: u32,
    /// Policy strength per faction.
    pub difficulties: [Difficulty; 2],
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            game: GameConfig::default(),
            max_turns: 200,
            difficulties: [Difficulty::Normal; 2],
        }
    }
}

/// Final result of a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    /// The seed the match was played from.
    pub seed: Seed,
    /// Faction that took the enemy capital, `None` on a draw.
    pub winner: Option<FactionId>,
    /// Completed turns.
    pub turns_played: u32,
    /// End-of-match summary per faction.
    pub stats: [FactionStats; 2],
}

/// Error running a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MatchError {
    /// The seed and config do not produce a map.
    #[error(transparent)]
    MapGen(#[from] MapGenError),
    /// The engine refused to advance the turn.
    #[error("match stalled: {0}")]
    Rejected(#[from] RejectReason),
}

/// Combat dice for a seeded match or its replay.
#[must_use]
pub fn dice_for(seed: &Seed) -> SeededDice {
    SeededDice::new(Mulberry32::new(seed.to_state() ^ DICE_SALT))
}

fn policy_for(seed: &Seed, faction: FactionId, difficulty: Difficulty) -> HeuristicPolicy<Mulberry32> {
    let salt = POLICY_SALT.wrapping_mul(u32::from(faction.id()) + 1);
    HeuristicPolicy::new(difficulty, Mulberry32::new(seed.to_state() ^ salt))
}

/// Play one match to the end and record every command.
pub fn run_match(seed: &Seed, config: &MatchConfig) -> Result<(MatchResult, Recording), MatchError> {
    let mut state = GameState::generate(seed, &config.game)?;
    let mut dice = dice_for(seed);
    let mut policies =
        FactionId::ALL.map(|faction| policy_for(seed, faction, config.difficulties[faction.index()]));
    let mut commands = Vec::new();

    while !state.is_game_over() && state.turn_number < config.max_turns {
        let faction = state.current_faction;
        let turn = play_turn(&mut policies[faction.index()], &mut state, &mut dice)?;
        commands.extend(turn.actions.into_iter().map(|(action, _)| Command::Act(action)));
        if turn.turn.is_some() {
            commands.push(Command::EndTurn);
        }
    }

    let result = MatchResult {
        seed: seed.clone(),
        winner: state.winner(),
        turns_played: state.turn_number,
        stats: FactionId::ALL.map(|faction| state.stats(faction)),
    };
    tracing::debug!(
        %seed,
        winner = ?result.winner,
        turns = result.turns_played,
        "match finished"
    );
    let recording = Recording {
        seed: seed.clone(),
        config: *config,
        commands,
    };
    Ok((result, recording))
}

/// Aggregate over many matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentStats {
    /// Matches counted.
    pub games_played: u64,
    /// Wins per faction.
    pub wins: [u64; 2],
    /// Matches that hit the turn limit.
    pub draws: u64,
    /// Sum of completed turns, for the average.
    pub total_turns: u64,
    /// Matches that failed to run.
    pub errors: u64,
}

impl TournamentStats {
    /// Count one match.
    pub fn add_result(&mut self, result: &MatchResult) {
        self.games_played += 1;
        self.total_turns += u64::from(result.turns_played);
        match result.winner {
            Some(winner) => self.wins[winner.index()] += 1,
            None => self.draws += 1,
        }
    }

    /// Count one failed match.
    pub fn add_error(&mut self) {
        self.errors += 1;
    }

    /// Fold another partial aggregate into this one.
    pub fn merge(&mut self, other: &Self) {
        self.games_played += other.games_played;
        self.wins[0] += other.wins[0];
        self.wins[1] += other.wins[1];
        self.draws += other.draws;
        self.total_turns += other.total_turns;
        self.errors += other.errors;
    }

    /// Share of counted matches won by `faction`, in `[0, 1]`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn win_rate(&self, faction: FactionId) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.wins[faction.index()] as f64 / self.games_played as f64
    }

    /// Mean completed turns per counted match.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn average_turns(&self) -> f64 {
        if self.games_played == 0 {
            return 0.0;
        }
        self.total_turns as f64 / self.games_played as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn short_config() -> MatchConfig {
        MatchConfig {
            max_turns: 30,
            ..MatchConfig::default()
        }
    }

    #[test]
    fn test_run_match_is_deterministic() {
        let seed = Seed::from("match");
        let (first, first_log) = run_match(&seed, &short_config()).unwrap();
        let (second, second_log) = run_match(&seed, &short_config()).unwrap();
        assert_eq!(first, second);
        assert_eq!(first_log, second_log);
    }

    #[test]
    fn test_run_match_respects_turn_limit() {
        let (result, recording) = run_match(&Seed::from(3), &short_config()).unwrap();
        assert!(result.turns_played <= 30);
        if result.winner.is_none() {
            assert_eq!(result.turns_played, 30);
        }
        let ends = recording
            .commands
            .iter()
            .filter(|command| matches!(command, Command::EndTurn))
            .count();
        assert_eq!(ends, usize::try_from(result.turns_played).unwrap());
    }

    #[test]
    fn test_zero_turn_limit_is_a_draw() {
        let config = MatchConfig {
            max_turns: 0,
            ..MatchConfig::default()
        };
        let (result, recording) = run_match(&Seed::default(), &config).unwrap();
        assert_eq!(result.winner, None);
        assert_eq!(result.turns_played, 0);
        assert!(recording.commands.is_empty());
        assert_eq!(result.stats[0].capital_hit_points, 5);
    }

    #[test]
    fn test_bad_config_is_an_error() {
        let mut config = short_config();
        config.game.width = 2;
        assert!(matches!(
            run_match(&Seed::default(), &config),
            Err(MatchError::MapGen(_))
        ));
    }

    #[test]
    fn test_stats_merge() {
        let result = |winner, turns| MatchResult {
            seed: Seed::default(),
            winner,
            turns_played: turns,
            stats: [FactionStats::default(); 2],
        };
        let mut left = TournamentStats::default();
        left.add_result(&result(Some(FactionId::FIRST), 10));
        let mut right = TournamentStats::default();
        right.add_result(&result(None, 30));
        right.add_result(&result(Some(FactionId::FIRST), 20));
        right.add_error();

        left.merge(&right);
        assert_eq!(left.games_played, 3);
        assert_eq!(left.wins, [2, 0]);
        assert_eq!(left.draws, 1);
        assert_eq!(left.errors, 1);
        assert!((left.average_turns() - 20.0).abs() < f64::EPSILON);
        assert!((left.win_rate(FactionId::FIRST) - 2.0 / 3.0).abs() < 1e-9);
    }
}
