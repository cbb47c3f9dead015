//! One-line descriptions of commands and their outcomes, for logs.

use crate::game::{Action, ActionOutcome, CombatResult};
use crate::replay::Command;

/// Describe a logged command.
#[must_use]
pub fn describe_command(command: &Command) -> String {
    match command {
        Command::Act(Action::Build { tile, building }) => format!("build {building} at {tile}"),
        Command::Act(Action::Train { tile, unit }) => format!("train {unit} at {tile}"),
        Command::Act(Action::Move { from, to }) => format!("move {from} -> {to}"),
        Command::EndTurn => "end turn".to_string(),
    }
}

/// Describe what an executed action did.
#[must_use]
pub fn describe_outcome(outcome: &ActionOutcome) -> String {
    match outcome {
        ActionOutcome::Built { tile, building } => format!("built {building} at {tile}"),
        ActionOutcome::Trained { tile, unit } => format!("trained {unit} at {tile}"),
        ActionOutcome::Moved { from, to, claimed } => {
            if *claimed {
                format!("moved {from} -> {to}, claimed")
            } else {
                format!("moved {from} -> {to}")
            }
        }
        ActionOutcome::Combat(report) => {
            let verdict = match report.result {
                CombatResult::Occupied => "defender destroyed, tile taken",
                CombatResult::Repelled => "repelled",
                CombatResult::AttackerLost => "attacker destroyed",
                CombatResult::MutualDestruction => "both destroyed",
            };
            format!(
                "{} attacked {} ({} vs {}): {verdict}",
                report.attacker.kind, report.defender.kind, report.attacker_roll, report.defender_roll
            )
        }
        ActionOutcome::Siege(report) => match report.winner {
            Some(winner) => format!(
                "capital of faction {} fell, faction {winner} wins",
                report.defender
            ),
            None => format!(
                "capital of faction {} struck, {} hit points left",
                report.defender, report.remaining_hit_points
            ),
        },
    }
}
