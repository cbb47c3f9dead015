//! Computer players.
//!
//! A policy looks at the state and proposes an ordered list of actions for
//! one faction. It never mutates the live state; the caller applies the plan
//! through the normal action path, so a policy can be swapped without any
//! change to the rules.

mod heuristic;

use serde::{Deserialize, Serialize};

use crate::game::{
    apply_action, end_turn, Action, ActionOutcome, CombatDice, FactionId, GameState, RejectReason,
    TurnReport,
};

pub use heuristic::{advance_step, HeuristicPolicy};

/// Strength of the built-in heuristic policy.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Farms first, infantry only.
    Easy,
    /// Balanced economy and army.
    #[default]
    Normal,
    /// Military first.
    Hard,
}

/// A decision policy for a computer-controlled faction.
pub trait Policy {
    /// Propose the actions `faction` should take this turn, in order.
    ///
    /// Applying the returned actions one after another to `state` must not
    /// produce a rejection.
    fn decide(&mut self, state: &GameState, faction: FactionId) -> Vec<Action>;
}

impl<P: Policy + ?Sized> Policy for Box<P> {
    fn decide(&mut self, state: &GameState, faction: FactionId) -> Vec<Action> {
        (**self).decide(state, faction)
    }
}

/// What a computer turn did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiTurn {
    /// Executed actions and their outcomes, in order.
    pub actions: Vec<(Action, ActionOutcome)>,
    /// Turn advancement, `None` if the game ended during the turn.
    pub turn: Option<TurnReport>,
}

/// Plan and play a full turn for the faction whose turn it is.
///
/// Stops early if an action ends the game. A rejected plan step is logged and
/// skipped.
pub fn play_turn(
    policy: &mut dyn Policy,
    state: &mut GameState,
    dice: &mut dyn CombatDice,
) -> Result<AiTurn, RejectReason> {
    if state.is_game_over() {
        return Err(RejectReason::GameOver);
    }
    let faction = state.current_faction;
    let plan = policy.decide(state, faction);
    tracing::debug!(%faction, planned = plan.len(), "ai turn planned");

    let mut actions = Vec::with_capacity(plan.len());
    for action in plan {
        match apply_action(state, &action, dice) {
            Ok(outcome) => {
                actions.push((action, outcome));
                if state.is_game_over() {
                    return Ok(AiTurn {
                        actions,
                        turn: None,
                    });
                }
            }
            Err(reason) => {
                tracing::warn!(?action, %reason, "ai plan step rejected");
            }
        }
    }

    let turn = end_turn(state)?;
    Ok(AiTurn {
        actions,
        turn: Some(turn),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::game::FixedDice;
    use crate::rng::{Mulberry32, Seed};

    #[test]
    fn test_play_turn_advances() {
        let mut state = GameState::generate(&Seed::from("ai"), &GameConfig::default()).unwrap();
        let mut policy = HeuristicPolicy::new(Difficulty::Normal, Mulberry32::new(1));
        let turn = play_turn(&mut policy, &mut state, &mut FixedDice(1)).unwrap();

        assert_eq!(state.turn_number, 1);
        assert_eq!(state.current_faction, FactionId::SECOND);
        assert!(turn.turn.is_some());
        // A fresh faction can always afford a farm on its starting land.
        assert!(matches!(turn.actions[0].1, ActionOutcome::Built { .. }));
    }

    #[test]
    fn test_play_turn_rejects_finished_game() {
        let mut state = GameState::generate(&Seed::from("ai"), &GameConfig::default()).unwrap();
        state.capital_hit_points[1] = 0;
        let mut policy = HeuristicPolicy::new(Difficulty::Easy, Mulberry32::new(1));
        assert_eq!(
            play_turn(&mut policy, &mut state, &mut FixedDice(0)),
            Err(RejectReason::GameOver)
        );
    }

    #[test]
    fn test_difficulty_serde() {
        assert_eq!(serde_json::to_string(&Difficulty::Hard).unwrap(), "\"hard\"");
        assert_eq!(Difficulty::default(), Difficulty::Normal);
    }
}
