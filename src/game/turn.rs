//! Turn state machine.
//!
//! There are no phases inside a turn. Ending a turn credits production to
//! the faction that just played, bumps the turn counter and hands control to
//! the other faction.

use crate::game::actions::RejectReason;
use crate::game::economy::apply_production;
use crate::game::invariants::assert_invariants;
use crate::game::{FactionId, GameState, Resources};

/// Result of ending a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnReport {
    /// Faction whose turn ended.
    pub ended: FactionId,
    /// Production credited to `ended`.
    pub produced: Resources,
    /// Turn counter after advancing.
    pub turn_number: u32,
    /// Faction now to act.
    pub next: FactionId,
}

/// End the current faction's turn.
///
/// Rejected with [`RejectReason::GameOver`] once a capital has fallen.
pub fn end_turn(state: &mut GameState) -> Result<TurnReport, RejectReason> {
    if state.is_game_over() {
        return Err(RejectReason::GameOver);
    }

    let ended = state.current_faction;
    let produced = apply_production(&mut state.resources[ended.index()], &state.map, ended);
    state.turn_number = state.turn_number.saturating_add(1);
    state.current_faction = ended.opponent();

    tracing::debug!(
        faction = %ended,
        turn = state.turn_number,
        produced = %produced,
        "turn ended"
    );
    assert_invariants(state);

    Ok(TurnReport {
        ended,
        produced,
        turn_number: state.turn_number,
        next: state.current_faction,
    })
}

impl GameState {
    /// End the current faction's turn. See [`end_turn`].
    pub fn end_turn(&mut self) -> Result<TurnReport, RejectReason> {
        end_turn(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::game::{Building, Terrain};
    use crate::rng::Seed;

    #[test]
    fn test_farm_production_example() {
        let mut state = GameState::generate(&Seed::default(), &GameConfig::default()).unwrap();
        let (coord, _) = state
            .map
            .tiles_owned_by(FactionId::FIRST)
            .find(|(_, tile)| tile.building.is_none() && tile.terrain != Terrain::Water)
            .unwrap();
        state.map.get_mut(coord).unwrap().building = Some(Building::Farm);

        let report = state.end_turn().unwrap();

        assert_eq!(state.resources[0], Resources::new(108, 100, 100, 0));
        assert_eq!(state.resources[1], Resources::new(100, 100, 100, 0));
        assert_eq!(state.turn_number, 1);
        assert_eq!(state.current_faction, FactionId::SECOND);
        assert_eq!(report.produced, Resources::new(8, 0, 0, 0));
        assert_eq!(report.next, FactionId::SECOND);
    }

    #[test]
    fn test_turns_alternate() {
        let mut state = GameState::generate(&Seed::default(), &GameConfig::default()).unwrap();
        for expected in 1..=6u32 {
            let before = state.current_faction;
            let report = state.end_turn().unwrap();
            assert_eq!(report.ended, before);
            assert_eq!(state.current_faction, before.opponent());
            assert_eq!(state.turn_number, expected);
        }
    }

    #[test]
    fn test_end_turn_after_victory_rejected() {
        let mut state = GameState::generate(&Seed::default(), &GameConfig::default()).unwrap();
        state.capital_hit_points[0] = 0;
        let before = state.clone();
        assert_eq!(state.end_turn(), Err(RejectReason::GameOver));
        assert_eq!(state, before);
    }
}
