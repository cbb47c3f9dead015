//! Duel command: two computer players over an in-process replication channel.
//!
//! Each side runs its own [`Session`]; only snapshots cross between them, so
//! the command exercises host/join, turn checks, publishing and
//! last-write-wins adoption end to end.

use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;

use super::CliError;
use tunti::ai::{Difficulty, HeuristicPolicy, Policy};
use tunti::config::SessionConfig;
use tunti::net::{MemoryChannel, Role, Session, SessionError};
use tunti::replay::render_ascii;
use tunti::FactionId;

/// Execute the duel command.
///
/// # Errors
///
/// Returns an error if a session fails or the peers diverge.
pub(crate) fn execute(
    room: String,
    turns: u32,
    interval_ms: u64,
    difficulties: [Difficulty; 2],
) -> Result<(), CliError> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(duel(room, turns, interval_ms, difficulties))
}

async fn duel(
    room: String,
    turns: u32,
    interval_ms: u64,
    difficulties: [Difficulty; 2],
) -> Result<(), CliError> {
    let channel = Arc::new(MemoryChannel::new());
    let config = SessionConfig {
        publish_interval: Duration::from_millis(interval_ms),
        ..SessionConfig::default()
    };
    let settle = config.publish_interval * 2;

    let host = Session::new(channel.clone(), config)?;
    let guest = Session::new(channel.clone(), config)?;
    host.host(&room, "host").await?;
    if guest.join(&room, "guest").await? != Role::Player(FactionId::SECOND) {
        return Err(CliError::new("guest did not get the second seat"));
    }

    let sessions = [host, guest];
    let mut policies =
        difficulties.map(|difficulty| HeuristicPolicy::new(difficulty, StdRng::from_entropy()));

    for _ in 0..turns.saturating_mul(2) {
        let state = sessions[0].state().await;
        if state.is_game_over() {
            break;
        }
        let faction = state.current_faction;
        let session = &sessions[faction.index()];
        let plan = policies[faction.index()].decide(&session.state().await, faction);
        for action in plan {
            match session.act(action).await {
                Ok(_) | Err(SessionError::Rejected(_)) => {}
                Err(err) => return Err(err.into()),
            }
            if session.state().await.is_game_over() {
                break;
            }
        }
        if !session.state().await.is_game_over() {
            session.end_turn().await?;
        }
        tokio::time::sleep(settle).await;
    }

    tokio::time::sleep(settle).await;
    let final_state = sessions[0].state().await;
    if sessions[1].state().await != final_state {
        return Err(CliError::new("host and guest diverged"));
    }

    println!("{}", render_ascii(&final_state, true));
    println!("Peers converged after {} turns.", final_state.turn_number);
    for session in &sessions {
        session.leave().await?;
    }
    Ok(())
}
