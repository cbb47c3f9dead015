//! A game shared over a [`ReplicationChannel`].

use std::fmt;
use std::sync::{Arc, Weak};
use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::ai::{play_turn, HeuristicPolicy, Policy};
use crate::config::SessionConfig;
use crate::game::{
    Action, ActionOutcome, CombatDice, FactionId, GameState, MapGenError, RandomDice,
    RejectReason, TurnReport,
};
use crate::net::{ChannelError, ReplicationChannel};
use crate::rng::Seed;
use crate::snapshot::{self, SnapshotError};

/// How this participant takes part in the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Not in a room; both seats are played locally.
    Local,
    /// Holds a seat in a room.
    Player(FactionId),
    /// In a room without a seat; can watch but not act.
    Spectator,
}

/// What happened to the snapshot after a local change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishStatus {
    /// Sent to the channel.
    Published,
    /// Held back by the cooldown; a trailing publish will send the newest state.
    Deferred,
    /// The channel refused it. The local change stands.
    Failed(ChannelError),
    /// Not in a room, nothing to publish to.
    Offline,
}

/// Result of offering a remote snapshot to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteUpdate {
    /// Newer than anything seen; it replaced the local state.
    Applied,
    /// Not newer than the last snapshot seen; ignored.
    Stale,
    /// Could not be decoded; the local state was kept.
    Malformed(String),
}

/// A successful local action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Acted {
    /// What the action did.
    pub outcome: ActionOutcome,
    /// Publish result.
    pub publish: PublishStatus,
}

/// A successful local turn end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnEnded {
    /// Production and the next faction.
    pub report: TurnReport,
    /// Publish result.
    pub publish: PublishStatus,
    /// Whether the computer now plays its turn in the background.
    pub ai_scheduled: bool,
}

/// Errors returned by [`Session`].
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The transport failed.
    #[error(transparent)]
    Channel(#[from] ChannelError),
    /// Nothing was ever published to the room.
    #[error("room {0:?} does not exist")]
    RoomNotFound(String),
    /// Seat 0 of the room belongs to someone else.
    #[error("room {0:?} already has a host")]
    RoomOccupied(String),
    /// The room's snapshot is unusable.
    #[error("room snapshot rejected: {0}")]
    Snapshot(#[from] SnapshotError),
    /// The room code did not produce a valid map.
    #[error(transparent)]
    MapGen(#[from] MapGenError),
    /// The rules refused the action.
    #[error("action rejected: {0}")]
    Rejected(#[from] RejectReason),
    /// The computer is still playing its turn.
    #[error("the computer is taking its turn")]
    AiThinking,
    /// It is another faction's turn.
    #[error("it is not your turn")]
    NotYourTurn,
    /// Spectators cannot act.
    #[error("spectators cannot act")]
    Spectator,
}

struct Inner {
    state: GameState,
    room: Option<String>,
    role: Role,
    ai_thinking: bool,
    last_publish: Option<Instant>,
    trailing_scheduled: bool,
    /// Newest `updatedAt` published or applied.
    last_seen: u64,
    policy: Box<dyn Policy + Send>,
    dice: Box<dyn CombatDice + Send>,
    listener: Option<JoinHandle<()>>,
    ai_task: Option<JoinHandle<()>>,
}

/// One participant's view of a shared game.
///
/// Cloning yields another handle to the same session. Local actions and
/// remote snapshots both take the state lock for the whole mutation, so they
/// never interleave.
#[derive(Clone)]
pub struct Session {
    inner: Arc<Mutex<Inner>>,
    channel: Arc<dyn ReplicationChannel>,
    config: Arc<SessionConfig>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Local session on the default map, with the heuristic policy and
    /// entropy-seeded dice.
    pub fn new(
        channel: Arc<dyn ReplicationChannel>,
        config: SessionConfig,
    ) -> Result<Self, SessionError> {
        let state = GameState::generate(&Seed::default(), &config.game)?;
        let policy = HeuristicPolicy::new(config.difficulty, StdRng::from_entropy());
        Ok(Self::with_parts(
            state,
            channel,
            config,
            Box::new(policy),
            Box::new(RandomDice::from_entropy()),
        ))
    }

    /// Local session with explicit state, policy and dice.
    #[must_use]
    pub fn with_parts(
        state: GameState,
        channel: Arc<dyn ReplicationChannel>,
        config: SessionConfig,
        policy: Box<dyn Policy + Send>,
        dice: Box<dyn CombatDice + Send>,
    ) -> Self {
        let inner = Inner {
            state,
            room: None,
            role: Role::Local,
            ai_thinking: false,
            last_publish: None,
            trailing_scheduled: false,
            last_seen: 0,
            policy,
            dice,
            listener: None,
            ai_task: None,
        };
        Self {
            inner: Arc::new(Mutex::new(inner)),
            channel,
            config: Arc::new(config),
        }
    }

    /// Create `room` with a map generated from the room code and take seat 0.
    pub async fn host(&self, room: &str, name: &str) -> Result<(), SessionError> {
        let state = GameState::generate(&Seed::from(room), &self.config.game)?;
        if !self.channel.claim_seat(room, FactionId::FIRST, name)? {
            return Err(SessionError::RoomOccupied(room.to_string()));
        }
        let receiver = self.channel.subscribe(room)?;

        let mut inner = self.inner.lock().await;
        stop_listener(&mut inner);
        inner.state = state;
        inner.room = Some(room.to_string());
        inner.role = Role::Player(FactionId::FIRST);
        inner.last_publish = None;
        self.publish_now(&mut inner)?;
        inner.listener = Some(spawn_listener(&self.inner, receiver));
        tracing::info!(room, name, "room hosted");
        Ok(())
    }

    /// Enter an existing room, adopting its state and the first free seat.
    ///
    /// With both seats taken the participant becomes a spectator. Held seats
    /// are never taken over, whatever name the holder joined with.
    pub async fn join(&self, room: &str, name: &str) -> Result<Role, SessionError> {
        // Subscribe before reading so nothing published in between is lost.
        let receiver = self.channel.subscribe(room)?;
        let text = self
            .channel
            .read_once(room)?
            .ok_or_else(|| SessionError::RoomNotFound(room.to_string()))?;
        let (state, updated_at) = snapshot::decode(&text)?;

        let mut role = Role::Spectator;
        for seat in FactionId::ALL {
            if self.channel.claim_seat(room, seat, name)? {
                role = Role::Player(seat);
                break;
            }
        }

        let mut inner = self.inner.lock().await;
        stop_listener(&mut inner);
        inner.state = state;
        inner.last_seen = updated_at;
        inner.room = Some(room.to_string());
        inner.role = role;
        inner.listener = Some(spawn_listener(&self.inner, receiver));
        tracing::info!(room, name, ?role, "room joined");
        Ok(role)
    }

    /// Leave the room, freeing the seat. The state stays as it was.
    pub async fn leave(&self) -> Result<(), SessionError> {
        let mut inner = self.inner.lock().await;
        stop_listener(&mut inner);
        let role = std::mem::replace(&mut inner.role, Role::Local);
        if let (Some(room), Role::Player(seat)) = (inner.room.take(), role) {
            self.channel.release_seat(&room, seat)?;
            tracing::info!(room, %seat, "seat released");
        }
        Ok(())
    }

    /// Execute an action for this participant.
    pub async fn act(&self, action: Action) -> Result<Acted, SessionError> {
        let mut inner = self.inner.lock().await;
        self.check_turn(&inner)?;
        let Inner { state, dice, .. } = &mut *inner;
        let outcome = state.apply(&action, dice.as_mut())?;
        let publish = self.publish(&mut inner);
        Ok(Acted { outcome, publish })
    }

    /// End the current turn for this participant.
    ///
    /// If the computer plays the next faction its turn starts in the
    /// background after the configured delay.
    pub async fn end_turn(&self) -> Result<TurnEnded, SessionError> {
        let mut inner = self.inner.lock().await;
        self.check_turn(&inner)?;
        let report = inner.state.end_turn()?;
        let publish = self.publish(&mut inner);
        let ai_scheduled = self.schedule_ai(&mut inner);
        Ok(TurnEnded {
            report,
            publish,
            ai_scheduled,
        })
    }

    /// Offer a snapshot received from the channel. Newest wins.
    pub async fn apply_remote(&self, text: &str) -> RemoteUpdate {
        let mut inner = self.inner.lock().await;
        apply_remote_locked(&mut inner, text)
    }

    /// Wait until a scheduled computer turn has finished.
    pub async fn wait_for_ai(&self) {
        let task = self.inner.lock().await.ai_task.take();
        if let Some(task) = task {
            if let Err(err) = task.await {
                tracing::warn!(%err, "ai task failed");
            }
        }
    }

    /// Copy of the current state.
    pub async fn state(&self) -> GameState {
        self.inner.lock().await.state.clone()
    }

    /// This participant's role.
    pub async fn role(&self) -> Role {
        self.inner.lock().await.role
    }

    /// Current room, if any.
    pub async fn room(&self) -> Option<String> {
        self.inner.lock().await.room.clone()
    }

    /// Whether the computer is playing its turn.
    pub async fn is_ai_thinking(&self) -> bool {
        self.inner.lock().await.ai_thinking
    }

    fn check_turn(&self, inner: &Inner) -> Result<(), SessionError> {
        if inner.ai_thinking {
            return Err(SessionError::AiThinking);
        }
        let current = inner.state.current_faction;
        match inner.role {
            Role::Spectator => return Err(SessionError::Spectator),
            Role::Player(seat) if seat != current => return Err(SessionError::NotYourTurn),
            _ => {}
        }
        if self.config.ai_faction == Some(current) {
            return Err(SessionError::NotYourTurn);
        }
        Ok(())
    }

    /// Publish unless the cooldown holds it back.
    fn publish(&self, inner: &mut Inner) -> PublishStatus {
        if inner.room.is_none() {
            return PublishStatus::Offline;
        }
        if let Some(last) = inner.last_publish {
            let elapsed = last.elapsed();
            if elapsed < self.config.publish_interval {
                if !inner.trailing_scheduled {
                    inner.trailing_scheduled = true;
                    self.spawn_trailing(self.config.publish_interval - elapsed);
                }
                return PublishStatus::Deferred;
            }
        }
        match self.publish_now(inner) {
            Ok(()) => PublishStatus::Published,
            Err(err) => PublishStatus::Failed(err),
        }
    }

    /// Publish the current state regardless of the cooldown.
    fn publish_now(&self, inner: &mut Inner) -> Result<(), ChannelError> {
        let Some(room) = inner.room.as_deref() else {
            return Ok(());
        };
        let stamp = wall_clock_millis().max(inner.last_seen.saturating_add(1));
        let text = snapshot::encode(&inner.state, stamp)
            .map_err(|err| ChannelError::Unavailable(err.to_string()))?;
        inner.last_publish = Some(Instant::now());
        if let Err(err) = self.channel.publish(room, &text) {
            tracing::warn!(room, %err, "publish failed");
            return Err(err);
        }
        inner.last_seen = stamp;
        tracing::trace!(room, stamp, "snapshot published");
        Ok(())
    }

    fn spawn_trailing(&self, wait: std::time::Duration) {
        let session = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(wait).await;
            let mut inner = session.inner.lock().await;
            inner.trailing_scheduled = false;
            // Failures are logged by publish_now.
            let _ = session.publish_now(&mut inner);
        });
    }

    /// Start the computer's turn if it now owns the move.
    fn schedule_ai(&self, inner: &mut Inner) -> bool {
        let current = inner.state.current_faction;
        if self.config.ai_faction != Some(current) || inner.state.is_game_over() {
            return false;
        }
        inner.ai_thinking = true;
        let session = self.clone();
        let delay = self.config.ai_delay;
        inner.ai_task = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut guard = session.inner.lock().await;
            let inner = &mut *guard;
            if inner.state.current_faction == current && !inner.state.is_game_over() {
                match play_turn(inner.policy.as_mut(), &mut inner.state, inner.dice.as_mut()) {
                    Ok(turn) => {
                        tracing::debug!(%current, actions = turn.actions.len(), "ai turn played");
                    }
                    Err(reason) => tracing::warn!(%reason, "ai turn refused"),
                }
                // A failed publish was already logged by publish_now.
                let status = session.publish(inner);
                tracing::trace!(?status, "ai turn publish");
            }
            inner.ai_thinking = false;
        }));
        true
    }
}

fn spawn_listener(
    inner: &Arc<Mutex<Inner>>,
    receiver: broadcast::Receiver<String>,
) -> JoinHandle<()> {
    tokio::spawn(listen_loop(Arc::downgrade(inner), receiver))
}

async fn listen_loop(inner: Weak<Mutex<Inner>>, mut receiver: broadcast::Receiver<String>) {
    loop {
        match receiver.recv().await {
            Ok(text) => {
                let Some(inner) = inner.upgrade() else {
                    return;
                };
                let mut guard = inner.lock().await;
                apply_remote_locked(&mut guard, &text);
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "snapshot listener lagged");
            }
            Err(broadcast::error::RecvError::Closed) => return,
        }
    }
}

fn apply_remote_locked(inner: &mut Inner, text: &str) -> RemoteUpdate {
    match snapshot::decode(text) {
        Ok((state, updated_at)) if updated_at > inner.last_seen => {
            inner.state = state;
            inner.last_seen = updated_at;
            tracing::debug!(updated_at, "remote snapshot applied");
            RemoteUpdate::Applied
        }
        Ok(_) => RemoteUpdate::Stale,
        Err(err) => {
            tracing::warn!(%err, "malformed remote snapshot ignored");
            RemoteUpdate::Malformed(err.to_string())
        }
    }
}

fn stop_listener(inner: &mut Inner) {
    if let Some(listener) = inner.listener.take() {
        listener.abort();
    }
}

fn wall_clock_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
        })
}
