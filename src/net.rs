//! Replication: sharing one game between a host and remote peers.
//!
//! The transport is abstracted as a [`ReplicationChannel`], a key-value
//! store of rooms that can publish a snapshot, push snapshots to
//! subscribers, read the latest one, and track which participant holds each
//! faction seat. [`Session`] layers the game on top: it owns the local
//! authoritative state, rejects out-of-turn actions, publishes after every
//! change with a cooldown, and applies remote snapshots last-write-wins.

mod channel;
mod session;

pub use channel::{ChannelError, MemoryChannel, ReplicationChannel, Seats};
pub use session::{
    Acted, PublishStatus, RemoteUpdate, Role, Session, SessionError, TurnEnded,
};
