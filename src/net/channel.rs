//! Replication channel contract and an in-process implementation.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use tokio::sync::broadcast;

use crate::game::FactionId;

/// Buffered snapshots per subscriber before it starts lagging.
const SUBSCRIBER_CAPACITY: usize = 64;

/// Participant name per faction seat, `None` if the seat is free.
pub type Seats = [Option<String>; 2];

/// Transport failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChannelError {
    /// The transport could not be reached.
    #[error("replication channel unavailable: {0}")]
    Unavailable(String),
    /// Internal state of the channel is unusable.
    #[error("replication channel state is poisoned")]
    Poisoned,
}

/// What the engine needs from a transport.
///
/// Snapshots travel as opaque JSON text; the channel never parses them.
pub trait ReplicationChannel: Send + Sync {
    /// Store `snapshot` as the room's latest and push it to subscribers.
    fn publish(&self, room: &str, snapshot: &str) -> Result<(), ChannelError>;

    /// Receive every snapshot published to the room from now on.
    fn subscribe(&self, room: &str) -> Result<broadcast::Receiver<String>, ChannelError>;

    /// Latest snapshot of the room, `None` if nothing was ever published.
    fn read_once(&self, room: &str) -> Result<Option<String>, ChannelError>;

    /// Bind `participant` to `seat` if it is free. Returns `false` if the
    /// seat is held, whoever holds it.
    fn claim_seat(
        &self,
        room: &str,
        seat: FactionId,
        participant: &str,
    ) -> Result<bool, ChannelError>;

    /// Free `seat`.
    fn release_seat(&self, room: &str, seat: FactionId) -> Result<(), ChannelError>;

    /// Current seat assignments.
    fn seats(&self, room: &str) -> Result<Seats, ChannelError>;
}

#[derive(Debug)]
struct Room {
    latest: Option<String>,
    seats: Seats,
    sender: broadcast::Sender<String>,
}

impl Room {
    fn new() -> Self {
        let (sender, _) = broadcast::channel(SUBSCRIBER_CAPACITY);
        Self {
            latest: None,
            seats: [None, None],
            sender,
        }
    }
}

/// In-process channel. Every clone of an `Arc<MemoryChannel>` sees the same
/// rooms, which makes it a stand-in for a real backend in tests and local
/// duels.
#[derive(Debug, Default)]
pub struct MemoryChannel {
    rooms: Mutex<HashMap<String, Room>>,
    offline: AtomicBool,
}

impl MemoryChannel {
    /// Create an empty channel.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate losing the connection: while offline every call fails.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn with_room<T>(
        &self,
        room: &str,
        f: impl FnOnce(&mut Room) -> T,
    ) -> Result<T, ChannelError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(ChannelError::Unavailable("offline".to_string()));
        }
        let mut rooms = self.rooms.lock().map_err(|_| ChannelError::Poisoned)?;
        let entry = rooms.entry(room.to_string()).or_insert_with(Room::new);
        Ok(f(entry))
    }
}

impl ReplicationChannel for MemoryChannel {
    fn publish(&self, room: &str, snapshot: &str) -> Result<(), ChannelError> {
        self.with_room(room, |entry| {
            entry.latest = Some(snapshot.to_string());
            // No subscribers is not an error.
            let _ = entry.sender.send(snapshot.to_string());
        })
    }

    fn subscribe(&self, room: &str) -> Result<broadcast::Receiver<String>, ChannelError> {
        self.with_room(room, |entry| entry.sender.subscribe())
    }

    fn read_once(&self, room: &str) -> Result<Option<String>, ChannelError> {
        self.with_room(room, |entry| entry.latest.clone())
    }

    fn claim_seat(
        &self,
        room: &str,
        seat: FactionId,
        participant: &str,
    ) -> Result<bool, ChannelError> {
        self.with_room(room, |entry| {
            let slot = &mut entry.seats[seat.index()];
            if slot.is_some() {
                return false;
            }
            *slot = Some(participant.to_string());
            true
        })
    }

    fn release_seat(&self, room: &str, seat: FactionId) -> Result<(), ChannelError> {
        self.with_room(room, |entry| entry.seats[seat.index()] = None)
    }

    fn seats(&self, room: &str) -> Result<Seats, ChannelError> {
        self.with_room(room, |entry| entry.seats.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_and_read() {
        let channel = MemoryChannel::new();
        assert_eq!(channel.read_once("a").unwrap(), None);
        channel.publish("a", "{1}").unwrap();
        channel.publish("a", "{2}").unwrap();
        assert_eq!(channel.read_once("a").unwrap().as_deref(), Some("{2}"));
        assert_eq!(channel.read_once("b").unwrap(), None);
    }

    #[test]
    fn test_subscribers_receive_in_order() {
        let channel = MemoryChannel::new();
        let mut rx = channel.subscribe("a").unwrap();
        channel.publish("a", "one").unwrap();
        channel.publish("a", "two").unwrap();
        assert_eq!(rx.try_recv().unwrap(), "one");
        assert_eq!(rx.try_recv().unwrap(), "two");
    }

    #[test]
    fn test_seats() {
        let channel = MemoryChannel::new();
        assert!(channel.claim_seat("a", FactionId::FIRST, "ana").unwrap());
        assert!(!channel.claim_seat("a", FactionId::FIRST, "bo").unwrap());
        // Held seats are never handed out again, not even to the same name.
        assert!(!channel.claim_seat("a", FactionId::FIRST, "ana").unwrap());
        assert_eq!(
            channel.seats("a").unwrap(),
            [Some("ana".to_string()), None]
        );
        channel.release_seat("a", FactionId::FIRST).unwrap();
        assert!(channel.claim_seat("a", FactionId::FIRST, "bo").unwrap());
    }

    #[test]
    fn test_offline_fails() {
        let channel = MemoryChannel::new();
        channel.set_offline(true);
        assert!(matches!(
            channel.publish("a", "x"),
            Err(ChannelError::Unavailable(_))
        ));
        channel.set_offline(false);
        assert!(channel.publish("a", "x").is_ok());
    }
}
