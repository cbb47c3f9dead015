//! Crate-level error type.
//!
//! Each concern has its own error enum next to its code. [`Error`] gathers
//! them for callers, such as the CLI, that drive several concerns at once.

use crate::config::ConfigError;
use crate::game::{MapGenError, PaintError, RejectReason};
use crate::net::{ChannelError, SessionError};
use crate::replay::ReplayError;
use crate::snapshot::SnapshotError;
use crate::storage::StoreError;
use crate::tournament::MatchError;

/// Any error the engine can report.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Config file could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Map generation failed.
    #[error(transparent)]
    MapGen(#[from] MapGenError),
    /// An action or turn end was refused.
    #[error("rejected: {0}")]
    Rejected(#[from] RejectReason),
    /// An editor paint was refused.
    #[error(transparent)]
    Paint(#[from] PaintError),
    /// A snapshot or map file could not be decoded.
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
    /// The replication channel failed.
    #[error(transparent)]
    Channel(#[from] ChannelError),
    /// A session operation failed.
    #[error(transparent)]
    Session(#[from] SessionError),
    /// Persistence failed.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// A recording could not be loaded or replayed.
    #[error(transparent)]
    Replay(#[from] ReplayError),
    /// A headless match failed.
    #[error(transparent)]
    Match(#[from] MatchError),
}

/// Result with the crate-level [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Coord;

    #[test]
    fn test_conversions_keep_messages() {
        let err: Error = RejectReason::SameTile.into();
        assert!(err.to_string().starts_with("rejected: "));

        let inner = MapGenError::CapitalsOverlap(Coord::new(1, 1));
        let message = inner.to_string();
        let err: Error = inner.into();
        assert_eq!(err.to_string(), message);
    }
}
