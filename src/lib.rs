// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! Tunti: a deterministic two-faction territory-conquest engine.
//!
//! This crate provides the rules, map generator, computer players and
//! replication plumbing of a small turn-based strategy game:
//! - Seeded, bit-exact map generation (Mulberry32 + FNV-1a)
//! - Validated, all-or-nothing actions over an owned `GameState`
//! - A swappable decision policy for computer factions
//! - Whole-snapshot last-write-wins replication between peers
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   CLI / Session / Match runner      │
//! ├─────────────────────────────────────┤
//! │   AI policy     │  Snapshot codec   │
//! ├─────────────────────────────────────┤
//! │         Game rules (game::*)        │
//! ├─────────────────────────────────────┤
//! │         Seeded RNG (rng)            │
//! └─────────────────────────────────────┘
//! ```

pub mod ai;
pub mod config;
pub mod error;
pub mod game;
pub mod net;
pub mod replay;
pub mod rng;
pub mod snapshot;
pub mod storage;
pub mod tournament;

pub use error::{Error, Result};

// Re-export key game types at crate root for convenience
pub use config::{GameConfig, SessionConfig};
pub use game::{Action, ActionOutcome, Coord, FactionId, GameState, Map, RejectReason, Tile};
pub use rng::Seed;
