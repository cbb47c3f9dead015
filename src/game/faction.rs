//! Faction identity and capitals.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::game::rules::Building;
use crate::game::Coord;

/// Identifier of one of the two factions.
///
/// Only ids `0` and `1` exist; the constructor and deserializer reject
/// anything else, so an index derived from a `FactionId` is always valid for
/// per-faction arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct FactionId(u8);

impl FactionId {
    /// Faction 0, which moves first.
    pub const FIRST: Self = Self(0);
    /// Faction 1.
    pub const SECOND: Self = Self(1);
    /// Both factions in turn order.
    pub const ALL: [Self; 2] = [Self::FIRST, Self::SECOND];

    /// Create a faction id, `None` if `id` is not 0 or 1.
    #[must_use]
    pub const fn new(id: u8) -> Option<Self> {
        match id {
            0 | 1 => Some(Self(id)),
            _ => None,
        }
    }

    /// Raw id.
    #[must_use]
    pub const fn id(self) -> u8 {
        self.0
    }

    /// Index into per-faction arrays.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The other faction.
    #[must_use]
    pub const fn opponent(self) -> Self {
        Self(1 - self.0)
    }

    /// Fixed identity of this faction.
    #[must_use]
    pub fn profile(self) -> &'static FactionProfile {
        &FACTIONS[self.index()]
    }
}

impl TryFrom<u8> for FactionId {
    type Error = InvalidFactionId;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(InvalidFactionId(value))
    }
}

impl From<FactionId> for u8 {
    fn from(value: FactionId) -> Self {
        value.0
    }
}

impl fmt::Display for FactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A faction id outside `{0, 1}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid faction id {0}, expected 0 or 1")]
pub struct InvalidFactionId(pub u8);

/// Process-wide constant identity of a faction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FactionProfile {
    /// Human readable name.
    pub display_name: &'static str,
    /// Landmark building placed on the capital at generation.
    pub landmark: Building,
}

static FACTIONS: [FactionProfile; 2] = [
    FactionProfile {
        display_name: "Myanmar",
        landmark: Building::Pagoda,
    },
    FactionProfile {
        display_name: "Thailand",
        landmark: Building::Palace,
    },
];

/// A faction's designated capital tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Capital {
    /// Position of the capital.
    pub coord: Coord,
    /// Faction the capital belongs to.
    pub owner: FactionId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_faction_ids() {
        assert_eq!(FactionId::new(0), Some(FactionId::FIRST));
        assert_eq!(FactionId::new(1), Some(FactionId::SECOND));
        assert_eq!(FactionId::new(2), None);
        assert_eq!(FactionId::FIRST.opponent(), FactionId::SECOND);
        assert_eq!(FactionId::SECOND.opponent(), FactionId::FIRST);
    }

    #[test]
    fn test_serde_rejects_unknown_faction() {
        assert_eq!(serde_json::to_string(&FactionId::SECOND).unwrap(), "1");
        let parsed: FactionId = serde_json::from_str("0").unwrap();
        assert_eq!(parsed, FactionId::FIRST);
        assert!(serde_json::from_str::<FactionId>("2").is_err());
    }

    #[test]
    fn test_profiles() {
        assert_eq!(FactionId::FIRST.profile().landmark, Building::Pagoda);
        assert_eq!(FactionId::SECOND.profile().landmark, Building::Palace);
        assert_eq!(FactionId::SECOND.profile().display_name, "Thailand");
    }
}
