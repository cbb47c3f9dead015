//! Immutable rule tables: terrain, buildings, units, costs and yields.
//!
//! Everything the engine needs to know about a building or unit type is looked
//! up here, so adding a type means adding one table row.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::game::Resources;

/// Hit points of a freshly trained unit.
pub const UNIT_STARTING_HIT_POINTS: i32 = 3;

/// Hit points of each capital at game start.
pub const CAPITAL_STARTING_HIT_POINTS: u32 = 5;

/// Resources each faction starts with.
pub const STARTING_RESOURCES: Resources = Resources {
    rice: 100,
    timber: 100,
    gold: 100,
    spices: 0,
};

/// Terrain of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Terrain {
    /// Open land.
    Plains,
    /// Wooded land.
    Forest,
    /// High ground, passable in this ruleset.
    Mountain,
    /// Sea or river; land units cannot enter.
    Water,
    /// Capital city; both land and sea units may enter.
    City,
}

impl Terrain {
    /// Whether this terrain is water.
    #[must_use]
    pub const fn is_water(self) -> bool {
        matches!(self, Self::Water)
    }

    /// Single-character glyph used by the text renderer.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Self::Plains => '.',
            Self::Forest => 'f',
            Self::Mountain => '^',
            Self::Water => '~',
            Self::City => '#',
        }
    }
}

/// A structure standing on a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Building {
    /// Produces rice.
    Farm,
    /// Produces timber.
    Lumber,
    /// Produces gold and spices.
    Market,
    /// Trains land units.
    Barracks,
    /// Trains sea units; the only building allowed on water.
    Port,
    /// Capital landmark of faction 0.
    Pagoda,
    /// Capital landmark of faction 1.
    Palace,
}

/// Table row for a building type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildingProfile {
    /// The building this row describes.
    pub building: Building,
    /// Construction cost; `None` for landmarks that cannot be built.
    pub cost: Option<Resources>,
    /// Yield credited to the owner at the end of each of its turns.
    pub production: Resources,
}

static BUILDING_TABLE: [BuildingProfile; 7] = [
    BuildingProfile {
        building: Building::Farm,
        cost: Some(Resources::new(0, 20, 10, 0)),
        production: Resources::new(8, 0, 0, 0),
    },
    BuildingProfile {
        building: Building::Lumber,
        cost: Some(Resources::new(0, 0, 10, 0)),
        production: Resources::new(0, 6, 0, 0),
    },
    BuildingProfile {
        building: Building::Market,
        cost: Some(Resources::new(20, 30, 0, 0)),
        production: Resources::new(0, 0, 6, 2),
    },
    BuildingProfile {
        building: Building::Barracks,
        cost: Some(Resources::new(0, 50, 50, 0)),
        production: Resources::ZERO,
    },
    BuildingProfile {
        building: Building::Port,
        cost: Some(Resources::new(0, 40, 30, 0)),
        production: Resources::ZERO,
    },
    BuildingProfile {
        building: Building::Pagoda,
        cost: None,
        production: Resources::ZERO,
    },
    BuildingProfile {
        building: Building::Palace,
        cost: None,
        production: Resources::ZERO,
    },
];

impl Building {
    /// Buildings a faction may construct, in table order.
    pub const CONSTRUCTIBLE: [Building; 5] = [
        Self::Farm,
        Self::Lumber,
        Self::Market,
        Self::Barracks,
        Self::Port,
    ];

    /// Table row for this building.
    #[must_use]
    pub fn profile(self) -> &'static BuildingProfile {
        &BUILDING_TABLE[self as usize]
    }

    /// Construction cost, `None` for landmarks.
    #[must_use]
    pub fn cost(self) -> Option<Resources> {
        self.profile().cost
    }

    /// Per-turn yield.
    #[must_use]
    pub fn production(self) -> Resources {
        self.profile().production
    }

    /// Whether this building may stand on the given terrain.
    ///
    /// Ports need water or a city; everything else needs dry land.
    #[must_use]
    pub const fn allowed_on(self, terrain: Terrain) -> bool {
        match self {
            Self::Port => matches!(terrain, Terrain::Water | Terrain::City),
            _ => !terrain.is_water(),
        }
    }

    /// Whether this is a capital landmark.
    #[must_use]
    pub const fn is_landmark(self) -> bool {
        matches!(self, Self::Pagoda | Self::Palace)
    }

    /// Single-character glyph used by the text renderer.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Self::Farm => 'F',
            Self::Lumber => 'L',
            Self::Market => 'M',
            Self::Barracks => 'B',
            Self::Port => 'P',
            Self::Pagoda | Self::Palace => '@',
        }
    }
}

impl fmt::Display for Building {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Farm => "farm",
            Self::Lumber => "lumber",
            Self::Market => "market",
            Self::Barracks => "barracks",
            Self::Port => "port",
            Self::Pagoda => "pagoda",
            Self::Palace => "palace",
        };
        f.write_str(name)
    }
}

/// Movement class of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Domain {
    /// Never enters water.
    Land,
    /// Enters only water and cities.
    Sea,
}

impl Domain {
    /// Whether a unit of this domain may enter the given terrain.
    #[must_use]
    pub const fn can_enter(self, terrain: Terrain) -> bool {
        match self {
            Self::Land => !terrain.is_water(),
            Self::Sea => matches!(terrain, Terrain::Water | Terrain::City),
        }
    }
}

/// Kind of military unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitKind {
    /// Balanced foot soldier.
    Infantry,
    /// Hard hitting, fragile.
    Archer,
    /// Fast land unit.
    Cavalry,
    /// Sea unit.
    Ship,
}

/// Combat and movement stats of a unit kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitStats {
    /// Base attack value.
    pub attack: i32,
    /// Base defense value.
    pub defense: i32,
    /// Maximum Manhattan distance per move.
    pub move_range: u32,
    /// Terrain compatibility class.
    pub domain: Domain,
}

/// Table row for a unit kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitProfile {
    /// The unit kind this row describes.
    pub kind: UnitKind,
    /// Fixed stats.
    pub stats: UnitStats,
    /// Training cost.
    pub cost: Resources,
    /// Building the training tile must hold.
    pub prerequisite: Building,
}

static UNIT_TABLE: [UnitProfile; 4] = [
    UnitProfile {
        kind: UnitKind::Infantry,
        stats: UnitStats {
            attack: 2,
            defense: 2,
            move_range: 1,
            domain: Domain::Land,
        },
        cost: Resources::new(10, 0, 10, 0),
        prerequisite: Building::Barracks,
    },
    UnitProfile {
        kind: UnitKind::Archer,
        stats: UnitStats {
            attack: 3,
            defense: 1,
            move_range: 1,
            domain: Domain::Land,
        },
        cost: Resources::new(0, 10, 15, 0),
        prerequisite: Building::Barracks,
    },
    UnitProfile {
        kind: UnitKind::Cavalry,
        stats: UnitStats {
            attack: 3,
            defense: 2,
            move_range: 2,
            domain: Domain::Land,
        },
        cost: Resources::new(20, 0, 30, 0),
        prerequisite: Building::Barracks,
    },
    UnitProfile {
        kind: UnitKind::Ship,
        stats: UnitStats {
            attack: 3,
            defense: 2,
            move_range: 2,
            domain: Domain::Sea,
        },
        cost: Resources::new(0, 40, 20, 0),
        prerequisite: Building::Port,
    },
];

impl UnitKind {
    /// All unit kinds in table order.
    pub const ALL: [UnitKind; 4] = [Self::Infantry, Self::Archer, Self::Cavalry, Self::Ship];

    /// Table row for this unit kind.
    #[must_use]
    pub fn profile(self) -> &'static UnitProfile {
        &UNIT_TABLE[self as usize]
    }

    /// Fixed stats.
    #[must_use]
    pub fn stats(self) -> UnitStats {
        self.profile().stats
    }

    /// Training cost.
    #[must_use]
    pub fn cost(self) -> Resources {
        self.profile().cost
    }

    /// Building required on the training tile.
    #[must_use]
    pub fn prerequisite(self) -> Building {
        self.profile().prerequisite
    }

    /// Single-character glyph used by the text renderer.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Self::Infantry => 'i',
            Self::Archer => 'a',
            Self::Cavalry => 'c',
            Self::Ship => 's',
        }
    }
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Infantry => "infantry",
            Self::Archer => "archer",
            Self::Cavalry => "cavalry",
            Self::Ship => "ship",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_are_indexed_by_discriminant() {
        for (i, row) in BUILDING_TABLE.iter().enumerate() {
            assert_eq!(row.building as usize, i);
        }
        for (i, row) in UNIT_TABLE.iter().enumerate() {
            assert_eq!(row.kind as usize, i);
        }
    }

    #[test]
    fn test_build_costs() {
        assert_eq!(Building::Farm.cost(), Some(Resources::new(0, 20, 10, 0)));
        assert_eq!(Building::Lumber.cost(), Some(Resources::new(0, 0, 10, 0)));
        assert_eq!(Building::Market.cost(), Some(Resources::new(20, 30, 0, 0)));
        assert_eq!(Building::Barracks.cost(), Some(Resources::new(0, 50, 50, 0)));
        assert_eq!(Building::Port.cost(), Some(Resources::new(0, 40, 30, 0)));
        assert_eq!(Building::Pagoda.cost(), None);
        assert_eq!(Building::Palace.cost(), None);
    }

    #[test]
    fn test_production_table() {
        assert_eq!(Building::Farm.production(), Resources::new(8, 0, 0, 0));
        assert_eq!(Building::Lumber.production(), Resources::new(0, 6, 0, 0));
        assert_eq!(Building::Market.production(), Resources::new(0, 0, 6, 2));
        assert_eq!(Building::Barracks.production(), Resources::ZERO);
    }

    #[test]
    fn test_unit_table() {
        let infantry = UnitKind::Infantry.stats();
        assert_eq!((infantry.attack, infantry.defense, infantry.move_range), (2, 2, 1));
        let archer = UnitKind::Archer.stats();
        assert_eq!((archer.attack, archer.defense, archer.move_range), (3, 1, 1));
        let cavalry = UnitKind::Cavalry.stats();
        assert_eq!((cavalry.attack, cavalry.defense, cavalry.move_range), (3, 2, 2));
        assert_eq!(UnitKind::Ship.stats().domain, Domain::Sea);
        assert_eq!(UnitKind::Ship.prerequisite(), Building::Port);
        assert_eq!(UnitKind::Cavalry.prerequisite(), Building::Barracks);
    }

    #[test]
    fn test_building_terrain_rules() {
        assert!(Building::Port.allowed_on(Terrain::Water));
        assert!(Building::Port.allowed_on(Terrain::City));
        assert!(!Building::Port.allowed_on(Terrain::Plains));
        assert!(!Building::Farm.allowed_on(Terrain::Water));
        assert!(Building::Farm.allowed_on(Terrain::Mountain));
    }

    #[test]
    fn test_domain_rules() {
        assert!(!Domain::Land.can_enter(Terrain::Water));
        assert!(Domain::Land.can_enter(Terrain::City));
        assert!(Domain::Sea.can_enter(Terrain::Water));
        assert!(Domain::Sea.can_enter(Terrain::City));
        assert!(!Domain::Sea.can_enter(Terrain::Forest));
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&Terrain::Mountain).unwrap(), "\"mountain\"");
        assert_eq!(serde_json::to_string(&Building::Barracks).unwrap(), "\"barracks\"");
        assert_eq!(serde_json::to_string(&UnitKind::Cavalry).unwrap(), "\"cavalry\"");
    }
}
