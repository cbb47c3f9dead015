//! Economy: resource bundles, affordability, payment and production.
//!
//! Spending follows a check-then-apply discipline. [`can_afford`] decides,
//! [`pay`] subtracts without deciding. Callers never call `pay` without a
//! passing `can_afford`, so balances cannot go negative.

use std::fmt;
use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

use crate::game::{FactionId, Map};

/// A bundle of the four resources. Used for stockpiles, costs and yields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resources {
    /// Food.
    pub rice: u32,
    /// Construction material.
    pub timber: u32,
    /// Currency.
    pub gold: u32,
    /// Luxury goods.
    pub spices: u32,
}

impl Resources {
    /// The empty bundle.
    pub const ZERO: Self = Self::new(0, 0, 0, 0);

    /// Create a bundle.
    #[must_use]
    pub const fn new(rice: u32, timber: u32, gold: u32, spices: u32) -> Self {
        Self {
            rice,
            timber,
            gold,
            spices,
        }
    }

    /// Whether every amount is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.rice == 0 && self.timber == 0 && self.gold == 0 && self.spices == 0
    }

    /// Per-resource amount still missing to cover `cost`.
    #[must_use]
    pub const fn shortfall(&self, cost: &Resources) -> Resources {
        Resources {
            rice: cost.rice.saturating_sub(self.rice),
            timber: cost.timber.saturating_sub(self.timber),
            gold: cost.gold.saturating_sub(self.gold),
            spices: cost.spices.saturating_sub(self.spices),
        }
    }
}

impl Add for Resources {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            rice: self.rice.saturating_add(rhs.rice),
            timber: self.timber.saturating_add(rhs.timber),
            gold: self.gold.saturating_add(rhs.gold),
            spices: self.spices.saturating_add(rhs.spices),
        }
    }
}

impl AddAssign for Resources {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl fmt::Display for Resources {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rice {} | timber {} | gold {} | spices {}",
            self.rice, self.timber, self.gold, self.spices
        )
    }
}

/// True iff every amount in `cost` is covered by `resources`.
#[must_use]
pub const fn can_afford(resources: &Resources, cost: &Resources) -> bool {
    resources.rice >= cost.rice
        && resources.timber >= cost.timber
        && resources.gold >= cost.gold
        && resources.spices >= cost.spices
}

/// Subtract `cost` from `resources`.
///
/// Never rejects; the caller must have checked [`can_afford`] first.
pub fn pay(resources: &mut Resources, cost: &Resources) {
    debug_assert!(can_afford(resources, cost), "pay called without can_afford");
    resources.rice = resources.rice.saturating_sub(cost.rice);
    resources.timber = resources.timber.saturating_sub(cost.timber);
    resources.gold = resources.gold.saturating_sub(cost.gold);
    resources.spices = resources.spices.saturating_sub(cost.spices);
}

/// Total yield of every building owned by `faction`.
#[must_use]
pub fn production_of(map: &Map, faction: FactionId) -> Resources {
    map.tiles_owned_by(faction)
        .filter_map(|(_, tile)| tile.building)
        .map(|building| building.production())
        .fold(Resources::ZERO, Add::add)
}

/// Credit `faction` with the yield of every building it owns.
///
/// Returns the amount credited.
pub fn apply_production(resources: &mut Resources, map: &Map, faction: FactionId) -> Resources {
    let produced = production_of(map, faction);
    *resources += produced;
    produced
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Building, Coord, Terrain, Tile};

    #[test]
    fn test_can_afford_exact() {
        let wallet = Resources::new(10, 20, 10, 0);
        assert!(can_afford(&wallet, &Resources::new(0, 20, 10, 0)));
        assert!(!can_afford(&wallet, &Resources::new(0, 21, 10, 0)));
        assert!(can_afford(&wallet, &Resources::ZERO));
    }

    #[test]
    fn test_pay_subtracts_every_key() {
        let mut wallet = Resources::new(100, 100, 100, 0);
        pay(&mut wallet, &Resources::new(20, 30, 0, 0));
        assert_eq!(wallet, Resources::new(80, 70, 100, 0));
    }

    #[test]
    fn test_shortfall() {
        let wallet = Resources::new(5, 50, 0, 0);
        let short = wallet.shortfall(&Resources::new(0, 50, 50, 0));
        assert_eq!(short, Resources::new(0, 0, 50, 0));
        assert!(wallet.shortfall(&Resources::new(5, 0, 0, 0)).is_zero());
    }

    #[test]
    fn test_production_counts_only_owned_buildings() {
        let mut map = Map::new(4, 4).unwrap();
        let a = FactionId::FIRST;
        let b = FactionId::SECOND;

        let mut farm = Tile::new(Terrain::Plains);
        farm.owner = Some(a);
        farm.building = Some(Building::Farm);
        map.set(Coord::new(0, 0), farm);

        let mut market = Tile::new(Terrain::Plains);
        market.owner = Some(a);
        market.building = Some(Building::Market);
        map.set(Coord::new(1, 0), market);

        let mut enemy_farm = Tile::new(Terrain::Plains);
        enemy_farm.owner = Some(b);
        enemy_farm.building = Some(Building::Farm);
        map.set(Coord::new(2, 0), enemy_farm);

        let mut unowned_lumber = Tile::new(Terrain::Forest);
        unowned_lumber.building = Some(Building::Lumber);
        map.set(Coord::new(3, 0), unowned_lumber);

        let mut wallet = Resources::new(100, 100, 100, 0);
        let produced = apply_production(&mut wallet, &map, a);

        assert_eq!(produced, Resources::new(8, 0, 6, 2));
        assert_eq!(wallet, Resources::new(108, 100, 106, 2));
    }

    #[test]
    fn test_add_saturates() {
        let total = Resources::new(u32::MAX, 1, 0, 0) + Resources::new(5, 1, 0, 0);
        assert_eq!(total, Resources::new(u32::MAX, 2, 0, 0));
    }
}
