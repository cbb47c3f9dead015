//! Combat resolution.
//!
//! One flat formula. Each side adds a bonus in `0..=2` to its base value:
//!
//! ```text
//! attacker_roll      = attack(attacker)  + bonus
//! defender_roll      = defense(defender) + bonus
//! damage_to_defender = max(1, attacker_roll - defense(defender))
//! damage_to_attacker = max(0, defender_roll - defense(attacker))
//! ```
//!
//! Both sides take damage simultaneously. The bonus source is pluggable
//! through [`CombatDice`], so interactive play can stay unseeded while
//! headless matches and replays draw from the deterministic stream.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::game::{Coord, Map, Unit};
use crate::rng::Mulberry32;

/// Largest bonus a roll can add.
pub const MAX_COMBAT_BONUS: i32 = 2;

/// Source of combat roll bonuses.
pub trait CombatDice {
    /// Draw one bonus in `0..=MAX_COMBAT_BONUS`.
    fn bonus(&mut self) -> i32;
}

impl<D: CombatDice + ?Sized> CombatDice for &mut D {
    fn bonus(&mut self) -> i32 {
        (**self).bonus()
    }
}

/// Unseeded dice backed by any `rand` generator.
#[derive(Debug, Clone)]
pub struct RandomDice<R = StdRng> {
    rng: R,
}

impl RandomDice<StdRng> {
    /// Dice seeded from operating system entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl<R: Rng> RandomDice<R> {
    /// Dice drawing from the given generator.
    #[must_use]
    pub const fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> CombatDice for RandomDice<R> {
    fn bonus(&mut self) -> i32 {
        self.rng.gen_range(0..=MAX_COMBAT_BONUS)
    }
}

/// Reproducible dice drawing from the Mulberry32 stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeededDice {
    stream: Mulberry32,
}

impl SeededDice {
    /// Dice continuing the given stream.
    #[must_use]
    pub const fn new(stream: Mulberry32) -> Self {
        Self { stream }
    }

    /// Current stream position, for checkpointing.
    #[must_use]
    pub const fn stream(&self) -> Mulberry32 {
        self.stream
    }
}

impl CombatDice for SeededDice {
    fn bonus(&mut self) -> i32 {
        match self.stream.next_below(3) {
            0 => 0,
            1 => 1,
            _ => 2,
        }
    }
}

/// Dice that always return the same bonus, clamped into range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedDice(pub i32);

impl CombatDice for FixedDice {
    fn bonus(&mut self) -> i32 {
        self.0.clamp(0, MAX_COMBAT_BONUS)
    }
}

/// How an attack ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CombatResult {
    /// Defender destroyed, attacker survived and moved onto the tile.
    Occupied,
    /// Both survived; nobody moved.
    Repelled,
    /// Attacker destroyed, defender survived.
    AttackerLost,
    /// Both destroyed; the destination is left empty.
    MutualDestruction,
}

/// Full record of one resolved attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CombatReport {
    /// Attacker before the fight.
    pub attacker: Unit,
    /// Defender before the fight.
    pub defender: Unit,
    /// Attack value plus bonus.
    pub attacker_roll: i32,
    /// Defense value plus bonus.
    pub defender_roll: i32,
    /// Hit points removed from the defender.
    pub damage_to_defender: i32,
    /// Hit points removed from the attacker.
    pub damage_to_attacker: i32,
    /// Outcome classification.
    pub result: CombatResult,
}

impl CombatReport {
    /// Attacker hit points after the fight.
    #[must_use]
    pub const fn attacker_remaining(&self) -> i32 {
        self.attacker.hit_points - self.damage_to_attacker
    }

    /// Defender hit points after the fight.
    #[must_use]
    pub const fn defender_remaining(&self) -> i32 {
        self.defender.hit_points - self.damage_to_defender
    }
}

/// Roll and score a fight without touching the map.
///
/// The attacker bonus is drawn before the defender bonus.
#[must_use]
pub fn resolve(attacker: &Unit, defender: &Unit, dice: &mut dyn CombatDice) -> CombatReport {
    let a = attacker.stats();
    let d = defender.stats();

    let attacker_roll = a.attack + dice.bonus();
    let defender_roll = d.defense + dice.bonus();
    let damage_to_defender = (attacker_roll - d.defense).max(1);
    let damage_to_attacker = (defender_roll - a.defense).max(0);

    let attacker_alive = attacker.hit_points - damage_to_attacker > 0;
    let defender_alive = defender.hit_points - damage_to_defender > 0;
    let result = match (attacker_alive, defender_alive) {
        (true, false) => CombatResult::Occupied,
        (true, true) => CombatResult::Repelled,
        (false, true) => CombatResult::AttackerLost,
        (false, false) => CombatResult::MutualDestruction,
    };

    CombatReport {
        attacker: *attacker,
        defender: *defender,
        attacker_roll,
        defender_roll,
        damage_to_defender,
        damage_to_attacker,
        result,
    }
}

/// Resolve an attack from `from` onto the enemy unit at `to` and apply it.
///
/// Dead units are removed. A surviving attacker that destroyed the defender
/// moves onto `to` and claims it if it was unowned dry land. Returns `None`
/// (map untouched) unless both tiles hold units of different factions.
pub fn process_attack(
    map: &mut Map,
    from: Coord,
    to: Coord,
    dice: &mut dyn CombatDice,
) -> Option<CombatReport> {
    let attacker = map.get(from)?.unit?;
    let defender = map.get(to)?.unit?;
    if attacker.owner == defender.owner {
        return None;
    }

    let report = resolve(&attacker, &defender, dice);

    let survivor_attacker = Unit {
        hit_points: report.attacker_remaining(),
        ..attacker
    };
    let survivor_defender = Unit {
        hit_points: report.defender_remaining(),
        ..defender
    };

    let origin = map.get_mut(from)?;
    origin.unit = match report.result {
        CombatResult::Repelled => Some(survivor_attacker),
        _ => None,
    };

    let target = map.get_mut(to)?;
    target.unit = match report.result {
        CombatResult::Occupied => {
            if target.owner.is_none() && !target.terrain.is_water() {
                target.owner = Some(attacker.owner);
            }
            Some(survivor_attacker)
        }
        CombatResult::Repelled | CombatResult::AttackerLost => Some(survivor_defender),
        CombatResult::MutualDestruction => None,
    };

    Some(report)
}
