#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tunti::game::combat::{resolve, MAX_COMBAT_BONUS};
use tunti::game::{CombatResult, FactionId, FixedDice, Unit, UnitKind};

#[derive(Arbitrary, Debug)]
struct CombatInput {
    attacker_kind: u8,
    defender_kind: u8,
    attacker_hp: u8,
    defender_hp: u8,
    attacker_bonus: i8,
    defender_bonus: i8,
}

struct Script([i32; 2], usize);

impl tunti::game::CombatDice for Script {
    fn bonus(&mut self) -> i32 {
        let bonus = self.0[self.1 % 2].clamp(0, MAX_COMBAT_BONUS);
        self.1 += 1;
        bonus
    }
}

fn unit(kind: u8, owner: FactionId, hp: u8) -> Unit {
    Unit {
        kind: UnitKind::ALL[usize::from(kind) % UnitKind::ALL.len()],
        owner,
        hit_points: i32::from(hp % 3) + 1,
    }
}

fuzz_target!(|input: CombatInput| {
    let attacker = unit(input.attacker_kind, FactionId::FIRST, input.attacker_hp);
    let defender = unit(input.defender_kind, FactionId::SECOND, input.defender_hp);
    let mut dice = Script(
        [i32::from(input.attacker_bonus), i32::from(input.defender_bonus)],
        0,
    );
    let report = resolve(&attacker, &defender, &mut dice);

    let a = attacker.stats();
    let d = defender.stats();
    assert!((a.attack..=a.attack + MAX_COMBAT_BONUS).contains(&report.attacker_roll));
    assert!((d.defense..=d.defense + MAX_COMBAT_BONUS).contains(&report.defender_roll));
    assert!(report.damage_to_defender >= 1);
    assert!(report.damage_to_attacker >= 0);

    let expected = match (report.attacker_remaining() > 0, report.defender_remaining() > 0) {
        (true, false) => CombatResult::Occupied,
        (true, true) => CombatResult::Repelled,
        (false, true) => CombatResult::AttackerLost,
        (false, false) => CombatResult::MutualDestruction,
    };
    assert_eq!(report.result, expected);

    // Fixed dice at the floor never beat scripted dice.
    let floor = resolve(&attacker, &defender, &mut FixedDice(0));
    assert!(floor.damage_to_defender <= report.damage_to_defender);
});
