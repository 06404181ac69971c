//! Monsters as spell targets.
//!
//! Only the target-side of a monster is modelled here: health, evasion,
//! willpower, resistances and the status timers the casting pipeline
//! inflicts. Monster AI lives outside this crate.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::board::Coord;
use crate::consts::WILL_INVULN;
use crate::rng::GameRng;

/// Stable monster identifier
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct MonsterId(pub u32);

bitflags! {
    /// Elemental and exotic damage resistances
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Resists: u8 {
        const FIRE     = 0x01;
        const COLD     = 0x02;
        const ELEC     = 0x04;
        const POISON   = 0x08;
        const NEGATIVE = 0x10;
    }
}

impl Serialize for Resists {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Resists {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bits = u8::deserialize(deserializer)?;
        Ok(Resists::from_bits_truncate(bits))
    }
}

/// What kind of life (or unlife) a monster is
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display,
)]
#[repr(u8)]
pub enum Holiness {
    #[default]
    Natural = 0,
    Undead = 1,
    Demonic = 2,
    Nonliving = 3,
}

impl Holiness {
    /// Undead and constructs have no blood or mind to drain
    pub const fn can_be_drained(&self) -> bool {
        matches!(self, Holiness::Natural | Holiness::Demonic)
    }
}

/// Hostility toward the player
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display,
)]
#[repr(u8)]
pub enum Attitude {
    #[default]
    Hostile = 0,
    Neutral = 1,
    Friendly = 2,
}

/// Status timers inflicted by spells, ticked once per turn
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct MonsterStatus {
    pub confused: u16,
    pub slowed: u16,
    pub feared: u16,
    pub silenced: u16,
    pub paralysed: u16,
}

impl MonsterStatus {
    pub fn tick(&mut self) {
        self.confused = self.confused.saturating_sub(1);
        self.slowed = self.slowed.saturating_sub(1);
        self.feared = self.feared.saturating_sub(1);
        self.silenced = self.silenced.saturating_sub(1);
        self.paralysed = self.paralysed.saturating_sub(1);
    }
}

/// A monster on the board
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Monster {
    pub id: MonsterId,
    pub name: String,
    pub pos: Coord,
    pub hp: i32,
    pub hp_max: i32,
    /// Hit dice; scales resistance to dazing, englaciation and the like
    pub hit_dice: i32,
    pub ev: i32,
    /// Resistance to hexes; `WILL_INVULN` means unhexable
    pub willpower: i32,
    pub resists: Resists,
    pub holiness: Holiness,
    pub attitude: Attitude,
    pub status: MonsterStatus,
    /// Set when a stationary monster (plant, statue) cannot be moved
    pub stationary: bool,
}

impl Monster {
    /// Construct a generic hostile monster for simulation purposes
    pub fn new(id: MonsterId, name: impl Into<String>, pos: Coord, hp: i32) -> Self {
        Self {
            id,
            name: name.into(),
            pos,
            hp,
            hp_max: hp,
            hit_dice: 3,
            ev: 8,
            willpower: 20,
            resists: Resists::empty(),
            holiness: Holiness::Natural,
            attitude: Attitude::Hostile,
            status: MonsterStatus::default(),
            stationary: false,
        }
    }

    pub fn alive(&self) -> bool {
        self.hp > 0
    }

    pub fn is_hostile(&self) -> bool {
        self.attitude == Attitude::Hostile
    }

    pub fn res_fire(&self) -> bool {
        self.resists.contains(Resists::FIRE)
    }

    pub fn res_cold(&self) -> bool {
        self.resists.contains(Resists::COLD)
    }

    pub fn res_elec(&self) -> bool {
        self.resists.contains(Resists::ELEC)
    }

    pub fn res_poison(&self) -> bool {
        self.resists.contains(Resists::POISON)
    }

    pub fn res_negative(&self) -> bool {
        self.resists.contains(Resists::NEGATIVE)
    }

    /// Apply damage, clamped at zero hp
    pub fn hurt(&mut self, damage: i32) {
        self.hp = (self.hp - damage.max(0)).max(0);
    }

    /// Willpower check against an enchantment of the given power.
    ///
    /// Returns the margin by which the check succeeded: positive means the
    /// monster shrugged the hex off.
    pub fn check_willpower(&self, power: i32, rng: &mut GameRng) -> i32 {
        if self.willpower >= WILL_INVULN {
            return i32::MAX;
        }
        let attack = rng.random2(power.max(1)) + rng.random2(power.max(1));
        let defence = rng.random2(self.willpower.max(1)) + rng.random2(self.willpower.max(1));
        defence - attack
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goblin() -> Monster {
        Monster::new(MonsterId(1), "goblin", Coord::new(5, 5), 10)
    }

    #[test]
    fn test_hurt_floors_at_zero() {
        let mut m = goblin();
        m.hurt(25);
        assert_eq!(m.hp, 0);
        assert!(!m.alive());
        m.hurt(-5);
        assert_eq!(m.hp, 0);
    }

    #[test]
    fn test_willpower_invuln_always_resists() {
        let mut rng = GameRng::new(7);
        let mut m = goblin();
        m.willpower = WILL_INVULN;
        for _ in 0..50 {
            assert!(m.check_willpower(10_000, &mut rng) > 0);
        }
    }

    #[test]
    fn test_willpower_zero_power_loses() {
        let mut rng = GameRng::new(7);
        let mut m = goblin();
        m.willpower = 200;
        let mut resisted = 0;
        for _ in 0..100 {
            if m.check_willpower(1, &mut rng) > 0 {
                resisted += 1;
            }
        }
        assert!(resisted > 90);
    }

    #[test]
    fn test_status_tick_saturates() {
        let mut s = MonsterStatus {
            confused: 1,
            ..Default::default()
        };
        s.tick();
        assert_eq!(s.confused, 0);
        s.tick();
        assert_eq!(s.confused, 0);
    }
}
