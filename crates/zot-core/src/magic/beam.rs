//! Bolt firing: the zap fallback behind most damage spells.
//!
//! A zap is a beam with a damage flavour, dice that scale with power, and
//! a to-hit number rolled against the victim's evasion. Explosions skip
//! the to-hit roll and damage everything in the ball.

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::board::{Board, Coord};
use crate::magic::cast::CastResult;
use crate::magic::spell::Spell;
use crate::magic::targeting::trace_beam;
use crate::monster::Monster;
use crate::rng::GameRng;

/// Sentinel to-hit: never rolls, always lands
pub const AUTOMATIC_HIT: i32 = i32::MAX;

/// Damage flavour; decides which resistance applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[repr(u8)]
pub enum BeamFlavour {
    Magic = 0,
    Fire = 1,
    Cold = 2,
    Electricity = 3,
    Poison = 4,
    Negative = 5,
}

/// Damage dice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceDef {
    pub num: i32,
    pub size: i32,
}

impl DiceDef {
    pub const fn new(num: i32, size: i32) -> Self {
        Self { num, size }
    }

    pub fn roll(&self, rng: &mut GameRng) -> i32 {
        rng.roll_dice(self.num, self.size)
    }
}

impl core::fmt::Display for DiceDef {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}d{}", self.num, self.size)
    }
}

/// Damage dice for a zap at the given power; None for spells that are not
/// zaps or deal no direct dice damage.
pub fn zap_damage(spell: Spell, power: i32) -> Option<DiceDef> {
    let dice = match spell {
        Spell::MagicDart => DiceDef::new(3, 3 + power / 12),
        Spell::SearingRay => DiceDef::new(2, 3 + power / 13),
        Spell::StickyFlame => DiceDef::new(2, 2 + power / 20),
        Spell::Fireball => DiceDef::new(6, 4 + power / 10),
        Spell::LightningBolt => DiceDef::new(5, 4 + power / 12),
        Spell::MephiticCloud => DiceDef::new(1, 4),
        Spell::Pain => DiceDef::new(1, 4 + power / 5),
        Spell::VenomSpit => DiceDef::new(2, 2 + power / 15),
        Spell::Freeze => DiceDef::new(1, 3 + power / 4),
        Spell::Airstrike => DiceDef::new(2, 4 + power / 12),
        Spell::MysticBlast => DiceDef::new(3, 3 + power / 12),
        Spell::Refrigeration => DiceDef::new(3, 4 + power / 18),
        Spell::FireStorm => DiceDef::new(8, 5 + power / 15),
        Spell::Glaciate => DiceDef::new(7, 4 + power / 14),
        Spell::ChainLightning => DiceDef::new(5, 6 + power / 12),
        Spell::PolarVortex => DiceDef::new(6, 4 + power / 16),
        Spell::Irradiate => DiceDef::new(4, 3 + power / 20),
        Spell::FlameWave => DiceDef::new(2, 4 + power / 12),
        Spell::VampiricDraining => DiceDef::new(2, 3 + power / 15),
        Spell::GalvanicCoupling => DiceDef::new(0, 0),
        _ => return None,
    };
    Some(dice)
}

/// To-hit number for an aimed zap; explosions and enchantments skip it
pub fn zap_to_hit(spell: Spell, power: i32) -> i32 {
    match spell {
        Spell::MagicDart | Spell::Pain => AUTOMATIC_HIT,
        Spell::SearingRay => 10 + power / 5,
        Spell::StickyFlame => 11 + power / 8,
        Spell::LightningBolt => 16 + power / 20,
        Spell::VenomSpit => 12,
        _ => AUTOMATIC_HIT,
    }
}

/// The resistance flavour of a zap
pub const fn zap_flavour(spell: Spell) -> BeamFlavour {
    match spell {
        Spell::SearingRay
        | Spell::StickyFlame
        | Spell::Fireball
        | Spell::FireStorm
        | Spell::FlameWave => BeamFlavour::Fire,
        Spell::Freeze | Spell::Refrigeration | Spell::Glaciate | Spell::PolarVortex => {
            BeamFlavour::Cold
        }
        Spell::LightningBolt | Spell::ChainLightning | Spell::GalvanicCoupling => {
            BeamFlavour::Electricity
        }
        Spell::MephiticCloud | Spell::VenomSpit => BeamFlavour::Poison,
        Spell::Pain | Spell::VampiricDraining => BeamFlavour::Negative,
        _ => BeamFlavour::Magic,
    }
}

/// Scale damage by the victim's resistances
pub fn apply_resist(damage: i32, flavour: BeamFlavour, monster: &Monster) -> i32 {
    match flavour {
        BeamFlavour::Fire if monster.res_fire() => damage / 2,
        BeamFlavour::Cold if monster.res_cold() => damage / 2,
        BeamFlavour::Electricity if monster.res_elec() => damage / 3,
        BeamFlavour::Poison if monster.res_poison() => 0,
        BeamFlavour::Negative if monster.res_negative() => 0,
        _ => damage,
    }
}

/// Roll an aimed zap against evasion
fn beam_hits(to_hit: i32, ev: i32, rng: &mut GameRng) -> bool {
    if to_hit == AUTOMATIC_HIT {
        return true;
    }
    rng.random2(to_hit + 1) >= rng.random2(ev + 1)
}

/// Describe a miss for the message log
fn miss_message(spell: Spell, name: &str) -> String {
    format!("The {} bolt misses the {name}.", spell_noun(spell))
}

const fn spell_noun(spell: Spell) -> &'static str {
    match zap_flavour(spell) {
        BeamFlavour::Fire => "searing",
        BeamFlavour::Cold => "freezing",
        BeamFlavour::Electricity => "crackling",
        BeamFlavour::Poison => "noxious",
        BeamFlavour::Negative => "draining",
        BeamFlavour::Magic => "shimmering",
    }
}

/// Damage one monster with a zap, recording kill and message.
/// Returns the damage dealt after resistances.
pub(crate) fn zap_monster(
    spell: Spell,
    power: i32,
    target: Coord,
    board: &mut Board,
    rng: &mut GameRng,
    result: &mut CastResult,
) -> i32 {
    let Some(dice) = zap_damage(spell, power) else {
        return 0;
    };
    let rolled = dice.roll(rng);
    let Some(monster) = board.monster_at_mut(target) else {
        return 0;
    };
    let damage = apply_resist(rolled, zap_flavour(spell), monster);
    if damage == 0 && rolled > 0 {
        result
            .messages
            .push(format!("The {} is unaffected.", monster.name));
        return 0;
    }
    monster.hurt(damage);
    let name = monster.name.clone();
    let died = !monster.alive();
    let id = monster.id;
    result
        .messages
        .push(format!("The {name} is struck. ({damage})"));
    if died {
        result.messages.push(format!("You kill the {name}!"));
        result.killed.push(id);
    }
    damage
}

/// Fire an aimed zap along a path. Returns the cell where the beam
/// terminated, if it got anywhere.
pub(crate) fn fire_zap(
    spell: Spell,
    power: i32,
    range: i32,
    aim: Coord,
    you_pos: Coord,
    board: &mut Board,
    rng: &mut GameRng,
    result: &mut CastResult,
) -> Option<Coord> {
    let pierce = matches!(spell, Spell::LightningBolt);
    let path = trace_beam(board, you_pos, aim, range, pierce, false);
    let mut terminus = None;
    let to_hit = zap_to_hit(spell, power);

    for cell in &path {
        terminus = Some(*cell);
        let Some(monster) = board.monster_at(*cell) else {
            continue;
        };
        let (ev, name) = (monster.ev, monster.name.clone());
        if !beam_hits(to_hit, ev, rng) {
            result.messages.push(miss_message(spell, &name));
            if !pierce {
                break;
            }
            continue;
        }
        zap_monster(spell, power, *cell, board, rng, result);
        if !pierce {
            break;
        }
    }
    terminus
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monster::{MonsterId, Resists};

    #[test]
    fn test_damage_scales_with_power() {
        let low = zap_damage(Spell::Fireball, 0).unwrap();
        let high = zap_damage(Spell::Fireball, 150).unwrap();
        assert_eq!(low.num, high.num);
        assert!(high.size > low.size);
    }

    #[test]
    fn test_enchantments_have_no_dice() {
        assert!(zap_damage(Spell::Slow, 100).is_none());
        assert!(zap_damage(Spell::Blink, 100).is_none());
    }

    #[test]
    fn test_resists() {
        let mut m = Monster::new(MonsterId(1), "efreet", Coord::new(1, 1), 20);
        m.resists = Resists::FIRE | Resists::POISON;
        assert_eq!(apply_resist(10, BeamFlavour::Fire, &m), 5);
        assert_eq!(apply_resist(10, BeamFlavour::Poison, &m), 0);
        assert_eq!(apply_resist(10, BeamFlavour::Cold, &m), 10);
    }

    #[test]
    fn test_fire_zap_kills_and_records() {
        let mut board = Board::new(20, 20);
        board
            .monsters
            .push(Monster::new(MonsterId(7), "rat", Coord::new(8, 5), 1));
        let mut rng = GameRng::new(1);
        let mut result = CastResult::default();
        let terminus = fire_zap(
            Spell::MagicDart,
            25,
            7,
            Coord::new(8, 5),
            Coord::new(5, 5),
            &mut board,
            &mut rng,
            &mut result,
        );
        assert_eq!(terminus, Some(Coord::new(8, 5)));
        assert_eq!(result.killed, vec![MonsterId(7)]);
        assert!(result.messages.iter().any(|m| m.contains("kill")));
    }

    #[test]
    fn test_dice_display() {
        assert_eq!(zap_damage(Spell::MagicDart, 12).unwrap().to_string(), "3d4");
    }
}
