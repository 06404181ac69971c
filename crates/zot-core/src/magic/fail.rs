//! Spell failure and miscasts.
//!
//! Failure chance pits spell difficulty against school skill, smoothed by
//! intelligence and worsened by heavy armour. A failed cast still costs
//! mana and leaves magical residue on the caster.

use serde::{Deserialize, Serialize};

use crate::magic::power::skill_power;
use crate::magic::spell::Spell;
use crate::player::stats::{stat, StatType};
use crate::player::you::You;
use crate::rng::GameRng;

/// Raw difficulty term per spell level; steeper than linear so high-level
/// spells stay out of reach of dabblers.
const DIFFICULTY_TERMS: [i32; 9] = [3, 15, 35, 70, 100, 150, 200, 260, 340];

/// Chance in 100 that a cast of this spell fails outright.
pub fn raw_spell_fail(you: &You, spell: Spell) -> i32 {
    let mut chance = 60;

    chance -= 2 * skill_power(you, spell);
    chance -= stat(you, StatType::Intelligence, true) / 2;
    chance += you.armour_encumbrance;
    chance += DIFFICULTY_TERMS[(spell.level() - 1) as usize] / 5;

    chance.clamp(0, 100)
}

/// Miscast severity tiers, in rising order of harm
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FailSeverity {
    Harmless = 0,
    Mild = 1,
    Serious = 2,
    Dire = 3,
}

/// How bad a miscast of this spell would be, given the current failure
/// chance. Used for menu colouring as well as the miscast itself.
pub fn fail_severity(you: &You, spell: Spell) -> FailSeverity {
    let raw = raw_spell_fail(you, spell) * spell.level();
    match raw {
        ..=9 => FailSeverity::Harmless,
        10..=59 => FailSeverity::Mild,
        60..=179 => FailSeverity::Serious,
        _ => FailSeverity::Dire,
    }
}

/// Failure chance description for spell listings.
pub fn failure_rate_string(chance: i32) -> &'static str {
    match chance {
        ..=0 => "Perfect",
        1..=5 => "Excellent",
        6..=12 => "Great",
        13..=22 => "Very Good",
        23..=35 => "Good",
        36..=50 => "Fair",
        51..=70 => "Poor",
        71..=90 => "Very Poor",
        _ => "Useless",
    }
}

/// What a miscast did to the caster
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MiscastEffect {
    pub contamination: i32,
    pub damage: i32,
    pub message: String,
}

/// Apply the side effects of a miscast: contamination always, damage for
/// the nastier tiers.
pub fn miscast_effect(you: &mut You, spell: Spell, rng: &mut GameRng) -> MiscastEffect {
    let severity = fail_severity(you, spell);
    let level = spell.level();

    let contamination = 10 * level + rng.random2(10 * level + 1);
    you.contaminate(contamination);

    let damage = match severity {
        FailSeverity::Harmless => 0,
        FailSeverity::Mild => rng.roll_dice(1, level),
        FailSeverity::Serious => rng.roll_dice(2, level + 2),
        FailSeverity::Dire => rng.roll_dice(3, level + 4),
    };
    you.hurt(damage);

    let message = match severity {
        FailSeverity::Harmless => "Your spell fizzles.".to_string(),
        FailSeverity::Mild => "Magical energies sting you.".to_string(),
        FailSeverity::Serious => "Wild magic lashes out at you!".to_string(),
        FailSeverity::Dire => "Uncontrolled magic tears through you!".to_string(),
    };

    MiscastEffect {
        contamination,
        damage,
        message,
    }
}
