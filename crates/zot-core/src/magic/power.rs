//! Spell power computation.
//!
//! Power combines school skills with enhancers, mutations and transient
//! states. Application order matters: enhancers and the enkindled surge
//! apply before the per-spell cap, the diminished penalty after it, so
//! the capped number the player sees stays predictable.

use tracing::trace;

use crate::magic::spell::{Spell, SpellSchools};
use crate::player::duration::Duration;
use crate::player::mutation::Mutation;
use crate::player::skills::SkillType;
use crate::player::stats::{stat, StatType};
use crate::player::you::You;

/// School skill average times two, plus Spellcasting.
pub(crate) fn skill_power(you: &You, spell: Spell) -> i32 {
    let schools = spell.schools();
    let mut power = 0;
    let mut count = 0;
    for school in SpellSchools::ALL {
        if schools.contains(school) {
            if let Some(skill) = SkillType::from_school(school) {
                power += you.skill(skill, 2);
                count += 1;
            }
        }
    }
    if count > 0 {
        power /= count;
    }
    power + you.skill(SkillType::Spellcasting, 1)
}

/// Net enhancer levels for a spell: equipment specialisations per school,
/// plus brilliance.
pub fn spell_enhancement(you: &You, spell: Spell) -> i32 {
    let mut enhanced = you.enhancers.for_schools(spell.schools());
    if you.durations.has(Duration::Brilliance) {
        enhanced += 1;
    }
    enhanced
}

/// Enhancers boost or suppress by three power apiece.
fn apply_enhancement(initial_power: i32, enhancer_levels: i32) -> i32 {
    initial_power + enhancer_levels * 3
}

/// Bonus power from the augmentation mutation, scaling with current health.
pub fn augmentation_amount(you: &You) -> i32 {
    let level = you.get_mutation_level(Mutation::Augmentation);
    if level <= 0 || you.hp_max <= 0 {
        return 0;
    }
    let mut amount = 0;
    for i in 0..level {
        if you.hp >= (i + level) * you.hp_max / (2 * level) {
            amount += 1;
        }
    }
    amount
}

/// Calculate spell power.
pub fn calc_spell_power(you: &You, spell: Spell) -> i32 {
    let mut power = skill_power(you, spell);

    if you.divine_exegesis {
        power += you.skill(SkillType::Invocations, 1);
    }

    // Wild magic boosts spell power, subdued magic decreases it.
    power += you.get_mutation_level(Mutation::WildMagic);
    power -= you.get_mutation_level(Mutation::SubduedMagic);

    power += augmentation_amount(you);

    power = apply_enhancement(power, spell_enhancement(you, spell));

    // Each level of horror shaves a point.
    if you.durations.has(Duration::Horror) {
        power -= you.horror_level;
    }

    if you.durations.has(Duration::Enkindled) && spell.can_be_enkindled() {
        power = (power + you.experience_level) * 3 / 2;
    }

    let cap = spell.power_cap();
    if cap > 0 {
        power = power.min(cap);
    }

    // post-cap, so the result is more predictable to the player
    if you.durations.has(Duration::DiminishedSpells) {
        power /= 2;
    }

    let power = power.max(0);
    trace!(spell = spell.title(), power, "calculated spell power");
    power
}

/// Power as a percentage of the spell's cap; -1 for uncapped spells.
pub fn spell_power_percent(you: &You, spell: Spell) -> i32 {
    let cap = spell.power_cap();
    if cap == 0 {
        return -1;
    }
    calc_spell_power(you, spell) * 100 / cap
}

/// Current spell range, recomputing power when the caller has none.
pub fn calc_spell_range(you: &You, spell: Spell, power: i32) -> i32 {
    let power = if power > 0 {
        power
    } else {
        calc_spell_power(you, spell)
    };
    spell.range(power)
}

/// Range display: "X" or "X/Y" for power-variable ranges.
pub fn spell_range_string(you: &You, spell: Spell) -> String {
    let range = calc_spell_range(you, spell, 0);
    if range <= 0 {
        return "N/A".to_string();
    }
    if spell.has_variable_range() {
        format!("{}/{}", range, spell.range(spell.power_cap()))
    } else {
        range.to_string()
    }
}

/// Intellect-based max mana contribution; a convenience for the UI layer.
pub fn max_mana_from_int(you: &You) -> i32 {
    stat(you, StatType::Intelligence, true) / 2
}

/// Damage description for spell listings: "6d8", or empty for spells with
/// no direct damage dice.
pub fn spell_damage_string(you: &You, spell: Spell) -> String {
    match crate::magic::beam::zap_damage(spell, calc_spell_power(you, spell)) {
        Some(dice) if dice.num > 0 && dice.size > 0 => dice.to_string(),
        _ => String::new(),
    }
}

/// Returns the nth triangular number.
fn triangular_number(n: i32) -> i32 {
    n * (n + 1) / 2
}

/// Diminishing returns on enchantment power, so extreme power does not
/// translate into guaranteed hexes.
pub fn ench_power_stepdown(power: i32) -> i32 {
    if power <= 40 {
        power
    } else {
        (40 + (power - 40) / 2).min(120)
    }
}

/// Compute success chance for willpower-checking spells.
///
/// The check rolls two uniform dice against the target's willpower; this
/// returns the chance, out of `scale`, that the enchantment lands.
pub fn hex_success_chance(willpower: i32, power: i32, scale: i32) -> i32 {
    let pow = ench_power_stepdown(power);
    let target = willpower + 100 - pow;
    let denom = 101 * 100;

    if target <= 0 {
        return scale;
    }
    if target > 200 {
        return 0;
    }
    if target <= 100 {
        return scale * (denom - triangular_number(target)) / denom;
    }
    scale * triangular_number(201 - target) / denom
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::duration::Duration;

    fn caster() -> You {
        let mut you = You::default();
        you.skills.set_level(SkillType::Spellcasting, 10);
        you.skills.set_level(SkillType::Conjurations, 10);
        you.skills.set_level(SkillType::FireMagic, 10);
        you
    }

    #[test]
    fn test_skill_power_averages_schools() {
        let mut you = caster();
        // Fireball: Conjuration 10, Fire 10 -> avg*2 = 20, +10 spellcasting
        assert_eq!(skill_power(&you, Spell::Fireball), 30);
        you.skills.set_level(SkillType::FireMagic, 0);
        // avg of 10 and 0 is 5 -> *2 = 10
        assert_eq!(skill_power(&you, Spell::Fireball), 20);
    }

    #[test]
    fn test_enhancers_add_three_each() {
        let mut you = caster();
        let base = calc_spell_power(&you, Spell::Fireball);
        you.enhancers.fire = 2;
        assert_eq!(calc_spell_power(&you, Spell::Fireball), base + 6);
        you.enhancers.fire = -2;
        assert_eq!(calc_spell_power(&you, Spell::Fireball), base - 6);
    }

    #[test]
    fn test_mutations_shift_power() {
        let mut you = caster();
        let base = calc_spell_power(&you, Spell::Fireball);
        you.set_mutation_level(Mutation::WildMagic, 2);
        assert_eq!(calc_spell_power(&you, Spell::Fireball), base + 2);
        you.set_mutation_level(Mutation::SubduedMagic, 3);
        assert_eq!(calc_spell_power(&you, Spell::Fireball), base - 1);
    }

    #[test]
    fn test_cap_applies_before_diminished() {
        let mut you = caster();
        you.skills.set_level(SkillType::Spellcasting, 27);
        you.skills.set_level(SkillType::Conjurations, 27);
        // Magic Dart caps at 25
        assert_eq!(calc_spell_power(&you, Spell::MagicDart), 25);
        you.durations.set(Duration::DiminishedSpells, 10);
        assert_eq!(calc_spell_power(&you, Spell::MagicDart), 12);
    }

    #[test]
    fn test_horror_penalty() {
        let mut you = caster();
        let base = calc_spell_power(&you, Spell::Fireball);
        you.durations.set(Duration::Horror, 5);
        you.horror_level = 3;
        assert_eq!(calc_spell_power(&you, Spell::Fireball), base - 3);
    }

    #[test]
    fn test_enkindled_only_boosts_eligible_spells() {
        let mut you = caster();
        you.experience_level = 10;
        let fireball = calc_spell_power(&you, Spell::Fireball);
        let swiftness = calc_spell_power(&you, Spell::Swiftness);
        you.durations.set(Duration::Enkindled, 5);
        assert!(calc_spell_power(&you, Spell::Fireball) > fireball);
        assert_eq!(calc_spell_power(&you, Spell::Swiftness), swiftness);
    }

    #[test]
    fn test_power_never_negative() {
        let mut you = You::default();
        you.set_mutation_level(Mutation::SubduedMagic, 3);
        you.enhancers.fire = -5;
        assert_eq!(calc_spell_power(&you, Spell::Fireball), 0);
    }

    #[test]
    fn test_augmentation_scales_with_health() {
        let mut you = caster();
        you.set_mutation_level(Mutation::Augmentation, 3);
        you.hp = you.hp_max;
        assert_eq!(augmentation_amount(&you), 3);
        you.hp = you.hp_max / 2;
        let half = augmentation_amount(&you);
        assert!(half < 3);
        you.hp = 1;
        assert!(augmentation_amount(&you) <= half);
    }

    #[test]
    fn test_hex_chance_extremes() {
        // invulnerable-grade willpower: no chance
        assert_eq!(hex_success_chance(300, 50, 100), 0);
        // helpless target: certain
        assert_eq!(hex_success_chance(0, 200, 100), 100);
        // chance grows with power
        let weak = hex_success_chance(40, 10, 100);
        let strong = hex_success_chance(40, 100, 100);
        assert!(strong > weak);
    }

    #[test]
    fn test_stepdown_monotonic_and_capped() {
        assert_eq!(ench_power_stepdown(30), 30);
        assert_eq!(ench_power_stepdown(40), 40);
        assert_eq!(ench_power_stepdown(60), 50);
        assert_eq!(ench_power_stepdown(500), 120);
    }

    #[test]
    fn test_range_string_variable() {
        let you = caster();
        assert!(spell_range_string(&you, Spell::Silence).contains('/'));
        assert_eq!(spell_range_string(&you, Spell::Swiftness), "N/A");
    }

    #[test]
    fn test_damage_string() {
        let you = caster();
        assert!(spell_damage_string(&you, Spell::Fireball).contains('d'));
        assert_eq!(spell_damage_string(&you, Spell::Blink), "");
    }
}
