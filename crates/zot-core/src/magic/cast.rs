//! The casting pipeline.
//!
//! `cast_a_spell` handles general preconditions and costs, then
//! `your_spells` targets and fires the spell proper through the dispatch
//! table in `do_cast`. Outcomes: success (turn and mana spent, side
//! effects applied), fail (miscast; mana spent, penalty applied), abort
//! (no cost, no turn) and none (not a player spell; a logic error).

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error};

use crate::board::{Board, Coord};
use crate::consts::CONTAM_THRESHOLD;
use crate::magic::beam::{fire_zap, zap_damage};
use crate::magic::effects;
use crate::magic::fail::{miscast_effect, raw_spell_fail};
use crate::magic::power::{calc_spell_power, calc_spell_range, spell_enhancement};
use crate::magic::spell::{Spell, SpellFlags};
use crate::magic::targeting::find_spell_targeter;
use crate::monster::MonsterId;
use crate::options::Options;
use crate::player::conduct::{did_god_conduct, ConductType};
use crate::player::duration::Duration;
use crate::player::mutation::Mutation;
use crate::player::skills::SkillType;
use crate::player::you::You;
use crate::rng::GameRng;

/// Result of resolving a spell through the dispatch table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SpellOutcome {
    Success,
    Fail,
    #[default]
    Abort,
    /// Not a player-castable spell; a programming error, not a game state
    None,
}

/// A spell that should never have reached the player dispatch table
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CastError {
    #[error("'{0}' is not a player-castable spell")]
    NotPlayerCastable(&'static str),
}

/// Everything a cast did, for the caller to render
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CastResult {
    pub outcome: SpellOutcome,
    pub messages: Vec<String>,
    /// Mana actually paid (0 on abort)
    pub mana_spent: i32,
    pub killed: Vec<MonsterId>,
    /// Noise events at positions, for the stealth layer
    pub noise: Vec<(Coord, i32)>,
    /// False when the cast aborted and the turn was not consumed
    pub took_turn: bool,
}

impl CastResult {
    fn aborted(message: impl Into<String>) -> Self {
        Self {
            outcome: SpellOutcome::Abort,
            messages: vec![message.into()],
            ..Default::default()
        }
    }
}

/// Can the player cast any spell at all? Checks the things that gate
/// casting regardless of which spell is wanted.
pub fn can_cast_spells(you: &You) -> Result<(), String> {
    if you.durations.has(Duration::WaterHold) && !you.can_breathe_water {
        return Err("You cannot cast spells while unable to breathe!".to_string());
    }
    if you.durations.has(Duration::NoCast) {
        return Err("You are unable to access your magic!".to_string());
    }
    if you.berserk() {
        return Err("You are too berserk to cast spells!".to_string());
    }
    if you.confused() {
        return Err("You're too confused to cast spells.".to_string());
    }
    if you.silenced() {
        return Err("You cannot cast spells when silenced!".to_string());
    }
    Ok(())
}

/// Why this particular spell cannot be cast right now, if it can't.
pub fn casting_uselessness_reason(you: &You, spell: Spell) -> Option<String> {
    if !you.can_pay_mana(spell.mana_cost()) {
        return Some("You don't have enough magic to cast that spell.".to_string());
    }
    if you.stats.is_zeroed(crate::player::stats::StatType::Intelligence) {
        return Some("You are too addled to remember the incantation.".to_string());
    }
    None
}

/// Is there no susceptible hostile anywhere the spell could touch?
/// Used by the checked cast command to save a wasted turn.
pub fn spell_no_hostile_in_range(you: &You, board: &Board, spell: Spell) -> bool {
    let flags = spell.flags();
    if flags.contains(SpellFlags::SELFENCH) || flags.contains(SpellFlags::HELPFUL) {
        return false;
    }
    let power = calc_spell_power(you, spell);
    let range = calc_spell_range(you, spell, power);
    !board
        .visible_monsters(you.pos)
        .iter()
        .any(|m| m.is_hostile() && you.pos.distance(m.pos) <= range)
}

/// The conducts a cast of this spell commits
pub fn spell_conducts(spell: Spell) -> Vec<ConductType> {
    let mut conducts = Vec::new();
    if spell.is_evil() {
        conducts.push(ConductType::Evil);
    }
    if spell.is_unclean() {
        conducts.push(ConductType::Unclean);
    }
    if spell.is_chaotic() {
        conducts.push(ConductType::Chaotic);
    }
    if spell.is_hasty() {
        conducts.push(ConductType::Hasty);
    }
    conducts
}

/// Cast a spell, handling general preconditions and costs.
///
/// `check_range` aborts when no susceptible hostile is in range;
/// `force` overrides that check, god warnings and contamination warnings.
pub fn cast_a_spell(
    you: &mut You,
    board: &mut Board,
    rng: &mut GameRng,
    options: &Options,
    spell: Spell,
    target: Option<Coord>,
    check_range: bool,
    force: bool,
) -> Result<CastResult, CastError> {
    if you.spell_count() == 0 && !you.divine_exegesis {
        return Ok(CastResult::aborted("You don't know any spells."));
    }
    if !you.has_spell(spell) && !you.divine_exegesis {
        return Ok(CastResult::aborted("You don't know that spell."));
    }
    if let Err(reason) = can_cast_spells(you) {
        return Ok(CastResult::aborted(reason));
    }
    if let Some(reason) = casting_uselessness_reason(you, spell) {
        return Ok(CastResult::aborted(reason));
    }
    if check_range && !force && spell_no_hostile_in_range(you, board, spell) {
        return Ok(CastResult::aborted(
            "You can't see any susceptible monsters within range! (Force to cast anyway.)",
        ));
    }
    if !force
        && crate::player::conduct::god_punishes_conducts(you.religion.god, &spell_conducts(spell))
    {
        return Ok(CastResult::aborted(
            "Casting this spell would place you under penance! (Force to cast anyway.)",
        ));
    }
    if !force
        && options.warn_contam_cost
        && effects::spell_contam_cost(spell) > 0
        && you.magic_contamination < CONTAM_THRESHOLD
        && you.magic_contamination + effects::spell_contam_cost(spell) >= CONTAM_THRESHOLD
    {
        return Ok(CastResult::aborted(
            "Casting this now could dangerously contaminate you! (Force to cast anyway.)",
        ));
    }
    if !force
        && options
            .confirm_action
            .iter()
            .any(|pattern| spell.title().contains(pattern.as_str()))
    {
        return Ok(CastResult::aborted(format!(
            "Really cast {}? (Force to confirm.)",
            spell.title()
        )));
    }

    you.last_cast_spell = Some(spell);

    // Silently take the mana before the spell.
    let cost = spell.mana_cost();
    you.pay_mana(cost);

    let mut result = your_spells(you, board, rng, spell, 0, true, target, false);

    match result.outcome {
        SpellOutcome::Abort => {
            // Return the mana since the spell is aborted.
            you.refund_mana(cost);
            result.took_turn = false;
            Ok(result)
        }
        SpellOutcome::None => {
            you.refund_mana(cost);
            error!(spell = spell.title(), "spell reached player dispatch");
            Err(CastError::NotPlayerCastable(spell.title()))
        }
        outcome => {
            result.mana_spent = cost;
            practise_casting(you, spell, outcome == SpellOutcome::Success);
            handle_channelling_refund(you, rng, cost, outcome, &mut result);
            if outcome == SpellOutcome::Success {
                let conduct_gain = 1 + rng.random2(5);
                if let Some(msg) =
                    did_god_conduct(&mut you.religion, ConductType::SpellCasting, conduct_gain)
                {
                    result.messages.push(msg);
                }
            }

            result.took_turn = true;
            if you.free_actions.available().covers_spell() {
                you.free_actions.expend();
                result.took_turn = false;
                result
                    .messages
                    .push("You have a moment to act again!".to_string());
            }
            Ok(result)
        }
    }
}

/// Targets and fires player-cast spells and spell-like effects.
///
/// `actual_spell` is false for evoked and divine effects, which skip the
/// failure roll, the casting conducts and the sap-magic trigger.
pub fn your_spells(
    you: &mut You,
    board: &mut Board,
    rng: &mut GameRng,
    spell: Spell,
    powc: i32,
    actual_spell: bool,
    target: Option<Coord>,
    force_failure: bool,
) -> CastResult {
    let mut result = CastResult::default();
    let flags = spell.flags();

    if flags.contains(SpellFlags::MONSTER) && actual_spell {
        result.outcome = SpellOutcome::None;
        result
            .messages
            .push(format!("Spell '{}' is not a player castable spell.", spell.title()));
        return result;
    }

    let powc = if powc > 0 {
        powc
    } else {
        calc_spell_power(you, spell)
    };
    let range = calc_spell_range(you, spell, powc);

    let Some(targeter) = find_spell_targeter(spell, powc, range) else {
        result.outcome = SpellOutcome::None;
        return result;
    };

    let is_targeted = flags.intersects(SpellFlags::TARGETING_MASK);
    let aim = match target {
        Some(aim) => aim,
        None if is_targeted => {
            // auto-target the nearest hostile in range
            match board
                .visible_monsters(you.pos)
                .iter()
                .find(|m| m.is_hostile() && you.pos.distance(m.pos) <= range)
            {
                Some(m) => m.pos,
                None => {
                    result = CastResult::aborted("You can't see a target for that spell.");
                    return result;
                }
            }
        }
        None => you.pos,
    };

    if is_targeted {
        if let Err(reason) = targeter.valid_aim(board, you.pos, aim) {
            result = CastResult::aborted(reason);
            return result;
        }
        if flags.contains(SpellFlags::NOT_SELF) && aim == you.pos {
            result = CastResult::aborted("You cannot aim that at yourself.");
            return result;
        }
    }

    if actual_spell {
        surge_power(spell_enhancement(you, spell), &mut result);
    }

    let fail = force_failure
        || (actual_spell && rng.x_chance_in_y(raw_spell_fail(you, spell), 100));

    debug!(
        spell = spell.title(),
        power = powc,
        range,
        fail,
        "casting spell"
    );

    let can_enkindle = actual_spell && spell.can_be_enkindled();
    let enkindled = can_enkindle && you.durations.has(Duration::Enkindled);

    let outcome = do_cast(you, board, rng, spell, powc, range, aim, fail, &mut result);

    match outcome {
        SpellOutcome::Success => {
            spellcasting_side_effects(you, board, rng, spell, actual_spell, &mut result);

            if enkindled {
                you.enkindle_charges -= 1;
                if you.enkindle_charges <= 0 {
                    you.durations.clear(Duration::Enkindled);
                    result
                        .messages
                        .push("The fire in your mind burns out.".to_string());
                }
            }
        }
        SpellOutcome::Fail => {
            if actual_spell {
                result
                    .messages
                    .push(format!("You miscast {}.", spell.title()));
                let effect = miscast_effect(you, spell, rng);
                result.messages.push(effect.message.clone());
            }
        }
        SpellOutcome::Abort | SpellOutcome::None => {}
    }

    result.outcome = outcome;
    result
}

/// The enhancer surge felt as the cast begins
fn surge_power(enhanced: i32, result: &mut CastResult) {
    if enhanced > 0 {
        result
            .messages
            .push("You feel a surge of power!".to_string());
    } else if enhanced < 0 {
        result.messages.push("You feel a numb sensation.".to_string());
    }
}

/// Returns Success, Abort, Fail or None (not a player spell).
#[allow(clippy::too_many_arguments)]
fn do_cast(
    you: &mut You,
    board: &mut Board,
    rng: &mut GameRng,
    spell: Spell,
    powc: i32,
    range: i32,
    aim: Coord,
    fail: bool,
    result: &mut CastResult,
) -> SpellOutcome {
    if spell.flags().contains(SpellFlags::MONSTER) {
        return SpellOutcome::None;
    }

    let ctx = &mut effects::EffectCtx {
        you,
        board,
        rng,
        power: powc,
        range,
        aim,
        fail,
        result,
    };

    match spell {
        // Conjurations with bespoke geometry
        Spell::Fireball | Spell::MephiticCloud => effects::cast_explosive_bolt(ctx, spell),
        Spell::SearingRay => effects::cast_searing_ray(ctx),
        Spell::MysticBlast => effects::cast_mystic_blast(ctx),
        Spell::FireStorm => effects::cast_fire_storm(ctx),
        Spell::Glaciate => effects::cast_glaciate(ctx),
        Spell::ChainLightning => effects::cast_chain_lightning(ctx),
        Spell::GalvanicCoupling => effects::cast_galvanic_coupling(ctx),
        Spell::Irradiate => effects::cast_irradiate(ctx),
        Spell::FlameWave => effects::cast_flame_wave(ctx),
        Spell::Refrigeration => effects::cast_refrigeration(ctx),
        Spell::PolarVortex => effects::cast_polar_vortex(ctx),

        // Touch spells
        Spell::Freeze => effects::cast_freeze(ctx),
        Spell::VampiricDraining => effects::cast_vampiric_draining(ctx),
        Spell::ConfusingTouch => effects::cast_confusing_touch(ctx),

        // Hexes
        Spell::Slow => effects::cast_slow(ctx),
        Spell::Confuse => effects::cast_confuse(ctx),
        Spell::CauseFear => effects::cast_cause_fear(ctx),
        Spell::Silence => effects::cast_silence(ctx),

        // Translocations and earth
        Spell::Blink => effects::cast_blink(ctx),
        Spell::TeleportOther => effects::cast_teleport_other(ctx),
        Spell::Passwall => effects::cast_passwall(ctx),
        Spell::Dig => effects::cast_dig(ctx),

        // Self-enchantments
        Spell::Swiftness => effects::cast_swiftness(ctx),
        Spell::FrostArmour => effects::cast_frost_armour(ctx),
        Spell::DeathChannel => effects::cast_death_channel(ctx),
        Spell::Revivification => effects::cast_revivification(ctx),
        Spell::SublimationOfBlood => effects::cast_sublimation_of_blood(ctx),

        // Summons
        Spell::SummonSmallMammal => effects::cast_summon(ctx, "small mammal", 4),
        Spell::CallImp => effects::cast_summon(ctx, "imp", 8),
        Spell::SummonIceBeast => effects::cast_summon(ctx, "ice beast", 18),

        // Necromancy
        Spell::AnimateDead => effects::cast_animate_dead(ctx),

        // Everything else: try the zap table.
        _ => {
            if zap_damage(spell, powc).is_some()
                && spell.flags().contains(SpellFlags::DIR_OR_TARGET)
            {
                if fail {
                    SpellOutcome::Fail
                } else {
                    let you_pos = ctx.you.pos;
                    let terminus = fire_zap(
                        spell, powc, range, aim, you_pos, ctx.board, ctx.rng, ctx.result,
                    );
                    if let Some(pos) = terminus {
                        let noise = spell.effect_noise();
                        if noise > 0 {
                            ctx.result.noise.push((pos, noise));
                        }
                    }
                    SpellOutcome::Success
                }
            } else {
                SpellOutcome::None
            }
        }
    }
}

/// Side effects of successfully casting: noise, sap magic, demonic
/// retaliation, the ephemeral shield and god conducts.
fn spellcasting_side_effects(
    you: &mut You,
    board: &mut Board,
    rng: &mut GameRng,
    spell: Spell,
    actual_spell: bool,
    result: &mut CastResult,
) {
    // conducts scale with spell difficulty
    let conduct_level = 10 + spell.level();
    for conduct in spell_conducts(spell) {
        if let Some(msg) = did_god_conduct(&mut you.religion, conduct, conduct_level) {
            result.messages.push(msg);
        }
    }

    if actual_spell {
        if you.durations.has(Duration::SapMagic) {
            result
                .messages
                .push("You lose access to your magic!".to_string());
            you.durations
                .increase(Duration::NoCast, (3 + rng.random2(3)) as u32);
        }

        // Make some noise if it's actually the player casting.
        let noise = spell.casting_noise();
        if noise > 0 {
            result.noise.push((you.pos, noise));
        }
    }

    let demonic = you.get_mutation_level(Mutation::DemonicMagic);
    if demonic > 0 && actual_spell {
        effects::demonic_magic_retaliation(you, board, rng, spell.level() * 6, demonic, result);
    }

    if you.get_mutation_level(Mutation::EphemeralShield) > 0 && actual_spell {
        you.durations.set(Duration::EphemeralShield, 2);
    }
}

/// Exercise Spellcasting and the spell's school skills.
fn practise_casting(you: &mut You, spell: Spell, success: bool) {
    let points = if success { spell.level() as u16 } else { 1 };
    you.skills.practise(SkillType::Spellcasting, points);
    for school in crate::magic::spell::SpellSchools::ALL {
        if spell.schools().contains(school) {
            if let Some(skill) = SkillType::from_school(school) {
                you.skills.practise(skill, points);
            }
        }
    }
}

/// Wizardly items sometimes refund the mana of a cast. Miscasts always
/// get refunded, successes only sometimes do.
fn handle_channelling_refund(
    you: &mut You,
    rng: &mut GameRng,
    cost: i32,
    outcome: SpellOutcome,
    result: &mut CastResult,
) {
    if you.get_mutation_level(Mutation::HpCasting) > 0 || outcome == SpellOutcome::Abort {
        return;
    }
    let sources = you.channelling_sources();
    if sources == 0 {
        return;
    }
    if outcome != SpellOutcome::Fail && !rng.x_chance_in_y(sources, 4) {
        return;
    }
    result
        .messages
        .push("Magical energy flows into your mind!".to_string());
    you.gain_mp(cost);
    if let Some(msg) = did_god_conduct(&mut you.religion, ConductType::WizardlyItem, 10) {
        result.messages.push(msg);
    }
}
